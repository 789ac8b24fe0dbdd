#![doc = include_str!("../README.md")]

mod config;
mod format;

use std::io::{BufWriter, Write};

use clap::Parser;
use config::{Action, CliArgs, CliConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;
    tracing::debug!(?config, "resolved configuration");

    let mut out = BufWriter::new(std::io::stdout().lock());
    match config.action {
        Action::Generate { shard_id, count } => config.format.generate(shard_id, count, &mut out)?,
        Action::Decode { id } => config.format.decode(id, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

/// Logs to stderr so stdout carries only IDs. `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
