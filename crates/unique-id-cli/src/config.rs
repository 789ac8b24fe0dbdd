use anyhow::bail;
use clap::{Parser, Subcommand};

use crate::format::Format;

/// Command-line arguments for `unique-id-cli`.
///
/// Every option falls back to an environment variable, which may come from a
/// `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "unique-id-cli",
    version,
    about = "Generate and decode time-sortable 64-bit IDs"
)]
pub struct CliArgs {
    /// ID layout to generate or decode.
    ///
    /// Environment variable: `UNIQUE_ID_FORMAT`
    #[arg(
        long,
        global = true,
        env = "UNIQUE_ID_FORMAT",
        value_enum,
        default_value = "instagram"
    )]
    pub format: Format,

    /// Shard ID embedded in generated IDs.
    ///
    /// Must fit the format's shard field: 0..=8191 for Instagram and
    /// 0..=65535 for Sonyflake.
    ///
    /// Environment variable: `UNIQUE_ID_SHARD_ID`
    #[arg(long, env = "UNIQUE_ID_SHARD_ID", default_value_t = 0)]
    pub shard_id: i64,

    /// Number of IDs to print.
    ///
    /// Environment variable: `UNIQUE_ID_COUNT`
    #[arg(long, env = "UNIQUE_ID_COUNT", default_value_t = 1)]
    pub count: usize,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print IDs (the default when no subcommand is given).
    Generate,
    /// Print the timestamp, shard ID and sequence packed into an ID.
    Decode {
        /// Raw ID as a decimal integer.
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Generate { shard_id: i64, count: usize },
    Decode { id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliConfig {
    pub format: Format,
    pub action: Action,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let action = match args.command.unwrap_or(Command::Generate) {
            Command::Generate => {
                if args.count == 0 {
                    bail!("UNIQUE_ID_COUNT must be greater than 0");
                }

                let max_shard_id = args.format.max_shard_id();
                if !(0..=max_shard_id).contains(&args.shard_id) {
                    bail!(
                        "UNIQUE_ID_SHARD_ID ({}) is outside the {} shard range (0..={})",
                        args.shard_id,
                        args.format,
                        max_shard_id
                    );
                }

                Action::Generate {
                    shard_id: args.shard_id,
                    count: args.count,
                }
            }
            Command::Decode { id } => {
                if id < 0 && args.format == Format::Sonyflake {
                    bail!("{id} is not a sonyflake ID: the sign bit is always clear");
                }
                Action::Decode { id }
            }
        };

        Ok(Self {
            format: args.format,
            action,
        })
    }
}
