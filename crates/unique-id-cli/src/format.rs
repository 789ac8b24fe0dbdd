use core::fmt;
use std::{io::Write, thread};

use clap::ValueEnum;
use unique_id::{
    AtomicSequence, FormatPolicy, IdGenerator, Instagram, InstagramId, MonotonicClock, PackedId,
    Sonyflake, SonyflakeId,
};

/// ID layouts selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Instagram,
    Sonyflake,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Self::Instagram => Instagram::NAME,
            Self::Sonyflake => Sonyflake::NAME,
        }
    }

    pub fn max_shard_id(self) -> i64 {
        match self {
            Self::Instagram => InstagramId::max_shard_id(),
            Self::Sonyflake => SonyflakeId::max_shard_id(),
        }
    }

    pub fn generate(self, shard_id: i64, count: usize, out: &mut impl Write) -> anyhow::Result<()> {
        match self {
            Self::Instagram => generate::<Instagram>(shard_id, count, out),
            Self::Sonyflake => generate::<Sonyflake>(shard_id, count, out),
        }
    }

    pub fn decode(self, raw: i64, out: &mut impl Write) -> anyhow::Result<()> {
        match self {
            Self::Instagram => decode::<Instagram>(raw, out),
            Self::Sonyflake => decode::<Sonyflake>(raw, out),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Writes `count` strictly increasing IDs, one per line.
///
/// The sequence counter wraps at the width of its field, so a burst larger
/// than one tick's worth of sequence values waits for the clock to advance.
fn generate<P: FormatPolicy>(
    shard_id: i64,
    count: usize,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let generator = IdGenerator::<P, _, _>::new(
        shard_id,
        MonotonicClock::default(),
        AtomicSequence::for_width(<P::Id as PackedId>::SEQUENCE_BITS),
    )?;

    let mut last: Option<P::Id> = None;
    let mut emitted = 0;
    let mut stalls: u64 = 0;
    while emitted < count {
        let id = generator.next_id()?;
        if last.is_some_and(|last| id <= last) {
            stalls += 1;
            thread::yield_now();
            continue;
        }
        writeln!(out, "{id}")?;
        last = Some(id);
        emitted += 1;
    }

    tracing::debug!(format = P::NAME, shard_id, count, stalls, "generated ids");
    Ok(())
}

fn decode<P: FormatPolicy>(raw: i64, out: &mut impl Write) -> anyhow::Result<()> {
    let id = <P::Id as PackedId>::from_raw(raw);
    writeln!(out, "id:        {raw}")?;
    writeln!(out, "format:    {}", P::NAME)?;
    writeln!(out, "timestamp: {}", id.timestamp())?;
    writeln!(out, "shard_id:  {}", id.shard_id())?;
    writeln!(out, "sequence:  {}", id.sequence())?;
    writeln!(out, "unix_ms:   {}", P::unix_millis(id.timestamp()))?;
    Ok(())
}
