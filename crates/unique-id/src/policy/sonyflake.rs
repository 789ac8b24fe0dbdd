use core::time::Duration;
use std::sync::LazyLock;

use crate::{
    id::{Component, SonyflakeId},
    layout::FieldLayout,
    policy::FormatPolicy,
    time::SONYFLAKE_EPOCH,
};

/// Sony's Sonyflake format.
///
/// `timestamp | sequence | shard ID` in 63 bits, leaving the sign bit clear.
/// The timestamp counts milliseconds since [`SONYFLAKE_EPOCH`], the same unit
/// as [`Instagram`]. 39 bits of milliseconds run out around 2031-12.
///
/// Note the field order differs from [`Instagram`]: within one tick IDs sort
/// by sequence first and by shard ID last.
///
/// The sequence source should wrap at 256 (see
/// [`AtomicSequence::for_width`]).
///
/// [`Instagram`]: crate::policy::Instagram
/// [`AtomicSequence::for_width`]: crate::sequence::AtomicSequence::for_width
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sonyflake;

impl FormatPolicy for Sonyflake {
    type Id = SonyflakeId;

    const NAME: &'static str = "sonyflake";
    const EPOCH: Duration = SONYFLAKE_EPOCH;
    const TICK: Duration = Duration::from_millis(1);
    const ORDER: [Component; 3] = [Component::Timestamp, Component::Sequence, Component::ShardId];

    fn layout() -> &'static FieldLayout {
        static LAYOUT: LazyLock<FieldLayout> = LazyLock::new(|| {
            Sonyflake::build_layout().expect("39 + 8 + 16 bits fill the 63-bit Sonyflake layout")
        });
        &LAYOUT
    }
}
