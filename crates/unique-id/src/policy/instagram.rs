use core::time::Duration;
use std::sync::LazyLock;

use crate::{
    id::{Component, InstagramId},
    layout::FieldLayout,
    policy::FormatPolicy,
    time::INSTAGRAM_EPOCH,
};

/// Instagram's sharding ID format (inspired by Twitter's Snowflake).
///
/// `timestamp | shard ID | sequence` in 64 bits, with millisecond ticks since
/// [`INSTAGRAM_EPOCH`]. IDs sort by creation time, then shard, then
/// intra-millisecond sequence.
///
/// The sequence source should wrap at 1024 (see
/// [`AtomicSequence::for_width`]).
///
/// # Example
///
/// ```
/// use unique_id::{
///     id::PackedId,
///     policy::{FormatPolicy, Instagram},
///     sequence::AtomicSequence,
///     time::SystemClock,
/// };
///
/// let sequence = AtomicSequence::for_width(10);
/// let id = Instagram::generate(&SystemClock, &sequence, 5).unwrap();
/// assert_eq!(id.shard_id(), 5);
/// assert_eq!(id.sequence(), 0);
/// ```
///
/// [`AtomicSequence::for_width`]: crate::sequence::AtomicSequence::for_width
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Instagram;

impl FormatPolicy for Instagram {
    type Id = InstagramId;

    const NAME: &'static str = "instagram";
    const EPOCH: Duration = INSTAGRAM_EPOCH;
    const TICK: Duration = Duration::from_millis(1);
    const ORDER: [Component; 3] = [Component::Timestamp, Component::ShardId, Component::Sequence];

    fn layout() -> &'static FieldLayout {
        static LAYOUT: LazyLock<FieldLayout> = LazyLock::new(|| {
            Instagram::build_layout().expect("41 + 13 + 10 bits fill the 64-bit Instagram layout")
        });
        &LAYOUT
    }
}
