use core::{fmt, hash::Hash};

/// Logical role of one field within a packed ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    /// Ticks elapsed since the format's epoch.
    Timestamp,
    /// Identifier of the generator instance.
    ShardId,
    /// Per-tick counter.
    Sequence,
}

/// A packed ID with timestamp, shard and sequence fields.
///
/// Types implementing this trait fix the width and position of each
/// component at compile time. The raw value is a signed 64-bit integer so
/// it can be stored as-is in `bigint` columns.
///
/// # Example
///
/// ```
/// use unique_id::id::{InstagramId, PackedId};
///
/// let id = InstagramId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.shard_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// ```
pub trait PackedId:
    Sized + Copy + Clone + fmt::Display + fmt::Debug + PartialOrd + Ord + PartialEq + Eq + Hash
{
    /// Width of the whole ID in bits.
    const TOTAL_BITS: u32;

    /// Width of the timestamp field.
    const TIMESTAMP_BITS: u32;

    /// Width of the shard field.
    const SHARD_ID_BITS: u32;

    /// Width of the sequence field.
    const SEQUENCE_BITS: u32;

    /// Returns the timestamp portion of the ID.
    fn timestamp(&self) -> i64;

    /// Returns the shard ID portion of the ID.
    fn shard_id(&self) -> i64;

    /// Returns the sequence portion of the ID.
    fn sequence(&self) -> i64;

    /// Builds an ID from its components, masking each to its field.
    fn from_components(timestamp: i64, shard_id: i64, sequence: i64) -> Self;

    /// Converts this type into its raw integer representation.
    fn to_raw(&self) -> i64;

    /// Converts a raw integer into this type.
    fn from_raw(raw: i64) -> Self;

    /// Width of the field holding `component`.
    fn width(component: Component) -> u32 {
        match component {
            Component::Timestamp => Self::TIMESTAMP_BITS,
            Component::ShardId => Self::SHARD_ID_BITS,
            Component::Sequence => Self::SEQUENCE_BITS,
        }
    }

    /// Largest value the timestamp field can hold.
    fn max_timestamp() -> i64 {
        (1 << Self::TIMESTAMP_BITS) - 1
    }

    /// Largest value the shard field can hold.
    fn max_shard_id() -> i64 {
        (1 << Self::SHARD_ID_BITS) - 1
    }

    /// Largest value the sequence field can hold.
    fn max_sequence() -> i64 {
        (1 << Self::SEQUENCE_BITS) - 1
    }
}
