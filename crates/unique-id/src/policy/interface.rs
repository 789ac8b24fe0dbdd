use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    assembler::SnowflakeAssembler,
    error::{Error, Result},
    id::{Component, PackedId},
    layout::FieldLayout,
    sequence::SequenceSource,
    time::TimeSource,
};

/// Raw component values before they are arranged into layout order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Components {
    /// Ticks elapsed since the policy epoch.
    pub timestamp: i64,
    /// Generator instance identifier.
    pub shard_id: i64,
    /// Per-tick counter value.
    pub sequence: i64,
}

impl Components {
    pub const fn new(timestamp: i64, shard_id: i64, sequence: i64) -> Self {
        Self {
            timestamp,
            shard_id,
            sequence,
        }
    }

    /// Returns the value for `component`.
    pub const fn get(&self, component: Component) -> i64 {
        match component {
            Component::Timestamp => self.timestamp,
            Component::ShardId => self.shard_id,
            Component::Sequence => self.sequence,
        }
    }
}

/// A concrete ID format: field widths and order, epoch, tick size, and the
/// recipe turning a clock reading, a shard ID and a sequence value into field
/// values.
///
/// Policies never pack bits themselves. They arrange values in layout order
/// and hand them to [`SnowflakeAssembler::assemble_checked`], so a value that
/// does not fit its field is reported instead of corrupting its neighbour.
///
/// The clock passed to [`FormatPolicy::generate`] must report milliseconds
/// since the Unix epoch; the policy converts that to ticks since its own
/// epoch with integer arithmetic.
pub trait FormatPolicy {
    /// The packed ID type this policy produces.
    type Id: PackedId;

    /// Short lowercase name of the format.
    const NAME: &'static str;

    /// Custom epoch, as a duration since the Unix epoch.
    const EPOCH: Duration;

    /// Length of one timestamp tick.
    const TICK: Duration;

    /// Field order, most significant first.
    const ORDER: [Component; 3];

    /// The validated layout of this format, built once per process.
    fn layout() -> &'static FieldLayout;

    /// Field widths in layout order.
    fn widths() -> [u32; 3] {
        Self::ORDER.map(<Self::Id as PackedId>::width)
    }

    /// Builds this format's layout from [`FormatPolicy::ORDER`] and the ID
    /// type's field widths.
    ///
    /// # Errors
    ///
    /// Fails like [`FieldLayout::new`] if the widths do not fill the ID.
    fn build_layout() -> Result<FieldLayout> {
        FieldLayout::new(<Self::Id as PackedId>::TOTAL_BITS, Self::widths())
    }

    /// Arranges component values into layout order.
    fn arrange(components: &Components) -> [i64; 3] {
        Self::ORDER.map(|component| components.get(component))
    }

    /// Epoch in milliseconds since the Unix epoch.
    fn epoch_millis() -> u64 {
        Self::EPOCH.as_millis() as u64
    }

    /// Tick length in milliseconds, never less than one.
    fn tick_millis() -> u64 {
        (Self::TICK.as_millis() as u64).max(1)
    }

    /// Converts a Unix millisecond reading to ticks since the policy epoch.
    ///
    /// Readings too large for `i64` saturate and are later rejected as a
    /// timestamp overflow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockBeforeEpoch`] if `now_millis` precedes the epoch.
    fn ticks_since_epoch(now_millis: u64) -> Result<i64> {
        let epoch_millis = Self::epoch_millis();
        let elapsed = now_millis
            .checked_sub(epoch_millis)
            .ok_or(Error::ClockBeforeEpoch {
                now_millis,
                epoch_millis,
            })?;
        Ok(i64::try_from(elapsed / Self::tick_millis()).unwrap_or(i64::MAX))
    }

    /// Converts a timestamp field back to milliseconds since the Unix epoch,
    /// rounded down to the tick.
    fn unix_millis(timestamp: i64) -> u64 {
        (timestamp.max(0) as u64)
            .saturating_mul(Self::tick_millis())
            .saturating_add(Self::epoch_millis())
    }

    /// Position of `component` in the layout.
    fn index_of(component: Component) -> usize {
        Self::ORDER
            .iter()
            .position(|&c| c == component)
            .unwrap_or_default()
    }

    /// Checks that `shard_id` fits this format's shard field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOverflow`] for a negative or oversized shard ID.
    fn check_shard_id(shard_id: i64) -> Result<()> {
        let max = <Self::Id as PackedId>::max_shard_id();
        if (0..=max).contains(&shard_id) {
            Ok(())
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!(format = Self::NAME, shard_id, max, "shard ID out of range");
            Err(Error::FieldOverflow {
                index: Self::index_of(Component::ShardId),
                value: shard_id,
                max,
            })
        }
    }

    /// Packs already-derived component values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOverflow`] if any component does not fit its
    /// field.
    fn pack(components: &Components) -> Result<Self::Id> {
        SnowflakeAssembler::assemble_checked(Self::layout(), &Self::arrange(components))
            .map(<Self::Id as PackedId>::from_raw)
    }

    /// Generates one ID from the current clock reading, the given shard ID and
    /// the next sequence value.
    ///
    /// The shard ID is validated before the sequence is advanced, so a
    /// rejected call does not consume a sequence value.
    ///
    /// # Errors
    ///
    /// - [`Error::FieldOverflow`] if the shard ID, the sequence value or the
    ///   elapsed ticks do not fit their fields
    /// - [`Error::ClockBeforeEpoch`] if the clock reads before the epoch
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(time, sequence), fields(format = Self::NAME))
    )]
    fn generate<T, S>(time: &T, sequence: &S, shard_id: i64) -> Result<Self::Id>
    where
        T: TimeSource<u64> + ?Sized,
        S: SequenceSource + ?Sized,
    {
        Self::check_shard_id(shard_id)?;
        let timestamp = Self::ticks_since_epoch(time.current_millis())?;
        let sequence = sequence.next_value();
        Self::pack(&Components::new(timestamp, shard_id, sequence))
    }
}
