/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `unique-id` can emit.
///
/// Every variant describes a misconfiguration or a broken caller contract
/// rather than a transient condition. None of them go away on retry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A field layout is malformed.
    #[error("invalid field layout: {0}")]
    Config(#[from] ConfigError),

    /// The declared width does not fit in a 64-bit container.
    #[error("layout declares {total_bits} bits but at most {max} fit in the container")]
    LayoutTooWide { total_bits: u32, max: u32 },

    /// The field widths do not add up to the declared width.
    #[error("expected {expected} bits but the fields add up to {actual}")]
    WidthMismatch { expected: u32, actual: u32 },

    /// A value is negative or wider than its field.
    ///
    /// Only raised by checked assembly. Permissive assembly lets the extra
    /// bits bleed into the neighbouring field instead.
    #[error("value {value} does not fit field {index} (allowed 0..={max})")]
    FieldOverflow { index: usize, value: i64, max: i64 },

    /// The clock reads earlier than the epoch of the format policy.
    #[error("clock reads {now_millis} ms, before the epoch at {epoch_millis} ms")]
    ClockBeforeEpoch { now_millis: u64, epoch_millis: u64 },

    /// The sequence registry lock was poisoned by a panicking thread.
    ///
    /// `parking_lot` mutexes do not poison, so this variant does not exist
    /// when the `parking-lot` feature is enabled.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("sequence registry lock poisoned")]
    LockPoisoned,
}

/// Structural problems found while building a [`FieldLayout`].
///
/// [`FieldLayout`]: crate::layout::FieldLayout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The layout has no fields at all.
    #[error("a layout needs at least one field")]
    NoFields,

    /// A field was declared with zero bits.
    #[error("field {index} has zero width")]
    ZeroWidth { index: usize },

    /// The number of values does not match the number of fields.
    #[error("layout has {expected} fields but {actual} values were supplied")]
    FieldCount { expected: usize, actual: usize },
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::{MutexGuard, PoisonError};

#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
