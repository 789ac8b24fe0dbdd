use core::{fmt, marker::PhantomData};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::Result,
    policy::{FormatPolicy, Instagram, Sonyflake},
    sequence::SequenceSource,
    time::TimeSource,
};

/// An ID generator bound to one format, clock, sequence and shard.
///
/// The generator holds no mutable state of its own: uniqueness comes from the
/// sequence source and ordering from the clock. It is `Sync` whenever both
/// collaborators are, so one instance can serve many threads.
///
/// # Example
///
/// ```
/// use unique_id::{
///     generator::IdGenerator,
///     policy::Instagram,
///     sequence::AtomicSequence,
///     time::MonotonicClock,
/// };
///
/// let generator = IdGenerator::<Instagram, _, _>::new(
///     12,
///     MonotonicClock::default(),
///     AtomicSequence::for_width(10),
/// )
/// .unwrap();
///
/// let a = generator.next_id().unwrap();
/// let b = generator.next_id().unwrap();
/// assert_ne!(a, b);
/// assert_eq!(a.shard_id(), 12);
/// ```
pub struct IdGenerator<P, T, S>
where
    P: FormatPolicy,
    T: TimeSource<u64>,
    S: SequenceSource,
{
    shard_id: i64,
    time: T,
    sequence: S,
    _policy: PhantomData<fn() -> P>,
}

impl<P, T, S> IdGenerator<P, T, S>
where
    P: FormatPolicy,
    T: TimeSource<u64>,
    S: SequenceSource,
{
    /// Creates a generator for `shard_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOverflow`] if `shard_id` does not fit the
    /// policy's shard field.
    ///
    /// [`Error::FieldOverflow`]: crate::error::Error::FieldOverflow
    pub fn new(shard_id: i64, time: T, sequence: S) -> Result<Self> {
        P::check_shard_id(shard_id)?;
        Ok(Self {
            shard_id,
            time,
            sequence,
            _policy: PhantomData,
        })
    }

    /// Generates the next ID.
    ///
    /// # Errors
    ///
    /// See [`FormatPolicy::generate`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(format = P::NAME, shard_id = self.shard_id)))]
    pub fn next_id(&self) -> Result<P::Id> {
        P::generate(&self.time, &self.sequence, self.shard_id)
    }

    pub fn shard_id(&self) -> i64 {
        self.shard_id
    }

    pub fn time(&self) -> &T {
        &self.time
    }

    pub fn sequence(&self) -> &S {
        &self.sequence
    }
}

impl<P, T, S> fmt::Debug for IdGenerator<P, T, S>
where
    P: FormatPolicy,
    T: TimeSource<u64>,
    S: SequenceSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("format", &P::NAME)
            .field("shard_id", &self.shard_id)
            .finish_non_exhaustive()
    }
}

/// Generates an Instagram-layout ID as a raw `i64`.
///
/// `time` must report milliseconds since the Unix epoch and `sequence` should
/// wrap at 1024. `shard_id` must be in `0..=8191`.
///
/// # Errors
///
/// See [`FormatPolicy::generate`].
pub fn generate_instagram_id<T, S>(time: &T, sequence: &S, shard_id: i64) -> Result<i64>
where
    T: TimeSource<u64> + ?Sized,
    S: SequenceSource + ?Sized,
{
    Instagram::generate(time, sequence, shard_id).map(|id| id.to_raw())
}

/// Generates a Sonyflake-layout ID as a raw `i64`.
///
/// `time` must report milliseconds since the Unix epoch and `sequence` should
/// wrap at 256. `shard_id` must be in `0..=65535`.
///
/// # Errors
///
/// See [`FormatPolicy::generate`].
pub fn generate_sonyflake_id<T, S>(time: &T, sequence: &S, shard_id: i64) -> Result<i64>
where
    T: TimeSource<u64> + ?Sized,
    S: SequenceSource + ?Sized,
{
    Sonyflake::generate(time, sequence, shard_id).map(|id| id.to_raw())
}
