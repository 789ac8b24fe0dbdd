use core::time::Duration;

/// Unix epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH: Duration = Duration::ZERO;

/// Instagram sharding epoch: Wednesday, August 24, 2011 21:07:01.721 UTC
pub const INSTAGRAM_EPOCH: Duration = Duration::from_millis(1_314_220_021_721);

/// Sonyflake epoch: Monday, September 1, 2014 00:00:00 UTC
pub const SONYFLAKE_EPOCH: Duration = Duration::from_secs(1_409_529_600);

/// A trait for time sources that return a monotonic or wall-clock timestamp.
///
/// This abstraction allows you to plug in a real system clock, a monotonic
/// timer, or a mocked time source in tests.
///
/// The timestamp type `T` is generic (typically `u64`), and the unit is
/// expected to be **milliseconds** relative to a configurable origin. Format
/// policies expect an origin of [`UNIX_EPOCH`] and subtract their own epoch.
///
/// Implementations shared between threads must be safe to call concurrently,
/// and must never report a smaller value after a larger one was observed.
///
/// # Example
///
/// ```
/// use unique_id::time::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> T;
}

impl<T, S> TimeSource<T> for &S
where
    S: TimeSource<T> + ?Sized,
{
    fn current_millis(&self) -> T {
        (**self).current_millis()
    }
}
