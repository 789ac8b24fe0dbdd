use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Instant, SystemTime},
};

use crate::{
    error::{Error, Result},
    time::{TimeSource, UNIX_EPOCH},
};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    current: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A monotonic time source that returns elapsed time since process start,
/// offset from a user-defined epoch.
///
/// This avoids wall-clock adjustments (e.g., NTP or daylight savings changes)
/// while still aligning timestamps to a fixed origin.
///
/// The default origin is the Unix epoch, which is what format policies expect:
/// they subtract their own epoch from the reading.
///
/// Clones share one ticker thread. The thread exits once the last clone is
/// dropped.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    epoch_offset: u64, // in milliseconds
}

impl Default for MonotonicClock {
    /// Constructs a monotonic clock aligned to the Unix epoch.
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock reporting milliseconds since the Unix
    /// epoch.
    ///
    /// A system clock set before 1970 starts the count at zero.
    pub fn new() -> Self {
        let offset = Self::system_millis_since(UNIX_EPOCH).unwrap_or(0);
        Self::start(offset)
    }

    /// Constructs a monotonic clock using a custom epoch as the origin (t = 0),
    /// specified as a [`Duration`] since the Unix epoch.
    ///
    /// The offset between the wall clock and `epoch` is captured once. From
    /// then on a background thread advances a shared counter once per
    /// millisecond using [`Instant`], so readings never go backward even if
    /// the system clock is adjusted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockBeforeEpoch`] if the system clock reads earlier
    /// than `epoch`.
    ///
    /// # Example
    ///
    /// ```
    /// use unique_id::time::{MonotonicClock, TimeSource, INSTAGRAM_EPOCH};
    ///
    /// let clock = MonotonicClock::with_epoch(INSTAGRAM_EPOCH).unwrap();
    /// let ts: u64 = clock.current_millis();
    /// assert!(ts > 0);
    /// ```
    pub fn with_epoch(epoch: Duration) -> Result<Self> {
        let offset = Self::system_millis_since(epoch)?;
        Ok(Self::start(offset))
    }

    fn system_millis_since(epoch: Duration) -> Result<u64> {
        let system_now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        system_now
            .checked_sub(epoch)
            .map(|elapsed| elapsed.as_millis() as u64)
            .ok_or(Error::ClockBeforeEpoch {
                now_millis: system_now.as_millis() as u64,
                epoch_millis: epoch.as_millis() as u64,
            })
    }

    fn start(epoch_offset: u64) -> Self {
        let start = Instant::now();
        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Compute the absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                // Sleep if we are early
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = start.elapsed().as_millis() as u64;
                inner_ref.current.store(now_ms, Ordering::Relaxed);

                // Align to next tick after the current actual time
                tick = now_ms + 1;
            }
        });

        // Freshly created, so the cell is always empty here.
        let _ = inner._handle.set(handle);

        Self {
            inner,
            epoch_offset,
        }
    }
}

impl TimeSource<u64> for MonotonicClock {
    /// Returns the number of milliseconds since the configured epoch, based on
    /// the elapsed monotonic time since construction.
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.inner.current.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{INSTAGRAM_EPOCH, SONYFLAKE_EPOCH};

    #[test]
    fn readings_never_go_backward() {
        let clock = MonotonicClock::new();
        let mut last = clock.current_millis();
        for _ in 0..1000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn advances_over_time() {
        let clock = MonotonicClock::new();
        let before = clock.current_millis();
        thread::sleep(Duration::from_millis(20));
        assert!(clock.current_millis() > before);
    }

    #[test]
    fn custom_epoch_shifts_origin() {
        let unix = MonotonicClock::new();
        let instagram = MonotonicClock::with_epoch(INSTAGRAM_EPOCH).unwrap();
        let delta = unix.current_millis() - instagram.current_millis();
        let expected = INSTAGRAM_EPOCH.as_millis() as u64;
        // Both clocks tick independently, allow a little skew.
        assert!(delta.abs_diff(expected) < 1_000);

        assert!(MonotonicClock::with_epoch(SONYFLAKE_EPOCH).is_ok());
    }

    #[test]
    fn epoch_in_the_future_is_rejected() {
        let far_future = Duration::from_secs(u64::from(u32::MAX) * 100);
        let err = MonotonicClock::with_epoch(far_future).unwrap_err();
        assert!(matches!(err, Error::ClockBeforeEpoch { .. }));
    }

    #[test]
    fn clones_share_the_ticker() {
        let clock = MonotonicClock::new();
        let clone = clock.clone();
        assert!(Arc::ptr_eq(&clock.inner, &clone.inner));
    }
}
