use std::time::SystemTime;

use crate::time::TimeSource;

/// A wall-clock time source reading [`SystemTime`] on every call.
///
/// Unlike [`MonotonicClock`] this follows system clock adjustments, so it can
/// step backwards. It suits hosts that already guarantee a sane clock and do
/// not want a background ticker thread, such as a database backend.
///
/// Reports milliseconds since the Unix epoch, or zero if the system clock is
/// set before 1970.
///
/// [`MonotonicClock`]: crate::time::MonotonicClock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource<u64> for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::INSTAGRAM_EPOCH;

    #[test]
    fn reads_after_instagram_epoch() {
        let now = SystemClock.current_millis();
        assert!(now > INSTAGRAM_EPOCH.as_millis() as u64);
    }
}
