use core::num::NonZeroU64;

use portable_atomic::{AtomicU64, Ordering};

use crate::sequence::SequenceSource;

/// A lock-free counter that wraps at a fixed modulus.
///
/// Values run `start, start + 1, ..., modulus - 1, 0, 1, ...`. Concurrent
/// callers always receive distinct values until the counter completes a full
/// cycle, so as long as fewer than `modulus` IDs are drawn per tick every ID
/// in that tick is unique.
///
/// The modulus is capped at `2^63` so every value fits an `i64`.
///
/// # Example
///
/// ```
/// use unique_id::sequence::{AtomicSequence, SequenceSource};
///
/// let seq = AtomicSequence::for_width(2);
/// let values: Vec<i64> = (0..6).map(|_| seq.next_value()).collect();
/// assert_eq!(values, vec![0, 1, 2, 3, 0, 1]);
/// ```
#[derive(Debug)]
pub struct AtomicSequence {
    next: AtomicU64,
    modulus: u64,
}

impl AtomicSequence {
    const MAX_MODULUS: u64 = 1 << 63;

    /// Creates a counter starting at zero that wraps at `modulus`.
    pub fn new(modulus: NonZeroU64) -> Self {
        Self::starting_at(0, modulus)
    }

    /// Creates a counter that wraps at `2^bits`, i.e. one that always fits a
    /// field of `bits` bits. Widths above 63 are treated as 63.
    pub fn for_width(bits: u32) -> Self {
        let modulus = 1u64 << bits.min(63);
        Self::starting_at(0, NonZeroU64::MIN.saturating_add(modulus - 1))
    }

    /// Creates a counter whose first value is `start % modulus`.
    ///
    /// Useful for resuming a counter after a restart.
    pub fn starting_at(start: u64, modulus: NonZeroU64) -> Self {
        let modulus = modulus.get().min(Self::MAX_MODULUS);
        Self {
            next: AtomicU64::new(start % modulus),
            modulus,
        }
    }

    /// The wrap-around point of this counter.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// The value the next call to [`SequenceSource::next_value`] returns.
    pub fn peek(&self) -> i64 {
        self.next.load(Ordering::Acquire) as i64
    }
}

impl SequenceSource for AtomicSequence {
    fn next_value(&self) -> i64 {
        let modulus = self.modulus;
        let current = match self
            .next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| {
                Some((v + 1) % modulus)
            }) {
            Ok(prev) | Err(prev) => prev,
        };
        current as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashSet, sync::Mutex, thread::scope};

    #[test]
    fn wraps_at_field_width() {
        let seq = AtomicSequence::for_width(10);
        assert_eq!(seq.modulus(), 1024);

        for expected in 0..1024 {
            assert_eq!(seq.next_value(), expected);
        }
        assert_eq!(seq.next_value(), 0);
    }

    #[test]
    fn starting_point_is_reduced_by_modulus() {
        let seq = AtomicSequence::starting_at(1030, NonZeroU64::new(1024).unwrap());
        assert_eq!(seq.peek(), 6);
        assert_eq!(seq.next_value(), 6);
        assert_eq!(seq.peek(), 7);
    }

    #[test]
    fn modulus_of_one_always_yields_zero() {
        let seq = AtomicSequence::new(NonZeroU64::MIN);
        assert_eq!(seq.next_value(), 0);
        assert_eq!(seq.next_value(), 0);
    }

    #[test]
    fn wide_counters_stay_non_negative() {
        let seq = AtomicSequence::starting_at(u64::MAX, NonZeroU64::MAX);
        assert_eq!(seq.modulus(), 1 << 63);
        assert!(seq.next_value() >= 0);

        let seq = AtomicSequence::for_width(64);
        assert_eq!(seq.modulus(), 1 << 63);
    }

    #[test]
    fn concurrent_callers_get_distinct_values() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 1000;

        let seq = AtomicSequence::for_width(16);
        let seen = Mutex::new(HashSet::new());

        scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    let mut local = Vec::with_capacity(PER_THREAD);
                    for _ in 0..PER_THREAD {
                        local.push(seq.next_value());
                    }
                    let mut seen = seen.lock().unwrap();
                    for value in local {
                        assert!(seen.insert(value), "duplicate sequence value {value}");
                    }
                });
            }
        });

        assert_eq!(seen.into_inner().unwrap().len(), THREADS * PER_THREAD);
    }
}
