use core::{cell::Cell, num::NonZeroU64};
use std::{collections::HashSet, sync::Mutex, thread::scope};

use crate::{
    error::Error,
    generator::{IdGenerator, generate_instagram_id, generate_sonyflake_id},
    id::{InstagramId, SonyflakeId},
    policy::{FormatPolicy, Instagram, Sonyflake},
    sequence::{AtomicSequence, SequenceRegistry, SequenceSource},
    time::{INSTAGRAM_EPOCH, MonotonicClock, SONYFLAKE_EPOCH, TimeSource},
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource<u64> for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

fn instagram_time(offset: u64) -> FixedMockTime {
    FixedMockTime {
        millis: INSTAGRAM_EPOCH.as_millis() as u64 + offset,
    }
}

fn sonyflake_time(offset: u64) -> FixedMockTime {
    FixedMockTime {
        millis: SONYFLAKE_EPOCH.as_millis() as u64 + offset,
    }
}

#[test]
fn rejects_shard_id_at_construction() {
    let err = IdGenerator::<Instagram, _, _>::new(
        8192,
        instagram_time(0),
        AtomicSequence::for_width(10),
    )
    .unwrap_err();
    assert!(matches!(err, Error::FieldOverflow { index: 1, .. }));

    let err = IdGenerator::<Sonyflake, _, _>::new(
        65_536,
        sonyflake_time(0),
        AtomicSequence::for_width(8),
    )
    .unwrap_err();
    assert!(matches!(err, Error::FieldOverflow { index: 2, .. }));

    assert!(
        IdGenerator::<Sonyflake, _, _>::new(65_535, sonyflake_time(0), AtomicSequence::for_width(8))
            .is_ok()
    );
}

#[test]
fn next_id_draws_sequence_values_in_order() {
    let generator =
        IdGenerator::<Instagram, _, _>::new(9, instagram_time(77), AtomicSequence::for_width(10))
            .unwrap();

    for expected in 0..5 {
        let id = generator.next_id().unwrap();
        assert_eq!(id.timestamp(), 77);
        assert_eq!(id.shard_id(), 9);
        assert_eq!(id.sequence(), expected);
    }
    assert_eq!(generator.shard_id(), 9);
    assert_eq!(generator.sequence().peek(), 5);
}

#[test]
fn sequence_wraps_within_its_field() {
    let generator =
        IdGenerator::<Sonyflake, _, _>::new(1, sonyflake_time(0), AtomicSequence::for_width(8))
            .unwrap();

    let ids: Vec<SonyflakeId> = (0..257).map(|_| generator.next_id().unwrap()).collect();
    assert_eq!(ids[255].sequence(), 255);
    assert_eq!(ids[256].sequence(), 0);
    assert!(ids.iter().all(|id| id.shard_id() == 1));
}

#[test]
fn free_functions_return_raw_integers() {
    let sequence = AtomicSequence::for_width(10);
    let raw = generate_instagram_id(&instagram_time(1), &sequence, 1).unwrap();
    // First draw is sequence 0.
    assert_eq!(raw, (1 << 23) | (1 << 10));
    assert_eq!(InstagramId::from_raw(raw).timestamp(), 1);

    let sequence = AtomicSequence::for_width(8);
    let raw = generate_sonyflake_id(&sonyflake_time(25), &sequence, 3).unwrap();
    assert_eq!(raw, (25 << 24) | 3);
    assert_eq!(SonyflakeId::from_raw(raw).timestamp(), 25);
}

#[test]
fn free_functions_accept_trait_objects() {
    let time: &dyn TimeSource<u64> = &instagram_time(4);
    let counter = Cell::new(0_i64);
    let next = || {
        let value = counter.get();
        counter.set(value + 1);
        value
    };

    let first = generate_instagram_id(time, &next, 0).unwrap();
    let second = generate_instagram_id(time, &next, 0).unwrap();
    assert_eq!(second - first, 1);
}

#[test]
fn free_functions_propagate_errors() {
    let sequence = AtomicSequence::for_width(10);
    let before = FixedMockTime { millis: 0 };
    assert!(matches!(
        generate_instagram_id(&before, &sequence, 0).unwrap_err(),
        Error::ClockBeforeEpoch { .. }
    ));
    assert!(matches!(
        generate_sonyflake_id(&before, &sequence, 0).unwrap_err(),
        Error::ClockBeforeEpoch { .. }
    ));
}

#[test]
fn shared_generator_is_unique_across_threads() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 100;

    // 800 draws stay below the 1024 sequence values of one tick.
    let generator =
        IdGenerator::<Instagram, _, _>::new(5, instagram_time(10), AtomicSequence::for_width(10))
            .unwrap();
    let seen = Mutex::new(HashSet::new());

    scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                let ids: Vec<_> = (0..PER_THREAD)
                    .map(|_| generator.next_id().unwrap())
                    .collect();
                let mut seen = seen.lock().unwrap();
                for id in ids {
                    assert!(seen.insert(id), "duplicate id {id:?}");
                }
            });
        }
    });

    assert_eq!(seen.lock().unwrap().len(), THREADS * PER_THREAD);
}

#[test]
fn generators_share_a_registry_counter() {
    let registry = SequenceRegistry::new();
    let modulus = NonZeroU64::new(1024).unwrap();
    let counter = |name| {
        let counter = registry.get_or_create(name, modulus).unwrap();
        move || counter.next_value()
    };

    let a = IdGenerator::<Instagram, _, _>::new(1, instagram_time(0), counter("orders")).unwrap();
    let b = IdGenerator::<Instagram, _, _>::new(2, instagram_time(0), counter("orders")).unwrap();

    assert_eq!(a.next_id().unwrap().sequence(), 0);
    assert_eq!(b.next_id().unwrap().sequence(), 1);
    assert_eq!(a.next_id().unwrap().sequence(), 2);
    assert_eq!(registry.len().unwrap(), 1);
}

#[test]
fn monotonic_clock_produces_recent_ids() {
    let generator = IdGenerator::<Sonyflake, _, _>::new(
        42,
        MonotonicClock::default(),
        AtomicSequence::for_width(8),
    )
    .unwrap();

    let id = generator.next_id().unwrap();
    let now = generator.time().current_millis();
    let millis = Sonyflake::unix_millis(id.timestamp());
    assert!(millis <= now);
    assert!(now - millis < 1_000);
    assert_eq!(id.shard_id(), 42);
}

#[test]
fn debug_names_the_format() {
    let generator =
        IdGenerator::<Instagram, _, _>::new(3, instagram_time(0), AtomicSequence::for_width(10))
            .unwrap();
    let debug = format!("{generator:?}");
    assert!(debug.contains("instagram"));
    assert!(debug.contains("shard_id: 3"));
}
