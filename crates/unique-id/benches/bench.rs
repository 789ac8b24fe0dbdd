use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};
use unique_id::{
    AtomicSequence, FieldLayout, FieldSpec, FormatPolicy, IdGenerator, Instagram, MonotonicClock,
    SnowflakeAssembler, Sonyflake, TimeSource,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource<u64> for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

fn benchmark_assemble(c: &mut Criterion) {
    let layout = FieldLayout::new(64, [41, 13, 10]).unwrap();
    let specs = [
        FieldSpec::new(41, 123_456),
        FieldSpec::new(13, 42),
        FieldSpec::new(10, 7),
    ];

    let mut group = c.benchmark_group("assemble");
    group.throughput(Throughput::Elements(1));
    group.bench_function("layout", |b| {
        b.iter(|| SnowflakeAssembler::assemble(black_box(&layout), black_box(&[123_456, 42, 7])))
    });
    group.bench_function("layout/checked", |b| {
        b.iter(|| {
            SnowflakeAssembler::assemble_checked(black_box(&layout), black_box(&[123_456, 42, 7]))
        })
    });
    group.bench_function("specs", |b| {
        b.iter(|| SnowflakeAssembler::assemble_specs(64, black_box(&specs)))
    });
    group.finish();
}

/// Benchmarks a single generator on one thread.
fn bench_generator<P, T>(c: &mut Criterion, group_name: &str, time_fn: impl Fn() -> T)
where
    P: FormatPolicy,
    T: TimeSource<u64>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = IdGenerator::<P, _, _>::new(
                    1,
                    time_fn(),
                    AtomicSequence::for_width(<P::Id as unique_id::PackedId>::SEQUENCE_BITS),
                )
                .unwrap();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one generator shared across threads.
fn bench_generator_contended<P, T>(c: &mut Criterion, group_name: &str, time_fn: impl Fn() -> T)
where
    P: FormatPolicy,
    T: TimeSource<u64> + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{}/threads/{}", TOTAL_IDS, thread_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let generator = Arc::new(
                            IdGenerator::<P, _, _>::new(
                                1,
                                time_fn(),
                                AtomicSequence::for_width(
                                    <P::Id as unique_id::PackedId>::SEQUENCE_BITS,
                                ),
                            )
                            .unwrap(),
                        );
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = Arc::clone(&generator);
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        // Sequences wrap, so ids may repeat here; only
                                        // throughput is measured.
                                        black_box(generator.next_id().unwrap());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

fn instagram_mock() -> FixedMockTime {
    FixedMockTime {
        millis: Instagram::epoch_millis() + 1,
    }
}

fn sonyflake_mock() -> FixedMockTime {
    FixedMockTime {
        millis: Sonyflake::epoch_millis() + 10,
    }
}

fn benchmark_mock_sequential_instagram(c: &mut Criterion) {
    bench_generator::<Instagram, _>(c, "mock/sequential/instagram", instagram_mock);
}

fn benchmark_mock_sequential_sonyflake(c: &mut Criterion) {
    bench_generator::<Sonyflake, _>(c, "mock/sequential/sonyflake", sonyflake_mock);
}

fn benchmark_mock_contended_instagram(c: &mut Criterion) {
    bench_generator_contended::<Instagram, _>(c, "mock/contended/instagram", instagram_mock);
}

fn benchmark_mono_sequential_instagram(c: &mut Criterion) {
    bench_generator::<Instagram, _>(c, "mono/sequential/instagram", MonotonicClock::default);
}

fn benchmark_mono_contended_sonyflake(c: &mut Criterion) {
    bench_generator_contended::<Sonyflake, _>(
        c,
        "mono/contended/sonyflake",
        MonotonicClock::default,
    );
}

criterion_group!(
    benches,
    benchmark_assemble,
    // Mock clock
    benchmark_mock_sequential_instagram,
    benchmark_mock_sequential_sonyflake,
    benchmark_mock_contended_instagram,
    // Monotonic clock
    benchmark_mono_sequential_instagram,
    benchmark_mono_contended_sonyflake,
);
criterion_main!(benches);
