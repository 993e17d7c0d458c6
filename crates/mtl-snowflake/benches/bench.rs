use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use mtl_snowflake::{Settings, TimeSource, TimelineGenerator};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    nanos: i64,
}

impl TimeSource for FixedMockTime {
    fn now_nanos(&self) -> i64 {
        self.nanos
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

fn layout(node_bits: u8, seq_bits: u8) -> Settings {
    Settings::default()
        .with_time_bits(41)
        .with_node_bits(node_bits)
        .with_timeline_bits(1)
        .with_seq_bits(seq_bits)
}

/// Benchmarks the hot path where every ID lands in the same time unit and the
/// sequence never wraps.
fn bench_hot_path(c: &mut Criterion, group_name: &str, settings: Settings) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let nanos = settings.nanos_of(1_000);
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator =
                    TimelineGenerator::with_time_source(0, settings, FixedMockTime { nanos })
                        .unwrap();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.generate().unwrap());
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks the system clock, including sequence-exhaustion waits.
fn bench_wall_clock(c: &mut Criterion, group_name: &str, settings: Settings) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let generator = TimelineGenerator::with_settings(0, settings).unwrap();
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.generate().unwrap());
            }
        });
    });

    group.finish();
}

/// Benchmarks lock contention with several threads sharing one generator.
fn bench_contended(c: &mut Criterion, group_name: &str, settings: Settings) {
    let mut group = c.benchmark_group(group_name);

    for threads in [2, 4, 8] {
        group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{threads}"), |b| {
            b.iter_custom(|iters| {
                let generator = TimelineGenerator::with_settings(0, settings).unwrap();
                let barrier = Arc::new(Barrier::new(threads + 1));
                let start = Instant::now();
                scope(|s| {
                    for _ in 0..threads {
                        let generator = generator.clone();
                        let barrier = Arc::clone(&barrier);
                        s.spawn(move || {
                            barrier.wait();
                            for _ in 0..iters {
                                for _ in 0..TOTAL_IDS {
                                    black_box(generator.generate().unwrap());
                                }
                            }
                        });
                    }
                    barrier.wait();
                });
                start.elapsed()
            });
        });
    }

    group.finish();
}

fn benchmarks(c: &mut Criterion) {
    bench_hot_path(c, "hot/seq12", layout(9, 12));
    bench_hot_path(c, "hot/seq14", layout(7, 14));
    bench_hot_path(c, "hot/seq21", layout(0, 21));

    bench_wall_clock(c, "wall/seq12", layout(9, 12));
    bench_wall_clock(c, "wall/seq14", layout(7, 14));
    bench_wall_clock(c, "wall/seq21", layout(0, 21));

    bench_contended(c, "contended/seq12", layout(9, 12));
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
