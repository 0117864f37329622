use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use fixedpool::ThreadPoolBuilder;
use rand::Rng;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// A CPU-bound task: compute the sum of a range.
fn cpu_task(n: u64) -> u64 {
    (0..n).sum()
}

fn prepare_sizes(n: usize) -> Vec<u64> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen_range(10..=1_000)).collect()
}

fn benchmark_fixed_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_pool");
    group.sample_size(10);

    let num_tasks = 10_000;

    for num_threads in [1, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("10k_tasks", num_threads),
            &num_threads,
            |b, &num_threads| {
                b.iter_batched(
                    || {
                        // Prepare a fresh pool and task sizes each iteration
                        let pool = ThreadPoolBuilder::new()
                            .num_threads(num_threads)
                            .build_started()
                            .unwrap();
                        (pool, prepare_sizes(num_tasks))
                    },
                    |(pool, sizes)| {
                        let sink = Arc::new(AtomicU64::new(0));
                        for n in sizes {
                            let sink = Arc::clone(&sink);
                            pool.submit(move || {
                                sink.fetch_add(cpu_task(n), Ordering::Relaxed);
                            })
                            .unwrap();
                        }
                        pool.shutdown();
                    },
                    BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

fn benchmark_concurrent_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_submit");
    group.sample_size(10);

    let producers = 8;
    let per_producer = 1_250;

    group.bench_function("8_producers_8_workers", |b| {
        b.iter_batched(
            || {
                ThreadPoolBuilder::new()
                    .num_threads(8)
                    .build_started()
                    .unwrap()
            },
            |pool| {
                crossbeam::thread::scope(|s| {
                    for _ in 0..producers {
                        let pool = &pool;
                        s.spawn(move |_| {
                            for _ in 0..per_producer {
                                pool.submit(|| {
                                    let _ = cpu_task(100);
                                })
                                .unwrap();
                            }
                        });
                    }
                })
                .unwrap();
                pool.shutdown();
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, benchmark_fixed_pool, benchmark_concurrent_submit);
criterion_main!(benches);
