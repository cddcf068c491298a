//! Criterion benchmarks for rust_logworker

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_logworker::prelude::*;
use std::sync::Arc;
use std::thread;

// ============================================================================
// Queue Benchmarks
// ============================================================================

fn bench_queue_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue");
    group.throughput(Throughput::Elements(1));

    let queue = BoundedQueue::<u64>::with_capacity(1024).unwrap();
    group.bench_function("push_pop", |b| {
        b.iter(|| {
            let _ = queue.push(black_box(42u64));
            black_box(queue.try_pop())
        });
    });

    let counted = BoundedQueue::<u64>::with_exact_count(1024).unwrap();
    group.bench_function("push_pop_exact_count", |b| {
        b.iter(|| {
            let _ = counted.push(black_box(42u64));
            black_box(counted.try_pop())
        });
    });

    group.finish();
}

fn bench_queue_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_contended");

    for producers in [1usize, 2, 4] {
        let per_producer = 10_000;
        group.throughput(Throughput::Elements((producers * per_producer) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(producers),
            &producers,
            |b, &producers| {
                b.iter(|| {
                    let queue = Arc::new(BoundedQueue::<usize>::with_capacity(4096).unwrap());
                    let handles: Vec<_> = (0..producers)
                        .map(|_| {
                            let queue = Arc::clone(&queue);
                            thread::spawn(move || {
                                for i in 0..per_producer {
                                    let mut item = i;
                                    while let Err(back) = queue.push(item) {
                                        item = back;
                                        thread::yield_now();
                                    }
                                }
                            })
                        })
                        .collect();

                    let mut received = 0;
                    while received < producers * per_producer {
                        if queue.try_pop().is_some() {
                            received += 1;
                        }
                    }
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Worker Benchmarks
// ============================================================================

fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit");
    group.throughput(Throughput::Elements(1));

    let worker = LogWorker::builder()
        .capacity(1 << 16)
        .overflow_policy(OverflowPolicy::DropNewest)
        .sink(FnSink::new("null", |m: &Message| {
            black_box(m);
        }))
        .build()
        .unwrap();

    group.bench_function("info", |b| {
        b.iter(|| worker.info(black_box("Info message")));
    });

    group.bench_function("filtered_trace", |b| {
        b.iter(|| worker.trace(black_box("Trace message")));
    });

    group.bench_function("formatted_macro", |b| {
        b.iter(|| rust_logworker::info!(worker, "request {} took {}ms", black_box(17), 3));
    });

    group.finish();
    worker.shutdown();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");

    for sinks in [1usize, 4, 8] {
        group.throughput(Throughput::Elements(1_000));
        group.bench_with_input(BenchmarkId::from_parameter(sinks), &sinks, |b, &sinks| {
            b.iter(|| {
                let mut builder = LogWorker::builder()
                    .capacity(1024)
                    .overflow_policy(OverflowPolicy::Block);
                for i in 0..sinks {
                    builder = builder.sink(FnSink::new(format!("sink{}", i), |m: &Message| {
                        black_box(m);
                    }));
                }
                let worker = builder.build().unwrap();
                for i in 0..1_000 {
                    worker.info(format!("message {}", i));
                }
                worker.shutdown();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_queue_push_pop,
    bench_queue_contended,
    bench_submit,
    bench_fan_out
);
criterion_main!(benches);
