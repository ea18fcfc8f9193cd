//! Sorted column container benchmarks.

use colfam_bench::{shuffled_values, strided_row};
use colfam_core::{Column, HeapAllocator, ALL_COLUMNS};
use colfam_testkit::{int_cell, int_factory, name_int};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

/// Benchmark in-order appends against shuffled inserts.
fn bench_add_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_column");

    for count in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("sorted", count), count, |b, &count| {
            b.iter(|| {
                let mut row = int_factory().create(false);
                for v in 0..count as i32 {
                    row.add_column(int_cell(v), &HeapAllocator);
                }
                black_box(row);
            });
        });

        group.bench_with_input(BenchmarkId::new("shuffled", count), count, |b, &count| {
            let values = shuffled_values(count);
            b.iter(|| {
                let mut row = int_factory().create(false);
                for v in &values {
                    row.add_column(int_cell(*v), &HeapAllocator);
                }
                black_box(row);
            });
        });
    }

    group.finish();
}

/// Benchmark merging two interleaved rows.
fn bench_add_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_all");

    for count in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let evens = strided_row(count, 2, 0, false);
            let odds = strided_row(count, 2, 1, true);
            b.iter_batched(
                || evens.clone(),
                |mut row| {
                    row.add_all(&odds, &HeapAllocator);
                    black_box(row);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark removing every third column with both removal protocols.
fn bench_removal(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_every_third");

    for count in [100, 1000, 10000].iter() {
        let row = strided_row(*count, 1, 0, false);

        group.bench_with_input(BenchmarkId::new("immediate", count), &row, |b, row| {
            b.iter_batched(
                || row.clone(),
                |mut row| {
                    let mut iter = row.removal_iter();
                    while iter.has_next() {
                        let v = name_int(iter.next().unwrap().name());
                        if v % 3 == 0 {
                            iter.remove().unwrap();
                        }
                    }
                    drop(iter);
                    black_box(row);
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("batch", count), &row, |b, row| {
            b.iter_batched(
                || row.clone(),
                |mut row| {
                    row.retain(|c| name_int(c.name()) % 3 != 0).unwrap();
                    black_box(row);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark a full scan through the universal slice.
fn bench_scan(c: &mut Criterion) {
    let row = strided_row(10000, 1, 0, true);

    c.bench_function("scan_all_slices", |b| {
        b.iter(|| black_box(row.iter_slices(ALL_COLUMNS).count()));
    });
}

criterion_group!(benches, bench_add_column, bench_add_all, bench_removal, bench_scan);
criterion_main!(benches);
