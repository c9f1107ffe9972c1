//! Criterion micro-benchmarks for the index registry.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use townplan_core::{Category, IndexRegistry};

/// Benchmark: allocate 10K indices across the builtin categories.
fn bench_allocate_10k(c: &mut Criterion) {
    c.bench_function("allocate_10k", |b| {
        b.iter(|| {
            let mut registry = IndexRegistry::with_categories(Category::BUILTIN.iter().cloned());
            for i in 0..10_000usize {
                let category = Category::BUILTIN[i % Category::BUILTIN.len()].clone();
                black_box(registry.allocate(category).unwrap());
            }
            black_box(&registry);
        });
    });
}

/// Benchmark: query the next free run of links on a sparse category.
fn bench_next_run_sparse(c: &mut Criterion) {
    let mut registry = IndexRegistry::new();
    for i in (0..20_000u32).step_by(3) {
        registry.record(Category::LINK, i).unwrap();
    }

    c.bench_function("next_run_sparse_links", |b| {
        b.iter(|| black_box(registry.next_run(&Category::LINK, 2).unwrap()));
    });
}

criterion_group!(benches, bench_allocate_10k, bench_next_run_sparse);
criterion_main!(benches);
