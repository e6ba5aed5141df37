//! Benchmarks for rectangle decomposition and index counts.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use zrange::{Fragment, Resume, ZCurve, ZIndex};

/// Query rectangles as `(label, xlo, ylo, xhi, yhi)` on a 1024×1024 grid.
fn bench_queries() -> Vec<(&'static str, u32, u32, u32, u32)> {
    vec![
        ("aligned", 256, 256, 511, 511),
        ("offset", 257, 257, 512, 512),
        ("thin", 0, 500, 1023, 501),
        ("small", 500, 500, 520, 530),
        ("center", 100, 100, 923, 923),
    ]
}

/// Plain decomposition, counting fragments through a closure visitor.
fn bench_decompose(c: &mut Criterion) {
    let z = ZCurve::<u32>::new(10).expect("valid width");
    let mut group = c.benchmark_group("decompose");

    for (label, xlo, ylo, xhi, yhi) in bench_queries() {
        let q = z.query(xlo, ylo, xhi, yhi).expect("valid query");
        group.bench_function(BenchmarkId::new("visit", label), |b| {
            b.iter(|| {
                let mut n = 0u64;
                let visits = z.decompose(black_box(&q), &mut |_: Fragment<u32>| n += 1);
                (n, visits)
            })
        });
        group.bench_function(BenchmarkId::new("collect", label), |b| {
            b.iter(|| z.fragments(black_box(&q)))
        });
    }

    group.finish();
}

/// Jump traversal that stops after the first fragment.
fn bench_early_stop(c: &mut Criterion) {
    let z = ZCurve::<u32>::new(10).expect("valid width");
    let q = z.query(100, 100, 923, 923).expect("valid query");
    c.bench_function("decompose_jump/stop_first", |b| {
        b.iter(|| z.decompose_jump(black_box(&q), &mut |_: Fragment<u32>| Resume::Stop))
    });
}

/// Sparse index counts with and without skipping.
fn bench_index(c: &mut Criterion) {
    let z = ZCurve::<u32>::new(10).expect("valid width");
    let points = (0..1024u32).map(|i| ((i * 37) % 1024, (i * 101) % 1024));
    let idx = ZIndex::from_points(z, points);
    let q = z.query(100, 100, 923, 923).expect("valid query");

    let mut group = c.benchmark_group("index");
    group.bench_function("count", |b| b.iter(|| idx.count(black_box(&q))));
    group.bench_function("count_skipping", |b| {
        b.iter(|| idx.count_skipping(black_box(&q)))
    });
    group.finish();
}

#[allow(missing_docs, clippy::missing_docs_in_private_items)]
mod bench_defs {
    use super::*;
    criterion_group!(benches, bench_decompose, bench_early_stop, bench_index);
}

pub use bench_defs::benches;
criterion_main!(benches);
