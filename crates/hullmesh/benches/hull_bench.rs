//! Criterion benchmarks for hull construction.
//! Focus sizes: n in {100, 1000, 5000} for d in {2, 3, 4}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p hullmesh

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hullmesh::sample::{in_ball, on_sphere};
use hullmesh::{ConvexHull, HullCfg};

fn bench_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull");
    group.sample_size(20);
    for &dim in &[2usize, 3, 4] {
        for &n in &[100usize, 1000, 5000] {
            let id = format!("d{dim}");
            group.bench_with_input(BenchmarkId::new(format!("ball_{id}"), n), &n, |b, &n| {
                b.iter_batched(
                    || in_ball(dim, n, 41).unwrap(),
                    |pts| {
                        let _hull = ConvexHull::from_coordinates(pts, HullCfg::default()).unwrap();
                    },
                    BatchSize::LargeInput,
                )
            });
        }
    }
    // Every point is a vertex: worst case for the cone step.
    for &n in &[100usize, 1000] {
        group.bench_with_input(BenchmarkId::new("sphere_d3", n), &n, |b, &n| {
            b.iter_batched(
                || on_sphere(3, n, 42).unwrap(),
                |pts| {
                    let hull = ConvexHull::from_coordinates(pts, HullCfg::default()).unwrap();
                    let _f = hull.facets();
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hull);
criterion_main!(benches);
