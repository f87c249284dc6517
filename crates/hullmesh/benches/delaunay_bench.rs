//! Criterion benchmarks for Delaunay and Voronoi construction.
//! Focus sizes: n in {100, 1000} for d in {2, 3}.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hullmesh::sample::uniform_cube;
use hullmesh::{DelaunayTriangulation, HullCfg, VoronoiMesh};

fn bench_delaunay(c: &mut Criterion) {
    let mut group = c.benchmark_group("delaunay");
    group.sample_size(20);
    for &dim in &[2usize, 3] {
        for &n in &[100usize, 1000] {
            group.bench_with_input(
                BenchmarkId::new(format!("triangulate_d{dim}"), n),
                &n,
                |b, &n| {
                    b.iter_batched(
                        || uniform_cube(dim, n, 7).unwrap(),
                        |pts| {
                            let _tri =
                                DelaunayTriangulation::from_coordinates(pts, HullCfg::default())
                                    .unwrap();
                        },
                        BatchSize::LargeInput,
                    )
                },
            );
        }
    }

    let tri = DelaunayTriangulation::from_coordinates(
        uniform_cube(2, 1000, 8).unwrap(),
        HullCfg::default(),
    )
    .unwrap();
    group.bench_function("voronoi_dual_d2_1000", |b| {
        b.iter(|| VoronoiMesh::from_triangulation(&tri))
    });
    group.bench_function("locate_d2_1000", |b| b.iter(|| tri.locate(&[0.1, -0.2])));
    group.finish();
}

criterion_group!(benches, bench_delaunay);
criterion_main!(benches);
