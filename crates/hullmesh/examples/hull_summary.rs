//! Hull / Delaunay / Voronoi summary for one random cloud.
//!
//! Usage: cargo run -p hullmesh --example hull_summary -- [dim] [count] [seed]

use std::time::Instant;

use hullmesh::prelude::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let dim: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);
    let count: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(500);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);

    let pts = sample(SampleKind::Ball, dim, count, seed).expect("valid sampler params");

    let start = Instant::now();
    let hull = ConvexHull::from_coordinates(pts.clone(), HullCfg::default()).expect("hull");
    let hull_ms = start.elapsed().as_secs_f64() * 1e3;

    let start = Instant::now();
    let tri = DelaunayTriangulation::from_coordinates(pts, HullCfg::default()).expect("delaunay");
    let tri_ms = start.elapsed().as_secs_f64() * 1e3;
    let mesh = VoronoiMesh::from_triangulation(&tri);

    println!("dim={dim} count={count} seed={seed}");
    println!(
        "hull: {} vertices, {} faces, {} facets, volume {:.6} ({hull_ms:.2} ms)",
        hull.points().len(),
        hull.faces().len(),
        hull.facets().len(),
        hull.volume()
    );
    println!(
        "delaunay: {} cells, volume {:.6} ({tri_ms:.2} ms)",
        tri.cells().len(),
        tri.volume()
    );
    println!(
        "voronoi: {} vertices, {} edges, {} rays",
        mesh.vertices().len(),
        mesh.edges().len(),
        mesh.rays().len()
    );
}
