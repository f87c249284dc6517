//! JSON documents written by the CLI.
//!
//! Index conventions follow the library: hull face vertices index `vertices`
//! (the retained points), Delaunay cell vertices index the full input, and
//! Voronoi edges/rays/regions index `vertices` (one circumcenter per cell).

use anyhow::{Context, Result};
use hullmesh::{ConvexHull, DefaultVertex, DelaunayTriangulation, VoronoiMesh};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
pub struct FaceDoc {
    pub vertices: Vec<usize>,
    pub adjacency: Vec<usize>,
    pub normal: Vec<f64>,
    pub offset: f64,
}

#[derive(Serialize)]
pub struct FacetDoc {
    pub faces: Vec<usize>,
    pub vertices: Vec<usize>,
    pub normal: Vec<f64>,
    pub offset: f64,
}

#[derive(Serialize)]
pub struct HullDoc {
    pub dimension: usize,
    pub vertices: Vec<Vec<f64>>,
    pub input_indices: Vec<usize>,
    pub faces: Vec<FaceDoc>,
    pub facets: Vec<FacetDoc>,
    pub volume: f64,
    pub surface_area: f64,
}

impl HullDoc {
    pub fn new(hull: &ConvexHull<DefaultVertex>) -> Self {
        Self {
            dimension: hull.dimension(),
            vertices: hull.points().iter().map(|v| v.position.clone()).collect(),
            input_indices: hull.input_indices().to_vec(),
            faces: hull
                .faces()
                .iter()
                .map(|f| FaceDoc {
                    vertices: f.vertices().to_vec(),
                    adjacency: f.adjacency().to_vec(),
                    normal: f.normal().iter().copied().collect(),
                    offset: f.offset(),
                })
                .collect(),
            facets: hull
                .facets()
                .into_iter()
                .map(|f| FacetDoc {
                    faces: f.faces,
                    vertices: f.vertices,
                    normal: f.normal.iter().copied().collect(),
                    offset: f.offset,
                })
                .collect(),
            volume: hull.volume(),
            surface_area: hull.surface_area(),
        }
    }
}

#[derive(Serialize)]
pub struct CellDoc {
    pub vertices: Vec<usize>,
    pub adjacency: Vec<Option<usize>>,
    pub circumcenter: Vec<f64>,
    pub circumradius: f64,
}

#[derive(Serialize)]
pub struct DelaunayDoc {
    pub dimension: usize,
    pub vertices: Vec<Vec<f64>>,
    pub cells: Vec<CellDoc>,
    pub volume: f64,
}

impl DelaunayDoc {
    pub fn new(tri: &DelaunayTriangulation<DefaultVertex>) -> Self {
        Self {
            dimension: tri.dimension(),
            vertices: tri.vertices().iter().map(|v| v.position.clone()).collect(),
            cells: tri
                .cells()
                .iter()
                .map(|c| CellDoc {
                    vertices: c.vertices().to_vec(),
                    adjacency: c.adjacency().to_vec(),
                    circumcenter: c.circumcenter().iter().copied().collect(),
                    circumradius: c.circumradius(),
                })
                .collect(),
            volume: tri.volume(),
        }
    }
}

#[derive(Serialize)]
pub struct EdgeDoc {
    pub source: usize,
    pub target: usize,
    pub ridge: Vec<usize>,
}

#[derive(Serialize)]
pub struct RayDoc {
    pub source: usize,
    pub ridge: Vec<usize>,
    pub direction: Vec<f64>,
}

#[derive(Serialize)]
pub struct RegionDoc {
    pub site: usize,
    pub vertices: Vec<usize>,
    pub bounded: bool,
}

#[derive(Serialize)]
pub struct VoronoiDoc {
    pub dimension: usize,
    pub vertices: Vec<Vec<f64>>,
    pub edges: Vec<EdgeDoc>,
    pub rays: Vec<RayDoc>,
    pub regions: Vec<RegionDoc>,
}

impl VoronoiDoc {
    pub fn new(mesh: &VoronoiMesh) -> Self {
        Self {
            dimension: mesh.dimension(),
            vertices: mesh
                .vertices()
                .iter()
                .map(|v| v.iter().copied().collect())
                .collect(),
            edges: mesh
                .edges()
                .iter()
                .map(|e| EdgeDoc {
                    source: e.source,
                    target: e.target,
                    ridge: e.ridge.clone(),
                })
                .collect(),
            rays: mesh
                .rays()
                .iter()
                .map(|r| RayDoc {
                    source: r.source,
                    ridge: r.ridge.clone(),
                    direction: r.direction.iter().copied().collect(),
                })
                .collect(),
            regions: (0..mesh.site_count())
                .filter_map(|s| mesh.region(s))
                .map(|r| RegionDoc {
                    site: r.site,
                    vertices: r.vertices,
                    bounded: r.bounded,
                })
                .collect(),
        }
    }
}

/// Pretty-print `doc` to `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
