//! Convex hulls, Delaunay triangulations and Voronoi meshes in R^d.
//!
//! Layers
//! - `model`: vertex/simplex records and the `Vertex`/`Simplex` traits.
//! - `hull`: incremental convex hull with conflict lists and horizon cones.
//! - `delaunay`: lower hull of the paraboloid lift.
//! - `voronoi`: dual of the triangulation (circumcenters, edges, rays).
//!
//! API Policy
//! - Constructors take ownership of the vertices and return `Result<_, HullError>`;
//!   all input validation happens before any construction work.
//! - Results are read-only: accessors hand out slices, never `&mut`.

pub mod cfg;
pub mod delaunay;
pub mod error;
pub mod hull;
mod linalg;
pub mod model;
pub mod sample;
pub mod voronoi;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::HullCfg;
pub use delaunay::{DelaunayCell, DelaunayTriangulation};
pub use error::HullError;
pub use hull::{ConvexHull, Facet};
pub use model::{ridge_report, ConvexFace, DefaultVertex, RidgeReport, Simplex, Vertex};
pub use voronoi::{VoronoiEdge, VoronoiMesh, VoronoiRay, VoronoiRegion};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{HullCfg, DEFAULT_MERGE_TOLERANCE, DEFAULT_PLANE_DISTANCE_TOLERANCE};
    pub use crate::delaunay::{DelaunayCell, DelaunayTriangulation};
    pub use crate::error::HullError;
    pub use crate::hull::{ConvexHull, Facet};
    pub use crate::model::{ConvexFace, DefaultVertex, Simplex, Vertex};
    pub use crate::sample::{sample, SampleKind};
    pub use crate::voronoi::VoronoiMesh;
    pub use nalgebra::DVector;
}
