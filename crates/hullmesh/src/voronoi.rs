//! Voronoi mesh as the dual of a Delaunay triangulation.
//!
//! - One Voronoi vertex per cell: its circumcenter (index = cell index).
//! - One edge per interior ridge, joining the two cells that share it.
//! - One ray per boundary ridge, leaving the cell's circumcenter along the ridge
//!   normal that points away from the triangulation.
//! - A site's region is bounded iff the site lies on no boundary ridge.

use nalgebra::DVector;

use crate::cfg::HullCfg;
use crate::delaunay::DelaunayTriangulation;
use crate::error::HullError;
use crate::linalg::hyperplane_through;
use crate::model::{DefaultVertex, Simplex, Vertex};

/// Finite Voronoi edge between the circumcenters of two adjacent cells.
#[derive(Clone, Debug, PartialEq)]
pub struct VoronoiEdge {
    /// Lower cell index.
    pub source: usize,
    pub target: usize,
    /// Sorted site indices of the shared ridge.
    pub ridge: Vec<usize>,
}

/// Unbounded Voronoi edge dual to a boundary ridge.
#[derive(Clone, Debug, PartialEq)]
pub struct VoronoiRay {
    pub source: usize,
    pub ridge: Vec<usize>,
    /// Unit direction, away from the triangulation.
    pub direction: DVector<f64>,
}

/// The Voronoi vertices around one site.
#[derive(Clone, Debug, PartialEq)]
pub struct VoronoiRegion {
    pub site: usize,
    /// Voronoi vertex (= cell) indices; sorted by angle around the site in 2D,
    /// ascending otherwise.
    pub vertices: Vec<usize>,
    pub bounded: bool,
}

#[derive(Clone, Debug)]
pub struct VoronoiMesh {
    dimension: usize,
    sites: Vec<DVector<f64>>,
    vertices: Vec<DVector<f64>>,
    edges: Vec<VoronoiEdge>,
    rays: Vec<VoronoiRay>,
    site_cells: Vec<Vec<usize>>,
    site_bounded: Vec<bool>,
}

impl VoronoiMesh {
    /// Dualize an existing triangulation.
    pub fn from_triangulation<V>(tri: &DelaunayTriangulation<V>) -> Self {
        let sites: Vec<DVector<f64>> = (0..tri.vertices().len())
            .filter_map(|i| tri.position(i).cloned())
            .collect();
        let vertices: Vec<DVector<f64>> = tri
            .cells()
            .iter()
            .map(|c| c.circumcenter().clone())
            .collect();
        let mut site_cells = vec![Vec::new(); sites.len()];
        // Sites in no cell (absorbed duplicates) have no region.
        let mut site_bounded: Vec<bool> = vec![false; sites.len()];
        for (ci, cell) in tri.cells().iter().enumerate() {
            for &v in cell.vertices() {
                site_cells[v].push(ci);
                site_bounded[v] = true;
            }
        }

        let mut edges = Vec::new();
        let mut rays = Vec::new();
        let mut skipped = 0usize;
        for (ci, cell) in tri.cells().iter().enumerate() {
            for slot in 0..cell.vertices().len() {
                let ridge = cell.ridge(slot);
                match cell.neighbor(slot) {
                    Some(other) if ci < other => edges.push(VoronoiEdge {
                        source: ci,
                        target: other,
                        ridge,
                    }),
                    Some(_) => {}
                    None => {
                        for &v in &ridge {
                            site_bounded[v] = false;
                        }
                        let opposite = &sites[cell.vertices()[slot]];
                        match outward_normal(&sites, &ridge, opposite) {
                            Some(direction) => rays.push(VoronoiRay {
                                source: ci,
                                ridge,
                                direction,
                            }),
                            None => skipped += 1,
                        }
                    }
                }
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, "boundary ridges without a normal; rays dropped");
        }
        tracing::debug!(
            vertices = vertices.len(),
            edges = edges.len(),
            rays = rays.len(),
            "voronoi built"
        );
        Self {
            dimension: tri.dimension(),
            sites,
            vertices,
            edges,
            rays,
            site_cells,
            site_bounded,
        }
    }

    /// Triangulate `data`, then dualize.
    pub fn create<V: Vertex>(data: Vec<V>, cfg: HullCfg) -> Result<Self, HullError> {
        let tri = DelaunayTriangulation::create(data, cfg)?;
        Ok(Self::from_triangulation(&tri))
    }

    pub fn from_coordinates(data: Vec<Vec<f64>>, cfg: HullCfg) -> Result<Self, HullError> {
        Self::create(data.into_iter().map(DefaultVertex::new).collect(), cfg)
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Circumcenters; index `i` belongs to triangulation cell `i`.
    #[inline]
    pub fn vertices(&self) -> &[DVector<f64>] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[VoronoiEdge] {
        &self.edges
    }

    #[inline]
    pub fn rays(&self) -> &[VoronoiRay] {
        &self.rays
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Region of input site `site`; `None` if out of range.
    pub fn region(&self, site: usize) -> Option<VoronoiRegion> {
        let cells = self.site_cells.get(site)?;
        let mut vertices = cells.clone();
        if self.dimension == 2 {
            let s = &self.sites[site];
            let angle = |c: usize| {
                let p = &self.vertices[c];
                (p[1] - s[1]).atan2(p[0] - s[0])
            };
            vertices.sort_by(|&a, &b| angle(a).total_cmp(&angle(b)));
        } else {
            vertices.sort_unstable();
        }
        Some(VoronoiRegion {
            site,
            vertices,
            bounded: self.site_bounded[site],
        })
    }
}

/// Unit normal of the ridge hyperplane, oriented away from `opposite`.
fn outward_normal(
    sites: &[DVector<f64>],
    ridge: &[usize],
    opposite: &DVector<f64>,
) -> Option<DVector<f64>> {
    let pts: Vec<&DVector<f64>> = ridge.iter().map(|&v| &sites[v]).collect();
    let (normal, offset) = hyperplane_through(&pts)?;
    if normal.dot(opposite) - offset > 0.0 {
        Some(-normal)
    } else {
        Some(normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{in_ball, uniform_cube};

    fn square_with_center() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.4, 0.6],
        ]
    }

    #[test]
    fn square_with_inner_site() {
        let mesh = VoronoiMesh::from_coordinates(square_with_center(), HullCfg::default()).unwrap();
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.edges().len(), 4);
        assert_eq!(mesh.rays().len(), 4);
        let inner = mesh.region(4).unwrap();
        assert!(inner.bounded);
        assert_eq!(inner.vertices.len(), 4);
        let corner = mesh.region(0).unwrap();
        assert!(!corner.bounded);
        assert_eq!(corner.vertices.len(), 2);
        assert!(mesh.region(5).is_none());
    }

    #[test]
    fn every_ridge_is_an_edge_or_a_ray() {
        for dim in 2..=3 {
            let tri = DelaunayTriangulation::from_coordinates(
                in_ball(dim, 50, 4 + dim as u64).unwrap(),
                HullCfg::default(),
            )
            .unwrap();
            let mesh = VoronoiMesh::from_triangulation(&tri);
            assert_eq!(mesh.vertices().len(), tri.cells().len());
            assert_eq!(
                2 * mesh.edges().len() + mesh.rays().len(),
                (dim + 1) * tri.cells().len()
            );
            assert!(mesh.edges().iter().all(|e| e.source < e.target));
        }
    }

    #[test]
    fn edges_are_perpendicular_to_their_ridges() {
        let mesh = VoronoiMesh::from_coordinates(uniform_cube(2, 40, 12).unwrap(), HullCfg::default())
            .unwrap();
        for e in mesh.edges() {
            let dir = &mesh.vertices()[e.target] - &mesh.vertices()[e.source];
            let ridge = &mesh.sites[e.ridge[1]] - &mesh.sites[e.ridge[0]];
            assert!(dir.dot(&ridge).abs() < 1e-8 * (1.0 + dir.norm() * ridge.norm()));
        }
    }

    #[test]
    fn rays_leave_the_triangulation() {
        let pts = uniform_cube(2, 30, 5).unwrap();
        let mesh = VoronoiMesh::from_coordinates(pts, HullCfg::default()).unwrap();
        let centroid = mesh
            .sites
            .iter()
            .fold(DVector::zeros(2), |acc, s| acc + s)
            / mesh.sites.len() as f64;
        for ray in mesh.rays() {
            assert!((ray.direction.norm() - 1.0).abs() < 1e-12);
            let mid = (&mesh.sites[ray.ridge[0]] + &mesh.sites[ray.ridge[1]]) / 2.0;
            assert!(ray.direction.dot(&(mid - &centroid)) > 0.0);
        }
    }

    #[test]
    fn planar_regions_are_angle_sorted() {
        let mesh = VoronoiMesh::from_coordinates(uniform_cube(2, 60, 17).unwrap(), HullCfg::default())
            .unwrap();
        for site in 0..mesh.site_count() {
            let region = mesh.region(site).unwrap();
            let s = &mesh.sites[site];
            let angles: Vec<f64> = region
                .vertices
                .iter()
                .map(|&c| {
                    let p = &mesh.vertices()[c];
                    (p[1] - s[1]).atan2(p[0] - s[0])
                })
                .collect();
            assert!(angles.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
