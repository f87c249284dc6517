//! Delaunay triangulation by paraboloid lifting.
//!
//! Model
//! - Points are centered on their centroid and scaled into `[-1, 1]^d`; this is a
//!   similarity, so the triangulation is unchanged while the lifted coordinate
//!   `|q|²` stays in `[0, d]`.
//! - The hull of the lifted set plus one cap point `T = (0, …, 0, d + 1)` is
//!   built. `T` projects to the centroid (strictly inside the input hull) and
//!   sits above every lifted point, so the lower hull is untouched and
//!   co-spherical input still spans `d + 1` dimensions.
//! - Lower faces (`n_last < 0`, not containing `T`) project to the cells.
//!
//! Conventions
//! - `vertices()` is the full input in input order; cell indices point into it.
//!   Duplicates of an earlier point are absorbed and appear in no cell.
//! - Cells are positively oriented: `det[v1−v0; …; vd−v0] > 0` (2D triangles
//!   counterclockwise).
//! - `adjacency[i]` is the cell across the ridge opposite `vertices[i]`, or `None`
//!   on the convex-hull boundary.

use nalgebra::{DMatrix, DVector};

use crate::cfg::{HullCfg, LOCATE_EPS, VERTICAL_EPS};
use crate::error::HullError;
use crate::hull::{build_hull, Built};
use crate::linalg::{barycentric, centroid, circumsphere, extreme_simplex, simplex_volume};
use crate::model::{validate_points, DefaultVertex, Simplex, Vertex};

/// One d-simplex of the triangulation.
#[derive(Clone, Debug)]
pub struct DelaunayCell {
    pub(crate) vertices: Vec<usize>,
    pub(crate) adjacency: Vec<Option<usize>>,
    pub(crate) circumcenter: DVector<f64>,
    pub(crate) circumradius: f64,
}

impl DelaunayCell {
    /// Indices into the triangulation's `vertices()`.
    #[inline]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }
    #[inline]
    pub fn adjacency(&self) -> &[Option<usize>] {
        &self.adjacency
    }
    #[inline]
    pub fn circumcenter(&self) -> &DVector<f64> {
        &self.circumcenter
    }
    #[inline]
    pub fn circumradius(&self) -> f64 {
        self.circumradius
    }
}

impl Simplex for DelaunayCell {
    #[inline]
    fn vertex_indices(&self) -> &[usize] {
        &self.vertices
    }
    #[inline]
    fn neighbor(&self, slot: usize) -> Option<usize> {
        self.adjacency.get(slot).copied().flatten()
    }
}

/// Delaunay triangulation over user vertices `V`.
#[derive(Clone, Debug)]
pub struct DelaunayTriangulation<V> {
    dimension: usize,
    vertices: Vec<V>,
    positions: Vec<DVector<f64>>,
    cells: Vec<DelaunayCell>,
    cfg: HullCfg,
}

/// Similarity `q = (p − center) / scale` mapping the input into `[-1, 1]^d`.
struct Normalization {
    center: DVector<f64>,
    scale: f64,
}

impl Normalization {
    fn fit(points: &[DVector<f64>]) -> Self {
        let center = centroid(points.iter());
        let mut scale = 0.0f64;
        for p in points {
            scale = scale.max((p - &center).amax());
        }
        Self { center, scale }
    }

    fn lift(&self, p: &DVector<f64>) -> DVector<f64> {
        let q = (p - &self.center) / self.scale;
        let h = q.norm_squared();
        let d = q.len();
        DVector::from_fn(d + 1, |i, _| if i < d { q[i] } else { h })
    }

    /// Sphere whose lift is the plane `n·(q, h) = offset`, back in input units.
    fn sphere_of_plane(&self, normal: &DVector<f64>, offset: f64) -> (DVector<f64>, f64) {
        let d = normal.len() - 1;
        let nh = normal[d];
        let cq = DVector::from_fn(d, |i, _| -normal[i] / (2.0 * nh));
        let r2 = (offset / nh + cq.norm_squared()).max(0.0);
        (&self.center + cq * self.scale, r2.sqrt() * self.scale)
    }
}

impl<V: Vertex> DelaunayTriangulation<V> {
    /// Triangulate `data`. All input vertices are kept; see module docs.
    pub fn create(data: Vec<V>, cfg: HullCfg) -> Result<Self, HullError> {
        let (dimension, positions) = validate_points(&data, &cfg)?;
        let tol = cfg.plane_distance_tolerance;
        let seed = extreme_simplex(&positions, tol);
        if seed.rank < dimension {
            return Err(HullError::Degenerate {
                dimension,
                rank: seed.rank,
            });
        }

        let norm = Normalization::fit(&positions);
        let cap = positions.len();
        let mut lifted: Vec<DVector<f64>> = positions.iter().map(|p| norm.lift(p)).collect();
        let mut top = DVector::zeros(dimension + 1);
        top[dimension] = dimension as f64 + 1.0;
        lifted.push(top);

        let Built {
            retained, faces, ..
        } = build_hull(&lifted, tol)?;

        let is_lower: Vec<bool> = faces
            .iter()
            .map(|f| {
                f.normal[dimension] < -VERTICAL_EPS && f.vertices.iter().all(|&v| retained[v] != cap)
            })
            .collect();
        let mut cell_of = vec![None; faces.len()];
        let mut next = 0usize;
        for (f, &lower) in is_lower.iter().enumerate() {
            if lower {
                cell_of[f] = Some(next);
                next += 1;
            }
        }

        let mut cells = Vec::with_capacity(next);
        let mut fallbacks = 0usize;
        for (f, face) in faces.iter().enumerate() {
            if !is_lower[f] {
                continue;
            }
            let mut vertices: Vec<usize> = face.vertices.iter().map(|&v| retained[v]).collect();
            let mut adjacency: Vec<Option<usize>> =
                face.adjacency.iter().map(|&g| cell_of[g]).collect();
            let pts: Vec<&DVector<f64>> = vertices.iter().map(|&v| &positions[v]).collect();
            if orientation(&pts) < 0.0 {
                vertices.swap(0, 1);
                adjacency.swap(0, 1);
            }
            let pts: Vec<&DVector<f64>> = vertices.iter().map(|&v| &positions[v]).collect();
            let (circumcenter, circumradius) = match circumsphere(&pts) {
                Some(sphere) => sphere,
                None => {
                    fallbacks += 1;
                    norm.sphere_of_plane(&face.normal, face.offset)
                }
            };
            cells.push(DelaunayCell {
                vertices,
                adjacency,
                circumcenter,
                circumradius,
            });
        }
        if fallbacks > 0 {
            tracing::warn!(
                fallbacks,
                "circumsphere solve failed; used lifted plane instead"
            );
        }
        tracing::debug!(dimension, input = positions.len(), cells = cells.len(), "delaunay built");

        Ok(Self {
            dimension,
            vertices: data,
            positions,
            cells,
            cfg,
        })
    }
}

impl DelaunayTriangulation<DefaultVertex> {
    pub fn from_coordinates(data: Vec<Vec<f64>>, cfg: HullCfg) -> Result<Self, HullError> {
        Self::create(data.into_iter().map(DefaultVertex::new).collect(), cfg)
    }
}

/// `det[v1−v0; …; vd−v0]` (zero for malformed input).
fn orientation(pts: &[&DVector<f64>]) -> f64 {
    let Some(p0) = pts.first() else {
        return 0.0;
    };
    let d = p0.len();
    if pts.len() != d + 1 {
        return 0.0;
    }
    DMatrix::from_fn(d, d, |i, j| pts[i + 1][j] - p0[j]).determinant()
}

impl<V> DelaunayTriangulation<V> {
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// All input vertices, in input order.
    #[inline]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    #[inline]
    pub fn cells(&self) -> &[DelaunayCell] {
        &self.cells
    }

    #[inline]
    pub fn cfg(&self) -> HullCfg {
        self.cfg
    }

    /// Position of input vertex `i`; `None` if out of range.
    #[inline]
    pub fn position(&self, i: usize) -> Option<&DVector<f64>> {
        self.positions.get(i)
    }

    pub fn into_vertices(self) -> Vec<V> {
        self.vertices
    }

    /// Index of a cell containing `p` (boundary counts), or `None` outside.
    pub fn locate(&self, p: &[f64]) -> Option<usize> {
        if p.len() != self.dimension {
            return None;
        }
        let q = DVector::from_column_slice(p);
        self.cells.iter().position(|cell| {
            let pts: Vec<&DVector<f64>> =
                cell.vertices.iter().map(|&v| &self.positions[v]).collect();
            barycentric(&pts, &q).is_some_and(|b| b.iter().all(|&x| x >= -LOCATE_EPS))
        })
    }

    /// Empty-circumsphere check: no vertex closer than `radius − tol` to any
    /// cell's circumcenter.
    pub fn is_delaunay(&self, tol: f64) -> bool {
        self.cells.iter().all(|cell| {
            self.positions
                .iter()
                .all(|p| (p - &cell.circumcenter).norm() >= cell.circumradius - tol)
        })
    }

    /// d-volume of cell `i`; `None` if out of range.
    pub fn cell_volume(&self, i: usize) -> Option<f64> {
        self.cells.get(i).map(|cell| self.volume_of(cell))
    }

    /// Sum of cell volumes; equals the convex-hull volume.
    pub fn volume(&self) -> f64 {
        self.cells.iter().map(|cell| self.volume_of(cell)).sum()
    }

    fn volume_of(&self, cell: &DelaunayCell) -> f64 {
        let pts: Vec<&DVector<f64>> = cell.vertices.iter().map(|&v| &self.positions[v]).collect();
        simplex_volume(&pts)
    }
}
