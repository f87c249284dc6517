//! Vertex and simplex records shared by the hull, triangulation and Voronoi layers.
//!
//! - `Vertex`: anything with a position. Users attach payload by implementing it
//!   for their own type; `DefaultVertex` is the plain record.
//! - `Simplex`: anything with vertex indices and neighbours across ridges. Hull
//!   faces always have a neighbour; triangulation cells may not.
//! - `ridge_report`: generic closure/consistency check over a simplex set.

use std::collections::HashMap;

use nalgebra::DVector;

use crate::cfg::HullCfg;
use crate::error::HullError;

/// A point in R^d. Positions must not change while the engine holds the vertex.
pub trait Vertex {
    fn position(&self) -> &[f64];
}

/// Plain vertex record without payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefaultVertex {
    pub position: Vec<f64>,
}

impl DefaultVertex {
    #[inline]
    pub fn new(position: Vec<f64>) -> Self {
        Self { position }
    }
}

impl From<Vec<f64>> for DefaultVertex {
    fn from(position: Vec<f64>) -> Self {
        Self { position }
    }
}

impl Vertex for DefaultVertex {
    #[inline]
    fn position(&self) -> &[f64] {
        &self.position
    }
}

impl Vertex for Vec<f64> {
    #[inline]
    fn position(&self) -> &[f64] {
        self
    }
}

impl<const N: usize> Vertex for [f64; N] {
    #[inline]
    fn position(&self) -> &[f64] {
        self
    }
}

/// A simplex with neighbours: `neighbor(i)` lies across the ridge opposite
/// `vertex_indices()[i]`.
pub trait Simplex {
    fn vertex_indices(&self) -> &[usize];
    fn neighbor(&self, slot: usize) -> Option<usize>;

    /// Sorted vertex indices of the ridge opposite `slot`.
    fn ridge(&self, slot: usize) -> Vec<usize> {
        let mut ridge: Vec<usize> = self
            .vertex_indices()
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != slot)
            .map(|(_, &v)| v)
            .collect();
        ridge.sort_unstable();
        ridge
    }
}

/// Simplicial hull face with supporting hyperplane `normal·x = offset`.
///
/// Invariants:
/// - `normal` is unit length and points away from the hull interior.
/// - `det[normal; v1−v0; …; v(d−1)−v0] > 0` (2D edges counterclockwise, 3D
///   triangles counterclockwise seen from outside).
/// - `adjacency[i]` is the face across the ridge opposite `vertices[i]`.
#[derive(Clone, Debug)]
pub struct ConvexFace {
    pub(crate) vertices: Vec<usize>,
    pub(crate) adjacency: Vec<usize>,
    pub(crate) normal: DVector<f64>,
    pub(crate) offset: f64,
}

impl ConvexFace {
    /// Indices into the owning hull's `points()`.
    #[inline]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }
    /// Indices into the owning hull's `faces()`.
    #[inline]
    pub fn adjacency(&self) -> &[usize] {
        &self.adjacency
    }
    #[inline]
    pub fn normal(&self) -> &DVector<f64> {
        &self.normal
    }
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }
    /// Signed distance of `p` from the supporting hyperplane (positive = outside).
    #[inline]
    pub fn signed_distance(&self, p: &[f64]) -> f64 {
        self.normal
            .iter()
            .zip(p.iter())
            .map(|(n, x)| n * x)
            .sum::<f64>()
            - self.offset
    }
}

impl Simplex for ConvexFace {
    #[inline]
    fn vertex_indices(&self) -> &[usize] {
        &self.vertices
    }
    #[inline]
    fn neighbor(&self, slot: usize) -> Option<usize> {
        self.adjacency.get(slot).copied()
    }
}

/// Ridge statistics for a simplex set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RidgeReport {
    /// Ridges shared by exactly two simplices.
    pub shared: usize,
    /// Ridges owned by a single simplex.
    pub boundary: usize,
    /// Ridges claimed by three or more simplices.
    pub overshared: usize,
    /// Every recorded neighbour shares the ridge and points back.
    pub adjacency_consistent: bool,
}

impl RidgeReport {
    /// Closed manifold: every ridge shared by exactly two simplices.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.boundary == 0 && self.overshared == 0 && self.adjacency_consistent
    }
}

/// Count ridge multiplicities and verify neighbour links.
pub fn ridge_report<S: Simplex>(cells: &[S]) -> RidgeReport {
    let mut owners: HashMap<Vec<usize>, usize> = HashMap::new();
    let mut consistent = true;
    for (ci, cell) in cells.iter().enumerate() {
        for slot in 0..cell.vertex_indices().len() {
            let ridge = cell.ridge(slot);
            *owners.entry(ridge.clone()).or_default() += 1;
            if let Some(other) = cell.neighbor(slot) {
                let Some(nb) = cells.get(other) else {
                    consistent = false;
                    continue;
                };
                let back = (0..nb.vertex_indices().len())
                    .any(|s| nb.neighbor(s) == Some(ci) && nb.ridge(s) == ridge);
                if !back {
                    consistent = false;
                }
            }
        }
    }
    let mut report = RidgeReport {
        adjacency_consistent: consistent,
        ..RidgeReport::default()
    };
    for count in owners.values() {
        match count {
            1 => report.boundary += 1,
            2 => report.shared += 1,
            _ => report.overshared += 1,
        }
    }
    report
}

/// Check shape/finiteness/count and convert positions.
///
/// Returns the common dimension and one `DVector` per input vertex.
pub(crate) fn validate_points<V: Vertex>(
    data: &[V],
    cfg: &HullCfg,
) -> Result<(usize, Vec<DVector<f64>>), HullError> {
    cfg.validate()?;
    let first = data.first().ok_or(HullError::NoInput)?;
    let dimension = first.position().len();
    if dimension < 2 {
        return Err(HullError::DimensionTooLow { dimension });
    }
    let mut points = Vec::with_capacity(data.len());
    for (index, v) in data.iter().enumerate() {
        let pos = v.position();
        if pos.len() != dimension {
            return Err(HullError::DimensionMismatch {
                index,
                expected: dimension,
                found: pos.len(),
            });
        }
        if !pos.iter().all(|x| x.is_finite()) {
            return Err(HullError::NonFinite { index });
        }
        points.push(DVector::from_column_slice(pos));
    }
    if points.len() < dimension + 1 {
        return Err(HullError::InsufficientPoints {
            dimension,
            required: dimension + 1,
            found: points.len(),
        });
    }
    Ok((dimension, points))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tagged {
        pos: [f64; 2],
        #[allow(dead_code)]
        tag: &'static str,
    }

    impl Vertex for Tagged {
        fn position(&self) -> &[f64] {
            &self.pos
        }
    }

    struct Tri {
        v: [usize; 3],
        n: [Option<usize>; 3],
    }

    impl Simplex for Tri {
        fn vertex_indices(&self) -> &[usize] {
            &self.v
        }
        fn neighbor(&self, slot: usize) -> Option<usize> {
            self.n[slot]
        }
    }

    #[test]
    fn validate_rejects_bad_shapes() {
        let cfg = HullCfg::default();
        let empty: Vec<Vec<f64>> = Vec::new();
        assert_eq!(validate_points(&empty, &cfg).unwrap_err(), HullError::NoInput);
        let line = vec![vec![0.0], vec![1.0]];
        assert!(matches!(
            validate_points(&line, &cfg),
            Err(HullError::DimensionTooLow { dimension: 1 })
        ));
        let ragged = vec![vec![0.0, 0.0], vec![1.0, 0.0, 2.0], vec![0.0, 1.0]];
        assert!(matches!(
            validate_points(&ragged, &cfg),
            Err(HullError::DimensionMismatch { index: 1, .. })
        ));
        let nan = vec![vec![0.0, 0.0], vec![f64::NAN, 0.0], vec![0.0, 1.0]];
        assert!(matches!(
            validate_points(&nan, &cfg),
            Err(HullError::NonFinite { index: 1 })
        ));
        let two = vec![vec![0.0, 0.0], vec![1.0, 0.0]];
        assert!(matches!(
            validate_points(&two, &cfg),
            Err(HullError::InsufficientPoints {
                dimension: 2,
                required: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn user_vertex_with_payload_validates() {
        let data = vec![
            Tagged { pos: [0.0, 0.0], tag: "a" },
            Tagged { pos: [1.0, 0.0], tag: "b" },
            Tagged { pos: [0.0, 1.0], tag: "c" },
        ];
        let (dim, pts) = validate_points(&data, &HullCfg::default()).unwrap();
        assert_eq!(dim, 2);
        assert_eq!(pts[1][0], 1.0);
    }

    #[test]
    fn ridge_report_two_triangles() {
        // Square split along 0-2: ridge {0,2} shared, four boundary edges.
        let cells = vec![
            Tri {
                v: [0, 1, 2],
                n: [None, Some(1), None],
            },
            Tri {
                v: [0, 2, 3],
                n: [None, None, Some(0)],
            },
        ];
        let report = ridge_report(&cells);
        assert_eq!(report.shared, 1);
        assert_eq!(report.boundary, 4);
        assert_eq!(report.overshared, 0);
        assert!(report.adjacency_consistent);
        assert!(!report.is_closed());
    }

    #[test]
    fn ridge_report_flags_one_sided_link() {
        let cells = vec![
            Tri {
                v: [0, 1, 2],
                n: [None, Some(1), None],
            },
            Tri {
                v: [0, 2, 3],
                n: [None, None, None],
            },
        ];
        assert!(!ridge_report(&cells).adjacency_consistent);
    }
}
