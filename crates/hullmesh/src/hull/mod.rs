//! Convex hulls of point sets in R^d (d ≥ 2).
//!
//! Purpose
//! - Compute the minimal convex polytope containing the input as a closed set of
//!   simplicial faces with outward unit normals and full adjacency.
//! - Serve as the engine behind the Delaunay and Voronoi layers (lifted hulls).
//!
//! Design
//! - Simplicial faces keep adjacency uniform in every dimension: each face has
//!   exactly `d` vertices and `d` neighbours. Coplanar groups are recovered on
//!   demand by `facets()` rather than maintained during construction.
//! - The caller's vertices are moved in and the boundary ones handed back, so any
//!   payload rides along without `Clone` bounds.
//!
//! Assumptions and conventions
//! - Faces satisfy `n·x <= c + tol` for every input point.
//! - Points within `plane_distance_tolerance` of the hull boundary are not hull
//!   vertices; duplicates are absorbed.
//! - Tolerances are absolute (see `HullCfg`); far-from-origin data wants
//!   `HullCfg::for_points`.
//! - Index accessors return `Option` and never panic.

mod build;
mod facets;
mod volume;

pub use facets::Facet;

use nalgebra::DVector;

use crate::cfg::HullCfg;
use crate::error::HullError;
use crate::model::{validate_points, ConvexFace, DefaultVertex, Vertex};

pub(crate) use build::{build_hull, Built};

/// Convex hull over user vertices `V`.
#[derive(Clone, Debug)]
pub struct ConvexHull<V> {
    dimension: usize,
    points: Vec<V>,
    positions: Vec<DVector<f64>>,
    input_indices: Vec<usize>,
    faces: Vec<ConvexFace>,
    interior: DVector<f64>,
    cfg: HullCfg,
}

impl<V: Vertex> ConvexHull<V> {
    /// Build the hull of `data`. Interior and duplicate vertices are dropped.
    pub fn create(data: Vec<V>, cfg: HullCfg) -> Result<Self, HullError> {
        let (dimension, positions) = validate_points(&data, &cfg)?;
        let Built {
            retained,
            faces,
            interior,
        } = build_hull(&positions, cfg.plane_distance_tolerance)?;
        let mut keep = vec![false; data.len()];
        for &i in &retained {
            keep[i] = true;
        }
        let points: Vec<V> = data
            .into_iter()
            .zip(keep.iter())
            .filter_map(|(v, &k)| k.then_some(v))
            .collect();
        let positions = retained.iter().map(|&i| positions[i].clone()).collect();
        Ok(Self {
            dimension,
            points,
            positions,
            input_indices: retained,
            faces,
            interior,
            cfg,
        })
    }
}

impl ConvexHull<DefaultVertex> {
    /// Build the hull of raw coordinate arrays.
    pub fn from_coordinates(data: Vec<Vec<f64>>, cfg: HullCfg) -> Result<Self, HullError> {
        Self::create(data.into_iter().map(DefaultVertex::new).collect(), cfg)
    }
}

impl<V> ConvexHull<V> {
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Boundary vertices in input order.
    #[inline]
    pub fn points(&self) -> &[V] {
        &self.points
    }

    /// Simplicial faces; vertex indices point into `points()`.
    #[inline]
    pub fn faces(&self) -> &[ConvexFace] {
        &self.faces
    }

    /// For each retained vertex, its position in the original input.
    #[inline]
    pub fn input_indices(&self) -> &[usize] {
        &self.input_indices
    }

    #[inline]
    pub fn cfg(&self) -> HullCfg {
        self.cfg
    }

    /// Give the retained vertices back.
    pub fn into_points(self) -> Vec<V> {
        self.points
    }

    /// Position of retained vertex `i`; `None` if out of range.
    #[inline]
    pub fn position(&self, i: usize) -> Option<&DVector<f64>> {
        self.positions.get(i)
    }

    /// Whether `p` lies inside or within tolerance of the hull.
    pub fn contains(&self, p: &[f64]) -> bool {
        if p.len() != self.dimension {
            return false;
        }
        let tol = self.cfg.plane_distance_tolerance;
        self.faces.iter().all(|f| f.signed_distance(p) <= tol)
    }
}
