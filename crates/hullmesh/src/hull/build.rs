//! Incremental hull construction with conflict lists.
//!
//! Algorithm
//! - Seed with a full-dimensional simplex (`extreme_simplex`); its centroid stays
//!   strictly inside the hull forever and orients every face.
//! - Every other point goes to the conflict list of the face it is furthest beyond.
//! - Pop a face with conflicts, take its furthest point (apex), flood the visible
//!   region through adjacency, and replace it by a cone over the horizon ridges.
//!   Near-ties for the seed and the apex go to the candidate furthest from the
//!   start/interior point, so every vertex ever inserted is a final hull vertex
//!   and coplanar lattice points never split faces.
//! - Conflict points of deleted faces are redistributed to the cone; points not
//!   beyond any new face by more than `tol` are interior and dropped.
//!
//! Faces live in an arena with tombstones so ids stay stable during the run; the
//! final pass compacts live faces and renumbers vertices to the retained set.

use std::collections::HashMap;

use nalgebra::DVector;

use super::facets::{coplanar_groups, group_normal};
use crate::error::HullError;
use crate::linalg::{centroid, extreme_simplex, hyperplane_through};
use crate::model::ConvexFace;

const NO_FACE: usize = usize::MAX;

#[derive(Clone, Debug)]
struct WorkFace {
    vertices: Vec<usize>,
    adjacency: Vec<usize>,
    normal: DVector<f64>,
    offset: f64,
    outside: Vec<usize>,
    alive: bool,
}

impl WorkFace {
    #[inline]
    fn distance(&self, p: &DVector<f64>) -> f64 {
        self.normal.dot(p) - self.offset
    }
}

/// Output of a run: compacted faces over retained vertices.
pub(crate) struct Built {
    /// Input indices of retained (boundary) vertices, ascending.
    pub retained: Vec<usize>,
    /// Faces with vertex indices into `retained`.
    pub faces: Vec<ConvexFace>,
    /// A point strictly inside the hull.
    pub interior: DVector<f64>,
}

struct Builder<'a> {
    points: &'a [DVector<f64>],
    dim: usize,
    tol: f64,
    interior: DVector<f64>,
    faces: Vec<WorkFace>,
    pending: Vec<usize>,
}

/// Build the hull of already validated points (common dimension, ≥ d+1 points).
///
/// A retained vertex that is not a corner (it lies within `tol` of an edge or a
/// flat piece spanned by other vertices) is dropped and the hull rebuilt
/// without it. Ties on lattices are the usual cause.
pub(crate) fn build_hull(points: &[DVector<f64>], tol: f64) -> Result<Built, HullError> {
    let mut built = build_once(points, tol)?;
    let mut flat = flat_vertices(&built, points, tol);
    let mut keep = vec![true; points.len()];
    while !flat.is_empty() {
        tracing::debug!(dropped = flat.len(), "rebuilding without non-corner vertices");
        for &i in &flat {
            keep[i] = false;
        }
        let active: Vec<usize> = (0..points.len()).filter(|&i| keep[i]).collect();
        let subset: Vec<DVector<f64>> = active.iter().map(|&i| points[i].clone()).collect();
        let mut rebuilt = build_once(&subset, tol)?;
        flat = flat_vertices(&rebuilt, &subset, tol)
            .into_iter()
            .map(|i| active[i])
            .collect();
        for r in rebuilt.retained.iter_mut() {
            *r = active[*r];
        }
        built = rebuilt;
    }
    Ok(built)
}

/// Retained vertices (indices into `points`) whose incident flat pieces have
/// normals of rank below `d`.
///
/// A vertex inside an edge or a facet only touches pieces whose normals share a
/// common null direction. The rank cutoff is `tol / diameter`, so a flagged
/// vertex is within about `tol` of the other vertices' hull.
fn flat_vertices(built: &Built, points: &[DVector<f64>], tol: f64) -> Vec<usize> {
    let dim = built.interior.len();
    let positions: Vec<DVector<f64>> = built.retained.iter().map(|&i| points[i].clone()).collect();
    let groups = coplanar_groups(&built.faces, &positions, tol);
    let normals: Vec<DVector<f64>> = groups
        .iter()
        .map(|g| group_normal(&built.faces, g, dim))
        .collect();
    let radius = positions
        .iter()
        .map(|p| (p - &built.interior).norm())
        .fold(0.0f64, f64::max);
    let cutoff = tol / (2.0 * radius).max(f64::MIN_POSITIVE);

    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); positions.len()];
    for (g, faces) in groups.iter().enumerate() {
        for &f in faces {
            for &v in &built.faces[f].vertices {
                if incident[v].last() != Some(&g) {
                    incident[v].push(g);
                }
            }
        }
    }

    let mut flat = Vec::new();
    for (v, pieces) in incident.iter().enumerate() {
        let mut basis: Vec<DVector<f64>> = Vec::with_capacity(dim);
        for &g in pieces {
            let mut r = normals[g].clone();
            for q in &basis {
                let proj = q.dot(&r);
                r.axpy(-proj, q, 1.0);
            }
            let len = r.norm();
            if len > cutoff {
                basis.push(r / len);
                if basis.len() == dim {
                    break;
                }
            }
        }
        if basis.len() < dim {
            flat.push(built.retained[v]);
        }
    }
    flat
}

fn build_once(points: &[DVector<f64>], tol: f64) -> Result<Built, HullError> {
    let dim = points[0].len();
    let seed = extreme_simplex(points, tol);
    if seed.rank < dim {
        return Err(HullError::Degenerate {
            dimension: dim,
            rank: seed.rank,
        });
    }
    let interior = centroid(seed.indices.iter().map(|&i| &points[i]));
    let mut builder = Builder {
        points,
        dim,
        tol,
        interior,
        faces: Vec::new(),
        pending: Vec::new(),
    };
    builder.seed(&seed.indices)?;
    let mut inserted = 0usize;
    while let Some(fid) = builder.pending.pop() {
        let Some(apex) = builder.furthest_conflict(fid) else {
            continue;
        };
        builder.insert(fid, apex)?;
        inserted += 1;
    }
    let built = builder.finish();
    tracing::debug!(
        dim,
        input = points.len(),
        inserted,
        vertices = built.retained.len(),
        faces = built.faces.len(),
        "hull built"
    );
    Ok(built)
}

impl Builder<'_> {
    /// New face through `vertices`, oriented away from the interior point.
    ///
    /// Returns the face and whether vertices 0 and 1 were swapped to fix the
    /// orientation.
    fn make_face(&self, mut vertices: Vec<usize>) -> Result<(WorkFace, bool), HullError> {
        let pts: Vec<&DVector<f64>> = vertices.iter().map(|&v| &self.points[v]).collect();
        let (mut normal, mut offset) = hyperplane_through(&pts)
            .ok_or_else(|| HullError::breakdown(format!("flat face over {vertices:?}")))?;
        let flipped = normal.dot(&self.interior) - offset > 0.0;
        if flipped {
            vertices.swap(0, 1);
            normal = -normal;
            offset = -offset;
        }
        let face = WorkFace {
            vertices,
            adjacency: vec![NO_FACE; self.dim],
            normal,
            offset,
            outside: Vec::new(),
            alive: true,
        };
        Ok((face, flipped))
    }

    fn seed(&mut self, simplex: &[usize]) -> Result<(), HullError> {
        let mut ids = Vec::with_capacity(simplex.len());
        for skip in 0..simplex.len() {
            let vertices: Vec<usize> = simplex
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &v)| v)
                .collect();
            let (face, _) = self.make_face(vertices)?;
            ids.push(self.faces.len());
            self.faces.push(face);
        }
        self.link_ridges(&ids)?;
        let mut in_seed = vec![false; self.points.len()];
        for &v in simplex {
            in_seed[v] = true;
        }
        for p in 0..self.points.len() {
            if !in_seed[p] {
                self.assign(p, &ids);
            }
        }
        self.pending.extend(ids);
        Ok(())
    }

    /// Pair up open slots of `ids` by their ridge vertex sets.
    fn link_ridges(&mut self, ids: &[usize]) -> Result<(), HullError> {
        let mut open: HashMap<Vec<usize>, (usize, usize)> = HashMap::new();
        for &f in ids {
            for slot in 0..self.dim {
                if self.faces[f].adjacency[slot] != NO_FACE {
                    continue;
                }
                let mut key: Vec<usize> = self.faces[f]
                    .vertices
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != slot)
                    .map(|(_, &v)| v)
                    .collect();
                key.sort_unstable();
                match open.remove(&key) {
                    Some((g, gslot)) => {
                        self.faces[f].adjacency[slot] = g;
                        self.faces[g].adjacency[gslot] = f;
                    }
                    None => {
                        open.insert(key, (f, slot));
                    }
                }
            }
        }
        if open.is_empty() {
            Ok(())
        } else {
            Err(HullError::breakdown(format!(
                "{} ridges left unmatched after cone construction",
                open.len()
            )))
        }
    }

    /// Put `p` in the conflict list of the face among `candidates` it is furthest beyond.
    fn assign(&mut self, p: usize, candidates: &[usize]) {
        let points = self.points;
        let point = &points[p];
        let mut best: Option<(usize, f64)> = None;
        for &f in candidates {
            let dist = self.faces[f].distance(point);
            if dist > self.tol && best.map_or(true, |(_, bd)| dist > bd) {
                best = Some((f, dist));
            }
        }
        if let Some((f, _)) = best {
            self.faces[f].outside.push(p);
        }
    }

    /// Apex for `fid`: the furthest outside point. Distances within `tol` of the
    /// maximum tie, and the tie goes to the point furthest from the interior
    /// point, which is extreme among the tied set.
    fn furthest_conflict(&self, fid: usize) -> Option<usize> {
        let face = &self.faces[fid];
        if !face.alive {
            return None;
        }
        let best = face
            .outside
            .iter()
            .map(|&p| face.distance(&self.points[p]))
            .fold(f64::NEG_INFINITY, f64::max);
        let mut pick: Option<(usize, f64)> = None;
        for &p in &face.outside {
            if face.distance(&self.points[p]) < best - self.tol {
                continue;
            }
            let reach = (&self.points[p] - &self.interior).norm_squared();
            if pick.map_or(true, |(_, pr)| reach > pr) {
                pick = Some((p, reach));
            }
        }
        pick.map(|(p, _)| p)
    }

    fn insert(&mut self, start: usize, apex: usize) -> Result<(), HullError> {
        let points = self.points;
        let point = &points[apex];

        // Flood the visible region; remember horizon slots (visible face, slot).
        let mut visible_flag: HashMap<usize, bool> = HashMap::new();
        visible_flag.insert(start, true);
        let mut visible = vec![start];
        let mut stack = vec![start];
        let mut horizon: Vec<(usize, usize)> = Vec::new();
        while let Some(f) = stack.pop() {
            for slot in 0..self.dim {
                let g = self.faces[f].adjacency[slot];
                let is_visible = match visible_flag.get(&g) {
                    Some(&flag) => flag,
                    None => {
                        let flag = self.faces[g].distance(point) > self.tol;
                        visible_flag.insert(g, flag);
                        if flag {
                            visible.push(g);
                            stack.push(g);
                        }
                        flag
                    }
                };
                if !is_visible {
                    horizon.push((f, slot));
                }
            }
        }

        // Cone over the horizon.
        let mut cone = Vec::with_capacity(horizon.len());
        for &(f, slot) in &horizon {
            let hidden = self.faces[f].adjacency[slot];
            let mut vertices = self.faces[f].vertices.clone();
            vertices[slot] = apex;
            let (mut face, flipped) = self.make_face(vertices)?;
            let apex_slot = if flipped && slot < 2 { 1 - slot } else { slot };
            face.adjacency[apex_slot] = hidden;
            let id = self.faces.len();
            self.faces.push(face);
            let back = self.faces[hidden]
                .adjacency
                .iter()
                .position(|&x| x == f)
                .ok_or_else(|| HullError::breakdown("horizon neighbour lost its back link"))?;
            self.faces[hidden].adjacency[back] = id;
            cone.push(id);
        }
        self.link_ridges(&cone)?;

        let mut orphans = Vec::new();
        for &v in &visible {
            let face = &mut self.faces[v];
            face.alive = false;
            orphans.append(&mut face.outside);
        }
        for q in orphans {
            if q != apex {
                self.assign(q, &cone);
            }
        }
        tracing::trace!(
            apex,
            visible = visible.len(),
            horizon = horizon.len(),
            "inserted point"
        );
        self.pending.extend(cone);
        Ok(())
    }

    fn finish(self) -> Built {
        let mut face_map = vec![NO_FACE; self.faces.len()];
        let mut used = vec![false; self.points.len()];
        let mut live = 0usize;
        for (id, face) in self.faces.iter().enumerate() {
            if face.alive {
                face_map[id] = live;
                live += 1;
                for &v in &face.vertices {
                    used[v] = true;
                }
            }
        }
        let mut vertex_map = vec![NO_FACE; self.points.len()];
        let mut retained = Vec::new();
        for (i, &u) in used.iter().enumerate() {
            if u {
                vertex_map[i] = retained.len();
                retained.push(i);
            }
        }
        let faces = self
            .faces
            .into_iter()
            .filter(|f| f.alive)
            .map(|f| ConvexFace {
                vertices: f.vertices.iter().map(|&v| vertex_map[v]).collect(),
                adjacency: f.adjacency.iter().map(|&g| face_map[g]).collect(),
                normal: f.normal,
                offset: f.offset,
            })
            .collect();
        Built {
            retained,
            faces,
            interior: self.interior,
        }
    }
}
