//! Merging nearly coplanar simplicial faces into flat facets.
//!
//! Two adjacent faces merge when each one's opposite vertex lies within
//! `merge_tolerance` of the other's hyperplane. Groups are the connected
//! components of that relation (union-find over adjacency).

use nalgebra::DVector;

use super::ConvexHull;
use crate::model::ConvexFace;

/// A maximal flat boundary piece made of one or more simplicial faces.
#[derive(Clone, Debug)]
pub struct Facet {
    /// Indices into the hull's `faces()`.
    pub faces: Vec<usize>,
    /// Sorted, unique indices into the hull's `points()`.
    pub vertices: Vec<usize>,
    /// Mean of member normals, renormalized.
    pub normal: DVector<f64>,
    /// Mean of `normal·v` over the facet's vertices.
    pub offset: f64,
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

/// Connected groups of faces whose shared ridges join coplanar neighbours.
///
/// `positions` is indexed by the faces' vertex indices.
pub(crate) fn coplanar_groups(
    faces: &[ConvexFace],
    positions: &[DVector<f64>],
    tol: f64,
) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..faces.len()).collect();
    for (f, face) in faces.iter().enumerate() {
        for (slot, &g) in face.adjacency.iter().enumerate() {
            if g <= f {
                continue;
            }
            let other = &faces[g];
            let Some(back) = other.adjacency.iter().position(|&x| x == f) else {
                continue;
            };
            let opp_f = positions[face.vertices[slot]].as_slice();
            let opp_g = positions[other.vertices[back]].as_slice();
            if other.signed_distance(opp_f).abs() <= tol && face.signed_distance(opp_g).abs() <= tol
            {
                let (rf, rg) = (find(&mut parent, f), find(&mut parent, g));
                if rf != rg {
                    parent[rg] = rf;
                }
            }
        }
    }

    let mut group_of_root = vec![usize::MAX; faces.len()];
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for f in 0..faces.len() {
        let root = find(&mut parent, f);
        if group_of_root[root] == usize::MAX {
            group_of_root[root] = groups.len();
            groups.push(Vec::new());
        }
        groups[group_of_root[root]].push(f);
    }
    groups
}

/// Renormalized sum of the member normals.
pub(crate) fn group_normal(faces: &[ConvexFace], group: &[usize], dim: usize) -> DVector<f64> {
    let mut normal = DVector::zeros(dim);
    for &f in group {
        normal += &faces[f].normal;
    }
    let norm = normal.norm();
    if norm > 0.0 {
        normal /= norm;
    }
    normal
}

impl<V> ConvexHull<V> {
    /// Group coplanar faces (within `merge_tolerance`) into facets.
    pub fn facets(&self) -> Vec<Facet> {
        coplanar_groups(&self.faces, &self.positions, self.cfg.merge_tolerance)
            .into_iter()
            .map(|faces| {
                let normal = group_normal(&self.faces, &faces, self.dimension);
                let mut vertices: Vec<usize> = faces
                    .iter()
                    .flat_map(|&f| self.faces[f].vertices.iter().copied())
                    .collect();
                vertices.sort_unstable();
                vertices.dedup();
                let offset = vertices
                    .iter()
                    .map(|&v| normal.dot(&self.positions[v]))
                    .sum::<f64>()
                    / vertices.len() as f64;
                Facet {
                    faces,
                    vertices,
                    normal,
                    offset,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{ConvexHull, HullCfg};

    #[test]
    fn cube_merges_into_six_squares() {
        let mut pts = Vec::new();
        for &x in &[0.0, 1.0] {
            for &y in &[0.0, 1.0] {
                for &z in &[0.0, 1.0] {
                    pts.push(vec![x, y, z]);
                }
            }
        }
        let hull = ConvexHull::from_coordinates(pts, HullCfg::default()).unwrap();
        assert_eq!(hull.faces().len(), 12);
        let facets = hull.facets();
        assert_eq!(facets.len(), 6);
        for facet in &facets {
            assert_eq!(facet.faces.len(), 2);
            assert_eq!(facet.vertices.len(), 4);
            // Axis-aligned unit normal.
            let max = facet.normal.iter().fold(0.0f64, |m, x| m.max(x.abs()));
            assert!((max - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn tetrahedron_has_no_merges() {
        let pts = vec![
            vec![1.0, 1.0, 1.0],
            vec![1.0, -1.0, -1.0],
            vec![-1.0, 1.0, -1.0],
            vec![-1.0, -1.0, 1.0],
        ];
        let hull = ConvexHull::from_coordinates(pts, HullCfg::default()).unwrap();
        let facets = hull.facets();
        assert_eq!(facets.len(), 4);
        assert!(facets.iter().all(|f| f.faces.len() == 1));
    }
}
