//! Hull volume via simplex fans anchored at an interior point.
//!
//! Each simplicial face cones to the interior point; the d-simplices tile the
//! hull, so their volumes sum to the hull volume.

use nalgebra::DVector;

use super::ConvexHull;
use crate::linalg::simplex_volume;

impl<V> ConvexHull<V> {
    /// d-dimensional volume (area in 2D).
    pub fn volume(&self) -> f64 {
        let mut total = 0.0;
        for face in &self.faces {
            let mut pts: Vec<&DVector<f64>> = Vec::with_capacity(self.dimension + 1);
            pts.push(&self.interior);
            pts.extend(face.vertices.iter().map(|&v| &self.positions[v]));
            total += simplex_volume(&pts);
        }
        total
    }

    /// (d−1)-dimensional boundary measure (perimeter in 2D, surface area in 3D).
    ///
    /// Uses `vol(cone) = area · height / d` with the interior point as apex.
    pub fn surface_area(&self) -> f64 {
        let d = self.dimension as f64;
        let mut total = 0.0;
        for face in &self.faces {
            let height = -face.signed_distance(self.interior.as_slice());
            if height <= 0.0 {
                continue;
            }
            let mut pts: Vec<&DVector<f64>> = Vec::with_capacity(self.dimension + 1);
            pts.push(&self.interior);
            pts.extend(face.vertices.iter().map(|&v| &self.positions[v]));
            total += simplex_volume(&pts) * d / height;
        }
        total
    }
}
