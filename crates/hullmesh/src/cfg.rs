//! Tolerance defaults and the construction config.
//!
//! Policy
//! - Defaults are fixed constants; callers override through `HullCfg` only when
//!   their coordinates live on an unusual scale.
//! - `plane_distance_tolerance` decides visibility and membership. A point within
//!   this distance of a face is treated as lying on it.
//! - `merge_tolerance` decides when adjacent simplicial faces are reported as one
//!   flat facet. It never changes the simplicial face set itself.

use crate::error::HullError;

/// Default plane-distance tolerance for visibility and membership tests.
pub const DEFAULT_PLANE_DISTANCE_TOLERANCE: f64 = 1e-10;
/// Default tolerance for merging nearly coplanar faces into facets.
pub const DEFAULT_MERGE_TOLERANCE: f64 = 1e-9;
/// Lifted faces whose unit normal has `|n_last|` below this are vertical.
pub(crate) const VERTICAL_EPS: f64 = 1e-12;
/// Barycentric slack for point location in a triangulation.
pub(crate) const LOCATE_EPS: f64 = 1e-12;

/// Construction config (tolerances).
///
/// Both tolerances are absolute distances in input units. The defaults suit
/// coordinates of magnitude around 1; for data far from the origin or spread
/// over a large range, rounding in face offsets grows with the coordinates and
/// can exceed `1e-10`. Use `HullCfg::scaled` with the largest coordinate
/// magnitude in that case.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HullCfg {
    pub plane_distance_tolerance: f64,
    pub merge_tolerance: f64,
}

impl Default for HullCfg {
    fn default() -> Self {
        Self {
            plane_distance_tolerance: DEFAULT_PLANE_DISTANCE_TOLERANCE,
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
        }
    }
}

impl HullCfg {
    /// Config with a custom plane-distance tolerance; the merge tolerance is kept
    /// at least as large so that coplanar faces still group.
    pub fn with_tolerance(plane_distance_tolerance: f64) -> Self {
        Self {
            plane_distance_tolerance,
            merge_tolerance: DEFAULT_MERGE_TOLERANCE.max(plane_distance_tolerance),
        }
    }

    /// Defaults multiplied by `extent` (largest absolute coordinate), never
    /// below the defaults themselves.
    pub fn scaled(extent: f64) -> Self {
        let factor = extent.abs().max(1.0);
        Self {
            plane_distance_tolerance: DEFAULT_PLANE_DISTANCE_TOLERANCE * factor,
            merge_tolerance: DEFAULT_MERGE_TOLERANCE * factor,
        }
    }

    /// `scaled` for the largest absolute coordinate in `points`.
    pub fn for_points<P: AsRef<[f64]>>(points: &[P]) -> Self {
        let extent = points
            .iter()
            .flat_map(|p| p.as_ref().iter())
            .fold(0.0f64, |m, x| m.max(x.abs()));
        Self::scaled(extent)
    }

    pub(crate) fn validate(&self) -> Result<(), HullError> {
        for value in [self.plane_distance_tolerance, self.merge_tolerance] {
            if !value.is_finite() || value < 0.0 {
                return Err(HullError::InvalidTolerance { value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let cfg = HullCfg::default();
        assert_eq!(cfg.plane_distance_tolerance, DEFAULT_PLANE_DISTANCE_TOLERANCE);
        assert_eq!(cfg.merge_tolerance, DEFAULT_MERGE_TOLERANCE);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn with_tolerance_keeps_merge_at_least_plane() {
        let cfg = HullCfg::with_tolerance(1e-6);
        assert_eq!(cfg.plane_distance_tolerance, 1e-6);
        assert!(cfg.merge_tolerance >= 1e-6);
    }

    #[test]
    fn scaled_grows_with_extent_only() {
        assert_eq!(HullCfg::scaled(0.5), HullCfg::default());
        let cfg = HullCfg::scaled(-1e6);
        assert!((cfg.plane_distance_tolerance - 1e-4).abs() < 1e-18);
        assert!((cfg.merge_tolerance - 1e-3).abs() < 1e-15);
        let pts = vec![vec![0.0, 2e3], vec![-5e3, 1.0]];
        assert_eq!(HullCfg::for_points(&pts), HullCfg::scaled(5e3));
        assert!(HullCfg::scaled(f64::NAN).validate().is_err());
    }

    #[test]
    fn negative_or_nan_tolerance_rejected() {
        assert!(matches!(
            HullCfg::with_tolerance(-1.0).validate(),
            Err(HullError::InvalidTolerance { .. })
        ));
        let cfg = HullCfg {
            plane_distance_tolerance: f64::NAN,
            ..HullCfg::default()
        };
        assert!(cfg.validate().is_err());
    }
}
