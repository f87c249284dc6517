//! Errors surfaced by hull, triangulation and Voronoi construction.

use std::fmt;

/// Errors raised before (or, for `NumericalBreakdown`, instead of) a result.
#[derive(Clone, Debug, PartialEq)]
pub enum HullError {
    /// No points were supplied.
    NoInput,
    /// Points must live in at least two dimensions.
    DimensionTooLow { dimension: usize },
    /// Point `index` has a different number of coordinates than point 0.
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    /// Point `index` has a NaN or infinite coordinate.
    NonFinite { index: usize },
    /// Fewer than `dimension + 1` points.
    InsufficientPoints {
        dimension: usize,
        required: usize,
        found: usize,
    },
    /// All points lie in an affine subspace of dimension `rank < dimension`.
    Degenerate { dimension: usize, rank: usize },
    /// Tolerance is negative or not finite.
    InvalidTolerance { value: f64 },
    /// A face hyperplane could not be formed during construction.
    NumericalBreakdown { reason: String },
}

impl HullError {
    pub(crate) fn breakdown(reason: impl Into<String>) -> Self {
        Self::NumericalBreakdown {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for HullError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HullError::NoInput => write!(f, "no input points supplied"),
            HullError::DimensionTooLow { dimension } => {
                write!(f, "dimension {dimension} is too low (need at least 2)")
            }
            HullError::DimensionMismatch {
                index,
                expected,
                found,
            } => write!(
                f,
                "point {index} has {found} coordinates, expected {expected}"
            ),
            HullError::NonFinite { index } => {
                write!(f, "point {index} has a non-finite coordinate")
            }
            HullError::InsufficientPoints {
                dimension,
                required,
                found,
            } => write!(
                f,
                "need at least {required} points in dimension {dimension}, got {found}"
            ),
            HullError::Degenerate { dimension, rank } => write!(
                f,
                "input spans only a {rank}-dimensional subspace of R^{dimension}"
            ),
            HullError::InvalidTolerance { value } => {
                write!(f, "tolerance {value} must be finite and non-negative")
            }
            HullError::NumericalBreakdown { reason } => {
                write!(f, "numerical breakdown during construction: {reason}")
            }
        }
    }
}

impl std::error::Error for HullError {}
