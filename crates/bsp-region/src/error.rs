//! Error type shared by the fallible constructors and mutators of this crate.

use crate::RegionLocation;

/// Errors reported by argument validation.
///
/// Operations that may legitimately leave a tree untouched (cutting a node,
/// clearing a cut, condensing) report that through a `bool` instead.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum GeometryError {
    /// A point with NaN or infinite coordinates was given where a finite one is required.
    #[error("Point must be finite, found {point}")]
    NonFinitePoint {
        /// Debug representation of the rejected point.
        point: String,
    },

    /// Only `Inside` and `Outside` may be stored at a leaf.
    #[error("Invalid leaf location {location:?}: only Inside or Outside can be assigned")]
    InvalidLocation {
        /// The rejected location.
        location: RegionLocation,
    },

    /// The operation needs a leaf node but was given an internal one.
    #[error("Node is not a leaf")]
    NotALeaf,

    /// Precision epsilon must be finite and non-negative.
    #[error("Invalid precision epsilon {epsilon}: must be finite and non-negative")]
    InvalidEpsilon {
        /// The rejected epsilon.
        epsilon: f64,
    },

    /// The points or direction given cannot define a hyperplane.
    #[error("Degenerate hyperplane: {reason}")]
    DegenerateHyperplane {
        /// What made the input degenerate.
        reason: String,
    },

    /// The interval bounds of a hyperplane subset are invalid.
    #[error("Invalid interval [{start}, {end}]")]
    InvalidInterval {
        /// Interval start.
        start: f64,
        /// Interval end.
        end: f64,
    },

    /// A polygon needs at least three distinct vertices.
    #[error("Polygon needs at least 3 vertices, found {count}")]
    TooFewVertices {
        /// Number of vertices given.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = GeometryError::InvalidLocation {
            location: RegionLocation::Boundary,
        };
        assert!(err.to_string().contains("Boundary"));

        let err = GeometryError::InvalidEpsilon { epsilon: -1.0 };
        assert!(err.to_string().contains("-1"));

        let err = GeometryError::TooFewVertices { count: 2 };
        assert_eq!(err.to_string(), "Polygon needs at least 3 vertices, found 2");
    }
}
