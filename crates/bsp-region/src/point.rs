//! The point capability consumed by trees and point maps.

use std::fmt::Debug;

use nalgebra as na;

use crate::Precision;

/// A point in a Euclidean space of fixed dimension.
///
/// Trees only need finiteness checks and distances; the point map and the
/// region size computation additionally need per-axis coordinates. The trait
/// is implemented for every `nalgebra::Point<f64, D>`.
pub trait Point: Clone + Debug {
    /// Number of coordinates.
    const DIMENSION: usize;

    /// Returns the coordinate along `axis` (`0..DIMENSION`).
    fn coordinate(&self, axis: usize) -> f64;

    /// Builds a point from exactly `DIMENSION` coordinates.
    fn from_coordinate_slice(coordinates: &[f64]) -> Self;

    /// Returns `true` if every coordinate is finite.
    fn is_finite(&self) -> bool {
        (0..Self::DIMENSION).all(|axis| self.coordinate(axis).is_finite())
    }

    /// Returns `true` if any coordinate is NaN.
    fn is_nan(&self) -> bool {
        (0..Self::DIMENSION).any(|axis| self.coordinate(axis).is_nan())
    }

    /// Euclidean distance to `other`.
    fn distance(&self, other: &Self) -> f64 {
        (0..Self::DIMENSION)
            .map(|axis| {
                let d = self.coordinate(axis) - other.coordinate(axis);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Returns `true` if every coordinate matches `other` within `precision`.
    fn eq_with_precision(&self, other: &Self, precision: &Precision) -> bool {
        (0..Self::DIMENSION).all(|axis| precision.eq(self.coordinate(axis), other.coordinate(axis)))
    }
}

impl<const D: usize> Point for na::Point<f64, D> {
    const DIMENSION: usize = D;

    #[inline]
    fn coordinate(&self, axis: usize) -> f64 {
        self.coords[axis]
    }

    fn from_coordinate_slice(coordinates: &[f64]) -> Self {
        na::Point::from(na::SVector::<f64, D>::from_fn(|row, _| coordinates[row]))
    }

    #[inline]
    fn distance(&self, other: &Self) -> f64 {
        na::distance(self, other)
    }
}
