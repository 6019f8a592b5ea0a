//! Epsilon-based floating point comparison shared by all geometric predicates.

use std::cmp::Ordering;

use approx::abs_diff_eq;

use crate::GeometryError;

/// Default epsilon used by [`Precision::default`].
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Compares floating point values with an absolute tolerance.
///
/// Two values are considered equal when they differ by at most `epsilon`.
/// Every hyperplane, convex subset and point map carries one of these so
/// that all classification decisions agree on what "on the boundary" means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Precision {
    epsilon: f64,
}

impl Precision {
    /// Creates a comparator with the given absolute tolerance.
    ///
    /// Returns an error if `epsilon` is negative, NaN or infinite.
    pub fn new(epsilon: f64) -> Result<Self, GeometryError> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(GeometryError::InvalidEpsilon { epsilon });
        }
        Ok(Self { epsilon })
    }

    /// Returns the absolute tolerance.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns `true` if `a` and `b` are within epsilon of each other.
    ///
    /// Infinities of the same sign compare equal.
    #[inline]
    pub fn eq(&self, a: f64, b: f64) -> bool {
        a == b || abs_diff_eq!(a, b, epsilon = self.epsilon)
    }

    /// Returns `true` if `a` is within epsilon of zero.
    #[inline]
    pub fn eq_zero(&self, a: f64) -> bool {
        self.eq(a, 0.0)
    }

    /// Returns `true` if `a` is less than `b` by more than epsilon.
    #[inline]
    pub fn lt(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// Returns `true` if `a` is less than or equal to `b` within epsilon.
    #[inline]
    pub fn lte(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) != Ordering::Greater
    }

    /// Returns `true` if `a` is greater than `b` by more than epsilon.
    #[inline]
    pub fn gt(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    /// Returns `true` if `a` is greater than or equal to `b` within epsilon.
    #[inline]
    pub fn gte(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) != Ordering::Less
    }

    /// Compares two values, treating values within epsilon as equal.
    ///
    /// NaN is ordered after every other value.
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        if self.eq(a, b) {
            Ordering::Equal
        } else {
            a.total_cmp(&b)
        }
    }

    /// Returns the sign of `a`: `Equal` when `a` is within epsilon of zero.
    #[inline]
    pub fn sign(&self, a: f64) -> Ordering {
        self.compare(a, 0.0)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}
