//! Point transforms applied to trees, hyperplanes and convex subsets.

use nalgebra::{Affine2, Isometry2, Point2, Rotation2, Translation2};

/// A map from points to points.
///
/// Trees use [`preserves_orientation`](Transform::preserves_orientation) to
/// decide whether the minus and plus children of every node must be swapped
/// after the cuts are transformed.
pub trait Transform<P> {
    /// Maps a single point.
    fn apply(&self, point: &P) -> P;

    /// Returns `false` for transforms that flip handedness (e.g. reflections).
    fn preserves_orientation(&self) -> bool;
}

impl Transform<Point2<f64>> for Affine2<f64> {
    fn apply(&self, point: &Point2<f64>) -> Point2<f64> {
        self.transform_point(point)
    }

    fn preserves_orientation(&self) -> bool {
        let m = self.matrix();
        m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)] > 0.0
    }
}

impl Transform<Point2<f64>> for Isometry2<f64> {
    fn apply(&self, point: &Point2<f64>) -> Point2<f64> {
        self.transform_point(point)
    }

    fn preserves_orientation(&self) -> bool {
        true
    }
}

impl Transform<Point2<f64>> for Rotation2<f64> {
    fn apply(&self, point: &Point2<f64>) -> Point2<f64> {
        self.transform_point(point)
    }

    fn preserves_orientation(&self) -> bool {
        true
    }
}

impl Transform<Point2<f64>> for Translation2<f64> {
    fn apply(&self, point: &Point2<f64>) -> Point2<f64> {
        self.transform_point(point)
    }

    fn preserves_orientation(&self) -> bool {
        true
    }
}

/// A transform backed by a closure.
///
/// The caller states whether the closure preserves orientation.
pub struct FnTransform<F> {
    func: F,
    preserves_orientation: bool,
}

impl<F> FnTransform<F> {
    /// Creates a transform from a closure and its orientation flag.
    pub fn new(func: F, preserves_orientation: bool) -> Self {
        Self {
            func,
            preserves_orientation,
        }
    }
}

impl<P, F> Transform<P> for FnTransform<F>
where
    F: Fn(&P) -> P,
{
    fn apply(&self, point: &P) -> P {
        (self.func)(point)
    }

    fn preserves_orientation(&self) -> bool {
        self.preserves_orientation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector2};

    #[test]
    fn affine_orientation_follows_determinant() {
        let scale = Affine2::from_matrix_unchecked(Matrix3::new(
            2.0, 0.0, 1.0, //
            0.0, 3.0, 0.0, //
            0.0, 0.0, 1.0,
        ));
        assert!(scale.preserves_orientation());
        let p = scale.apply(&Point2::new(1.0, 1.0));
        assert_relative_eq!(p, Point2::new(3.0, 3.0));

        let reflect = Affine2::from_matrix_unchecked(Matrix3::new(
            -1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0,
        ));
        assert!(!reflect.preserves_orientation());
    }

    #[test]
    fn rigid_transforms_preserve_orientation() {
        let iso = Isometry2::new(Vector2::new(1.0, 2.0), std::f64::consts::FRAC_PI_2);
        assert!(iso.preserves_orientation());
        assert_relative_eq!(iso.apply(&Point2::new(1.0, 0.0)), Point2::new(1.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn closure_transform() {
        let mirror = FnTransform::new(|p: &Point2<f64>| Point2::new(p.x, -p.y), false);
        assert!(!Transform::<Point2<f64>>::preserves_orientation(&mirror));
        assert_eq!(mirror.apply(&Point2::new(1.0, 2.0)), Point2::new(1.0, -2.0));
    }
}
