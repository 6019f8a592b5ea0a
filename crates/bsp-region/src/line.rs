//! Oriented lines: the hyperplanes of the Euclidean plane.

use nalgebra::{Point2, Vector2};

use crate::{GeometryError, Hyperplane, Precision, Segment, Transform};

/// An oriented line in 2D space.
///
/// The line is stored as the point closest to the origin plus a unit
/// direction. Points to the left of the direction are on the minus side,
/// points to the right on the plus side, so a counter-clockwise polygon has
/// its interior on the minus side of each edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    origin: Point2<f64>,
    direction: Vector2<f64>,
    precision: Precision,
}

impl Line {
    /// Creates the line through `p1` and `p2`, directed from `p1` towards `p2`.
    ///
    /// Returns an error if the points are equal within `precision`.
    pub fn from_points(
        p1: Point2<f64>,
        p2: Point2<f64>,
        precision: Precision,
    ) -> Result<Self, GeometryError> {
        Self::from_point_and_direction(p1, p2 - p1, precision)
    }

    /// Creates a line through `point` with the given direction.
    ///
    /// Returns an error if `direction` has zero length within `precision` or
    /// any input is not finite.
    pub fn from_point_and_direction(
        point: Point2<f64>,
        direction: Vector2<f64>,
        precision: Precision,
    ) -> Result<Self, GeometryError> {
        let norm = direction.norm();
        if !norm.is_finite() || !point.coords.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::DegenerateHyperplane {
                reason: format!("non-finite point {point:?} or direction {direction:?}"),
            });
        }
        if precision.eq_zero(norm) {
            return Err(GeometryError::DegenerateHyperplane {
                reason: format!("direction {direction:?} has zero length"),
            });
        }
        Ok(Self::from_unit_direction(point, direction / norm, precision))
    }

    /// Creates a line through `point` whose direction makes `angle` radians
    /// with the positive x axis.
    pub fn from_point_and_angle(point: Point2<f64>, angle: f64, precision: Precision) -> Self {
        Self::from_unit_direction(point, Vector2::new(angle.cos(), angle.sin()), precision)
    }

    fn from_unit_direction(point: Point2<f64>, direction: Vector2<f64>, precision: Precision) -> Self {
        let origin = point - direction * direction.dot(&point.coords);
        Self {
            origin,
            direction,
            precision,
        }
    }

    /// The point of the line closest to the coordinate origin.
    #[inline]
    pub fn origin(&self) -> Point2<f64> {
        self.origin
    }

    /// The unit direction of the line.
    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        self.direction
    }

    /// Unit normal pointing into the plus side.
    #[inline]
    pub fn plus_normal(&self) -> Vector2<f64> {
        Vector2::new(self.direction.y, -self.direction.x)
    }

    /// Angle of the direction with the positive x axis, in `[0, 2π)`.
    pub fn angle(&self) -> f64 {
        let angle = self.direction.y.atan2(self.direction.x);
        if angle < 0.0 {
            angle + std::f64::consts::TAU
        } else {
            angle
        }
    }

    /// Position of the projection of `point` along the line, measured from [`origin`](Self::origin).
    #[inline]
    pub fn abscissa(&self, point: &Point2<f64>) -> f64 {
        self.direction.dot(&(point - self.origin))
    }

    /// The point at the given abscissa along the line and offset from it.
    #[inline]
    pub fn point_at(&self, abscissa: f64, offset: f64) -> Point2<f64> {
        self.origin + self.direction * abscissa + self.plus_normal() * offset
    }

    /// Distance from `point` to the line.
    #[inline]
    pub fn distance(&self, point: &Point2<f64>) -> f64 {
        self.offset(point).abs()
    }

    /// Returns `true` if both lines have parallel or antiparallel directions.
    pub fn is_parallel(&self, other: &Line) -> bool {
        self.precision.eq_zero(self.direction.perp(&other.direction))
    }

    /// Intersection point of two lines, or `None` if they are parallel.
    pub fn intersection(&self, other: &Line) -> Option<Point2<f64>> {
        let cross = self.direction.perp(&other.direction);
        if self.precision.eq_zero(cross) {
            return None;
        }
        let t = (other.origin - self.origin).perp(&other.direction) / cross;
        Some(self.origin + self.direction * t)
    }

    /// Returns `true` if both lines describe the same oriented line within precision.
    pub fn eq_with_precision(&self, other: &Line) -> bool {
        self.precision.eq(self.origin.x, other.origin.x)
            && self.precision.eq(self.origin.y, other.origin.y)
            && self.precision.eq(self.direction.x, other.direction.x)
            && self.precision.eq(self.direction.y, other.direction.y)
    }
}

impl Hyperplane for Line {
    type Point = Point2<f64>;
    type Subset = Segment;

    #[inline]
    fn precision(&self) -> &Precision {
        &self.precision
    }

    #[inline]
    fn offset(&self, point: &Point2<f64>) -> f64 {
        (point - self.origin).perp(&self.direction)
    }

    fn project(&self, point: &Point2<f64>) -> Point2<f64> {
        self.point_at(self.abscissa(point), 0.0)
    }

    fn reverse(&self) -> Self {
        Self {
            origin: self.origin,
            direction: -self.direction,
            precision: self.precision,
        }
    }

    fn transform<T: Transform<Point2<f64>>>(&self, transform: &T) -> Result<Self, GeometryError> {
        let p1 = transform.apply(&self.origin);
        let p2 = transform.apply(&(self.origin + self.direction));
        Self::from_point_and_direction(p1, p2 - p1, self.precision)
    }

    fn similar_orientation(&self, other: &Self) -> bool {
        self.direction.dot(&other.direction) >= 0.0
    }

    fn span(&self) -> Segment {
        Segment::span(self.clone())
    }
}
