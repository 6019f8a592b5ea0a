//! Convex subsets of lines: segments, rays and full lines.

use nalgebra::Point2;

use crate::{
    GeometryError, Hyperplane, HyperplaneConvexSubset, HyperplaneLocation, Line, RegionLocation,
    Split, Transform,
};

/// A convex subset of a [`Line`], given as an abscissa interval `[start, end]`.
///
/// Either bound may be infinite, so the same type represents finite
/// segments, rays and whole lines. Abscissas are measured along the line
/// direction from the line origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    line: Line,
    start: f64,
    end: f64,
}

impl Segment {
    /// Creates the finite segment from `start` to `end`.
    pub fn from_points(
        start: Point2<f64>,
        end: Point2<f64>,
        precision: crate::Precision,
    ) -> Result<Self, GeometryError> {
        let line = Line::from_points(start, end, precision)?;
        let a = line.abscissa(&start);
        let b = line.abscissa(&end);
        Ok(Self {
            line,
            start: a,
            end: b,
        })
    }

    /// Creates the subset of `line` between two abscissas.
    ///
    /// Returns an error if either bound is NaN, if `start > end`, or if both
    /// bounds are the same infinity.
    pub fn from_interval(line: Line, start: f64, end: f64) -> Result<Self, GeometryError> {
        if start.is_nan()
            || end.is_nan()
            || start > end
            || (start.is_infinite() && start == end)
        {
            return Err(GeometryError::InvalidInterval { start, end });
        }
        Ok(Self { line, start, end })
    }

    /// Subset covering the whole line.
    pub fn span(line: Line) -> Self {
        Self {
            line,
            start: f64::NEG_INFINITY,
            end: f64::INFINITY,
        }
    }

    /// Ray starting at `start` and following the line direction to infinity.
    pub fn ray(line: Line, start: Point2<f64>) -> Self {
        let start = line.abscissa(&start);
        Self {
            line,
            start,
            end: f64::INFINITY,
        }
    }

    /// Ray coming from infinity and ending at `end`.
    pub fn reverse_ray(line: Line, end: Point2<f64>) -> Self {
        let end = line.abscissa(&end);
        Self {
            line,
            start: f64::NEG_INFINITY,
            end,
        }
    }

    /// The line this subset lies on.
    #[inline]
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Start abscissa (may be `-inf`).
    #[inline]
    pub fn sub_start(&self) -> f64 {
        self.start
    }

    /// End abscissa (may be `+inf`).
    #[inline]
    pub fn sub_end(&self) -> f64 {
        self.end
    }

    /// Start point, or `None` if the subset is unbounded at its start.
    pub fn start_point(&self) -> Option<Point2<f64>> {
        self.start
            .is_finite()
            .then(|| self.line.point_at(self.start, 0.0))
    }

    /// End point, or `None` if the subset is unbounded at its end.
    pub fn end_point(&self) -> Option<Point2<f64>> {
        self.end.is_finite().then(|| self.line.point_at(self.end, 0.0))
    }

    fn with_interval(&self, start: f64, end: f64) -> Self {
        Self {
            line: self.line.clone(),
            start,
            end,
        }
    }
}

impl HyperplaneConvexSubset<Line> for Segment {
    #[inline]
    fn hyperplane(&self) -> &Line {
        &self.line
    }

    fn is_full(&self) -> bool {
        self.start == f64::NEG_INFINITY && self.end == f64::INFINITY
    }

    fn is_empty(&self) -> bool {
        false
    }

    fn is_infinite(&self) -> bool {
        self.start.is_infinite() || self.end.is_infinite()
    }

    fn size(&self) -> f64 {
        self.end - self.start
    }

    fn centroid(&self) -> Option<Point2<f64>> {
        (self.start.is_finite() && self.end.is_finite())
            .then(|| self.line.point_at(0.5 * (self.start + self.end), 0.0))
    }

    fn classify(&self, point: &Point2<f64>) -> RegionLocation {
        if !self.line.contains(point) {
            return RegionLocation::Outside;
        }
        let precision = self.line.precision();
        let abscissa = self.line.abscissa(point);
        if (self.start.is_finite() && precision.eq(abscissa, self.start))
            || (self.end.is_finite() && precision.eq(abscissa, self.end))
        {
            RegionLocation::Boundary
        } else if abscissa > self.start && abscissa < self.end {
            RegionLocation::Inside
        } else {
            RegionLocation::Outside
        }
    }

    fn closest(&self, point: &Point2<f64>) -> Point2<f64> {
        let abscissa = self.line.abscissa(point).clamp(self.start, self.end);
        self.line.point_at(abscissa, 0.0)
    }

    fn split(&self, splitter: &Line) -> Split<Self> {
        let Some(intersection) = self.line.intersection(splitter) else {
            // Parallel: the whole subset is on one side, or on the splitter itself.
            return match splitter.classify(&self.line.origin()) {
                HyperplaneLocation::Minus => Split::new(Some(self.clone()), None),
                HyperplaneLocation::Plus => Split::new(None, Some(self.clone())),
                HyperplaneLocation::On => Split::new(None, None),
            };
        };

        let precision = self.line.precision();
        let t = self.line.abscissa(&intersection);

        // Side of the splitter reached by moving forward along this line.
        let forward_is_plus = self.line.direction().perp(&splitter.direction()) > 0.0;

        let (lower, upper) = if precision.lte(self.end, t) {
            (Some(self.clone()), None)
        } else if precision.gte(self.start, t) {
            (None, Some(self.clone()))
        } else {
            (
                Some(self.with_interval(self.start, t)),
                Some(self.with_interval(t, self.end)),
            )
        };

        if forward_is_plus {
            Split::new(lower, upper)
        } else {
            Split::new(upper, lower)
        }
    }

    fn transform<T: Transform<Point2<f64>>>(&self, transform: &T) -> Result<Self, GeometryError> {
        let line = self.line.transform(transform)?;
        let map = |abscissa: f64| {
            if abscissa.is_finite() {
                line.abscissa(&transform.apply(&self.line.point_at(abscissa, 0.0)))
            } else {
                abscissa
            }
        };
        let start = map(self.start);
        let end = map(self.end);
        Ok(Self { line, start, end })
    }

    fn reverse(&self) -> Self {
        Self {
            line: self.line.reverse(),
            start: -self.end,
            end: -self.start,
        }
    }
}
