//! Hyperplane and hyperplane convex subset capabilities.
//!
//! Trees never look inside a hyperplane; they only ask which side a point is
//! on and let convex subsets split themselves. Any geometry implementing
//! these traits can be partitioned by a [`BspTree`](crate::bsp::BspTree).

use std::fmt::Debug;

use crate::{GeometryError, Point, Precision, Transform};

/// Position of a point relative to a hyperplane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HyperplaneLocation {
    /// Strictly on the minus side (negative offset).
    Minus,
    /// Strictly on the plus side (positive offset).
    Plus,
    /// On the hyperplane within tolerance.
    On,
}

/// Position of a point relative to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionLocation {
    /// Inside the region.
    Inside,
    /// Outside the region.
    Outside,
    /// On the region boundary.
    Boundary,
}

/// Which sides of a splitter received a part in a [`Split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitLocation {
    /// No part on either side (e.g. the subset lies on the splitter).
    Neither,
    /// Everything is on the minus side.
    Minus,
    /// Everything is on the plus side.
    Plus,
    /// Parts on both sides.
    Both,
}

/// Result of splitting something with a hyperplane.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<T> {
    minus: Option<T>,
    plus: Option<T>,
}

impl<T> Split<T> {
    /// Creates a split from its two parts.
    pub fn new(minus: Option<T>, plus: Option<T>) -> Self {
        Self { minus, plus }
    }

    /// Part on the minus side of the splitter.
    #[inline]
    pub fn minus(&self) -> Option<&T> {
        self.minus.as_ref()
    }

    /// Part on the plus side of the splitter.
    #[inline]
    pub fn plus(&self) -> Option<&T> {
        self.plus.as_ref()
    }

    /// Consumes the split, returning `(minus, plus)`.
    #[inline]
    pub fn into_parts(self) -> (Option<T>, Option<T>) {
        (self.minus, self.plus)
    }

    /// Reports which sides received a part.
    pub fn location(&self) -> SplitLocation {
        match (&self.minus, &self.plus) {
            (Some(_), Some(_)) => SplitLocation::Both,
            (Some(_), None) => SplitLocation::Minus,
            (None, Some(_)) => SplitLocation::Plus,
            (None, None) => SplitLocation::Neither,
        }
    }
}

/// A codimension-1 flat dividing space into a minus and a plus half-space.
pub trait Hyperplane: Clone + Debug + Sized {
    /// Point type of the space.
    type Point: Point;

    /// Convex subset type used for cuts on this hyperplane.
    type Subset: HyperplaneConvexSubset<Self>;

    /// Tolerance used by this hyperplane's predicates.
    fn precision(&self) -> &Precision;

    /// Signed distance of `point` from the hyperplane, positive on the plus side.
    fn offset(&self, point: &Self::Point) -> f64;

    /// Classifies `point` against the hyperplane using its precision.
    fn classify(&self, point: &Self::Point) -> HyperplaneLocation {
        match self.precision().sign(self.offset(point)) {
            std::cmp::Ordering::Less => HyperplaneLocation::Minus,
            std::cmp::Ordering::Greater => HyperplaneLocation::Plus,
            std::cmp::Ordering::Equal => HyperplaneLocation::On,
        }
    }

    /// Returns `true` if `point` lies on the hyperplane.
    fn contains(&self, point: &Self::Point) -> bool {
        self.classify(point) == HyperplaneLocation::On
    }

    /// Orthogonal projection of `point` onto the hyperplane.
    fn project(&self, point: &Self::Point) -> Self::Point;

    /// The same hyperplane with minus and plus sides exchanged.
    fn reverse(&self) -> Self;

    /// Applies `transform` to the hyperplane.
    ///
    /// Fails if the transform collapses the hyperplane.
    fn transform<T: Transform<Self::Point>>(&self, transform: &T) -> Result<Self, GeometryError>;

    /// Returns `true` if the normals of both hyperplanes point into the same half.
    fn similar_orientation(&self, other: &Self) -> bool;

    /// Subset covering the entire hyperplane.
    fn span(&self) -> Self::Subset;
}

/// A convex, possibly unbounded, piece of a hyperplane.
///
/// Used as the cut of an internal tree node, where it is confined to the
/// node's cell, and as boundary facets of regions.
pub trait HyperplaneConvexSubset<H: Hyperplane>: Clone + Debug + Sized {
    /// The hyperplane this subset lies on.
    fn hyperplane(&self) -> &H;

    /// Returns `true` if the subset covers its whole hyperplane.
    fn is_full(&self) -> bool;

    /// Returns `true` if the subset contains no points.
    fn is_empty(&self) -> bool;

    /// Returns `true` if the subset is unbounded.
    fn is_infinite(&self) -> bool;

    /// Returns `true` if the subset is bounded.
    fn is_finite(&self) -> bool {
        !self.is_infinite()
    }

    /// Measure of the subset in the hyperplane's dimension (may be infinite).
    fn size(&self) -> f64;

    /// Center of mass, or `None` if the subset is unbounded.
    fn centroid(&self) -> Option<H::Point>;

    /// Classifies `point` relative to the subset, as a region of its hyperplane.
    fn classify(&self, point: &H::Point) -> RegionLocation;

    /// Returns `true` if `point` is inside or on the boundary of the subset.
    fn contains(&self, point: &H::Point) -> bool {
        self.classify(point) != RegionLocation::Outside
    }

    /// Closest point of the subset to `point`.
    fn closest(&self, point: &H::Point) -> H::Point;

    /// Splits the subset with `splitter`.
    ///
    /// A subset lying on the splitter yields [`SplitLocation::Neither`].
    fn split(&self, splitter: &H) -> Split<Self>;

    /// Applies `transform` to the subset.
    fn transform<T: Transform<H::Point>>(&self, transform: &T) -> Result<Self, GeometryError>;

    /// The same subset on the reversed hyperplane.
    fn reverse(&self) -> Self;
}

/// Anything that can describe a region by its boundary facets.
pub trait BoundarySource<H: Hyperplane> {
    /// Boundary facets, oriented with the region's interior on their minus side.
    fn boundaries(&self) -> Vec<H::Subset>;
}

impl<H: Hyperplane> BoundarySource<H> for [H::Subset] {
    fn boundaries(&self) -> Vec<H::Subset> {
        self.to_vec()
    }
}

impl<H: Hyperplane> BoundarySource<H> for Vec<H::Subset> {
    fn boundaries(&self) -> Vec<H::Subset> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_location_reflects_present_parts() {
        assert_eq!(Split::new(Some(1), Some(2)).location(), SplitLocation::Both);
        assert_eq!(Split::new(Some(1), None).location(), SplitLocation::Minus);
        assert_eq!(Split::<i32>::new(None, Some(2)).location(), SplitLocation::Plus);
        assert_eq!(Split::<i32>::new(None, None).location(), SplitLocation::Neither);
    }

    #[test]
    fn split_into_parts() {
        let split = Split::new(Some("a"), None);
        assert_eq!(split.minus(), Some(&"a"));
        assert_eq!(split.plus(), None);
        assert_eq!(split.into_parts(), (Some("a"), None));
    }
}
