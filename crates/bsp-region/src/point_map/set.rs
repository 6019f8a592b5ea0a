//! Point sets backed by a [`PointMap`] with unit values.

use crate::{GeometryError, Point, Precision};

use super::map::{Iter, PointMap};

/// A set of points, with the same tolerance-aware equality as [`PointMap`].
#[derive(Debug, Clone)]
pub struct PointSet<P> {
    map: PointMap<P, ()>,
}

impl<P: Point> Default for PointSet<P> {
    fn default() -> Self {
        Self::new(Precision::default())
    }
}

impl<P: Point> PointSet<P> {
    /// Creates an empty set with the default bucket capacity.
    pub fn new(precision: Precision) -> Self {
        Self {
            map: PointMap::new(precision),
        }
    }

    /// Creates an empty set whose leaves split above `bucket_capacity` points.
    pub fn with_bucket_capacity(precision: Precision, bucket_capacity: usize) -> Self {
        Self {
            map: PointMap::with_bucket_capacity(precision, bucket_capacity),
        }
    }

    /// Adds `point`, returning `false` if an equal point was already present.
    pub fn insert(&mut self, point: P) -> Result<bool, GeometryError> {
        Ok(self.map.put(point, ())?.is_none())
    }

    /// Returns `true` if a point equal to `point` within the precision is present.
    pub fn contains(&self, point: &P) -> bool {
        self.map.contains_key(point)
    }

    /// Stored point equal to `point`.
    pub fn get(&self, point: &P) -> Option<&P> {
        self.map.resolve_key(point)
    }

    /// Removes the point equal to `point`, returning `true` if one was present.
    pub fn remove(&mut self, point: &P) -> bool {
        self.map.remove(point).is_some()
    }

    /// Removes and returns the stored point equal to `point`.
    pub fn take(&mut self, point: &P) -> Option<P> {
        self.map.remove_entry(point).map(|(stored, ())| stored)
    }

    /// Number of points in the set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set holds no points.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every point.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Keeps only the points for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&P) -> bool,
    {
        self.map.retain(|point, ()| keep(point));
    }

    /// Stored point closest to `point`.
    pub fn nearest(&self, point: &P) -> Option<&P> {
        self.map.nearest_entry(point).map(|(stored, ())| stored)
    }

    /// Stored point farthest from `point`.
    pub fn farthest(&self, point: &P) -> Option<&P> {
        self.map.farthest_entry(point).map(|(stored, ())| stored)
    }

    /// Iterates over the stored points in no particular order.
    pub fn iter(&self) -> SetIter<'_, P> {
        SetIter {
            inner: self.map.iter(),
        }
    }
}

/// Iterator over the points of a [`PointSet`].
pub struct SetIter<'a, P> {
    inner: Iter<'a, P, ()>,
}

impl<'a, P> Iterator for SetIter<'a, P> {
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(point, ())| point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<P> ExactSizeIterator for SetIter<'_, P> {}

impl<'a, P: Point> IntoIterator for &'a PointSet<P> {
    type Item = &'a P;
    type IntoIter = SetIter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
