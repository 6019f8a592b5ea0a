//! Bucketed `2^D`-ary point map.

use std::cmp::Ordering;

use crate::{GeometryError, Point, Precision};

/// Number of entries a leaf holds before it is split.
pub const DEFAULT_BUCKET_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
enum Node<P, V> {
    Leaf(Vec<(P, V)>),
    Internal {
        split: P,
        children: Vec<Option<Box<Node<P, V>>>>,
    },
}

impl<P: Point, V> Node<P, V> {
    fn empty() -> Self {
        Node::Leaf(Vec::new())
    }

    fn is_empty_leaf(&self) -> bool {
        matches!(self, Node::Leaf(entries) if entries.is_empty())
    }

    /// Returns `true` if no child holds anything.
    fn has_only_empty_children(children: &[Option<Box<Self>>]) -> bool {
        children
            .iter()
            .all(|child| child.as_deref().is_none_or(Node::is_empty_leaf))
    }

    fn insert(&mut self, key: P, value: V, capacity: usize) {
        match self {
            Node::Internal { split, children } => {
                let index = child_index(split, &key);
                let child = children[index].get_or_insert_with(|| Box::new(Node::empty()));
                child.insert(key, value, capacity);
            }
            Node::Leaf(entries) => {
                entries.push((key, value));
                if entries.len() > capacity {
                    *self = Node::split(std::mem::take(entries), capacity);
                }
            }
        }
    }

    /// Turns an overflowing bucket into an internal node split at the middle
    /// of the bounding box of its keys.
    ///
    /// A bucket whose keys would all land in the same child stays an
    /// oversized leaf.
    fn split(entries: Vec<(P, V)>, capacity: usize) -> Self {
        let dimension = P::DIMENSION;
        let mut min = vec![f64::INFINITY; dimension];
        let mut max = vec![f64::NEG_INFINITY; dimension];
        for (key, _) in &entries {
            for axis in 0..dimension {
                let coordinate = key.coordinate(axis);
                min[axis] = min[axis].min(coordinate);
                max[axis] = max[axis].max(coordinate);
            }
        }
        // Halve before adding so keys near the float range limits stay finite.
        let middle: Vec<f64> = min.iter().zip(&max).map(|(lo, hi)| lo * 0.5 + hi * 0.5).collect();
        let split = P::from_coordinate_slice(&middle);

        let mut indices = entries.iter().map(|(key, _)| child_index(&split, key));
        let first = indices.next();
        if indices.all(|index| Some(index) == first) {
            tracing::trace!(entries = entries.len(), "point map bucket cannot be separated");
            return Node::Leaf(entries);
        }
        tracing::trace!(entries = entries.len(), split = ?split, "splitting point map bucket");

        let mut node = Node::Internal {
            split,
            children: (0..1usize << dimension).map(|_| None).collect(),
        };
        for (key, value) in entries {
            node.insert(key, value, capacity);
        }
        node
    }

    /// Finds the entry equal to `key`, recording the child indices taken.
    fn locate(&self, key: &P, precision: &Precision, path: &mut Vec<usize>) -> Option<usize> {
        match self {
            Node::Leaf(entries) => entries
                .iter()
                .position(|(stored, _)| stored.eq_with_precision(key, precision)),
            Node::Internal { split, children } => {
                for index in candidate_children(split, key, precision) {
                    if let Some(child) = children[index].as_deref() {
                        path.push(index);
                        if let Some(entry) = child.locate(key, precision, path) {
                            return Some(entry);
                        }
                        path.pop();
                    }
                }
                None
            }
        }
    }

    fn descend(&self, path: &[usize]) -> Option<&Self> {
        let mut node = self;
        for &index in path {
            node = match node {
                Node::Internal { children, .. } => children.get(index)?.as_deref()?,
                Node::Leaf(_) => return None,
            };
        }
        Some(node)
    }

    fn descend_mut(&mut self, path: &[usize]) -> Option<&mut Self> {
        let mut node = self;
        for &index in path {
            node = match node {
                Node::Internal { children, .. } => children.get_mut(index)?.as_deref_mut()?,
                Node::Leaf(_) => return None,
            };
        }
        Some(node)
    }

    /// Collapses internal nodes along `path` whose children are all empty.
    fn collapse_path(&mut self, path: &[usize]) {
        let Node::Internal { children, .. } = self else {
            return;
        };
        if let Some((&first, rest)) = path.split_first() {
            if let Some(child) = children[first].as_deref_mut() {
                child.collapse_path(rest);
            }
        }
        if Self::has_only_empty_children(children) {
            tracing::trace!("collapsing empty point map node");
            *self = Node::empty();
        }
    }

    /// Keeps the entries accepted by `keep`, returning how many were removed.
    fn retain<F>(&mut self, keep: &mut F) -> usize
    where
        F: FnMut(&P, &mut V) -> bool,
    {
        match self {
            Node::Leaf(entries) => {
                let before = entries.len();
                entries.retain_mut(|(key, value)| keep(key, value));
                before - entries.len()
            }
            Node::Internal { children, .. } => {
                let removed: usize = children
                    .iter_mut()
                    .filter_map(|child| child.as_deref_mut())
                    .map(|child| child.retain(&mut *keep))
                    .sum();
                if Self::has_only_empty_children(children) {
                    *self = Node::empty();
                }
                removed
            }
        }
    }
}

/// Child an inserted key goes to: bit `axis` is set when the coordinate is not below the split.
fn child_index<P: Point>(split: &P, key: &P) -> usize {
    (0..P::DIMENSION).fold(0, |index, axis| {
        if key.coordinate(axis) < split.coordinate(axis) {
            index
        } else {
            index | (1 << axis)
        }
    })
}

/// Children that may hold a key equal to `key` within `precision`.
fn candidate_children<P: Point>(split: &P, key: &P, precision: &Precision) -> impl Iterator<Item = usize> {
    // Per axis: may the key be on the minus side, on the plus side.
    let sides: Vec<(bool, bool)> = (0..P::DIMENSION)
        .map(|axis| {
            let coordinate = key.coordinate(axis);
            let split = split.coordinate(axis);
            if precision.eq(coordinate, split) {
                (true, true)
            } else {
                (coordinate < split, coordinate >= split)
            }
        })
        .collect();

    (0..1usize << P::DIMENSION).filter(move |index| {
        sides.iter().enumerate().all(|(axis, &(minus, plus))| {
            if index & (1 << axis) == 0 { minus } else { plus }
        })
    })
}

/// A map from points to values.
///
/// Keys equal within the map's precision are the same key. Lookups run in
/// amortized `O(log n)`: leaves hold up to a bucket capacity of entries and
/// split into `2^D` children around the middle of their keys' bounding box
/// when they overflow. Emptied subtrees collapse back into leaves.
#[derive(Debug, Clone)]
pub struct PointMap<P, V> {
    root: Node<P, V>,
    len: usize,
    precision: Precision,
    bucket_capacity: usize,
}

impl<P: Point, V> Default for PointMap<P, V> {
    fn default() -> Self {
        Self::new(Precision::default())
    }
}

impl<P: Point, V> PointMap<P, V> {
    /// Creates an empty map with the default bucket capacity.
    pub fn new(precision: Precision) -> Self {
        Self::with_bucket_capacity(precision, DEFAULT_BUCKET_CAPACITY)
    }

    /// Creates an empty map whose leaves split above `bucket_capacity` entries.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_bucket_capacity(precision: Precision, bucket_capacity: usize) -> Self {
        Self {
            root: Node::empty(),
            len: 0,
            precision,
            bucket_capacity: bucket_capacity.max(1),
        }
    }

    /// Precision used for key equality.
    #[inline]
    pub fn precision(&self) -> &Precision {
        &self.precision
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.root = Node::empty();
        self.len = 0;
    }

    /// Inserts `value` under `key`.
    ///
    /// If an equal key is already present its value is replaced and returned
    /// and the stored key is kept. Keys with NaN or infinite coordinates are
    /// rejected and leave the map untouched.
    pub fn put(&mut self, key: P, value: V) -> Result<Option<V>, GeometryError> {
        if !key.is_finite() {
            return Err(GeometryError::NonFinitePoint {
                point: format!("{key:?}"),
            });
        }
        if let Some((_, stored)) = self.entry_mut(&key) {
            return Ok(Some(std::mem::replace(stored, value)));
        }
        self.root.insert(key, value, self.bucket_capacity);
        self.len += 1;
        Ok(None)
    }

    fn find(&self, key: &P) -> Option<&(P, V)> {
        let mut path = Vec::new();
        let entry = self.root.locate(key, &self.precision, &mut path)?;
        match self.root.descend(&path)? {
            Node::Leaf(entries) => entries.get(entry),
            Node::Internal { .. } => None,
        }
    }

    fn entry_mut(&mut self, key: &P) -> Option<&mut (P, V)> {
        let mut path = Vec::new();
        let entry = self.root.locate(key, &self.precision, &mut path)?;
        match self.root.descend_mut(&path)? {
            Node::Leaf(entries) => entries.get_mut(entry),
            Node::Internal { .. } => None,
        }
    }

    /// Value stored under a key equal to `key`.
    pub fn get(&self, key: &P) -> Option<&V> {
        self.find(key).map(|(_, value)| value)
    }

    /// Mutable value stored under a key equal to `key`.
    pub fn get_mut(&mut self, key: &P) -> Option<&mut V> {
        self.entry_mut(key).map(|(_, value)| value)
    }

    /// Stored key and value for a key equal to `key`.
    pub fn get_key_value(&self, key: &P) -> Option<(&P, &V)> {
        self.find(key).map(|(stored, value)| (stored, value))
    }

    /// Stored key equal to `key`, as first inserted.
    pub fn resolve_key(&self, key: &P) -> Option<&P> {
        self.find(key).map(|(stored, _)| stored)
    }

    /// Returns `true` if a key equal to `key` is present.
    pub fn contains_key(&self, key: &P) -> bool {
        self.find(key).is_some()
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove(&mut self, key: &P) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes the entry for `key`, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &P) -> Option<(P, V)> {
        let mut path = Vec::new();
        let entry = self.root.locate(key, &self.precision, &mut path)?;
        let removed = match self.root.descend_mut(&path)? {
            Node::Leaf(entries) => entries.swap_remove(entry),
            Node::Internal { .. } => return None,
        };
        self.len -= 1;
        self.root.collapse_path(&path);
        Some(removed)
    }

    /// Keeps only the entries for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&P, &mut V) -> bool,
    {
        let removed = self.root.retain(&mut keep);
        self.len -= removed;
    }

    /// Entry whose key is closest to `point`.
    pub fn nearest_entry(&self, point: &P) -> Option<(&P, &V)> {
        self.iter()
            .min_by(|(a, _), (b, _)| compare_distance(*a, *b, point))
    }

    /// Entry whose key is farthest from `point`.
    pub fn farthest_entry(&self, point: &P) -> Option<(&P, &V)> {
        self.iter()
            .max_by(|(a, _), (b, _)| compare_distance(*a, *b, point))
    }

    /// Iterates over all entries in unspecified order.
    pub fn iter(&self) -> Iter<'_, P, V> {
        Iter {
            stack: vec![&self.root],
            current: Default::default(),
            remaining: self.len,
        }
    }

    /// Iterates over all entries with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, P, V> {
        IterMut {
            stack: vec![&mut self.root],
            current: Default::default(),
            remaining: self.len,
        }
    }

    /// Iterates over the stored keys.
    pub fn keys(&self) -> impl Iterator<Item = &P> {
        self.iter().map(|(key, _)| key)
    }

    /// Iterates over the values.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Iterates over the values mutably.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.iter_mut().map(|(_, value)| value)
    }
}

fn compare_distance<P: Point>(a: &P, b: &P, point: &P) -> Ordering {
    a.distance(point).total_cmp(&b.distance(point))
}

/// Iterator over the entries of a [`PointMap`].
pub struct Iter<'a, P, V> {
    stack: Vec<&'a Node<P, V>>,
    current: std::slice::Iter<'a, (P, V)>,
    remaining: usize,
}

impl<'a, P, V> Iterator for Iter<'a, P, V> {
    type Item = (&'a P, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, value)) = self.current.next() {
                self.remaining -= 1;
                return Some((key, value));
            }
            match self.stack.pop()? {
                Node::Leaf(entries) => self.current = entries.iter(),
                Node::Internal { children, .. } => {
                    self.stack
                        .extend(children.iter().rev().filter_map(|child| child.as_deref()));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<P, V> ExactSizeIterator for Iter<'_, P, V> {}

/// Iterator over the entries of a [`PointMap`] with mutable values.
pub struct IterMut<'a, P, V> {
    stack: Vec<&'a mut Node<P, V>>,
    current: std::slice::IterMut<'a, (P, V)>,
    remaining: usize,
}

impl<'a, P, V> Iterator for IterMut<'a, P, V> {
    type Item = (&'a P, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, value)) = self.current.next() {
                self.remaining -= 1;
                return Some((&*key, value));
            }
            match self.stack.pop()? {
                Node::Leaf(entries) => self.current = entries.iter_mut(),
                Node::Internal { children, .. } => {
                    self.stack
                        .extend(children.iter_mut().rev().filter_map(|child| child.as_deref_mut()));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<P, V> ExactSizeIterator for IterMut<'_, P, V> {}

impl<'a, P: Point, V> IntoIterator for &'a PointMap<P, V> {
    type Item = (&'a P, &'a V);
    type IntoIter = Iter<'a, P, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, P: Point, V> IntoIterator for &'a mut PointMap<P, V> {
    type Item = (&'a P, &'a mut V);
    type IntoIter = IterMut<'a, P, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
