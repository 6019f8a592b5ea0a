//! Region BSP tree: leaf locations, classification and structural editing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slotmap::SecondaryMap;

use crate::bsp::{BspTree, BspVisitor, FindNodeCutRule, NodeData, NodeId};
use crate::{
    BoundarySource, GeometryError, Hyperplane, HyperplaneLocation, Point, RegionLocation, Split,
    Transform,
};

use super::boundary::RegionCutBoundary;
use super::size::RegionSizeProperties;

/// Node data of a region tree: the location of the node's cell.
///
/// Only leaves give meaning to the location. Internal nodes keep the value
/// they had before being cut, which becomes visible again if the cut is
/// cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionData {
    pub(crate) location: RegionLocation,
}

impl RegionData {
    pub(crate) const INSIDE: Self = Self {
        location: RegionLocation::Inside,
    };
    pub(crate) const OUTSIDE: Self = Self {
        location: RegionLocation::Outside,
    };

    /// Stored location, either `Inside` or `Outside`.
    #[inline]
    pub fn location(&self) -> RegionLocation {
        self.location
    }

    pub(crate) fn complement(&mut self) {
        self.location = match self.location {
            RegionLocation::Inside => RegionLocation::Outside,
            _ => RegionLocation::Inside,
        };
    }

    pub(crate) fn is_inside(&self) -> bool {
        self.location == RegionLocation::Inside
    }
}

impl Default for RegionData {
    fn default() -> Self {
        Self::INSIDE
    }
}

impl NodeData for RegionData {
    fn cut_children(&self) -> (Self, Self) {
        RegionCutRule::MinusInside.children(self)
    }

    fn condensable(minus: &Self, plus: &Self) -> bool {
        minus.location == plus.location
    }
}

/// Locations given to the two children created when a leaf is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegionCutRule {
    /// The minus child is inside, the plus child outside.
    #[default]
    MinusInside,
    /// The plus child is inside, the minus child outside.
    PlusInside,
    /// Both children take the location of the leaf being cut.
    Inherit,
}

impl RegionCutRule {
    pub(crate) fn children(self, parent: &RegionData) -> (RegionData, RegionData) {
        match self {
            RegionCutRule::MinusInside => (RegionData::INSIDE, RegionData::OUTSIDE),
            RegionCutRule::PlusInside => (RegionData::OUTSIDE, RegionData::INSIDE),
            RegionCutRule::Inherit => (*parent, *parent),
        }
    }
}

/// Cut boundaries computed for one tree version.
#[derive(Debug)]
pub(crate) struct BoundaryCache<H: Hyperplane> {
    pub(crate) version: u64,
    pub(crate) entries: SecondaryMap<NodeId, Rc<RegionCutBoundary<H>>>,
}

impl<H: Hyperplane> BoundaryCache<H> {
    fn new(version: u64) -> Self {
        Self {
            version,
            entries: SecondaryMap::new(),
        }
    }
}

/// A region of space described by a BSP tree.
///
/// Every leaf is either [`Inside`](RegionLocation::Inside) or
/// [`Outside`](RegionLocation::Outside). Regions are built by inserting
/// boundary facets oriented with the interior on their minus side, by
/// cutting leaves explicitly, or by combining other regions with boolean
/// operations.
///
/// Sizes, centroids and cut boundaries are cached and recomputed lazily
/// after the tree changes. The caches make this type `!Sync`; a tree must
/// not be mutated while it is being read.
pub struct RegionBspTree<H: Hyperplane> {
    pub(crate) tree: BspTree<H, RegionData>,
    pub(crate) size_cache: RefCell<Option<(u64, Rc<RegionSizeProperties<H::Point>>)>>,
    pub(crate) boundary_cache: RefCell<BoundaryCache<H>>,
}

impl<H: Hyperplane> Clone for RegionBspTree<H> {
    fn clone(&self) -> Self {
        Self::from_tree(self.tree.clone())
    }
}

impl<H: Hyperplane> fmt::Debug for RegionBspTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionBspTree").field("tree", &self.tree).finish()
    }
}

impl<H: Hyperplane> Default for RegionBspTree<H> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<H: Hyperplane> RegionBspTree<H> {
    /// Creates a single-leaf region, full or empty.
    pub fn new(full: bool) -> Self {
        let data = if full {
            RegionData::INSIDE
        } else {
            RegionData::OUTSIDE
        };
        Self::from_tree(BspTree::with_root_data(data))
    }

    /// The region containing all of space.
    pub fn full() -> Self {
        Self::new(true)
    }

    /// The region containing nothing.
    pub fn empty() -> Self {
        Self::new(false)
    }

    pub(crate) fn from_tree(tree: BspTree<H, RegionData>) -> Self {
        let version = tree.version();
        Self {
            tree,
            size_cache: RefCell::new(None),
            boundary_cache: RefCell::new(BoundaryCache::new(version)),
        }
    }

    /// The underlying BSP tree.
    #[inline]
    pub fn tree(&self) -> &BspTree<H, RegionData> {
        &self.tree
    }

    /// Root handle of the underlying tree.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Structural version of the underlying tree.
    #[inline]
    pub fn version(&self) -> u64 {
        self.tree.version()
    }

    /// Returns `true` if the tree is a single inside leaf.
    pub fn is_full(&self) -> bool {
        let root = self.tree.root();
        self.tree.is_leaf(root) && self.tree.data(root).is_inside()
    }

    /// Returns `true` if the tree is a single outside leaf.
    pub fn is_empty(&self) -> bool {
        let root = self.tree.root();
        self.tree.is_leaf(root) && !self.tree.data(root).is_inside()
    }

    /// Turns the region into all of space.
    pub fn set_full(&mut self) {
        self.reset_root(RegionData::INSIDE);
    }

    /// Turns the region into nothing.
    pub fn set_empty(&mut self) {
        self.reset_root(RegionData::OUTSIDE);
    }

    fn reset_root(&mut self, data: RegionData) {
        let root = self.tree.root();
        self.tree.clear_cut(root);
        *self.tree.data_mut(root) = data;
        self.tree.invalidate();
    }

    // ------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------

    /// Classifies `point` against the region.
    ///
    /// Points with NaN or infinite coordinates are `Outside`. A point lying
    /// on a cut is classified on both sides of it and is `Boundary` only if
    /// the two sides disagree.
    pub fn classify(&self, point: &H::Point) -> RegionLocation {
        if !point.is_finite() {
            return RegionLocation::Outside;
        }
        self.classify_from(self.tree.root(), point)
    }

    fn classify_from(&self, node: NodeId, point: &H::Point) -> RegionLocation {
        let n = &self.tree[node];
        let (Some(hyperplane), Some((minus, plus))) = (n.cut_hyperplane(), n.children()) else {
            return n.data().location;
        };
        match hyperplane.classify(point) {
            HyperplaneLocation::Minus => self.classify_from(minus, point),
            HyperplaneLocation::Plus => self.classify_from(plus, point),
            HyperplaneLocation::On => {
                let minus_location = self.classify_from(minus, point);
                let plus_location = self.classify_from(plus, point);
                if minus_location == plus_location {
                    minus_location
                } else {
                    RegionLocation::Boundary
                }
            }
        }
    }

    /// Returns `true` if `point` is inside the region or on its boundary.
    pub fn contains(&self, point: &H::Point) -> bool {
        self.classify(point) != RegionLocation::Outside
    }

    /// Location of a leaf, or `None` for an internal node.
    pub fn location(&self, node: NodeId) -> Option<RegionLocation> {
        self.tree.is_leaf(node).then(|| self.tree.data(node).location)
    }

    /// Sets the location of a leaf.
    ///
    /// Only `Inside` and `Outside` can be stored, and only at leaves. Caches
    /// are invalidated only if the location actually changes.
    pub fn set_location(&mut self, node: NodeId, location: RegionLocation) -> Result<(), GeometryError> {
        if location == RegionLocation::Boundary {
            return Err(GeometryError::InvalidLocation { location });
        }
        if !self.tree.is_leaf(node) {
            return Err(GeometryError::NotALeaf);
        }
        let data = self.tree.data_mut(node);
        if data.location != location {
            data.location = location;
            self.tree.invalidate();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Cuts the cell of `node` with `hyperplane`, locating the children with `rule`.
    ///
    /// See [`BspTree::cut`].
    pub fn cut(&mut self, node: NodeId, hyperplane: &H, rule: RegionCutRule) -> bool {
        let children = rule.children(self.tree.data(node));
        self.tree.cut_with(node, hyperplane, children)
    }

    /// Turns `node` back into a leaf with the location it had before being cut.
    pub fn clear_cut(&mut self, node: NodeId) -> bool {
        self.tree.clear_cut(node)
    }

    /// Finds the node containing `point`. See [`BspTree::find_node`].
    pub fn find_node(&self, point: &H::Point, rule: FindNodeCutRule) -> NodeId {
        self.tree.find_node(point, rule)
    }

    /// Inserts a boundary facet with the interior on its minus side.
    pub fn insert(&mut self, subset: H::Subset) {
        self.insert_with_rule(subset, RegionCutRule::MinusInside);
    }

    /// Inserts a subset, locating the children of every new cut with `rule`.
    pub fn insert_with_rule(&mut self, subset: H::Subset, rule: RegionCutRule) {
        self.tree.insert_with(subset, |data: &RegionData| rule.children(data));
    }

    /// Inserts boundary facets with the interior on their minus side.
    pub fn insert_all<I>(&mut self, subsets: I)
    where
        I: IntoIterator<Item = H::Subset>,
    {
        self.insert_all_with_rule(subsets, RegionCutRule::MinusInside);
    }

    /// Inserts subsets in order using `rule`.
    pub fn insert_all_with_rule<I>(&mut self, subsets: I, rule: RegionCutRule)
    where
        I: IntoIterator<Item = H::Subset>,
    {
        let mut count = 0usize;
        for subset in subsets {
            self.insert_with_rule(subset, rule);
            count += 1;
        }
        tracing::trace!(count, nodes = self.tree.count(), "inserted subsets into region");
    }

    /// Inserts every boundary facet of `source`.
    pub fn insert_boundary_source<S>(&mut self, source: &S)
    where
        S: BoundarySource<H> + ?Sized,
    {
        self.insert_all(source.boundaries());
    }

    /// Merges sibling leaves with the same location into their parent.
    ///
    /// Returns `true` if the tree changed.
    pub fn condense(&mut self) -> bool {
        let before = self.tree.count();
        let root = self.tree.root();
        let changed = self.condense_node(root);
        if changed {
            tracing::debug!(before, after = self.tree.count(), "condensed region tree");
        }
        changed
    }

    fn condense_node(&mut self, node: NodeId) -> bool {
        let Some((minus, plus)) = self.tree[node].children() else {
            return false;
        };
        let mut changed = self.condense_node(minus) | self.condense_node(plus);
        match (self.location(minus), self.location(plus)) {
            (Some(minus_location), Some(plus_location)) if minus_location == plus_location => {
                self.tree.clear_cut(node);
                self.tree.data_mut(node).location = minus_location;
                changed = true;
            }
            _ => {}
        }
        changed
    }

    /// Complements the region: inside and outside are exchanged.
    ///
    /// Cached cut boundaries are kept with their facet lists swapped.
    pub fn complement(&mut self) {
        let old_version = self.tree.version();
        let ids: Vec<NodeId> = self.tree.nodes().collect();
        for id in ids {
            self.tree.data_mut(id).complement();
        }
        self.tree.invalidate();

        let cache = self.boundary_cache.get_mut();
        if cache.version == old_version {
            cache.version = self.tree.version();
            for boundary in cache.entries.values_mut() {
                *boundary = Rc::new(boundary.complement());
            }
        }
    }

    /// Makes this region the complement of `other`.
    pub fn complement_from(&mut self, other: &Self) {
        self.copy(other);
        self.complement();
    }

    /// Makes this region a deep copy of `other`.
    pub fn copy(&mut self, other: &Self) {
        self.tree.copy(&other.tree);
    }

    /// Copies the subtree rooted at `node` into a new region.
    ///
    /// The extracted region keeps the ancestor cuts of `node`; the cells off
    /// that path are outside, so the result is the part of this region
    /// within the cell of `node`.
    pub fn extract(&self, node: NodeId) -> Self {
        Self::from_tree(self.tree.extract_with(node, |_| RegionData::OUTSIDE))
    }

    /// Applies `transform` to the region, leaving it unchanged on error.
    pub fn transform<T: Transform<H::Point>>(&mut self, transform: &T) -> Result<(), GeometryError> {
        self.tree.transform(transform)
    }

    /// Walks the tree with `visitor`.
    pub fn accept<V: BspVisitor<H, RegionData>>(&self, visitor: &mut V) {
        self.tree.accept(visitor);
    }

    /// Splits the region by `splitter`.
    ///
    /// Each side receives the part of the region on that side of the
    /// splitter; a side with an empty part is `None`.
    pub fn split(&self, splitter: &H) -> Split<Self> {
        let mut minus = BspTree::new();
        let mut plus = BspTree::new();
        self.tree.split_into_trees(splitter, Some(&mut minus), Some(&mut plus));

        let minus = Self::split_half(minus, |tree, root| tree.plus(root));
        let plus = Self::split_half(plus, |tree, root| tree.minus(root));
        let split = Split::new(minus, plus);

        tracing::debug!(location = ?split.location(), "split region");
        split
    }

    /// Marks the discarded side of a split tree outside and condenses it.
    fn split_half<F>(mut tree: BspTree<H, RegionData>, discarded: F) -> Option<Self>
    where
        F: Fn(&BspTree<H, RegionData>, NodeId) -> Option<NodeId>,
    {
        let root = tree.root();
        if let Some(node) = discarded(&tree, root) {
            tree.clear_cut(node);
            *tree.data_mut(node) = RegionData::OUTSIDE;
        }
        let mut region = Self::from_tree(tree);
        region.condense();
        (!region.is_empty()).then_some(region)
    }

    /// Renders the tree with leaf locations, down to `max_depth`.
    pub fn tree_string(&self, max_depth: usize) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write(&mut out, max_depth);
        out
    }

    fn write<W: fmt::Write>(&self, out: &mut W, max_depth: usize) -> fmt::Result {
        self.tree
            .write_tree(out, "RegionBspTree", max_depth, |data: &RegionData| {
                format!("{:?}", data.location)
            })
    }
}

impl<H: Hyperplane> fmt::Display for RegionBspTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Line, Polygon, Precision, Segment, SplitLocation};
    use approx::assert_relative_eq;
    use nalgebra::{Point2, Vector2};

    fn line(a: [f64; 2], b: [f64; 2]) -> Line {
        Line::from_points(Point2::new(a[0], a[1]), Point2::new(b[0], b[1]), Precision::default())
            .unwrap()
    }

    fn segment(a: [f64; 2], b: [f64; 2]) -> Segment {
        Segment::from_points(Point2::new(a[0], a[1]), Point2::new(b[0], b[1]), Precision::default())
            .unwrap()
    }

    fn unit_square() -> RegionBspTree<Line> {
        let mut region = RegionBspTree::empty();
        region.insert_all([
            segment([0.0, 0.0], [1.0, 0.0]),
            segment([1.0, 0.0], [1.0, 1.0]),
            segment([1.0, 1.0], [0.0, 1.0]),
            segment([0.0, 1.0], [0.0, 0.0]),
        ]);
        region
    }

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn full_and_empty() {
        let full: RegionBspTree<Line> = RegionBspTree::full();
        assert!(full.is_full());
        assert!(!full.is_empty());
        assert_eq!(full.classify(&p(1e6, -3.0)), RegionLocation::Inside);

        let empty: RegionBspTree<Line> = RegionBspTree::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.classify(&p(0.0, 0.0)), RegionLocation::Outside);
    }

    #[test]
    fn set_full_and_empty_discard_structure() {
        let mut region = unit_square();
        region.set_full();
        assert!(region.is_full());
        assert_eq!(region.tree().count(), 1);
        region.set_empty();
        assert!(region.is_empty());
    }

    #[test]
    fn classify_unit_square() {
        let region = unit_square();
        assert_eq!(region.classify(&p(0.5, 0.5)), RegionLocation::Inside);
        assert_eq!(region.classify(&p(2.0, 2.0)), RegionLocation::Outside);
        assert_eq!(region.classify(&p(-0.5, 0.5)), RegionLocation::Outside);
        assert_eq!(region.classify(&p(1.0, 0.5)), RegionLocation::Boundary);
        assert_eq!(region.classify(&p(0.0, 0.0)), RegionLocation::Boundary);
        // On a cut extension but away from the square.
        assert_eq!(region.classify(&p(3.0, 0.0)), RegionLocation::Outside);
    }

    #[test]
    fn classify_non_finite_is_outside() {
        let full: RegionBspTree<Line> = RegionBspTree::full();
        assert_eq!(full.classify(&p(f64::NAN, 0.0)), RegionLocation::Outside);
        assert_eq!(full.classify(&p(f64::INFINITY, 0.0)), RegionLocation::Outside);
        assert!(!full.contains(&p(0.0, f64::NAN)));
    }

    #[test]
    fn cut_extension_through_inside_is_not_boundary() {
        // Half plane y > 0 split again by x = 0 with both sides inside.
        let mut region: RegionBspTree<Line> = RegionBspTree::empty();
        let root = region.root();
        region.cut(root, &line([0.0, 0.0], [1.0, 0.0]), RegionCutRule::MinusInside);
        let inside = region.tree().minus(root).unwrap();
        region.cut(inside, &line([0.0, 0.0], [0.0, 1.0]), RegionCutRule::Inherit);

        assert_eq!(region.classify(&p(0.0, 1.0)), RegionLocation::Inside);
        assert_eq!(region.classify(&p(0.0, 0.0)), RegionLocation::Boundary);
    }

    #[test]
    fn cut_rules_set_child_locations() {
        let mut region: RegionBspTree<Line> = RegionBspTree::full();
        let root = region.root();
        let x_axis = line([0.0, 0.0], [1.0, 0.0]);

        region.cut(root, &x_axis, RegionCutRule::PlusInside);
        let minus = region.tree().minus(root).unwrap();
        let plus = region.tree().plus(root).unwrap();
        assert_eq!(region.location(minus), Some(RegionLocation::Outside));
        assert_eq!(region.location(plus), Some(RegionLocation::Inside));
        assert_eq!(region.location(root), None);

        region.cut(root, &x_axis, RegionCutRule::Inherit);
        let minus = region.tree().minus(root).unwrap();
        assert_eq!(region.location(minus), Some(RegionLocation::Inside));
    }

    #[test]
    fn cleared_cut_restores_stored_location() {
        let mut region: RegionBspTree<Line> = RegionBspTree::empty();
        let root = region.root();
        region.cut(root, &line([0.0, 0.0], [1.0, 0.0]), RegionCutRule::MinusInside);
        assert!(region.clear_cut(root));
        assert_eq!(region.location(root), Some(RegionLocation::Outside));
        assert!(region.is_empty());
    }

    #[test]
    fn set_location_validation() {
        let mut region = unit_square();
        let root = region.root();
        assert_eq!(
            region.set_location(root, RegionLocation::Inside),
            Err(GeometryError::NotALeaf)
        );

        let leaf = region.find_node(&p(0.5, 0.5), FindNodeCutRule::Node);
        assert_eq!(
            region.set_location(leaf, RegionLocation::Boundary),
            Err(GeometryError::InvalidLocation {
                location: RegionLocation::Boundary
            })
        );

        let version = region.version();
        region.set_location(leaf, RegionLocation::Inside).unwrap();
        assert_eq!(region.version(), version);
        region.set_location(leaf, RegionLocation::Outside).unwrap();
        assert!(region.version() > version);
        assert_eq!(region.classify(&p(0.5, 0.5)), RegionLocation::Outside);
    }

    #[test]
    fn complement_twice_restores_classification() {
        let mut region = unit_square();
        let points = [p(0.5, 0.5), p(2.0, 2.0), p(1.0, 0.5), p(-1.0, 0.5)];
        let before: Vec<_> = points.iter().map(|pt| region.classify(pt)).collect();

        region.complement();
        assert_eq!(region.classify(&p(0.5, 0.5)), RegionLocation::Outside);
        assert_eq!(region.classify(&p(2.0, 2.0)), RegionLocation::Inside);
        assert_eq!(region.classify(&p(1.0, 0.5)), RegionLocation::Boundary);

        region.complement();
        let after: Vec<_> = points.iter().map(|pt| region.classify(pt)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn complement_from_leaves_source_untouched() {
        let square = unit_square();
        let mut complement: RegionBspTree<Line> = RegionBspTree::empty();
        complement.complement_from(&square);

        assert_eq!(complement.classify(&p(0.5, 0.5)), RegionLocation::Outside);
        assert_eq!(square.classify(&p(0.5, 0.5)), RegionLocation::Inside);
    }

    #[test]
    fn condense_merges_equal_siblings() {
        let mut region: RegionBspTree<Line> = RegionBspTree::empty();
        let root = region.root();
        region.cut(root, &line([0.0, 0.0], [1.0, 0.0]), RegionCutRule::Inherit);
        let minus = region.tree().minus(root).unwrap();
        region.cut(minus, &line([0.0, 0.0], [0.0, 1.0]), RegionCutRule::Inherit);
        assert_eq!(region.tree().count(), 5);

        assert!(region.condense());
        assert_eq!(region.tree().count(), 1);
        assert!(region.is_empty());
        let version = region.version();
        assert!(!region.condense());
        assert_eq!(region.version(), version);
    }

    #[test]
    fn condensing_a_condensed_tree_keeps_caches() {
        let mut region = unit_square();
        assert!(!region.condense());
        let version = region.version();
        let size = region.size_properties();

        assert!(!region.condense());
        assert_eq!(region.version(), version);
        assert!(std::rc::Rc::ptr_eq(&size, &region.size_properties()));
        assert_relative_eq!(region.size(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn condense_keeps_distinct_siblings() {
        let mut region = unit_square();
        let count = region.tree().count();
        assert!(!region.condense());
        assert_eq!(region.tree().count(), count);
    }

    #[test]
    fn insert_boundary_source_builds_polygon() {
        let triangle = Polygon::new(vec![p(0.0, 0.0), p(4.0, 0.0), p(0.0, 3.0)], Precision::default()).unwrap();
        let mut region: RegionBspTree<Line> = RegionBspTree::empty();
        region.insert_boundary_source(&triangle);

        assert_eq!(region.classify(&p(1.0, 1.0)), RegionLocation::Inside);
        assert_eq!(region.classify(&p(3.0, 3.0)), RegionLocation::Outside);
        assert_relative_eq!(region.size(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn extract_keeps_region_in_cell() {
        let region = unit_square();
        let root = region.root();
        let minus = region.tree().minus(root).unwrap();

        let extracted = region.extract(minus);
        assert_eq!(extracted.classify(&p(0.5, 0.5)), RegionLocation::Inside);
        assert_eq!(extracted.classify(&p(0.5, -0.5)), RegionLocation::Outside);
        assert_relative_eq!(extracted.size(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn transform_moves_region() {
        let mut region = unit_square();
        let translation = nalgebra::Translation2::from(Vector2::new(2.0, 3.0));
        region.transform(&translation).unwrap();

        assert_eq!(region.classify(&p(2.5, 3.5)), RegionLocation::Inside);
        assert_eq!(region.classify(&p(0.5, 0.5)), RegionLocation::Outside);
    }

    #[test]
    fn failed_transform_leaves_region_unchanged() {
        let mut region = unit_square();
        let version = region.version();
        let squash = crate::FnTransform::new(|q: &Point2<f64>| Point2::new(0.0, q.y), true);

        assert!(region.transform(&squash).is_err());
        assert_eq!(region.version(), version);
        assert_eq!(region.classify(&p(0.5, 0.5)), RegionLocation::Inside);
        assert_relative_eq!(region.size(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn reflection_keeps_inside_inside() {
        let mut region = unit_square();
        let mirror = crate::FnTransform::new(|q: &Point2<f64>| Point2::new(-q.x, q.y), false);
        region.transform(&mirror).unwrap();

        assert_eq!(region.classify(&p(-0.5, 0.5)), RegionLocation::Inside);
        assert_eq!(region.classify(&p(0.5, 0.5)), RegionLocation::Outside);
        assert_relative_eq!(region.size(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn split_square_across_middle() {
        let region = unit_square();
        let split = region.split(&line([0.5, 0.0], [0.5, 1.0]));
        assert_eq!(split.location(), SplitLocation::Both);

        let left = split.minus().unwrap();
        let right = split.plus().unwrap();
        assert_eq!(left.classify(&p(0.25, 0.5)), RegionLocation::Inside);
        assert_eq!(left.classify(&p(0.75, 0.5)), RegionLocation::Outside);
        assert_eq!(right.classify(&p(0.75, 0.5)), RegionLocation::Inside);
        assert_relative_eq!(left.size(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(right.size(), 0.5, epsilon = 1e-9);

        // The source is untouched.
        assert_relative_eq!(region.size(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn split_missing_region() {
        let region = unit_square();
        let split = region.split(&line([5.0, 0.0], [5.0, 1.0]));
        assert_eq!(split.location(), SplitLocation::Minus);

        let empty: RegionBspTree<Line> = RegionBspTree::empty();
        assert_eq!(empty.split(&line([0.0, 0.0], [0.0, 1.0])).location(), SplitLocation::Neither);
    }

    #[test]
    fn display_lists_locations() {
        let region = unit_square();
        let text = region.to_string();
        assert!(text.starts_with("RegionBspTree\nroot: cut"));
        assert!(text.contains("leaf Inside"));
        assert!(text.contains("leaf Outside"));
        assert_eq!(text.lines().count(), 1 + region.tree().count());
    }
}
