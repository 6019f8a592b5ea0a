//! BSP tree container: cuts, search, insertion, copying and traversal.

use std::ops::Index;

use slotmap::{SecondaryMap, SlotMap};

use crate::{GeometryError, Hyperplane, HyperplaneConvexSubset, HyperplaneLocation, SplitLocation, Transform};

use super::node::{BspNode, NodeData, NodeId};
use super::visitor::{BspVisitor, ClosestFirstVisitor, FarthestFirstVisitor, VisitResult, VisitStep};

/// How [`BspTree::find_node`] resolves a point lying exactly on a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindNodeCutRule {
    /// Stop at the internal node whose cut contains the point.
    Node,
    /// Continue into the minus child.
    Minus,
    /// Continue into the plus child.
    Plus,
}

/// A Binary Space Partitioning tree over hyperplanes of type `H`.
///
/// Nodes live in an arena and are addressed through [`NodeId`] handles.
/// The tree always has a root; a freshly created tree is a single leaf. Each
/// internal node holds a cut, the part of a hyperplane lying inside the
/// node's cell, and two children for the minus and plus sides of that cut.
///
/// Every node carries data of type `D` (see [`NodeData`]). Region semantics
/// are layered on top by [`RegionBspTree`](crate::region::RegionBspTree).
///
/// The tree keeps a version counter that increases on every structural
/// change, so derived values can be cached and checked for staleness.
///
/// # Panics
///
/// Methods taking a [`NodeId`] panic if the handle does not belong to this
/// tree (or was removed from it), just like indexing a slice out of bounds.
#[derive(Debug, Clone)]
pub struct BspTree<H: Hyperplane, D: NodeData = ()> {
    nodes: SlotMap<NodeId, BspNode<H, D>>,
    root: NodeId,
    version: u64,
}

impl<H: Hyperplane, D: NodeData> Default for BspTree<H, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Hyperplane, D: NodeData> Index<NodeId> for BspTree<H, D> {
    type Output = BspNode<H, D>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id]
    }
}

impl<H: Hyperplane, D: NodeData> BspTree<H, D> {
    /// Creates a tree consisting of a single leaf with default data.
    pub fn new() -> Self {
        Self::with_root_data(D::default())
    }

    /// Creates a tree consisting of a single leaf carrying `data`.
    pub fn with_root_data(data: D) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(BspNode::leaf(None, data));
        Self {
            nodes,
            root,
            version: 0,
        }
    }

    /// Returns the root handle.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node for `id`, or `None` if it is not part of this tree.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&BspNode<H, D>> {
        self.nodes.get(id)
    }

    /// Returns `true` if `id` refers to a node of this tree.
    #[inline]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Structural version; changes whenever the tree is modified.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn invalidate(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.node_height(self.root)
    }

    /// Number of nodes in the subtree rooted at `id`.
    pub fn node_count(&self, id: NodeId) -> usize {
        match self.nodes[id].children() {
            Some((minus, plus)) => 1 + self.node_count(minus) + self.node_count(plus),
            None => 1,
        }
    }

    /// Height of the subtree rooted at `id` (0 for a leaf).
    pub fn node_height(&self, id: NodeId) -> usize {
        match self.nodes[id].children() {
            Some((minus, plus)) => 1 + self.node_height(minus).max(self.node_height(plus)),
            None => 0,
        }
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut node = id;
        while let Some(parent) = self.nodes[node].parent {
            depth += 1;
            node = parent;
        }
        depth
    }

    /// Parent of `id`, or `None` for the root.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Minus child of `id`, or `None` for a leaf.
    #[inline]
    pub fn minus(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].minus
    }

    /// Plus child of `id`, or `None` for a leaf.
    #[inline]
    pub fn plus(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].plus
    }

    /// Cut of `id`, or `None` for a leaf.
    #[inline]
    pub fn node_cut(&self, id: NodeId) -> Option<&H::Subset> {
        self.nodes[id].cut.as_ref()
    }

    /// Returns `true` if `id` has no cut.
    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id].is_leaf()
    }

    /// Returns `true` if `id` is the minus child of its parent.
    pub fn is_minus(&self, id: NodeId) -> bool {
        self.nodes[id]
            .parent
            .is_some_and(|parent| self.nodes[parent].minus == Some(id))
    }

    /// Returns `true` if `id` is the plus child of its parent.
    pub fn is_plus(&self, id: NodeId) -> bool {
        self.nodes[id]
            .parent
            .is_some_and(|parent| self.nodes[parent].plus == Some(id))
    }

    /// Data carried by `id`.
    #[inline]
    pub fn data(&self, id: NodeId) -> &D {
        &self.nodes[id].data
    }

    /// Mutable data carried by `id`.
    ///
    /// Changing node data is not a structural change and does not bump the
    /// version; wrappers that derive cached values from the data must
    /// invalidate themselves.
    #[inline]
    pub fn data_mut(&mut self, id: NodeId) -> &mut D {
        &mut self.nodes[id].data
    }

    /// Iterates over all node handles in pre-order (node, minus, plus).
    pub fn nodes(&self) -> Nodes<'_, H, D> {
        Nodes {
            tree: self,
            stack: vec![self.root],
        }
    }

    // ------------------------------------------------------------------
    // Cuts
    // ------------------------------------------------------------------

    /// Cuts the leaf cell of `node` with `hyperplane`.
    ///
    /// The hyperplane is fitted to the node's cell by splitting its span with
    /// every ancestor cut. Any existing subtree of `node` is discarded first.
    /// Returns `false` and leaves `node` as a leaf if the hyperplane does not
    /// pass through the cell.
    pub fn cut(&mut self, node: NodeId, hyperplane: &H) -> bool {
        let children = self.nodes[node].data.cut_children();
        self.cut_with(node, hyperplane, children)
    }

    /// Like [`cut`](Self::cut), with explicit data for the new `(minus, plus)` children.
    pub fn cut_with(&mut self, node: NodeId, hyperplane: &H, children: (D, D)) -> bool {
        match self.fit_cut(node, hyperplane).filter(|cut| !cut.is_empty()) {
            Some(cut) => {
                self.set_cut(node, cut, children);
                true
            }
            None => {
                if self.remove_children(node) {
                    self.invalidate();
                }
                false
            }
        }
    }

    /// Turns `node` back into a leaf, discarding its subtree.
    ///
    /// Returns `false` if `node` already was a leaf.
    pub fn clear_cut(&mut self, node: NodeId) -> bool {
        let changed = self.remove_children(node);
        if changed {
            self.invalidate();
        }
        changed
    }

    /// Restricts the span of `hyperplane` to the cell of `node`.
    fn fit_cut(&self, node: NodeId, hyperplane: &H) -> Option<H::Subset> {
        let mut fragment = hyperplane.span();
        let mut child = node;
        while let Some(parent) = self.nodes[child].parent {
            let parent_node = &self.nodes[parent];
            let splitter = parent_node.cut_hyperplane()?;
            let (minus, plus) = fragment.split(splitter).into_parts();
            let side = if parent_node.minus == Some(child) {
                minus
            } else {
                plus
            };
            fragment = side?;
            child = parent;
        }
        Some(fragment)
    }

    /// Installs `cut` on `node` and gives it two fresh leaf children.
    fn set_cut(&mut self, node: NodeId, cut: H::Subset, (minus_data, plus_data): (D, D)) {
        self.remove_children(node);
        let minus = self.nodes.insert(BspNode::leaf(Some(node), minus_data));
        let plus = self.nodes.insert(BspNode::leaf(Some(node), plus_data));

        let n = &mut self.nodes[node];
        n.cut = Some(cut);
        n.minus = Some(minus);
        n.plus = Some(plus);
        self.invalidate();
    }

    /// Removes the cut and both child subtrees of `node`. Returns `true` if it had any.
    fn remove_children(&mut self, node: NodeId) -> bool {
        let n = &mut self.nodes[node];
        let had_cut = n.cut.take().is_some();
        let mut stack: Vec<NodeId> = n.minus.take().into_iter().chain(n.plus.take()).collect();
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(id) {
                stack.extend(removed.minus);
                stack.extend(removed.plus);
            }
        }
        had_cut
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Finds the node containing `point`, starting at the root.
    ///
    /// At each internal node the point is classified against the cut
    /// hyperplane; `rule` decides what happens when it lies on the cut.
    pub fn find_node(&self, point: &H::Point, rule: FindNodeCutRule) -> NodeId {
        self.find_node_from(self.root, point, rule)
    }

    /// Like [`find_node`](Self::find_node), starting the descent at `start`.
    pub fn find_node_from(&self, start: NodeId, point: &H::Point, rule: FindNodeCutRule) -> NodeId {
        let mut node = start;
        loop {
            let n = &self.nodes[node];
            let (Some(hyperplane), Some((minus, plus))) = (n.cut_hyperplane(), n.children()) else {
                return node;
            };
            node = match hyperplane.classify(point) {
                HyperplaneLocation::Minus => minus,
                HyperplaneLocation::Plus => plus,
                HyperplaneLocation::On => match rule {
                    FindNodeCutRule::Node => return node,
                    FindNodeCutRule::Minus => minus,
                    FindNodeCutRule::Plus => plus,
                },
            };
        }
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Inserts a convex subset into the tree.
    ///
    /// The subset is split by every cut it crosses. Wherever a piece reaches
    /// a leaf, the subset's hyperplane trimmed to that leaf's cell becomes
    /// the leaf's new cut. Pieces lying on an existing cut are absorbed by it.
    pub fn insert(&mut self, subset: H::Subset) {
        self.insert_with(subset, |data: &D| data.cut_children());
    }

    /// Like [`insert`](Self::insert), computing the data for the children of
    /// each new cut from the data of the leaf being cut.
    pub fn insert_with<F>(&mut self, subset: H::Subset, mut children: F)
    where
        F: FnMut(&D) -> (D, D),
    {
        let trimmed = subset.hyperplane().span();
        let root = self.root;
        self.insert_recursive(root, subset, trimmed, &mut children);
        self.invalidate();
    }

    /// Inserts every subset in order.
    pub fn insert_all<I>(&mut self, subsets: I)
    where
        I: IntoIterator<Item = H::Subset>,
    {
        let mut count = 0usize;
        for subset in subsets {
            self.insert(subset);
            count += 1;
        }
        tracing::trace!(count, nodes = self.count(), "inserted subsets into BSP tree");
    }

    fn insert_recursive<F>(&mut self, node: NodeId, insert: H::Subset, trimmed: H::Subset, children: &mut F)
    where
        F: FnMut(&D) -> (D, D),
    {
        let n = &self.nodes[node];
        match (n.cut_hyperplane(), n.children()) {
            (Some(splitter), Some((minus, plus))) => {
                let splitter = splitter.clone();
                let (insert_minus, insert_plus) = insert.split(&splitter).into_parts();
                if insert_minus.is_none() && insert_plus.is_none() {
                    return;
                }
                let (trimmed_minus, trimmed_plus) = trimmed.split(&splitter).into_parts();
                if let (Some(insert), Some(trimmed)) = (insert_minus, trimmed_minus) {
                    self.insert_recursive(minus, insert, trimmed, children);
                }
                if let (Some(insert), Some(trimmed)) = (insert_plus, trimmed_plus) {
                    self.insert_recursive(plus, insert, trimmed, children);
                }
            }
            _ => {
                if !trimmed.is_empty() {
                    let data = children(&n.data);
                    self.set_cut(node, trimmed, data);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Copying
    // ------------------------------------------------------------------

    /// Makes this tree a deep copy of `other`.
    pub fn copy(&mut self, other: &Self) {
        self.replace(other.clone());
    }

    /// Replaces the content of this tree with `other`, bumping the version.
    pub(crate) fn replace(&mut self, other: Self) {
        let version = self.version;
        *self = other;
        self.version = version;
        self.invalidate();
    }

    /// Copies the subtree rooted at `node` into a new tree.
    ///
    /// If `node` is not the root, the extracted tree also receives the cuts
    /// of all ancestors of `node`, with the siblings along that path copied
    /// as leaves, so that the subtree keeps its cell.
    pub fn extract(&self, node: NodeId) -> Self {
        self.extract_with(node, |data| data.clone())
    }

    /// Like [`extract`](Self::extract), with `sibling_data` deciding the data
    /// of the leaves copied from siblings along the ancestor path.
    pub(crate) fn extract_with<F>(&self, node: NodeId, sibling_data: F) -> Self
    where
        F: Fn(&D) -> D,
    {
        let mut out = Self::with_root_data(self.nodes[node].data.clone());
        let mut dst_child = out.import_subtree(self, node);
        let mut src_child = node;

        while let Some(src_parent) = self.nodes[src_child].parent {
            let parent = &self.nodes[src_parent];
            let (Some(cut), Some((minus, plus))) = (parent.cut.clone(), parent.children()) else {
                break;
            };
            let child_is_minus = minus == src_child;
            let sibling = if child_is_minus { plus } else { minus };

            let sibling_copy = out
                .nodes
                .insert(BspNode::leaf(None, sibling_data(&self.nodes[sibling].data)));
            let dst_parent = out.nodes.insert(BspNode::leaf(None, parent.data.clone()));
            if child_is_minus {
                out.attach(dst_parent, cut, dst_child, sibling_copy);
            } else {
                out.attach(dst_parent, cut, sibling_copy, dst_child);
            }

            dst_child = dst_parent;
            src_child = src_parent;
        }

        out.set_root(dst_child);
        out.version = 0;
        out
    }

    /// Deep-copies the subtree of `src` rooted at `src_node` into this
    /// tree's arena, returning the detached copy.
    pub(crate) fn import_subtree(&mut self, src: &Self, src_node: NodeId) -> NodeId {
        let source = &src.nodes[src_node];
        let id = self.nodes.insert(BspNode::leaf(None, source.data.clone()));
        if let (Some(cut), Some((minus, plus))) = (source.cut.clone(), source.children()) {
            let minus = self.import_subtree(src, minus);
            let plus = self.import_subtree(src, plus);
            self.attach(id, cut, minus, plus);
        }
        id
    }

    // ------------------------------------------------------------------
    // Arena surgery used by merging and splitting
    // ------------------------------------------------------------------

    /// Inserts a detached leaf.
    pub(crate) fn new_leaf(&mut self, data: D) -> NodeId {
        self.nodes.insert(BspNode::leaf(None, data))
    }

    /// Sets the cut and children of `node` without touching its previous children.
    pub(crate) fn attach(&mut self, node: NodeId, cut: H::Subset, minus: NodeId, plus: NodeId) {
        self.nodes[minus].parent = Some(node);
        self.nodes[plus].parent = Some(node);
        let n = &mut self.nodes[node];
        n.cut = Some(cut);
        n.minus = Some(minus);
        n.plus = Some(plus);
    }

    /// Turns `node` into a leaf without removing its previous children from the arena.
    pub(crate) fn detach(&mut self, node: NodeId) {
        let n = &mut self.nodes[node];
        n.cut = None;
        n.minus = None;
        n.plus = None;
    }

    /// Makes `node` the root and drops every node no longer reachable from it.
    pub(crate) fn set_root(&mut self, node: NodeId) {
        self.root = node;
        self.nodes[node].parent = None;

        let mut reachable = SecondaryMap::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            reachable.insert(id, ());
            if let Some((minus, plus)) = self.nodes[id].children() {
                stack.push(minus);
                stack.push(plus);
            }
        }
        self.nodes.retain(|id, _| reachable.contains_key(id));
        self.invalidate();
    }

    /// Partitions the subtree at `node` with `partitioner`, returning the
    /// roots of its minus and plus parts.
    ///
    /// `partitioner` must span the cell of `node`. The nodes of the original
    /// subtree are reused by the parts, so `node` must not be used afterwards.
    pub(crate) fn partition(&mut self, node: NodeId, partitioner: &H::Subset) -> (NodeId, NodeId) {
        let n = &self.nodes[node];
        let (Some(node_cut), Some((minus, plus))) = (n.cut.clone(), n.children()) else {
            // A leaf simply ends up on both sides.
            let copy = self.new_leaf(n.data.clone());
            return (node, copy);
        };

        let partitioner_split = partitioner.split(node_cut.hyperplane());
        let node_cut_split = node_cut.split(partitioner.hyperplane());

        match partitioner_split.location() {
            SplitLocation::Plus => {
                // The partitioner only crosses the plus side of the node cut.
                let (split_minus, split_plus) = self.partition(plus, partitioner);
                if node_cut_split.location() == SplitLocation::Plus {
                    self.attach(node, node_cut, minus, split_plus);
                    (split_minus, node)
                } else {
                    self.attach(node, node_cut, minus, split_minus);
                    (node, split_plus)
                }
            }
            SplitLocation::Minus => {
                // The partitioner only crosses the minus side of the node cut.
                let (split_minus, split_plus) = self.partition(minus, partitioner);
                if node_cut_split.location() == SplitLocation::Minus {
                    self.attach(node, node_cut, split_minus, plus);
                    (node, split_plus)
                } else {
                    self.attach(node, node_cut, split_plus, plus);
                    (split_minus, node)
                }
            }
            SplitLocation::Both => {
                // The partitioner and the node cut split each other.
                let (partitioner_minus, partitioner_plus) = partitioner_split.into_parts();
                let (cut_minus, cut_plus) = node_cut_split.into_parts();
                let data = self.nodes[node].data.clone();

                let (minus_minus, minus_plus) = match &partitioner_minus {
                    Some(part) => self.partition(minus, part),
                    None => self.partition(minus, partitioner),
                };
                let (plus_minus, plus_plus) = match &partitioner_plus {
                    Some(part) => self.partition(plus, part),
                    None => self.partition(plus, partitioner),
                };

                let result_minus = match cut_minus {
                    Some(cut) => {
                        self.attach(node, cut, minus_minus, plus_minus);
                        node
                    }
                    None => {
                        tracing::trace!("node cut does not reach the minus side of the partitioner");
                        minus_minus
                    }
                };
                let result_plus = match cut_plus {
                    Some(cut) => {
                        let copy = self.new_leaf(data);
                        self.attach(copy, cut, minus_plus, plus_plus);
                        copy
                    }
                    None => {
                        tracing::trace!("node cut does not reach the plus side of the partitioner");
                        plus_plus
                    }
                };
                (result_minus, result_plus)
            }
            SplitLocation::Neither => {
                // Coincident hyperplanes: pair the children directly.
                if partitioner
                    .hyperplane()
                    .similar_orientation(node_cut.hyperplane())
                {
                    (minus, plus)
                } else {
                    (plus, minus)
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Transformation and splitting
    // ------------------------------------------------------------------

    /// Applies `transform` to every cut of the tree.
    ///
    /// Transforms that do not preserve orientation also swap the children of
    /// every internal node so that each child stays on its side of the cut.
    /// If any cut cannot be transformed the tree is left unchanged.
    pub fn transform<T: Transform<H::Point>>(&mut self, transform: &T) -> Result<(), GeometryError> {
        let cuts = self
            .nodes
            .iter()
            .filter_map(|(id, node)| node.cut.as_ref().map(|cut| cut.transform(transform).map(|cut| (id, cut))))
            .collect::<Result<Vec<_>, GeometryError>>()?;

        let swap = !transform.preserves_orientation();
        for (id, cut) in cuts {
            let node = &mut self.nodes[id];
            node.cut = Some(cut);
            if swap {
                std::mem::swap(&mut node.minus, &mut node.plus);
            }
        }
        self.invalidate();
        Ok(())
    }

    /// Splits the content of the tree by `splitter`.
    ///
    /// Each requested output receives a tree whose root is cut by the span of
    /// `splitter`, with the content of this tree partitioned beneath it.
    /// Passing `None` for an output skips it.
    pub fn split_into_trees(&self, splitter: &H, minus: Option<&mut Self>, plus: Option<&mut Self>) {
        if minus.is_none() && plus.is_none() {
            return;
        }

        let mut work = self.clone();
        let partitioner = splitter.span();
        let old_root = work.root;
        let data = work.nodes[old_root].data.clone();
        let (split_minus, split_plus) = work.partition(old_root, &partitioner);
        let split_root = work.new_leaf(data);
        work.attach(split_root, partitioner, split_minus, split_plus);
        work.set_root(split_root);

        tracing::trace!(nodes = work.count(), "split BSP tree");

        match (minus, plus) {
            (Some(minus), Some(plus)) => {
                plus.copy(&work);
                minus.replace(work);
            }
            (Some(out), None) | (None, Some(out)) => out.replace(work),
            (None, None) => {}
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Walks the whole tree with `visitor`.
    pub fn accept<V: BspVisitor<H, D>>(&self, visitor: &mut V) {
        self.accept_from(self.root, visitor);
    }

    /// Walks the subtree rooted at `node` with `visitor`.
    pub fn accept_from<V: BspVisitor<H, D>>(&self, node: NodeId, visitor: &mut V) {
        self.accept_recursive(node, visitor);
    }

    /// Returns `false` once the visitor asked to terminate.
    fn accept_recursive<V: BspVisitor<H, D>>(&self, node: NodeId, visitor: &mut V) -> bool {
        let Some((minus, plus)) = self.nodes[node].children() else {
            return visitor.visit(self, node) != VisitResult::Terminate;
        };
        let Some(steps) = visitor.visit_order(self, node).steps() else {
            return true;
        };

        for step in steps {
            let keep_going = match step {
                VisitStep::Node => match visitor.visit(self, node) {
                    VisitResult::Continue => true,
                    VisitResult::SkipSubtree => return true,
                    VisitResult::Terminate => false,
                },
                VisitStep::Minus => self.accept_recursive(minus, visitor),
                VisitStep::Plus => self.accept_recursive(plus, visitor),
            };
            if !keep_going {
                return false;
            }
        }
        true
    }

    /// Visits nodes so that the cell containing `target` is visited before the
    /// cells farther away.
    pub fn traverse_closest_first<F>(&self, target: H::Point, func: F)
    where
        F: FnMut(&Self, NodeId) -> VisitResult,
    {
        self.accept(&mut ClosestFirstVisitor::new(target, func));
    }

    /// Visits nodes so that the cells farthest from `target` come first.
    pub fn traverse_farthest_first<F>(&self, target: H::Point, func: F)
    where
        F: FnMut(&Self, NodeId) -> VisitResult,
    {
        self.accept(&mut FarthestFirstVisitor::new(target, func));
    }
}

/// Pre-order iterator over the node handles of a tree.
pub struct Nodes<'a, H: Hyperplane, D: NodeData> {
    tree: &'a BspTree<H, D>,
    stack: Vec<NodeId>,
}

impl<H: Hyperplane, D: NodeData> Iterator for Nodes<'_, H, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some((minus, plus)) = self.tree.nodes[id].children() {
            self.stack.push(plus);
            self.stack.push(minus);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FnTransform, Line, Precision, Segment};
    use nalgebra::Point2;

    fn line(a: [f64; 2], b: [f64; 2]) -> Line {
        Line::from_points(Point2::new(a[0], a[1]), Point2::new(b[0], b[1]), Precision::default())
            .unwrap()
    }

    fn segment(a: [f64; 2], b: [f64; 2]) -> Segment {
        Segment::from_points(Point2::new(a[0], a[1]), Point2::new(b[0], b[1]), Precision::default())
            .unwrap()
    }

    fn internal_count<H: Hyperplane, D: NodeData>(tree: &BspTree<H, D>) -> usize {
        tree.nodes().filter(|&id| !tree.is_leaf(id)).count()
    }

    #[test]
    fn new_tree_is_single_leaf() {
        let tree: BspTree<Line> = BspTree::new();
        assert_eq!(tree.count(), 1);
        assert_eq!(tree.height(), 0);
        assert!(tree.is_leaf(tree.root()));
        assert_eq!(tree.depth(tree.root()), 0);
        assert!(tree.parent(tree.root()).is_none());
    }

    #[test]
    fn cut_creates_two_children() {
        let mut tree: BspTree<Line> = BspTree::new();
        let root = tree.root();
        let version = tree.version();

        assert!(tree.cut(root, &line([0.0, 0.0], [1.0, 0.0])));
        assert!(tree.version() > version);
        assert_eq!(tree.count(), 3);
        assert_eq!(tree.height(), 1);

        let minus = tree.minus(root).unwrap();
        let plus = tree.plus(root).unwrap();
        assert!(tree.is_minus(minus));
        assert!(tree.is_plus(plus));
        assert!(!tree.is_minus(plus));
        assert_eq!(tree.parent(minus), Some(root));
        assert_eq!(tree.depth(plus), 1);
        assert!(tree.node_cut(root).unwrap().is_full());
    }

    #[test]
    fn cut_is_fitted_to_cell() {
        let mut tree: BspTree<Line> = BspTree::new();
        let root = tree.root();
        tree.cut(root, &line([0.0, 0.0], [1.0, 0.0]));
        let minus = tree.minus(root).unwrap();

        // Vertical cut in the upper half plane becomes a ray.
        assert!(tree.cut(minus, &line([1.0, 0.0], [1.0, 1.0])));
        let cut = tree.node_cut(minus).unwrap();
        assert!(cut.is_infinite());
        assert!(!cut.is_full());
        assert_eq!(cut.classify(&Point2::new(1.0, 5.0)), crate::RegionLocation::Inside);
        assert_eq!(cut.classify(&Point2::new(1.0, -5.0)), crate::RegionLocation::Outside);
    }

    #[test]
    fn cut_outside_cell_fails_and_clears() {
        let mut tree: BspTree<Line> = BspTree::new();
        let root = tree.root();
        tree.cut(root, &line([0.0, 0.0], [1.0, 0.0]));
        let minus = tree.minus(root).unwrap();
        tree.cut(minus, &line([1.0, 0.0], [1.0, 1.0]));
        assert_eq!(tree.count(), 5);

        // Same hyperplane as the root cut: no room in the cell.
        assert!(!tree.cut(minus, &line([0.0, 0.0], [1.0, 0.0])));
        assert!(tree.is_leaf(minus));
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn recut_discards_subtree() {
        let mut tree: BspTree<Line> = BspTree::new();
        let root = tree.root();
        tree.cut(root, &line([0.0, 0.0], [1.0, 0.0]));
        let minus = tree.minus(root).unwrap();
        tree.cut(minus, &line([1.0, 0.0], [1.0, 1.0]));

        assert!(tree.cut(root, &line([0.0, 0.0], [0.0, 1.0])));
        assert_eq!(tree.count(), 3);
        assert!(!tree.contains_node(minus));
    }

    #[test]
    fn clear_cut() {
        let mut tree: BspTree<Line> = BspTree::new();
        let root = tree.root();
        assert!(!tree.clear_cut(root));

        tree.cut(root, &line([0.0, 0.0], [1.0, 0.0]));
        let version = tree.version();
        assert!(tree.clear_cut(root));
        assert!(tree.version() > version);
        assert_eq!(tree.count(), 1);
    }

    #[test]
    fn find_node_cut_rules() {
        let mut tree: BspTree<Line> = BspTree::new();
        let root = tree.root();
        tree.cut(root, &line([0.0, 0.0], [1.0, 0.0]));
        let minus = tree.minus(root).unwrap();
        let plus = tree.plus(root).unwrap();

        let on_cut = Point2::new(3.0, 0.0);
        for _ in 0..3 {
            assert_eq!(tree.find_node(&on_cut, FindNodeCutRule::Node), root);
            assert_eq!(tree.find_node(&on_cut, FindNodeCutRule::Minus), minus);
            assert_eq!(tree.find_node(&on_cut, FindNodeCutRule::Plus), plus);
        }

        assert_eq!(tree.find_node(&Point2::new(0.0, 1.0), FindNodeCutRule::Node), minus);
        assert_eq!(tree.find_node(&Point2::new(0.0, -1.0), FindNodeCutRule::Node), plus);
    }

    #[test]
    fn insert_builds_square_partition() {
        let mut tree: BspTree<Line> = BspTree::new();
        tree.insert_all([
            segment([0.0, 0.0], [1.0, 0.0]),
            segment([1.0, 0.0], [1.0, 1.0]),
            segment([1.0, 1.0], [0.0, 1.0]),
            segment([0.0, 1.0], [0.0, 0.0]),
        ]);

        assert_eq!(internal_count(&tree), 4);
        assert_eq!(tree.count(), 1 + 2 * internal_count(&tree));
        assert_eq!(tree.height(), 4);

        let center = tree.find_node(&Point2::new(0.5, 0.5), FindNodeCutRule::Node);
        assert!(tree.is_leaf(center));
        assert_eq!(tree.depth(center), 4);
    }

    #[test]
    fn insert_splits_crossing_subsets() {
        let mut tree: BspTree<Line> = BspTree::new();
        tree.insert(segment([-1.0, 0.0], [1.0, 0.0]));
        tree.insert(segment([0.0, -1.0], [0.0, 1.0]));

        // The vertical segment crosses the root cut and cuts both children.
        assert_eq!(internal_count(&tree), 3);
        assert_eq!(tree.count(), 7);
    }

    #[test]
    fn insert_on_existing_cut_is_absorbed() {
        let mut tree: BspTree<Line> = BspTree::new();
        tree.insert(segment([0.0, 0.0], [1.0, 0.0]));
        tree.insert(segment([2.0, 0.0], [3.0, 0.0]));
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn copy_is_deep() {
        let mut tree: BspTree<Line> = BspTree::new();
        tree.insert(segment([0.0, 0.0], [1.0, 0.0]));

        let mut copy: BspTree<Line> = BspTree::new();
        copy.copy(&tree);
        assert_eq!(copy.count(), 3);

        let root = tree.root();
        tree.clear_cut(root);
        assert_eq!(copy.count(), 3);
        assert_eq!(tree.count(), 1);
    }

    #[test]
    fn extract_root_equals_copy() {
        let mut tree: BspTree<Line> = BspTree::new();
        tree.insert(segment([0.0, 0.0], [1.0, 0.0]));
        tree.insert(segment([1.0, 0.0], [1.0, 1.0]));

        let extracted = tree.extract(tree.root());
        assert_eq!(extracted.count(), tree.count());
        assert_eq!(extracted.height(), tree.height());
    }

    #[test]
    fn extract_subtree_keeps_ancestor_path() {
        let mut tree: BspTree<Line> = BspTree::new();
        tree.insert(segment([0.0, 0.0], [1.0, 0.0]));
        tree.insert(segment([1.0, 0.0], [1.0, 1.0]));
        tree.insert(segment([1.0, 1.0], [0.0, 1.0]));

        let root = tree.root();
        let minus = tree.minus(root).unwrap();
        let extracted = tree.extract(minus);

        // Root cut plus a leaf sibling, then the 2-cut subtree.
        assert_eq!(extracted.count(), 2 + tree.node_count(minus));
        let extracted_root = extracted.root();
        assert!(extracted.is_leaf(extracted.plus(extracted_root).unwrap()));
        assert_eq!(extracted.node_count(extracted.minus(extracted_root).unwrap()), tree.node_count(minus));
    }

    #[test]
    fn transform_with_reflection_swaps_children() {
        let mut tree: BspTree<Line> = BspTree::new();
        let root = tree.root();
        tree.cut(root, &line([0.0, 0.0], [1.0, 0.0]));
        let minus = tree.minus(root).unwrap();

        // Mirror across the x axis: the former upper half (minus) is now below
        // the transformed cut, and must still be the minus child.
        let mirror = FnTransform::new(|p: &Point2<f64>| Point2::new(p.x, -p.y), false);
        tree.transform(&mirror).unwrap();

        assert_eq!(tree.plus(root), Some(minus));
        assert_eq!(tree.find_node(&Point2::new(0.0, -1.0), FindNodeCutRule::Node), minus);
    }

    #[test]
    fn split_into_trees_adds_splitter_root() {
        let mut tree: BspTree<Line> = BspTree::new();
        tree.insert(segment([-1.0, 0.0], [1.0, 0.0]));

        let mut minus: BspTree<Line> = BspTree::new();
        let mut plus: BspTree<Line> = BspTree::new();
        tree.split_into_trees(&line([0.0, 0.0], [0.0, 1.0]), Some(&mut minus), Some(&mut plus));

        for out in [&minus, &plus] {
            assert_eq!(out.node_cut(out.root()).unwrap().hyperplane(), &line([0.0, 0.0], [0.0, 1.0]));
            // x axis cut is split in both halves.
            assert_eq!(out.count(), 7);
        }
        // The original is untouched.
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn split_into_single_output() {
        let tree: BspTree<Line> = BspTree::new();
        let mut plus: BspTree<Line> = BspTree::new();
        tree.split_into_trees(&line([0.0, 0.0], [0.0, 1.0]), None, Some(&mut plus));
        assert_eq!(plus.count(), 3);
    }

    #[test]
    fn nodes_iterates_in_pre_order() {
        let mut tree: BspTree<Line> = BspTree::new();
        let root = tree.root();
        tree.cut(root, &line([0.0, 0.0], [1.0, 0.0]));
        let minus = tree.minus(root).unwrap();
        let plus = tree.plus(root).unwrap();

        let order: Vec<NodeId> = tree.nodes().collect();
        assert_eq!(order, vec![root, minus, plus]);
    }

    #[test]
    fn accept_terminates_early() {
        let mut tree: BspTree<Line> = BspTree::new();
        tree.insert(segment([-1.0, 0.0], [1.0, 0.0]));
        tree.insert(segment([0.0, -1.0], [0.0, 1.0]));

        let mut visited = 0;
        let mut visitor = crate::bsp::FnVisitor::new(|_: &BspTree<Line>, _: NodeId| {
            visited += 1;
            if visited == 2 {
                VisitResult::Terminate
            } else {
                VisitResult::Continue
            }
        });
        tree.accept(&mut visitor);
        assert_eq!(visited, 2);
    }

    #[test]
    fn closest_first_visits_target_cell_first() {
        let mut tree: BspTree<Line> = BspTree::new();
        let root = tree.root();
        tree.cut(root, &line([0.0, 0.0], [1.0, 0.0]));
        let minus = tree.minus(root).unwrap();
        let plus = tree.plus(root).unwrap();

        let mut order = Vec::new();
        tree.traverse_closest_first(Point2::new(0.0, -3.0), |_, id| {
            order.push(id);
            VisitResult::Continue
        });
        assert_eq!(order, vec![plus, root, minus]);

        let mut order = Vec::new();
        tree.traverse_farthest_first(Point2::new(0.0, -3.0), |_, id| {
            order.push(id);
            VisitResult::Continue
        });
        assert_eq!(order, vec![minus, root, plus]);
    }
}
