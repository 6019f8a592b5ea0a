//! Boolean operations on regions.

use crate::bsp::{merge, BspTree, MergeOperator, NodeId};
use crate::Hyperplane;

use super::tree::{RegionBspTree, RegionData};

fn is_inside_leaf<H: Hyperplane>(tree: &BspTree<H, RegionData>, node: NodeId) -> bool {
    tree.is_leaf(node) && tree.data(node).is_inside()
}

/// Complements every node of the subtree rooted at `node`.
fn complement_subtree<H: Hyperplane>(tree: &mut BspTree<H, RegionData>, node: NodeId) -> NodeId {
    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        tree.data_mut(id).complement();
        if let Some((minus, plus)) = tree[id].children() {
            stack.push(minus);
            stack.push(plus);
        }
    }
    node
}

struct Union;

impl<H: Hyperplane> MergeOperator<H, RegionData> for Union {
    fn merge_leaf(&mut self, tree: &mut BspTree<H, RegionData>, a: NodeId, b: NodeId) -> NodeId {
        let (leaf, other) = if tree.is_leaf(a) { (a, b) } else { (b, a) };
        if tree.data(leaf).is_inside() { leaf } else { other }
    }
}

struct Intersection;

impl<H: Hyperplane> MergeOperator<H, RegionData> for Intersection {
    fn merge_leaf(&mut self, tree: &mut BspTree<H, RegionData>, a: NodeId, b: NodeId) -> NodeId {
        let (leaf, other) = if tree.is_leaf(a) { (a, b) } else { (b, a) };
        if tree.data(leaf).is_inside() { other } else { leaf }
    }
}

struct Difference;

impl<H: Hyperplane> MergeOperator<H, RegionData> for Difference {
    fn merge_leaf(&mut self, tree: &mut BspTree<H, RegionData>, a: NodeId, b: NodeId) -> NodeId {
        if is_inside_leaf(tree, a) {
            complement_subtree(tree, b)
        } else if is_inside_leaf(tree, b) {
            tree.new_leaf(RegionData::OUTSIDE)
        } else {
            a
        }
    }
}

struct Xor;

impl<H: Hyperplane> MergeOperator<H, RegionData> for Xor {
    fn merge_leaf(&mut self, tree: &mut BspTree<H, RegionData>, a: NodeId, b: NodeId) -> NodeId {
        if is_inside_leaf(tree, a) {
            complement_subtree(tree, b)
        } else if is_inside_leaf(tree, b) {
            complement_subtree(tree, a)
        } else if tree.is_leaf(a) {
            b
        } else {
            a
        }
    }
}

impl<H: Hyperplane> RegionBspTree<H> {
    fn merged<O: MergeOperator<H, RegionData>>(a: &Self, b: &Self, mut op: O) -> Self {
        let mut result = Self::from_tree(merge(&a.tree, &b.tree, &mut op));
        result.condense();
        result
    }

    fn merge_in_place<O: MergeOperator<H, RegionData>>(&mut self, other: &Self, mut op: O) {
        let result = merge(&self.tree, &other.tree, &mut op);
        self.tree.replace(result);
        self.condense();
    }

    /// Region of points in `a` or `b`.
    pub fn union_of(a: &Self, b: &Self) -> Self {
        Self::merged(a, b, Union)
    }

    /// Region of points in both `a` and `b`.
    pub fn intersection_of(a: &Self, b: &Self) -> Self {
        Self::merged(a, b, Intersection)
    }

    /// Region of points in `a` but not in `b`.
    pub fn difference_of(a: &Self, b: &Self) -> Self {
        Self::merged(a, b, Difference)
    }

    /// Region of points in exactly one of `a` and `b`.
    pub fn xor_of(a: &Self, b: &Self) -> Self {
        Self::merged(a, b, Xor)
    }

    /// Adds `other` to this region.
    pub fn union(&mut self, other: &Self) {
        self.merge_in_place(other, Union);
    }

    /// Restricts this region to `other`.
    pub fn intersection(&mut self, other: &Self) {
        self.merge_in_place(other, Intersection);
    }

    /// Removes `other` from this region.
    pub fn difference(&mut self, other: &Self) {
        self.merge_in_place(other, Difference);
    }

    /// Keeps the points in exactly one of this region and `other`.
    pub fn xor(&mut self, other: &Self) {
        self.merge_in_place(other, Xor);
    }
}
