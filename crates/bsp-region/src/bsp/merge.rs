//! Generic merging of two BSP trees.
//!
//! Both inputs are copied into one working arena. The second tree is then
//! partitioned by the cuts of the first while walking down, so that every
//! pair of nodes being merged covers the same cell. Once one side of a pair
//! is a leaf, a [`MergeOperator`] decides the result for that cell.

use crate::Hyperplane;

use super::node::{NodeData, NodeId};
use super::tree::BspTree;

/// Operation-specific rule for merging two cells.
pub trait MergeOperator<H: Hyperplane, D: NodeData> {
    /// Merges the subtrees rooted at `a` and `b` of `tree`, returning the root
    /// of the result.
    ///
    /// Both subtrees cover the same cell and at least one of them is a leaf.
    /// The operator may reuse or modify either subtree; whatever it does not
    /// return is discarded.
    fn merge_leaf(&mut self, tree: &mut BspTree<H, D>, a: NodeId, b: NodeId) -> NodeId;
}

/// Merges `a` and `b` into a new tree using `op`.
///
/// The result keeps the cuts of `a` wherever both inputs are subdivided.
/// Internal nodes whose two children end up as leaves with condensable data
/// (see [`NodeData::condensable`]) are collapsed into a single leaf. Neither
/// input is modified.
pub fn merge<H, D, O>(a: &BspTree<H, D>, b: &BspTree<H, D>, op: &mut O) -> BspTree<H, D>
where
    H: Hyperplane,
    D: NodeData,
    O: MergeOperator<H, D>,
{
    let mut work = a.clone();
    let a_root = work.root();
    let b_root = work.import_subtree(b, b.root());

    let root = merge_recursive(&mut work, a_root, b_root, op);
    work.set_root(root);

    tracing::debug!(
        a_nodes = a.count(),
        b_nodes = b.count(),
        result_nodes = work.count(),
        "merged BSP trees"
    );
    work
}

fn merge_recursive<H, D, O>(tree: &mut BspTree<H, D>, a: NodeId, b: NodeId, op: &mut O) -> NodeId
where
    H: Hyperplane,
    D: NodeData,
    O: MergeOperator<H, D>,
{
    let (cut, (a_minus, a_plus)) = match (tree.node_cut(a).cloned(), tree[a].children()) {
        (Some(cut), Some(children)) if !tree.is_leaf(b) => (cut, children),
        _ => return op.merge_leaf(tree, a, b),
    };

    let (b_minus, b_plus) = tree.partition(b, &cut);
    let minus = merge_recursive(tree, a_minus, b_minus, op);
    let plus = merge_recursive(tree, a_plus, b_plus, op);

    if tree.is_leaf(minus) && tree.is_leaf(plus) && D::condensable(tree.data(minus), tree.data(plus)) {
        let data = tree.data(minus).clone();
        tree.detach(a);
        *tree.data_mut(a) = data;
        return a;
    }

    tree.attach(a, cut, minus, plus);
    a
}
