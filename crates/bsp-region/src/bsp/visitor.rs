//! Visitor pattern for BSP tree traversal.
//!
//! Visitors allow custom processing of nodes during tree traversal without
//! coupling traversal logic to specific use cases. For every internal node
//! the visitor chooses the order in which the node and its two children are
//! visited, and every visit may continue, prune or stop the walk.

use crate::{Hyperplane, HyperplaneLocation};

use super::node::{NodeData, NodeId};
use super::tree::BspTree;

/// What the traversal does after a node was visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitResult {
    /// Keep going.
    Continue,
    /// Do not descend into the children of this node that have not been visited yet.
    SkipSubtree,
    /// Stop the whole traversal.
    Terminate,
}

/// Order in which an internal node and its children are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitOrder {
    MinusNodePlus,
    MinusPlusNode,
    PlusNodeMinus,
    PlusMinusNode,
    NodeMinusPlus,
    NodePlusMinus,
    /// Skip the node and its whole subtree.
    None,
}

/// One step of a [`VisitOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VisitStep {
    Node,
    Minus,
    Plus,
}

impl VisitOrder {
    pub(crate) fn steps(self) -> Option<[VisitStep; 3]> {
        use VisitStep::{Minus, Node, Plus};
        match self {
            VisitOrder::MinusNodePlus => Some([Minus, Node, Plus]),
            VisitOrder::MinusPlusNode => Some([Minus, Plus, Node]),
            VisitOrder::PlusNodeMinus => Some([Plus, Node, Minus]),
            VisitOrder::PlusMinusNode => Some([Plus, Minus, Node]),
            VisitOrder::NodeMinusPlus => Some([Node, Minus, Plus]),
            VisitOrder::NodePlusMinus => Some([Node, Plus, Minus]),
            VisitOrder::None => None,
        }
    }
}

/// Visitor for processing nodes during BSP tree traversal.
///
/// Common uses include:
/// - Collecting boundary facets
/// - Nearest-boundary searches (closest-first order with pruning)
/// - Printing and statistics
pub trait BspVisitor<H: Hyperplane, D: NodeData> {
    /// Called for each node reached by the traversal.
    fn visit(&mut self, tree: &BspTree<H, D>, node: NodeId) -> VisitResult;

    /// Chooses the visit order of an internal node. Not called for leaves.
    fn visit_order(&mut self, _tree: &BspTree<H, D>, _node: NodeId) -> VisitOrder {
        VisitOrder::NodeMinusPlus
    }
}

/// A simple visitor that collects the handles of all visited nodes.
#[derive(Debug)]
pub struct CollectingVisitor {
    order: VisitOrder,
    collected: Vec<NodeId>,
}

impl Default for CollectingVisitor {
    fn default() -> Self {
        Self::with_order(VisitOrder::NodeMinusPlus)
    }
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor using pre-order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty collecting visitor with a fixed visit order.
    pub fn with_order(order: VisitOrder) -> Self {
        Self {
            order,
            collected: Vec::new(),
        }
    }

    /// Returns the collected handles.
    pub fn into_nodes(self) -> Vec<NodeId> {
        self.collected
    }

    /// Returns a reference to the collected handles.
    pub fn nodes(&self) -> &[NodeId] {
        &self.collected
    }
}

impl<H: Hyperplane, D: NodeData> BspVisitor<H, D> for CollectingVisitor {
    fn visit(&mut self, _tree: &BspTree<H, D>, node: NodeId) -> VisitResult {
        self.collected.push(node);
        VisitResult::Continue
    }

    fn visit_order(&mut self, _tree: &BspTree<H, D>, _node: NodeId) -> VisitOrder {
        self.order
    }
}

/// A visitor that calls a closure for each node, in pre-order.
pub struct FnVisitor<F> {
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<H, D, F> BspVisitor<H, D> for FnVisitor<F>
where
    H: Hyperplane,
    D: NodeData,
    F: FnMut(&BspTree<H, D>, NodeId) -> VisitResult,
{
    fn visit(&mut self, tree: &BspTree<H, D>, node: NodeId) -> VisitResult {
        (self.func)(tree, node)
    }
}

/// Visits the child on the target's side of each cut first, then the node,
/// then the far child.
pub struct ClosestFirstVisitor<P, F> {
    target: P,
    func: F,
}

impl<P, F> ClosestFirstVisitor<P, F> {
    pub fn new(target: P, func: F) -> Self {
        Self { target, func }
    }
}

impl<H, D, F> BspVisitor<H, D> for ClosestFirstVisitor<H::Point, F>
where
    H: Hyperplane,
    D: NodeData,
    F: FnMut(&BspTree<H, D>, NodeId) -> VisitResult,
{
    fn visit(&mut self, tree: &BspTree<H, D>, node: NodeId) -> VisitResult {
        (self.func)(tree, node)
    }

    fn visit_order(&mut self, tree: &BspTree<H, D>, node: NodeId) -> VisitOrder {
        match tree[node].cut_hyperplane().map(|h| h.classify(&self.target)) {
            Some(HyperplaneLocation::Plus) => VisitOrder::PlusNodeMinus,
            _ => VisitOrder::MinusNodePlus,
        }
    }
}

/// Visits the child away from the target first, then the node, then the
/// child on the target's side.
pub struct FarthestFirstVisitor<P, F> {
    target: P,
    func: F,
}

impl<P, F> FarthestFirstVisitor<P, F> {
    pub fn new(target: P, func: F) -> Self {
        Self { target, func }
    }
}

impl<H, D, F> BspVisitor<H, D> for FarthestFirstVisitor<H::Point, F>
where
    H: Hyperplane,
    D: NodeData,
    F: FnMut(&BspTree<H, D>, NodeId) -> VisitResult,
{
    fn visit(&mut self, tree: &BspTree<H, D>, node: NodeId) -> VisitResult {
        (self.func)(tree, node)
    }

    fn visit_order(&mut self, tree: &BspTree<H, D>, node: NodeId) -> VisitOrder {
        match tree[node].cut_hyperplane().map(|h| h.classify(&self.target)) {
            Some(HyperplaneLocation::Plus) => VisitOrder::MinusNodePlus,
            _ => VisitOrder::PlusNodeMinus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Line, Precision};
    use nalgebra::Point2;

    fn line(a: [f64; 2], b: [f64; 2]) -> Line {
        Line::from_points(Point2::new(a[0], a[1]), Point2::new(b[0], b[1]), Precision::default())
            .unwrap()
    }

    /// Root cut by the x axis, its minus child cut by the y axis.
    fn make_tree() -> BspTree<Line> {
        let mut tree = BspTree::new();
        let root = tree.root();
        tree.cut(root, &line([0.0, 0.0], [1.0, 0.0]));
        let minus = tree.minus(root).unwrap();
        tree.cut(minus, &line([0.0, 0.0], [0.0, 1.0]));
        tree
    }

    #[test]
    fn every_order_visits_every_node() {
        let tree = make_tree();
        for order in [
            VisitOrder::MinusNodePlus,
            VisitOrder::MinusPlusNode,
            VisitOrder::PlusNodeMinus,
            VisitOrder::PlusMinusNode,
            VisitOrder::NodeMinusPlus,
            VisitOrder::NodePlusMinus,
        ] {
            let mut visitor = CollectingVisitor::with_order(order);
            tree.accept(&mut visitor);
            assert_eq!(visitor.nodes().len(), tree.count(), "{order:?}");
        }
    }

    #[test]
    fn post_order_visits_root_last() {
        let tree = make_tree();
        let mut visitor = CollectingVisitor::with_order(VisitOrder::MinusPlusNode);
        tree.accept(&mut visitor);
        assert_eq!(visitor.nodes().last(), Some(&tree.root()));
    }

    #[test]
    fn order_none_skips_subtree() {
        let tree = make_tree();
        let mut visitor = CollectingVisitor::with_order(VisitOrder::None);
        tree.accept(&mut visitor);
        assert!(visitor.into_nodes().is_empty());
    }

    #[test]
    fn skip_subtree_prunes_children() {
        let tree = make_tree();
        let root = tree.root();
        let mut visited = Vec::new();
        let mut visitor = FnVisitor::new(|tree: &BspTree<Line>, node: NodeId| {
            visited.push(node);
            if tree.depth(node) == 1 {
                VisitResult::SkipSubtree
            } else {
                VisitResult::Continue
            }
        });
        tree.accept(&mut visitor);

        // Root, its internal minus child (children skipped), its plus leaf.
        assert_eq!(visited.len(), 3);
        assert_eq!(visited[0], root);
    }

    #[test]
    fn leaves_ignore_visit_order() {
        let tree: BspTree<Line> = BspTree::new();
        let mut visitor = CollectingVisitor::with_order(VisitOrder::None);
        tree.accept(&mut visitor);
        assert_eq!(visitor.nodes(), &[tree.root()]);
    }

    #[test]
    fn closest_first_descends_towards_target() {
        let tree = make_tree();
        let root = tree.root();
        let minus = tree.minus(root).unwrap();

        let mut visited = Vec::new();
        let mut visitor = ClosestFirstVisitor::new(Point2::new(-2.0, 3.0), |_: &BspTree<Line>, node: NodeId| {
            visited.push(node);
            VisitResult::Continue
        });
        tree.accept(&mut visitor);

        // The first node is the leaf containing the target.
        let target_leaf = tree.find_node(&Point2::new(-2.0, 3.0), crate::bsp::FindNodeCutRule::Node);
        assert_eq!(visited[0], target_leaf);
        assert_eq!(visited[1], minus);
        assert_eq!(*visited.last().unwrap(), tree.plus(root).unwrap());
    }
}
