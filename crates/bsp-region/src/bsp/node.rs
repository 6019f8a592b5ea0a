//! BSP tree node implementation.

use std::fmt::Debug;

use slotmap::new_key_type;

use crate::Hyperplane;

new_key_type! {
    /// Stable handle of a node inside a [`BspTree`](super::BspTree).
    ///
    /// Handles stay valid until the node is removed from its tree; a handle
    /// from a removed node never aliases a newer node.
    pub struct NodeId;
}

/// Data carried by every node of a tree.
///
/// Plain trees use `()`; region trees store a leaf location; attribute
/// trees store an optional caller value. The hooks let the generic tree
/// algorithms create and collapse nodes without knowing what the data means.
pub trait NodeData: Clone + Debug + Default {
    /// Data for the `(minus, plus)` children created when a leaf carrying
    /// `self` is cut.
    fn cut_children(&self) -> (Self, Self) {
        (Self::default(), Self::default())
    }

    /// Returns `true` if two sibling leaves carrying this data can be merged
    /// into their parent without changing the meaning of the tree.
    fn condensable(_minus: &Self, _plus: &Self) -> bool {
        false
    }
}

impl NodeData for () {}

/// A node in the BSP tree.
///
/// A node is a leaf when it has no cut. An internal node has a cut, a
/// convex subset of its hyperplane confined to the node's cell, and exactly
/// two children: `minus` on the negative side of the cut, `plus` on the
/// positive side. The parent handle is a back-reference only; children are
/// owned through the tree's arena.
#[derive(Debug, Clone)]
pub struct BspNode<H: Hyperplane, D> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) cut: Option<H::Subset>,
    pub(crate) minus: Option<NodeId>,
    pub(crate) plus: Option<NodeId>,
    pub(crate) data: D,
}

impl<H: Hyperplane, D> BspNode<H, D> {
    pub(crate) fn leaf(parent: Option<NodeId>, data: D) -> Self {
        Self {
            parent,
            cut: None,
            minus: None,
            plus: None,
            data,
        }
    }

    /// Returns the parent handle, or `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the cut, or `None` for a leaf.
    #[inline]
    pub fn cut(&self) -> Option<&H::Subset> {
        self.cut.as_ref()
    }

    /// Returns the hyperplane of the cut, or `None` for a leaf.
    #[inline]
    pub fn cut_hyperplane(&self) -> Option<&H> {
        use crate::HyperplaneConvexSubset;
        self.cut.as_ref().map(|cut| cut.hyperplane())
    }

    /// Returns the minus child, or `None` for a leaf.
    #[inline]
    pub fn minus(&self) -> Option<NodeId> {
        self.minus
    }

    /// Returns the plus child, or `None` for a leaf.
    #[inline]
    pub fn plus(&self) -> Option<NodeId> {
        self.plus
    }

    /// Returns the `(minus, plus)` children of an internal node.
    #[inline]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.minus.zip(self.plus)
    }

    /// Checks if this node has no cut.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.cut.is_none()
    }

    /// Checks if this node has a cut and two children.
    #[inline]
    pub fn is_internal(&self) -> bool {
        self.cut.is_some()
    }

    /// Returns the node data.
    #[inline]
    pub fn data(&self) -> &D {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Line, Precision};
    use nalgebra::Point2;

    fn x_axis() -> Line {
        Line::from_points(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Precision::default()).unwrap()
    }

    #[test]
    fn new_leaf_has_no_cut_or_children() {
        let node: BspNode<Line, ()> = BspNode::leaf(None, ());

        assert!(node.is_leaf());
        assert!(!node.is_internal());
        assert!(node.cut().is_none());
        assert!(node.cut_hyperplane().is_none());
        assert!(node.children().is_none());
        assert!(node.parent().is_none());
    }

    #[test]
    fn cut_makes_node_internal() {
        use crate::Hyperplane;

        let mut node: BspNode<Line, ()> = BspNode::leaf(None, ());
        node.cut = Some(x_axis().span());
        assert!(node.is_internal());
        assert_eq!(node.cut_hyperplane(), Some(&x_axis()));
    }

    #[test]
    fn unit_data_is_never_condensable() {
        assert!(!<() as NodeData>::condensable(&(), &()));
        assert_eq!(().cut_children(), ((), ()));
    }
}
