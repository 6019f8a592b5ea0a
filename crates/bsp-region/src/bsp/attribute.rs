//! Trees whose nodes carry an optional caller-defined attribute.

use std::fmt::Debug;

use crate::Hyperplane;

use super::node::{NodeData, NodeId};
use super::tree::BspTree;

/// A BSP tree where every node may hold an attribute of type `T`.
///
/// New nodes start without an attribute. Attributes are not structural, so
/// setting one does not change the tree version.
pub type AttributeBspTree<H, T> = BspTree<H, Option<T>>;

impl<T: Clone + Debug> NodeData for Option<T> {}

impl<H: Hyperplane, T: Clone + Debug> BspTree<H, Option<T>> {
    /// Attribute of `node`, if one was set.
    pub fn attribute(&self, node: NodeId) -> Option<&T> {
        self.data(node).as_ref()
    }

    /// Sets or clears the attribute of `node`, returning the previous one.
    pub fn set_attribute(&mut self, node: NodeId, attribute: Option<T>) -> Option<T> {
        std::mem::replace(self.data_mut(node), attribute)
    }
}
