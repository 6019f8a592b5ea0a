//! Binary Space Partitioning tree core.
//!
//! This module provides a BSP tree that recursively partitions space using
//! hyperplane cuts. It knows nothing about what the cells mean: the tree is
//! generic over the hyperplane type and over per-node data, and higher level
//! structures (such as region trees) give the leaves their meaning.
//!
//! The tree enables:
//!
//! - Incremental construction by cutting leaves or inserting convex subsets
//! - Point location with explicit rules for points on a cut
//! - Ordered traversal relative to a target point
//! - Merging two trees cell by cell
//!
//! # Example
//!
//! ```
//! use bsp_region::bsp::{BspTree, FindNodeCutRule};
//! use bsp_region::{Line, Precision};
//! use nalgebra::Point2;
//!
//! let x_axis = Line::from_points(Point2::origin(), Point2::new(1.0, 0.0), Precision::default())?;
//!
//! let mut tree: BspTree<Line> = BspTree::new();
//! let root = tree.root();
//! tree.cut(root, &x_axis);
//!
//! let above = tree.find_node(&Point2::new(0.0, 1.0), FindNodeCutRule::Node);
//! assert_eq!(tree.minus(root), Some(above));
//! # Ok::<(), bsp_region::GeometryError>(())
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: The arena holding all nodes and the root handle
//! - [`BspNode`]: A node with an optional cut, children and data
//! - [`NodeData`]: Per-node data and the hooks generic algorithms need
//! - [`BspVisitor`]: Visitor trait for custom traversal behavior
//! - [`CutSelector`]: Strategy trait for ordering batch insertion
//! - [`MergeOperator`]: Leaf rule plugged into [`merge`]

mod attribute;
mod merge;
mod node;
mod printer;
mod selector;
mod tree;
mod visitor;

pub use attribute::AttributeBspTree;
pub use merge::{merge, MergeOperator};
pub use node::{BspNode, NodeData, NodeId};
pub use selector::{CutSelector, FirstSubset, LargestSubset};
pub use tree::{BspTree, FindNodeCutRule, Nodes};
pub use visitor::{
    BspVisitor, ClosestFirstVisitor, CollectingVisitor, FarthestFirstVisitor, FnVisitor,
    VisitOrder, VisitResult,
};
