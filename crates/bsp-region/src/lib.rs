//! BSP (Binary Space Partitioning) trees over arbitrary hyperplanes.
//!
//! - [`bsp`] holds the generic tree engine: cutting, insertion, traversal,
//!   copying, transforming and merging of trees whose nodes carry
//!   caller-defined data.
//! - [`region`] specializes it into a tree that describes a region of space,
//!   with point classification, boundary and size computation, projection
//!   and boolean operations.
//! - [`point_map`] is a map keyed by points under a numeric tolerance.
//!
//! Planar geometry is provided by [`Line`], [`Segment`] and [`Polygon`].

mod error;
mod hyperplane;
mod line;
mod point;
mod polygon;
mod precision;
mod segment;
mod transform;

pub mod bsp;
pub mod point_map;
pub mod region;

pub use error::GeometryError;
pub use hyperplane::{
    BoundarySource, Hyperplane, HyperplaneConvexSubset, HyperplaneLocation, RegionLocation, Split,
    SplitLocation,
};
pub use line::Line;
pub use point::Point;
pub use point_map::{PointMap, PointSet};
pub use polygon::Polygon;
pub use precision::{Precision, DEFAULT_EPSILON};
pub use region::RegionBspTree;
pub use segment::Segment;
pub use transform::{FnTransform, Transform};
