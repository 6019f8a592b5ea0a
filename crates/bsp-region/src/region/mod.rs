//! Regions of space represented by BSP trees.
//!
//! A [`RegionBspTree`] gives every leaf of a BSP tree a location: its cell is
//! either inside or outside the region. The region boundary is made of the
//! parts of the cuts that separate inside cells from outside cells.
//!
//! # Example
//!
//! ```
//! use bsp_region::region::RegionBspTree;
//! use bsp_region::{Polygon, Precision, RegionLocation};
//! use nalgebra::Point2;
//!
//! let square = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Precision::default())?;
//! let region: RegionBspTree<_> = square.to_tree();
//!
//! assert_eq!(region.classify(&Point2::new(0.5, 0.5)), RegionLocation::Inside);
//! assert_eq!(region.classify(&Point2::new(1.0, 0.5)), RegionLocation::Boundary);
//! assert!((region.size() - 1.0).abs() < 1e-9);
//! # Ok::<(), bsp_region::GeometryError>(())
//! ```

mod boundary;
mod ops;
mod project;
mod size;
mod tree;

pub use boundary::RegionCutBoundary;
pub use size::RegionSizeProperties;
pub use tree::{RegionBspTree, RegionCutRule, RegionData};
