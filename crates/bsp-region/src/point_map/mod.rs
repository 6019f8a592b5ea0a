//! Maps and sets keyed by points, with tolerance-aware key equality.
//!
//! Keys are stored in a bucketed tree that splits space into `2^D`
//! orthants around a split point. Two keys are the same key when every
//! coordinate matches within the map's [`Precision`](crate::Precision); the
//! first inserted coordinates are the ones kept.

mod map;
mod set;

pub use map::{Iter, IterMut, PointMap, DEFAULT_BUCKET_CAPACITY};
pub use set::{PointSet, SetIter};
