//! Cut selection strategies for batch insertion.
//!
//! The order in which subsets are inserted affects tree balance and the
//! number of subset splits, but never the region a tree represents.
//! Different strategies offer different trade-offs between build time and
//! tree quality.

use crate::{Hyperplane, HyperplaneConvexSubset};

use super::node::NodeData;
use super::tree::BspTree;

/// Strategy for selecting which subset is inserted next.
pub trait CutSelector<H: Hyperplane> {
    /// Select a subset from the slice, returning its index.
    ///
    /// Returns `None` if the slice is empty.
    fn select(&self, subsets: &[H::Subset]) -> Option<usize>;
}

/// Selects the first subset in the list.
///
/// This is the simplest and fastest selector, but may produce unbalanced
/// trees depending on input order. Good when input order is already
/// randomized.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSubset;

impl<H: Hyperplane> CutSelector<H> for FirstSubset {
    fn select(&self, subsets: &[H::Subset]) -> Option<usize> {
        (!subsets.is_empty()).then_some(0)
    }
}

/// Selects the subset with the largest size.
///
/// Long cuts separate more of the remaining subsets early, which tends to
/// keep later cuts short. Ties go to the earliest subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestSubset;

impl<H: Hyperplane> CutSelector<H> for LargestSubset {
    fn select(&self, subsets: &[H::Subset]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, subset) in subsets.iter().enumerate() {
            let size = subset.size();
            if best.is_none_or(|(_, best_size)| size > best_size) {
                best = Some((index, size));
            }
        }
        best.map(|(index, _)| index)
    }
}

impl<H: Hyperplane, D: NodeData> BspTree<H, D> {
    /// Inserts every subset, letting `selector` choose the insertion order.
    pub fn insert_all_with_selector<S: CutSelector<H>>(&mut self, mut subsets: Vec<H::Subset>, selector: &S) {
        let total = subsets.len();
        while let Some(index) = selector.select(&subsets) {
            let subset = subsets.remove(index);
            self.insert(subset);
        }
        tracing::trace!(total, nodes = self.count(), "inserted selected subsets into BSP tree");
    }
}
