//! Projection of points onto the region boundary.

use crate::bsp::VisitResult;
use crate::{Hyperplane, HyperplaneConvexSubset, Point};

use super::tree::RegionBspTree;

impl<H: Hyperplane> RegionBspTree<H> {
    /// Closest point of the region boundary to `point`.
    ///
    /// Returns `None` if the region has no boundary (full or empty) or
    /// `point` is not finite. Cells are searched closest first; once a
    /// boundary point closer than a cut hyperplane has been found, the far
    /// side of that cut is skipped.
    pub fn project(&self, point: &H::Point) -> Option<H::Point> {
        if !point.is_finite() {
            return None;
        }

        let mut best: Option<(H::Point, f64)> = None;
        self.tree.traverse_closest_first(point.clone(), |tree, node| {
            let Some(cut) = tree.node_cut(node) else {
                return VisitResult::Continue;
            };
            let offset = cut.hyperplane().offset(point).abs();

            if best.as_ref().is_none_or(|(_, distance)| offset <= *distance) {
                if let Some(candidate) = self.cut_boundary(node).and_then(|boundary| boundary.closest(point)) {
                    let distance = candidate.distance(point);
                    if best.as_ref().is_none_or(|(_, best_distance)| distance < *best_distance) {
                        best = Some((candidate, distance));
                    }
                }
            }

            match &best {
                Some((_, distance)) if offset > *distance => VisitResult::SkipSubtree,
                _ => VisitResult::Continue,
            }
        });

        best.map(|(closest, _)| closest)
    }
}
