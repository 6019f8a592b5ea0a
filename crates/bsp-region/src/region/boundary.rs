//! Region boundaries carried by the cuts of a region tree.

use std::rc::Rc;

use crate::bsp::NodeId;
use crate::{Hyperplane, HyperplaneConvexSubset, Point};

use super::tree::{BoundaryCache, RegionBspTree};

/// The part of a node's cut that lies on the region boundary.
///
/// Facets in [`outside_facing`](Self::outside_facing) have the region on
/// the minus side of the cut and face out through its plus side; facets in
/// [`inside_facing`](Self::inside_facing) have the region on the plus side.
#[derive(Debug, Clone)]
pub struct RegionCutBoundary<H: Hyperplane> {
    inside_facing: Vec<H::Subset>,
    outside_facing: Vec<H::Subset>,
}

impl<H: Hyperplane> RegionCutBoundary<H> {
    /// Facets with the region interior on the plus side of the cut.
    pub fn inside_facing(&self) -> &[H::Subset] {
        &self.inside_facing
    }

    /// Facets with the region interior on the minus side of the cut.
    pub fn outside_facing(&self) -> &[H::Subset] {
        &self.outside_facing
    }

    /// Returns `true` if no part of the cut is on the boundary.
    pub fn is_empty(&self) -> bool {
        self.inside_facing.is_empty() && self.outside_facing.is_empty()
    }

    /// Total size of all facets.
    pub fn size(&self) -> f64 {
        self.facets().map(|facet| facet.size()).sum()
    }

    /// Closest point of any facet to `point`, or `None` if there are no facets.
    pub fn closest(&self, point: &H::Point) -> Option<H::Point> {
        let mut best: Option<(H::Point, f64)> = None;
        for facet in self.facets() {
            let candidate = facet.closest(point);
            let distance = candidate.distance(point);
            if best.as_ref().is_none_or(|(_, best_distance)| distance < *best_distance) {
                best = Some((candidate, distance));
            }
        }
        best.map(|(closest, _)| closest)
    }

    /// Returns `true` if `point` lies on one of the facets.
    pub fn contains(&self, point: &H::Point) -> bool {
        self.facets().any(|facet| facet.contains(point))
    }

    fn facets(&self) -> impl Iterator<Item = &H::Subset> {
        self.inside_facing.iter().chain(&self.outside_facing)
    }

    /// The boundary of the same cut in the complemented region.
    pub(crate) fn complement(&self) -> Self {
        Self {
            inside_facing: self.outside_facing.clone(),
            outside_facing: self.inside_facing.clone(),
        }
    }
}

/// Pieces of a subset sorted by the location of the leaf cells they reach.
struct Characterization<S> {
    inside: Vec<S>,
    outside: Vec<S>,
}

impl<S> Characterization<S> {
    fn new() -> Self {
        Self {
            inside: Vec::new(),
            outside: Vec::new(),
        }
    }
}

impl<H: Hyperplane> RegionBspTree<H> {
    /// Boundary part of the cut of `node`, or `None` for a leaf.
    ///
    /// Results are cached until the tree changes, so repeated calls for the
    /// same node return the same shared value.
    pub fn cut_boundary(&self, node: NodeId) -> Option<Rc<RegionCutBoundary<H>>> {
        if self.tree.is_leaf(node) {
            return None;
        }

        let version = self.tree.version();
        let mut cache = self.boundary_cache.borrow_mut();
        if cache.version != version {
            *cache = BoundaryCache {
                version,
                entries: Default::default(),
            };
        }
        if let Some(boundary) = cache.entries.get(node) {
            return Some(Rc::clone(boundary));
        }

        let boundary = Rc::new(self.compute_cut_boundary(node)?);
        cache.entries.insert(node, Rc::clone(&boundary));
        Some(boundary)
    }

    fn compute_cut_boundary(&self, node: NodeId) -> Option<RegionCutBoundary<H>> {
        let n = &self.tree[node];
        let (cut, (minus, plus)) = (n.cut()?, n.children()?);

        let mut minus_parts = Characterization::new();
        self.characterize(minus, cut.clone(), &mut minus_parts);

        // Inside on the minus side, outside on the plus side.
        let mut outside_facing = Characterization::new();
        for part in minus_parts.inside {
            self.characterize(plus, part, &mut outside_facing);
        }

        // Outside on the minus side, inside on the plus side.
        let mut inside_facing = Characterization::new();
        for part in minus_parts.outside {
            self.characterize(plus, part, &mut inside_facing);
        }

        Some(RegionCutBoundary {
            inside_facing: inside_facing.inside,
            outside_facing: outside_facing.outside,
        })
    }

    /// Splits `subset` down the subtree at `node`, sorting the pieces by leaf location.
    fn characterize(&self, node: NodeId, subset: H::Subset, out: &mut Characterization<H::Subset>) {
        let n = &self.tree[node];
        let (Some(hyperplane), Some((minus, plus))) = (n.cut_hyperplane(), n.children()) else {
            if n.data().is_inside() {
                out.inside.push(subset);
            } else {
                out.outside.push(subset);
            }
            return;
        };

        match subset.split(hyperplane).into_parts() {
            (Some(minus_part), Some(plus_part)) => {
                self.characterize(minus, minus_part, out);
                self.characterize(plus, plus_part, out);
            }
            (Some(minus_part), None) => self.characterize(minus, minus_part, out),
            (None, Some(plus_part)) => self.characterize(plus, plus_part, out),
            (None, None) => {
                // Lies on this cut: both children border it.
                self.characterize(minus, subset.clone(), out);
                self.characterize(plus, subset, out);
            }
        }
    }

    /// All boundary facets, oriented with the region interior on their minus side.
    pub fn boundaries(&self) -> Vec<H::Subset> {
        let mut facets = Vec::new();
        for node in self.tree.nodes() {
            if let Some(boundary) = self.cut_boundary(node) {
                facets.extend(boundary.outside_facing().iter().cloned());
                facets.extend(boundary.inside_facing().iter().map(|facet| facet.reverse()));
            }
        }
        facets
    }

    /// Total size of the region boundary.
    pub fn boundary_size(&self) -> f64 {
        self.tree
            .nodes()
            .filter_map(|node| self.cut_boundary(node))
            .map(|boundary| boundary.size())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::FindNodeCutRule;
    use crate::region::RegionCutRule;
    use crate::{Line, Precision, RegionLocation, Segment};
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn segment(a: [f64; 2], b: [f64; 2]) -> Segment {
        Segment::from_points(Point2::new(a[0], a[1]), Point2::new(b[0], b[1]), Precision::default())
            .unwrap()
    }

    fn line(a: [f64; 2], b: [f64; 2]) -> Line {
        Line::from_points(Point2::new(a[0], a[1]), Point2::new(b[0], b[1]), Precision::default())
            .unwrap()
    }

    fn unit_square() -> RegionBspTree<Line> {
        let mut region = RegionBspTree::empty();
        region.insert_all([
            segment([0.0, 0.0], [1.0, 0.0]),
            segment([1.0, 0.0], [1.0, 1.0]),
            segment([1.0, 1.0], [0.0, 1.0]),
            segment([0.0, 1.0], [0.0, 0.0]),
        ]);
        region
    }

    #[test]
    fn leaves_have_no_cut_boundary() {
        let region = unit_square();
        let leaf = region.find_node(&Point2::new(0.5, 0.5), FindNodeCutRule::Node);
        assert!(region.cut_boundary(leaf).is_none());
    }

    #[test]
    fn root_cut_boundary_is_bottom_edge() {
        let region = unit_square();
        let boundary = region.cut_boundary(region.root()).unwrap();

        assert!(boundary.inside_facing().is_empty());
        assert_eq!(boundary.outside_facing().len(), 1);
        assert_relative_eq!(boundary.size(), 1.0, epsilon = 1e-12);
        assert!(boundary.contains(&Point2::new(0.5, 0.0)));
        assert!(!boundary.contains(&Point2::new(2.0, 0.0)));
    }

    #[test]
    fn cut_boundary_is_cached_per_version() {
        let mut region = unit_square();
        let root = region.root();
        let first = region.cut_boundary(root).unwrap();
        let second = region.cut_boundary(root).unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        let leaf = region.find_node(&Point2::new(0.5, 0.5), FindNodeCutRule::Node);
        region.set_location(leaf, RegionLocation::Outside).unwrap();
        let third = region.cut_boundary(root).unwrap();
        assert!(!Rc::ptr_eq(&first, &third));
        assert!(third.is_empty());
    }

    #[test]
    fn complement_swaps_facing() {
        let mut region = unit_square();
        let root = region.root();
        let before = region.cut_boundary(root).unwrap();
        region.complement();
        let after = region.cut_boundary(root).unwrap();

        assert_eq!(after.inside_facing().len(), before.outside_facing().len());
        assert!(after.outside_facing().is_empty());
    }

    #[test]
    fn boundary_size_of_square() {
        assert_relative_eq!(unit_square().boundary_size(), 4.0, epsilon = 1e-12);
        assert_eq!(RegionBspTree::<Line>::full().boundary_size(), 0.0);
    }

    #[test]
    fn boundaries_face_outward() {
        let mut region = unit_square();
        region.complement();
        region.complement();
        let facets = region.boundaries();
        assert_eq!(facets.len(), 4);
        for facet in &facets {
            let center = facet.centroid().unwrap();
            let outward = facet.hyperplane().plus_normal();
            let outside = center + outward * 0.25;
            assert_eq!(region.classify(&outside), RegionLocation::Outside);
        }
    }

    #[test]
    fn inside_facing_when_region_is_on_plus_side() {
        let mut region: RegionBspTree<Line> = RegionBspTree::empty();
        let root = region.root();
        region.cut(root, &line([0.0, 0.0], [1.0, 0.0]), RegionCutRule::PlusInside);

        let boundary = region.cut_boundary(root).unwrap();
        assert_eq!(boundary.inside_facing().len(), 1);
        assert!(boundary.outside_facing().is_empty());
        assert_eq!(region.boundary_size(), f64::INFINITY);
    }
}
