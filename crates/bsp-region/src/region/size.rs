//! Region size and centroid.

use std::rc::Rc;

use crate::{Hyperplane, HyperplaneConvexSubset, Point};

use super::tree::RegionBspTree;

/// Size and centroid of a region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSizeProperties<P> {
    size: f64,
    centroid: Option<P>,
}

impl<P> RegionSizeProperties<P> {
    /// Measure of the region in the space dimension (area in 2D).
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Center of mass, or `None` for infinite or zero-sized regions.
    #[inline]
    pub fn centroid(&self) -> Option<&P> {
        self.centroid.as_ref()
    }

    fn infinite() -> Self {
        Self {
            size: f64::INFINITY,
            centroid: None,
        }
    }
}

impl<H: Hyperplane> RegionBspTree<H> {
    /// Measure of the region; `+inf` for unbounded regions.
    pub fn size(&self) -> f64 {
        self.size_properties().size()
    }

    /// Center of mass of the region, if it is bounded and not empty.
    pub fn centroid(&self) -> Option<H::Point> {
        self.size_properties().centroid().cloned()
    }

    /// Size and centroid, computed once per tree version.
    pub fn size_properties(&self) -> Rc<RegionSizeProperties<H::Point>> {
        let version = self.tree.version();
        if let Some((cached_version, properties)) = self.size_cache.borrow().as_ref() {
            if *cached_version == version {
                return Rc::clone(properties);
            }
        }

        let properties = Rc::new(self.compute_size_properties());
        *self.size_cache.borrow_mut() = Some((version, Rc::clone(&properties)));
        properties
    }

    /// Sums the cones spanned by the coordinate origin and every boundary facet.
    ///
    /// Each facet contributes `size * h / d`, where `h` is the signed distance
    /// of the origin-side apex to the facet along the outward normal and `d`
    /// the space dimension. The centroid of such a cone lies at `d / (d + 1)`
    /// of the way from the apex to the facet centroid.
    fn compute_size_properties(&self) -> RegionSizeProperties<H::Point> {
        if self.is_full() {
            return RegionSizeProperties::infinite();
        }
        if self.is_empty() {
            return RegionSizeProperties {
                size: 0.0,
                centroid: None,
            };
        }

        let dimension = H::Point::DIMENSION;
        let d = dimension as f64;
        let origin = H::Point::from_coordinate_slice(&vec![0.0; dimension]);

        let mut size = 0.0;
        let mut weighted = vec![0.0; dimension];
        let mut facet_count = 0usize;
        for node in self.tree.nodes() {
            let Some(boundary) = self.cut_boundary(node) else {
                continue;
            };
            let facets = boundary
                .outside_facing()
                .iter()
                .map(|facet| (facet, 1.0))
                .chain(boundary.inside_facing().iter().map(|facet| (facet, -1.0)));

            for (facet, orientation) in facets {
                facet_count += 1;
                if facet.is_infinite() {
                    return RegionSizeProperties::infinite();
                }
                let facet_size = facet.size();
                let Some(facet_centroid) = facet.centroid() else {
                    continue;
                };

                let height = -orientation * facet.hyperplane().offset(&origin);
                let cone = facet_size * height / d;
                size += cone;
                for (axis, sum) in weighted.iter_mut().enumerate() {
                    *sum += cone * facet_centroid.coordinate(axis);
                }
            }
        }

        if facet_count == 0 {
            // Cuts that separate nothing: every leaf shares one location.
            let inside = self
                .tree
                .nodes()
                .any(|node| self.tree.is_leaf(node) && self.tree.data(node).is_inside());
            return if inside {
                RegionSizeProperties::infinite()
            } else {
                RegionSizeProperties {
                    size: 0.0,
                    centroid: None,
                }
            };
        }

        if size < 0.0 {
            // Outward normals point into the region: it is the complement of a bounded one.
            return RegionSizeProperties::infinite();
        }

        let centroid = (size > 0.0).then(|| {
            let scale = d / (d + 1.0) / size;
            let coordinates: Vec<f64> = weighted.iter().map(|sum| sum * scale).collect();
            H::Point::from_coordinate_slice(&coordinates)
        });
        RegionSizeProperties { size, centroid }
    }
}
