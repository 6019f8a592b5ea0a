//! Simple polygons in the plane, used as boundary sources for region trees.

use nalgebra::Point2;

use crate::region::RegionBspTree;
use crate::{BoundarySource, GeometryError, Line, Point, Precision, Segment};

/// A simple polygon in 2D space, defined by an ordered list of vertices.
///
/// Vertices in counter-clockwise order put the interior on the minus side of
/// every edge, so the polygon converts into the bounded region it encloses.
/// Clockwise vertices describe the complement of that region.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2<f64>>,
    precision: Precision,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    ///
    /// Returns an error if a vertex is not finite or if fewer than three
    /// vertices remain after dropping consecutive duplicates.
    pub fn new(vertices: Vec<Point2<f64>>, precision: Precision) -> Result<Self, GeometryError> {
        if let Some(vertex) = vertices.iter().find(|vertex| !Point::is_finite(*vertex)) {
            return Err(GeometryError::NonFinitePoint {
                point: format!("{vertex:?}"),
            });
        }

        let distinct = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .filter(|(a, b)| !a.eq_with_precision(*b, &precision))
            .count();
        if distinct < 3 {
            return Err(GeometryError::TooFewVertices {
                count: vertices.len(),
            });
        }

        Ok(Self {
            vertices,
            precision,
        })
    }

    /// Axis-aligned rectangle spanned by two opposite corners, counter-clockwise.
    pub fn rectangle(min: Point2<f64>, max: Point2<f64>, precision: Precision) -> Result<Self, GeometryError> {
        Self::new(
            vec![
                Point2::new(min.x, min.y),
                Point2::new(max.x, min.y),
                Point2::new(max.x, max.y),
                Point2::new(min.x, max.y),
            ],
            precision,
        )
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices (always false for valid polygons).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Shoelace area, positive for counter-clockwise vertices.
    pub fn signed_area(&self) -> f64 {
        self.vertex_pairs()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            * 0.5
    }

    /// Center of mass of the enclosed area, or `None` if the area is zero.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        let area = self.signed_area();
        if self.precision.eq_zero(area) {
            return None;
        }
        let (x, y) = self.vertex_pairs().fold((0.0, 0.0), |(x, y), (a, b)| {
            let cross = a.x * b.y - b.x * a.y;
            (x + (a.x + b.x) * cross, y + (a.y + b.y) * cross)
        });
        let scale = 1.0 / (6.0 * area);
        Some(Point2::new(x * scale, y * scale))
    }

    /// Edges as segments, skipping edges between coincident vertices.
    pub fn edges(&self) -> Vec<Segment> {
        self.vertex_pairs()
            .filter_map(|(a, b)| Segment::from_points(*a, *b, self.precision).ok())
            .collect()
    }

    /// Region enclosed by the polygon.
    pub fn to_tree(&self) -> RegionBspTree<Line> {
        let mut region = RegionBspTree::empty();
        region.insert_boundary_source(self);
        region
    }

    fn vertex_pairs(&self) -> impl Iterator<Item = (&Point2<f64>, &Point2<f64>)> {
        self.vertices.iter().zip(self.vertices.iter().cycle().skip(1))
    }
}

impl BoundarySource<Line> for Polygon {
    fn boundaries(&self) -> Vec<Segment> {
        self.edges()
    }
}
