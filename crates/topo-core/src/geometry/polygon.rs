use serde::{Deserialize, Serialize};

use super::line::{BoundingBox, Line2d};
use super::point::Point2d;

/// A polygon: one outer ring plus zero or more hole rings, all closed
/// (`first == last`). Produced by `GeometryKernel::build_area` (C1's
/// `buildArea`) when reconstructing a face's geometry (C6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub outer: Line2d,
    pub holes: Vec<Line2d>,
}

impl Polygon {
    pub fn new(outer: Line2d, holes: Vec<Line2d>) -> Self {
        Self { outer, holes }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.outer.bounding_box()
    }

    /// Ray-casting point-in-polygon test respecting holes.
    pub fn contains_point(&self, point: Point2d) -> bool {
        if !ring_contains(&self.outer, point) {
            return false;
        }
        !self.holes.iter().any(|h| ring_contains(h, point))
    }

    /// A point guaranteed to lie in the polygon's interior (C1's
    /// `PointOnSurface`). Uses the centroid of the outer ring's first
    /// triangle fan as a cheap approximation, falling back to the ring
    /// centroid.
    pub fn point_on_surface(&self) -> Point2d {
        let pts = self.outer.points();
        if pts.len() < 4 {
            return self.outer.first();
        }
        // Try the midpoint of a diagonal from vertex 0; if it lands
        // outside (concave ring) fall back to the arithmetic centroid,
        // which is sufficient for the simply-shaped test/reference faces
        // this mock kernel targets.
        let candidate = pts[0].midpoint(&pts[pts.len() / 2]);
        if self.contains_point(candidate) {
            return candidate;
        }
        let n = (pts.len() - 1).max(1) as f64;
        let sx: f64 = pts[..pts.len() - 1].iter().map(|p| p.x).sum();
        let sy: f64 = pts[..pts.len() - 1].iter().map(|p| p.y).sum();
        Point2d::new(sx / n, sy / n)
    }
}

fn ring_contains(ring: &Line2d, point: Point2d) -> bool {
    let pts = ring.points();
    let mut inside = false;
    let n = pts.len();
    if n < 4 {
        return false;
    }
    let mut j = n - 2; // skip duplicated closing point
    for i in 0..n - 1 {
        let pi = pts[i];
        let pj = pts[j];
        let intersects_y = (pi.y > point.y) != (pj.y > point.y);
        if intersects_y {
            let x_at_y = pi.x + (point.y - pi.y) * (pj.x - pi.x) / (pj.y - pi.y);
            if point.x < x_at_y {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Line2d {
        Line2d::new(vec![
            Point2d::new(x0, y0),
            Point2d::new(x1, y0),
            Point2d::new(x1, y1),
            Point2d::new(x0, y1),
            Point2d::new(x0, y0),
        ])
    }

    #[test]
    fn test_contains_point_simple() {
        let poly = Polygon::new(square(0.0, 0.0, 10.0, 10.0), vec![]);
        assert!(poly.contains_point(Point2d::new(5.0, 5.0)));
        assert!(!poly.contains_point(Point2d::new(15.0, 5.0)));
    }

    #[test]
    fn test_contains_point_respects_hole() {
        let poly = Polygon::new(square(0.0, 0.0, 10.0, 10.0), vec![square(4.0, 4.0, 6.0, 6.0)]);
        assert!(poly.contains_point(Point2d::new(1.0, 1.0)));
        assert!(!poly.contains_point(Point2d::new(5.0, 5.0)));
    }

    #[test]
    fn test_point_on_surface_is_contained() {
        let poly = Polygon::new(square(0.0, 0.0, 4.0, 4.0), vec![]);
        let p = poly.point_on_surface();
        assert!(poly.contains_point(p));
    }
}
