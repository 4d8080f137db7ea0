use serde::{Deserialize, Serialize};

use super::point::Point2d;

/// A simple (non-self-intersecting) polyline: the geometry carried by an
/// `Edge`. Invariant (spec.md §3, invariant 2): `points[0]` equals the
/// edge's start node and `points[last]` equals its end node — enforced by
/// callers, not by this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line2d {
    points: Vec<Point2d>,
}

impl Line2d {
    pub fn new(points: Vec<Point2d>) -> Self {
        debug_assert!(points.len() >= 2, "a line must have at least two points");
        Self { points }
    }

    pub fn points(&self) -> &[Point2d] {
        &self.points
    }

    pub fn first(&self) -> Point2d {
        self.points[0]
    }

    pub fn last(&self) -> Point2d {
        *self.points.last().unwrap()
    }

    pub fn is_closed(&self) -> bool {
        self.first().exactly_eq(&self.last())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn reversed(&self) -> Self {
        let mut pts = self.points.clone();
        pts.reverse();
        Self::new(pts)
    }

    /// Total planar length of the polyline.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for p in &self.points {
            bb.expand_to_include(p);
        }
        bb
    }

    /// Signed area of the ring via the shoelace formula; callers use the
    /// sign to decide orientation (positive = counter-clockwise).
    pub fn signed_area(&self) -> f64 {
        let mut sum = 0.0;
        for w in self.points.windows(2) {
            sum += w[0].x * w[1].y - w[1].x * w[0].y;
        }
        sum * 0.5
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Concatenate `self` with `other`, which must start where `self` ends.
    pub fn join(&self, other: &Self) -> Self {
        debug_assert!(self.last().exactly_eq(&other.first()));
        let mut pts = self.points.clone();
        pts.extend_from_slice(&other.points[1..]);
        Self::new(pts)
    }
}

/// An axis-aligned minimum bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point2d,
    pub max: Point2d,
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self {
            min: Point2d::new(f64::INFINITY, f64::INFINITY),
            max: Point2d::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn from_point(p: &Point2d) -> Self {
        Self { min: *p, max: *p }
    }

    pub fn expand_to_include(&mut self, p: &Point2d) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: Point2d::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2d::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn expanded_by(&self, margin: f64) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self {
            min: Point2d::new(self.min.x - margin, self.min.y - margin),
            max: Point2d::new(self.max.x + margin, self.max.y + margin),
        }
    }

    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains_point(&self, p: &Point2d) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_length() {
        let l = Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(3.0, 4.0)]);
        assert!((l.length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_signed_area_ccw_square() {
        let ring = Line2d::new(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(0.0, 1.0),
            Point2d::new(0.0, 0.0),
        ]);
        assert!(ring.is_counter_clockwise());
        assert!((ring.signed_area() - 1.0).abs() < 1e-12);
        assert!(!ring.reversed().is_counter_clockwise());
    }

    #[test]
    fn test_bounding_box_union_and_intersects() {
        let a = BoundingBox {
            min: Point2d::new(0.0, 0.0),
            max: Point2d::new(1.0, 1.0),
        };
        let b = BoundingBox {
            min: Point2d::new(0.5, 0.5),
            max: Point2d::new(2.0, 2.0),
        };
        assert!(a.intersects(&b));
        let u = a.union(&b);
        assert_eq!(u.min, Point2d::new(0.0, 0.0));
        assert_eq!(u.max, Point2d::new(2.0, 2.0));
    }

    #[test]
    fn test_bounding_box_disjoint() {
        let a = BoundingBox::empty();
        let mut a = a;
        a.expand_to_include(&Point2d::new(0.0, 0.0));
        a.expand_to_include(&Point2d::new(1.0, 1.0));
        let b = BoundingBox {
            min: Point2d::new(5.0, 5.0),
            max: Point2d::new(6.0, 6.0),
        };
        assert!(!a.intersects(&b));
    }
}
