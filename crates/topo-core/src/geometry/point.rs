use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use super::vector::Vec2;

/// A point in 2D space, optionally carrying a Z ordinate.
///
/// The core treats `z` as payload: it never participates in a topological
/// predicate (distance, crossing, containment are always planar), but it is
/// preserved so that a topology with `has_z = true` round-trips through
/// `ChangeEdgeGeom`/splits without losing elevation data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Point2d {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0, z: None };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Coordinate-exact equality (spec.md §6: "Equality of 2D points is
    /// coordinate-exact unless tolerance is specified").
    pub fn exactly_eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }

    pub fn within(&self, other: &Self, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
            z: match (self.z, other.z) {
                (Some(a), Some(b)) => Some((a + b) * 0.5),
                _ => None,
            },
        }
    }

    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
            z: match (self.z, other.z) {
                (Some(a), Some(b)) => Some(a + t * (b - a)),
                _ => None,
            },
        }
    }

    pub fn max_ordinate(&self) -> f64 {
        self.x.abs().max(self.y.abs())
    }

    pub fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Add<Vec2> for Point2d {
    type Output = Point2d;
    fn add(self, rhs: Vec2) -> Self::Output {
        Point2d { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z }
    }
}

impl Sub for Point2d {
    type Output = Vec2;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<Vec2> for Point2d {
    type Output = Point2d;
    fn sub(self, rhs: Vec2) -> Self::Output {
        Point2d { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point2d::new(1.0, 0.0);
        let b = Point2d::new(4.0, 0.0);
        assert!((a.distance_to(&b) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_midpoint_preserves_z_only_when_both_have_it() {
        let a = Point2d::with_z(0.0, 0.0, 2.0);
        let b = Point2d::new(2.0, 4.0);
        let m = a.midpoint(&b);
        assert!((m.x - 1.0).abs() < 1e-12);
        assert!((m.y - 2.0).abs() < 1e-12);
        assert!(m.z.is_none());
    }

    #[test]
    fn test_point_sub_gives_vector() {
        let a = Point2d::new(3.0, 4.0);
        let b = Point2d::new(1.0, 1.0);
        let v = a - b;
        assert!((v.x - 2.0).abs() < 1e-12);
        assert!((v.y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_exactly_eq_is_coordinate_exact() {
        let a = Point2d::new(1.0, 2.0);
        let b = Point2d::new(1.0, 2.0 + 1e-15);
        assert!(!a.exactly_eq(&b));
        assert!(a.within(&b, 1e-9));
    }

    #[test]
    fn test_lerp() {
        let a = Point2d::ORIGIN;
        let b = Point2d::new(10.0, 0.0);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.x - 5.0).abs() < 1e-12);
    }
}
