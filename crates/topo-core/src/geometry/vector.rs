use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A vector in the 2D plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const X: Self = Self { x: 1.0, y: 0.0 };
    pub const Y: Self = Self { x: 0.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 2D "cross product": the z-component of the 3D cross product of the
    /// two vectors extended with z=0. Positive when `other` is
    /// counter-clockwise from `self`.
    pub fn cross(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        if len < 1e-15 {
            None
        } else {
            Some(*self / len)
        }
    }

    /// The counter-clockwise angle from the positive x-axis to this vector,
    /// in `[0, 2*PI)` — spec.md's "azimuth".
    pub fn azimuth(&self) -> f64 {
        let a = self.y.atan2(self.x);
        if a < 0.0 {
            a + 2.0 * std::f64::consts::PI
        } else {
            a
        }
    }

    pub fn to_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Normalize `angle` into `[0, 2*PI)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let mut a = angle % two_pi;
    if a < 0.0 {
        a += two_pi;
    }
    a
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for f64 {
    type Output = Vec2;
    fn mul(self, rhs: Vec2) -> Self::Output {
        Vec2::new(self * rhs.x, self * rhs.y)
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_dot_product() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 5.0);
        assert!((a.dot(&b) - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_cross_sign_is_ccw_positive() {
        assert!(Vec2::X.cross(&Vec2::Y) > 0.0);
        assert!(Vec2::Y.cross(&Vec2::X) < 0.0);
    }

    #[test]
    fn test_azimuth_quadrants() {
        assert!((Vec2::X.azimuth() - 0.0).abs() < 1e-12);
        assert!((Vec2::Y.azimuth() - FRAC_PI_2).abs() < 1e-12);
        assert!((Vec2::new(-1.0, 0.0).azimuth() - PI).abs() < 1e-12);
        assert!((Vec2::new(0.0, -1.0).azimuth() - 1.5 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(-0.5) - (2.0 * PI - 0.5)).abs() < 1e-12);
        assert!((normalize_angle(2.0 * PI + 0.3) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_normalized() {
        let v = Vec2::new(3.0, 4.0);
        let n = v.normalized().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }
}
