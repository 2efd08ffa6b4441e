//! Plane geometry primitives.
//!
//! - `Point`: integer game coordinates, as they arrive in telemetry.
//! - `Vec2`: real-valued displacement used for angles and prediction.

use core::ops::{Add, Mul, Sub};
use serde::{Deserialize, Serialize};

/// A position on the race map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `|dx| + |dy|`; the metric used for leg lengths and the speed estimate.
    /// Saturates at `i32::MAX` for points near opposite ends of the range.
    pub fn manhattan(self, other: Point) -> i32 {
        let total = u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y));
        i32::try_from(total).unwrap_or(i32::MAX)
    }

    pub fn distance(self, other: Point) -> f64 {
        self.vector_to(other).length()
    }

    pub fn vector_to(self, other: Point) -> Vec2 {
        Vec2::new(
            f64::from(other.x) - f64::from(self.x),
            f64::from(other.y) - f64::from(self.y),
        )
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new(halfway(self.x, other.x), halfway(self.y, other.y))
    }

    pub fn offset(self, dx: i32, dy: i32) -> Point {
        Point::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(f64::from(self.x), f64::from(self.y))
    }
}

/// `from + (to - from) / 2`, truncating toward `from`; always fits in `i32`.
fn halfway(from: i32, to: i32) -> i32 {
    let (from, to) = (i64::from(from), i64::from(to));
    let mid = from + (to - from) / 2;
    i32::try_from(mid).unwrap_or(if mid < 0 { i32::MIN } else { i32::MAX })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unsigned angle to `other` in degrees, `0..=180`.
    ///
    /// Returns `None` when either vector has zero length, since the angle is
    /// undefined there.
    pub fn angle_to(self, other: Vec2) -> Option<f64> {
        let norms = self.length() * other.length();
        if norms == 0.0 || !norms.is_finite() {
            return None;
        }
        // Rounding can push the quotient just past +-1, where acos is NaN.
        let cos = (self.dot(other) / norms).clamp(-1.0, 1.0);
        Some(cos.acos().to_degrees())
    }
}

/// Angle between two vectors with the degenerate case mapped to 0 degrees.
pub fn angle_between(a: Vec2, b: Vec2) -> f64 {
    a.angle_to(b).unwrap_or(0.0)
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}
