use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::units::round_to_iu;

/// A point (or vector) on the integer grid.
///
/// Ordering compares `x` first, then `y`. Fracture relies on this to pick the
/// leftmost vertex of a hole.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Z component of the cross product, widened.
    pub fn cross(self, other: Point) -> i64 {
        self.x as i64 * other.y as i64 - self.y as i64 * other.x as i64
    }

    pub fn dot(self, other: Point) -> i64 {
        self.x as i64 * other.x as i64 + self.y as i64 * other.y as i64
    }

    pub fn squared_norm(self) -> i64 {
        self.dot(self)
    }

    pub fn euclidean_norm(self) -> f64 {
        (self.squared_norm() as f64).sqrt()
    }

    /// Squared distance to another point.
    pub fn squared_distance(self, other: Point) -> i64 {
        let dx = other.x as i64 - self.x as i64;
        let dy = other.y as i64 - self.y as i64;
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.squared_distance(other) as f64).sqrt()
    }

    /// Vector with the same direction and the given length.
    pub fn resize(self, length: i64) -> Point {
        let norm = self.euclidean_norm();
        if norm == 0.0 {
            return Point::default();
        }
        let k = length as f64 / norm;
        Point::new(
            round_to_iu(self.x as f64 * k),
            round_to_iu(self.y as f64 * k),
        )
    }

    /// Rotate about the origin by `angle` radians, counter-clockwise.
    pub fn rotate(self, angle: f64) -> Point {
        let (s, c) = angle.sin_cos();
        let x = self.x as f64;
        let y = self.y as f64;
        Point::new(round_to_iu(x * c - y * s), round_to_iu(x * s + y * c))
    }

    /// Counter-clockwise perpendicular.
    pub fn perpendicular(self) -> Point {
        Point::new(self.y.saturating_neg(), self.x)
    }

    /// Angle of the vector in radians.
    pub fn angle(self) -> f64 {
        (self.y as f64).atan2(self.x as f64)
    }

    pub fn to_f(self) -> PointF {
        PointF::new(self.x as f64, self.y as f64)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.wrapping_add(rhs.x), self.y.wrapping_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.wrapping_sub(rhs.x), self.y.wrapping_sub(rhs.y))
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        *self = *self + rhs;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        *self = *self - rhs;
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(self.x.wrapping_neg(), self.y.wrapping_neg())
    }
}

impl Mul<i32> for Point {
    type Output = Point;

    fn mul(self, rhs: i32) -> Point {
        Point::new(self.x.wrapping_mul(rhs), self.y.wrapping_mul(rhs))
    }
}

/// Floating point companion used by the offset and arc code before rounding
/// back onto the grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: PointF) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: PointF) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector, or zero for a zero vector.
    pub fn normalized(self) -> PointF {
        let n = self.norm();
        if n == 0.0 {
            PointF::default()
        } else {
            PointF::new(self.x / n, self.y / n)
        }
    }

    pub fn scale(self, k: f64) -> PointF {
        PointF::new(self.x * k, self.y * k)
    }

    pub fn add(self, other: PointF) -> PointF {
        PointF::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: PointF) -> PointF {
        PointF::new(self.x - other.x, self.y - other.y)
    }

    /// Round onto the integer grid.
    pub fn round(self) -> Point {
        Point::new(round_to_iu(self.x), round_to_iu(self.y))
    }
}

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        p.to_f()
    }
}
