use serde::{Deserialize, Serialize};

use super::Point;

/// Axis-aligned bounding box with inclusive integer bounds.
///
/// The default box is empty: `min` above `max`, so merging any point into it
/// yields that point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl Default for BBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BBox {
    pub const fn empty() -> Self {
        Self {
            min: Point::new(i32::MAX, i32::MAX),
            max: Point::new(i32::MIN, i32::MIN),
        }
    }

    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.merge_point(*p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn merge_point(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn merge(&mut self, other: &BBox) {
        if other.is_empty() {
            return;
        }
        self.merge_point(other.min);
        self.merge_point(other.max);
    }

    /// Grow by `amount` on every side; negative shrinks.
    pub fn inflate(&self, amount: i32) -> BBox {
        if self.is_empty() {
            return *self;
        }
        BBox {
            min: Point::new(
                self.min.x.saturating_sub(amount),
                self.min.y.saturating_sub(amount),
            ),
            max: Point::new(
                self.max.x.saturating_add(amount),
                self.max.y.saturating_add(amount),
            ),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        !(self.is_empty()
            || other.is_empty()
            || other.min.x > self.max.x
            || other.max.x < self.min.x
            || other.min.y > self.max.y
            || other.max.y < self.min.y)
    }

    pub fn width(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.max.x as i64 - self.min.x as i64
        }
    }

    pub fn height(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.max.y as i64 - self.min.y as i64
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            ((self.min.x as i64 + self.max.x as i64) / 2) as i32,
            ((self.min.y as i64 + self.max.y as i64) / 2) as i32,
        )
    }

    pub fn diagonal(&self) -> f64 {
        let w = self.width() as f64;
        let h = self.height() as f64;
        (w * w + h * h).sqrt()
    }

    /// Squared distance from `p` to the box, zero when inside.
    pub fn squared_distance(&self, p: Point) -> i64 {
        if self.is_empty() {
            return i64::MAX;
        }
        let dx = (self.min.x as i64 - p.x as i64).max(p.x as i64 - self.max.x as i64).max(0);
        let dy = (self.min.y as i64 - p.y as i64).max(p.y as i64 - self.max.y as i64).max(0);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// The four corners, counter-clockwise from `min`.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}
