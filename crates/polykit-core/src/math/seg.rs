use serde::{Deserialize, Serialize};

use super::{rescale, BBox, Point};

/// A directed segment between two grid points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seg {
    pub a: Point,
    pub b: Point,
}

// Difference vectors are kept in i64 so coordinates spanning the full i32
// range cannot wrap; products go to i128.
#[derive(Clone, Copy)]
struct Vec64 {
    x: i64,
    y: i64,
}

impl Vec64 {
    fn between(from: Point, to: Point) -> Self {
        Self {
            x: to.x as i64 - from.x as i64,
            y: to.y as i64 - from.y as i64,
        }
    }

    fn cross(self, o: Vec64) -> i128 {
        self.x as i128 * o.y as i128 - self.y as i128 * o.x as i128
    }

    fn dot(self, o: Vec64) -> i128 {
        self.x as i128 * o.x as i128 + self.y as i128 * o.y as i128
    }
}

fn clamp_i64(v: i128) -> i64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

fn clamp_i32(v: i128) -> i32 {
    v.clamp(i32::MIN as i128, i32::MAX as i128) as i32
}

impl Seg {
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    fn dir(&self) -> Vec64 {
        Vec64::between(self.a, self.b)
    }

    pub fn square_length(&self) -> i64 {
        self.a.squared_distance(self.b)
    }

    pub fn length(&self) -> f64 {
        (self.square_length() as f64).sqrt()
    }

    pub fn reversed(&self) -> Seg {
        Seg::new(self.b, self.a)
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(self.a, self.b)
    }

    pub fn center(&self) -> Point {
        Point::new(
            ((self.a.x as i64 + self.b.x as i64) / 2) as i32,
            ((self.a.y as i64 + self.b.y as i64) / 2) as i32,
        )
    }

    /// Which side of the line through the segment `p` lies on: 1 left,
    /// -1 right, 0 on the line.
    pub fn side(&self, p: Point) -> i32 {
        let c = self.dir().cross(Vec64::between(self.a, p));
        c.signum() as i32
    }

    /// Point of the segment nearest to `p`.
    pub fn nearest_point(&self, p: Point) -> Point {
        let d = self.dir();
        let l = d.dot(d);
        if l == 0 {
            return self.a;
        }
        let t = Vec64::between(self.a, p).dot(d);
        if t <= 0 {
            return self.a;
        }
        if t >= l {
            return self.b;
        }
        Point::new(
            clamp_i32(self.a.x as i128 + rescale(d.x as i128, t, l)),
            clamp_i32(self.a.y as i128 + rescale(d.y as i128, t, l)),
        )
    }

    /// Squared distance from `p` to the segment.
    pub fn square_distance_to_point(&self, p: Point) -> i64 {
        let d = self.dir();
        let l = d.dot(d);
        let ap = Vec64::between(self.a, p);
        if l == 0 {
            return clamp_i64(ap.dot(ap));
        }
        let t = ap.dot(d);
        if t <= 0 {
            return clamp_i64(ap.dot(ap));
        }
        if t >= l {
            let bp = Vec64::between(self.b, p);
            return clamp_i64(bp.dot(bp));
        }
        // Perpendicular distance squared: cross^2 / |d|^2, rounded to nearest.
        let c = d.cross(ap);
        let num = c.checked_mul(c);
        match num {
            Some(n) => clamp_i64((n + l / 2) / l),
            None => {
                let dist = c.abs() as f64 / (l as f64).sqrt();
                (dist * dist).round().min(i64::MAX as f64) as i64
            }
        }
    }

    pub fn distance_to_point(&self, p: Point) -> f64 {
        (self.square_distance_to_point(p) as f64).sqrt()
    }

    /// Squared distance between two segments; zero when they touch.
    pub fn square_distance_to_seg(&self, other: &Seg) -> i64 {
        if self.intersects(other) {
            return 0;
        }
        self.square_distance_to_point(other.a)
            .min(self.square_distance_to_point(other.b))
            .min(other.square_distance_to_point(self.a))
            .min(other.square_distance_to_point(self.b))
    }

    /// Nearest pair of points `(on self, on other)`.
    pub fn nearest_points(&self, other: &Seg) -> (Point, Point) {
        if let Some(ip) = self.intersect(other, false, false) {
            return (ip, ip);
        }
        let candidates = [
            (self.nearest_point(other.a), other.a),
            (self.nearest_point(other.b), other.b),
            (self.a, other.nearest_point(self.a)),
            (self.b, other.nearest_point(self.b)),
        ];
        let mut best = candidates[0];
        let mut best_d = best.0.squared_distance(best.1);
        for c in &candidates[1..] {
            let d = c.0.squared_distance(c.1);
            if d < best_d {
                best_d = d;
                best = *c;
            }
        }
        best
    }

    /// Intersection point of two segments.
    ///
    /// With `lines` set the segments are extended to infinite lines. With
    /// `ignore_endpoints` set an intersection where both segments only touch
    /// at an endpoint is not reported. Parallel segments never intersect here;
    /// use [`Seg::intersects`] or [`Seg::overlaps`] for collinear cases.
    pub fn intersect(&self, other: &Seg, ignore_endpoints: bool, lines: bool) -> Option<Point> {
        let e = self.dir();
        let f = other.dir();
        let ac = Vec64::between(self.a, other.a);

        let d = f.cross(e);
        let p = f.cross(ac);
        let q = e.cross(ac);

        if d == 0 {
            return None;
        }
        if !lines {
            if d > 0 && (q < 0 || q > d || p < 0 || p > d) {
                return None;
            }
            if d < 0 && (q < d || p < d || p > 0 || q > 0) {
                return None;
            }
            if ignore_endpoints && (q == 0 || q == d) && (p == 0 || p == d) {
                return None;
            }
        }

        Some(Point::new(
            clamp_i32(self.a.x as i128 + rescale(e.x as i128, p, d)),
            clamp_i32(self.a.y as i128 + rescale(e.y as i128, p, d)),
        ))
    }

    /// Whether the segments share at least one point, collinear overlaps and
    /// touching endpoints included.
    pub fn intersects(&self, other: &Seg) -> bool {
        let d1 = orientation(other.a, other.b, self.a);
        let d2 = orientation(other.a, other.b, self.b);
        let d3 = orientation(self.a, self.b, other.a);
        let d4 = orientation(self.a, self.b, other.b);

        if d1 * d2 < 0 && d3 * d4 < 0 {
            return true;
        }

        (d1 == 0 && on_segment(other, self.a))
            || (d2 == 0 && on_segment(other, self.b))
            || (d3 == 0 && on_segment(self, other.a))
            || (d4 == 0 && on_segment(self, other.b))
    }

    /// Both segments lie on the same line.
    pub fn collinear(&self, other: &Seg) -> bool {
        self.side(other.a) == 0 && self.side(other.b) == 0
    }

    /// Both endpoints of `other` lie within one unit of the line through
    /// this segment.
    pub fn approx_collinear(&self, other: &Seg) -> bool {
        let d = self.dir();
        let l = d.dot(d);
        if l == 0 {
            return false;
        }
        let within = |p: Point| {
            let c = d.cross(Vec64::between(self.a, p));
            c.checked_mul(c).map(|c2| c2 <= l).unwrap_or(false)
        };
        within(other.a) && within(other.b)
    }

    /// `p` lies on the segment within one unit.
    pub fn contains_point(&self, p: Point) -> bool {
        self.square_distance_to_point(p) <= 1
    }

    /// Collinear segments whose common part has positive length.
    pub fn overlaps(&self, other: &Seg) -> bool {
        if !self.collinear(other) {
            return false;
        }
        let d = self.dir();
        let l = d.dot(d);
        if l == 0 {
            return false;
        }
        let ta = Vec64::between(self.a, other.a).dot(d);
        let tb = Vec64::between(self.a, other.b).dot(d);
        let (lo, hi) = if ta < tb { (ta, tb) } else { (tb, ta) };
        lo.max(0) < hi.min(l)
    }

    /// Angle of the segment direction in radians.
    pub fn angle(&self) -> f64 {
        (self.b - self.a).angle()
    }
}

fn orientation(a: Point, b: Point, c: Point) -> i32 {
    Vec64::between(a, b).cross(Vec64::between(a, c)).signum() as i32
}

fn on_segment(s: &Seg, p: Point) -> bool {
    p.x >= s.a.x.min(s.b.x)
        && p.x <= s.a.x.max(s.b.x)
        && p.y >= s.a.y.min(s.b.y)
        && p.y <= s.a.y.max(s.b.y)
}
