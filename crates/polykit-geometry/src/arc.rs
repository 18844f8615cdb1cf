//! Circular arcs carried alongside contour vertices.
//!
//! An arc keeps its exact definition (centre, radius, angles) so it can be
//! rebuilt after a boolean operation cuts it, while the owning contour stores
//! its polyline approximation.

use polykit_core::constants::MIN_SEGCOUNT_FOR_CIRCLE;
use polykit_core::{BBox, GeometryError, GeometryResult, Point, PointF};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Number of segments needed to keep the chord error of an arc of `radius`
/// and `sweep` (radians) under `max_error`.
///
/// A full circle never gets fewer than [`MIN_SEGCOUNT_FOR_CIRCLE`] segments
/// and any arc gets at least two.
pub fn arc_segment_count(radius: f64, max_error: i32, sweep: f64) -> usize {
    let cap = TAU / MIN_SEGCOUNT_FOR_CIRCLE as f64;
    let radius = radius.abs();
    let err = max_error.max(1) as f64;

    let increment = if radius <= err {
        cap
    } else {
        let inc = 2.0 * (1.0 - err / radius).acos();
        if inc.is_finite() && inc > 0.0 {
            inc.min(cap)
        } else {
            cap
        }
    };

    let count = (sweep.abs() / increment).ceil();
    if count.is_finite() {
        (count as usize).max(2)
    } else {
        2
    }
}

/// Normalise an angle difference into `(0, 2π]` for counter-clockwise arcs or
/// `[-2π, 0)` for clockwise ones.
fn directed_sweep(from: f64, to: f64, ccw: bool) -> f64 {
    let mut d = (to - from) % TAU;
    if ccw {
        if d <= 0.0 {
            d += TAU;
        }
    } else if d >= 0.0 {
        d -= TAU;
    }
    d
}

/// A circular arc on the integer grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeArc {
    start: Point,
    mid: Point,
    end: Point,
    center: PointF,
    radius: f64,
    start_angle: f64,
    sweep: f64,
}

impl ShapeArc {
    /// Arc around `center` starting at `start_angle` and sweeping `sweep`
    /// radians (positive is counter-clockwise).
    pub fn from_center(center: Point, radius: i32, start_angle: f64, sweep: f64) -> Self {
        let c = center.to_f();
        let r = radius.abs() as f64;
        let sweep = sweep.clamp(-TAU, TAU);
        let at = |a: f64| PointF::new(c.x + r * a.cos(), c.y + r * a.sin()).round();
        Self {
            start: at(start_angle),
            mid: at(start_angle + sweep / 2.0),
            end: at(start_angle + sweep),
            center: c,
            radius: r,
            start_angle,
            sweep,
        }
    }

    /// Full circle, counter-clockwise from angle zero.
    pub fn circle(center: Point, radius: i32) -> Self {
        Self::from_center(center, radius, 0.0, TAU)
    }

    /// Arc through three points, travelling from `start` via `mid` to `end`.
    pub fn from_three_points(start: Point, mid: Point, end: Point) -> GeometryResult<Self> {
        let a = start.to_f();
        let b = mid.to_f();
        let c = end.to_f();

        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d == 0.0 || !d.is_finite() {
            return Err(GeometryError::invalid(
                "arc",
                "start, mid and end points are collinear",
            ));
        }

        let a2 = a.dot(a);
        let b2 = b.dot(b);
        let c2 = c.dot(c);
        let center = PointF::new(
            (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
            (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
        );

        let ccw = (mid - start).cross(end - mid) > 0;
        Ok(Self::rebuild(start, mid, end, center, a.sub(center).norm(), ccw))
    }

    /// Recompute angles from exact endpoints around a known centre.
    fn rebuild(start: Point, mid: Point, end: Point, center: PointF, radius: f64, ccw: bool) -> Self {
        let angle_of = |p: Point| {
            let v = p.to_f().sub(center);
            v.y.atan2(v.x)
        };
        let start_angle = angle_of(start);
        let sweep = if start == end {
            if ccw {
                TAU
            } else {
                -TAU
            }
        } else {
            directed_sweep(start_angle, angle_of(end), ccw)
        };
        Self {
            start,
            mid,
            end,
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn mid(&self) -> Point {
        self.mid
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn center(&self) -> PointF {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    /// Signed sweep in radians.
    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    pub fn is_ccw(&self) -> bool {
        self.sweep > 0.0
    }

    pub fn is_circle(&self) -> bool {
        (self.sweep.abs() - TAU).abs() < 1e-9
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Point on the supporting circle at `angle`.
    pub fn point_at(&self, angle: f64) -> Point {
        PointF::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
        .round()
    }

    /// Whether the angle of `p` around the centre falls within the sweep.
    pub fn contains_angle_of(&self, p: Point) -> bool {
        if self.is_circle() {
            return true;
        }
        let v = p.to_f().sub(self.center);
        let a = v.y.atan2(v.x);
        let along = directed_sweep(self.start_angle, a, self.is_ccw());
        along.abs() <= self.sweep.abs() + 1e-12
    }

    /// Polyline approximation from `start` to `end` inclusive.
    pub fn approximate(&self, max_error: i32) -> Vec<Point> {
        let n = arc_segment_count(self.radius, max_error, self.sweep);
        let mut pts = Vec::with_capacity(n + 1);
        pts.push(self.start);
        for i in 1..n {
            let a = self.start_angle + self.sweep * i as f64 / n as f64;
            let p = self.point_at(a);
            if pts.last() != Some(&p) {
                pts.push(p);
            }
        }
        if pts.last() != Some(&self.end) || pts.len() == 1 {
            pts.push(self.end);
        }
        pts
    }

    /// Portion of this arc between two points lying on it, keeping the
    /// direction of travel.
    pub fn sub_arc(&self, from: Point, to: Point) -> ShapeArc {
        let ccw = self.is_ccw();
        let c = self.center;
        let angle_of = |p: Point| {
            let v = p.to_f().sub(c);
            v.y.atan2(v.x)
        };
        let a0 = angle_of(from);
        let sweep = if from == to {
            0.0
        } else {
            directed_sweep(a0, angle_of(to), ccw)
        };
        let mid = self.point_at(a0 + sweep / 2.0);
        ShapeArc {
            start: from,
            mid,
            end: to,
            center: c,
            radius: self.radius,
            start_angle: a0,
            sweep,
        }
    }

    pub fn reversed(&self) -> ShapeArc {
        ShapeArc {
            start: self.end,
            mid: self.mid,
            end: self.start,
            center: self.center,
            radius: self.radius,
            start_angle: self.start_angle + self.sweep,
            sweep: -self.sweep,
        }
    }

    /// Exact bounding box, including the axis extremes the arc passes.
    pub fn bbox(&self) -> BBox {
        let mut bbox = BBox::new(self.start, self.end);
        for k in 0..4 {
            let a = k as f64 * PI / 2.0;
            let probe = self.point_at(a);
            if self.contains_angle_of(probe) {
                bbox.merge_point(probe);
            }
        }
        bbox
    }

    /// Apply a grid transform to the defining points and the centre.
    /// `mirrors` flips the direction of travel.
    pub(crate) fn transformed(
        &self,
        f: impl Fn(Point) -> Point,
        g: impl Fn(PointF) -> PointF,
        radius_scale: f64,
        mirrors: bool,
    ) -> ShapeArc {
        let ccw = self.is_ccw() != mirrors;
        Self::rebuild(
            f(self.start),
            f(self.mid),
            f(self.end),
            g(self.center),
            self.radius * radius_scale,
            ccw,
        )
    }
}
