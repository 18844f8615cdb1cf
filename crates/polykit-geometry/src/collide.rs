//! Collision tests between a polygon set and other shapes.
//!
//! Points, segments and circles are measured against the contours directly.
//! Other shapes fall back to the triangulated view, where every shape kind
//! knows how to measure itself against a single triangle.

use crate::chain::LineChain;
use crate::index::VertexIndex;
use crate::poly_set::PolySet;
use crate::queries::point_in_ring;
use crate::triangulation::Triangle;
use polykit_core::math::isqrt;
use polykit_core::{BBox, GeometryResult, Point, Seg};

/// A shape that can be tested against a polygon set.
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    Point(Point),
    /// A segment swept by a round pen of `width`.
    Segment { seg: Seg, width: i32 },
    Circle { center: Point, radius: i32 },
    Rect(BBox),
    /// A closed chain is solid; an open one is just its edges.
    Chain(LineChain),
}

/// Result of a collision test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    /// Distance between the shapes, zero when they overlap.
    pub actual: i64,
    /// Nearest point on the tested set.
    pub location: Point,
}

fn square(v: i64) -> i64 {
    v.saturating_mul(v)
}

fn distance(d2: i64) -> i64 {
    isqrt(d2 as i128)
}

fn nearest_on_triangle(tri: &Triangle, p: Point) -> (i64, Point) {
    if tri.contains(p) {
        return (0, p);
    }
    tri.edges()
        .iter()
        .map(|e| (e.square_distance_to_point(p), e.nearest_point(p)))
        .min_by_key(|(d, _)| *d)
        .unwrap_or((i64::MAX, p))
}

/// Squared distance between a triangle and a set of edges, with the nearest
/// point on the triangle. `solid` edges enclose an area that also counts.
fn triangle_to_edges(tri: &Triangle, edges: &[Seg], solid: Option<&[Point]>) -> (i64, Point) {
    for e in edges {
        if tri.contains(e.a) {
            return (0, e.a);
        }
    }
    if let Some(ring) = solid {
        for v in [tri.a, tri.b, tri.c] {
            if point_in_ring(ring, v) {
                return (0, v);
            }
        }
    }
    let mut best = (i64::MAX, tri.a);
    for e in edges {
        for te in tri.edges() {
            let d = te.square_distance_to_seg(e);
            if d < best.0 {
                best = (d, te.nearest_points(e).0);
            }
        }
    }
    best
}

impl CollisionShape {
    pub fn bbox(&self) -> BBox {
        match self {
            Self::Point(p) => BBox::new(*p, *p),
            Self::Segment { seg, width } => seg.bbox().inflate(width / 2),
            Self::Circle { center, radius } => BBox::new(*center, *center).inflate(*radius),
            Self::Rect(b) => *b,
            Self::Chain(c) => c.bbox(),
        }
    }

    /// How far the shape reaches beyond its core geometry.
    fn reach(&self) -> i64 {
        match self {
            Self::Segment { width, .. } => (*width as i64 / 2).max(0),
            Self::Circle { radius, .. } => (*radius as i64).max(0),
            _ => 0,
        }
    }

    /// Squared distance from the core geometry to `tri`, and the nearest
    /// point on the triangle.
    fn core_distance(&self, tri: &Triangle) -> (i64, Point) {
        match self {
            Self::Point(p) => nearest_on_triangle(tri, *p),
            Self::Segment { seg, .. } => triangle_to_edges(tri, &[*seg], None),
            Self::Circle { center, .. } => nearest_on_triangle(tri, *center),
            Self::Rect(b) => {
                let c = b.corners();
                let edges = [
                    Seg::new(c[0], c[1]),
                    Seg::new(c[1], c[2]),
                    Seg::new(c[2], c[3]),
                    Seg::new(c[3], c[0]),
                ];
                triangle_to_edges(tri, &edges, Some(&c[..]))
            }
            Self::Chain(chain) => {
                let edges: Vec<Seg> = chain.segments().collect();
                if edges.is_empty() {
                    return match chain.points().first() {
                        Some(p) => nearest_on_triangle(tri, *p),
                        None => (i64::MAX, tri.a),
                    };
                }
                let solid = chain.is_closed().then(|| chain.points());
                triangle_to_edges(tri, &edges, solid)
            }
        }
    }

    /// Test against one triangle with the given clearance.
    pub fn collide_triangle(&self, tri: &Triangle, clearance: i32) -> Option<Collision> {
        let (d2, location) = self.core_distance(tri);
        to_collision(d2, location, self.reach(), clearance)
    }
}

fn to_collision(d2: i64, location: Point, reach: i64, clearance: i32) -> Option<Collision> {
    if d2 == i64::MAX {
        return None;
    }
    let limit = reach + clearance.max(0) as i64;
    if d2 > square(limit) {
        return None;
    }
    Some(Collision {
        actual: (distance(d2) - reach).max(0),
        location,
    })
}

impl PolySet {
    /// Whether `shape` comes within `clearance` of the set.
    pub fn collide(
        &self,
        shape: &CollisionShape,
        clearance: i32,
    ) -> GeometryResult<Option<Collision>> {
        let reach = shape.reach();
        match shape {
            CollisionShape::Point(p) | CollisionShape::Circle { center: p, .. } => {
                let (d2, location) = self.squared_distance_to_point(*p);
                Ok(to_collision(d2, location, reach, clearance))
            }
            CollisionShape::Segment { seg, .. } => {
                let (d2, location) = self.squared_distance_to_seg(seg);
                Ok(to_collision(d2, location, reach, clearance))
            }
            CollisionShape::Rect(_) | CollisionShape::Chain(_) => {
                let area = shape.bbox().inflate(clearance.max(0));
                let mut best: Option<Collision> = None;
                for poly in self.triangulate()?.iter() {
                    for tri in poly.triangles() {
                        if !tri.bbox().intersects(&area) {
                            continue;
                        }
                        if let Some(hit) = shape.collide_triangle(&tri, clearance) {
                            if hit.actual == 0 {
                                return Ok(Some(hit));
                            }
                            if best.is_none_or(|b| hit.actual < b.actual) {
                                best = Some(hit);
                            }
                        }
                    }
                }
                Ok(best)
            }
        }
    }

    /// Nearest vertex within `clearance` of `p`, with its distance.
    pub fn collide_vertex(&self, p: Point, clearance: i32) -> Option<(VertexIndex, i64)> {
        let limit = square(clearance.max(0) as i64);
        self.vertices()
            .map(|(idx, v)| (idx, v.squared_distance(p)))
            .filter(|(_, d2)| *d2 <= limit)
            .min_by_key(|(_, d2)| *d2)
            .map(|(idx, d2)| (idx, distance(d2)))
    }

    /// Nearest edge within `clearance` of `p`, keyed by its first vertex,
    /// with its distance.
    pub fn collide_edge(&self, p: Point, clearance: i32) -> Option<(VertexIndex, i64)> {
        let limit = square(clearance.max(0) as i64);
        self.segments()
            .map(|(idx, seg)| (idx, seg.square_distance_to_point(p)))
            .filter(|(_, d2)| *d2 <= limit)
            .min_by_key(|(_, d2)| *d2)
            .map(|(idx, d2)| (idx, distance(d2)))
    }
}
