//! Containment, distance and self-intersection queries.

use crate::chain::LineChain;
use crate::params::QueryParams;
use crate::poly_set::{PolySet, Polygon};
use polykit_core::{GeometryResult, Point, Seg};

/// Twice the signed area of a closed ring, positive when counter-clockwise.
pub(crate) fn ring_area2(points: &[Point]) -> i128 {
    let n = points.len();
    if n < 3 {
        return 0;
    }
    let mut sum: i128 = 0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128;
    }
    sum
}

/// Exact even-odd ray crossing test against a closed ring.
///
/// Points exactly on an edge may land on either side.
pub(crate) fn point_in_ring(points: &[Point], p: Point) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if (a.y > p.y) == (b.y > p.y) {
            continue;
        }
        let dy = b.y as i128 - a.y as i128;
        let lhs = (p.x as i128 - a.x as i128) * dy;
        let rhs = (p.y as i128 - a.y as i128) * (b.x as i128 - a.x as i128);
        let left_of_crossing = if dy > 0 { lhs < rhs } else { lhs > rhs };
        if left_of_crossing {
            inside = !inside;
        }
    }
    inside
}

struct SweepEdge {
    seg: Seg,
    contour: usize,
    index: usize,
    len: usize,
    min_x: i32,
    min_y: i32,
    max_x: i32,
}

impl SweepEdge {
    fn adjacent(&self, other: &SweepEdge) -> bool {
        if self.contour != other.contour {
            return false;
        }
        let (lo, hi) = if self.index < other.index {
            (self.index, other.index)
        } else {
            (other.index, self.index)
        };
        hi - lo == 1 || (lo == 0 && hi == self.len - 1)
    }
}

/// Sweep over the edges of `chains` looking for two non-adjacent edges that
/// touch or cross.
pub(crate) fn chains_self_intersect(chains: &[&LineChain]) -> bool {
    let mut edges: Vec<SweepEdge> = Vec::new();
    for (contour, chain) in chains.iter().enumerate() {
        let len = chain.segment_count();
        for (index, seg) in chain.segments().enumerate() {
            edges.push(SweepEdge {
                seg,
                contour,
                index,
                len,
                min_x: seg.a.x.min(seg.b.x),
                min_y: seg.a.y.min(seg.b.y),
                max_x: seg.a.x.max(seg.b.x),
            });
        }
    }
    edges.sort_by_key(|e| (e.min_x, e.min_y));

    for (i, e) in edges.iter().enumerate() {
        let e_box = e.seg.bbox();
        for other in &edges[i + 1..] {
            if other.min_x > e.max_x {
                break;
            }
            if e.adjacent(other) || !e_box.intersects(&other.seg.bbox()) {
                continue;
            }
            if e.seg.intersects(&other.seg) {
                return true;
            }
        }
    }
    false
}

fn polygon_contains_point(poly: &Polygon, p: Point, accuracy: i32, use_bbox: bool) -> bool {
    let Some(outline) = poly.first() else {
        return false;
    };
    if !outline.point_inside(p, accuracy, use_bbox) {
        return false;
    }
    // A point on a hole's edge is still within accuracy of the solid part.
    !poly[1..]
        .iter()
        .any(|hole| hole.point_inside(p, 0, use_bbox) && !hole.point_on_edge(p, accuracy))
}

fn polygon_nearest(poly: &Polygon, p: Point) -> (i64, Point) {
    poly.iter()
        .map(|c| c.nearest(p))
        .min_by_key(|(d, _)| *d)
        .unwrap_or((i64::MAX, p))
}

impl PolySet {
    /// `p` lies inside some outline and outside its holes.
    ///
    /// With `accuracy` above one, points that close to an edge count as
    /// inside. `use_bbox` lets built contour caches reject far points.
    pub fn contains(&self, p: Point, accuracy: i32, use_bbox: bool) -> bool {
        self.polygons()
            .iter()
            .any(|poly| polygon_contains_point(poly, p, accuracy, use_bbox))
    }

    pub fn contains_with(&self, p: Point, params: &QueryParams) -> bool {
        self.contains(p, params.accuracy, params.use_bbox_caches)
    }

    /// Containment against one polygon.
    pub fn polygon_contains(
        &self,
        index: usize,
        p: Point,
        accuracy: i32,
        use_bbox: bool,
    ) -> GeometryResult<bool> {
        Ok(polygon_contains_point(self.polygon(index)?, p, accuracy, use_bbox))
    }

    /// Squared distance from `p` to the set with the nearest boundary point.
    /// Zero (and `p` itself) when `p` is inside.
    pub fn squared_distance_to_point(&self, p: Point) -> (i64, Point) {
        let mut best = (i64::MAX, p);
        for poly in self.polygons() {
            if polygon_contains_point(poly, p, 0, false) {
                return (0, p);
            }
            let candidate = polygon_nearest(poly, p);
            if candidate.0 < best.0 {
                best = candidate;
            }
        }
        best
    }

    /// Squared distance from `seg` to the set with the nearest boundary point.
    /// Zero when an end of `seg` is inside or it crosses an edge.
    pub fn squared_distance_to_seg(&self, seg: &Seg) -> (i64, Point) {
        let mut best = (i64::MAX, seg.a);
        for poly in self.polygons() {
            if polygon_contains_point(poly, seg.a, 0, false) {
                return (0, seg.a);
            }
            if polygon_contains_point(poly, seg.b, 0, false) {
                return (0, seg.b);
            }
            for chain in poly {
                let candidate = chain.squared_distance_to_seg(seg);
                if candidate.0 < best.0 {
                    best = candidate;
                }
            }
        }
        best
    }

    /// Distance from `p` to the set, zero when inside.
    pub fn distance_to_point(&self, p: Point) -> f64 {
        match self.squared_distance_to_point(p).0 {
            i64::MAX => f64::INFINITY,
            d => (d as f64).sqrt(),
        }
    }

    /// Some pair of non-adjacent edges of polygon `index` (outline and holes
    /// together) touches or crosses.
    pub fn is_self_intersecting(&self, index: usize) -> GeometryResult<bool> {
        let poly = self.polygon(index)?;
        let chains: Vec<&LineChain> = poly.iter().collect();
        Ok(chains_self_intersect(&chains))
    }

    /// Any polygon of the set intersects itself.
    pub fn is_any_self_intersecting(&self) -> bool {
        self.polygons().iter().any(|poly| {
            let chains: Vec<&LineChain> = poly.iter().collect();
            chains_self_intersect(&chains)
        })
    }
}
