//! Growing and shrinking polygon sets.
//!
//! The offset boundary band is built explicitly: one rectangle of half-width
//! `r` per edge plus a join patch at every corner on the outer side of the
//! turn, shaped by the corner strategy. Growing unions the band into the set,
//! shrinking subtracts it.

use crate::arc::arc_segment_count;
use crate::chain::LineChain;
use crate::params::OffsetParams;
use crate::poly_set::{PolySet, Polygon};
use crate::queries::ring_area2;
use polykit_core::constants::CORNER_TABLE_FAST_LIMIT;
use polykit_core::{CornerStrategy, GeometryError, GeometryResult, Point, PointF};
use smallvec::{smallvec, SmallVec};
use std::collections::HashMap;
use std::f64::consts::{PI, TAU};
use tracing::{debug, warn};

/// Cached `(cos, sin)` of `k·2π/n` for `k` in `0..n`, keyed by `n`.
///
/// Small segment counts live in a directly indexed table; larger ones in a
/// map.
#[derive(Debug, Default)]
pub struct CornerTable {
    fast: Vec<Vec<(f64, f64)>>,
    slow: HashMap<usize, Vec<(f64, f64)>>,
}

fn build_rotations(n: usize) -> Vec<(f64, f64)> {
    let step = TAU / n as f64;
    (0..n)
        .map(|k| {
            let (s, c) = (k as f64 * step).sin_cos();
            (c, s)
        })
        .collect()
}

impl CornerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotations(&mut self, segments: usize) -> &[(f64, f64)] {
        let n = segments.max(1);
        if n <= CORNER_TABLE_FAST_LIMIT {
            if self.fast.len() <= n {
                self.fast.resize_with(n + 1, Vec::new);
            }
            if self.fast[n].is_empty() {
                self.fast[n] = build_rotations(n);
            }
            &self.fast[n]
        } else {
            self.slow.entry(n).or_insert_with(|| build_rotations(n))
        }
    }

    /// Number of segment counts computed so far.
    pub fn cached_counts(&self) -> usize {
        self.fast.iter().filter(|t| !t.is_empty()).count() + self.slow.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinKind {
    Mitre,
    Chamfer,
    Round,
}

fn join_kind(strategy: CornerStrategy, acute: bool) -> JoinKind {
    if strategy.acute_only() && !acute {
        return JoinKind::Mitre;
    }
    match strategy {
        CornerStrategy::AllowAcuteCorners => JoinKind::Mitre,
        CornerStrategy::ChamferAcuteCorners | CornerStrategy::ChamferAllCorners => JoinKind::Chamfer,
        CornerStrategy::RoundAcuteCorners | CornerStrategy::RoundAllCorners => JoinKind::Round,
    }
}

/// `v + r·dir`, rounded. Every band vertex goes through here so shared
/// corners land on the same grid point.
fn offset_pt(v: Point, dir: PointF, r: f64) -> Point {
    PointF::new(v.x as f64 + dir.x * r, v.y as f64 + dir.y * r).round()
}

fn left_normal(u: PointF) -> PointF {
    PointF::new(-u.y, u.x)
}

fn neg(p: PointF) -> PointF {
    PointF::new(-p.x, -p.y)
}

type Patch = SmallVec<[Point; 8]>;

struct BandBuilder<'a> {
    r: f64,
    strategy: CornerStrategy,
    mitre_limit: f64,
    rotations: &'a [(f64, f64)],
    step: f64,
    pieces: Vec<Polygon>,
}

impl<'a> BandBuilder<'a> {
    fn new(r: f64, params: &OffsetParams, rotations: &'a [(f64, f64)]) -> Self {
        Self {
            r,
            strategy: params.corner_strategy,
            mitre_limit: params.mitre_limit,
            step: TAU / rotations.len().max(1) as f64,
            rotations,
            pieces: Vec::new(),
        }
    }

    fn push(&mut self, patch: Patch) {
        let mut pts = patch.into_vec();
        pts.dedup();
        while pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        let area = ring_area2(&pts);
        if pts.len() < 3 || area == 0 {
            return;
        }
        if area < 0 {
            pts.reverse();
        }
        self.pieces.push(vec![LineChain::closed(pts)]);
    }

    /// Points strictly between `g1` and `g1` rotated by `theta`.
    fn arc_into(&self, v: Point, g1: PointF, theta: f64, out: &mut Patch) {
        let steps = (theta.abs() / self.step).ceil() as usize;
        let sign = theta.signum();
        for &(c, s) in self.rotations.iter().take(steps).skip(1) {
            let s = s * sign;
            let d = PointF::new(g1.x * c - g1.y * s, g1.x * s + g1.y * c);
            out.push(offset_pt(v, d, self.r));
        }
    }

    fn add_edge(&mut self, a: Point, b: Point) {
        let u = (b - a).to_f().normalized();
        let n = left_normal(u);
        let r = self.r;
        self.push(smallvec![
            offset_pt(a, neg(n), r),
            offset_pt(b, neg(n), r),
            offset_pt(b, n, r),
            offset_pt(a, n, r),
        ]);
    }

    fn add_disc(&mut self, v: Point) {
        let r = self.r;
        let patch: Patch = self
            .rotations
            .iter()
            .map(|&(c, s)| offset_pt(v, PointF::new(c, s), r))
            .collect();
        self.push(patch);
    }

    /// Cap for a vertex where the contour doubles back on itself.
    fn add_spike(&mut self, v: Point, u1: PointF, n1: PointF) {
        let r = self.r;
        let mut pts: Patch = smallvec![v, offset_pt(v, n1, r)];
        if join_kind(self.strategy, true) == JoinKind::Round {
            self.arc_into(v, n1, -PI, &mut pts);
        } else {
            pts.push(offset_pt(v, n1.add(u1), r));
            pts.push(offset_pt(v, neg(n1).add(u1), r));
        }
        pts.push(offset_pt(v, neg(n1), r));
        self.push(pts);
    }

    fn add_join(&mut self, prev: Point, v: Point, next: Point) {
        let u1 = (v - prev).to_f().normalized();
        let u2 = (next - v).to_f().normalized();
        let n1 = left_normal(u1);
        let n2 = left_normal(u2);
        let cross = u1.cross(u2);
        let dot = u1.dot(u2);

        if cross.abs() < 1e-9 {
            if dot < 0.0 {
                self.add_spike(v, u1, n1);
            }
            return;
        }

        // Outer side of the turn.
        let (g1, g2) = if cross > 0.0 {
            (neg(n1), neg(n2))
        } else {
            (n1, n2)
        };
        let r = self.r;
        let mut kind = join_kind(self.strategy, dot < 0.0);
        let mut pts: Patch = smallvec![v, offset_pt(v, g1, r)];

        if kind == JoinKind::Mitre {
            let mitre = g1.add(g2).scale(1.0 / (1.0 + g1.dot(g2)));
            if mitre.norm() > self.mitre_limit {
                kind = JoinKind::Chamfer;
            } else {
                pts.push(offset_pt(v, mitre, r));
            }
        }

        match kind {
            JoinKind::Chamfer => {
                // Cut line tangent to the offset circle, normal to the bisector.
                let b = g1.add(g2).normalized();
                let along = u1.dot(b);
                if along > 1e-9 {
                    let s = (1.0 - g1.dot(b)) / along;
                    pts.push(offset_pt(v, g1.add(u1.scale(s)), r));
                    pts.push(offset_pt(v, g2.sub(u2.scale(s)), r));
                }
            }
            JoinKind::Round => {
                let theta = g1.cross(g2).atan2(g1.dot(g2));
                self.arc_into(v, g1, theta, &mut pts);
            }
            JoinKind::Mitre => {}
        }

        pts.push(offset_pt(v, g2, r));
        self.push(pts);
    }

    fn add_closed(&mut self, points: &[Point]) {
        let n = points.len();
        for i in 0..n {
            let prev = points[(i + n - 1) % n];
            let v = points[i];
            let next = points[(i + 1) % n];
            self.add_edge(v, next);
            self.add_join(prev, v, next);
        }
    }

    fn add_open(&mut self, points: &[Point]) {
        for pair in points.windows(2) {
            self.add_edge(pair[0], pair[1]);
        }
        for &v in points {
            self.add_disc(v);
        }
    }

    fn finish(self) -> PolySet {
        PolySet::from_polygons(self.pieces)
    }
}

fn check_params(params: &OffsetParams) -> GeometryResult<()> {
    if params.max_error <= 0 {
        return Err(GeometryError::invalid("max_error", "must be positive"));
    }
    if !params.mitre_limit.is_finite() || params.mitre_limit < 1.0 {
        return Err(GeometryError::invalid(
            "mitre_limit",
            format!("{} is not a finite value of at least 1", params.mitre_limit),
        ));
    }
    Ok(())
}

impl PolySet {
    /// Grow (`amount > 0`) or shrink (`amount < 0`) every polygon.
    ///
    /// Arcs are dropped. Shrinking may remove polygons entirely. Zero is a
    /// no-op.
    pub fn inflate(
        &mut self,
        amount: i32,
        strategy: CornerStrategy,
        max_error: i32,
    ) -> GeometryResult<()> {
        self.inflate_with(amount, &OffsetParams::new(strategy, max_error))
    }

    pub fn deflate(
        &mut self,
        amount: i32,
        strategy: CornerStrategy,
        max_error: i32,
    ) -> GeometryResult<()> {
        let amount = amount
            .checked_neg()
            .ok_or_else(|| GeometryError::invalid("amount", "out of range"))?;
        self.inflate(amount, strategy, max_error)
    }

    /// [`PolySet::inflate`] with full parameters, reusing the set's own
    /// corner table.
    pub fn inflate_with(&mut self, amount: i32, params: &OffsetParams) -> GeometryResult<()> {
        let mut table = std::mem::take(&mut self.corner_table);
        let result = self.inflate_with_context(amount, params, &mut table);
        self.corner_table = table;
        result
    }

    /// [`PolySet::inflate`] with a caller-owned corner table.
    pub fn inflate_with_context(
        &mut self,
        amount: i32,
        params: &OffsetParams,
        table: &mut CornerTable,
    ) -> GeometryResult<()> {
        check_params(params)?;
        if amount == 0 || self.is_empty() {
            return Ok(());
        }

        let r = (amount as i64).abs() as f64;
        let segments = arc_segment_count(r, params.max_error, TAU);
        let mut band = BandBuilder::new(r, params, table.rotations(segments));

        for (pi, poly) in self.polygons().iter().enumerate() {
            for (ci, chain) in poly.iter().enumerate() {
                let mut contour = chain.clone();
                contour.clear_arcs();
                contour.remove_duplicate_points();
                if contour.point_count() < 3 || contour.signed_area2() == 0 {
                    warn!(
                        "Skipping degenerate contour {} of polygon {} in offset",
                        ci, pi
                    );
                    continue;
                }
                band.add_closed(contour.points());
            }
        }
        let band = band.finish();

        let mut result = self.clone();
        result.clear_arcs();
        if amount > 0 {
            result.boolean_add(&band)?;
        } else {
            result.boolean_subtract(&band)?;
        }
        if params.simplify_result {
            result.simplify()?;
        }

        debug!(
            "inflate by {} ({}): {} outlines -> {}",
            amount,
            params.corner_strategy,
            self.outline_count(),
            result.outline_count()
        );
        self.replace_polys(result.into_polygons());
        Ok(())
    }

    /// Inflate a fractured set: holes are split out first and bridged again
    /// afterwards.
    pub fn inflate_with_linked_holes(
        &mut self,
        amount: i32,
        strategy: CornerStrategy,
        max_error: i32,
    ) -> GeometryResult<()> {
        let mut work = self.clone();
        work.unfracture()?;
        work.inflate(amount, strategy, max_error)?;
        work.fracture()?;
        self.replace_polys(work.into_polygons());
        Ok(())
    }
}

/// Closed outline of every point within `amount` of an open polyline, with
/// round ends.
pub fn inflate_line_chain(
    chain: &LineChain,
    amount: i32,
    max_error: i32,
) -> GeometryResult<PolySet> {
    if amount <= 0 {
        return Err(GeometryError::invalid("amount", "must be positive"));
    }
    if max_error <= 0 {
        return Err(GeometryError::invalid("max_error", "must be positive"));
    }
    let mut points = chain.points().to_vec();
    points.dedup();
    if points.is_empty() {
        return Ok(PolySet::new());
    }

    let r = amount as f64;
    let mut table = CornerTable::new();
    let params = OffsetParams::new(CornerStrategy::RoundAllCorners, max_error);
    let mut band = BandBuilder::new(r, &params, table.rotations(arc_segment_count(r, max_error, TAU)));
    band.add_open(&points);

    let mut result = PolySet::new();
    result.boolean_add(&band.finish())?;
    Ok(result)
}
