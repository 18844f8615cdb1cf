//! Closed or open vertex chains (contours) with optional arc provenance.

use crate::arc::ShapeArc;
use crate::queries::{chains_self_intersect, point_in_ring, ring_area2};
use polykit_core::{BBox, GeometryError, GeometryResult, Point, PointF, Seg};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// An ordered sequence of grid points.
///
/// Each vertex may belong to one of the chain's arcs; `shapes[i]` holds the
/// index of that arc in `arcs`. Contours owned by a polygon set are always
/// closed: the last vertex implicitly connects back to the first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineChain {
    points: Vec<Point>,
    shapes: Vec<Option<usize>>,
    arcs: Vec<ShapeArc>,
    closed: bool,
    #[serde(skip)]
    bbox_cache: Option<BBox>,
}

impl PartialEq for LineChain {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
            && self.closed == other.closed
            && self.shapes == other.shapes
            && self.arcs == other.arcs
    }
}

impl Hash for LineChain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.points.hash(state);
        self.shapes.hash(state);
        self.closed.hash(state);
    }
}

impl LineChain {
    /// Empty open chain.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point>, closed: bool) -> Self {
        let shapes = vec![None; points.len()];
        Self {
            points,
            shapes,
            arcs: Vec::new(),
            closed,
            bbox_cache: None,
        }
    }

    /// Closed chain from points.
    pub fn closed(points: Vec<Point>) -> Self {
        Self::from_points(points, true)
    }

    /// Closed chain from `(x, y)` pairs.
    pub fn from_xy(coords: &[(i32, i32)]) -> Self {
        Self::closed(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    /// Closed chain whose vertices carry arc tags into `arc_table`.
    ///
    /// Every run of consecutive vertices sharing a tag becomes a sub-arc of
    /// the tagged arc. Single tagged vertices stay plain.
    pub fn from_tagged(points: Vec<Point>, tags: &[Option<u32>], arc_table: &[ShapeArc]) -> Self {
        let n = points.len();
        let mut chain = Self::closed(points);
        if n == 0 || tags.len() != n {
            return chain;
        }

        // Start at a run boundary so no run wraps past the end.
        let rotate = (0..n).find(|&i| tags[i] != tags[(i + n - 1) % n]).unwrap_or(0);
        chain.points.rotate_left(rotate);
        let mut tags: Vec<Option<u32>> = tags.to_vec();
        tags.rotate_left(rotate);

        let mut i = 0;
        while i < n {
            let mut j = i;
            while j + 1 < n && tags[j + 1] == tags[i] {
                j += 1;
            }
            if let Some(arc) = tags[i].and_then(|t| arc_table.get(t as usize)) {
                if j > i {
                    let sub = arc.sub_arc(chain.points[i], chain.points[j]);
                    let arc_idx = chain.arcs.len();
                    chain.arcs.push(sub);
                    for shape in &mut chain.shapes[i..=j] {
                        *shape = Some(arc_idx);
                    }
                }
            }
            i = j + 1;
        }
        chain
    }

    fn touch(&mut self) {
        self.bbox_cache = None;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Vertex `index`, panicking when out of range like slice indexing.
    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    pub fn get_point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Vertex with wrap-around, so `-1` is the last vertex. `None` on an
    /// empty chain.
    pub fn cpoint(&self, index: isize) -> Option<Point> {
        let n = self.points.len() as isize;
        if n == 0 {
            return None;
        }
        self.points.get(index.rem_euclid(n) as usize).copied()
    }

    /// Segment starting at vertex `index`.
    pub fn segment(&self, index: usize) -> Seg {
        let n = self.points.len();
        Seg::new(self.points[index], self.points[(index + 1) % n])
    }

    pub fn segments(&self) -> impl Iterator<Item = Seg> + '_ {
        (0..self.segment_count()).map(move |i| self.segment(i))
    }

    /// Overwrite a vertex. Moving a vertex that belongs to an arc turns the
    /// whole arc into plain vertices.
    pub fn set_point(&mut self, index: usize, p: Point) -> GeometryResult<()> {
        let count = self.points.len();
        if index >= count {
            return Err(GeometryError::out_of_range("vertex", index, count));
        }
        if let Some(arc) = self.shapes[index] {
            self.detach_arc(arc);
        }
        self.points[index] = p;
        self.touch();
        Ok(())
    }

    pub fn append(&mut self, p: Point) {
        self.points.push(p);
        self.shapes.push(None);
        self.touch();
    }

    pub fn append_xy(&mut self, x: i32, y: i32) {
        self.append(Point::new(x, y));
    }

    /// Append the polyline approximation of `arc`, recording its provenance.
    /// A leading vertex equal to the current last vertex is not repeated.
    pub fn append_arc(&mut self, arc: &ShapeArc, max_error: i32) {
        let arc_idx = self.arcs.len();
        self.arcs.push(arc.clone());
        for p in arc.approximate(max_error) {
            if self.points.last() == Some(&p) && self.shapes.last() == Some(&None) {
                continue;
            }
            self.points.push(p);
            self.shapes.push(Some(arc_idx));
        }
        self.touch();
    }

    /// Insert a plain vertex before `index` (`index == point_count` appends).
    pub fn insert(&mut self, index: usize, p: Point) -> GeometryResult<()> {
        let count = self.points.len();
        if index > count {
            return Err(GeometryError::out_of_range("vertex", index, count));
        }
        // Splitting an arc in its interior breaks it.
        if index > 0 && index < count {
            if let (Some(a), Some(b)) = (self.shapes[index - 1], self.shapes[index]) {
                if a == b {
                    self.detach_arc(a);
                }
            }
        }
        self.points.insert(index, p);
        self.shapes.insert(index, None);
        self.touch();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> GeometryResult<Point> {
        let count = self.points.len();
        if index >= count {
            return Err(GeometryError::out_of_range("vertex", index, count));
        }
        if let Some(arc) = self.shapes[index] {
            self.detach_arc(arc);
        }
        self.shapes.remove(index);
        let p = self.points.remove(index);
        self.touch();
        Ok(p)
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.shapes.clear();
        self.arcs.clear();
        self.touch();
    }

    /// Drop arc `arc_idx`, leaving its vertices as plain points.
    fn detach_arc(&mut self, arc_idx: usize) {
        if arc_idx >= self.arcs.len() {
            return;
        }
        self.arcs.remove(arc_idx);
        for shape in &mut self.shapes {
            *shape = match *shape {
                Some(a) if a == arc_idx => None,
                Some(a) if a > arc_idx => Some(a - 1),
                other => other,
            };
        }
    }

    pub fn arcs(&self) -> &[ShapeArc] {
        &self.arcs
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn has_arcs(&self) -> bool {
        !self.arcs.is_empty()
    }

    /// Arc that vertex `index` belongs to, if any.
    pub fn arc_index(&self, index: usize) -> Option<usize> {
        self.shapes.get(index).copied().flatten()
    }

    pub fn is_arc_vertex(&self, index: usize) -> bool {
        self.arc_index(index).is_some()
    }

    /// Forget arc provenance; the polyline is unchanged.
    pub fn clear_arcs(&mut self) {
        self.arcs.clear();
        self.shapes.iter_mut().for_each(|s| *s = None);
        self.touch();
    }

    /// Per-vertex arc tags, offset into a table where this chain's arcs start
    /// at `first_tag`.
    pub(crate) fn arc_tags(&self, first_tag: u32) -> Vec<Option<u32>> {
        self.shapes
            .iter()
            .map(|s| s.map(|a| first_tag + a as u32))
            .collect()
    }

    /// Twice the signed area, positive for counter-clockwise chains.
    pub(crate) fn signed_area2(&self) -> i128 {
        ring_area2(&self.points)
    }

    /// Signed area, positive for counter-clockwise chains.
    pub fn signed_area(&self) -> f64 {
        self.signed_area2() as f64 / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area2() < 0
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
        self.shapes.reverse();
        for arc in &mut self.arcs {
            *arc = arc.reversed();
        }
    }

    /// Orient counter-clockwise (`ccw`) or clockwise.
    pub fn set_orientation(&mut self, ccw: bool) {
        let area = self.signed_area2();
        if (ccw && area < 0) || (!ccw && area > 0) {
            self.reverse();
        }
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    /// Remove consecutive duplicate vertices (and the closing duplicate of a
    /// closed chain). Returns the number removed.
    pub fn remove_duplicate_points(&mut self) -> usize {
        let before = self.points.len();
        if before < 2 {
            return 0;
        }
        let mut points = Vec::with_capacity(before);
        let mut shapes = Vec::with_capacity(before);
        for (p, s) in self.points.iter().zip(&self.shapes) {
            if points.last() == Some(p) {
                continue;
            }
            points.push(*p);
            shapes.push(*s);
        }
        if self.closed {
            while points.len() > 1 && points.first() == points.last() {
                points.pop();
                shapes.pop();
            }
        }
        self.points = points;
        self.shapes = shapes;
        self.touch();
        before - self.points.len()
    }

    /// Remove duplicate vertices and plain vertices lying on a straight run.
    /// Arc vertices are kept. Returns the number removed.
    pub fn simplify(&mut self) -> usize {
        let before = self.points.len();
        self.remove_duplicate_points();

        // One linear pass per round, measured against the last kept vertex.
        // Another round runs only while the seam of a closed chain moves.
        loop {
            let n = self.points.len();
            if n < 3 {
                break;
            }
            let mut points = Vec::with_capacity(n);
            let mut shapes = Vec::with_capacity(n);
            for i in 0..n {
                let cur = self.points[i];
                let interior = if self.closed { true } else { i > 0 && i + 1 < n };
                if interior && self.shapes[i].is_none() {
                    let prev = match points.last() {
                        Some(&p) => p,
                        None => self.points[n - 1],
                    };
                    let next = self.points[(i + 1) % n];
                    let d1 = cur - prev;
                    let d2 = next - cur;
                    if d1.cross(d2) == 0 && d1.dot(d2) > 0 {
                        continue;
                    }
                }
                points.push(cur);
                shapes.push(self.shapes[i]);
            }
            let removed = n - points.len();
            self.points = points;
            self.shapes = shapes;
            if removed == 0 {
                break;
            }
        }
        self.touch();
        before - self.points.len()
    }

    /// Merge vertices closer than `tolerance` to the previously kept vertex,
    /// then drop straight-run vertices. Arc provenance is discarded.
    pub fn merge_close_vertices(&mut self, tolerance: i32) {
        self.clear_arcs();
        let tol2 = tolerance as i64 * tolerance as i64;
        let mut kept: Vec<Point> = Vec::with_capacity(self.points.len());
        for p in &self.points {
            match kept.last() {
                Some(last) if last.squared_distance(*p) <= tol2 => {}
                _ => kept.push(*p),
            }
        }
        if self.closed {
            while kept.len() > 1 && kept[0].squared_distance(kept[kept.len() - 1]) <= tol2 {
                kept.pop();
            }
        }
        self.shapes = vec![None; kept.len()];
        self.points = kept;
        self.simplify();
    }

    pub fn bbox(&self) -> BBox {
        let mut bbox = BBox::from_points(&self.points);
        for arc in &self.arcs {
            bbox.merge(&arc.bbox());
        }
        bbox
    }

    pub fn generate_bbox_cache(&mut self) {
        self.bbox_cache = Some(self.bbox());
    }

    /// Bounding box computed by the last [`LineChain::generate_bbox_cache`],
    /// cleared by any mutation.
    pub fn bbox_cache(&self) -> Option<BBox> {
        self.bbox_cache
    }

    /// Ray-crossing containment test.
    ///
    /// Points within `accuracy` of an edge count as inside when `accuracy`
    /// is greater than one. With `use_bbox_cache` a built cache rejects far
    /// points early.
    pub fn point_inside(&self, p: Point, accuracy: i32, use_bbox_cache: bool) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        if use_bbox_cache {
            if let Some(bbox) = self.bbox_cache {
                if !bbox.inflate(accuracy.max(0)).contains(p) {
                    return false;
                }
            }
        }

        let inside = point_in_ring(&self.points, p);

        if !inside && accuracy > 1 {
            return self.point_on_edge(p, accuracy);
        }
        inside
    }

    /// `p` lies within `accuracy` of some edge.
    pub fn point_on_edge(&self, p: Point, accuracy: i32) -> bool {
        self.edge_containing_point(p, accuracy).is_some()
    }

    /// Index of the first edge within `accuracy` of `p`.
    pub fn edge_containing_point(&self, p: Point, accuracy: i32) -> Option<usize> {
        let limit = accuracy.max(0) as i64 * accuracy.max(0) as i64;
        if self.points.len() == 1 {
            return (self.points[0].squared_distance(p) <= limit).then_some(0);
        }
        (0..self.segment_count()).find(|&i| self.segment(i).square_distance_to_point(p) <= limit)
    }

    /// Squared distance from `p` to the nearest edge or vertex.
    pub fn squared_distance(&self, p: Point) -> i64 {
        self.nearest(p).0
    }

    /// Nearest point of the chain's edges to `p`.
    pub fn nearest_point(&self, p: Point) -> Point {
        self.nearest(p).1
    }

    pub(crate) fn nearest(&self, p: Point) -> (i64, Point) {
        match self.points.len() {
            0 => (i64::MAX, p),
            1 => (self.points[0].squared_distance(p), self.points[0]),
            _ => self
                .segments()
                .map(|s| {
                    let q = s.nearest_point(p);
                    (s.square_distance_to_point(p), q)
                })
                .min_by_key(|(d, _)| *d)
                .unwrap_or((i64::MAX, p)),
        }
    }

    /// Squared distance from `seg` to the nearest edge, with the nearest point
    /// on this chain.
    pub fn squared_distance_to_seg(&self, seg: &Seg) -> (i64, Point) {
        match self.points.len() {
            0 => (i64::MAX, seg.a),
            1 => (
                seg.square_distance_to_point(self.points[0]),
                self.points[0],
            ),
            _ => self
                .segments()
                .map(|s| (s.square_distance_to_seg(seg), s.nearest_points(seg).0))
                .min_by_key(|(d, _)| *d)
                .unwrap_or((i64::MAX, seg.a)),
        }
    }

    /// Any two non-adjacent edges touch or cross.
    pub fn self_intersecting(&self) -> bool {
        chains_self_intersect(&[self])
    }

    fn map_points(&mut self, f: impl Fn(Point) -> Point + Copy, g: impl Fn(PointF) -> PointF + Copy, radius_scale: f64, mirrors: bool) {
        for p in &mut self.points {
            *p = f(*p);
        }
        for arc in &mut self.arcs {
            *arc = arc.transformed(f, g, radius_scale, mirrors);
        }
        self.touch();
    }

    pub fn translate(&mut self, offset: Point) {
        self.map_points(
            |p| p + offset,
            |c| c.add(offset.to_f()),
            1.0,
            false,
        );
    }

    /// Rotate counter-clockwise by `angle` radians around `center`.
    pub fn rotate(&mut self, angle: f64, center: Point) {
        let (s, c) = angle.sin_cos();
        let cf = center.to_f();
        let rot = move |q: PointF| {
            let v = q.sub(cf);
            PointF::new(cf.x + v.x * c - v.y * s, cf.y + v.x * s + v.y * c)
        };
        self.map_points(move |p| rot(p.to_f()).round(), rot, 1.0, false);
    }

    /// Mirror across the vertical line through `about` (`x`) and/or the
    /// horizontal line through it (`y`).
    pub fn mirror(&mut self, x: bool, y: bool, about: Point) {
        if !x && !y {
            return;
        }
        let a = about.to_f();
        let flip = move |q: PointF| {
            PointF::new(
                if x { 2.0 * a.x - q.x } else { q.x },
                if y { 2.0 * a.y - q.y } else { q.y },
            )
        };
        self.map_points(move |p| flip(p.to_f()).round(), flip, 1.0, x != y);
    }

    /// Scale about the origin.
    pub fn scale(&mut self, factor: f64) {
        let sc = move |q: PointF| q.scale(factor);
        self.map_points(move |p| sc(p.to_f()).round(), sc, factor.abs(), false);
    }
}

impl From<Vec<Point>> for LineChain {
    fn from(points: Vec<Point>) -> Self {
        Self::closed(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn square() -> LineChain {
        LineChain::from_xy(&[(0, 0), (10, 0), (10, 10), (0, 10)])
    }

    #[test]
    fn test_area_and_orientation() {
        let mut sq = square();
        assert_eq!(sq.signed_area(), 100.0);
        assert!(!sq.is_clockwise());
        sq.reverse();
        assert_eq!(sq.signed_area(), -100.0);
        sq.set_orientation(true);
        assert_eq!(sq.signed_area(), 100.0);
    }

    #[test]
    fn test_point_inside() {
        let sq = square();
        assert!(sq.point_inside(Point::new(5, 5), 0, false));
        assert!(!sq.point_inside(Point::new(15, 5), 0, false));
        assert!(!sq.point_inside(Point::new(11, 5), 0, false));
        assert!(sq.point_inside(Point::new(11, 5), 2, false));
    }

    #[test]
    fn test_bbox_cache_rejects_far_points() {
        let mut sq = square();
        assert!(sq.bbox_cache().is_none());
        sq.generate_bbox_cache();
        assert!(!sq.point_inside(Point::new(100, 100), 0, true));
        assert!(sq.point_inside(Point::new(5, 5), 0, true));
        sq.append_xy(-5, 5);
        assert!(sq.bbox_cache().is_none());
    }

    #[test]
    fn test_simplify_removes_collinear() {
        let mut chain = LineChain::from_xy(&[(0, 0), (5, 0), (10, 0), (10, 10), (10, 10), (0, 10)]);
        let removed = chain.simplify();
        assert_eq!(removed, 2);
        assert_eq!(chain.point_count(), 4);
        assert_eq!(chain.area(), 100.0);
    }

    #[test]
    fn test_simplify_straight_run_across_seam() {
        let mut chain = LineChain::from_xy(&[
            (4, 0),
            (6, 0),
            (10, 0),
            (10, 10),
            (0, 10),
            (0, 0),
            (2, 0),
        ]);
        assert_eq!(chain.simplify(), 3);
        assert_eq!(chain.point_count(), 4);
        assert_eq!(chain.area(), 100.0);
        assert_eq!(chain.simplify(), 0);

        let mut open = LineChain::from_points(
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0), Point::new(3, 0)],
            false,
        );
        assert_eq!(open.simplify(), 2);
        assert_eq!(open.points(), &[Point::new(0, 0), Point::new(3, 0)]);
    }

    #[test]
    fn test_cpoint_wraps() {
        let sq = square();
        assert_eq!(sq.cpoint(-1), Some(Point::new(0, 10)));
        assert_eq!(sq.cpoint(5), Some(Point::new(10, 0)));
        assert_eq!(LineChain::new().cpoint(0), None);
    }

    #[test]
    fn test_clear_arcs_drops_bbox_cache() {
        let mut chain = LineChain::new();
        chain.set_closed(true);
        chain.append_xy(0, 0);
        chain.append_arc(&ShapeArc::from_center(Point::new(0, 0), 1000, 0.0, PI / 2.0), 50);
        chain.generate_bbox_cache();
        assert!(chain.bbox_cache().is_some());
        chain.clear_arcs();
        assert!(chain.bbox_cache().is_none());
        assert_eq!(chain.bbox(), BBox::from_points(chain.points()));
    }

    #[test]
    fn test_arc_provenance() {
        let mut chain = LineChain::new();
        chain.set_closed(true);
        chain.append_xy(0, 0);
        let arc = ShapeArc::from_center(Point::new(0, 0), 1_000_000, 0.0, PI / 2.0);
        chain.append_arc(&arc, 5_000);
        assert_eq!(chain.arc_count(), 1);
        assert!(!chain.is_arc_vertex(0));
        assert!(chain.is_arc_vertex(1));

        chain.set_point(2, Point::new(1, 1)).unwrap();
        assert_eq!(chain.arc_count(), 0);
        assert!(!chain.is_arc_vertex(1));
    }

    #[test]
    fn test_from_tagged_rebuilds_runs() {
        let arc = ShapeArc::from_center(Point::new(0, 0), 1000, 0.0, PI);
        let pts = arc.approximate(10);
        let n = pts.len();
        let mut tags = vec![Some(0u32); n];
        // A plain closing vertex that sits between the arc ends.
        let mut points = pts.clone();
        points.push(Point::new(0, -500));
        tags.push(None);
        // Rotate the input so the run wraps around the end.
        points.rotate_left(3);
        tags.rotate_left(3);

        let chain = LineChain::from_tagged(points, &tags, &[arc.clone()]);
        assert_eq!(chain.arc_count(), 1);
        assert_eq!(chain.point_count(), n + 1);
        let rebuilt = &chain.arcs()[0];
        assert_eq!(rebuilt.start(), arc.start());
        assert_eq!(rebuilt.end(), arc.end());
    }

    #[test]
    fn test_out_of_range() {
        let mut sq = square();
        assert!(matches!(
            sq.set_point(4, Point::new(0, 0)),
            Err(GeometryError::IndexOutOfRange { .. })
        ));
        assert!(sq.insert(5, Point::new(0, 0)).is_err());
        assert!(sq.remove(9).is_err());
    }

    #[test]
    fn test_transforms() {
        let mut sq = square();
        sq.translate(Point::new(5, 5));
        assert_eq!(sq.bbox().min, Point::new(5, 5));
        sq.mirror(true, false, Point::new(0, 0));
        assert_eq!(sq.bbox().min, Point::new(-15, 5));
        assert!(sq.is_clockwise());
        sq.scale(2.0);
        assert_eq!(sq.area(), 400.0);
    }

    #[test]
    fn test_nearest_and_distance() {
        let sq = square();
        assert_eq!(sq.squared_distance(Point::new(13, 5)), 9);
        assert_eq!(sq.nearest_point(Point::new(13, 5)), Point::new(10, 5));
        let (d, _) = sq.squared_distance_to_seg(&Seg::new(Point::new(12, -5), Point::new(12, 15)));
        assert_eq!(d, 4);
    }
}
