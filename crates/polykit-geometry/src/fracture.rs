//! Fracture: bridging holes into their outline, and the inverse.
//!
//! A fractured polygon is a single closed contour. Each hole is entered by a
//! horizontal bridge from the nearest outline (or already bridged) edge to the
//! left of its leftmost point, walked, and left again along the same bridge.

use crate::chain::LineChain;
use crate::poly_set::{PolySet, Polygon};
use crate::queries::{point_in_ring, ring_area2};
use polykit_core::{GeometryResult, Point, Seg};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
struct FractureEdge {
    p1: Point,
    p2: Point,
    next: usize,
    connected: bool,
}

impl FractureEdge {
    /// X where this edge meets the horizontal line through `y`, when it is a
    /// downward edge spanning `y`. Material lies on the +x side of such
    /// edges.
    fn crossing_x(&self, y: i32) -> Option<f64> {
        if self.p1.y <= self.p2.y || y > self.p1.y || y < self.p2.y {
            return None;
        }
        let t = (y as f64 - self.p1.y as f64) / (self.p2.y as f64 - self.p1.y as f64);
        Some(self.p1.x as f64 + t * (self.p2.x as f64 - self.p1.x as f64))
    }
}

struct HoleStart {
    first_edge: usize,
    last_edge: usize,
    leftmost: Point,
}

fn push_ring(edges: &mut Vec<FractureEdge>, points: &[Point], connected: bool) -> (usize, usize) {
    let base = edges.len();
    let n = points.len();
    for i in 0..n {
        edges.push(FractureEdge {
            p1: points[i],
            p2: points[(i + 1) % n],
            next: base + (i + 1) % n,
            connected,
        });
    }
    (base, base + n - 1)
}

/// Bridge every hole of `poly` into its outline.
pub(crate) fn fracture_polygon(poly: &Polygon, index: usize) -> LineChain {
    let Some(outline) = poly.first() else {
        return LineChain::closed(Vec::new());
    };
    if poly.len() == 1 {
        return outline.clone();
    }

    let mut outer = outline.clone();
    outer.clear_arcs();
    outer.remove_duplicate_points();
    outer.set_orientation(true);

    let mut edges: Vec<FractureEdge> = Vec::new();
    if outer.point_count() < 3 {
        return outer;
    }
    push_ring(&mut edges, outer.points(), true);

    let mut holes: Vec<HoleStart> = Vec::new();
    for hole in &poly[1..] {
        let mut h = hole.clone();
        h.clear_arcs();
        h.remove_duplicate_points();
        h.set_orientation(false);
        let Some(start) = h
            .points()
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| **p)
            .map(|(i, _)| i)
        else {
            continue;
        };
        if h.point_count() < 3 {
            continue;
        }
        let mut pts = h.points().to_vec();
        pts.rotate_left(start);
        let leftmost = pts[0];
        let (first_edge, last_edge) = push_ring(&mut edges, &pts, false);
        holes.push(HoleStart {
            first_edge,
            last_edge,
            leftmost,
        });
    }
    holes.sort_by_key(|h| h.leftmost);

    for hole in &holes {
        let p = hole.leftmost;
        let target = edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.connected)
            .filter_map(|(i, e)| e.crossing_x(p.y).map(|x| (i, x)))
            .filter(|(_, x)| *x <= p.x as f64)
            .max_by(|a, b| a.1.total_cmp(&b.1));

        let Some((e, x)) = target else {
            warn!(
                "No bridge edge for hole at {} in polygon {}; dropping hole",
                p, index
            );
            continue;
        };

        let pt = Point::new(x.round() as i32, p.y);
        let split_2nd = edges.len();
        let lead1 = split_2nd + 1;
        let lead2 = split_2nd + 2;
        let edge = edges[e];
        edges.push(FractureEdge {
            p1: pt,
            p2: edge.p2,
            next: edge.next,
            connected: true,
        });
        edges.push(FractureEdge {
            p1: pt,
            p2: p,
            next: hole.first_edge,
            connected: true,
        });
        edges.push(FractureEdge {
            p1: p,
            p2: pt,
            next: split_2nd,
            connected: true,
        });
        edges[e].p2 = pt;
        edges[e].next = lead1;
        edges[hole.last_edge].next = lead2;
        for he in &mut edges[hole.first_edge..=hole.last_edge] {
            he.connected = true;
        }
    }

    let mut points = Vec::with_capacity(edges.len());
    let mut current = 0;
    for _ in 0..edges.len() {
        points.push(edges[current].p1);
        current = edges[current].next;
        if current == 0 {
            break;
        }
    }

    let mut chain = LineChain::closed(points);
    chain.remove_duplicate_points();
    chain
}

/// Split one bridged contour back into an outline and holes.
fn unfracture_chain(chain: &LineChain) -> Option<Polygon> {
    let mut pts = chain.points().to_vec();
    pts.dedup();
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    let n = pts.len();
    if n < 3 {
        return None;
    }

    let mut next: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();
    let mut removed = vec![false; n];

    let mut open: HashMap<(Point, Point), Vec<usize>> = HashMap::new();
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for i in 0..n {
        let (a, b) = (pts[i], pts[(i + 1) % n]);
        match open.get_mut(&(b, a)).and_then(|v| v.pop()) {
            Some(j) => pairs.push((j, i)),
            None => open.entry((a, b)).or_default().push(i),
        }
    }

    for (i, j) in pairs {
        let (p1, n1) = (prev[i], next[i]);
        let (p2, n2) = (prev[j], next[j]);
        next[p1] = n2;
        prev[n2] = p1;
        next[p2] = n1;
        prev[n1] = p2;
        removed[i] = true;
        removed[j] = true;
    }

    let mut visited = removed.clone();
    let mut loops: Vec<Vec<Point>> = Vec::new();
    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut ring = Vec::new();
        let mut current = start;
        for _ in 0..n {
            if visited[current] {
                break;
            }
            visited[current] = true;
            ring.push(pts[current]);
            current = next[current];
        }
        ring.dedup();
        if ring.len() >= 3 && ring_area2(&ring) != 0 {
            loops.push(ring);
        }
    }

    let outer = loops
        .iter()
        .enumerate()
        .max_by_key(|(_, l)| ring_area2(l).abs())
        .map(|(i, _)| i)?;
    let outline_pts = loops.swap_remove(outer);

    let mut outline = LineChain::closed(outline_pts);
    outline.set_orientation(true);
    outline.simplify();
    let mut poly = vec![outline];
    for ring in loops {
        let mut hole = LineChain::closed(ring);
        hole.set_orientation(false);
        hole.simplify();
        poly.push(hole);
    }
    Some(poly)
}

/// Split `points` at a pair of anti-parallel overlapping edges. Both pieces
/// must wind the same way as the whole ring, so a hole bridge is never cut.
fn split_waist(points: &[Point]) -> Option<(Vec<Point>, Vec<Point>)> {
    let n = points.len();
    if n < 4 {
        return None;
    }
    let winding = ring_area2(points).signum();
    if winding == 0 {
        return None;
    }
    let seg = |k: usize| Seg::new(points[k], points[(k + 1) % n]);
    for i in 0..n {
        let si = seg(i);
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let sj = seg(j);
            let anti_parallel = (si.b - si.a).dot(sj.b - sj.a) < 0;
            if anti_parallel && si.overlaps(&sj) {
                let a: Vec<Point> = points[i + 1..=j].to_vec();
                let b: Vec<Point> = points[j + 1..]
                    .iter()
                    .chain(&points[..=i])
                    .copied()
                    .collect();
                if ring_area2(&a).signum() == winding && ring_area2(&b).signum() == winding {
                    return Some((a, b));
                }
            }
        }
    }
    None
}

fn clean_ring(mut pts: Vec<Point>) -> Option<Vec<Point>> {
    pts.dedup();
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    (pts.len() >= 3 && ring_area2(&pts) != 0).then_some(pts)
}

impl PolySet {
    /// Convert every polygon with holes into a single bridged contour.
    ///
    /// Holes with no eligible bridge edge are dropped with a warning.
    pub fn fracture(&mut self) -> GeometryResult<()> {
        let mut polys: Vec<Polygon> = Vec::new();
        polys.try_reserve(self.outline_count())?;
        let mut bridged = 0;
        for (i, poly) in self.polygons().iter().enumerate() {
            bridged += poly.len().saturating_sub(1);
            polys.push(vec![fracture_polygon(poly, i)]);
        }
        debug!("fractured {} holes in {} polygons", bridged, polys.len());
        self.replace_polys(polys);
        Ok(())
    }

    /// Split bridged contours back into outlines and holes.
    ///
    /// Polygons that already have holes are kept as they are.
    pub fn unfracture(&mut self) -> GeometryResult<()> {
        let mut polys: Vec<Polygon> = Vec::new();
        polys.try_reserve(self.outline_count())?;
        for poly in self.polygons() {
            match poly.as_slice() {
                [single] => {
                    if let Some(p) = unfracture_chain(single) {
                        polys.push(p);
                    }
                }
                _ => polys.push(poly.clone()),
            }
        }
        self.replace_polys(polys);
        Ok(())
    }

    /// Split outlines pinched along a shared line into separate outlines.
    /// Returns the number of splits made.
    pub fn split_collinear_outlines(&mut self) -> usize {
        let mut splits = 0;
        let mut polys: Vec<Polygon> = Vec::new();
        for poly in self.polygons() {
            let Some(outline) = poly.first() else { continue };
            let mut pending = vec![outline.points().to_vec()];
            let mut pieces: Vec<Vec<Point>> = Vec::new();
            while let Some(pts) = pending.pop() {
                match split_waist(&pts) {
                    Some((a, b)) => {
                        pending.extend(clean_ring(a));
                        pending.extend(clean_ring(b));
                    }
                    None => pieces.push(pts),
                }
            }

            if pieces.len() < 2 {
                polys.push(poly.clone());
                continue;
            }
            splits += pieces.len() - 1;
            pieces.sort_by_key(|p| std::cmp::Reverse(ring_area2(p).abs()));
            let mut split: Vec<Polygon> = pieces
                .into_iter()
                .map(|p| vec![LineChain::closed(p)])
                .collect();
            for hole in &poly[1..] {
                let owner = hole
                    .points()
                    .first()
                    .and_then(|&p| split.iter().position(|s| point_in_ring(s[0].points(), p)))
                    .unwrap_or(0);
                if let Some(target) = split.get_mut(owner) {
                    target.push(hole.clone());
                }
            }
            polys.extend(split);
        }
        if splits > 0 {
            self.replace_polys(polys);
        }
        splits
    }
}
