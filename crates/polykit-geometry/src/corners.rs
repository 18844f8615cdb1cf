//! Corner chamfering and filleting.
//!
//! Each corner is cut back along both of its edges by a tangent distance that
//! never exceeds half the shorter edge, so neighbouring corners cannot
//! overlap. Straight-through vertices are left alone.

use crate::arc::ShapeArc;
use crate::chain::LineChain;
use crate::poly_set::{PolySet, Polygon};
use polykit_core::{GeometryError, GeometryResult, Point};

fn push_distinct(chain: &mut LineChain, p: Point) {
    if chain.points().last() != Some(&p) {
        chain.append(p);
    }
}

fn finish(mut chain: LineChain) -> LineChain {
    chain.remove_duplicate_points();
    chain
}

fn chamfer_contour(src: &LineChain, distance: i32) -> LineChain {
    let pts = src.points();
    let n = pts.len();
    if n < 3 || distance == 0 {
        return src.clone();
    }
    let mut out = LineChain::closed(Vec::with_capacity(n * 2));
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let cur = pts[i];
        let next = pts[(i + 1) % n];
        let to_prev = prev - cur;
        let to_next = next - cur;
        if to_prev.cross(to_next) == 0 {
            push_distinct(&mut out, cur);
            continue;
        }
        let limit = (to_prev.euclidean_norm().min(to_next.euclidean_norm()) / 2.0) as i64;
        let d = (distance as i64).min(limit);
        push_distinct(&mut out, cur + to_prev.resize(d));
        push_distinct(&mut out, cur + to_next.resize(d));
    }
    finish(out)
}

fn fillet_contour(src: &LineChain, radius: i32, max_error: i32) -> LineChain {
    let pts = src.points();
    let n = pts.len();
    if n < 3 || radius == 0 {
        return src.clone();
    }
    let mut out = LineChain::closed(Vec::with_capacity(n * 4));
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let cur = pts[i];
        let next = pts[(i + 1) % n];
        if (prev - cur).cross(next - cur) == 0 {
            push_distinct(&mut out, cur);
            continue;
        }

        let c = cur.to_f();
        let in_vec = prev.to_f().sub(c);
        let out_vec = next.to_f().sub(c);
        let to_prev = in_vec.normalized();
        let to_next = out_vec.normalized();
        let half = to_prev.dot(to_next).clamp(-1.0, 1.0).acos() / 2.0;
        let (sin_half, tan_half) = (half.sin(), half.tan());

        let t = (radius as f64 / tan_half).min(in_vec.norm().min(out_vec.norm()) / 2.0);
        let r = t * tan_half;
        if t < 1.0 || r < 1.0 {
            push_distinct(&mut out, cur);
            continue;
        }

        let bisector = to_prev.add(to_next).normalized();
        let center = c.add(bisector.scale(r / sin_half));
        let start = c.add(to_prev.scale(t)).round();
        let mid = center.sub(bisector.scale(r)).round();
        let end = c.add(to_next.scale(t)).round();

        match ShapeArc::from_three_points(start, mid, end) {
            Ok(arc) => out.append_arc(&arc, max_error),
            Err(_) => {
                push_distinct(&mut out, start);
                push_distinct(&mut out, end);
            }
        }
    }
    finish(out)
}

impl PolySet {
    /// Polygon `index` with every corner cut by a straight edge `distance`
    /// back along each side.
    pub fn chamfer_polygon(&self, distance: i32, index: usize) -> GeometryResult<Polygon> {
        if distance < 0 {
            return Err(GeometryError::invalid("distance", "must not be negative"));
        }
        Ok(self
            .polygon(index)?
            .iter()
            .map(|c| chamfer_contour(c, distance))
            .collect())
    }

    /// Polygon `index` with every corner rounded by an arc of `radius`.
    /// The arcs are kept on the resulting contours.
    pub fn fillet_polygon(
        &self,
        radius: i32,
        max_error: i32,
        index: usize,
    ) -> GeometryResult<Polygon> {
        if radius < 0 {
            return Err(GeometryError::invalid("radius", "must not be negative"));
        }
        if max_error <= 0 {
            return Err(GeometryError::invalid("max_error", "must be positive"));
        }
        Ok(self
            .polygon(index)?
            .iter()
            .map(|c| fillet_contour(c, radius, max_error))
            .collect())
    }

    /// Copy of the set with every polygon chamfered.
    pub fn chamfer(&self, distance: i32) -> GeometryResult<PolySet> {
        let polys = (0..self.outline_count())
            .map(|i| self.chamfer_polygon(distance, i))
            .collect::<GeometryResult<Vec<_>>>()?;
        Ok(PolySet::from_polygons(polys))
    }

    /// Copy of the set with every polygon filleted.
    pub fn fillet(&self, radius: i32, max_error: i32) -> GeometryResult<PolySet> {
        let polys = (0..self.outline_count())
            .map(|i| self.fillet_polygon(radius, max_error, i))
            .collect::<GeometryResult<Vec<_>>>()?;
        Ok(PolySet::from_polygons(polys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn square(size: i32) -> PolySet {
        PolySet::from(LineChain::from_xy(&[(0, 0), (size, 0), (size, size), (0, size)]))
    }

    #[test]
    fn test_chamfer_square() {
        let set = square(100).chamfer(10).unwrap();
        assert_eq!(set.full_point_count(), 8);
        assert_eq!(set.area(), 9800.0);
    }

    #[test]
    fn test_chamfer_limited_to_half_edge() {
        let poly = square(100).chamfer_polygon(80, 0).unwrap();
        assert_eq!(poly[0].point_count(), 4);
        assert_eq!(poly[0].area(), 5000.0);
    }

    #[test]
    fn test_fillet_square() {
        let set = square(10_000).fillet(1000, 5).unwrap();
        assert_eq!(set.arc_count(), 4);
        let exact = 1e8 - 4.0 * (1e6 - PI * 1e6 / 4.0);
        let area = set.area();
        assert!(area < 1e8);
        assert!((area - exact).abs() < 30_000.0, "area {}", area);
    }

    #[test]
    fn test_corner_errors() {
        let set = square(100);
        assert!(set.chamfer_polygon(-1, 0).is_err());
        assert!(set.fillet_polygon(10, 0, 0).is_err());
        assert!(matches!(
            set.chamfer_polygon(10, 3),
            Err(GeometryError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_collinear_vertex_kept() {
        let set = PolySet::from(LineChain::from_xy(&[(0, 0), (50, 0), (100, 0), (100, 100), (0, 100)]));
        let poly = set.chamfer_polygon(10, 0).unwrap();
        assert!(poly[0].points().contains(&Point::new(50, 0)));
    }
}
