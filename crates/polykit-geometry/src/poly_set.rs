//! The polygon set: outlines with holes, plus the caches derived from them.

use crate::arc::ShapeArc;
use crate::chain::LineChain;
use crate::index::{ContourLayout, VertexIndex};
use crate::offset::CornerTable;
use crate::triangulation::TriangulationCache;
use polykit_core::{BBox, GeometryError, GeometryResult, Point, Seg};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One outline (contour 0) followed by its holes.
pub type Polygon = Vec<LineChain>;

/// An ordered collection of polygons.
///
/// The set owns its contours. Every mutating method goes through
/// [`PolySet::polys_mut`], which marks the triangulation cache stale; the
/// cache is only trusted again once its stored content hash matches.
#[derive(Default, Serialize, Deserialize)]
pub struct PolySet {
    polys: Vec<Polygon>,
    #[serde(skip)]
    pub(crate) tri_cache: TriangulationCache,
    #[serde(skip)]
    pub(crate) corner_table: CornerTable,
}

impl Clone for PolySet {
    fn clone(&self) -> Self {
        Self {
            polys: self.polys.clone(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for PolySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolySet").field("polys", &self.polys).finish()
    }
}

impl PartialEq for PolySet {
    fn eq(&self, other: &Self) -> bool {
        self.polys == other.polys
    }
}

impl From<LineChain> for PolySet {
    fn from(chain: LineChain) -> Self {
        let mut set = PolySet::new();
        set.add_outline(chain);
        set
    }
}

impl PolySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_polygons(polys: Vec<Polygon>) -> Self {
        Self {
            polys,
            ..Self::default()
        }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polys
    }

    /// Mutable access to the contour list. Marks the triangulation stale.
    pub(crate) fn polys_mut(&mut self) -> &mut Vec<Polygon> {
        self.tri_cache.invalidate();
        &mut self.polys
    }

    pub(crate) fn into_polygons(self) -> Vec<Polygon> {
        self.polys
    }

    /// Replace every polygon at once.
    pub(crate) fn replace_polys(&mut self, polys: Vec<Polygon>) {
        *self.polys_mut() = polys;
    }

    fn resolve_outline(&self, outline: Option<usize>) -> GeometryResult<usize> {
        let count = self.polys.len();
        match outline {
            None if count == 0 => Err(GeometryError::EmptySet),
            None => Ok(count - 1),
            Some(i) if i < count => Ok(i),
            Some(i) => Err(GeometryError::out_of_range("outline", i, count)),
        }
    }

    fn contour(&self, outline: usize, contour: usize) -> GeometryResult<&LineChain> {
        let poly = self
            .polys
            .get(outline)
            .ok_or_else(|| GeometryError::out_of_range("outline", outline, self.polys.len()))?;
        poly.get(contour)
            .ok_or_else(|| GeometryError::out_of_range("contour", contour, poly.len()))
    }

    fn contour_mut(&mut self, outline: usize, contour: usize) -> GeometryResult<&mut LineChain> {
        let count = self.polys.len();
        let poly = self
            .polys_mut()
            .get_mut(outline)
            .ok_or_else(|| GeometryError::out_of_range("outline", outline, count))?;
        let contours = poly.len();
        poly.get_mut(contour)
            .ok_or_else(|| GeometryError::out_of_range("contour", contour, contours))
    }

    /// Start a new empty outline and return its index.
    pub fn new_outline(&mut self) -> usize {
        self.polys_mut().push(vec![LineChain::from_points(Vec::new(), true)]);
        self.polys.len() - 1
    }

    /// Start a new empty hole in `outline` (default: the last one) and return
    /// its hole index.
    pub fn new_hole(&mut self, outline: Option<usize>) -> GeometryResult<usize> {
        let o = self.resolve_outline(outline)?;
        let poly = &mut self.polys_mut()[o];
        poly.push(LineChain::from_points(Vec::new(), true));
        Ok(poly.len() - 2)
    }

    /// Append a vertex to a contour; `hole` of `None` targets the outline.
    /// Returns the new vertex count of that contour.
    pub fn append(
        &mut self,
        p: Point,
        outline: Option<usize>,
        hole: Option<usize>,
    ) -> GeometryResult<usize> {
        let o = self.resolve_outline(outline)?;
        let chain = self.contour_mut(o, hole.map_or(0, |h| h + 1))?;
        chain.append(p);
        Ok(chain.point_count())
    }

    pub fn append_xy(&mut self, x: i32, y: i32) -> GeometryResult<usize> {
        self.append(Point::new(x, y), None, None)
    }

    /// Append an arc's polyline approximation, keeping its provenance.
    pub fn append_arc(
        &mut self,
        arc: &ShapeArc,
        outline: Option<usize>,
        hole: Option<usize>,
        max_error: i32,
    ) -> GeometryResult<usize> {
        if max_error <= 0 {
            return Err(GeometryError::invalid("max_error", "must be positive"));
        }
        let o = self.resolve_outline(outline)?;
        let chain = self.contour_mut(o, hole.map_or(0, |h| h + 1))?;
        chain.append_arc(arc, max_error);
        Ok(chain.point_count())
    }

    /// Add a closed outline and return its index.
    pub fn add_outline(&mut self, mut chain: LineChain) -> usize {
        chain.set_closed(true);
        self.polys_mut().push(vec![chain]);
        self.polys.len() - 1
    }

    /// Add a closed hole to `outline` (default: the last) and return its hole
    /// index.
    pub fn add_hole(&mut self, mut chain: LineChain, outline: Option<usize>) -> GeometryResult<usize> {
        let o = self.resolve_outline(outline)?;
        chain.set_closed(true);
        let poly = &mut self.polys_mut()[o];
        poly.push(chain);
        Ok(poly.len() - 2)
    }

    pub fn add_polygon(&mut self, mut poly: Polygon) -> usize {
        for chain in &mut poly {
            chain.set_closed(true);
        }
        self.polys_mut().push(poly);
        self.polys.len() - 1
    }

    /// Append copies of every polygon of `other`.
    pub fn append_set(&mut self, other: &PolySet) {
        self.polys_mut().extend(other.polys.iter().cloned());
    }

    /// New set holding `count` polygons starting at `first`.
    pub fn subset(&self, first: usize, count: usize) -> GeometryResult<PolySet> {
        let end = first
            .checked_add(count)
            .filter(|&e| e <= self.polys.len())
            .ok_or_else(|| {
                GeometryError::out_of_range("outline", first.saturating_add(count), self.polys.len())
            })?;
        Ok(PolySet::from_polygons(self.polys[first..end].to_vec()))
    }

    /// New set holding only polygon `index`.
    pub fn unit_set(&self, index: usize) -> GeometryResult<PolySet> {
        self.subset(index, 1)
    }

    /// Remove polygon `index`; later polygons shift down by one.
    pub fn remove_outline(&mut self, index: usize) -> GeometryResult<Polygon> {
        let count = self.polys.len();
        if index >= count {
            return Err(GeometryError::out_of_range("outline", index, count));
        }
        Ok(self.polys_mut().remove(index))
    }

    /// Remove a hole, or the whole polygon when `hole` is `None`.
    pub fn remove_contour(&mut self, outline: usize, hole: Option<usize>) -> GeometryResult<()> {
        match hole {
            None => self.remove_outline(outline).map(|_| ()),
            Some(h) => {
                self.contour(outline, h + 1)?;
                self.polys_mut()[outline].remove(h + 1);
                Ok(())
            }
        }
    }

    pub fn remove_all_contours(&mut self) {
        self.polys_mut().clear();
    }

    /// Drop all geometry.
    pub fn clear(&mut self) {
        self.remove_all_contours();
    }

    pub fn outline(&self, index: usize) -> GeometryResult<&LineChain> {
        self.contour(index, 0)
    }

    pub fn outline_mut(&mut self, index: usize) -> GeometryResult<&mut LineChain> {
        self.contour_mut(index, 0)
    }

    pub fn hole(&self, outline: usize, hole: usize) -> GeometryResult<&LineChain> {
        self.contour(outline, hole + 1)
    }

    pub fn hole_mut(&mut self, outline: usize, hole: usize) -> GeometryResult<&mut LineChain> {
        self.contour_mut(outline, hole + 1)
    }

    pub fn polygon(&self, index: usize) -> GeometryResult<&Polygon> {
        self.polys
            .get(index)
            .ok_or_else(|| GeometryError::out_of_range("outline", index, self.polys.len()))
    }

    pub fn is_empty(&self) -> bool {
        self.polys.is_empty()
    }

    pub fn outline_count(&self) -> usize {
        self.polys.len()
    }

    /// Holes of `outline`; zero when it does not exist.
    pub fn hole_count(&self, outline: usize) -> usize {
        self.polys
            .get(outline)
            .map_or(0, |p| p.len().saturating_sub(1))
    }

    /// Outlines plus holes across the set.
    pub fn contour_count(&self) -> usize {
        self.polys.iter().map(|p| p.len()).sum()
    }

    /// Vertices of a single contour.
    pub fn vertex_count(&self, outline: usize, hole: Option<usize>) -> GeometryResult<usize> {
        Ok(self.contour(outline, hole.map_or(0, |h| h + 1))?.point_count())
    }

    /// Vertices of every contour of one polygon.
    pub fn polygon_vertex_count(&self, outline: usize) -> GeometryResult<usize> {
        Ok(self.polygon(outline)?.iter().map(|c| c.point_count()).sum())
    }

    /// Vertices of every contour in the set.
    pub fn full_point_count(&self) -> usize {
        self.polys.iter().flatten().map(|c| c.point_count()).sum()
    }

    pub fn arc_count(&self) -> usize {
        self.polys.iter().flatten().map(|c| c.arc_count()).sum()
    }

    pub fn has_arcs(&self) -> bool {
        self.polys.iter().flatten().any(|c| c.has_arcs())
    }

    pub fn clear_arcs(&mut self) {
        if self.has_arcs() {
            self.polys_mut()
                .iter_mut()
                .flatten()
                .for_each(|c| c.clear_arcs());
        }
    }

    pub fn has_holes(&self) -> bool {
        self.polys.iter().any(|p| p.len() > 1)
    }

    /// Some polygon has two hole vertices at the same position.
    pub fn has_touching_holes(&self) -> bool {
        self.polys.iter().any(|poly| {
            let mut seen = HashSet::new();
            poly.iter()
                .skip(1)
                .flat_map(|h| h.points().iter())
                .any(|p| !seen.insert(*p))
        })
    }

    /// Enclosed area: outlines minus holes.
    pub fn area(&self) -> f64 {
        self.polys.iter().map(polygon_area).sum()
    }

    /// Make outlines counter-clockwise and holes clockwise.
    pub fn normalize_orientation(&mut self) {
        for poly in self.polys_mut() {
            for (i, chain) in poly.iter_mut().enumerate() {
                chain.set_orientation(i == 0);
            }
        }
    }

    /// Digest of every contour's vertices and arc tags.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.polys.len().hash(&mut hasher);
        for poly in &self.polys {
            poly.len().hash(&mut hasher);
            for chain in poly {
                chain.hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    pub fn layout(&self) -> ContourLayout {
        ContourLayout::new(
            self.polys
                .iter()
                .map(|p| p.iter().map(|c| c.point_count()).collect())
                .collect(),
        )
    }

    pub fn global_index(&self, index: VertexIndex) -> GeometryResult<usize> {
        self.layout()
            .to_global(index)
            .ok_or_else(|| GeometryError::out_of_range("vertex", index.vertex, self.full_point_count()))
    }

    pub fn relative_index(&self, global: usize) -> GeometryResult<VertexIndex> {
        self.layout()
            .to_relative(global)
            .ok_or_else(|| GeometryError::out_of_range("vertex", global, self.full_point_count()))
    }

    /// Global indexes of the previous and next vertex on the same contour.
    pub fn neighbour_indexes(&self, global: usize) -> GeometryResult<(usize, usize)> {
        self.layout()
            .neighbours(global)
            .ok_or_else(|| GeometryError::out_of_range("vertex", global, self.full_point_count()))
    }

    pub fn is_vertex_in_hole(&self, global: usize) -> GeometryResult<bool> {
        Ok(self.relative_index(global)?.is_hole())
    }

    pub fn vertex_at(&self, index: VertexIndex) -> GeometryResult<Point> {
        let chain = self.contour(index.polygon, index.contour)?;
        chain
            .get_point(index.vertex)
            .ok_or_else(|| GeometryError::out_of_range("vertex", index.vertex, chain.point_count()))
    }

    /// Vertex by global index.
    pub fn cvertex(&self, global: usize) -> GeometryResult<Point> {
        self.vertex_at(self.relative_index(global)?)
    }

    pub fn set_vertex_at(&mut self, index: VertexIndex, p: Point) -> GeometryResult<()> {
        self.contour_mut(index.polygon, index.contour)?
            .set_point(index.vertex, p)
    }

    pub fn set_vertex(&mut self, global: usize, p: Point) -> GeometryResult<()> {
        let index = self.relative_index(global)?;
        self.set_vertex_at(index, p)
    }

    /// Insert `p` before the vertex at `global`.
    pub fn insert_vertex(&mut self, global: usize, p: Point) -> GeometryResult<()> {
        let index = self.relative_index(global)?;
        self.contour_mut(index.polygon, index.contour)?
            .insert(index.vertex, p)
    }

    pub fn remove_vertex(&mut self, global: usize) -> GeometryResult<Point> {
        let index = self.relative_index(global)?;
        self.contour_mut(index.polygon, index.contour)?
            .remove(index.vertex)
    }

    /// Every vertex with its structured index, in global order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexIndex, Point)> + '_ {
        self.polys.iter().enumerate().flat_map(|(pi, poly)| {
            poly.iter().enumerate().flat_map(move |(ci, chain)| {
                chain
                    .points()
                    .iter()
                    .enumerate()
                    .map(move |(vi, p)| (VertexIndex::new(pi, ci, vi), *p))
            })
        })
    }

    /// Every closed-contour edge, keyed by the index of its first vertex.
    pub fn segments(&self) -> impl Iterator<Item = (VertexIndex, Seg)> + '_ {
        self.polys.iter().enumerate().flat_map(|(pi, poly)| {
            poly.iter().enumerate().flat_map(move |(ci, chain)| {
                (0..chain.segment_count())
                    .map(move |si| (VertexIndex::new(pi, ci, si), chain.segment(si)))
            })
        })
    }

    pub fn bbox(&self) -> BBox {
        let mut bbox = BBox::empty();
        for poly in &self.polys {
            if let Some(outline) = poly.first() {
                bbox.merge(&outline.bbox());
            }
        }
        bbox
    }

    pub fn bbox_of_polygon(&self, index: usize) -> GeometryResult<BBox> {
        Ok(self.outline(index)?.bbox())
    }

    /// Store a bounding box in every contour for early rejection.
    ///
    /// Caches are not content, so the triangulation stays valid.
    pub fn build_bbox_caches(&mut self) {
        for chain in self.polys.iter_mut().flatten() {
            chain.generate_bbox_cache();
        }
    }

    /// Set bounding box from the outline caches, computing any that are
    /// missing.
    pub fn bbox_from_caches(&self) -> BBox {
        let mut bbox = BBox::empty();
        for outline in self.polys.iter().filter_map(|p| p.first()) {
            let b = outline.bbox_cache().unwrap_or_else(|| outline.bbox());
            bbox.merge(&b);
        }
        bbox
    }
}

/// Outline area minus hole areas.
pub(crate) fn polygon_area(poly: &Polygon) -> f64 {
    let mut iter = poly.iter();
    let outer = iter.next().map_or(0.0, |c| c.area());
    outer - iter.map(|h| h.area()).sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_with_hole() -> PolySet {
        let mut set = PolySet::new();
        set.add_outline(LineChain::from_xy(&[(0, 0), (10, 0), (10, 10), (0, 10)]));
        set.add_hole(LineChain::from_xy(&[(4, 4), (6, 4), (6, 6), (4, 6)]), None)
            .unwrap();
        set
    }

    #[test]
    fn test_area_with_hole() {
        let set = square_with_hole();
        assert_eq!(set.area(), 96.0);
        assert_eq!(set.outline_count(), 1);
        assert_eq!(set.hole_count(0), 1);
        assert_eq!(set.full_point_count(), 8);
        assert!(set.has_holes());
    }

    #[test]
    fn test_append_requires_outline() {
        let mut set = PolySet::new();
        assert_eq!(set.append_xy(0, 0), Err(GeometryError::EmptySet));
        set.new_outline();
        assert_eq!(set.append_xy(0, 0), Ok(1));
        assert_eq!(set.append_xy(5, 0), Ok(2));
        assert_eq!(set.new_hole(None), Ok(0));
        assert_eq!(set.append(Point::new(1, 1), None, Some(0)), Ok(1));
        assert!(set.append(Point::new(1, 1), None, Some(3)).is_err());
    }

    #[test]
    fn test_vertex_access_by_global_index() {
        let mut set = square_with_hole();
        assert_eq!(set.cvertex(5).unwrap(), Point::new(6, 4));
        assert!(set.is_vertex_in_hole(5).unwrap());
        assert!(!set.is_vertex_in_hole(3).unwrap());
        assert_eq!(set.neighbour_indexes(4).unwrap(), (7, 5));

        set.set_vertex(0, Point::new(-1, -1)).unwrap();
        assert_eq!(set.outline(0).unwrap().point(0), Point::new(-1, -1));
        assert!(matches!(
            set.cvertex(8),
            Err(GeometryError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_insert_and_remove_vertex() {
        let mut set = square_with_hole();
        set.insert_vertex(1, Point::new(5, -2)).unwrap();
        assert_eq!(set.vertex_count(0, None).unwrap(), 5);
        assert_eq!(set.cvertex(1).unwrap(), Point::new(5, -2));
        assert_eq!(set.remove_vertex(1).unwrap(), Point::new(5, -2));
        assert_eq!(set.area(), 96.0);
    }

    #[test]
    fn test_remove_shifts_indices() {
        let mut set = square_with_hole();
        set.add_outline(LineChain::from_xy(&[(20, 0), (30, 0), (30, 10)]));
        set.remove_outline(0).unwrap();
        assert_eq!(set.outline_count(), 1);
        assert_eq!(set.outline(0).unwrap().point(0), Point::new(20, 0));
        assert!(set.remove_outline(3).is_err());
    }

    #[test]
    fn test_touching_holes() {
        let mut set = square_with_hole();
        assert!(!set.has_touching_holes());
        set.add_hole(LineChain::from_xy(&[(6, 6), (8, 6), (8, 8)]), Some(0))
            .unwrap();
        assert!(set.has_touching_holes());
    }

    #[test]
    fn test_content_hash_tracks_vertices() {
        let mut set = square_with_hole();
        let h0 = set.content_hash();
        assert_eq!(h0, set.clone().content_hash());
        set.set_vertex(2, Point::new(11, 10)).unwrap();
        assert_ne!(h0, set.content_hash());
    }

    #[test]
    fn test_iterators_follow_global_order() {
        let set = square_with_hole();
        let indexed: Vec<_> = set.vertices().collect();
        assert_eq!(indexed.len(), 8);
        for (g, (idx, p)) in indexed.iter().enumerate() {
            assert_eq!(set.global_index(*idx).unwrap(), g);
            assert_eq!(set.cvertex(g).unwrap(), *p);
        }
        assert_eq!(set.segments().count(), 8);
    }

    #[test]
    fn test_subset_and_bbox() {
        let mut set = square_with_hole();
        set.add_outline(LineChain::from_xy(&[(20, 0), (30, 0), (30, 10)]));
        let sub = set.unit_set(1).unwrap();
        assert_eq!(sub.outline_count(), 1);
        assert_eq!(sub.bbox().min, Point::new(20, 0));
        assert_eq!(set.bbox().max, Point::new(30, 10));
        assert!(set.subset(1, 2).is_err());

        set.build_bbox_caches();
        assert_eq!(set.bbox_from_caches(), set.bbox());
    }
}
