//! Cached triangulated view of a polygon set.
//!
//! The view is rebuilt lazily. It is trusted while the stored content hash
//! and parameters match the set; a rebuild is serialised behind a mutex so
//! concurrent readers never race on it.

use crate::chain::LineChain;
use crate::fracture::fracture_polygon;
use crate::params::TriangulationParams;
use crate::poly_set::{polygon_area, PolySet, Polygon};
use crate::queries::ring_area2;
use earcutr::earcut;
use parking_lot::{Mutex, RwLock};
use polykit_core::{BBox, GeometryResult, Point, Seg};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// One triangle of the view, tagged with the outline it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub a: Point,
    pub b: Point,
    pub c: Point,
    pub source_outline: usize,
}

impl Triangle {
    pub fn area(&self) -> f64 {
        ring_area2(&[self.a, self.b, self.c]).abs() as f64 / 2.0
    }

    pub fn edges(&self) -> [Seg; 3] {
        [
            Seg::new(self.a, self.b),
            Seg::new(self.b, self.c),
            Seg::new(self.c, self.a),
        ]
    }

    pub fn bbox(&self) -> BBox {
        BBox::from_points(&[self.a, self.b, self.c])
    }

    /// Inside or on the boundary.
    pub fn contains(&self, p: Point) -> bool {
        let d1 = (self.b - self.a).cross(p - self.a).signum();
        let d2 = (self.c - self.b).cross(p - self.b).signum();
        let d3 = (self.a - self.c).cross(p - self.c).signum();
        let has_neg = d1 < 0 || d2 < 0 || d3 < 0;
        let has_pos = d1 > 0 || d2 > 0 || d3 > 0;
        !(has_neg && has_pos)
    }

    /// Squared distance from `p`, zero when inside.
    pub fn squared_distance(&self, p: Point) -> i64 {
        if self.contains(p) {
            return 0;
        }
        self.edges()
            .iter()
            .map(|e| e.square_distance_to_point(p))
            .min()
            .unwrap_or(i64::MAX)
    }

    /// Squared distance from `seg`, zero when they meet.
    pub fn squared_distance_to_seg(&self, seg: &Seg) -> i64 {
        if self.contains(seg.a) || self.contains(seg.b) {
            return 0;
        }
        self.edges()
            .iter()
            .map(|e| e.square_distance_to_seg(seg))
            .min()
            .unwrap_or(i64::MAX)
    }
}

/// Triangles of one outline, as indexes into a shared vertex list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriangulatedPolygon {
    source_outline: usize,
    vertices: Vec<Point>,
    triangles: Vec<[u32; 3]>,
}

impl TriangulatedPolygon {
    pub fn new(source_outline: usize) -> Self {
        Self {
            source_outline,
            ..Self::default()
        }
    }

    pub fn source_outline(&self) -> usize {
        self.source_outline
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let [a, b, c] = *self.triangles.get(index)?;
        Some(Triangle {
            a: *self.vertices.get(a as usize)?,
            b: *self.vertices.get(b as usize)?,
            c: *self.vertices.get(c as usize)?,
            source_outline: self.source_outline,
        })
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangles.len()).filter_map(move |i| self.triangle(i))
    }

    pub fn area(&self) -> f64 {
        self.triangles().map(|t| t.area()).sum()
    }

    fn extend(&mut self, vertices: Vec<Point>, triangles: Vec<[u32; 3]>) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(vertices);
        self.triangles
            .extend(triangles.into_iter().map(|[a, b, c]| [a + base, b + base, c + base]));
    }
}

struct CacheData {
    hash: Option<u64>,
    params: Option<TriangulationParams>,
    polys: Arc<[TriangulatedPolygon]>,
}

/// Triangulation owned by a [`PolySet`].
pub struct TriangulationCache {
    data: RwLock<CacheData>,
    rebuild_lock: Mutex<()>,
    valid: AtomicBool,
    generation: AtomicU64,
}

impl Default for TriangulationCache {
    fn default() -> Self {
        Self {
            data: RwLock::new(CacheData {
                hash: None,
                params: None,
                polys: Arc::from(Vec::new()),
            }),
            rebuild_lock: Mutex::new(()),
            valid: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }
}

impl TriangulationCache {
    /// Stop trusting the stored view until its hash is checked again.
    pub fn invalidate(&mut self) {
        *self.valid.get_mut() = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Number of rebuilds so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn lookup(&self, hash: Option<u64>, params: &TriangulationParams) -> Option<Arc<[TriangulatedPolygon]>> {
        let data = self.data.read();
        let hash_ok = hash.is_none() || data.hash == hash;
        (data.hash.is_some() && hash_ok && data.params.as_ref() == Some(params))
            .then(|| data.polys.clone())
    }
}

/// Split `poly` along a regular grid of `extent`-sized cells.
fn partition(poly: &Polygon, index: usize, params: &TriangulationParams) -> Vec<Polygon> {
    let whole = || vec![poly.clone()];
    let Some(outline) = poly.first() else {
        return Vec::new();
    };
    let bbox = outline.bbox();
    let extent = params.partition_extent as i64;
    if !params.partition
        || extent <= 0
        || bbox.is_empty()
        || (bbox.width() <= extent && bbox.height() <= extent)
    {
        return whole();
    }

    let columns = (bbox.width() + extent - 1) / extent;
    let rows = (bbox.height() + extent - 1) / extent;
    let mut source = PolySet::from_polygons(whole());
    source.clear_arcs();

    let mut cells = Vec::new();
    for row in 0..rows {
        for col in 0..columns {
            let x0 = bbox.min.x as i64 + col * extent;
            let y0 = bbox.min.y as i64 + row * extent;
            let x1 = (x0 + extent).min(bbox.max.x as i64);
            let y1 = (y0 + extent).min(bbox.max.y as i64);
            let rect = BBox::new(
                Point::new(x0 as i32, y0 as i32),
                Point::new(x1 as i32, y1 as i32),
            );
            let cell = PolySet::from(LineChain::closed(rect.corners().to_vec()));
            let mut piece = PolySet::new();
            if let Err(e) = piece.boolean_intersection_of(&source, &cell) {
                warn!(
                    "Partitioning outline {} failed ({}); triangulating it whole",
                    index, e
                );
                return whole();
            }
            cells.extend(piece.into_polygons());
        }
    }
    cells
}

/// Ear-clip a flattened ring list and check that the triangles cover exactly
/// `expected` (twice the area).
fn ear_clip(points: &[Point], holes: &[usize], expected: i128) -> Option<Vec<[u32; 3]>> {
    if points.len() < 3 || expected <= 0 {
        return None;
    }
    let coords: Vec<f64> = points
        .iter()
        .flat_map(|p| [p.x as f64, p.y as f64])
        .collect();
    let idx = earcut(&coords, holes, 2).ok()?;
    if idx.is_empty() || idx.len() % 3 != 0 {
        return None;
    }

    let covered: i128 = idx
        .chunks_exact(3)
        .map(|t| ring_area2(&[points[t[0]], points[t[1]], points[t[2]]]).abs())
        .sum();
    let slack = (expected / 1_000_000).max(2);
    if (covered - expected).abs() > slack {
        debug!("ear clipping covered {} of {}", covered, expected);
        return None;
    }

    idx.chunks_exact(3)
        .map(|t| {
            Some([
                u32::try_from(t[0]).ok()?,
                u32::try_from(t[1]).ok()?,
                u32::try_from(t[2]).ok()?,
            ])
        })
        .collect()
}

/// Fracture and ear-clip one cell, merging close vertices between retries.
fn tessellate(
    cell: &Polygon,
    index: usize,
    params: &TriangulationParams,
) -> Option<(Vec<Point>, Vec<[u32; 3]>)> {
    if polygon_area(cell) == 0.0 {
        return Some((Vec::new(), Vec::new()));
    }

    for pass in 0..=params.max_simplify_passes {
        let mut work = cell.clone();
        if pass > 0 {
            let tolerance = params.simplify_step.saturating_mul(pass as i32);
            for chain in &mut work {
                chain.merge_close_vertices(tolerance);
            }
            work.retain(|c| c.point_count() >= 3);
            if work.is_empty() {
                break;
            }
        }

        let contour = fracture_polygon(&work, index);
        let expected = ring_area2(contour.points()).abs();
        if let Some(triangles) = ear_clip(contour.points(), &[], expected) {
            return Some((contour.points().to_vec(), triangles));
        }

        // Let the ear clipper bridge the holes itself.
        let mut points = Vec::new();
        let mut holes = Vec::new();
        let mut expected: i128 = 0;
        for (i, chain) in work.iter().enumerate() {
            let area = ring_area2(chain.points()).abs();
            if i == 0 {
                expected += area;
            } else {
                holes.push(points.len());
                expected -= area;
            }
            points.extend_from_slice(chain.points());
        }
        if let Some(triangles) = ear_clip(&points, &holes, expected) {
            return Some((points, triangles));
        }
        debug!("triangulation of outline {} failed on pass {}", index, pass);
    }
    None
}

fn triangulate_polygon(poly: &Polygon, index: usize, params: &TriangulationParams) -> TriangulatedPolygon {
    let mut result = TriangulatedPolygon::new(index);
    for cell in partition(poly, index, params) {
        match tessellate(&cell, index, params) {
            Some((vertices, triangles)) => result.extend(vertices, triangles),
            None => {
                warn!("Triangulation of outline {} failed; leaving it empty", index);
                return TriangulatedPolygon::new(index);
            }
        }
    }
    result
}

impl PolySet {
    /// Triangulated view with default parameters.
    pub fn triangulate(&self) -> GeometryResult<Arc<[TriangulatedPolygon]>> {
        self.triangulate_with(&TriangulationParams::default())
    }

    /// Triangulated view, one entry per outline, rebuilt only when the
    /// content hash or parameters changed.
    pub fn triangulate_with(
        &self,
        params: &TriangulationParams,
    ) -> GeometryResult<Arc<[TriangulatedPolygon]>> {
        let cache = &self.tri_cache;
        if cache.is_valid() {
            if let Some(hit) = cache.lookup(None, params) {
                debug!("triangulation cache hit");
                return Ok(hit);
            }
        }

        let hash = self.content_hash();
        if let Some(hit) = cache.lookup(Some(hash), params) {
            cache.valid.store(true, Ordering::Release);
            debug!("triangulation cache revalidated by hash");
            return Ok(hit);
        }

        let _guard = cache.rebuild_lock.lock();
        if let Some(hit) = cache.lookup(Some(hash), params) {
            cache.valid.store(true, Ordering::Release);
            return Ok(hit);
        }

        let mut polys = Vec::new();
        polys.try_reserve(self.outline_count())?;
        for (index, poly) in self.polygons().iter().enumerate() {
            polys.push(triangulate_polygon(poly, index, params));
        }
        let polys: Arc<[TriangulatedPolygon]> = Arc::from(polys);
        {
            let mut data = cache.data.write();
            data.hash = Some(hash);
            data.params = Some(*params);
            data.polys = polys.clone();
        }
        let generation = cache.generation.fetch_add(1, Ordering::AcqRel) + 1;
        cache.valid.store(true, Ordering::Release);

        debug!(
            "triangulation rebuilt (generation {}): {} triangles",
            generation,
            polys.iter().map(|p| p.triangle_count()).sum::<usize>()
        );
        Ok(polys)
    }

    /// Number of times the triangulated view has been rebuilt.
    pub fn triangulation_generation(&self) -> u64 {
        self.tri_cache.generation()
    }

    /// The triangulated view is currently trusted without rehashing.
    pub fn is_triangulation_up_to_date(&self) -> bool {
        self.tri_cache.is_valid()
    }

    /// Every triangle of the view, in outline order.
    pub fn triangles(&self) -> GeometryResult<Vec<Triangle>> {
        Ok(self
            .triangulate()?
            .iter()
            .flat_map(|p| p.triangles().collect::<Vec<_>>())
            .collect())
    }
}
