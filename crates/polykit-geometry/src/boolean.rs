//! Boolean operations through an external clipping primitive.
//!
//! Both operands are handed to a [`ClipBackend`] as closed paths carrying
//! one arc tag per vertex. The backend reports every vertex it creates at an
//! intersection through a callback, which answers with the tag that vertex
//! should carry. The backend returns a nested [`PathTree`] that is walked
//! depth-first to rebuild the set: even depths are outlines, odd depths are
//! holes.

use crate::arc::ShapeArc;
use crate::chain::LineChain;
use crate::poly_set::{PolySet, Polygon};
use crate::queries::{point_in_ring, ring_area2};
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use polykit_core::{GeometryError, GeometryResult, Point, PointF, Seg};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// The four set operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
    Xor,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Union => write!(f, "union"),
            Self::Difference => write!(f, "difference"),
            Self::Intersection => write!(f, "intersection"),
            Self::Xor => write!(f, "xor"),
        }
    }
}

/// A closed input path with one arc tag per vertex.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaggedPath {
    pub points: Vec<Point>,
    pub tags: Vec<Option<u32>>,
}

/// Paths of one polygon: the outline then its holes.
pub type TaggedPolygon = Vec<TaggedPath>;

/// A vertex the backend created where two input edges cross.
///
/// `e1` and `e2` hold the tags at both ends of the two input edges that meet
/// at `point`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEvent {
    pub point: Point,
    pub e1: (Option<u32>, Option<u32>),
    pub e2: (Option<u32>, Option<u32>),
}

/// One closed path of a backend result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathNode {
    pub points: Vec<Point>,
    pub tags: Vec<Option<u32>>,
    pub children: Vec<usize>,
}

/// Nested backend output: outer boundaries contain holes, which contain
/// further outer boundaries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathTree {
    nodes: Vec<PathNode>,
    roots: Vec<usize>,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, node: PathNode) -> usize {
        self.nodes.push(node);
        let id = self.nodes.len() - 1;
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent: usize, node: PathNode) -> usize {
        self.nodes.push(node);
        let id = self.nodes.len() - 1;
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn node(&self, id: usize) -> Option<&PathNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in depth-first order with their depth.
    pub fn depth_first(&self) -> Vec<(usize, usize)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&r| (r, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            order.push((id, depth));
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
            }
        }
        order
    }
}

/// A boolean-clipping primitive.
pub trait ClipBackend {
    /// Combine `subject` with `clip`.
    ///
    /// Output vertices that coincide with an input vertex keep its tag; every
    /// other vertex is passed to `on_intersection`, whose answer becomes its
    /// tag.
    fn execute(
        &self,
        op: BooleanOp,
        subject: &[TaggedPolygon],
        clip: &[TaggedPolygon],
        on_intersection: &mut dyn FnMut(&IntersectionEvent) -> Option<u32>,
    ) -> GeometryResult<PathTree>;
}

/// [`ClipBackend`] over `csgrs` sketches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsgClipper;

#[derive(Clone, Copy)]
struct TaggedEdge {
    seg: Seg,
    tags: (Option<u32>, Option<u32>),
    min_x: i32,
    max_x: i32,
}

fn sketch_of(polys: &[TaggedPolygon]) -> Sketch<()> {
    let coords = |path: &TaggedPath| -> Vec<[f64; 2]> {
        path.points.iter().map(|p| [p.x as f64, p.y as f64]).collect()
    };

    let pieces: Vec<Sketch<()>> = polys
        .iter()
        .filter_map(|poly| {
            let outline = poly.first()?;
            if outline.points.len() < 3 {
                return None;
            }
            let mut sketch: Sketch<()> = Sketch::polygon(&coords(outline), None);
            for hole in poly.iter().skip(1).filter(|h| h.points.len() >= 3) {
                let cut: Sketch<()> = Sketch::polygon(&coords(hole), None);
                sketch = sketch.difference(&cut);
            }
            Some(sketch)
        })
        .collect();

    union_all(pieces)
}

/// Union in a balanced tree rather than one long chain.
fn union_all(mut pieces: Vec<Sketch<()>>) -> Sketch<()> {
    while pieces.len() > 1 {
        let mut next = Vec::with_capacity(pieces.len().div_ceil(2));
        let mut iter = pieces.into_iter();
        while let Some(a) = iter.next() {
            match iter.next() {
                Some(b) => next.push(a.union(&b)),
                None => next.push(a),
            }
        }
        pieces = next;
    }
    pieces.pop().unwrap_or_else(Sketch::new)
}

/// Round a backend ring onto the grid, dropping repeats and the closing
/// vertex.
fn ring_points(coords: impl Iterator<Item = (f64, f64)>) -> Vec<Point> {
    let mut pts: Vec<Point> = Vec::new();
    for (x, y) in coords {
        let p = PointF::new(x, y).round();
        if pts.last() != Some(&p) {
            pts.push(p);
        }
    }
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    pts
}

fn locate(edges: &[TaggedEdge], p: Point) -> IntersectionEvent {
    const SNAP: i64 = 2;
    let reach = p.x.saturating_add(SNAP as i32);
    let end = edges.partition_point(|e| e.min_x <= reach);
    let mut hits: Vec<(i64, &TaggedEdge)> = edges[..end]
        .iter()
        .filter(|e| e.max_x >= p.x.saturating_sub(SNAP as i32))
        .map(|e| (e.seg.square_distance_to_point(p), e))
        .filter(|(d, _)| *d <= SNAP)
        .collect();
    hits.sort_by_key(|(d, _)| *d);

    let none = (None, None);
    IntersectionEvent {
        point: p,
        e1: hits.first().map_or(none, |(_, e)| e.tags),
        e2: hits.get(1).map_or(none, |(_, e)| e.tags),
    }
}

impl ClipBackend for CsgClipper {
    fn execute(
        &self,
        op: BooleanOp,
        subject: &[TaggedPolygon],
        clip: &[TaggedPolygon],
        on_intersection: &mut dyn FnMut(&IntersectionEvent) -> Option<u32>,
    ) -> GeometryResult<PathTree> {
        let mut known: HashMap<Point, Option<u32>> = HashMap::new();
        let mut edges: Vec<TaggedEdge> = Vec::new();
        for path in subject.iter().chain(clip).flatten() {
            let n = path.points.len();
            edges.try_reserve(n)?;
            for (i, &p) in path.points.iter().enumerate() {
                let tag = path.tags.get(i).copied().flatten();
                let entry = known.entry(p).or_insert(tag);
                if entry.is_none() {
                    *entry = tag;
                }
                let q = path.points[(i + 1) % n];
                let q_tag = path.tags.get((i + 1) % n).copied().flatten();
                edges.push(TaggedEdge {
                    seg: Seg::new(p, q),
                    tags: (tag, q_tag),
                    min_x: p.x.min(q.x),
                    max_x: p.x.max(q.x),
                });
            }
        }
        edges.sort_by_key(|e| e.min_x);

        let a = sketch_of(subject);
        let b = sketch_of(clip);
        let result = match op {
            BooleanOp::Union => a.union(&b),
            BooleanOp::Difference => a.difference(&b),
            BooleanOp::Intersection => a.intersection(&b),
            BooleanOp::Xor => a.difference(&b).union(&b.difference(&a)),
        };

        let mut tag_ring = |points: Vec<Point>| -> PathNode {
            let tags = points
                .iter()
                .map(|p| match known.get(p) {
                    Some(tag) => *tag,
                    None => on_intersection(&locate(&edges, *p)),
                })
                .collect();
            PathNode {
                points,
                tags,
                children: Vec::new(),
            }
        };

        let mp = result.to_multipolygon();
        let mut shells: Vec<(i128, Vec<Point>, Vec<Vec<Point>>)> = Vec::new();
        for poly in mp.0.iter() {
            let exterior = ring_points(poly.exterior().0.iter().map(|c| (c.x, c.y)));
            let area = ring_area2(&exterior).abs();
            if exterior.len() < 3 || area == 0 {
                continue;
            }
            let holes = poly
                .interiors()
                .iter()
                .map(|ring| ring_points(ring.0.iter().map(|c| (c.x, c.y))))
                .filter(|h| h.len() >= 3 && ring_area2(h) != 0)
                .collect();
            shells.push((area, exterior, holes));
        }

        // Larger shells first, so an island finds the hole enclosing it.
        shells.sort_by(|x, y| y.0.cmp(&x.0));

        let mut tree = PathTree::new();
        let mut hole_ids: Vec<(usize, i128)> = Vec::new();
        for (_, exterior, holes) in shells {
            let probe = exterior[0];
            let parent = hole_ids
                .iter()
                .filter(|(id, _)| {
                    tree.node(*id)
                        .is_some_and(|h| point_in_ring(&h.points, probe))
                })
                .min_by_key(|(_, area)| *area)
                .map(|(id, _)| *id);

            let node = tag_ring(exterior);
            let id = match parent {
                Some(h) => tree.add_child(h, node),
                None => tree.add_root(node),
            };
            for hole in holes {
                let area = ring_area2(&hole).abs();
                let hid = tree.add_child(id, tag_ring(hole));
                hole_ids.push((hid, area));
            }
        }

        Ok(tree)
    }
}

/// Arc table shared by both operands of one boolean call, plus the tags
/// assigned to intersection vertices.
#[derive(Debug, Default)]
struct ProvenanceTable {
    arcs: Vec<ShapeArc>,
    intersections: HashMap<Point, u32>,
}

impl ProvenanceTable {
    fn tag_set(&mut self, set: &PolySet) -> Vec<TaggedPolygon> {
        set.polygons()
            .iter()
            .map(|poly| {
                poly.iter()
                    .map(|chain| {
                        let first = self.arcs.len() as u32;
                        self.arcs.extend(chain.arcs().iter().cloned());
                        TaggedPath {
                            points: chain.points().to_vec(),
                            tags: chain.arc_tags(first),
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// A new vertex lies on an arc when an edge meeting there has that arc's
    /// tag at both ends.
    fn record(&mut self, event: &IntersectionEvent) -> Option<u32> {
        let on_arc = |e: (Option<u32>, Option<u32>)| match e {
            (Some(a), Some(b)) if a == b => Some(a),
            _ => None,
        };
        let tag = on_arc(event.e1).or_else(|| on_arc(event.e2));
        if let Some(t) = tag {
            self.intersections.insert(event.point, t);
        }
        tag
    }

    fn rebuild(&self, tree: &PathTree) -> GeometryResult<Vec<Polygon>> {
        let mut polys: Vec<Polygon> = Vec::new();
        polys.try_reserve(tree.len())?;

        let mut stack: Vec<(usize, usize, Option<usize>)> =
            tree.roots().iter().rev().map(|&r| (r, 0, None)).collect();
        while let Some((id, depth, owner)) = stack.pop() {
            let Some(node) = tree.node(id) else { continue };
            let mut chain = LineChain::from_tagged(node.points.clone(), &node.tags, &self.arcs);
            let child_owner = if depth % 2 == 0 {
                chain.set_orientation(true);
                polys.push(vec![chain]);
                Some(polys.len() - 1)
            } else {
                chain.set_orientation(false);
                if let Some(o) = owner {
                    polys[o].push(chain);
                }
                None
            };
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1, child_owner)));
        }
        Ok(polys)
    }
}

impl PolySet {
    fn check_arcs(&self, other: &PolySet) -> GeometryResult<()> {
        if (self.outline_count() > 1 || other.outline_count() > 0)
            && (self.has_arcs() || other.has_arcs())
        {
            return Err(GeometryError::ArcsInBooleanOp);
        }
        Ok(())
    }

    /// Replace this set with `self op other`, using `backend`.
    ///
    /// On error the set is unchanged.
    pub fn boolean_op_with(
        &mut self,
        op: BooleanOp,
        other: &PolySet,
        backend: &dyn ClipBackend,
    ) -> GeometryResult<()> {
        self.check_arcs(other)?;

        let mut table = ProvenanceTable::default();
        let subject = table.tag_set(self);
        let clip = table.tag_set(other);
        let tree = backend.execute(op, &subject, &clip, &mut |event| table.record(event))?;
        let polys = table.rebuild(&tree)?;

        debug!(
            "boolean {}: {} + {} outlines -> {} ({} arc intersections)",
            op,
            self.outline_count(),
            other.outline_count(),
            polys.len(),
            table.intersections.len()
        );
        self.replace_polys(polys);
        Ok(())
    }

    pub fn boolean_op(&mut self, op: BooleanOp, other: &PolySet) -> GeometryResult<()> {
        self.boolean_op_with(op, other, &CsgClipper)
    }

    pub fn boolean_add(&mut self, other: &PolySet) -> GeometryResult<()> {
        self.boolean_op(BooleanOp::Union, other)
    }

    pub fn boolean_subtract(&mut self, other: &PolySet) -> GeometryResult<()> {
        self.boolean_op(BooleanOp::Difference, other)
    }

    pub fn boolean_intersection(&mut self, other: &PolySet) -> GeometryResult<()> {
        self.boolean_op(BooleanOp::Intersection, other)
    }

    pub fn boolean_xor(&mut self, other: &PolySet) -> GeometryResult<()> {
        self.boolean_op(BooleanOp::Xor, other)
    }

    fn binary_of(&mut self, op: BooleanOp, a: &PolySet, b: &PolySet) -> GeometryResult<()> {
        let mut result = a.clone();
        result.boolean_op(op, b)?;
        self.replace_polys(result.into_polygons());
        Ok(())
    }

    /// Replace this set with `a ∪ b`.
    pub fn boolean_add_of(&mut self, a: &PolySet, b: &PolySet) -> GeometryResult<()> {
        self.binary_of(BooleanOp::Union, a, b)
    }

    /// Replace this set with `a − b`.
    pub fn boolean_subtract_of(&mut self, a: &PolySet, b: &PolySet) -> GeometryResult<()> {
        self.binary_of(BooleanOp::Difference, a, b)
    }

    /// Replace this set with `a ∩ b`.
    pub fn boolean_intersection_of(&mut self, a: &PolySet, b: &PolySet) -> GeometryResult<()> {
        self.binary_of(BooleanOp::Intersection, a, b)
    }

    /// Replace this set with `a ⊕ b`.
    pub fn boolean_xor_of(&mut self, a: &PolySet, b: &PolySet) -> GeometryResult<()> {
        self.binary_of(BooleanOp::Xor, a, b)
    }

    /// Self-union: merges overlapping outlines and removes self-overlaps.
    /// Allowed on a single curved outline; its arcs survive.
    pub fn simplify(&mut self) -> GeometryResult<()> {
        self.boolean_op(BooleanOp::Union, &PolySet::new())
    }
}
