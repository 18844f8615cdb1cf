use polykit_geometry::{
    BooleanOp, ClipBackend, CsgClipper, GeometryError, GeometryResult, IntersectionEvent,
    LineChain, PathNode, PathTree, Point, PolySet, ShapeArc, TaggedPolygon,
};
use std::collections::HashSet;
use std::f64::consts::FRAC_PI_2;

fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> PolySet {
    PolySet::from(LineChain::from_xy(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)]))
}

fn assert_area(set: &PolySet, expected: f64) {
    let area = set.area();
    assert!(
        (area - expected).abs() <= expected.max(1.0) * 1e-6 + 4.0,
        "area {} expected {}",
        area,
        expected
    );
}

fn op(a: &PolySet, b: &PolySet, op: BooleanOp) -> PolySet {
    let mut result = a.clone();
    result.boolean_op(op, b).unwrap();
    result
}

#[test]
fn test_overlapping_squares() {
    let a = rect(0, 0, 10_000, 10_000);
    let b = rect(5_000, 5_000, 15_000, 15_000);
    assert_area(&op(&a, &b, BooleanOp::Union), 1.75e8);
    assert_area(&op(&a, &b, BooleanOp::Intersection), 2.5e7);
    assert_area(&op(&a, &b, BooleanOp::Difference), 7.5e7);
    assert_area(&op(&a, &b, BooleanOp::Xor), 1.5e8);
}

#[test]
fn test_boolean_identities() {
    let a = rect(0, 0, 10_000, 6_000);
    let b = rect(3_000, -2_000, 7_000, 9_000);

    let ab = op(&a, &b, BooleanOp::Union);
    let ba = op(&b, &a, BooleanOp::Union);
    assert_area(&ab, ba.area());

    assert_area(&op(&a, &a, BooleanOp::Intersection), a.area());
    assert!(op(&a, &a, BooleanOp::Difference).is_empty());

    let mut sym = PolySet::new();
    sym.boolean_add_of(
        &op(&a, &b, BooleanOp::Difference),
        &op(&b, &a, BooleanOp::Difference),
    )
    .unwrap();
    assert_area(&op(&a, &b, BooleanOp::Xor), sym.area());
}

#[test]
fn test_subtracting_inner_square_makes_hole() {
    let mut set = rect(0, 0, 1_000, 1_000);
    set.boolean_subtract(&rect(400, 400, 600, 600)).unwrap();
    assert_eq!(set.outline_count(), 1);
    assert_eq!(set.hole_count(0), 1);
    assert_area(&set, 960_000.0);
    assert!(!set.outline(0).unwrap().is_clockwise());
    assert!(set.hole(0, 0).unwrap().is_clockwise());
}

#[test]
fn test_disjoint_union_keeps_both() {
    let mut set = rect(0, 0, 100, 100);
    set.boolean_add(&rect(200, 0, 300, 100)).unwrap();
    assert_eq!(set.outline_count(), 2);
    assert_area(&set, 20_000.0);
}

#[test]
fn test_arcs_in_multi_outline_set_rejected() {
    let mut set = rect(0, 0, 100, 100);
    set.add_outline(LineChain::from_xy(&[(200, 0), (300, 0), (300, 100)]));
    set.outline_mut(1)
        .unwrap()
        .append_arc(&ShapeArc::from_center(Point::new(250, 100), 50, 0.0, 1.0), 5);
    let before = set.clone();
    let err = set.boolean_add(&rect(50, 50, 250, 60)).unwrap_err();
    assert_eq!(err, GeometryError::ArcsInBooleanOp);
    assert_eq!(set, before);
}

#[test]
fn test_island_inside_hole() {
    let mut set = rect(0, 0, 1_000, 1_000);
    set.boolean_subtract(&rect(100, 100, 900, 900)).unwrap();
    set.boolean_add(&rect(300, 300, 700, 700)).unwrap();
    assert_eq!(set.outline_count(), 2);
    assert_eq!(set.hole_count(0) + set.hole_count(1), 1);
    assert_area(&set, 1e6 - 640_000.0 + 160_000.0);
}

#[test]
fn test_custom_backend_is_used() {
    struct Refusing;
    impl ClipBackend for Refusing {
        fn execute(
            &self,
            _op: BooleanOp,
            _subject: &[TaggedPolygon],
            _clip: &[TaggedPolygon],
            _on_intersection: &mut dyn FnMut(&IntersectionEvent) -> Option<u32>,
        ) -> GeometryResult<PathTree> {
            Err(GeometryError::invalid("backend", "refused"))
        }
    }

    let mut set = rect(0, 0, 10, 10);
    let before = set.clone();
    assert!(set
        .boolean_op_with(BooleanOp::Union, &rect(5, 5, 20, 20), &Refusing)
        .is_err());
    assert_eq!(set, before);

    let mut set = rect(0, 0, 10, 10);
    set.boolean_op_with(BooleanOp::Union, &rect(5, 5, 20, 20), &CsgClipper)
        .unwrap();
    assert_area(&set, 100.0 + 225.0 - 25.0);
}

fn quarter_disc(radius: i32) -> PolySet {
    let mut chain = LineChain::new();
    chain.set_closed(true);
    chain.append_xy(0, 0);
    chain.append_arc(&ShapeArc::from_center(Point::new(0, 0), radius, 0.0, FRAC_PI_2), 500);
    PolySet::from(chain)
}

fn arc_points(set: &PolySet) -> HashSet<Point> {
    let outline = set.outline(0).unwrap();
    (0..outline.point_count())
        .filter(|&i| outline.is_arc_vertex(i))
        .map(|i| outline.point(i))
        .collect()
}

#[test]
fn test_simplify_keeps_arc_provenance() {
    let mut set = quarter_disc(100_000);
    let tagged = arc_points(&set);
    let area = set.area();

    set.simplify().unwrap();
    assert_eq!(set.outline_count(), 1);
    assert_eq!(set.arc_count(), 1);
    assert_area(&set, area);

    let outline = set.outline(0).unwrap();
    for i in 0..outline.point_count() {
        if tagged.contains(&outline.point(i)) {
            assert!(outline.is_arc_vertex(i), "vertex {} lost its arc", outline.point(i));
        }
    }
    assert!(!outline.is_arc_vertex(
        outline.points().iter().position(|p| *p == Point::new(0, 0)).unwrap()
    ));
}

/// Keeps the part of the subject left of `x`, reporting every cut vertex.
struct ClipLeftOf {
    x: i32,
}

impl ClipBackend for ClipLeftOf {
    fn execute(
        &self,
        _op: BooleanOp,
        subject: &[TaggedPolygon],
        _clip: &[TaggedPolygon],
        on_intersection: &mut dyn FnMut(&IntersectionEvent) -> Option<u32>,
    ) -> GeometryResult<PathTree> {
        let mut tree = PathTree::new();
        for path in subject.iter().filter_map(|poly| poly.first()) {
            let n = path.points.len();
            let mut node = PathNode::default();
            for i in 0..n {
                let (p, q) = (path.points[i], path.points[(i + 1) % n]);
                let (tp, tq) = (path.tags[i], path.tags[(i + 1) % n]);
                if p.x <= self.x {
                    node.points.push(p);
                    node.tags.push(tp);
                }
                if (p.x < self.x) != (q.x < self.x) && p.x != self.x && q.x != self.x {
                    let t = (self.x - p.x) as f64 / (q.x - p.x) as f64;
                    let y = (p.y as f64 + t * (q.y - p.y) as f64).round() as i32;
                    let cut = Point::new(self.x, y);
                    let tag = on_intersection(&IntersectionEvent {
                        point: cut,
                        e1: (tp, tq),
                        e2: (None, None),
                    });
                    node.points.push(cut);
                    node.tags.push(tag);
                }
            }
            tree.add_root(node);
        }
        Ok(tree)
    }
}

#[test]
fn test_cut_vertices_on_arc_keep_arc_tag() {
    let mut set = quarter_disc(100_000);
    set.boolean_op_with(BooleanOp::Intersection, &PolySet::new(), &ClipLeftOf { x: 50_000 })
        .unwrap();

    let outline = set.outline(0).unwrap();
    assert_eq!(set.arc_count(), 1);
    let on_arc = outline
        .points()
        .iter()
        .position(|p| p.x == 50_000 && p.y > 0)
        .unwrap();
    let on_base = outline
        .points()
        .iter()
        .position(|p| *p == Point::new(50_000, 0))
        .unwrap();
    assert!(outline.is_arc_vertex(on_arc));
    assert!(!outline.is_arc_vertex(on_base));

    let arc = &outline.arcs()[0];
    assert!((arc.radius() - 100_000.0).abs() < 2.0);
    assert_eq!(arc.end(), Point::new(0, 100_000));
}
