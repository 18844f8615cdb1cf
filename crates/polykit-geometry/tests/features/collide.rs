use polykit_geometry::{BBox, CollisionShape, LineChain, Point, PolySet, Seg};

fn frame() -> PolySet {
    let mut set = PolySet::new();
    set.add_outline(LineChain::from_xy(&[(0, 0), (1_000, 0), (1_000, 1_000), (0, 1_000)]));
    set.add_hole(
        LineChain::from_xy(&[(400, 400), (600, 400), (600, 600), (400, 600)]),
        None,
    )
    .unwrap();
    set
}

#[test]
fn test_point_in_hole_measures_to_hole_edge() {
    let set = frame();
    let shape = CollisionShape::Point(Point::new(500, 500));
    assert_eq!(set.collide(&shape, 50).unwrap(), None);
    let hit = set.collide(&shape, 100).unwrap().unwrap();
    assert_eq!(hit.actual, 100);
}

#[test]
fn test_rect_inside_hole() {
    let set = frame();
    let shape = CollisionShape::Rect(BBox::new(Point::new(450, 450), Point::new(550, 550)));
    assert_eq!(set.collide(&shape, 10).unwrap(), None);
    let hit = set.collide(&shape, 60).unwrap().unwrap();
    assert_eq!(hit.actual, 50);
}

#[test]
fn test_open_chain_crossing_outline() {
    let set = frame();
    let mut chain = LineChain::new();
    chain.append_xy(-100, 200);
    chain.append_xy(100, 200);
    let hit = set.collide(&CollisionShape::Chain(chain), 0).unwrap();
    assert_eq!(hit.map(|c| c.actual), Some(0));
}

#[test]
fn test_wide_segment_reaches() {
    let set = frame();
    let seg = Seg::new(Point::new(1_100, 0), Point::new(1_100, 1_000));
    let thin = CollisionShape::Segment { seg, width: 20 };
    let wide = CollisionShape::Segment { seg, width: 220 };
    assert_eq!(set.collide(&thin, 0).unwrap(), None);
    assert_eq!(set.collide(&wide, 0).unwrap().map(|c| c.actual), Some(0));
}
