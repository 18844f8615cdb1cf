use polykit_geometry::{LineChain, Point, PolySet, QueryParams, Seg};

fn frame() -> PolySet {
    let mut set = PolySet::new();
    set.add_outline(LineChain::from_xy(&[(0, 0), (100, 0), (100, 100), (0, 100)]));
    set.add_hole(LineChain::from_xy(&[(40, 40), (60, 40), (60, 60), (40, 60)]), None)
        .unwrap();
    set
}

#[test]
fn test_contains_respects_holes() {
    let set = frame();
    assert!(set.contains(Point::new(20, 20), 0, false));
    assert!(!set.contains(Point::new(50, 50), 0, false));
    assert!(!set.contains(Point::new(150, 50), 0, false));
}

#[test]
fn test_vertices_never_fail_containment() {
    let mut set = frame();
    set.build_bbox_caches();
    let vertices: Vec<Point> = set.vertices().map(|(_, p)| p).collect();
    for v in vertices {
        let _ = set.contains(v, 0, true);
        let _ = set.contains(v, 0, false);
    }
}

#[test]
fn test_far_outside_bbox_is_never_inside() {
    let mut set = frame();
    set.build_bbox_caches();
    let accuracy = 5;
    let params = QueryParams {
        use_bbox_caches: true,
        accuracy,
    };
    let bbox = set.bbox();
    for p in [
        Point::new(bbox.min.x - 2 * accuracy - 1, 50),
        Point::new(bbox.max.x + 2 * accuracy + 1, 50),
        Point::new(50, bbox.min.y - 2 * accuracy - 1),
        Point::new(50, bbox.max.y + 2 * accuracy + 1),
    ] {
        assert!(!set.contains_with(p, &params));
        assert!(!set.contains(p, accuracy, false));
    }
}

#[test]
fn test_bowtie_is_self_intersecting() {
    let bowtie = PolySet::from(LineChain::from_xy(&[(0, 0), (10, 10), (10, 0), (0, 10)]));
    assert!(bowtie.is_self_intersecting(0).unwrap());
    assert!(bowtie.is_any_self_intersecting());

    let rect = PolySet::from(LineChain::from_xy(&[(0, 0), (10, 0), (10, 5), (0, 5)]));
    assert!(!rect.is_self_intersecting(0).unwrap());
    assert!(!rect.is_any_self_intersecting());
}

#[test]
fn test_distances() {
    let set = frame();
    let (d2, nearest) = set.squared_distance_to_point(Point::new(130, 50));
    assert_eq!(d2, 900);
    assert_eq!(nearest, Point::new(100, 50));
    assert_eq!(set.distance_to_point(Point::new(20, 20)), 0.0);

    let seg = Seg::new(Point::new(110, -20), Point::new(110, 120));
    assert_eq!(set.squared_distance_to_seg(&seg).0, 100);
}
