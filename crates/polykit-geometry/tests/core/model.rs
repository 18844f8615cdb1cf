use polykit_geometry::{GeometryError, LineChain, Point, PolySet, VertexIndex};

fn two_polygons() -> PolySet {
    let mut set = PolySet::new();
    set.add_outline(LineChain::from_xy(&[(0, 0), (10, 0), (10, 10), (0, 10)]));
    set.add_hole(LineChain::from_xy(&[(4, 4), (4, 6), (6, 6)]), None)
        .unwrap();
    set.add_outline(LineChain::from_xy(&[(20, 0), (30, 0), (30, 10), (20, 10), (20, 5)]));
    set
}

#[test]
fn test_index_round_trip() {
    let set = two_polygons();
    let total = set.full_point_count();
    assert_eq!(total, 12);
    for global in 0..total {
        let relative = set.relative_index(global).unwrap();
        assert_eq!(set.global_index(relative).unwrap(), global);
        assert_eq!(set.cvertex(global).unwrap(), set.vertex_at(relative).unwrap());
    }
    assert_eq!(set.relative_index(4).unwrap(), VertexIndex::new(0, 1, 0));
    assert_eq!(set.relative_index(7).unwrap(), VertexIndex::new(1, 0, 0));
    assert!(set.is_vertex_in_hole(5).unwrap());
    assert!(!set.is_vertex_in_hole(7).unwrap());
}

#[test]
fn test_neighbours_wrap_within_contour() {
    let set = two_polygons();
    assert_eq!(set.neighbour_indexes(4).unwrap(), (6, 5));
    assert_eq!(set.neighbour_indexes(7).unwrap(), (11, 8));
}

#[test]
fn test_out_of_range_is_an_error() {
    let set = two_polygons();
    assert!(matches!(
        set.relative_index(12),
        Err(GeometryError::IndexOutOfRange { .. })
    ));
    assert!(set.outline(2).is_err());
    assert!(set.hole(0, 1).is_err());
}

#[test]
fn test_append_builds_contours() {
    let mut set = PolySet::new();
    assert!(matches!(set.append_xy(0, 0), Err(GeometryError::EmptySet)));

    set.new_outline();
    for (x, y) in [(0, 0), (10, 0), (10, 10), (0, 10)] {
        set.append_xy(x, y).unwrap();
    }
    set.new_hole(None).unwrap();
    for (x, y) in [(2, 2), (2, 4), (4, 4)] {
        set.append(Point::new(x, y), None, Some(0)).unwrap();
    }
    assert_eq!(set.vertex_count(0, None).unwrap(), 4);
    assert_eq!(set.polygon_vertex_count(0).unwrap(), 7);
    assert_eq!(set.area(), 98.0);
}

#[test]
fn test_remove_and_subset() {
    let mut set = two_polygons();
    let sub = set.unit_set(1).unwrap();
    assert_eq!(sub.outline_count(), 1);
    assert_eq!(sub.full_point_count(), 5);

    set.remove_contour(0, Some(0)).unwrap();
    assert!(!set.has_holes());
    set.remove_outline(0).unwrap();
    assert_eq!(set, sub);
}
