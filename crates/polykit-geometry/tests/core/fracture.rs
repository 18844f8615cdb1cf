use polykit_geometry::{LineChain, PolySet};

fn frame() -> PolySet {
    let mut set = PolySet::new();
    set.add_outline(LineChain::from_xy(&[(0, 0), (10, 0), (10, 10), (0, 10)]));
    set.add_hole(LineChain::from_xy(&[(4, 4), (6, 4), (6, 6), (4, 6)]), None)
        .unwrap();
    set
}

#[test]
fn test_frame_fracture_round_trip() {
    let mut set = frame();
    assert_eq!(set.area(), 96.0);

    set.fracture().unwrap();
    assert_eq!(set.outline_count(), 1);
    assert_eq!(set.contour_count(), 1);
    assert!(!set.has_holes());
    assert_eq!(set.area(), 96.0);

    set.unfracture().unwrap();
    assert_eq!(set.outline_count(), 1);
    assert_eq!(set.hole_count(0), 1);
    assert_eq!(set.area(), 96.0);
}

#[test]
fn test_fracture_without_holes_is_stable() {
    let mut set = PolySet::new();
    set.add_outline(LineChain::from_xy(&[(0, 0), (100, 0), (100, 50), (0, 50)]));
    set.add_outline(LineChain::from_xy(&[(200, 0), (300, 0), (250, 80)]));
    let area = set.area();

    set.fracture().unwrap();
    set.unfracture().unwrap();
    assert_eq!(set.outline_count(), 2);
    assert!(!set.has_holes());
    assert_eq!(set.area(), area);
}

#[test]
fn test_fracture_invalidates_triangulation() {
    let mut set = frame();
    set.triangulate().unwrap();
    assert!(set.is_triangulation_up_to_date());
    set.fracture().unwrap();
    assert!(!set.is_triangulation_up_to_date());
}
