use polykit_geometry::{LineChain, PolySet};

fn frame() -> PolySet {
    let mut set = PolySet::new();
    set.add_outline(LineChain::from_xy(&[(0, 0), (1_000, 0), (1_000, 1_000), (0, 1_000)]));
    set.add_hole(
        LineChain::from_xy(&[(400, 400), (400, 600), (600, 600), (600, 400)]),
        None,
    )
    .unwrap();
    set
}

#[test]
fn test_chamfer_cuts_outline_and_hole() {
    let set = frame().chamfer(50).unwrap();
    assert_eq!(set.outline_count(), 1);
    assert_eq!(set.hole_count(0), 1);
    assert_eq!(set.outline(0).unwrap().point_count(), 8);
    assert_eq!(set.hole(0, 0).unwrap().point_count(), 8);
    // Outline loses four corners, the hole shrinks by four.
    assert_eq!(set.area(), 1e6 - 5_000.0 - 40_000.0 + 5_000.0);
}

#[test]
fn test_fillet_keeps_arcs_and_source_untouched() {
    let source = frame();
    let rounded = source.fillet(100, 2).unwrap();
    assert_eq!(rounded.arc_count(), 8);
    assert_eq!(source.arc_count(), 0);
    assert!(rounded.outline(0).unwrap().area() < 1e6);
    assert!(rounded.hole(0, 0).unwrap().area() < 40_000.0);
    assert!(!rounded.is_any_self_intersecting());
}
