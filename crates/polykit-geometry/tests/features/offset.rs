use polykit_geometry::{
    inflate_line_chain, CornerStrategy, LineChain, OffsetParams, Point, PolySet,
};
use std::f64::consts::PI;

const SIDE: i32 = 10_000;
const D: i32 = 1_000;

fn square() -> PolySet {
    PolySet::from(LineChain::from_xy(&[(0, 0), (SIDE, 0), (SIDE, SIDE), (0, SIDE)]))
}

#[test]
fn test_round_inflate_area() {
    let mut set = square();
    set.inflate(D, CornerStrategy::RoundAllCorners, 10).unwrap();
    let side = SIDE as f64;
    let d = D as f64;
    let exact = side * side + 4.0 * side * d + PI * d * d;
    let area = set.area();
    assert!(area <= exact + 50_000.0, "area {}", area);
    assert!(area > exact - 4.0 * d * d * 0.05, "area {}", area);
    assert_eq!(set.outline_count(), 1);
    assert!(!set.is_any_self_intersecting());
}

#[test]
fn test_mitre_inflate_is_square() {
    let mut set = square();
    set.inflate_with(D, &OffsetParams::new(CornerStrategy::AllowAcuteCorners, 10))
        .unwrap();
    let grown = (SIDE + 2 * D) as f64;
    assert!((set.area() - grown * grown).abs() < grown * 4.0);
    assert_eq!(set.bbox().min, Point::new(-D, -D));
}

#[test]
fn test_inflate_then_deflate_is_bounded() {
    let original = square();
    let mut set = original.clone();
    set.inflate(D, CornerStrategy::RoundAllCorners, 10).unwrap();
    set.deflate(D, CornerStrategy::RoundAllCorners, 10).unwrap();

    let perimeter = 4.0 * SIDE as f64;
    let bound = (D as f64) * (D as f64) + perimeter * 10.0;
    assert!((set.area() - original.area()).abs() <= bound, "area {}", set.area());
    assert!(!set.is_any_self_intersecting());
}

#[test]
fn test_deflate_can_remove_everything() {
    let mut set = square();
    set.deflate(SIDE, CornerStrategy::ChamferAllCorners, 10).unwrap();
    assert!(set.is_empty());
}

#[test]
fn test_params_and_linked_holes() {
    let mut set = square();
    set.add_hole(
        LineChain::from_xy(&[(4_000, 4_000), (4_000, 6_000), (6_000, 6_000), (6_000, 4_000)]),
        None,
    )
    .unwrap();
    set.fracture().unwrap();

    set.inflate_with_linked_holes(500, CornerStrategy::ChamferAcuteCorners, 10)
        .unwrap();
    assert_eq!(set.outline_count(), 1);
    assert!(!set.has_holes());
    // The hole shrank and the outline grew.
    let expected = 11_000.0f64.powi(2) - 1_000.0f64.powi(2);
    assert!((set.area() - expected).abs() < expected * 0.01, "area {}", set.area());
}

#[test]
fn test_open_chain_sausage() {
    let mut chain = LineChain::new();
    chain.append_xy(0, 0);
    chain.append_xy(SIDE, 0);
    let sausage = inflate_line_chain(&chain, D, 10).unwrap();
    let exact = 2.0 * (D as f64) * SIDE as f64 + PI * (D as f64).powi(2);
    assert!((sausage.area() - exact).abs() < exact * 0.01);
    assert!(sausage.contains(Point::new(-D / 2, 0), 0, false));
}
