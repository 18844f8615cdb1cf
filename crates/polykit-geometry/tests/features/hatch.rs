use polykit_geometry::{LineChain, Point, PolySet};

#[test]
fn test_diagonal_hatch_stays_inside() {
    let set = PolySet::from(LineChain::from_xy(&[(0, 0), (1_000, 0), (1_000, 1_000), (0, 1_000)]));
    let lines = set.hatch_lines(&[45.0], 100, None).unwrap();
    assert!(!lines.is_empty());
    for line in &lines {
        assert!(set.contains(line.center(), 2, false));
        let d = line.b - line.a;
        assert!((d.x - d.y).abs() <= 2);
    }
}

#[test]
fn test_hatch_follows_translation() {
    let mut set = PolySet::from(LineChain::from_xy(&[(0, 0), (1_000, 0), (1_000, 1_000), (0, 1_000)]));
    let before = set.hatch_lines(&[0.0], 100, None).unwrap();
    set.translate(Point::new(0, 1_000));
    let after = set.hatch_lines(&[0.0], 100, None).unwrap();
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.a + Point::new(0, 1_000), b.a);
    }
}
