use polykit_geometry::{GeometryError, LineChain, PolySet};

#[test]
fn test_dump_round_trip() {
    let mut set = PolySet::new();
    set.add_outline(LineChain::from_xy(&[(0, 0), (10, 0), (10, 10), (0, 10)]));
    set.add_hole(LineChain::from_xy(&[(4, 4), (4, 6), (6, 6), (6, 4)]), None)
        .unwrap();
    set.add_outline(LineChain::from_xy(&[(-5, -5), (-1, -5), (-3, -1)]));

    let text = set.to_string();
    let back: PolySet = text.parse().unwrap();
    assert_eq!(back, set);
    assert_eq!(back.format(), text);
}

#[test]
fn test_dump_ignores_layout_whitespace() {
    let set = PolySet::parse("polyset 1 poly 1 3   0 0\t5 0\n\n0 5").unwrap();
    assert_eq!(set.full_point_count(), 3);
    assert_eq!(set.area(), 12.5);
}

#[test]
fn test_truncated_dump_fails() {
    let err = PolySet::parse("polyset 2\npoly 1\n3\n0 0\n5 0\n0 5\n").unwrap_err();
    match err {
        GeometryError::Parse { position, reason } => {
            assert_eq!(position, 11);
            assert!(reason.contains("poly"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_dump_file_and_serde_agree() {
    let set = PolySet::from(LineChain::from_xy(&[(0, 0), (40, 0), (40, 30)]));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("set.txt");
    std::fs::write(&path, set.format()).unwrap();
    let from_file = PolySet::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();

    let json = serde_json::to_string(&set).unwrap();
    let from_json: PolySet = serde_json::from_str(&json).unwrap();

    assert_eq!(from_file, set);
    assert_eq!(from_json, set);
}
