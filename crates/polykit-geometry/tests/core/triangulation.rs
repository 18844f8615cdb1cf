use polykit_geometry::{LineChain, Point, PolySet, TriangulatedPolygon, TriangulationParams};
use std::sync::Arc;

fn frame() -> PolySet {
    let mut set = PolySet::new();
    set.add_outline(LineChain::from_xy(&[(0, 0), (10, 0), (10, 10), (0, 10)]));
    set.add_hole(LineChain::from_xy(&[(4, 4), (6, 4), (6, 6), (4, 6)]), None)
        .unwrap();
    set
}

#[test]
fn test_triangles_cover_the_area() {
    let set = frame();
    let polys = set.triangulate().unwrap();
    assert_eq!(polys.len(), 1);
    let area: f64 = polys.iter().map(|p| p.area()).sum();
    assert_eq!(area, 96.0);
    assert!(set
        .triangles()
        .unwrap()
        .iter()
        .all(|t| !t.contains(Point::new(5, 5))));
}

#[test]
fn test_unchanged_set_reuses_cache() {
    let set = frame();
    let first = set.triangulate().unwrap();
    let generation = set.triangulation_generation();
    let second = set.triangulate().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(set.triangulation_generation(), generation);
}

#[test]
fn test_vertex_mutation_makes_cache_stale() {
    let mut set = frame();
    let before = set.triangulate().unwrap();
    let generation = set.triangulation_generation();

    set.set_vertex(2, Point::new(12, 12)).unwrap();
    assert!(!set.is_triangulation_up_to_date());

    let after = set.triangulate().unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(set.triangulation_generation(), generation + 1);
    assert!(after[0].area() > before[0].area());
}

#[test]
fn test_params_change_rebuilds() {
    let set = frame();
    set.triangulate().unwrap();
    let generation = set.triangulation_generation();
    let params = TriangulationParams {
        partition: false,
        ..TriangulationParams::default()
    };
    set.triangulate_with(&params).unwrap();
    assert_eq!(set.triangulation_generation(), generation + 1);
}

#[test]
fn test_clone_starts_with_empty_cache() {
    let set = frame();
    set.triangulate().unwrap();
    let copy = set.clone();
    assert!(!copy.is_triangulation_up_to_date());
    assert_eq!(copy.triangles().unwrap().len(), set.triangles().unwrap().len());
}

#[test]
fn test_concurrent_readers_share_one_rebuild() {
    let set = frame();
    let generation = set.triangulation_generation();

    let results: Vec<Arc<[TriangulatedPolygon]>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| set.triangulate().unwrap())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(set.triangulation_generation(), generation + 1);
    let count = |polys: &Arc<[TriangulatedPolygon]>| -> usize {
        polys.iter().map(|p| p.triangle_count()).sum()
    };
    let expected = count(&results[0]);
    assert!(expected > 0);
    for polys in &results {
        assert_eq!(count(polys), expected);
        assert!(Arc::ptr_eq(polys, &results[0]));
    }
}
