use polykit_geometry::{BooleanOp, ContourLayout, LineChain, Point, PolySet, VertexIndex};
use proptest::prelude::*;

fn rect_chain(x: i32, y: i32, w: i32, h: i32) -> LineChain {
    LineChain::from_xy(&[(x, y), (x + w, y), (x + w, y + h), (x, y + h)])
}

fn rect_strategy() -> impl Strategy<Value = (i32, i32, i32, i32)> {
    (-5_000i32..5_000, -5_000i32..5_000, 100i32..5_000, 100i32..5_000)
}

/// A rectangle with a rectangular hole strictly inside it.
fn framed_strategy() -> impl Strategy<Value = PolySet> {
    (rect_strategy(), 1u32..40, 1u32..40, 1u32..40, 1u32..40).prop_map(
        |((x, y, w, h), left, bottom, right, top)| {
            let hx = x + (w as u32 * left / 100) as i32 + 1;
            let hy = y + (h as u32 * bottom / 100) as i32 + 1;
            let hx2 = x + w - (w as u32 * right / 100) as i32 - 1;
            let hy2 = y + h - (h as u32 * top / 100) as i32 - 1;
            let mut set = PolySet::from(rect_chain(x, y, w, h));
            set.add_hole(rect_chain(hx, hy, hx2 - hx, hy2 - hy), None)
                .expect("outline exists");
            set
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Structured and global vertex indexes convert back and forth.
    #[test]
    fn index_conversion_round_trips(
        sizes in prop::collection::vec(prop::collection::vec(1usize..6, 1..4), 1..5)
    ) {
        let layout = ContourLayout::new(sizes.clone());
        let total: usize = sizes.iter().flatten().sum();
        prop_assert_eq!(layout.total(), total);
        for global in 0..total {
            let idx = layout.to_relative(global).unwrap();
            prop_assert_eq!(layout.to_global(idx), Some(global));
        }
        prop_assert_eq!(layout.to_relative(total), None);
        prop_assert_eq!(layout.to_global(VertexIndex::new(sizes.len(), 0, 0)), None);
    }

    /// Fracture then unfracture keeps the area and the hole.
    #[test]
    fn fracture_round_trip_keeps_area(set in framed_strategy()) {
        let area = set.area();
        let mut work = set.clone();
        work.fracture().unwrap();
        prop_assert_eq!(work.contour_count(), 1);
        prop_assert_eq!(work.area(), area);
        work.unfracture().unwrap();
        prop_assert_eq!(work.outline_count(), 1);
        prop_assert_eq!(work.hole_count(0), 1);
        prop_assert_eq!(work.area(), area);
    }

    /// Points well outside the bounding box are never inside.
    #[test]
    fn far_points_are_outside(set in framed_strategy(), dx in 1i32..1_000, accuracy in 0i32..50) {
        let bbox = set.bbox();
        let p = Point::new(bbox.max.x + 2 * accuracy + dx, bbox.min.y);
        prop_assert!(!set.contains(p, accuracy, false));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Union is commutative and intersection with itself is identity.
    #[test]
    fn boolean_identities_hold(a in rect_strategy(), b in rect_strategy()) {
        let a = PolySet::from(rect_chain(a.0, a.1, a.2, a.3));
        let b = PolySet::from(rect_chain(b.0, b.1, b.2, b.3));
        let eps = 8.0;

        let mut ab = a.clone();
        ab.boolean_op(BooleanOp::Union, &b).unwrap();
        let mut ba = b.clone();
        ba.boolean_op(BooleanOp::Union, &a).unwrap();
        prop_assert!((ab.area() - ba.area()).abs() <= eps);

        let mut aa = a.clone();
        aa.boolean_op(BooleanOp::Intersection, &a).unwrap();
        prop_assert!((aa.area() - a.area()).abs() <= eps);

        let mut xor = a.clone();
        xor.boolean_op(BooleanOp::Xor, &b).unwrap();
        let mut inter = a.clone();
        inter.boolean_op(BooleanOp::Intersection, &b).unwrap();
        prop_assert!((xor.area() - (ab.area() - inter.area())).abs() <= 3.0 * eps);
    }
}
