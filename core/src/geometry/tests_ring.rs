use crate::geometry::{
    is_approximately_closed, reverse_winding, ApproxEq, Coordinate, Region, Ring,
    DEFAULT_CLOSURE_TOLERANCE,
};

fn ring(points: &[(f64, f64)]) -> Ring {
    points.iter().copied().map(Coordinate::from).collect()
}

#[test]
fn test_short_rings_are_never_closed() {
    assert!(!is_approximately_closed(&Ring::new(), DEFAULT_CLOSURE_TOLERANCE));
    assert!(!is_approximately_closed(&ring(&[(0.0, 0.0)]), DEFAULT_CLOSURE_TOLERANCE));
    // Two identical points are still not a ring
    assert!(!is_approximately_closed(
        &ring(&[(1.0, 1.0), (1.0, 1.0)]),
        DEFAULT_CLOSURE_TOLERANCE
    ));
}

#[test]
fn test_exact_closure() {
    let r = ring(&[(0.0, 0.0), (0.0, 1.0), (0.0, 0.0)]);
    assert!(is_approximately_closed(&r, DEFAULT_CLOSURE_TOLERANCE));

    // Exact equality wins even with a zero tolerance
    let r = ring(&[(3.0, 4.0), (5.0, 6.0), (7.0, 8.0), (3.0, 4.0)]);
    assert!(is_approximately_closed(&r, 0.0));
}

#[test]
fn test_tolerance_closure() {
    let near = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.00005)]);
    assert!(is_approximately_closed(&near, DEFAULT_CLOSURE_TOLERANCE));

    let open = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0002)]);
    assert!(!is_approximately_closed(&open, DEFAULT_CLOSURE_TOLERANCE));

    // Both axes must be inside the tolerance
    let one_axis = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.5, 0.00001)]);
    assert!(!is_approximately_closed(&one_axis, DEFAULT_CLOSURE_TOLERANCE));
}

#[test]
fn test_reverse_winding() {
    let r = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
    let reversed = reverse_winding(&r);
    assert_eq!(reversed, ring(&[(1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]));
    // Source is untouched
    assert_eq!(r.len(), 3);
    assert_eq!(reverse_winding(&reversed), r);
}

#[test]
fn test_closed_copy() {
    let r = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
    let closed = r.closed();
    assert_eq!(closed.len(), 4);
    assert_eq!(closed.last(), r.first());

    // Already closed rings are not doubled up
    assert_eq!(closed.closed(), closed);
    assert!(Ring::new().closed().is_empty());
    assert_eq!(ring(&[(2.0, 2.0)]).closed().len(), 2);
}

#[test]
fn test_region_with_hole_is_reversed_and_closed() {
    let outer = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
    let hole = ring(&[(0.2, 0.2), (0.8, 0.2), (0.5, 0.8)]);

    let region = Region::with_hole(outer.clone(), &hole);
    let inner = region.inner.expect("hole should be composed");
    assert_eq!(inner.len(), 4);
    assert!(inner.points()[1].approx_eq(&Coordinate::new(0.5, 0.8)));
    assert_eq!(region.outer, outer);

    assert!(Region::with_hole(outer, &Ring::new()).inner.is_none());
}

#[test]
fn test_coordinate_serde_aliases() {
    let c: Coordinate = serde_json::from_str(r#"{"latitude": 1.5, "longitude": -2.0}"#).unwrap();
    assert_eq!(c, Coordinate::new(1.5, -2.0));

    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, r#"{"lat":1.5,"lng":-2.0}"#);
}

#[test]
fn test_move_vertex() {
    let mut open = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
    assert!(open.move_vertex(1, Coordinate::new(0.5, 1.5)));
    assert_eq!(open.points()[1], Coordinate::new(0.5, 1.5));
    assert!(!open.move_vertex(3, Coordinate::new(9.0, 9.0)));

    // A closed ring keeps its closing point on the start
    let mut closed = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)]);
    assert!(closed.move_vertex(0, Coordinate::new(-1.0, -1.0)));
    assert_eq!(closed.first(), closed.last());
    assert!(closed.move_vertex(3, Coordinate::new(-2.0, -2.0)));
    assert_eq!(closed.first(), Some(&Coordinate::new(-2.0, -2.0)));
}
