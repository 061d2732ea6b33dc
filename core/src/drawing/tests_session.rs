use crate::drawing::{
    map_event_bus, DrawingSession, DrawingSettings, MapEventBus, MapSignal, PhaseKind,
    GEOMETRY_CHANGE,
};
use crate::geometry::{ring_area, Coordinate, Ring};
use crate::render::{BoundaryEvent, MemorySurface, SurfaceEvent, SurfaceEventKind};
use std::sync::{Arc, Mutex};

const OUTER: [(f64, f64); 5] = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.00005)];
const HOLE: [(f64, f64); 3] = [(0.2, 0.2), (0.8, 0.2), (0.5, 0.8)];

fn new_session() -> (DrawingSession<MemorySurface>, MapEventBus) {
    let bus = map_event_bus();
    let session = DrawingSession::new(MemorySurface::new(), bus.clone(), DrawingSettings::default());
    (session, bus)
}

fn record_areas(bus: &MapEventBus) -> Arc<Mutex<Vec<f64>>> {
    let areas = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&areas);
    bus.subscribe(
        GEOMETRY_CHANGE,
        move |signal: &MapSignal| {
            if let MapSignal::GeometryChange { area } = signal {
                sink.lock().unwrap().push(*area);
            }
        },
        None,
    )
    .unwrap();
    areas
}

fn draw_outer(session: &mut DrawingSession<MemorySurface>) {
    for point in OUTER {
        session.handle_map_click(point.into());
    }
}

fn press(lat: f64, lng: f64) -> BoundaryEvent {
    BoundaryEvent::at(Coordinate::new(lat, lng))
}

#[test]
fn test_new_session_is_empty_with_outline() {
    let (session, _bus) = new_session();
    assert_eq!(session.phase(), PhaseKind::Empty);
    assert!(session.outer_ring().is_empty());
    assert_eq!(session.surface().outlines().count(), 1);
    assert_eq!(session.net_area(), 0.0);
}

#[test]
fn test_first_click_creates_one_handle() {
    let (mut session, _bus) = new_session();
    session.handle_map_click(Coordinate::new(0.0, 0.0));
    assert_eq!(session.phase(), PhaseKind::DrawingOuter);
    assert_eq!(session.handle_count(), 1);
    assert_eq!(session.surface().handle_count(), 1);

    session.handle_map_click(Coordinate::new(0.0, 1.0));
    assert_eq!(session.handle_count(), 1);

    let outline = session.surface().outlines().next().unwrap();
    assert_eq!(outline.len(), 2);
}

#[test]
fn test_outer_ring_closes_on_fifth_click() {
    let (mut session, _bus) = new_session();
    for (i, point) in OUTER.iter().enumerate() {
        session.handle_map_click((*point).into());
        if i < 4 {
            assert_eq!(session.phase(), PhaseKind::DrawingOuter, "click {}", i + 1);
        }
    }
    assert_eq!(session.phase(), PhaseKind::OuterClosed);
    assert_eq!(session.outer_ring().len(), 5);

    let surface = session.surface();
    assert_eq!(surface.regions().count(), 1);
    assert_eq!(surface.outlines().count(), 0);
    assert!(surface.is_listening(SurfaceEventKind::BoundaryPress));
    assert!(surface.is_listening(SurfaceEventKind::BoundaryRelease));
}

#[test]
fn test_outer_closure_publishes_outer_area() {
    let (mut session, bus) = new_session();
    let areas = record_areas(&bus);
    draw_outer(&mut session);

    let outer: Ring = OUTER.iter().copied().map(Coordinate::from).collect();
    assert_eq!(areas.lock().unwrap().as_slice(), &[ring_area(&outer)]);
    assert_eq!(session.net_area(), ring_area(&outer));
}

#[test]
fn test_click_after_closure_is_ignored() {
    let (mut session, _bus) = new_session();
    draw_outer(&mut session);
    let before = session.outer_ring().to_vec();

    session.handle_map_click(Coordinate::new(5.0, 5.0));
    assert_eq!(session.phase(), PhaseKind::OuterClosed);
    assert_eq!(session.outer_ring(), before.as_slice());
}

#[test]
fn test_three_fresh_presses_cut_hole() {
    let (mut session, bus) = new_session();
    draw_outer(&mut session);
    let outer_area = session.net_area();
    let areas = record_areas(&bus);

    session.handle_boundary_press(press(HOLE[0].0, HOLE[0].1));
    assert_eq!(session.phase(), PhaseKind::DrawingInner);
    session.handle_boundary_press(press(HOLE[1].0, HOLE[1].1));
    assert_eq!(session.phase(), PhaseKind::DrawingInner);
    assert_eq!(session.handle_count(), 3);
    assert!(areas.lock().unwrap().is_empty());

    session.handle_boundary_press(press(HOLE[2].0, HOLE[2].1));
    assert_eq!(session.phase(), PhaseKind::InnerClosed);

    let areas = areas.lock().unwrap();
    assert_eq!(areas.len(), 1);
    assert!(areas[0] < outer_area);
    assert!(areas[0] > 0.0);

    let hole: Ring = HOLE.iter().copied().map(Coordinate::from).collect();
    let expected = outer_area - ring_area(&hole);
    assert!((areas[0] - expected).abs() < 1.0);

    // Handles and the press listener are gone, the hole is fixed
    assert_eq!(session.handle_count(), 0);
    assert_eq!(session.surface().handle_count(), 0);
    assert!(!session.surface().is_listening(SurfaceEventKind::BoundaryPress));
    assert!(session.surface().is_listening(SurfaceEventKind::BoundaryRelease));

    let drawn = session.surface().regions().next().unwrap();
    assert_eq!(drawn.inner.as_ref().map(Ring::len), Some(4));
}

#[test]
fn test_press_on_vertex_or_edge_adds_nothing() {
    let (mut session, _bus) = new_session();
    draw_outer(&mut session);

    session.handle_boundary_press(BoundaryEvent {
        point: Coordinate::new(0.0, 1.0),
        vertex: Some(1),
        edge: None,
        path: None,
    });
    assert_eq!(session.phase(), PhaseKind::OuterClosed);

    session.handle_boundary_press(press(0.2, 0.2));
    session.handle_boundary_press(BoundaryEvent {
        point: Coordinate::new(0.5, 0.0),
        vertex: None,
        edge: Some(3),
        path: None,
    });
    assert_eq!(session.phase(), PhaseKind::DrawingInner);
    assert_eq!(session.inner_ring().len(), 1);
}

#[test]
fn test_press_ignored_before_closure_and_after_hole() {
    let (mut session, _bus) = new_session();
    session.handle_boundary_press(press(0.2, 0.2));
    assert_eq!(session.phase(), PhaseKind::Empty);

    draw_outer(&mut session);
    for (lat, lng) in HOLE {
        session.handle_boundary_press(press(lat, lng));
    }
    session.handle_boundary_press(press(0.4, 0.4));
    assert_eq!(session.phase(), PhaseKind::InnerClosed);
    assert_eq!(session.inner_ring().len(), 3);
}

#[test]
fn test_release_moves_pending_handle_and_republishes() {
    let (mut session, bus) = new_session();
    draw_outer(&mut session);
    session.handle_boundary_press(press(0.2, 0.2));
    let areas = record_areas(&bus);

    // Press on the existing inner marker, then drag it
    session.handle_boundary_press(BoundaryEvent {
        point: Coordinate::new(0.2, 0.2),
        vertex: Some(0),
        edge: None,
        path: None,
    });
    session.handle_boundary_release(press(0.25, 0.25));

    let moved = session
        .handles()
        .iter()
        .find(|v| v.position == Coordinate::new(0.25, 0.25))
        .expect("handle should follow the release");
    assert_eq!(
        session.surface().handle_position(moved.handle),
        Some(Coordinate::new(0.25, 0.25))
    );
    assert_eq!(areas.lock().unwrap().len(), 1);

    // A release with nothing pending still republishes
    session.handle_boundary_release(press(0.3, 0.3));
    assert_eq!(areas.lock().unwrap().len(), 2);
    assert!(session.handles().iter().all(|v| v.position != Coordinate::new(0.3, 0.3)));
}

fn on_vertex(lat: f64, lng: f64, path: usize, vertex: usize) -> BoundaryEvent {
    BoundaryEvent { vertex: Some(vertex), path: Some(path), ..press(lat, lng) }
}

#[test]
fn test_outer_vertex_drag_changes_area() {
    let (mut session, bus) = new_session();
    draw_outer(&mut session);
    let before = session.net_area();
    let areas = record_areas(&bus);

    session.handle_boundary_press(on_vertex(1.0, 1.0, 0, 2));
    session.handle_boundary_release(on_vertex(2.0, 2.0, 0, 2));

    assert_eq!(session.phase(), PhaseKind::OuterClosed);
    assert_eq!(session.outer_ring()[2], Coordinate::new(2.0, 2.0));
    let areas = areas.lock().unwrap();
    assert_eq!(areas.len(), 1);
    assert!(areas[0] > before);
    assert_eq!(areas[0], session.net_area());

    let drawn = session.surface().regions().next().unwrap();
    assert_eq!(drawn.outer.points()[2], Coordinate::new(2.0, 2.0));
}

#[test]
fn test_hole_vertex_drag_changes_area() {
    let (mut session, bus) = new_session();
    draw_outer(&mut session);
    for (lat, lng) in HOLE {
        session.handle_boundary_press(press(lat, lng));
    }
    let before = session.net_area();
    let areas = record_areas(&bus);

    // The drawn hole runs h0, h2, h1, h0, so vertex 1 is the third press
    session.handle_boundary_release(on_vertex(0.5, 0.9, 1, 1));

    assert_eq!(
        session.inner_ring(),
        &[Coordinate::new(0.2, 0.2), Coordinate::new(0.8, 0.2), Coordinate::new(0.5, 0.9)]
    );
    let areas = areas.lock().unwrap();
    assert_eq!(areas.len(), 1);
    assert!(areas[0] < before);

    let drawn = session.surface().regions().next().unwrap();
    assert_eq!(drawn.inner.as_ref().map(|hole| hole.points()[1]), Some(Coordinate::new(0.5, 0.9)));
}

#[test]
fn test_drag_to_unknown_vertex_keeps_region() {
    let (mut session, bus) = new_session();
    draw_outer(&mut session);
    let before = session.outer_ring().to_vec();
    let areas = record_areas(&bus);

    session.handle_boundary_release(on_vertex(3.0, 3.0, 0, 42));
    // No hole yet, so path 1 has nothing to move
    session.handle_boundary_release(on_vertex(3.0, 3.0, 1, 0));

    assert_eq!(session.outer_ring(), before.as_slice());
    assert_eq!(areas.lock().unwrap().len(), 2);
}

#[test]
fn test_release_in_place_republishes_once() {
    let (mut session, bus) = new_session();
    draw_outer(&mut session);
    let before = session.net_area();
    let first = session.handles()[0];
    assert_eq!(first.position, Coordinate::new(0.0, 0.0));
    let areas = record_areas(&bus);

    session.handle_boundary_press(on_vertex(0.0, 0.0, 0, 0));
    session.handle_boundary_release(on_vertex(0.0, 0.0, 0, 0));

    assert_eq!(session.handles()[0], first);
    assert_eq!(session.surface().handle_position(first.handle), Some(first.position));
    assert_eq!(areas.lock().unwrap().as_slice(), &[before]);
}

#[test]
fn test_release_ignored_while_drawing_outer() {
    let (mut session, bus) = new_session();
    let areas = record_areas(&bus);
    session.handle_map_click(Coordinate::new(0.0, 0.0));
    session.handle_boundary_release(press(0.0, 0.0));
    assert!(areas.lock().unwrap().is_empty());
}

#[test]
fn test_rejected_region_keeps_outer_ring_open() {
    let (mut session, _bus) = new_session();
    session.surface_mut().set_reject_regions(true);
    draw_outer(&mut session);

    assert_eq!(session.phase(), PhaseKind::DrawingOuter);
    assert_eq!(session.outer_ring().len(), 5);

    // The next click closes once the renderer recovers
    session.surface_mut().set_reject_regions(false);
    session.handle_map_click(Coordinate::new(0.0, 0.0));
    assert_eq!(session.phase(), PhaseKind::OuterClosed);
    assert_eq!(session.outer_ring().len(), 6);
}

#[test]
fn test_reset_is_idempotent_and_releases_everything() {
    let (mut session, _bus) = new_session();
    draw_outer(&mut session);
    session.handle_boundary_press(press(0.2, 0.2));

    session.reset();
    assert_eq!(session.phase(), PhaseKind::Empty);
    assert!(session.outer_ring().is_empty());
    assert!(session.inner_ring().is_empty());
    // Only the fresh outline is left
    assert_eq!(session.surface().live_objects(), 1);

    session.reset();
    assert_eq!(session.phase(), PhaseKind::Empty);
    assert!(session.outer_ring().is_empty());
    assert_eq!(session.surface().live_objects(), 1);

    session.handle_map_click(Coordinate::new(1.0, 1.0));
    assert_eq!(session.phase(), PhaseKind::DrawingOuter);
}

#[test]
fn test_dispatch_routes_events() {
    let (mut session, _bus) = new_session();
    for point in OUTER {
        session.dispatch(SurfaceEvent::Click(point.into()));
    }
    assert_eq!(session.phase(), PhaseKind::OuterClosed);

    for (lat, lng) in HOLE {
        session.dispatch(SurfaceEvent::BoundaryPress(press(lat, lng)));
    }
    assert_eq!(session.phase(), PhaseKind::InnerClosed);
}

#[test]
fn test_offline_surface_never_panics() {
    let mut surface = MemorySurface::new();
    surface.set_offline(true);
    let mut session = DrawingSession::new(surface, map_event_bus(), DrawingSettings::default());

    draw_outer(&mut session);
    assert_eq!(session.phase(), PhaseKind::DrawingOuter);
    assert_eq!(session.handle_count(), 0);
    session.reset();
    assert_eq!(session.phase(), PhaseKind::Empty);
}
