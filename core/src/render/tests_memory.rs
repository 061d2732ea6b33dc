use crate::geometry::{Coordinate, Ring};
use crate::render::{
    MemorySurface, RegionStyle, RenderError, RenderingCapability, StrokeStyle, SurfaceEventKind,
};

#[test]
fn test_objects_are_tracked_until_removed() {
    let mut surface = MemorySurface::new();
    let ring: Ring = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]
        .into_iter()
        .map(Coordinate::from)
        .collect();

    let outline = surface.create_outline(&ring, &StrokeStyle::default()).unwrap();
    let region = surface.create_filled_region(&ring, None, &RegionStyle::default()).unwrap();
    let handle = surface.create_visual_handle(Coordinate::new(0.0, 0.0), None).unwrap();
    let listener = surface.listen(SurfaceEventKind::BoundaryPress).unwrap();
    assert_eq!(surface.live_objects(), 4);
    assert!(surface.is_listening(SurfaceEventKind::BoundaryPress));
    assert!(!surface.is_listening(SurfaceEventKind::Click));

    surface.move_visual_handle(handle, Coordinate::new(2.0, 3.0));
    assert_eq!(surface.handle_position(handle), Some(Coordinate::new(2.0, 3.0)));

    surface.remove_outline(outline);
    surface.remove_filled_region(region);
    surface.remove_visual_handle(handle);
    surface.remove_listener(listener);
    assert_eq!(surface.live_objects(), 0);

    // Removing twice is harmless
    surface.remove_visual_handle(handle);
}

#[test]
fn test_rejected_regions() {
    let mut surface = MemorySurface::new();
    surface.set_reject_regions(true);
    let err = surface
        .create_filled_region(&Ring::new(), None, &RegionStyle::default())
        .unwrap_err();
    assert!(matches!(err, RenderError::Rejected(_)));

    // Other objects still work
    assert!(surface.create_visual_handle(Coordinate::new(0.0, 0.0), None).is_ok());
}

#[test]
fn test_offline_surface_creates_nothing() {
    let mut surface = MemorySurface::new();
    surface.set_offline(true);
    assert!(surface.listen(SurfaceEventKind::Click).is_err());
    assert!(surface.create_outline(&Ring::new(), &StrokeStyle::default()).is_err());
    assert_eq!(surface.live_objects(), 0);
}

#[test]
fn test_region_style_defaults_from_json() {
    let style: RegionStyle = serde_json::from_str(r##"{"fillColor": "#ff0000"}"##).unwrap();
    assert_eq!(style.fill_color, "#ff0000");
    assert_eq!(style.fill_opacity, 0.5);
    assert_eq!(style.stroke.stroke_weight, 3.0);
    assert!(style.editable);
}
