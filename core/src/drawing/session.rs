use super::events::{MapEventBus, MapSignal, GEOMETRY_CHANGE};
use super::phase::{Phase, PhaseKind};
use super::settings::DrawingSettings;
use crate::geometry::{
    area, is_approximately_closed, ApproxEq, Coordinate, Region, Ring, INNER_RING_MIN_POINTS,
};
use crate::render::{
    BoundaryEvent, HandleRef, ListenerRef, OutlineHandle, RenderingCapability, SurfaceEvent,
    SurfaceEventKind,
};
use std::mem;
use tracing::{debug, error, trace, warn};

/// A marker the session placed on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualHandle {
    pub handle: HandleRef,
    pub position: Coordinate,
}

/// Interaction state machine for drawing one region with one hole.
///
/// Owns the surface and every renderer object it creates on it. None of the
/// event handlers fail: input that makes no sense in the current phase is
/// ignored.
pub struct DrawingSession<S: RenderingCapability> {
    surface: S,
    bus: MapEventBus,
    settings: DrawingSettings,
    phase: Phase,
    outline: Option<OutlineHandle>,
    handles: Vec<VisualHandle>,
    /// Handle resolved by the last press, moved on the next release.
    pending: Option<HandleRef>,
    press_listener: Option<ListenerRef>,
    release_listener: Option<ListenerRef>,
}

impl<S: RenderingCapability> DrawingSession<S> {
    pub fn new(surface: S, bus: MapEventBus, settings: DrawingSettings) -> Self {
        let mut session = Self {
            surface,
            bus,
            settings,
            phase: Phase::Empty,
            outline: None,
            handles: Vec::new(),
            pending: None,
            press_listener: None,
            release_listener: None,
        };
        session.start_outline();
        session
    }

    pub fn phase(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn outer_ring(&self) -> &[Coordinate] {
        self.phase.outer().map(Ring::points).unwrap_or(&[])
    }

    /// Inner vertices in the order they were pressed.
    pub fn inner_ring(&self) -> &[Coordinate] {
        self.phase.inner().map(Ring::points).unwrap_or(&[])
    }

    /// The composed region, once the outer ring has closed.
    pub fn region(&self) -> Option<&Region> {
        self.phase.region()
    }

    pub fn net_area(&self) -> f64 {
        self.phase.region().map(area).unwrap_or(0.0)
    }

    pub fn handles(&self) -> &[VisualHandle] {
        &self.handles
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    pub fn settings(&self) -> &DrawingSettings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn bus(&self) -> &MapEventBus {
        &self.bus
    }

    pub fn dispatch(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Click(point) => self.handle_map_click(point),
            SurfaceEvent::BoundaryPress(event) => self.handle_boundary_press(event),
            SurfaceEvent::BoundaryRelease(event) => self.handle_boundary_release(event),
        }
    }

    /// Extends the outer ring, closing it once the click lands back on its start.
    pub fn handle_map_click(&mut self, point: Coordinate) {
        let mut outer = match mem::take(&mut self.phase) {
            Phase::Empty => Ring::new(),
            Phase::DrawingOuter { outer } => outer,
            other => {
                trace!("Ignoring map click while {}", other.kind());
                self.phase = other;
                return;
            }
        };

        if outer.is_empty() {
            self.add_visual_handle(point);
        }
        outer.push(point);
        if let Some(outline) = self.outline {
            self.surface.update_outline(outline, &outer);
        }

        if !is_approximately_closed(&outer, self.settings.closure_tolerance) {
            trace!("Outer ring has {} points", outer.len());
            self.phase = Phase::DrawingOuter { outer };
            return;
        }

        let region = Region::with_hole(outer, &Ring::new());
        let created = self.surface.create_filled_region(
            &region.outer,
            region.inner.as_ref(),
            &self.settings.region,
        );
        match created {
            Ok(fill) => {
                if let Some(outline) = self.outline.take() {
                    self.surface.remove_outline(outline);
                }
                self.press_listener = self.listen(SurfaceEventKind::BoundaryPress);
                self.release_listener = self.listen(SurfaceEventKind::BoundaryRelease);
                debug!("Outer ring closed with {} points", region.outer.len());
                self.phase = Phase::OuterClosed { region, fill };
                self.publish_area();
            }
            Err(e) => {
                warn!("Could not draw filled region, outer ring stays open: {}", e);
                self.phase = Phase::DrawingOuter { outer: region.outer };
            }
        }
    }

    /// Adds a hole vertex for every fresh press until the hole is complete.
    pub fn handle_boundary_press(&mut self, event: BoundaryEvent) {
        let (region, mut inner, fill) = match mem::take(&mut self.phase) {
            Phase::OuterClosed { region, fill } => (region, Ring::new(), fill),
            Phase::DrawingInner { region, inner, fill } => (region, inner, fill),
            other => {
                trace!("Ignoring boundary press while {}", other.kind());
                self.phase = other;
                return;
            }
        };

        self.pending = self.handle_at(event.point);

        if !event.is_fresh() {
            trace!("Press landed on vertex {:?} / edge {:?}", event.vertex, event.edge);
            self.phase = if inner.is_empty() {
                Phase::OuterClosed { region, fill }
            } else {
                Phase::DrawingInner { region, inner, fill }
            };
            return;
        }

        inner.push(event.point);
        self.add_visual_handle(event.point);

        // Counted on the closed form, so three presses make a triangle hole.
        if inner.closed().len() <= INNER_RING_MIN_POINTS {
            trace!("Inner ring has {} points", inner.len());
            self.phase = Phase::DrawingInner { region, inner, fill };
            return;
        }

        let region = Region::with_hole(region.outer, &inner);
        self.surface
            .update_filled_region(fill, &region.outer, region.inner.as_ref());
        debug!("Inner ring closed with {} points", inner.len());
        self.phase = Phase::InnerClosed { region, inner, fill };

        self.publish_area();
        if let Some(listener) = self.press_listener.take() {
            self.surface.remove_listener(listener);
        }
        self.discard_handles();
    }

    /// Moves the handle picked by the last press, applies a vertex drag to
    /// the region and republishes the area.
    pub fn handle_boundary_release(&mut self, event: BoundaryEvent) {
        if self.phase.region().is_none() {
            trace!("Ignoring boundary release while {}", self.phase.kind());
            return;
        }

        if let Some(vertex) = event.vertex {
            let path = event.path.unwrap_or(0);
            if self.phase.move_vertex(path, vertex, event.point) {
                trace!("Vertex {} of path {} dragged", vertex, path);
            }
        }
        if let (Some(fill), Some(region)) = (self.phase.fill(), self.phase.region()) {
            self.surface
                .update_filled_region(fill, &region.outer, region.inner.as_ref());
        }

        if let Some(handle) = self.pending.take() {
            self.surface.move_visual_handle(handle, event.point);
            if let Some(visual) = self.handles.iter_mut().find(|v| v.handle == handle) {
                visual.position = event.point;
            }
        }

        self.publish_area();
    }

    /// Drops all geometry and renderer objects and starts a new outer ring.
    pub fn reset(&mut self) {
        self.release_all();
        self.start_outline();
        debug!("Drawing session reset");
    }

    fn start_outline(&mut self) {
        match self.surface.create_outline(&Ring::new(), &self.settings.outline) {
            Ok(outline) => self.outline = Some(outline),
            Err(e) => warn!("Could not draw outline: {}", e),
        }
    }

    fn listen(&mut self, kind: SurfaceEventKind) -> Option<ListenerRef> {
        match self.surface.listen(kind) {
            Ok(listener) => Some(listener),
            Err(e) => {
                warn!("Could not listen for {:?}: {}", kind, e);
                None
            }
        }
    }

    fn add_visual_handle(&mut self, point: Coordinate) {
        match self
            .surface
            .create_visual_handle(point, self.settings.marker.as_ref())
        {
            Ok(handle) => self.handles.push(VisualHandle { handle, position: point }),
            Err(e) => warn!("Could not place marker: {}", e),
        }
    }

    fn handle_at(&self, point: Coordinate) -> Option<HandleRef> {
        self.handles
            .iter()
            .find(|visual| visual.position.approx_eq(&point))
            .map(|visual| visual.handle)
    }

    fn discard_handles(&mut self) {
        for visual in self.handles.drain(..) {
            self.surface.remove_visual_handle(visual.handle);
        }
        self.pending = None;
    }

    fn publish_area(&self) {
        let area = self.net_area();
        if let Err(e) = self
            .bus
            .publish(GEOMETRY_CHANGE, &MapSignal::GeometryChange { area })
        {
            error!("Failed to publish area: {}", e);
        }
    }

    fn release_all(&mut self) {
        self.discard_handles();
        if let Some(fill) = mem::take(&mut self.phase).fill() {
            self.surface.remove_filled_region(fill);
        }
        if let Some(outline) = self.outline.take() {
            self.surface.remove_outline(outline);
        }
        for listener in [self.press_listener.take(), self.release_listener.take()]
            .into_iter()
            .flatten()
        {
            self.surface.remove_listener(listener);
        }
    }
}

impl<S: RenderingCapability> Drop for DrawingSession<S> {
    fn drop(&mut self) {
        self.release_all();
    }
}
