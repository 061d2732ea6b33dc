use super::{
    HandleRef, ListenerRef, MarkerStyle, OutlineHandle, RegionHandle, RegionStyle, RenderError,
    RenderResult, RenderingCapability, StrokeStyle, SurfaceEventKind,
};
use crate::geometry::{Coordinate, Ring};
use std::collections::HashMap;

/// A filled region as the renderer currently shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnRegion {
    pub outer: Ring,
    pub inner: Option<Ring>,
    pub style: RegionStyle,
}

/// Rendering surface that keeps every live object in memory.
///
/// Used for headless sessions and to check that the session releases
/// everything it creates.
#[derive(Debug, Default)]
pub struct MemorySurface {
    outlines: HashMap<OutlineHandle, Ring>,
    regions: HashMap<RegionHandle, DrawnRegion>,
    handles: HashMap<HandleRef, Coordinate>,
    listeners: HashMap<ListenerRef, SurfaceEventKind>,
    reject_regions: bool,
    offline: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `create_filled_region` call fail until turned back off.
    pub fn set_reject_regions(&mut self, reject: bool) {
        self.reject_regions = reject;
    }

    /// Make every `create_*` and `listen` call fail until turned back off.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check_online(&self) -> RenderResult<()> {
        if self.offline {
            Err(RenderError::Unavailable("surface is offline".into()))
        } else {
            Ok(())
        }
    }

    pub fn outline(&self, outline: OutlineHandle) -> Option<&Ring> {
        self.outlines.get(&outline)
    }

    pub fn outlines(&self) -> impl Iterator<Item = &Ring> {
        self.outlines.values()
    }

    pub fn region(&self, region: RegionHandle) -> Option<&DrawnRegion> {
        self.regions.get(&region)
    }

    pub fn regions(&self) -> impl Iterator<Item = &DrawnRegion> {
        self.regions.values()
    }

    pub fn handle_position(&self, handle: HandleRef) -> Option<Coordinate> {
        self.handles.get(&handle).copied()
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    pub fn is_listening(&self, kind: SurfaceEventKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Total number of renderer objects still alive.
    pub fn live_objects(&self) -> usize {
        self.outlines.len() + self.regions.len() + self.handles.len() + self.listeners.len()
    }
}

impl RenderingCapability for MemorySurface {
    fn create_outline(&mut self, ring: &Ring, _style: &StrokeStyle) -> RenderResult<OutlineHandle> {
        self.check_online()?;
        let outline = OutlineHandle::new();
        self.outlines.insert(outline, ring.clone());
        Ok(outline)
    }

    fn update_outline(&mut self, outline: OutlineHandle, ring: &Ring) {
        if let Some(drawn) = self.outlines.get_mut(&outline) {
            *drawn = ring.clone();
        }
    }

    fn remove_outline(&mut self, outline: OutlineHandle) {
        self.outlines.remove(&outline);
    }

    fn create_filled_region(
        &mut self,
        outer: &Ring,
        inner: Option<&Ring>,
        style: &RegionStyle,
    ) -> RenderResult<RegionHandle> {
        self.check_online()?;
        if self.reject_regions {
            return Err(RenderError::Rejected("filled regions disabled".into()));
        }
        let region = RegionHandle::new();
        self.regions.insert(
            region,
            DrawnRegion {
                outer: outer.clone(),
                inner: inner.cloned(),
                style: style.clone(),
            },
        );
        Ok(region)
    }

    fn update_filled_region(&mut self, region: RegionHandle, outer: &Ring, inner: Option<&Ring>) {
        if let Some(drawn) = self.regions.get_mut(&region) {
            drawn.outer = outer.clone();
            drawn.inner = inner.cloned();
        }
    }

    fn remove_filled_region(&mut self, region: RegionHandle) {
        self.regions.remove(&region);
    }

    fn create_visual_handle(
        &mut self,
        point: Coordinate,
        _style: Option<&MarkerStyle>,
    ) -> RenderResult<HandleRef> {
        self.check_online()?;
        let handle = HandleRef::new();
        self.handles.insert(handle, point);
        Ok(handle)
    }

    fn move_visual_handle(&mut self, handle: HandleRef, point: Coordinate) {
        if let Some(position) = self.handles.get_mut(&handle) {
            *position = point;
        }
    }

    fn remove_visual_handle(&mut self, handle: HandleRef) {
        self.handles.remove(&handle);
    }

    fn listen(&mut self, kind: SurfaceEventKind) -> RenderResult<ListenerRef> {
        self.check_online()?;
        let listener = ListenerRef::new();
        self.listeners.insert(listener, kind);
        Ok(listener)
    }

    fn remove_listener(&mut self, listener: ListenerRef) {
        self.listeners.remove(&listener);
    }
}
