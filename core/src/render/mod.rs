//! Rendering capability consumed by the drawing session.
//!
//! The session never draws anything itself. It asks a `RenderingCapability`
//! for outlines, filled regions, markers and listeners, and keeps only the
//! opaque handles it gets back.

pub mod types;
pub mod memory;

#[cfg(test)]
mod tests_memory;

pub use memory::MemorySurface;
pub use types::*;

use crate::geometry::{Coordinate, Ring};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Renderer unavailable: {0}")]
    Unavailable(String),

    #[error("Renderer rejected request: {0}")]
    Rejected(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Abstract interface over the map renderer.
///
/// `create_*` and `listen` may fail. Updates and removals are fire and
/// forget: a renderer that has gone away has nothing left to update.
pub trait RenderingCapability: Send {
    /// Draw the open polyline that follows the outer ring while it grows.
    fn create_outline(&mut self, ring: &Ring, style: &StrokeStyle) -> RenderResult<OutlineHandle>;

    fn update_outline(&mut self, outline: OutlineHandle, ring: &Ring);

    fn remove_outline(&mut self, outline: OutlineHandle);

    /// Draw the filled region. `inner`, when given, is already reversed.
    fn create_filled_region(
        &mut self,
        outer: &Ring,
        inner: Option<&Ring>,
        style: &RegionStyle,
    ) -> RenderResult<RegionHandle>;

    fn update_filled_region(&mut self, region: RegionHandle, outer: &Ring, inner: Option<&Ring>);

    fn remove_filled_region(&mut self, region: RegionHandle);

    fn create_visual_handle(
        &mut self,
        point: Coordinate,
        style: Option<&MarkerStyle>,
    ) -> RenderResult<HandleRef>;

    fn move_visual_handle(&mut self, handle: HandleRef, point: Coordinate);

    fn remove_visual_handle(&mut self, handle: HandleRef);

    /// Ask the surface to start delivering events of `kind`.
    fn listen(&mut self, kind: SurfaceEventKind) -> RenderResult<ListenerRef>;

    fn remove_listener(&mut self, listener: ListenerRef);
}
