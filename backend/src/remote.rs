//! Capabilities backed by the connected map client.
//!
//! The client renders, locates and loads the map library; these types turn
//! the core's capability calls into outbound frames and wait on the matching
//! inbound ones.

use crate::protocol::{self, RenderCommand};
use plotarea_core::geometry::{Coordinate, Ring};
use plotarea_core::maps::{
    ConfigurationStore, LoaderOptions, LocationError, LocationProvider, MapLibraryLoader,
    SurfaceOptions,
};
use plotarea_core::render::{
    HandleRef, ListenerRef, MarkerStyle, OutlineHandle, RegionHandle, RegionStyle, RenderError,
    RenderResult, RenderingCapability, StrokeStyle, SurfaceEventKind,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

pub type Outbound = mpsc::UnboundedSender<String>;

fn disconnected() -> RenderError {
    RenderError::Unavailable("client disconnected".into())
}

/// Rendering surface living in the client's browser.
pub struct RemoteSurface {
    outbound: Outbound,
}

impl RemoteSurface {
    pub fn new(outbound: Outbound) -> Self {
        Self { outbound }
    }

    fn send(&self, command: RenderCommand<'_>) -> RenderResult<()> {
        let frame = protocol::render_frame(&command)
            .map_err(|e| RenderError::Rejected(e.to_string()))?;
        self.outbound.send(frame).map_err(|_| disconnected())
    }

    /// Updates and removals have no caller to report to.
    fn send_quietly(&self, command: RenderCommand<'_>) {
        if let Err(e) = self.send(command) {
            debug!("Dropped render command: {}", e);
        }
    }
}

fn paths<'a>(outer: &'a Ring, inner: Option<&'a Ring>) -> Vec<&'a Ring> {
    std::iter::once(outer).chain(inner).collect()
}

impl RenderingCapability for RemoteSurface {
    fn create_outline(&mut self, ring: &Ring, style: &StrokeStyle) -> RenderResult<OutlineHandle> {
        let id = OutlineHandle::new();
        self.send(RenderCommand::CreateOutline { id, path: ring, style })?;
        Ok(id)
    }

    fn update_outline(&mut self, outline: OutlineHandle, ring: &Ring) {
        self.send_quietly(RenderCommand::UpdateOutline { id: outline, path: ring });
    }

    fn remove_outline(&mut self, outline: OutlineHandle) {
        self.send_quietly(RenderCommand::RemoveOutline { id: outline });
    }

    fn create_filled_region(
        &mut self,
        outer: &Ring,
        inner: Option<&Ring>,
        style: &RegionStyle,
    ) -> RenderResult<RegionHandle> {
        let id = RegionHandle::new();
        self.send(RenderCommand::CreateRegion { id, paths: paths(outer, inner), style })?;
        Ok(id)
    }

    fn update_filled_region(&mut self, region: RegionHandle, outer: &Ring, inner: Option<&Ring>) {
        self.send_quietly(RenderCommand::UpdateRegion { id: region, paths: paths(outer, inner) });
    }

    fn remove_filled_region(&mut self, region: RegionHandle) {
        self.send_quietly(RenderCommand::RemoveRegion { id: region });
    }

    fn create_visual_handle(
        &mut self,
        point: Coordinate,
        style: Option<&MarkerStyle>,
    ) -> RenderResult<HandleRef> {
        let id = HandleRef::new();
        self.send(RenderCommand::CreateMarker { id, position: point, icon: style })?;
        Ok(id)
    }

    fn move_visual_handle(&mut self, handle: HandleRef, point: Coordinate) {
        self.send_quietly(RenderCommand::MoveMarker { id: handle, position: point });
    }

    fn remove_visual_handle(&mut self, handle: HandleRef) {
        self.send_quietly(RenderCommand::RemoveMarker { id: handle });
    }

    fn listen(&mut self, kind: SurfaceEventKind) -> RenderResult<ListenerRef> {
        let id = ListenerRef::new();
        self.send(RenderCommand::Listen { id, event: kind })?;
        Ok(id)
    }

    fn remove_listener(&mut self, listener: ListenerRef) {
        self.send_quietly(RenderCommand::RemoveListener { id: listener });
    }
}

/// Location fix reported by the client after `REQUEST_LOCATION`.
pub struct ClientLocation {
    outbound: Outbound,
    reply: Option<oneshot::Receiver<Result<Coordinate, LocationError>>>,
    timeout: Duration,
}

impl ClientLocation {
    pub fn new(
        outbound: Outbound,
        reply: oneshot::Receiver<Result<Coordinate, LocationError>>,
        timeout: Duration,
    ) -> Self {
        Self { outbound, reply: Some(reply), timeout }
    }
}

impl LocationProvider for ClientLocation {
    async fn current_fix(&mut self) -> Result<Coordinate, LocationError> {
        let reply = self
            .reply
            .take()
            .ok_or_else(|| LocationError::Unavailable("location already requested".into()))?;

        self.outbound
            .send(protocol::REQUEST_LOCATION.to_string())
            .map_err(|_| LocationError::Unavailable("client disconnected".into()))?;

        match tokio::time::timeout(self.timeout, reply).await {
            Ok(Ok(fix)) => fix,
            Ok(Err(_)) => Err(LocationError::Unavailable("client disconnected".into())),
            Err(_) => Err(LocationError::Timeout),
        }
    }
}

/// Secrets read from the backend configuration.
pub struct SecretStore {
    secrets: HashMap<String, String>,
}

impl SecretStore {
    pub fn new(secrets: HashMap<String, String>) -> Self {
        Self { secrets }
    }
}

impl ConfigurationStore for SecretStore {
    async fn secret(&self, name: &str) -> Option<String> {
        self.secrets.get(name).cloned()
    }
}

/// Has the client load the map library, then creates surfaces in it.
pub struct RemoteMapLoader {
    outbound: Outbound,
    ready: Option<oneshot::Receiver<Result<(), String>>>,
    loaded: bool,
    timeout: Duration,
}

impl RemoteMapLoader {
    pub fn new(
        outbound: Outbound,
        ready: oneshot::Receiver<Result<(), String>>,
        timeout: Duration,
    ) -> Self {
        Self { outbound, ready: Some(ready), loaded: false, timeout }
    }
}

impl MapLibraryLoader for RemoteMapLoader {
    type Surface = RemoteSurface;

    async fn load(&mut self, api_key: &str, options: &LoaderOptions) -> RenderResult<()> {
        if self.loaded {
            return Ok(());
        }
        let ready = self
            .ready
            .take()
            .ok_or_else(|| RenderError::Unavailable("map library load already failed".into()))?;

        self.outbound
            .send(protocol::load_map_frame(api_key, options))
            .map_err(|_| disconnected())?;

        match tokio::time::timeout(self.timeout, ready).await {
            Ok(Ok(Ok(()))) => {
                self.loaded = true;
                Ok(())
            }
            Ok(Ok(Err(reason))) => Err(RenderError::Unavailable(reason)),
            Ok(Err(_)) => Err(disconnected()),
            Err(_) => {
                warn!("Map library did not load within {:?}", self.timeout);
                Err(RenderError::Unavailable("map library load timed out".into()))
            }
        }
    }

    fn create_surface(&mut self, options: &SurfaceOptions) -> RenderResult<RemoteSurface> {
        if !self.loaded {
            return Err(RenderError::Unavailable("map library not loaded".into()));
        }
        let frame =
            protocol::create_map_frame(options).map_err(|e| RenderError::Rejected(e.to_string()))?;
        self.outbound.send(frame).map_err(|_| disconnected())?;
        Ok(RemoteSurface::new(self.outbound.clone()))
    }
}
