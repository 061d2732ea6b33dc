//! Map session bootstrap.
//!
//! `MapSessionOrchestrator::start` walks the startup sequence once: location
//! fix, API key, map library, surface, then one drawing session wired to the
//! surface's clicks. The resulting [`MapSession`] is the context object hosts
//! pass around instead of a global.

pub mod capabilities;


pub use capabilities::{
    ConfigurationStore, LoaderOptions, LocationError, LocationProvider, MapLibraryLoader, MapType,
    SurfaceOptions,
};

use crate::drawing::{
    map_event_bus, DrawingSession, DrawingSettings, MapEventBus, MapSignal, PhaseKind,
    GEOMETRY_CHANGE, MAP_RESET,
};
use crate::pubsub::{BusError, Unsubscribe};
use crate::render::{
    ListenerRef, RenderError, RenderingCapability, SurfaceEvent, SurfaceEventKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrchestrationError {
    #[error("Location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),

    #[error("Configuration secret '{0}' is missing")]
    ConfigurationMissing(String),

    #[error("Map rendering unavailable: {0}")]
    RenderingUnavailable(#[from] RenderError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub locale: String,
    /// Name of the secret holding the map API key.
    pub api_key_secret: String,
    pub libraries: Vec<String>,
    pub zoom: u8,
    pub map_type: MapType,
    pub clickable_icons: bool,
    pub drawing: DrawingSettings,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            api_key_secret: "google-maps-api-key".to_string(),
            libraries: vec!["geometry".to_string()],
            zoom: 18,
            map_type: MapType::Hybrid,
            clickable_icons: true,
            drawing: DrawingSettings::default(),
        }
    }
}

pub struct MapSessionOrchestrator {
    options: MapOptions,
}

impl MapSessionOrchestrator {
    pub fn new(options: MapOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Runs the startup sequence. Each failure is logged and ends startup;
    /// nothing is retried.
    pub async fn start<L, C, M>(
        &self,
        location: &mut L,
        config: &C,
        loader: &mut M,
    ) -> Result<MapSession<M::Surface>, OrchestrationError>
    where
        L: LocationProvider,
        C: ConfigurationStore,
        M: MapLibraryLoader,
    {
        let center = location.current_fix().await.map_err(|e| {
            warn!("Map startup aborted, no location fix: {}", e);
            OrchestrationError::from(e)
        })?;
        debug!("Location fix at {:?}", center);

        let secret_name = self.options.api_key_secret.as_str();
        let Some(api_key) = config.secret(secret_name).await.filter(|key| !key.is_empty()) else {
            warn!("Map startup aborted, secret '{}' not found", secret_name);
            return Err(OrchestrationError::ConfigurationMissing(secret_name.to_string()));
        };

        let loader_options = LoaderOptions {
            language: self.options.locale.clone(),
            libraries: self.options.libraries.clone(),
        };
        loader.load(&api_key, &loader_options).await.map_err(|e| {
            warn!("Map startup aborted, library failed to load: {}", e);
            OrchestrationError::from(e)
        })?;

        let surface_options = SurfaceOptions {
            center,
            zoom: self.options.zoom,
            map_type: self.options.map_type,
            clickable_icons: self.options.clickable_icons,
        };
        let mut surface = loader.create_surface(&surface_options).map_err(|e| {
            warn!("Map startup aborted, surface not created: {}", e);
            OrchestrationError::from(e)
        })?;

        let click_listener = surface.listen(SurfaceEventKind::Click).map_err(|e| {
            warn!("Map startup aborted, clicks unavailable: {}", e);
            OrchestrationError::from(e)
        })?;

        let bus = map_event_bus();
        let session = DrawingSession::new(surface, bus.clone(), self.options.drawing.clone());
        info!("Map session ready at {:.6}, {:.6}", center.lat, center.lng);

        Ok(MapSession { session, bus, click_listener: Some(click_listener) })
    }
}

/// The single live drawing session and its event bus.
pub struct MapSession<S: RenderingCapability> {
    session: DrawingSession<S>,
    bus: MapEventBus,
    click_listener: Option<ListenerRef>,
}

impl<S: RenderingCapability> MapSession<S> {
    /// Feeds one surface event into the drawing session.
    pub fn dispatch(&mut self, event: SurfaceEvent) {
        if matches!(event, SurfaceEvent::Click(_)) && self.click_listener.is_none() {
            return;
        }
        self.session.dispatch(event);
    }

    /// Clears the drawing and tells `on_reset` subscribers.
    pub fn reset(&mut self) {
        self.session.reset();
        if let Err(e) = self.bus.publish(MAP_RESET, &MapSignal::Reset) {
            error!("Failed to publish reset: {}", e);
        }
    }

    /// `callback` receives the net area in square meters.
    pub fn on_area_change<F>(&self, callback: F) -> Result<Unsubscribe<MapSignal>, BusError>
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.bus.subscribe(
            GEOMETRY_CHANGE,
            move |signal: &MapSignal| {
                if let MapSignal::GeometryChange { area } = signal {
                    callback(*area);
                }
            },
            None,
        )
    }

    pub fn on_reset<F>(&self, callback: F) -> Result<Unsubscribe<MapSignal>, BusError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.bus.subscribe(
            MAP_RESET,
            move |signal: &MapSignal| {
                if matches!(signal, MapSignal::Reset) {
                    callback();
                }
            },
            None,
        )
    }

    /// Stops routing map clicks into the session.
    pub fn stop_clicks(&mut self) {
        if let Some(listener) = self.click_listener.take() {
            self.session.surface_mut().remove_listener(listener);
        }
    }

    pub fn phase(&self) -> PhaseKind {
        self.session.phase()
    }

    pub fn net_area(&self) -> f64 {
        self.session.net_area()
    }

    pub fn session(&self) -> &DrawingSession<S> {
        &self.session
    }

    pub fn bus(&self) -> &MapEventBus {
        &self.bus
    }
}

impl<S: RenderingCapability> Drop for MapSession<S> {
    fn drop(&mut self) {
        self.stop_clicks();
    }
}
