//! External services the orchestrator needs before a session can exist.

use crate::geometry::Coordinate;
use crate::render::{RenderResult, RenderingCapability};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location request timed out")]
    Timeout,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Produces the user's current position, once.
pub trait LocationProvider {
    fn current_fix(&mut self) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;
}

/// Remote key/value store holding deployment secrets.
pub trait ConfigurationStore {
    fn secret(&self, name: &str) -> impl Future<Output = Option<String>> + Send;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderOptions {
    pub language: String,
    pub libraries: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Roadmap,
    Satellite,
    Hybrid,
    Terrain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceOptions {
    pub center: Coordinate,
    pub zoom: u8,
    #[serde(rename = "mapTypeId")]
    pub map_type: MapType,
    pub clickable_icons: bool,
}

/// Loads the map library and builds surfaces from it.
pub trait MapLibraryLoader {
    type Surface: RenderingCapability;

    fn load(
        &mut self,
        api_key: &str,
        options: &LoaderOptions,
    ) -> impl Future<Output = RenderResult<()>> + Send;

    fn create_surface(&mut self, options: &SurfaceOptions) -> RenderResult<Self::Surface>;
}
