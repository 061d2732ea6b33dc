//! Text frames exchanged with the map client.
//!
//! Every frame is `PREFIX` or `PREFIX:payload`, with JSON payloads.

use plotarea_core::geometry::{Coordinate, Ring};
use plotarea_core::maps::{LoaderOptions, LocationError, SurfaceOptions};
use plotarea_core::render::{
    BoundaryEvent, HandleRef, ListenerRef, MarkerStyle, OutlineHandle, RegionHandle, RegionStyle,
    StrokeStyle, SurfaceEvent, SurfaceEventKind,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

pub const REQUEST_LOCATION: &str = "REQUEST_LOCATION";
pub const RESET_DONE: &str = "RESET_DONE";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Unknown message: {0}")]
    UnknownMessage(String),

    #[error("Malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: &'static str,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Location(Coordinate),
    LocationFailed(LocationError),
    MapReady,
    MapFailed(String),
    Surface(SurfaceEvent),
    Reset,
}

fn payload<T: serde::de::DeserializeOwned>(
    kind: &'static str,
    json: &str,
) -> Result<T, ProtocolError> {
    serde_json::from_str(json).map_err(|source| ProtocolError::MalformedPayload { kind, source })
}

/// Maps geolocation error codes sent by the browser.
fn location_error(reason: &str) -> LocationError {
    match reason.trim() {
        "PERMISSION_DENIED" | "1" => LocationError::PermissionDenied,
        "TIMEOUT" | "3" => LocationError::Timeout,
        other => LocationError::Unavailable(other.to_string()),
    }
}

pub fn parse_client_message(text: &str) -> Result<ClientMessage, ProtocolError> {
    let (prefix, body) = match text.split_once(':') {
        Some((prefix, body)) => (prefix, Some(body)),
        None => (text, None),
    };

    let message = match (prefix, body) {
        ("LOCATION", Some(json)) => ClientMessage::Location(payload("LOCATION", json)?),
        ("LOCATION_ERROR", reason) => {
            ClientMessage::LocationFailed(location_error(reason.unwrap_or_default()))
        }
        ("MAP_READY", _) => ClientMessage::MapReady,
        ("MAP_ERROR", reason) => ClientMessage::MapFailed(reason.unwrap_or_default().to_string()),
        ("CLICK", Some(json)) => ClientMessage::Surface(SurfaceEvent::Click(payload("CLICK", json)?)),
        ("PRESS", Some(json)) => ClientMessage::Surface(SurfaceEvent::BoundaryPress(
            payload::<BoundaryEvent>("PRESS", json)?,
        )),
        ("RELEASE", Some(json)) => ClientMessage::Surface(SurfaceEvent::BoundaryRelease(
            payload::<BoundaryEvent>("RELEASE", json)?,
        )),
        ("RESET", None) => ClientMessage::Reset,
        _ => return Err(ProtocolError::UnknownMessage(text.to_string())),
    };
    Ok(message)
}

/// One rendering call, as sent to the client in a `RENDER:` frame.
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand<'a> {
    CreateOutline {
        id: OutlineHandle,
        path: &'a Ring,
        style: &'a StrokeStyle,
    },
    UpdateOutline {
        id: OutlineHandle,
        path: &'a Ring,
    },
    RemoveOutline {
        id: OutlineHandle,
    },
    CreateRegion {
        id: RegionHandle,
        paths: Vec<&'a Ring>,
        style: &'a RegionStyle,
    },
    UpdateRegion {
        id: RegionHandle,
        paths: Vec<&'a Ring>,
    },
    RemoveRegion {
        id: RegionHandle,
    },
    CreateMarker {
        id: HandleRef,
        position: Coordinate,
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<&'a MarkerStyle>,
    },
    MoveMarker {
        id: HandleRef,
        position: Coordinate,
    },
    RemoveMarker {
        id: HandleRef,
    },
    Listen {
        id: ListenerRef,
        event: SurfaceEventKind,
    },
    RemoveListener {
        id: ListenerRef,
    },
}

pub fn render_frame(command: &RenderCommand<'_>) -> Result<String, serde_json::Error> {
    Ok(format!("RENDER:{}", serde_json::to_string(command)?))
}

pub fn load_map_frame(api_key: &str, options: &LoaderOptions) -> String {
    format!(
        "LOAD_MAP:{}",
        json!({
            "key": api_key,
            "language": options.language,
            "libraries": options.libraries,
        })
    )
}

pub fn create_map_frame(options: &SurfaceOptions) -> Result<String, serde_json::Error> {
    Ok(format!("CREATE_MAP:{}", serde_json::to_string(options)?))
}

pub fn area_frame(area: f64) -> String {
    format!("AREA_UPDATE:{}", json!({ "area": area }))
}

/// Format an error as a JSON message for the frontend
pub fn format_error(code: &str, message: &str, severity: &str) -> String {
    format!(
        "ERROR_UPDATE:{}",
        json!({
            "code": code,
            "message": message,
            "severity": severity
        })
    )
}
