use crate::pubsub::EventBus;
use serde::{Deserialize, Serialize};

/// Published with the net area, in square meters, whenever the region changes.
pub const GEOMETRY_CHANGE: &str = "user-interaction:map-geometry-change";
/// Published after the drawing has been cleared.
pub const MAP_RESET: &str = "map:reset";

pub const MAP_EVENTS: [&str; 2] = [GEOMETRY_CHANGE, MAP_RESET];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapSignal {
    GeometryChange { area: f64 },
    Reset,
}

pub type MapEventBus = EventBus<MapSignal>;

/// A bus declaring exactly the map events.
pub fn map_event_bus() -> MapEventBus {
    EventBus::new(MAP_EVENTS)
}
