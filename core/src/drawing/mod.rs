//! Interactive region drawing.
//!
//! Clicks on the map grow the outer ring until it closes on itself. Presses
//! on the filled region then cut a hole, and the net area goes out on the
//! session's event bus.

pub mod events;
mod phase;
pub mod session;
pub mod settings;

#[cfg(test)]
mod tests_session;

pub use events::{map_event_bus, MapEventBus, MapSignal, GEOMETRY_CHANGE, MAP_EVENTS, MAP_RESET};
pub use phase::PhaseKind;
pub use session::{DrawingSession, VisualHandle};
pub use settings::DrawingSettings;
