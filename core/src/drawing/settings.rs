use crate::geometry::DEFAULT_CLOSURE_TOLERANCE;
use crate::render::{MarkerStyle, RegionStyle, StrokeStyle};
use serde::{Deserialize, Serialize};

/// Tunables for one drawing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSettings {
    /// Degrees within which the last outer click snaps the ring shut.
    pub closure_tolerance: f64,
    pub outline: StrokeStyle,
    pub region: RegionStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            closure_tolerance: DEFAULT_CLOSURE_TOLERANCE,
            outline: StrokeStyle::default(),
            region: RegionStyle::default(),
            marker: None,
        }
    }
}
