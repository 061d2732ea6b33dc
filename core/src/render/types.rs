//! Renderer-facing value types.
//!
//! Handles are opaque tokens minted by the renderer. The core stores and
//! returns them but never looks inside.

use crate::geometry::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! render_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

render_token!(
    /// A marker placed on one ring vertex.
    HandleRef
);
render_token!(
    /// The filled, editable polygon drawn once the outer ring closes.
    RegionHandle
);
render_token!(
    /// The open polyline shown while the outer ring grows.
    OutlineHandle
);
render_token!(ListenerRef);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceEventKind {
    Click,
    BoundaryPress,
    BoundaryRelease,
}

/// A pointer event against the rendered filled region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryEvent {
    #[serde(flatten)]
    pub point: Coordinate,
    /// Index of the region vertex under the pointer, if any.
    #[serde(default)]
    pub vertex: Option<usize>,
    /// Index of the region edge under the pointer, if any.
    #[serde(default)]
    pub edge: Option<usize>,
    /// Region path of `vertex`/`edge`: 0 is the outer ring, 1 the hole.
    #[serde(default)]
    pub path: Option<usize>,
}

impl BoundaryEvent {
    pub fn at(point: Coordinate) -> Self {
        Self { point, vertex: None, edge: None, path: None }
    }

    /// A fresh press landed on neither a vertex nor an edge of the region.
    pub fn is_fresh(&self) -> bool {
        self.vertex.is_none() && self.edge.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    Click(Coordinate),
    BoundaryPress(BoundaryEvent),
    BoundaryRelease(BoundaryEvent),
}

impl SurfaceEvent {
    pub fn kind(&self) -> SurfaceEventKind {
        match self {
            Self::Click(_) => SurfaceEventKind::Click,
            Self::BoundaryPress(_) => SurfaceEventKind::BoundaryPress,
            Self::BoundaryRelease(_) => SurfaceEventKind::BoundaryRelease,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrokeStyle {
    pub stroke_color: String,
    pub stroke_opacity: f64,
    pub stroke_weight: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#000000".to_string(),
            stroke_opacity: 1.0,
            stroke_weight: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegionStyle {
    #[serde(flatten)]
    pub stroke: StrokeStyle,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub editable: bool,
}

impl Default for RegionStyle {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle::default(),
            fill_color: "#000000".to_string(),
            fill_opacity: 0.5,
            editable: true,
        }
    }
}

/// Custom marker icon; renderers fall back to their default pin without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    /// SVG path data.
    pub path: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub scale: f64,
    pub stroke_weight: f64,
    pub rotation: f64,
    /// Icon anchor in pixels.
    pub anchor: [f64; 2],
}
