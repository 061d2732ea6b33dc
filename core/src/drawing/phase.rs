use crate::geometry::{Coordinate, Region, Ring};
use crate::render::RegionHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observable stage of a drawing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    Empty,
    DrawingOuter,
    OuterClosed,
    DrawingInner,
    InnerClosed,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::DrawingOuter => "drawing outer ring",
            Self::OuterClosed => "outer ring closed",
            Self::DrawingInner => "drawing inner ring",
            Self::InnerClosed => "inner ring closed",
        };
        f.write_str(name)
    }
}

/// Session state. Each variant holds only what is valid at that stage, so an
/// inner ring cannot exist before the outer ring has closed.
#[derive(Debug, Clone, Default)]
pub(crate) enum Phase {
    #[default]
    Empty,
    DrawingOuter {
        outer: Ring,
    },
    OuterClosed {
        region: Region,
        fill: RegionHandle,
    },
    DrawingInner {
        region: Region,
        /// Inner vertices in press order, not yet composed into `region`.
        inner: Ring,
        fill: RegionHandle,
    },
    InnerClosed {
        region: Region,
        inner: Ring,
        fill: RegionHandle,
    },
}

impl Phase {
    pub(crate) fn kind(&self) -> PhaseKind {
        match self {
            Self::Empty => PhaseKind::Empty,
            Self::DrawingOuter { .. } => PhaseKind::DrawingOuter,
            Self::OuterClosed { .. } => PhaseKind::OuterClosed,
            Self::DrawingInner { .. } => PhaseKind::DrawingInner,
            Self::InnerClosed { .. } => PhaseKind::InnerClosed,
        }
    }

    pub(crate) fn fill(&self) -> Option<RegionHandle> {
        match self {
            Self::OuterClosed { fill, .. }
            | Self::DrawingInner { fill, .. }
            | Self::InnerClosed { fill, .. } => Some(*fill),
            Self::Empty | Self::DrawingOuter { .. } => None,
        }
    }

    pub(crate) fn region(&self) -> Option<&Region> {
        match self {
            Self::OuterClosed { region, .. }
            | Self::DrawingInner { region, .. }
            | Self::InnerClosed { region, .. } => Some(region),
            Self::Empty | Self::DrawingOuter { .. } => None,
        }
    }

    pub(crate) fn outer(&self) -> Option<&Ring> {
        match self {
            Self::DrawingOuter { outer } => Some(outer),
            _ => self.region().map(|region| &region.outer),
        }
    }

    pub(crate) fn inner(&self) -> Option<&Ring> {
        match self {
            Self::DrawingInner { inner, .. } | Self::InnerClosed { inner, .. } => Some(inner),
            _ => None,
        }
    }

    /// Moves one vertex of the closed region. Path 0 is the outer ring and
    /// path 1 the hole, which only exists once it has closed.
    pub(crate) fn move_vertex(&mut self, path: usize, vertex: usize, point: Coordinate) -> bool {
        let (region, pressed) = match self {
            Self::OuterClosed { region, .. } | Self::DrawingInner { region, .. } => (region, None),
            Self::InnerClosed { region, inner, .. } => (region, Some(inner)),
            Self::Empty | Self::DrawingOuter { .. } => return false,
        };

        if path == 0 {
            return region.outer.move_vertex(vertex, point);
        }

        match (path, region.inner.as_mut(), pressed) {
            (1, Some(hole), Some(pressed)) => {
                if !hole.move_vertex(vertex, point) {
                    return false;
                }
                // Back to press order: undo the reversal and drop the closing point.
                let mut points: Vec<Coordinate> = hole.points().iter().rev().copied().collect();
                points.pop();
                *pressed = Ring::from_points(points);
                true
            }
            _ => false,
        }
    }
}
