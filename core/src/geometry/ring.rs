use super::Coordinate;
use serde::{Deserialize, Serialize};

/// Default closure tolerance in degrees, roughly 11 m at the equator.
pub const DEFAULT_CLOSURE_TOLERANCE: f64 = 0.0001;

/// An ordered boundary of coordinates.
///
/// A ring never stores whether it is closed. Closure is read off the first
/// and last coordinate whenever it is needed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring {
    points: Vec<Coordinate>,
}

impl Ring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: Coordinate) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn first(&self) -> Option<&Coordinate> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Coordinate> {
        self.points.last()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Moves the vertex at `index`. On a ring that ends exactly on its start,
    /// the first and last vertex move together. Returns false if out of range.
    pub fn move_vertex(&mut self, index: usize, point: Coordinate) -> bool {
        let len = self.points.len();
        if index >= len {
            return false;
        }

        let closed = len > 1 && self.points[0] == self.points[len - 1];
        self.points[index] = point;
        if closed && index == 0 {
            self.points[len - 1] = point;
        } else if closed && index == len - 1 {
            self.points[0] = point;
        }
        true
    }

    /// Returns a copy whose last coordinate repeats the first.
    /// Empty rings and rings that already end exactly on their start are copied as is.
    pub fn closed(&self) -> Ring {
        let mut points = self.points.clone();
        if let (Some(first), Some(last)) = (self.points.first(), self.points.last()) {
            if self.points.len() == 1 || first != last {
                points.push(*first);
            }
        }
        Ring { points }
    }
}

impl FromIterator<Coordinate> for Ring {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self { points: iter.into_iter().collect() }
    }
}

/// One outer boundary with at most one hole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub outer: Ring,
    /// Stored closed and already reversed against the outer ring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Ring>,
}

impl Region {
    pub fn new(outer: Ring) -> Self {
        Self { outer, inner: None }
    }

    /// Composes the region with `hole` cut out of it.
    pub fn with_hole(outer: Ring, hole: &Ring) -> Self {
        let inner = if hole.is_empty() {
            None
        } else {
            Some(reverse_winding(&hole.closed()))
        };
        Self { outer, inner }
    }
}

/// Checks whether the ring ends on (or within `tolerance` degrees of) its start.
///
/// Rings with fewer than 3 points are never closed.
pub fn is_approximately_closed(ring: &Ring, tolerance: f64) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let (Some(first), Some(last)) = (ring.first(), ring.last()) else {
        return false;
    };

    first == last
        || ((first.lat - last.lat).abs() < tolerance && (first.lng - last.lng).abs() < tolerance)
}

pub fn reverse_winding(ring: &Ring) -> Ring {
    ring.points().iter().rev().copied().collect()
}
