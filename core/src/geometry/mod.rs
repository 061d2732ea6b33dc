use serde::{Deserialize, Serialize};

/// Tolerance, in degrees, under which two coordinates are the same position.
pub const COORDINATE_EPSILON: f64 = 1e-9;

pub trait ApproxEq {
    fn approx_eq(&self, other: &Self) -> bool;
}

impl ApproxEq for f64 {
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < COORDINATE_EPSILON
    }
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn lat_radians(&self) -> f64 {
        self.lat.to_radians()
    }

    pub fn lng_radians(&self) -> f64 {
        self.lng.to_radians()
    }
}

impl ApproxEq for Coordinate {
    fn approx_eq(&self, other: &Self) -> bool {
        self.lat.approx_eq(&other.lat) && self.lng.approx_eq(&other.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

pub mod ring;
pub use ring::*;

pub mod area;
pub use area::*;

#[cfg(test)]
mod tests_ring;
