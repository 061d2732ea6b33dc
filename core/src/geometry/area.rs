//! Spherical surface areas for rings and regions.
//!
//! Areas are computed from the spherical excess of the polygon, summed edge
//! by edge as polar triangles. Rings are treated as implicitly closed, so the
//! edge from the last coordinate back to the first is always included.

use super::{Region, Ring};
use std::f64::consts::FRAC_PI_2;

/// Mean earth radius used by the map library, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// An inner ring only cuts a hole once it holds more than this many points.
pub const INNER_RING_MIN_POINTS: usize = 3;

/// Signed area of the polar triangle spanned by one edge.
fn polar_triangle_area(tan1: f64, lng1: f64, tan2: f64, lng2: f64) -> f64 {
    let delta_lng = lng1 - lng2;
    let t = tan1 * tan2;
    2.0 * (t * delta_lng.sin()).atan2(1.0 + t * delta_lng.cos())
}

/// Signed area in square meters; positive for counter-clockwise rings.
pub fn signed_ring_area(ring: &Ring) -> f64 {
    let points = ring.points();
    if points.len() < 3 {
        return 0.0;
    }

    let tan_of = |lat: f64| ((FRAC_PI_2 - lat) / 2.0).tan();

    let Some(prev) = points.last() else {
        return 0.0;
    };
    let mut prev_tan = tan_of(prev.lat_radians());
    let mut prev_lng = prev.lng_radians();

    let mut total = 0.0;
    for point in points {
        let tan = tan_of(point.lat_radians());
        let lng = point.lng_radians();
        total += polar_triangle_area(tan, lng, prev_tan, prev_lng);
        prev_tan = tan;
        prev_lng = lng;
    }

    total * EARTH_RADIUS_METERS * EARTH_RADIUS_METERS
}

/// Unsigned area in square meters. Degenerate rings have no area.
pub fn ring_area(ring: &Ring) -> f64 {
    signed_ring_area(ring).abs()
}

/// Net area of the region: the outer ring minus the hole, never negative.
pub fn area(region: &Region) -> f64 {
    let outer = ring_area(&region.outer);
    match &region.inner {
        Some(inner) if inner.len() > INNER_RING_MIN_POINTS => (outer - ring_area(inner)).max(0.0),
        _ => outer,
    }
}
