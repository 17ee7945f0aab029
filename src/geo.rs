//! Geographic primitives and their script representation

use serde::{Deserialize, Serialize};

/// Mean earth radius used when converting metres to degrees.
pub const EARTH_RADIUS_KM: f64 = 6378.8;

/// Default number of decimal digits for emitted coordinates.
pub const DEFAULT_PRECISION: usize = 6;

/// Most decimal digits an emitted coordinate carries; an f64 holds no more.
pub const MAX_PRECISION: usize = 15;

/// A latitude/longitude pair, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Format as `(lat, lng)` with exactly `precision` decimal digits, at
    /// most [`MAX_PRECISION`].
    pub fn format(&self, precision: usize) -> String {
        let precision = precision.min(MAX_PRECISION);
        format!(
            "({:.*}, {:.*})",
            precision, self.lat, precision, self.lng
        )
    }

    /// Format as a runtime `LatLng` constructor.
    pub fn to_js(&self, precision: usize) -> String {
        format!("new google.maps.LatLng{}", self.format(precision))
    }

    /// Offset in degrees for a distance in metres at this latitude.
    ///
    /// Returns `(delta_lat, delta_lng)`; the longitude delta widens with
    /// latitude so both arms cover the same ground distance.
    pub fn degree_offset(&self, metres: f64) -> (f64, f64) {
        let delta_lat = (metres / 1000.0 / EARTH_RADIUS_KM) * (180.0 / std::f64::consts::PI);
        let delta_lng = delta_lat / (std::f64::consts::PI * self.lat / 180.0).cos();
        (delta_lat, delta_lng)
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// A bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Format as a JSON object literal.
    pub fn to_js(&self) -> String {
        // A struct of four floats always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Zip parallel latitude/longitude lists into points.
pub(crate) fn zip_points(lats: &[f64], lngs: &[f64]) -> Vec<LatLng> {
    lats.iter()
        .zip(lngs)
        .map(|(&lat, &lng)| LatLng::new(lat, lng))
        .collect()
}
