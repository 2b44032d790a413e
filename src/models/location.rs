//! Location model for resolved coordinates and geocoding results

use serde::{Deserialize, Serialize};

/// Coordinates a calculation is requested for
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Best match returned by the geocoding service for a city query
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeocodingResult {
    pub latitude: f64,
    pub longitude: f64,
    /// Full display name as reported by the provider
    pub display_name: String,
    /// City, town or village name; the query itself when none is reported
    pub city: String,
    /// Country name, empty when unknown
    pub country: String,
}

impl From<&GeocodingResult> for Location {
    fn from(result: &GeocodingResult) -> Self {
        Location::new(result.latitude, result.longitude)
    }
}
