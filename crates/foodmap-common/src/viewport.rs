//! Map viewport and coordinate types.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Visible map center and zoom.
///
/// Owned by the map view and changed by pan/zoom interaction. Never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    #[serde(default)]
    pub bearing: f64,
    #[serde(default)]
    pub pitch: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            latitude: center.latitude,
            longitude: center.longitude,
            zoom,
            bearing: 0.0,
            pitch: 0.0,
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Same zoom, recentered on `point`.
    pub fn centered_on(&self, point: LatLng) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            ..*self
        }
    }
}

impl Default for Viewport {
    /// Downtown Los Angeles at city zoom.
    fn default() -> Self {
        Self::new(LatLng::new(34.0354899, -118.2439235), 11.0)
    }
}
