use serde::{Deserialize, Serialize};

/// Geodetic position on some datum. Angles in radians, elevation in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl Geodetic {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }

    /// Build from a stored vertical depth (`elevation = -depth`).
    pub fn from_vertical_depth(latitude: f64, longitude: f64, vertical_depth: f64) -> Self {
        Self::new(latitude, longitude, -vertical_depth)
    }

    pub fn vertical_depth(&self) -> f64 {
        -self.elevation
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.elevation.is_finite()
    }
}

/// Spherical position about the centre of the fundamental ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geocentric {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

impl Geocentric {
    pub fn new(latitude: f64, longitude: f64, radius: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius,
        }
    }
}
