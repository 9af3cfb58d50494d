use serde::{Deserialize, Serialize};

use super::coords::Geodetic;
use super::octree_code::OctreeCode;

/// One position record, partially filled by the caller and completed in place.
///
/// Angles are radians; vertical depths are metres, positive downwards.
/// `octree_depth == 0` means "not requested yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub datum_latitude: Option<f64>,
    pub datum_longitude: Option<f64>,
    pub datum_vertical_depth: Option<f64>,
    pub fundamental_latitude: Option<f64>,
    pub fundamental_longitude: Option<f64>,
    pub fundamental_vertical_depth: Option<f64>,
    pub octree_depth: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub octree_code: Option<OctreeCode>,
}

impl Position {
    /// Record with only the datum triple set.
    pub fn from_datum(latitude: f64, longitude: f64, vertical_depth: f64) -> Self {
        Self {
            datum_latitude: Some(latitude),
            datum_longitude: Some(longitude),
            datum_vertical_depth: Some(vertical_depth),
            ..Default::default()
        }
    }

    /// Record with only the fundamental triple set.
    pub fn from_fundamental(latitude: f64, longitude: f64, vertical_depth: f64) -> Self {
        Self {
            fundamental_latitude: Some(latitude),
            fundamental_longitude: Some(longitude),
            fundamental_vertical_depth: Some(vertical_depth),
            ..Default::default()
        }
    }

    /// Record carrying only an octree code at its own depth.
    pub fn from_code(code: OctreeCode) -> Self {
        Self {
            octree_depth: code.depth(),
            octree_code: Some(code),
            ..Default::default()
        }
    }

    pub fn datum_geodetic(&self) -> Option<Geodetic> {
        Some(Geodetic::from_vertical_depth(
            self.datum_latitude?,
            self.datum_longitude?,
            self.datum_vertical_depth?,
        ))
    }

    pub fn fundamental_geodetic(&self) -> Option<Geodetic> {
        Some(Geodetic::from_vertical_depth(
            self.fundamental_latitude?,
            self.fundamental_longitude?,
            self.fundamental_vertical_depth?,
        ))
    }

    pub fn set_datum(&mut self, g: Geodetic) {
        self.datum_latitude = Some(g.latitude);
        self.datum_longitude = Some(g.longitude);
        self.datum_vertical_depth = Some(g.vertical_depth());
    }

    pub fn set_fundamental(&mut self, g: Geodetic) {
        self.fundamental_latitude = Some(g.latitude);
        self.fundamental_longitude = Some(g.longitude);
        self.fundamental_vertical_depth = Some(g.vertical_depth());
    }

    /// Apply `f` to every angular field (used for degree/radian conversion).
    pub fn map_angles(&mut self, f: impl Fn(f64) -> f64) {
        for angle in [
            &mut self.datum_latitude,
            &mut self.datum_longitude,
            &mut self.fundamental_latitude,
            &mut self.fundamental_longitude,
        ] {
            if let Some(v) = angle.as_mut() {
                *v = f(*v);
            }
        }
    }
}
