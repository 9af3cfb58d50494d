use serde::{Deserialize, Serialize};

use super::ellipsoid::{Ellipsoid, EllipsoidParams};
use crate::error::Result;

/// Seven transformation parameters relating a datum to the fundamental frame.
///
/// Translations are metres, rotations radians, `scale` is a factor (1 = no
/// scaling). Any of them may be undefined; which ones are defined decides the
/// transformation strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    pub dx: Option<f64>,
    pub dy: Option<f64>,
    pub dz: Option<f64>,
    pub rx: Option<f64>,
    pub ry: Option<f64>,
    pub rz: Option<f64>,
    pub scale: Option<f64>,
}

impl TransformParams {
    /// The parameter set of the fundamental frame itself.
    pub const IDENTITY: Self = Self {
        dx: Some(0.0),
        dy: Some(0.0),
        dz: Some(0.0),
        rx: Some(0.0),
        ry: Some(0.0),
        rz: Some(0.0),
        scale: Some(1.0),
    };

    /// Translation-only shift.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            dx: Some(dx),
            dy: Some(dy),
            dz: Some(dz),
            ..Default::default()
        }
    }

    /// Full seven-parameter set.
    pub fn helmert(translation: [f64; 3], rotation: [f64; 3], scale: f64) -> Self {
        Self {
            dx: Some(translation[0]),
            dy: Some(translation[1]),
            dz: Some(translation[2]),
            rx: Some(rotation[0]),
            ry: Some(rotation[1]),
            rz: Some(rotation[2]),
            scale: Some(scale),
        }
    }

    /// All three translations, if all are defined.
    pub fn translation_vector(&self) -> Option<[f64; 3]> {
        Some([self.dx?, self.dy?, self.dz?])
    }

    /// Rotations and scale, if all four are defined.
    pub fn rotation_and_scale(&self) -> Option<([f64; 3], f64)> {
        Some(([self.rx?, self.ry?, self.rz?], self.scale?))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// A local geodetic reference frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Datum {
    pub name: String,
    pub ellipsoid: Ellipsoid,
    pub params: TransformParams,
}

impl Datum {
    pub fn new(name: impl Into<String>, ellipsoid: Ellipsoid, params: TransformParams) -> Self {
        Self {
            name: name.into(),
            ellipsoid,
            params,
        }
    }

    /// The fundamental frame: WGS84 with identity parameters.
    pub fn fundamental() -> Self {
        Self::new("WGS84", Ellipsoid::wgs84(), TransformParams::IDENTITY)
    }

    /// Whether this datum is indistinguishable from the fundamental frame.
    pub fn is_fundamental(&self) -> bool {
        self.ellipsoid.same_shape(&Ellipsoid::wgs84()) && self.params.is_identity()
    }
}

/// Serialisable datum definition with an unresolved ellipsoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatumDefinition {
    pub name: String,
    pub ellipsoid: EllipsoidParams,
    #[serde(default)]
    pub params: TransformParams,
}

impl DatumDefinition {
    pub fn resolve(&self) -> Result<Datum> {
        Ok(Datum::new(
            self.name.clone(),
            self.ellipsoid.resolve()?,
            self.params,
        ))
    }
}
