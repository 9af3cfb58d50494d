use serde::{Deserialize, Serialize};

use crate::error::{DatumShiftError, Result};

/// Partially specified ellipsoid, as supplied by a catalog entry or a user file.
///
/// Any two independent parameters are enough, as long as one of them is a
/// nonzero axis. [`EllipsoidParams::resolve`] fills in the rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EllipsoidParams {
    pub semi_major_axis: Option<f64>,
    pub semi_minor_axis: Option<f64>,
    pub flattening: Option<f64>,
    pub inverse_flattening: Option<f64>,
    pub eccentricity: Option<f64>,
    pub eccentricity_squared: Option<f64>,
}

impl EllipsoidParams {
    /// Semi-major axis plus inverse flattening, the usual catalog form.
    pub fn from_axis_and_inverse_flattening(a: f64, inverse_flattening: f64) -> Self {
        Self {
            semi_major_axis: Some(a),
            inverse_flattening: Some(inverse_flattening),
            ..Default::default()
        }
    }

    /// Both axes.
    pub fn from_axes(a: f64, b: f64) -> Self {
        Self {
            semi_major_axis: Some(a),
            semi_minor_axis: Some(b),
            ..Default::default()
        }
    }

    fn defined_count(&self) -> usize {
        [
            self.semi_major_axis,
            self.semi_minor_axis,
            self.flattening,
            self.inverse_flattening,
            self.eccentricity,
            self.eccentricity_squared,
        ]
        .iter()
        .filter(|p| p.is_some())
        .count()
    }

    /// Resolve all six parameters from whichever two were given.
    ///
    /// Shape sources are preferred in the order flattening, inverse
    /// flattening, eccentricity, squared eccentricity. Purely algebraic.
    pub fn resolve(&self) -> Result<Ellipsoid> {
        let has_axis = [self.semi_major_axis, self.semi_minor_axis]
            .iter()
            .flatten()
            .any(|v| *v != 0.0);
        if self.defined_count() < 2 || !has_axis {
            return Err(DatumShiftError::InsufficientParameters(format!(
                "need two parameters including a nonzero axis, got {self:?}"
            )));
        }

        let mut p = *self;

        // 1. Missing axis from the other axis plus one shape parameter.
        if p.semi_major_axis.is_none() {
            p.semi_major_axis = p.semi_minor_axis.and_then(|b| {
                p.flattening
                    .map(|f| b / (1.0 - f))
                    .or_else(|| p.inverse_flattening.map(|inv| b * inv / (inv - 1.0)))
                    .or_else(|| p.eccentricity.map(|e| b / (1.0 - e * e).sqrt()))
                    .or_else(|| p.eccentricity_squared.map(|e2| b / (1.0 - e2).sqrt()))
            });
        }
        if p.semi_minor_axis.is_none() {
            p.semi_minor_axis = p.semi_major_axis.and_then(|a| {
                p.flattening
                    .map(|f| a * (1.0 - f))
                    .or_else(|| p.inverse_flattening.map(|inv| a * (inv - 1.0) / inv))
                    .or_else(|| p.eccentricity.map(|e| a * (1.0 - e * e).sqrt()))
                    .or_else(|| p.eccentricity_squared.map(|e2| a * (1.0 - e2).sqrt()))
            });
        }

        let (Some(a), Some(b)) = (p.semi_major_axis, p.semi_minor_axis) else {
            return Err(DatumShiftError::InsufficientParameters(
                "no shape parameter to derive the missing axis".into(),
            ));
        };
        if a == 0.0 || !a.is_finite() || !b.is_finite() {
            return Err(DatumShiftError::InvalidShape(format!(
                "semi-major axis {a}, semi-minor axis {b}"
            )));
        }

        // 2-5. Shape parameters, each only if still undefined.
        let f = p.flattening.unwrap_or(1.0 - b / a);
        let inverse_flattening = p
            .inverse_flattening
            .unwrap_or(if f != 0.0 { 1.0 / f } else { f64::INFINITY });
        let e2 = p.eccentricity_squared.unwrap_or(1.0 - (b / a).powi(2));
        if e2 < 0.0 {
            return Err(DatumShiftError::InvalidShape(format!(
                "negative squared eccentricity {e2} (semi-minor axis exceeds semi-major)"
            )));
        }
        let e = p.eccentricity.unwrap_or(e2.sqrt());

        Ok(Ellipsoid {
            a,
            b,
            f,
            inverse_flattening,
            e,
            e2,
        })
    }
}

/// Relative axis tolerance for shape equality: about 6 µm on the Earth, well
/// below the 0.1 mm that separates WGS84 from GRS80.
pub const SHAPE_RELATIVE_TOLERANCE: f64 = 1e-12;

/// Fully resolved oblate ellipsoid of revolution.
///
/// A sphere has `inverse_flattening == f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    a: f64,
    b: f64,
    f: f64,
    inverse_flattening: f64,
    e: f64,
    e2: f64,
}

impl Ellipsoid {
    /// WGS84, the ellipsoid of the fundamental frame.
    pub fn wgs84() -> Self {
        Self::from_axis_and_flattening(6_378_137.0, 1.0 / 298.257_223_563)
    }

    /// Infallible constructor for a known-good axis and flattening.
    pub fn from_axis_and_flattening(a: f64, f: f64) -> Self {
        let b = a * (1.0 - f);
        let e2 = f * (2.0 - f);
        Self {
            a,
            b,
            f,
            inverse_flattening: if f != 0.0 { 1.0 / f } else { f64::INFINITY },
            e: e2.sqrt(),
            e2,
        }
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.a
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.b
    }

    pub fn flattening(&self) -> f64 {
        self.f
    }

    pub fn inverse_flattening(&self) -> f64 {
        self.inverse_flattening
    }

    pub fn eccentricity(&self) -> f64 {
        self.e
    }

    pub fn eccentricity_squared(&self) -> f64 {
        self.e2
    }

    /// Second eccentricity squared, `e'² = (a² - b²) / b²`.
    pub fn second_eccentricity_squared(&self) -> f64 {
        (self.a * self.a - self.b * self.b) / (self.b * self.b)
    }

    /// Same axes to within `SHAPE_RELATIVE_TOLERANCE`.
    pub fn same_shape(&self, other: &Ellipsoid) -> bool {
        approx::relative_eq!(self.a, other.a, max_relative = SHAPE_RELATIVE_TOLERANCE)
            && approx::relative_eq!(self.b, other.b, max_relative = SHAPE_RELATIVE_TOLERANCE)
    }
}
