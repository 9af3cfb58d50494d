pub mod ecef;
pub mod geocentric;
pub mod helmert;
pub mod molodensky;
pub mod quartic;

use tracing::debug;

use crate::config::HelmertConfig;
use crate::error::{DatumShiftError, Result};
use crate::types::{Datum, Ellipsoid, Geocentric, Geodetic};

use ecef::{ecef_to_geodetic, geodetic_to_ecef};
use geocentric::{geocentric_to_geodetic, geodetic_to_geocentric};
use helmert::Helmert;
use molodensky::molodensky_shift;

/// Transformation strategy chosen for a datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Identity,
    Molodensky,
    Helmert,
}

impl Strategy {
    /// First match wins: identity, then translation-only, then full seven-parameter.
    pub fn select(datum: &Datum) -> Option<Self> {
        let p = &datum.params;
        if datum.is_fundamental() {
            Some(Strategy::Identity)
        } else if p.translation_vector().is_some() && p.rotation_and_scale().is_none() {
            Some(Strategy::Molodensky)
        } else if p.translation_vector().is_some() && p.rotation_and_scale().is_some() {
            Some(Strategy::Helmert)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Identity => write!(f, "identity"),
            Strategy::Molodensky => write!(f, "molodensky"),
            Strategy::Helmert => write!(f, "helmert"),
        }
    }
}

/// Converts positions between one datum and the fundamental frame.
///
/// Molodensky parameters are the datum → fundamental translation; Helmert
/// parameters describe fundamental → datum.
#[derive(Debug, Clone)]
pub struct DatumTransform<'a> {
    datum: &'a Datum,
    fundamental: Ellipsoid,
    helmert: HelmertConfig,
}

impl<'a> DatumTransform<'a> {
    pub fn new(datum: &'a Datum) -> Self {
        Self {
            datum,
            fundamental: Ellipsoid::wgs84(),
            helmert: HelmertConfig::default(),
        }
    }

    pub fn with_helmert(mut self, helmert: HelmertConfig) -> Self {
        self.helmert = helmert;
        self
    }

    pub fn datum(&self) -> &Datum {
        self.datum
    }

    pub fn strategy(&self) -> Result<Strategy> {
        Strategy::select(self.datum).ok_or(DatumShiftError::NoTransformMatched)
    }

    /// Datum → fundamental frame.
    pub fn to_fundamental(&self, g: Geodetic) -> Result<Geodetic> {
        let strategy = self.strategy()?;
        debug!(datum = %self.datum.name, %strategy, "Transforming to fundamental frame");
        let out = match strategy {
            Strategy::Identity => g,
            Strategy::Molodensky => {
                let t = self.translation()?;
                molodensky_shift(&g, &self.datum.ellipsoid, &self.fundamental, t)
            }
            Strategy::Helmert => {
                let h = self.helmert()?;
                let p = geodetic_to_ecef(&self.datum.ellipsoid, &g);
                let q = h.inverse(p, &self.helmert)?;
                ecef_to_geodetic(&self.fundamental, q)
            }
        };
        Ok(out)
    }

    /// Fundamental frame → datum.
    pub fn from_fundamental(&self, g: Geodetic) -> Result<Geodetic> {
        let strategy = self.strategy()?;
        debug!(datum = %self.datum.name, %strategy, "Transforming from fundamental frame");
        let out = match strategy {
            Strategy::Identity => g,
            Strategy::Molodensky => {
                let [dx, dy, dz] = self.translation()?;
                molodensky_shift(&g, &self.fundamental, &self.datum.ellipsoid, [-dx, -dy, -dz])
            }
            Strategy::Helmert => {
                let h = self.helmert()?;
                let p = geodetic_to_ecef(&self.fundamental, &g);
                ecef_to_geodetic(&self.datum.ellipsoid, h.forward(p))
            }
        };
        Ok(out)
    }

    /// Geodetic on the datum → geocentric spherical, through the fundamental frame.
    pub fn to_geocentric(&self, g: Geodetic) -> Result<Geocentric> {
        let f = self.to_fundamental(g)?;
        Ok(geodetic_to_geocentric(&self.fundamental, &f))
    }

    /// Geocentric spherical → geodetic on the datum.
    pub fn from_geocentric(&self, gc: Geocentric) -> Result<Geodetic> {
        let f = geocentric_to_geodetic(&self.fundamental, &gc)?;
        self.from_fundamental(f)
    }

    fn translation(&self) -> Result<[f64; 3]> {
        self.datum
            .params
            .translation_vector()
            .ok_or(DatumShiftError::NoTransformMatched)
    }

    fn helmert(&self) -> Result<Helmert> {
        Helmert::from_params(&self.datum.params).ok_or(DatumShiftError::NoTransformMatched)
    }
}
