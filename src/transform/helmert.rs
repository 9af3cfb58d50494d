use glam::{DMat3, DVec3};
use tracing::debug;

use crate::config::HelmertConfig;
use crate::error::{DatumShiftError, Result};
use crate::types::TransformParams;

/// Seven-parameter similarity transform from the fundamental frame to a datum,
/// linearised for small rotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helmert {
    translation: DVec3,
    /// `[[ds, -rz, ry], [rz, ds, -rx], [-ry, rx, ds]]` with `ds = scale - 1`.
    matrix: DMat3,
}

impl Helmert {
    /// `None` unless all seven parameters are defined.
    pub fn from_params(params: &TransformParams) -> Option<Self> {
        let translation = DVec3::from_array(params.translation_vector()?);
        let ([rx, ry, rz], scale) = params.rotation_and_scale()?;
        let ds = scale - 1.0;
        // glam matrices are column-major.
        let matrix = DMat3::from_cols(
            DVec3::new(ds, rz, -ry),
            DVec3::new(-rz, ds, rx),
            DVec3::new(ry, -rx, ds),
        );
        Some(Self {
            translation,
            matrix,
        })
    }

    /// Offset added to a fundamental-frame point.
    pub fn shift(&self, p: DVec3) -> DVec3 {
        self.translation + self.matrix * p
    }

    /// Fundamental frame to datum, closed form.
    pub fn forward(&self, p: DVec3) -> DVec3 {
        p + self.shift(p)
    }

    /// Datum to fundamental frame.
    ///
    /// Solves `p = q + shift(q)` for `q` by fixed-point iteration on the
    /// shift `d = T + M·(p - d)`, stopping once successive shifts agree within
    /// `config.tolerance` on every axis.
    pub fn inverse(&self, p: DVec3, config: &HelmertConfig) -> Result<DVec3> {
        let mut d = DVec3::ZERO;
        for iteration in 1..=config.max_iterations {
            let next = self.shift(p - d);
            if (next - d).abs().max_element() < config.tolerance {
                debug!(iteration, "Helmert inverse converged");
                return Ok(p - next);
            }
            d = next;
        }
        Err(DatumShiftError::HelmertDiverged {
            iterations: config.max_iterations,
        })
    }
}
