use std::fs;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::catalog;
use crate::config::{AngleUnit, ConversionConfig, DatumSource, PipelineConfig};
use crate::error::{DatumShiftError, Result};
use crate::octree::OctreeCodec;
use crate::transform::DatumTransform;
use crate::types::{Datum, DatumDefinition, Position};

/// Which fields of a record drove its conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Datum,
    Fundamental,
    OctreeCode,
}

/// Outcome of converting a batch of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Logical AND over all records.
    pub success: bool,
    pub converted: usize,
    pub failed: usize,
}

/// Summary of a completed file run.
#[derive(Debug)]
pub struct ProcessingResult {
    pub report: BatchReport,
    pub duration: Duration,
}

/// Conversion orchestrator: fills in missing fields of position records.
pub struct Pipeline;

impl Pipeline {
    /// Convert every record in place.
    ///
    /// Records are independent; a failed record is left as supplied and makes
    /// the aggregate `false`, but the rest of the batch is still processed.
    pub fn convert(config: &ConversionConfig, datum: &Datum, positions: &mut [Position]) -> BatchReport {
        let transform = DatumTransform::new(datum).with_helmert(config.helmert);
        let codec = OctreeCodec::new(config.max_elevation);

        let outcomes: Vec<bool> = positions
            .par_iter_mut()
            .enumerate()
            .map(|(i, position)| match convert_one(config, &transform, &codec, position) {
                Ok(mode) => {
                    debug!(record = i, ?mode, "Converted record");
                    true
                }
                Err(e) => {
                    warn!(record = i, error = %e, "Record conversion failed");
                    false
                }
            })
            .collect();

        let converted = outcomes.iter().filter(|ok| **ok).count();
        let failed = outcomes.len() - converted;
        info!(datum = %datum.name, converted, failed, "Batch complete");

        BatchReport {
            success: failed == 0,
            converted,
            failed,
        }
    }

    /// Read a position file, convert it, and write the result.
    pub fn run(config: &PipelineConfig) -> Result<ProcessingResult> {
        let start = Instant::now();

        info!(input = %config.input.display(), "Starting conversion");

        let datum = resolve_datum(&config.datum)?;
        info!(datum = %datum.name, "Resolved datum");

        let content = fs::read_to_string(&config.input).map_err(|e| {
            DatumShiftError::Input(format!("Failed to read {}: {e}", config.input.display()))
        })?;
        let mut positions: Vec<Position> = serde_json::from_str(&content)?;
        info!(records = positions.len(), angles = %config.angles, "Loaded positions");

        if config.angles == AngleUnit::Degrees {
            positions.iter_mut().for_each(|p| p.map_angles(f64::to_radians));
        }

        let report = Self::convert(&config.conversion, &datum, &mut positions);

        if config.angles == AngleUnit::Degrees {
            positions.iter_mut().for_each(|p| p.map_angles(f64::to_degrees));
        }

        if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config.output, serde_json::to_string_pretty(&positions)?)?;

        let duration = start.elapsed();
        info!(output = %config.output.display(), elapsed = ?duration, "Conversion complete");

        Ok(ProcessingResult { report, duration })
    }
}

/// Load the datum named by the configuration.
pub fn resolve_datum(source: &DatumSource) -> Result<Datum> {
    match source {
        DatumSource::Catalog(name) => catalog::datum(name),
        DatumSource::File(path) => {
            let content = fs::read_to_string(path).map_err(|e| {
                DatumShiftError::Input(format!("Failed to read datum file {}: {e}", path.display()))
            })?;
            let definition: DatumDefinition = serde_json::from_str(&content)?;
            definition.resolve()
        }
    }
}

/// Fill in one record. Priority: datum triple, fundamental triple, octree code.
///
/// Every output is computed before any field is written, so a failed record is
/// left exactly as it came in.
fn convert_one(
    config: &ConversionConfig,
    transform: &DatumTransform<'_>,
    codec: &OctreeCodec,
    position: &mut Position,
) -> Result<InputMode> {
    let depth = match position.octree_depth {
        0 => config.default_depth,
        requested => requested,
    };

    if let Some(local) = position.datum_geodetic() {
        let fundamental = transform.to_fundamental(local)?;
        let code = codec.encode(depth, &fundamental)?;
        position.set_fundamental(fundamental);
        position.octree_depth = depth;
        position.octree_code = Some(code);
        return Ok(InputMode::Datum);
    }

    if let Some(fundamental) = position.fundamental_geodetic() {
        let local = transform.from_fundamental(fundamental)?;
        let code = codec.encode(depth, &fundamental)?;
        position.set_datum(local);
        position.octree_depth = depth;
        position.octree_code = Some(code);
        return Ok(InputMode::Fundamental);
    }

    if let Some(code) = position.octree_code.as_ref().filter(|_| position.octree_depth > 0) {
        let fundamental = codec.decode_at(code, position.octree_depth)?;
        let local = transform.from_fundamental(fundamental)?;
        position.set_fundamental(fundamental);
        position.set_datum(local);
        return Ok(InputMode::OctreeCode);
    }

    Err(DatumShiftError::Input(
        "record has neither a full coordinate triple nor an octree code".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Geodetic, OctreeCode};

    fn config() -> ConversionConfig {
        ConversionConfig::default()
    }

    #[test]
    fn fundamental_only_defaults_depth_and_encodes() {
        let datum = Datum::fundamental();
        let mut records = vec![Position::from_fundamental(0.5, 0.25, -100.0)];
        let report = Pipeline::convert(&config(), &datum, &mut records);

        assert!(report.success);
        let p = &records[0];
        assert_eq!(p.octree_depth, 24);
        let code = p.octree_code.as_ref().unwrap();
        assert_eq!(code.depth(), 24);
        assert_eq!(code.octants().len(), 24);
        assert_eq!(p.datum_latitude, Some(0.5));
        assert_eq!(p.datum_vertical_depth, Some(-100.0));
    }

    #[test]
    fn datum_input_takes_priority() {
        let datum = catalog::datum("ED50").unwrap();
        let mut p = Position::from_datum(0.8, 0.05, 10.0);
        p.fundamental_latitude = Some(9.0);
        p.fundamental_longitude = Some(9.0);
        p.fundamental_vertical_depth = Some(9.0);
        let mut records = vec![p];
        assert!(Pipeline::convert(&config(), &datum, &mut records).success);
        // Fundamental fields were overwritten from the datum triple.
        assert!((records[0].fundamental_latitude.unwrap() - 0.8).abs() < 1e-4);
    }

    #[test]
    fn requested_depth_is_kept() {
        let datum = Datum::fundamental();
        let mut p = Position::from_datum(0.1, 0.1, 0.0);
        p.octree_depth = 7;
        let mut records = vec![p];
        Pipeline::convert(&config(), &datum, &mut records);
        assert_eq!(records[0].octree_code.as_ref().unwrap().depth(), 7);
    }

    #[test]
    fn code_input_decodes_to_cell_centre() {
        let datum = Datum::fundamental();
        let codec = OctreeCodec::default();
        let code = codec.encode(20, &Geodetic::new(0.4, -0.3, 55.0)).unwrap();
        let mut records = vec![Position::from_code(code.clone())];

        assert!(Pipeline::convert(&config(), &datum, &mut records).success);
        let p = &records[0];
        let cell = codec.cell_size(20);
        assert!((p.fundamental_latitude.unwrap() - 0.4).abs() <= cell[0]);
        assert!((p.datum_vertical_depth.unwrap() + 55.0).abs() <= cell[2]);
        assert_eq!(p.octree_code.as_ref(), Some(&code));
    }

    #[test]
    fn code_depth_mismatch_fails() {
        let datum = Datum::fundamental();
        let code: OctreeCode = "0123".parse().unwrap();
        let mut p = Position::from_code(code);
        p.octree_depth = 5;
        let mut records = vec![p];
        let report = Pipeline::convert(&config(), &datum, &mut records);
        assert!(!report.success);
        assert!(records[0].fundamental_latitude.is_none());
    }

    #[test]
    fn code_without_depth_fails() {
        let datum = Datum::fundamental();
        let mut p = Position::from_code("01".parse().unwrap());
        p.octree_depth = 0;
        let mut records = vec![p];
        assert!(!Pipeline::convert(&config(), &datum, &mut records).success);
    }

    #[test]
    fn failure_does_not_stop_batch() {
        let datum = Datum::fundamental();
        let mut records = vec![
            Position::default(),
            Position::from_fundamental(0.2, 0.3, 4.0),
        ];
        let report = Pipeline::convert(&config(), &datum, &mut records);

        assert!(!report.success);
        assert_eq!(report.converted, 1);
        assert_eq!(report.failed, 1);
        assert!(records[1].datum_latitude.is_some());
        assert!(records[1].octree_code.is_some());
    }

    #[test]
    fn unmatched_datum_fails_every_record() {
        let datum = Datum::new(
            "bare",
            crate::types::Ellipsoid::wgs84(),
            crate::types::TransformParams::default(),
        );
        let mut records = vec![Position::from_datum(0.1, 0.1, 0.0)];
        let report = Pipeline::convert(&config(), &datum, &mut records);
        assert!(!report.success);
        assert!(records[0].fundamental_latitude.is_none());
        assert!(records[0].octree_code.is_none());
    }

    #[test]
    fn out_of_bounds_elevation_fails_record() {
        let datum = Datum::fundamental();
        let mut records = vec![
            Position::from_datum(0.1, 0.1, -30_000.0),
            Position::from_fundamental(0.1, 0.1, -30_000.0),
        ];
        let untouched = records.clone();
        assert!(!Pipeline::convert(&config(), &datum, &mut records).success);

        // Nothing is written back for a failed record, not even the default depth.
        assert_eq!(records, untouched);
        assert!(records[0].fundamental_latitude.is_none());
        assert!(records[1].datum_latitude.is_none());
        assert_eq!(records[0].octree_depth, 0);
        assert!(records[0].octree_code.is_none());
    }

    #[test]
    fn failed_datum_transform_leaves_code_record_untouched() {
        let datum = Datum::new(
            "bare",
            crate::types::Ellipsoid::wgs84(),
            crate::types::TransformParams::default(),
        );
        let mut records = vec![Position::from_code("0123".parse().unwrap())];
        let untouched = records.clone();
        assert!(!Pipeline::convert(&config(), &datum, &mut records).success);
        assert_eq!(records, untouched);
    }

    #[test]
    fn datum_near_antimeridian_converts() {
        let datum = catalog::datum("ED50").unwrap();
        let mut records = vec![Position::from_datum(0.8, std::f64::consts::PI - 1e-7, 0.0)];
        let report = Pipeline::convert(&config(), &datum, &mut records);

        assert!(report.success);
        let lon = records[0].fundamental_longitude.unwrap();
        assert!((-std::f64::consts::PI..=std::f64::consts::PI).contains(&lon), "lon {lon}");
        assert!(records[0].octree_code.is_some());
    }

    #[test]
    fn resolve_datum_from_catalog() {
        let d = resolve_datum(&DatumSource::Catalog("osgb36".into())).unwrap();
        assert_eq!(d.name, "OSGB36");
        assert!(resolve_datum(&DatumSource::Catalog("nowhere".into())).is_err());
    }
}
