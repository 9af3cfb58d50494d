use std::io;

/// All error types for datum conversion and octree coding.
#[derive(thiserror::Error, Debug)]
pub enum DatumShiftError {
    #[error("Insufficient ellipsoid parameters: {0}")]
    InsufficientParameters(String),
    #[error("Invalid ellipsoid shape: {0}")]
    InvalidShape(String),
    #[error("No datum transformation matched the datum parameters")]
    NoTransformMatched,
    #[error("Helmert inverse did not converge after {iterations} iterations")]
    HelmertDiverged { iterations: usize },
    #[error("No real root found for the nearest-point quartic")]
    NoRealRootFound,
    #[error("Octree depth mismatch: requested {requested}, code has {stored}")]
    DepthMismatch { requested: u8, stored: u8 },
    #[error("Invalid octree depth: {0}")]
    InvalidDepth(u16),
    #[error("Octree code of depth {depth} has {count} octants")]
    OctantCountMismatch { depth: u8, count: usize },
    #[error("Invalid octant value: {0}")]
    InvalidOctant(u8),
    #[error("Invalid octant character: {0:?}")]
    InvalidOctantChar(char),
    #[error("Point lies outside the global octree bounds")]
    OutOfBounds,
    #[error("Unknown datum: {0}")]
    UnknownDatum(String),
    #[error("Unknown ellipsoid: {0}")]
    UnknownEllipsoid(String),
    #[error("Input error: {0}")]
    Input(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DatumShiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_strings() {
        let e = DatumShiftError::InsufficientParameters("need two".into());
        assert_eq!(e.to_string(), "Insufficient ellipsoid parameters: need two");

        let e = DatumShiftError::DepthMismatch {
            requested: 24,
            stored: 12,
        };
        assert_eq!(e.to_string(), "Octree depth mismatch: requested 24, code has 12");

        let e = DatumShiftError::HelmertDiverged { iterations: 100 };
        assert_eq!(
            e.to_string(),
            "Helmert inverse did not converge after 100 iterations"
        );

        let e = DatumShiftError::UnknownDatum("Atlantis".into());
        assert_eq!(e.to_string(), "Unknown datum: Atlantis");

        let e = DatumShiftError::InvalidOctant(9);
        assert_eq!(e.to_string(), "Invalid octant value: 9");

        let e = DatumShiftError::InvalidOctantChar('x');
        assert_eq!(e.to_string(), "Invalid octant character: 'x'");

        let e = DatumShiftError::OctantCountMismatch { depth: 3, count: 2 };
        assert_eq!(e.to_string(), "Octree code of depth 3 has 2 octants");
    }

    #[test]
    fn from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file missing");
        let e: DatumShiftError = io_err.into();
        assert!(matches!(e, DatumShiftError::Io(_)));
        assert!(e.to_string().contains("file missing"));
    }

    #[test]
    fn from_json_error() {
        let json_err = serde_json::from_str::<Vec<f64>>("[1.0,").unwrap_err();
        let e: DatumShiftError = json_err.into();
        assert!(matches!(e, DatumShiftError::Json(_)));
    }
}
