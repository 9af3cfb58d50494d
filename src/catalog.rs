//! Named reference ellipsoids and datums.
//!
//! Plain data, built once on first use. Ellipsoids are stored in their
//! published partial form and resolved on lookup.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::{DatumShiftError, Result};
use crate::types::{Datum, Ellipsoid, EllipsoidParams, TransformParams};

fn arcsec(s: f64) -> f64 {
    (s / 3600.0).to_radians()
}

fn ppm(s: f64) -> f64 {
    1.0 + s * 1e-6
}

static ELLIPSOIDS: LazyLock<BTreeMap<&'static str, EllipsoidParams>> = LazyLock::new(|| {
    BTreeMap::from([
        ("WGS84", EllipsoidParams::from_axis_and_inverse_flattening(6_378_137.0, 298.257_223_563)),
        ("GRS80", EllipsoidParams::from_axis_and_inverse_flattening(6_378_137.0, 298.257_222_101)),
        ("AIRY1830", EllipsoidParams::from_axes(6_377_563.396, 6_356_256.909)),
        ("INTL1924", EllipsoidParams::from_axis_and_inverse_flattening(6_378_388.0, 297.0)),
        ("CLARKE1866", EllipsoidParams::from_axes(6_378_206.4, 6_356_583.8)),
        ("CLARKE1880", EllipsoidParams::from_axis_and_inverse_flattening(6_378_249.145, 293.465)),
        ("BESSEL1841", EllipsoidParams::from_axis_and_inverse_flattening(6_377_397.155, 299.152_812_8)),
    ])
});

struct DatumEntry {
    ellipsoid: &'static str,
    params: TransformParams,
}

static DATUMS: LazyLock<BTreeMap<&'static str, DatumEntry>> = LazyLock::new(|| {
    BTreeMap::from([
        (
            "WGS84",
            DatumEntry {
                ellipsoid: "WGS84",
                params: TransformParams::IDENTITY,
            },
        ),
        (
            "ED50",
            DatumEntry {
                ellipsoid: "INTL1924",
                params: TransformParams::translation(-87.0, -98.0, -121.0),
            },
        ),
        (
            "NAD27",
            DatumEntry {
                ellipsoid: "CLARKE1866",
                params: TransformParams::translation(-8.0, 160.0, 176.0),
            },
        ),
        (
            "TOKYO",
            DatumEntry {
                ellipsoid: "BESSEL1841",
                params: TransformParams::translation(-148.0, 507.0, 685.0),
            },
        ),
        (
            "ARC1960",
            DatumEntry {
                ellipsoid: "CLARKE1880",
                params: TransformParams::translation(-160.0, -6.0, -302.0),
            },
        ),
        (
            // Fundamental → datum, position-vector rotations.
            "OSGB36",
            DatumEntry {
                ellipsoid: "AIRY1830",
                params: TransformParams::helmert(
                    [-446.448, 125.157, -542.060],
                    [arcsec(-0.1502), arcsec(-0.2470), arcsec(-0.8421)],
                    ppm(20.4894),
                ),
            },
        ),
    ])
});

/// Resolve a named ellipsoid (case-insensitive).
pub fn ellipsoid(name: &str) -> Result<Ellipsoid> {
    ELLIPSOIDS
        .get(name.to_ascii_uppercase().as_str())
        .ok_or_else(|| DatumShiftError::UnknownEllipsoid(name.to_string()))?
        .resolve()
}

/// Resolve a named datum (case-insensitive).
pub fn datum(name: &str) -> Result<Datum> {
    let key = name.to_ascii_uppercase();
    let entry = DATUMS
        .get(key.as_str())
        .ok_or_else(|| DatumShiftError::UnknownDatum(name.to_string()))?;
    Ok(Datum::new(key, ellipsoid(entry.ellipsoid)?, entry.params))
}

/// Names of all catalog datums, sorted.
pub fn datum_names() -> Vec<&'static str> {
    DATUMS.keys().copied().collect()
}
