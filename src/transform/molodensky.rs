use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::ecef::{meridian_radius, normal_radius};
use crate::types::{Ellipsoid, Geodetic};

/// Abridged Molodensky shift of `g` from `source` to `target`, given the
/// geocentric translation `t` of the source frame's origin.
///
/// Closed form, non-iterative. The longitude shift is left at zero on the
/// poles, where longitude is undefined. The shifted longitude is wrapped back
/// into [-π, π] and the latitude clamped to [-π/2, π/2].
pub fn molodensky_shift(g: &Geodetic, source: &Ellipsoid, target: &Ellipsoid, t: [f64; 3]) -> Geodetic {
    let [dx, dy, dz] = t;
    let a = source.semi_major_axis();
    let f = source.flattening();
    let e2 = source.eccentricity_squared();
    let da = target.semi_major_axis() - a;
    let df = target.flattening() - f;

    let (sin_lat, cos_lat) = g.latitude.sin_cos();
    let (sin_lon, cos_lon) = g.longitude.sin_cos();
    let h = g.elevation;

    let n = normal_radius(source, g.latitude);
    let m = meridian_radius(source, g.latitude);

    let d_lat = (-dx * sin_lat * cos_lon - dy * sin_lat * sin_lon
        + dz * cos_lat
        + da * n * e2 / a
        + df * (m / (1.0 - f) + n * (1.0 - f)) * sin_lat * cos_lat)
        / (m + h);

    let d_lon = if cos_lat.abs() < 1e-12 {
        0.0
    } else {
        (dy * cos_lon - dx * sin_lon) / ((n + h) * cos_lat)
    };

    let d_h = dx * cos_lat * cos_lon + dy * cos_lat * sin_lon + dz * sin_lat - da * a / n
        + df * (1.0 - f) * n * sin_lat * sin_lat;

    Geodetic {
        latitude: (g.latitude + d_lat).clamp(-FRAC_PI_2, FRAC_PI_2),
        longitude: wrap_longitude(g.longitude + d_lon),
        elevation: g.elevation + d_h,
    }
}

/// Bring a longitude that crossed the antimeridian back into [-π, π].
/// In-range values are returned untouched.
fn wrap_longitude(lon: f64) -> f64 {
    if lon > PI {
        lon - TAU
    } else if lon < -PI {
        lon + TAU
    } else {
        lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn intl() -> Ellipsoid {
        Ellipsoid::from_axis_and_flattening(6_378_388.0, 1.0 / 297.0)
    }

    #[test]
    fn zero_shift_same_ellipsoid_is_identity() {
        let e = Ellipsoid::wgs84();
        let g = Geodetic::new(0.8, 0.1, 250.0);
        let out = molodensky_shift(&g, &e, &e, [0.0; 3]);
        assert_eq!(out, g);
    }

    #[test]
    fn equator_translation_moves_height() {
        let e = Ellipsoid::wgs84();
        let g = Geodetic::new(0.0, 0.0, 0.0);
        let out = molodensky_shift(&g, &e, &e, [10.0, 0.0, 0.0]);
        // Along +x at (0, 0) the shift is purely vertical.
        assert_abs_diff_eq!(out.elevation, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.latitude, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(out.longitude, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn ed50_to_wgs84_magnitude() {
        // ED50 → WGS84 near Paris moves the point by roughly 100 m horizontally.
        let g = Geodetic::new(48.85_f64.to_radians(), 2.35_f64.to_radians(), 0.0);
        let out = molodensky_shift(&g, &intl(), &Ellipsoid::wgs84(), [-87.0, -98.0, -121.0]);
        let d_lat_m = (out.latitude - g.latitude) * 6_371_000.0;
        let d_lon_m = (out.longitude - g.longitude) * 6_371_000.0 * g.latitude.cos();
        let horizontal = d_lat_m.hypot(d_lon_m);
        assert!(horizontal > 50.0 && horizontal < 200.0, "shift {horizontal} m");
    }

    #[test]
    fn reverse_shift_approximately_undoes_forward() {
        let wgs = Ellipsoid::wgs84();
        let g = Geodetic::new(0.9, 0.2, 40.0);
        let there = molodensky_shift(&g, &intl(), &wgs, [-87.0, -98.0, -121.0]);
        let back = molodensky_shift(&there, &wgs, &intl(), [87.0, 98.0, 121.0]);
        assert_abs_diff_eq!(back.latitude, g.latitude, epsilon = 1e-6);
        assert_abs_diff_eq!(back.longitude, g.longitude, epsilon = 1e-6);
        assert_abs_diff_eq!(back.elevation, g.elevation, epsilon = 1.0);
    }

    #[test]
    fn pole_keeps_longitude() {
        let e = Ellipsoid::wgs84();
        let g = Geodetic::new(FRAC_PI_2, 0.3, 0.0);
        let out = molodensky_shift(&g, &e, &e, [5.0, 5.0, 5.0]);
        assert_eq!(out.longitude, 0.3);
        assert!(out.is_finite());
    }

    #[test]
    fn antimeridian_crossing_wraps_longitude() {
        let g = Geodetic::new(0.8, PI - 1e-7, 0.0);
        let out = molodensky_shift(&g, &intl(), &Ellipsoid::wgs84(), [-87.0, -98.0, -121.0]);
        assert!(out.longitude >= -PI && out.longitude <= PI, "lon {}", out.longitude);
        assert!(out.longitude < 0.0, "expected the western side, got {}", out.longitude);

        let back = molodensky_shift(&out, &Ellipsoid::wgs84(), &intl(), [87.0, 98.0, 121.0]);
        assert_abs_diff_eq!(back.longitude, g.longitude, epsilon = 1e-6);
    }

    #[test]
    fn latitude_stays_within_poles() {
        let e = Ellipsoid::wgs84();
        let g = Geodetic::new(FRAC_PI_2 - 1e-9, 0.0, 0.0);
        // Pushes the point about 8e-5 rad past the pole before clamping.
        let out = molodensky_shift(&g, &e, &e, [-500.0, 0.0, 0.0]);
        assert_eq!(out.latitude, FRAC_PI_2);
    }

    #[test]
    fn wrap_leaves_in_range_values_alone() {
        assert_eq!(wrap_longitude(0.1), 0.1);
        assert_eq!(wrap_longitude(PI), PI);
        assert_abs_diff_eq!(wrap_longitude(PI + 0.5), -PI + 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(wrap_longitude(-PI - 0.5), PI - 0.5, epsilon = 1e-15);
    }
}
