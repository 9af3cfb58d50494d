use glam::DVec3;

use crate::types::{Ellipsoid, Geodetic};

/// Radius of curvature in the prime vertical, `N(φ)`.
pub fn normal_radius(ellipsoid: &Ellipsoid, latitude: f64) -> f64 {
    let sin_lat = latitude.sin();
    ellipsoid.semi_major_axis()
        / (1.0 - ellipsoid.eccentricity_squared() * sin_lat * sin_lat).sqrt()
}

/// Meridian radius of curvature, `M(φ) = a(1 - e²) / (1 - e² sin²φ)^1.5`.
pub fn meridian_radius(ellipsoid: &Ellipsoid, latitude: f64) -> f64 {
    let e2 = ellipsoid.eccentricity_squared();
    let sin_lat = latitude.sin();
    ellipsoid.semi_major_axis() * (1.0 - e2) / (1.0 - e2 * sin_lat * sin_lat).powf(1.5)
}

/// Convert a geodetic position on `ellipsoid` to earth-centred cartesian XYZ.
pub fn geodetic_to_ecef(ellipsoid: &Ellipsoid, g: &Geodetic) -> DVec3 {
    let (sin_lat, cos_lat) = g.latitude.sin_cos();
    let (sin_lon, cos_lon) = g.longitude.sin_cos();

    let n = normal_radius(ellipsoid, g.latitude);
    let h = g.elevation;

    DVec3::new(
        (n + h) * cos_lat * cos_lon,
        (n + h) * cos_lat * sin_lon,
        (n * (1.0 - ellipsoid.eccentricity_squared()) + h) * sin_lat,
    )
}

/// Convert earth-centred XYZ back to geodetic on `ellipsoid`.
///
/// Bowring's closed form through the reduced latitude; no iteration.
/// Sub-millimetre for terrestrial heights.
pub fn ecef_to_geodetic(ellipsoid: &Ellipsoid, p: DVec3) -> Geodetic {
    let a = ellipsoid.semi_major_axis();
    let b = ellipsoid.semi_minor_axis();
    let e2 = ellipsoid.eccentricity_squared();
    let ep2 = ellipsoid.second_eccentricity_squared();

    let rho = p.x.hypot(p.y);
    // atan2 resolves the quadrant from the signs of x and y.
    let longitude = p.y.atan2(p.x);

    // Reduced (parametric) latitude of the auxiliary point.
    let theta = (p.z * a).atan2(rho * b);
    let (sin_t, cos_t) = theta.sin_cos();

    let latitude = (p.z + ep2 * b * sin_t.powi(3)).atan2(rho - e2 * a * cos_t.powi(3));
    let (sin_lat, cos_lat) = latitude.sin_cos();

    // Valid at the poles as well as the equator.
    let elevation = rho * cos_lat + p.z * sin_lat - a * (1.0 - e2 * sin_lat * sin_lat).sqrt();

    Geodetic {
        latitude,
        longitude,
        elevation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn wgs84() -> Ellipsoid {
        Ellipsoid::wgs84()
    }

    #[test]
    fn geodetic_to_ecef_equator_prime_meridian() {
        let ecef = geodetic_to_ecef(&wgs84(), &Geodetic::new(0.0, 0.0, 0.0));
        assert_abs_diff_eq!(ecef.x, 6_378_137.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ecef.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ecef.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn geodetic_to_ecef_north_pole() {
        let e = wgs84();
        let ecef = geodetic_to_ecef(&e, &Geodetic::new(FRAC_PI_2, 0.0, 0.0));
        assert!(ecef.x.abs() < 1e-6);
        assert!(ecef.y.abs() < 1e-6);
        assert_abs_diff_eq!(ecef.z, e.semi_minor_axis(), epsilon = 1e-6);
    }

    #[test]
    fn geodetic_to_ecef_uses_longitude_for_y() {
        // London (51.5074° N, 0.1278° W): Y must follow longitude, not latitude.
        let g = Geodetic::new(51.5074_f64.to_radians(), (-0.1278_f64).to_radians(), 0.0);
        let ecef = geodetic_to_ecef(&wgs84(), &g);
        assert!((ecef.x - 3_978_000.0).abs() < 1000.0);
        assert!((ecef.y - (-8700.0)).abs() < 1000.0);
        assert!((ecef.z - 4_968_000.0).abs() < 1000.0);
    }

    #[test]
    fn geodetic_to_ecef_with_altitude() {
        let ground = geodetic_to_ecef(&wgs84(), &Geodetic::new(0.0, 0.0, 0.0));
        let high = geodetic_to_ecef(&wgs84(), &Geodetic::new(0.0, 0.0, 1000.0));
        assert_abs_diff_eq!(high.x - ground.x, 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn ecef_round_trip_all_quadrants() {
        let e = wgs84();
        for &lat in &[-1.2, -0.4, 0.0, 0.7, 1.5] {
            for &lon in &[-3.0, -1.6, -0.2, 0.0, 1.0, 2.5] {
                for &h in &[-5000.0, 0.0, 120.5, 15_000.0] {
                    let g = Geodetic::new(lat, lon, h);
                    let back = ecef_to_geodetic(&e, geodetic_to_ecef(&e, &g));
                    assert_abs_diff_eq!(back.latitude, lat, epsilon = 1e-10);
                    assert_abs_diff_eq!(back.longitude, lon, epsilon = 1e-12);
                    assert_abs_diff_eq!(back.elevation, h, epsilon = 1e-3);
                }
            }
        }
    }

    #[test]
    fn ecef_to_geodetic_at_pole() {
        let e = wgs84();
        let g = ecef_to_geodetic(&e, DVec3::new(0.0, 0.0, e.semi_minor_axis() + 10.0));
        assert_abs_diff_eq!(g.latitude, FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(g.elevation, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn radii_of_curvature() {
        let e = wgs84();
        // At the equator N = a and M = a(1 - e²).
        assert_abs_diff_eq!(normal_radius(&e, 0.0), e.semi_major_axis(), epsilon = 1e-6);
        assert_abs_diff_eq!(
            meridian_radius(&e, 0.0),
            e.semi_major_axis() * (1.0 - e.eccentricity_squared()),
            epsilon = 1e-6
        );
        // At the pole both equal a²/b.
        let polar = e.semi_major_axis().powi(2) / e.semi_minor_axis();
        assert_abs_diff_eq!(normal_radius(&e, FRAC_PI_2), polar, epsilon = 1e-6);
        assert_abs_diff_eq!(meridian_radius(&e, FRAC_PI_2), polar, epsilon = 1e-6);
    }
}
