use glam::DVec3;
use num_complex::Complex64;
use tracing::debug;

use super::ecef::geodetic_to_ecef;
use super::quartic::{polish_root, solve_quartic};
use crate::error::{DatumShiftError, Result};
use crate::types::{Ellipsoid, Geocentric, Geodetic};

/// Roots with a larger imaginary part (in units of a²) are discarded.
const IMAGINARY_EPS: f64 = 1e-6;
/// Squared distances below this are treated as lying on the surface.
const ON_SURFACE_EPS: f64 = 1e-9;
/// Largest accepted `x²/a² + y²/a² + z²/b² - 1` of a candidate foot point
/// (about 3 mm on the WGS84 ellipsoid).
const SURFACE_EPS: f64 = 1e-9;

/// Spherical coordinates of a geodetic point on `ellipsoid`.
pub fn geodetic_to_geocentric(ellipsoid: &Ellipsoid, g: &Geodetic) -> Geocentric {
    let p = geodetic_to_ecef(ellipsoid, g);
    let radius = p.length();
    let latitude = if radius > 0.0 {
        (p.z / radius).asin()
    } else {
        0.0
    };
    Geocentric {
        latitude,
        longitude: p.y.atan2(p.x),
        radius,
    }
}

/// Geodetic coordinates on `ellipsoid` of a spherical point, via the nearest
/// point on the ellipsoid surface.
///
/// With `A = a²`, `B = b²` the foot point of `(x0, y0, z0)` is
/// `(A·x0/(A+α), A·y0/(A+α), B·z0/(B+α))` where `α` is a root of the quartic
/// obtained by putting that point on the surface. `α` is solved in units of
/// `A` to keep the coefficients of order one.
pub fn geocentric_to_geodetic(ellipsoid: &Ellipsoid, gc: &Geocentric) -> Result<Geodetic> {
    let (sin_lat, cos_lat) = gc.latitude.sin_cos();
    let (sin_lon, cos_lon) = gc.longitude.sin_cos();
    let p0 = DVec3::new(
        gc.radius * cos_lat * cos_lon,
        gc.radius * cos_lat * sin_lon,
        gc.radius * sin_lat,
    );

    let (foot, d2) = nearest_surface_point(ellipsoid, p0)?;

    if d2 < ON_SURFACE_EPS {
        debug!(radius = gc.radius, "Point on ellipsoid surface, lifting by 1 m");
        let lifted = Geocentric {
            radius: gc.radius + 1.0,
            ..*gc
        };
        let mut g = geocentric_to_geodetic(ellipsoid, &lifted)?;
        g.elevation -= 1.0;
        return Ok(g);
    }

    let a2 = ellipsoid.semi_major_axis().powi(2);
    let b2 = ellipsoid.semi_minor_axis().powi(2);
    let inside = (p0.x * p0.x + p0.y * p0.y) / a2 + p0.z * p0.z / b2 < 1.0;
    let distance = d2.sqrt();
    let elevation = if inside { -distance } else { distance };

    // Latitude of the surface normal at the foot point; equals
    // asin((z0 - zc) / elevation) but keeps precision for small elevations.
    let latitude = (foot.z * a2).atan2(foot.x.hypot(foot.y) * b2);

    Ok(Geodetic {
        latitude,
        longitude: p0.y.atan2(p0.x),
        elevation,
    })
}

/// Foot point on the surface closest to `p0`, and its squared distance.
///
/// Every real root is polished and mapped to a foot point; candidates that do
/// not land on the surface are dropped. Near the equator the quartic has an
/// ill-conditioned double root at `t = -q` whose polished value can wander
/// off the surface while still looking close to `p0`.
fn nearest_surface_point(ellipsoid: &Ellipsoid, p0: DVec3) -> Result<(DVec3, f64)> {
    let quartic = FootQuartic::new(ellipsoid, p0);
    let (foot, d2) = quartic
        .closest(&quartic.roots())
        .ok_or(DatumShiftError::NoRealRootFound)?;
    debug!(d2, "Selected nearest-point root");
    Ok((foot, d2))
}

/// Quartic in `t = α/a²` whose real roots parametrise the surface normals
/// through `p0`.
struct FootQuartic {
    p0: DVec3,
    a2: f64,
    b2: f64,
    q: f64,
    coefficients: [f64; 4],
}

impl FootQuartic {
    fn new(ellipsoid: &Ellipsoid, p0: DVec3) -> Self {
        let a2 = ellipsoid.semi_major_axis().powi(2);
        let b2 = ellipsoid.semi_minor_axis().powi(2);
        let q = b2 / a2;
        let r = (p0.x * p0.x + p0.y * p0.y) / a2;
        let z = p0.z * p0.z / a2;

        let coefficients = [
            2.0 * (1.0 + q),
            1.0 + 4.0 * q + q * q - r - q * z,
            2.0 * q * (1.0 + q - r - z),
            q * q - q * q * r - q * z,
        ];
        Self {
            p0,
            a2,
            b2,
            q,
            coefficients,
        }
    }

    fn roots(&self) -> [Complex64; 4] {
        let [c3, c2, c1, c0] = self.coefficients;
        solve_quartic(c3, c2, c1, c0)
    }

    fn foot(&self, t: f64) -> DVec3 {
        DVec3::new(
            self.p0.x / (1.0 + t),
            self.p0.y / (1.0 + t),
            self.p0.z * self.q / (self.q + t),
        )
    }

    /// `x²/a² + y²/a² + z²/b² - 1`; zero on the surface.
    fn surface_residual(&self, p: DVec3) -> f64 {
        (p.x * p.x + p.y * p.y) / self.a2 + p.z * p.z / self.b2 - 1.0
    }

    /// Real root refined by Newton, unless refinement moved it off the surface.
    fn refine(&self, t: f64) -> f64 {
        let [c3, c2, c1, c0] = self.coefficients;
        let polished = polish_root(t, c3, c2, c1, c0);
        let off_surface = |t: f64| self.surface_residual(self.foot(t)).abs();
        if off_surface(polished) <= off_surface(t) {
            polished
        } else {
            t
        }
    }

    /// Nearest on-surface foot point among `roots`, with its squared distance.
    fn closest(&self, roots: &[Complex64]) -> Option<(DVec3, f64)> {
        roots
            .iter()
            // NaN parts fail both comparisons and are dropped.
            .filter(|root| root.im.abs() <= IMAGINARY_EPS)
            .filter_map(|root| self.candidate(self.refine(root.re)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Foot point of `t` with its squared distance, if it lies on the surface.
    fn candidate(&self, t: f64) -> Option<(DVec3, f64)> {
        let foot = self.foot(t);
        let on_surface = foot.is_finite() && self.surface_residual(foot).abs() <= SURFACE_EPS;
        on_surface.then(|| (foot, self.p0.distance_squared(foot)))
    }
}
