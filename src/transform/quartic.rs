//! Closed-form roots of a monic quartic, carried out in complex arithmetic.

use num_complex::Complex64;

/// Below this, the depressed quartic is treated as biquadratic.
const BIQUADRATIC_EPS: f64 = 1e-14;

/// One root of the monic cubic `x³ + a2·x² + a1·x + a0` (Cardano).
fn cubic_root(a2: f64, a1: f64, a0: f64) -> Complex64 {
    let p = a1 - a2 * a2 / 3.0;
    let q = 2.0 * a2.powi(3) / 27.0 - a2 * a1 / 3.0 + a0;

    let disc = Complex64::new(q * q / 4.0 + p.powi(3) / 27.0, 0.0).sqrt();
    let mut c = (-q / 2.0 + disc).powf(1.0 / 3.0);
    if c.norm() < f64::MIN_POSITIVE {
        c = (-q / 2.0 - disc).powf(1.0 / 3.0);
    }
    let u = if c.norm() < f64::MIN_POSITIVE {
        Complex64::new(0.0, 0.0)
    } else {
        c - p / (3.0 * c)
    };
    u - a2 / 3.0
}

/// All four roots of `t⁴ + c3·t³ + c2·t² + c1·t + c0` (Ferrari).
pub fn solve_quartic(c3: f64, c2: f64, c1: f64, c0: f64) -> [Complex64; 4] {
    // Depress with t = y - c3/4: y⁴ + p·y² + q·y + r.
    let shift = -c3 / 4.0;
    let p = c2 - 3.0 * c3 * c3 / 8.0;
    let q = c1 - c3 * c2 / 2.0 + c3.powi(3) / 8.0;
    let r = c0 - c3 * c1 / 4.0 + c3 * c3 * c2 / 16.0 - 3.0 * c3.powi(4) / 256.0;

    let mut ys = [Complex64::new(0.0, 0.0); 4];
    if q.abs() < BIQUADRATIC_EPS {
        let d = Complex64::new(p * p - 4.0 * r, 0.0).sqrt();
        for (i, s) in [1.0, -1.0].into_iter().enumerate() {
            let w = ((-p + s * d) / 2.0).sqrt();
            ys[2 * i] = w;
            ys[2 * i + 1] = -w;
        }
    } else {
        // Nonzero root of the resolvent cubic; q != 0 rules out m = 0.
        let m = cubic_root(p, p * p / 4.0 - r, -q * q / 8.0);
        let s2m = (2.0 * m).sqrt();
        for (i, s1) in [1.0, -1.0].into_iter().enumerate() {
            let inner = (-(2.0 * p + 2.0 * m + s1 * std::f64::consts::SQRT_2 * q / m.sqrt())).sqrt();
            for (j, s2) in [1.0, -1.0].into_iter().enumerate() {
                ys[2 * i + j] = (s1 * s2m + s2 * inner) / 2.0;
            }
        }
    }

    ys.map(|y| y + shift)
}

/// Newton refinement of a real root against the real polynomial.
pub fn polish_root(t: f64, c3: f64, c2: f64, c1: f64, c0: f64) -> f64 {
    let mut t = t;
    for _ in 0..3 {
        let value = (((t + c3) * t + c2) * t + c1) * t + c0;
        let slope = ((4.0 * t + 3.0 * c3) * t + 2.0 * c2) * t + c1;
        if slope == 0.0 || !slope.is_finite() {
            break;
        }
        t -= value / slope;
    }
    t
}
