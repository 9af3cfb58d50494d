use std::f64::consts::{FRAC_PI_2, PI};

/// Default half-range of the elevation axis, in metres.
pub const MAX_ELEVATION: f64 = 20_000.0;

/// Axis-aligned box in (latitude, longitude, elevation) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Bounds {
    /// The whole globe: latitude ±π/2, longitude ±π, elevation ±`max_elevation`.
    pub fn global(max_elevation: f64) -> Self {
        Self {
            min: [-FRAC_PI_2, -PI, -max_elevation],
            max: [FRAC_PI_2, PI, max_elevation],
        }
    }

    /// Centre point of the box.
    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// Half-extents along each axis.
    pub fn half_extents(&self) -> [f64; 3] {
        [
            (self.max[0] - self.min[0]) * 0.5,
            (self.max[1] - self.min[1]) * 0.5,
            (self.max[2] - self.min[2]) * 0.5,
        ]
    }

    /// Whether a point lies inside (or on the boundary of) the box.
    pub fn contains_point(&self, p: [f64; 3]) -> bool {
        p[0] >= self.min[0]
            && p[0] <= self.max[0]
            && p[1] >= self.min[1]
            && p[1] <= self.max[1]
            && p[2] >= self.min[2]
            && p[2] <= self.max[2]
    }

    /// Child box for an octant index.
    ///
    /// Octant layout (bit pattern: elev_hi | lon_hi | lat_hi):
    ///   0 = (lo, lo, lo), 1 = (hi, lo, lo), 2 = (lo, hi, lo), 3 = (hi, hi, lo)
    ///   4 = (lo, lo, hi), 5 = (hi, lo, hi), 6 = (lo, hi, hi), 7 = (hi, hi, hi)
    pub fn child(&self, octant: u8) -> Bounds {
        let c = self.center();
        let mut min = self.min;
        let mut max = self.max;
        for axis in 0..3 {
            if octant & (1 << axis) != 0 {
                min[axis] = c[axis];
            } else {
                max[axis] = c[axis];
            }
        }
        Bounds { min, max }
    }
}
