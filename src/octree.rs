use tracing::trace;

use crate::error::{DatumShiftError, Result};
use crate::types::{Bounds, Geodetic, MAX_ELEVATION, OctreeCode};

/// Fixed-depth octree codec over the global (latitude, longitude, elevation) box.
///
/// Stateless: the global bounds are rebuilt for every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctreeCodec {
    max_elevation: f64,
}

impl Default for OctreeCodec {
    fn default() -> Self {
        Self::new(MAX_ELEVATION)
    }
}

impl OctreeCodec {
    pub fn new(max_elevation: f64) -> Self {
        Self { max_elevation }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::global(self.max_elevation)
    }

    /// Encode a fundamental-frame position into `depth` octants.
    ///
    /// At every level the first octant, in index order, whose box contains the
    /// point is taken; points on a split plane therefore go to the lower index.
    pub fn encode(&self, depth: u8, g: &Geodetic) -> Result<OctreeCode> {
        if depth == 0 {
            return Err(DatumShiftError::InvalidDepth(0));
        }
        let point = [g.latitude, g.longitude, g.elevation];
        let mut bounds = self.bounds();
        if !bounds.contains_point(point) {
            return Err(DatumShiftError::OutOfBounds);
        }

        let mut octants = Vec::with_capacity(depth as usize);
        for _ in 0..depth {
            let octant = first_containing_octant(&bounds, point).ok_or(DatumShiftError::OutOfBounds)?;
            bounds = bounds.child(octant);
            octants.push(octant);
        }
        trace!(depth, "Encoded octree code");
        OctreeCode::new(depth, octants)
    }

    /// Centre of the cell addressed by `code`.
    ///
    /// Lossy: the result is within half a cell of the encoded point.
    pub fn decode(&self, code: &OctreeCode) -> Geodetic {
        let bounds = code
            .octants()
            .iter()
            .fold(self.bounds(), |b, &octant| b.child(octant));
        let [latitude, longitude, elevation] = bounds.center();
        Geodetic {
            latitude,
            longitude,
            elevation,
        }
    }

    /// Decode only if the code was produced at `requested` depth.
    pub fn decode_at(&self, code: &OctreeCode, requested: u8) -> Result<Geodetic> {
        if code.depth() != requested {
            return Err(DatumShiftError::DepthMismatch {
                requested,
                stored: code.depth(),
            });
        }
        Ok(self.decode(code))
    }

    /// Cell extent per axis at `depth`.
    pub fn cell_size(&self, depth: u8) -> [f64; 3] {
        let he = self.bounds().half_extents();
        let scale = 2f64.powi(depth as i32);
        [2.0 * he[0] / scale, 2.0 * he[1] / scale, 2.0 * he[2] / scale]
    }
}

fn first_containing_octant(bounds: &Bounds, point: [f64; 3]) -> Option<u8> {
    (0..8u8).find(|&o| bounds.child(o).contains_point(point))
}
