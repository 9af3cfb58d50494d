use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DatumShiftError, Result};

/// Fixed-depth octant path produced by the octree encoder.
///
/// Element `i` is the octant (0..=7) chosen at descent level `i`. The depth is
/// stored alongside and takes part in equality, so codes of different depths
/// never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawOctreeCode")]
pub struct OctreeCode {
    depth: u8,
    octants: Vec<u8>,
}

#[derive(Deserialize)]
struct RawOctreeCode {
    depth: u8,
    octants: Vec<u8>,
}

impl TryFrom<RawOctreeCode> for OctreeCode {
    type Error = DatumShiftError;

    fn try_from(raw: RawOctreeCode) -> Result<Self> {
        OctreeCode::new(raw.depth, raw.octants)
    }
}

impl OctreeCode {
    /// Validate and wrap an octant sequence.
    pub fn new(depth: u8, octants: Vec<u8>) -> Result<Self> {
        if depth == 0 {
            return Err(DatumShiftError::InvalidDepth(0));
        }
        if octants.len() != depth as usize {
            return Err(DatumShiftError::OctantCountMismatch {
                depth,
                count: octants.len(),
            });
        }
        if let Some(&bad) = octants.iter().find(|&&o| o > 7) {
            return Err(DatumShiftError::InvalidOctant(bad));
        }
        Ok(Self { depth, octants })
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn octants(&self) -> &[u8] {
        &self.octants
    }
}

impl fmt::Display for OctreeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for o in &self.octants {
            write!(f, "{o}")?;
        }
        Ok(())
    }
}

impl FromStr for OctreeCode {
    type Err = DatumShiftError;

    /// Parse a digit string such as `"0123"`; its length is the depth.
    fn from_str(s: &str) -> Result<Self> {
        let octants = s
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d @ 0..=7) => Ok(d as u8),
                Some(d) => Err(DatumShiftError::InvalidOctant(d as u8)),
                None => Err(DatumShiftError::InvalidOctantChar(c)),
            })
            .collect::<Result<Vec<u8>>>()?;
        let depth = u8::try_from(octants.len())
            .map_err(|_| DatumShiftError::InvalidDepth(octants.len().min(u16::MAX as usize) as u16))?;
        Self::new(depth, octants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_length_and_values() {
        assert!(OctreeCode::new(3, vec![0, 7, 4]).is_ok());
        assert!(matches!(
            OctreeCode::new(3, vec![0, 7]),
            Err(DatumShiftError::OctantCountMismatch { depth: 3, count: 2 })
        ));
        assert!(matches!(
            OctreeCode::new(0, vec![]),
            Err(DatumShiftError::InvalidDepth(0))
        ));
        assert!(matches!(
            OctreeCode::new(2, vec![1, 8]),
            Err(DatumShiftError::InvalidOctant(8))
        ));
    }

    #[test]
    fn display_and_parse() {
        let code = OctreeCode::new(4, vec![0, 1, 2, 7]).unwrap();
        assert_eq!(code.to_string(), "0127");
        let parsed: OctreeCode = "0127".parse().unwrap();
        assert_eq!(parsed, code);
        assert!(matches!(
            "0128".parse::<OctreeCode>(),
            Err(DatumShiftError::InvalidOctant(8))
        ));
        assert!(matches!(
            "01x2".parse::<OctreeCode>(),
            Err(DatumShiftError::InvalidOctantChar('x'))
        ));
        assert!("".parse::<OctreeCode>().is_err());
    }

    #[test]
    fn depth_takes_part_in_equality() {
        let a: OctreeCode = "01".parse().unwrap();
        let b: OctreeCode = "012".parse().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn json_keeps_depth_with_sequence() {
        let code = OctreeCode::new(2, vec![5, 3]).unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, r#"{"depth":2,"octants":[5,3]}"#);

        let bad = serde_json::from_str::<OctreeCode>(r#"{"depth":3,"octants":[5,3]}"#);
        assert!(bad.is_err());
    }
}
