pub mod catalog;
pub mod config;
pub mod error;
pub mod octree;
pub mod pipeline;
pub mod transform;
pub mod types;

pub use config::{AngleUnit, ConversionConfig, HelmertConfig, PipelineConfig};
pub use error::{DatumShiftError, Result};
pub use octree::OctreeCodec;
pub use pipeline::{BatchReport, Pipeline};
pub use transform::DatumTransform;
