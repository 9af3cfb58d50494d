pub mod bounds;
pub mod coords;
pub mod datum;
pub mod ellipsoid;
pub mod octree_code;
pub mod position;

pub use bounds::{Bounds, MAX_ELEVATION};
pub use coords::{Geocentric, Geodetic};
pub use datum::{Datum, DatumDefinition, TransformParams};
pub use ellipsoid::{Ellipsoid, EllipsoidParams};
pub use octree_code::OctreeCode;
pub use position::Position;
