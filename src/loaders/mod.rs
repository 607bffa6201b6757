//! Loaders that turn serialized descriptors into editor resources

pub mod descriptor;
pub mod error;
pub mod geometry_loader;
pub mod legacy;
pub mod object;

pub use descriptor::{DescriptorHeader, GeometryDescriptor};
pub use error::GeometryError;
pub use geometry_loader::{GeometryLoader, LoadProgress};
pub use legacy::{LegacyGeometryLoader, LegacyModel};
pub use object::{parse_geometries, parse_shapes};
