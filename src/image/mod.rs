//! Sampled grids with physical geometry.
//!
//! - [`ImageGeometry`]: origin, spacing and size per axis, with index ↔
//!   physical conversions.
//! - [`Volume`]: owned `f32` samples on such a grid, axis 0 fastest.
pub mod geometry;
pub mod io;
pub mod volume;

pub use self::geometry::ImageGeometry;
pub use self::volume::Volume;
