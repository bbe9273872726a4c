//! I/O operations for point clouds and meshes
//!
//! This crate provides text codecs for OBJ, ASCII PLY and JSON, each
//! implementing the reader/writer contracts of `spatialconv-core`, and an
//! [`IoRegistry`] that picks a codec by file extension.

pub mod error;
pub mod json;
pub mod obj;
pub mod ply;
pub mod registry;

pub use error::*;
pub use json::{JsonReader, JsonWriter};
pub use obj::{ObjReader, ObjWriteOptions, ObjWriter};
pub use ply::{PlyReader, PlyWriter};
pub use registry::IoRegistry;

use spatialconv_core::{Geometry, Result};
use std::path::Path;

/// Auto-detect format from the extension and read geometry
pub fn read_geometry<P: AsRef<Path>>(path: P) -> Result<Geometry> {
    IoRegistry::with_defaults().read_file(path)
}

/// Auto-detect format from the extension and write geometry
pub fn write_geometry<P: AsRef<Path>>(geometry: &Geometry, path: P) -> Result<()> {
    IoRegistry::with_defaults().write_file(geometry, path)
}
