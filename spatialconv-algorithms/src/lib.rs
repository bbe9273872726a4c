//! # spatialconv algorithms
//!
//! Conversions over the spatialconv data model: mesh surface sampling,
//! coordinate-system transformation, ENU velocity to bearing conversion, and
//! voxel grid downsampling.

pub mod bearing;
pub mod coordinates;
pub mod filtering;
pub mod sampling;

// Re-export commonly used items
pub use bearing::*;
pub use coordinates::*;
pub use filtering::*;
pub use sampling::*;
