//! Core data structures and traits for spatialconv
//!
//! This crate provides the geometric data model shared by the converters and
//! codecs: points and vectors, triangles, bounding boxes, colors, indexed
//! meshes, point clouds with per-point attributes, and 4x4 affine transforms.

pub mod color;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod metadata;
pub mod point;
pub mod point_cloud;
pub mod traits;
pub mod transform;

pub use color::*;
pub use error::*;
pub use geometry::*;
pub use mesh::*;
pub use metadata::*;
pub use point::*;
pub use point_cloud::*;
pub use traits::*;
pub use transform::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3};
