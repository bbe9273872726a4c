//! Core traits for spatialconv

use crate::error::Result;
use crate::mesh::Mesh;
use crate::metadata::Metadata;
use crate::point_cloud::PointCloud;
use crate::transform::Transform3D;

/// Either aggregate a codec can produce or consume
#[derive(Debug, Clone)]
pub enum Geometry {
    Mesh(Mesh),
    PointCloud(PointCloud),
}

impl Geometry {
    /// Short lowercase kind name, used in messages
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Mesh(_) => "mesh",
            Geometry::PointCloud(_) => "point cloud",
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Geometry::Mesh(mesh) => mesh.metadata(),
            Geometry::PointCloud(cloud) => cloud.metadata(),
        }
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            Geometry::Mesh(mesh) => Some(mesh),
            Geometry::PointCloud(_) => None,
        }
    }

    pub fn as_point_cloud(&self) -> Option<&PointCloud> {
        match self {
            Geometry::PointCloud(cloud) => Some(cloud),
            Geometry::Mesh(_) => None,
        }
    }
}

impl From<Mesh> for Geometry {
    fn from(mesh: Mesh) -> Self {
        Geometry::Mesh(mesh)
    }
}

impl From<PointCloud> for Geometry {
    fn from(cloud: PointCloud) -> Self {
        Geometry::PointCloud(cloud)
    }
}

/// Parses full file contents into geometry
pub trait GeometryReader: Send + Sync {
    /// Get the format name this reader handles
    fn format_name(&self) -> &'static str;

    /// Lowercase file extensions, without the dot
    fn supported_extensions(&self) -> &[&'static str];

    /// Parse `content`; failures are [`crate::Error::Parse`] with a readable message
    fn read(&self, content: &str) -> Result<Geometry>;
}

/// Serializes geometry into file contents
pub trait GeometryWriter: Send + Sync {
    /// Get the format name this writer handles
    fn format_name(&self) -> &'static str;

    /// Lowercase file extensions, without the dot
    fn supported_extensions(&self) -> &[&'static str];

    fn write(&self, geometry: &Geometry) -> Result<String>;
}

/// Trait for objects that can be transformed
pub trait Transformable {
    /// Positions go through [`Transform3D::apply`], directions through
    /// [`Transform3D::apply_to_vector`]
    fn transformed(&self, transform: &Transform3D) -> Self;
}

impl Transformable for PointCloud {
    fn transformed(&self, transform: &Transform3D) -> Self {
        self.map_geometry(|p| transform.apply(p), |n| transform.apply_to_vector(n))
    }
}

impl Transformable for Mesh {
    fn transformed(&self, transform: &Transform3D) -> Self {
        self.map_geometry(|p| transform.apply(p), |n| transform.apply_to_vector(n))
    }
}

impl Transformable for Geometry {
    fn transformed(&self, transform: &Transform3D) -> Self {
        match self {
            Geometry::Mesh(mesh) => Geometry::Mesh(mesh.transformed(transform)),
            Geometry::PointCloud(cloud) => Geometry::PointCloud(cloud.transformed(transform)),
        }
    }
}
