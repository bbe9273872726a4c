//! Coordinate-system conversion for point clouds and meshes

use spatialconv_core::{Geometry, Mesh, Point3D, PointCloud, Transform3D, Transformable, Vector3D};
use std::f64::consts::FRAC_PI_2;

/// Applies one affine transform to whole aggregates
///
/// Positions are fully transformed, normals only by the linear part. Colors,
/// intensity, faces and metadata pass through unchanged, and attribute
/// lengths never change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateTransformer {
    transform: Transform3D,
}

impl CoordinateTransformer {
    pub fn new(transform: Transform3D) -> Self {
        Self { transform }
    }

    /// Y-up to Z-up: rotation about X by -90 degrees
    pub fn y_up_to_z_up() -> Self {
        Self::new(Transform3D::rotation_x(-FRAC_PI_2))
    }

    /// Z-up to Y-up: rotation about X by +90 degrees, the inverse of [`Self::y_up_to_z_up`]
    pub fn z_up_to_y_up() -> Self {
        Self::new(Transform3D::rotation_x(FRAC_PI_2))
    }

    /// Uniform scale about the origin
    pub fn scale(factor: f64) -> Self {
        Self::new(Transform3D::uniform_scale(factor))
    }

    pub fn translate(offset: Vector3D) -> Self {
        Self::new(Transform3D::translation(offset.x, offset.y, offset.z))
    }

    pub fn transform(&self) -> &Transform3D {
        &self.transform
    }

    /// `self` first, then `other`
    pub fn then(&self, other: &CoordinateTransformer) -> Self {
        Self::new(self.transform.then(&other.transform))
    }

    pub fn apply_to_point(&self, point: &Point3D) -> Point3D {
        self.transform.apply(point)
    }

    pub fn apply(&self, cloud: &PointCloud) -> PointCloud {
        tracing::debug!(points = cloud.len(), "Transforming point cloud");
        cloud.transformed(&self.transform)
    }

    pub fn apply_to_mesh(&self, mesh: &Mesh) -> Mesh {
        tracing::debug!(vertices = mesh.vertex_count(), "Transforming mesh");
        mesh.transformed(&self.transform)
    }

    pub fn apply_to_geometry(&self, geometry: &Geometry) -> Geometry {
        match geometry {
            Geometry::Mesh(mesh) => Geometry::Mesh(self.apply_to_mesh(mesh)),
            Geometry::PointCloud(cloud) => Geometry::PointCloud(self.apply(cloud)),
        }
    }
}

impl From<Transform3D> for CoordinateTransformer {
    fn from(transform: Transform3D) -> Self {
        Self::new(transform)
    }
}
