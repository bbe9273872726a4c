//! Triangles and axis-aligned bounding boxes

use crate::error::{Error, Result};
use crate::point::{Point3D, Vector3D, VectorExt};
use serde::{Deserialize, Serialize};

/// A triangle given by three vertex positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle3D {
    pub v0: Point3D,
    pub v1: Point3D,
    pub v2: Point3D,
}

impl Triangle3D {
    pub fn new(v0: Point3D, v1: Point3D, v2: Point3D) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unnormalized `(v1 - v0) x (v2 - v0)`; its length is twice the area
    fn edge_cross(&self) -> Vector3D {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit normal following the vertex winding; zero for degenerate triangles
    pub fn normal(&self) -> Vector3D {
        self.edge_cross().normalized()
    }

    pub fn centroid(&self) -> Point3D {
        Point3D::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    pub fn area(&self) -> f64 {
        self.edge_cross().magnitude() / 2.0
    }

    /// Point at barycentric weights `(1 - r1 - r2, r1, r2)`
    pub fn point_at(&self, r1: f64, r2: f64) -> Point3D {
        self.v0 + (self.v1 - self.v0) * r1 + (self.v2 - self.v0) * r2
    }
}

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3D,
    pub max: Point3D,
}

impl BoundingBox {
    /// Componentwise min/max over a non-empty set of points
    pub fn from_points(points: &[Point3D]) -> Result<Self> {
        let (first, rest) = points.split_first().ok_or_else(|| {
            Error::invalid("cannot build a bounding box from an empty point list")
        })?;

        let mut min = *first;
        let mut max = *first;
        for point in rest {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            min.z = min.z.min(point.z);

            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
            max.z = max.z.max(point.z);
        }

        Ok(Self { min, max })
    }

    pub fn center(&self) -> Point3D {
        nalgebra::center(&self.min, &self.max)
    }

    /// Extent along each axis
    pub fn dimensions(&self) -> Vector3D {
        self.max - self.min
    }

    /// Inclusive on every bound
    pub fn contains(&self, point: &Point3D) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }
}
