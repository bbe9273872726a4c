//! Point cloud data structures and functionality

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::metadata::Metadata;
use crate::point::{Point3D, Vector3D};
use std::ops::Index;
use std::sync::OnceLock;

/// A set of points with optional per-point attributes
///
/// Every attribute that is present has exactly one entry per point. The
/// invariant is checked whenever a cloud is built, so a `PointCloud` value
/// always satisfies it.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    points: Vec<Point3D>,
    colors: Option<Vec<Color>>,
    normals: Option<Vec<Vector3D>>,
    intensity: Option<Vec<f64>>,
    metadata: Metadata,
    bounding_box: OnceLock<Option<BoundingBox>>,
}

impl PointCloud {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<Point3D>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Create a point cloud with all attributes at once
    pub fn with_attributes(
        points: Vec<Point3D>,
        colors: Option<Vec<Color>>,
        normals: Option<Vec<Vector3D>>,
        intensity: Option<Vec<f64>>,
        metadata: Metadata,
    ) -> Result<Self> {
        let count = points.len();
        check_len("colors", count, colors.as_ref().map(Vec::len))?;
        check_len("normals", count, normals.as_ref().map(Vec::len))?;
        check_len("intensity", count, intensity.as_ref().map(Vec::len))?;

        Ok(Self {
            points,
            colors,
            normals,
            intensity,
            metadata,
            bounding_box: OnceLock::new(),
        })
    }

    pub fn with_colors(self, colors: Vec<Color>) -> Result<Self> {
        check_len("colors", self.points.len(), Some(colors.len()))?;
        Ok(Self {
            colors: Some(colors),
            ..self
        })
    }

    pub fn with_normals(self, normals: Vec<Vector3D>) -> Result<Self> {
        check_len("normals", self.points.len(), Some(normals.len()))?;
        Ok(Self {
            normals: Some(normals),
            ..self
        })
    }

    pub fn with_intensity(self, intensity: Vec<f64>) -> Result<Self> {
        check_len("intensity", self.points.len(), Some(intensity.len()))?;
        Ok(Self {
            intensity: Some(intensity),
            ..self
        })
    }

    pub fn with_metadata(self, metadata: Metadata) -> Self {
        Self { metadata, ..self }
    }

    /// Replace the positions, keeping attributes and metadata
    pub fn with_points(&self, points: Vec<Point3D>) -> Result<Self> {
        Self::with_attributes(
            points,
            self.colors.clone(),
            self.normals.clone(),
            self.intensity.clone(),
            self.metadata.clone(),
        )
    }

    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    pub fn colors(&self) -> Option<&[Color]> {
        self.colors.as_deref()
    }

    pub fn normals(&self) -> Option<&[Vector3D]> {
        self.normals.as_deref()
    }

    pub fn intensity(&self) -> Option<&[f64]> {
        self.intensity.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, Point3D> {
        self.points.iter()
    }

    /// Bounds of all points, `None` for an empty cloud
    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        self.bounding_box
            .get_or_init(|| BoundingBox::from_points(&self.points).ok())
            .as_ref()
    }

    /// New cloud with positions and normals passed through the given maps
    ///
    /// Colors, intensity and metadata are copied unchanged.
    pub fn map_geometry<P, N>(&self, point: P, normal: N) -> PointCloud
    where
        P: Fn(&Point3D) -> Point3D,
        N: Fn(&Vector3D) -> Vector3D,
    {
        PointCloud {
            points: self.points.iter().map(point).collect(),
            colors: self.colors.clone(),
            normals: self
                .normals
                .as_ref()
                .map(|normals| normals.iter().map(normal).collect()),
            intensity: self.intensity.clone(),
            metadata: self.metadata.clone(),
            bounding_box: OnceLock::new(),
        }
    }

    /// New cloud holding the points at `indices` (in that order) with their attributes
    pub fn select(&self, indices: &[usize]) -> Result<PointCloud> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.points.len()) {
            return Err(Error::invalid(format!(
                "point index {} out of range for a cloud of {} points",
                bad,
                self.points.len()
            )));
        }

        fn pick<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| values[i]).collect()
        }

        Ok(PointCloud {
            points: pick(&self.points, indices),
            colors: self.colors.as_deref().map(|c| pick(c, indices)),
            normals: self.normals.as_deref().map(|n| pick(n, indices)),
            intensity: self.intensity.as_deref().map(|v| pick(v, indices)),
            metadata: self.metadata.clone(),
            bounding_box: OnceLock::new(),
        })
    }
}

fn check_len(attribute: &str, expected: usize, actual: Option<usize>) -> Result<()> {
    match actual {
        Some(actual) if actual != expected => Err(Error::invalid(format!(
            "{} has {} entries but the cloud has {} points",
            attribute, actual, expected
        ))),
        _ => Ok(()),
    }
}

impl Index<usize> for PointCloud {
    type Output = Point3D;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Point3D;
    type IntoIter = std::slice::Iter<'a, Point3D>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<Point3D> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3D>>(iter: I) -> Self {
        Self::from_points(Vec::from_iter(iter))
    }
}
