//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::geometry::{BoundingBox, Triangle3D};
use crate::metadata::Metadata;
use crate::point::{Point3D, Vector3D};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A polygon referencing vertices of a mesh by index
///
/// Polygons are split by fan triangulation from the first index, which is only
/// correct for convex, planar polygons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Face {
    indices: Vec<usize>,
}

impl Face {
    /// Create a face from at least three vertex indices
    pub fn new(indices: Vec<usize>) -> Result<Self> {
        if indices.len() < 3 {
            return Err(Error::invalid(format!(
                "a face needs at least 3 vertex indices, got {}",
                indices.len()
            )));
        }
        Ok(Self { indices })
    }

    pub fn triangle(a: usize, b: usize, c: usize) -> Self {
        Self {
            indices: vec![a, b, c],
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() - 2
    }

    /// Fan triangles `(i0, i1, i2), (i0, i2, i3), ...`
    pub fn triangulate(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let first = self.indices[0];
        self.indices[1..]
            .windows(2)
            .map(move |pair| [first, pair[0], pair[1]])
    }

    fn is_within(&self, vertex_count: usize) -> bool {
        self.indices.iter().all(|&index| index < vertex_count)
    }
}

impl TryFrom<Vec<usize>> for Face {
    type Error = Error;

    fn try_from(indices: Vec<usize>) -> Result<Self> {
        Face::new(indices)
    }
}

impl From<Face> for Vec<usize> {
    fn from(face: Face) -> Self {
        face.indices
    }
}

/// An indexed polygon mesh
///
/// Vertices are stored once and referenced by index from faces. A mesh may be
/// built with dangling indices; [`Mesh::validate`] reports them and
/// [`Mesh::triangles`] refuses to triangulate until they are gone.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Point3D>,
    faces: Vec<Face>,
    normals: Option<Vec<Vector3D>>,
    metadata: Metadata,
    bounding_box: OnceLock<Option<BoundingBox>>,
}

impl Mesh {
    /// Create a mesh from vertices and faces
    pub fn new(vertices: Vec<Point3D>, faces: Vec<Face>) -> Self {
        Self {
            vertices,
            faces,
            ..Self::default()
        }
    }

    /// Attach per-vertex normals; their count must match the vertex count
    pub fn with_normals(mut self, normals: Vec<Vector3D>) -> Result<Self> {
        if normals.len() != self.vertices.len() {
            return Err(Error::invalid(format!(
                "mesh has {} vertices but {} normals",
                self.vertices.len(),
                normals.len()
            )));
        }
        self.normals = Some(normals);
        Ok(self)
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn vertices(&self) -> &[Point3D] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn normals(&self) -> Option<&[Vector3D]> {
        self.normals.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of triangles produced by fan triangulation of every face
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(Face::triangle_count).sum()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Bounds of all vertices, `None` when there are none
    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        self.bounding_box
            .get_or_init(|| BoundingBox::from_points(&self.vertices).ok())
            .as_ref()
    }

    /// Every face referencing a vertex outside `[0, vertex_count)`, with its position
    pub fn validate(&self) -> Vec<(usize, &Face)> {
        let vertex_count = self.vertices.len();
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, face)| !face.is_within(vertex_count))
            .collect()
    }

    /// Lazily triangulate every face, in face order
    ///
    /// Each call starts a fresh iteration. Fails when any face has an index
    /// outside the vertex list.
    pub fn triangles(&self) -> Result<impl Iterator<Item = Triangle3D> + '_> {
        if let Some((position, face)) = self.validate().first() {
            return Err(Error::invalid(format!(
                "face {} references vertices {:?} but the mesh has {} vertices",
                position,
                face.indices(),
                self.vertices.len()
            )));
        }

        let vertices = &self.vertices;
        Ok(self.faces.iter().flat_map(move |face| {
            face.triangulate()
                .map(move |[a, b, c]| Triangle3D::new(vertices[a], vertices[b], vertices[c]))
        }))
    }

    /// New mesh with every vertex and normal passed through the given maps
    ///
    /// Faces and metadata are kept as they are.
    pub fn map_geometry<P, N>(&self, point: P, normal: N) -> Mesh
    where
        P: Fn(&Point3D) -> Point3D,
        N: Fn(&Vector3D) -> Vector3D,
    {
        Mesh {
            vertices: self.vertices.iter().map(point).collect(),
            faces: self.faces.clone(),
            normals: self
                .normals
                .as_ref()
                .map(|normals| normals.iter().map(normal).collect()),
            metadata: self.metadata.clone(),
            bounding_box: OnceLock::new(),
        }
    }
}
