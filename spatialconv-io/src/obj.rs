//! OBJ format support
//!
//! Reading goes through the `obj` crate's raw parser; only positions, normals,
//! faces and the object name are kept. Texture coordinates, materials and
//! groups are skipped.

use crate::error::CodecError;
use obj::raw::object::Polygon;
use spatialconv_core::{
    Error, Face, Geometry, GeometryReader, GeometryWriter, Mesh, Metadata, Point3D, Result,
    Vector3D,
};
use std::fmt::Write;

const EXTENSIONS: &[&str] = &["obj"];

/// Options controlling OBJ output
#[derive(Debug, Clone)]
pub struct ObjWriteOptions {
    /// Fixed number of decimals; shortest round-trip formatting when `None`
    pub precision: Option<usize>,
    /// Comment written on the first line
    pub header_comment: Option<String>,
}

impl Default for ObjWriteOptions {
    fn default() -> Self {
        Self {
            precision: None,
            header_comment: Some("Generated by spatialconv".to_string()),
        }
    }
}

impl ObjWriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn without_header(mut self) -> Self {
        self.header_comment = None;
        self
    }
}

pub struct ObjReader;

#[derive(Default)]
pub struct ObjWriter {
    pub options: ObjWriteOptions,
}

impl ObjWriter {
    pub fn new(options: ObjWriteOptions) -> Self {
        Self { options }
    }
}

impl GeometryReader for ObjReader {
    fn format_name(&self) -> &'static str {
        "obj"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        EXTENSIONS
    }

    fn read(&self, content: &str) -> Result<Geometry> {
        Ok(Geometry::Mesh(parse_obj(content)?))
    }
}

impl GeometryWriter for ObjWriter {
    fn format_name(&self) -> &'static str {
        "obj"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        EXTENSIONS
    }

    fn write(&self, geometry: &Geometry) -> Result<String> {
        let mut out = String::new();
        write_obj(&mut out, geometry, &self.options)
            .map_err(|e| Error::Parse(format!("formatting OBJ output failed: {}", e)))?;
        Ok(out)
    }
}

/// Parse OBJ text into a mesh
///
/// Vertices keep their file order. Per-vertex normals come from the normal
/// index of each face corner and are kept only when every vertex receives
/// one. Coordinates are read at `f32` precision.
pub fn parse_obj(content: &str) -> std::result::Result<Mesh, CodecError> {
    let raw = obj::raw::parse_obj(content.as_bytes())?;

    let vertices: Vec<Point3D> = raw
        .positions
        .iter()
        .map(|&(x, y, z, _)| Point3D::new(f64::from(x), f64::from(y), f64::from(z)))
        .collect();

    let mut vertex_normals: Vec<Option<Vector3D>> = vec![None; vertices.len()];
    let mut conflicting = 0usize;
    let mut faces = Vec::with_capacity(raw.polygons.len());
    for polygon in &raw.polygons {
        let corners: Vec<(usize, Option<usize>)> = match polygon {
            Polygon::P(indices) => indices.iter().map(|&v| (v, None)).collect(),
            Polygon::PT(indices) => indices.iter().map(|&(v, _)| (v, None)).collect(),
            Polygon::PN(indices) => indices.iter().map(|&(v, n)| (v, Some(n))).collect(),
            Polygon::PTN(indices) => indices.iter().map(|&(v, _, n)| (v, Some(n))).collect(),
        };

        for &(vertex, normal) in &corners {
            let (Some(slot), Some(&(x, y, z))) = (
                vertex_normals.get_mut(vertex),
                normal.and_then(|n| raw.normals.get(n)),
            ) else {
                continue;
            };
            let normal = Vector3D::new(f64::from(x), f64::from(y), f64::from(z));
            match *slot {
                Some(existing) if existing != normal => conflicting += 1,
                Some(_) => {}
                None => *slot = Some(normal),
            }
        }

        let indices = corners.into_iter().map(|(vertex, _)| vertex).collect();
        faces.push(Face::new(indices).map_err(|e| CodecError::Invalid(e.to_string()))?);
    }

    if conflicting > 0 {
        tracing::warn!(
            conflicting,
            "OBJ vertices carry different normals on different faces, keeping the first"
        );
    }

    let mut metadata = Metadata::new().with_source_format("obj");
    metadata.name = raw.name.filter(|name| !name.is_empty());

    let mut mesh = Mesh::new(vertices, faces);
    let assigned = vertex_normals.iter().filter(|n| n.is_some()).count();
    if assigned > 0 {
        match vertex_normals.into_iter().collect::<Option<Vec<_>>>() {
            Some(normals) => {
                mesh = mesh
                    .with_normals(normals)
                    .map_err(|e| CodecError::Invalid(e.to_string()))?;
            }
            None => tracing::warn!(
                assigned,
                vertices = mesh.vertex_count(),
                "Dropping OBJ normals that do not cover every vertex"
            ),
        }
    }

    let invalid = mesh.validate().len();
    if invalid > 0 {
        tracing::warn!(invalid, "OBJ faces reference missing vertices");
    }
    tracing::debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Parsed OBJ"
    );

    Ok(mesh.with_metadata(metadata))
}

fn write_obj(out: &mut String, geometry: &Geometry, options: &ObjWriteOptions) -> std::fmt::Result {
    let number = |value: f64| match options.precision {
        Some(precision) => format!("{:.*}", precision, value),
        None => value.to_string(),
    };

    if let Some(comment) = &options.header_comment {
        writeln!(out, "# {}", comment)?;
    }
    if let Some(name) = &geometry.metadata().name {
        writeln!(out, "o {}", name)?;
    }

    let (points, normals, faces) = match geometry {
        Geometry::Mesh(mesh) => (mesh.vertices(), mesh.normals(), mesh.faces()),
        Geometry::PointCloud(cloud) => (cloud.points(), None, &[][..]),
    };

    for p in points {
        writeln!(out, "v {} {} {}", number(p.x), number(p.y), number(p.z))?;
    }
    for n in normals.unwrap_or_default() {
        writeln!(out, "vn {} {} {}", number(n.x), number(n.y), number(n.z))?;
    }
    for face in faces {
        out.push('f');
        for index in face.indices() {
            if normals.is_some() {
                write!(out, " {}//{}", index + 1, index + 1)?;
            } else {
                write!(out, " {}", index + 1)?;
            }
        }
        out.push('\n');
    }
    Ok(())
}
