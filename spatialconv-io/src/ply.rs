//! PLY format support (ASCII encoding)
//!
//! A `vertex` element supplies positions and optional normals (`nx ny nz`),
//! colors (`red green blue [alpha]`) and `intensity`. Files with a non-empty
//! `face` element are read as meshes, anything else as point clouds.

use crate::error::CodecError;
use ply_rs::{
    parser::Parser,
    ply::{
        Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
        ScalarType,
    },
    writer::Writer,
};
use spatialconv_core::{
    Color, Error, Face, Geometry, GeometryReader, GeometryWriter, Mesh, Metadata, Point3D,
    PointCloud, Result, Vector3D,
};

const EXTENSIONS: &[&str] = &["ply"];

pub struct PlyReader;
pub struct PlyWriter;

impl GeometryReader for PlyReader {
    fn format_name(&self) -> &'static str {
        "ply"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        EXTENSIONS
    }

    fn read(&self, content: &str) -> Result<Geometry> {
        Ok(parse_ply(content)?)
    }
}

impl GeometryWriter for PlyWriter {
    fn format_name(&self) -> &'static str {
        "ply"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        EXTENSIONS
    }

    fn write(&self, geometry: &Geometry) -> Result<String> {
        let mut ply = build_ply(geometry)?;

        let mut out = Vec::new();
        let writer_instance = Writer::new();
        writer_instance.write_ply(&mut out, &mut ply)?;

        String::from_utf8(out).map_err(|e| Error::Parse(format!("PLY output is not UTF-8: {}", e)))
    }
}

/// Parse ASCII PLY text into a mesh or point cloud
pub fn parse_ply(content: &str) -> std::result::Result<Geometry, CodecError> {
    let parser = Parser::<DefaultElement>::new();
    let mut reader = content.as_bytes();
    let ply = parser.read_ply(&mut reader)?;

    if ply.header.encoding != Encoding::Ascii {
        return Err(CodecError::Invalid(
            "only ASCII PLY is supported".to_string(),
        ));
    }

    let empty = Vec::new();
    let vertices = ply.payload.get("vertex").unwrap_or(&empty);
    let faces = ply.payload.get("face").unwrap_or(&empty);

    let points = vertices
        .iter()
        .map(|v| Ok(Point3D::new(scalar(v, "x")?, scalar(v, "y")?, scalar(v, "z")?)))
        .collect::<std::result::Result<Vec<_>, CodecError>>()?;

    let normals = optional_attribute(vertices, &["nx", "ny", "nz"], |v| {
        Ok(Vector3D::new(scalar(v, "nx")?, scalar(v, "ny")?, scalar(v, "nz")?))
    })?;

    let metadata = Metadata::new().with_source_format("ply");

    if !faces.is_empty() {
        let faces = faces
            .iter()
            .map(|f| {
                Face::new(face_indices(f)?).map_err(|e| CodecError::Invalid(e.to_string()))
            })
            .collect::<std::result::Result<Vec<_>, CodecError>>()?;

        let mut mesh = Mesh::new(points, faces).with_metadata(metadata);
        if let Some(normals) = normals {
            mesh = mesh
                .with_normals(normals)
                .map_err(|e| CodecError::Invalid(e.to_string()))?;
        }
        tracing::debug!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "Parsed PLY mesh"
        );
        return Ok(Geometry::Mesh(mesh));
    }

    let colors = optional_attribute(vertices, &["red", "green", "blue"], |v| {
        let alpha = match v.get("alpha") {
            Some(_) => integer(v, "alpha")?,
            None => 255,
        };
        Color::from_channels(integer(v, "red")?, integer(v, "green")?, integer(v, "blue")?, alpha)
            .map_err(|e| CodecError::Invalid(e.to_string()))
    })?;
    let intensity = optional_attribute(vertices, &["intensity"], |v| scalar(v, "intensity"))?;

    let cloud = PointCloud::with_attributes(points, colors, normals, intensity, metadata)
        .map_err(|e| CodecError::Invalid(e.to_string()))?;
    tracing::debug!(points = cloud.len(), "Parsed PLY point cloud");
    Ok(Geometry::PointCloud(cloud))
}

/// Extract an attribute when the first vertex carries all of `names`
fn optional_attribute<T, F>(
    vertices: &[DefaultElement],
    names: &[&str],
    extract: F,
) -> std::result::Result<Option<Vec<T>>, CodecError>
where
    F: Fn(&DefaultElement) -> std::result::Result<T, CodecError>,
{
    match vertices.first() {
        Some(first) if names.iter().all(|name| first.contains_key(*name)) => {
            vertices.iter().map(extract).collect::<std::result::Result<Vec<_>, _>>().map(Some)
        }
        _ => Ok(None),
    }
}

/// Extract a property value as f64 from a PLY element
fn scalar(element: &DefaultElement, name: &str) -> std::result::Result<f64, CodecError> {
    match element.get(name) {
        Some(Property::Char(val)) => Ok(f64::from(*val)),
        Some(Property::UChar(val)) => Ok(f64::from(*val)),
        Some(Property::Short(val)) => Ok(f64::from(*val)),
        Some(Property::UShort(val)) => Ok(f64::from(*val)),
        Some(Property::Int(val)) => Ok(f64::from(*val)),
        Some(Property::UInt(val)) => Ok(f64::from(*val)),
        Some(Property::Float(val)) => Ok(f64::from(*val)),
        Some(Property::Double(val)) => Ok(*val),
        _ => Err(CodecError::Invalid(format!(
            "property '{}' not found or not a scalar",
            name
        ))),
    }
}

fn integer(element: &DefaultElement, name: &str) -> std::result::Result<i64, CodecError> {
    scalar(element, name).map(|value| value.round() as i64)
}

/// Extract face indices from a PLY face element
fn face_indices(element: &DefaultElement) -> std::result::Result<Vec<usize>, CodecError> {
    fn convert<T>(values: &[T]) -> std::result::Result<Vec<usize>, CodecError>
    where
        T: Copy + TryInto<usize>,
    {
        values
            .iter()
            .map(|&v| {
                v.try_into()
                    .map_err(|_| CodecError::Invalid("negative face index".to_string()))
            })
            .collect()
    }

    match element.get("vertex_indices").or_else(|| element.get("vertex_index")) {
        Some(Property::ListChar(indices)) => convert(indices),
        Some(Property::ListUChar(indices)) => convert(indices),
        Some(Property::ListShort(indices)) => convert(indices),
        Some(Property::ListUShort(indices)) => convert(indices),
        Some(Property::ListInt(indices)) => convert(indices),
        Some(Property::ListUInt(indices)) => convert(indices),
        _ => Err(CodecError::Invalid("face indices not found".to_string())),
    }
}

fn double_property(name: &str) -> PropertyDef {
    PropertyDef::new(name.to_string(), PropertyType::Scalar(ScalarType::Double))
}

fn build_ply(geometry: &Geometry) -> Result<Ply<DefaultElement>> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::Ascii;
    ply.header.comments.push("Generated by spatialconv".to_string());

    let (points, normals, colors, intensity) = match geometry {
        Geometry::Mesh(mesh) => (mesh.vertices(), mesh.normals(), None, None),
        Geometry::PointCloud(cloud) => (
            cloud.points(),
            cloud.normals(),
            cloud.colors(),
            cloud.intensity(),
        ),
    };
    let with_alpha = colors.is_some_and(|colors| colors.iter().any(|c| c.a != 255));

    // Define vertex element
    let mut vertex_element = ElementDef::new("vertex".to_string());
    vertex_element.count = points.len();
    for name in ["x", "y", "z"] {
        vertex_element.properties.add(double_property(name));
    }
    if normals.is_some() {
        for name in ["nx", "ny", "nz"] {
            vertex_element.properties.add(double_property(name));
        }
    }
    if colors.is_some() {
        let channels: &[&str] = if with_alpha {
            &["red", "green", "blue", "alpha"]
        } else {
            &["red", "green", "blue"]
        };
        for name in channels {
            vertex_element.properties.add(PropertyDef::new(
                name.to_string(),
                PropertyType::Scalar(ScalarType::UChar),
            ));
        }
    }
    if intensity.is_some() {
        vertex_element.properties.add(double_property("intensity"));
    }
    ply.header.elements.add(vertex_element);

    // Add vertex data
    let mut vertices = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        let mut vertex = DefaultElement::new();
        vertex.insert("x".to_string(), Property::Double(point.x));
        vertex.insert("y".to_string(), Property::Double(point.y));
        vertex.insert("z".to_string(), Property::Double(point.z));

        if let Some(normals) = normals {
            vertex.insert("nx".to_string(), Property::Double(normals[i].x));
            vertex.insert("ny".to_string(), Property::Double(normals[i].y));
            vertex.insert("nz".to_string(), Property::Double(normals[i].z));
        }
        if let Some(colors) = colors {
            vertex.insert("red".to_string(), Property::UChar(colors[i].r));
            vertex.insert("green".to_string(), Property::UChar(colors[i].g));
            vertex.insert("blue".to_string(), Property::UChar(colors[i].b));
            if with_alpha {
                vertex.insert("alpha".to_string(), Property::UChar(colors[i].a));
            }
        }
        if let Some(intensity) = intensity {
            vertex.insert("intensity".to_string(), Property::Double(intensity[i]));
        }
        vertices.push(vertex);
    }
    ply.payload.insert("vertex".to_string(), vertices);

    if let Geometry::Mesh(mesh) = geometry {
        // Define face element
        let mut face_element = ElementDef::new("face".to_string());
        face_element.count = mesh.face_count();
        face_element.properties.add(PropertyDef::new(
            "vertex_indices".to_string(),
            PropertyType::List(ScalarType::UChar, ScalarType::Int),
        ));
        ply.header.elements.add(face_element);

        let mut faces = Vec::with_capacity(mesh.face_count());
        for face in mesh.faces() {
            if face.indices().len() > usize::from(u8::MAX) {
                return Err(Error::UnsupportedFormat(format!(
                    "PLY faces are limited to 255 vertices, got {}",
                    face.indices().len()
                )));
            }
            let indices = face
                .indices()
                .iter()
                .map(|&i| {
                    i32::try_from(i).map_err(|_| {
                        Error::UnsupportedFormat(format!("vertex index {} does not fit PLY int", i))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let mut face_element = DefaultElement::new();
            face_element.insert("vertex_indices".to_string(), Property::ListInt(indices));
            faces.push(face_element);
        }
        ply.payload.insert("face".to_string(), faces);
    }

    Ok(ply)
}
