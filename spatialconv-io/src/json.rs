//! JSON format support
//!
//! Documents are tagged by `type`:
//!
//! ```json
//! {"type": "mesh", "vertices": [[0, 0, 0], ...], "faces": [[0, 1, 2], ...]}
//! {"type": "point_cloud", "points": [[0, 0, 0], ...], "colors": ["#ff0000", ...]}
//! ```
//!
//! Colors are hex strings, so alpha is not preserved.

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use spatialconv_core::{
    Color, Face, Geometry, GeometryReader, GeometryWriter, Mesh, Metadata, Point3D, PointCloud,
    Result, Vector3D,
};

const EXTENSIONS: &[&str] = &["json"];

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Document {
    Mesh {
        vertices: Vec<Point3D>,
        faces: Vec<Face>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        normals: Option<Vec<Vector3D>>,
        #[serde(default)]
        metadata: Metadata,
    },
    PointCloud {
        points: Vec<Point3D>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        colors: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        normals: Option<Vec<Vector3D>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        intensity: Option<Vec<f64>>,
        #[serde(default)]
        metadata: Metadata,
    },
}

pub struct JsonReader;

pub struct JsonWriter {
    pub pretty: bool,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl GeometryReader for JsonReader {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        EXTENSIONS
    }

    fn read(&self, content: &str) -> Result<Geometry> {
        Ok(parse_json(content)?)
    }
}

impl GeometryWriter for JsonWriter {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        EXTENSIONS
    }

    fn write(&self, geometry: &Geometry) -> Result<String> {
        let document = to_document(geometry);
        let text = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        Ok(text.map_err(CodecError::from)?)
    }
}

/// Parse a JSON document, re-checking every aggregate invariant
pub fn parse_json(content: &str) -> std::result::Result<Geometry, CodecError> {
    let invalid = |e: spatialconv_core::Error| CodecError::Invalid(e.to_string());

    match serde_json::from_str(content)? {
        Document::Mesh {
            vertices,
            faces,
            normals,
            metadata,
        } => {
            let mut mesh = Mesh::new(vertices, faces).with_metadata(metadata);
            if let Some(normals) = normals {
                mesh = mesh.with_normals(normals).map_err(invalid)?;
            }
            Ok(Geometry::Mesh(mesh))
        }
        Document::PointCloud {
            points,
            colors,
            normals,
            intensity,
            metadata,
        } => {
            let colors = colors
                .map(|hex| hex.iter().map(|c| Color::from_hex(c)).collect::<Result<Vec<_>>>())
                .transpose()
                .map_err(invalid)?;
            let cloud = PointCloud::with_attributes(points, colors, normals, intensity, metadata)
                .map_err(invalid)?;
            Ok(Geometry::PointCloud(cloud))
        }
    }
}

fn to_document(geometry: &Geometry) -> Document {
    match geometry {
        Geometry::Mesh(mesh) => Document::Mesh {
            vertices: mesh.vertices().to_vec(),
            faces: mesh.faces().to_vec(),
            normals: mesh.normals().map(<[_]>::to_vec),
            metadata: mesh.metadata().clone(),
        },
        Geometry::PointCloud(cloud) => Document::PointCloud {
            points: cloud.points().to_vec(),
            colors: cloud
                .colors()
                .map(|colors| colors.iter().map(Color::to_hex).collect()),
            normals: cloud.normals().map(<[_]>::to_vec),
            intensity: cloud.intensity().map(<[_]>::to_vec),
            metadata: cloud.metadata().clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatialconv_core::Error;

    #[test]
    fn test_parse_point_cloud() {
        let text = r##"{
            "type": "point_cloud",
            "points": [[0, 0, 0], [1, 2, 3]],
            "colors": ["#ff0000", "00ff00"],
            "metadata": {"name": "pair", "properties": {"sensor": "lidar"}}
        }"##;

        let geometry = JsonReader.read(text).unwrap();
        let cloud = geometry.as_point_cloud().unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[1], Point3D::new(1.0, 2.0, 3.0));
        assert_eq!(cloud.colors().unwrap()[1], Color::rgb(0, 255, 0));
        assert_eq!(cloud.metadata().property("sensor"), Some("lidar"));
    }

    #[test]
    fn test_rejects_invalid_documents() {
        let short_face = r#"{"type": "mesh", "vertices": [[0, 0, 0]], "faces": [[0, 0]]}"#;
        assert!(matches!(JsonReader.read(short_face), Err(Error::Parse(_))));

        let mismatched = r#"{"type": "point_cloud", "points": [[0, 0, 0]], "intensity": [1, 2]}"#;
        assert!(JsonReader.read(mismatched).is_err());

        let bad_color = r#"{"type": "point_cloud", "points": [[0, 0, 0]], "colors": ["red"]}"#;
        assert!(JsonReader.read(bad_color).is_err());

        assert!(JsonReader.read(r#"{"type": "teapot"}"#).is_err());
    }

    #[test]
    fn test_mesh_round_trip() {
        let mesh = Mesh::new(
            vec![
                Point3D::new(0.0, 0.0, 0.0),
                Point3D::new(1.0, 0.0, 0.0),
                Point3D::new(0.0, 1.0, 0.5),
            ],
            vec![Face::triangle(0, 1, 2)],
        )
        .with_metadata(Metadata::new().with_name("tri"));

        let text = JsonWriter { pretty: false }.write(&Geometry::Mesh(mesh)).unwrap();
        assert!(text.starts_with(r#"{"type":"mesh""#));

        let reread = JsonReader.read(&text).unwrap();
        let reread = reread.as_mesh().unwrap();
        assert_eq!(reread.vertices()[2], Point3D::new(0.0, 1.0, 0.5));
        assert_eq!(reread.faces()[0].indices(), &[0, 1, 2]);
        assert_eq!(reread.metadata().name.as_deref(), Some("tri"));
        assert!(reread.normals().is_none());
    }
}
