//! Integration tests for spatialconv-algorithms
//!
//! These tests run the algorithms back to back on geometry parsed from text,
//! the way the command line tool chains them.

use approx::assert_relative_eq;
use spatialconv_algorithms::*;
use spatialconv_core::{Geometry, Vector3D, UNIT_Z};
use spatialconv_io::IoRegistry;

/// Two triangles of area 1 forming a 2 x 1 rectangle on the Y-up ground plane
const Y_UP_PLANE: &str = "\
o plane
v 0 0 0
v 2 0 0
v 2 0 1
v 0 0 1
vn 0 1 0
vn 0 1 0
vn 0 1 0
vn 0 1 0
f 1//1 4//4 3//3 2//2
";

fn load_plane() -> Geometry {
    IoRegistry::with_defaults().read_str(Y_UP_PLANE, "obj").unwrap()
}

#[test]
fn test_mesh_to_z_up_point_cloud() {
    let geometry = load_plane();
    let mesh = geometry.as_mesh().unwrap();

    let z_up = CoordinateTransformer::y_up_to_z_up().apply_to_mesh(mesh);
    for normal in z_up.normals().unwrap() {
        assert_relative_eq!(*normal, -UNIT_Z, epsilon = 1e-10);
    }

    let cloud = MeshSampler::new(SamplingStrategy::FixedCount { total_points: 200 })
        .with_seed(7)
        .sample(&z_up)
        .unwrap();

    assert!(cloud.len() <= 200);
    assert!(cloud.len() >= 180);
    assert_eq!(cloud.metadata().property(ORIGINAL_VERTEX_COUNT), Some("4"));
    for p in cloud.iter() {
        assert!(p.z.abs() < 1e-10);
        assert!((-1e-10..=2.0 + 1e-10).contains(&p.x));
        assert!((-1e-10..=1.0 + 1e-10).contains(&p.y));
    }
}

#[test]
fn test_uniform_density_tracks_area() {
    let geometry = load_plane();
    let mesh = geometry.as_mesh().unwrap();

    let cloud = MeshSampler::new(SamplingStrategy::UniformSurface { points_per_unit: 50.0 })
        .with_seed(11)
        .sample(mesh)
        .unwrap();

    // Two triangles of area 1 each
    assert_eq!(cloud.len(), 100);
}

#[test]
fn test_sample_then_thin() {
    let geometry = load_plane();
    let cloud = MeshSampler::new(SamplingStrategy::UniformSurface { points_per_unit: 500.0 })
        .with_seed(3)
        .sample(geometry.as_mesh().unwrap())
        .unwrap();

    let thinned = voxel_grid_filter(&cloud, 0.5).unwrap();
    assert!(thinned.len() < cloud.len());
    assert!(thinned.len() <= 5 * 3);
    assert!(thinned.len() >= 8);
}

#[test]
fn test_round_trip_presets_on_geometry() {
    let geometry = load_plane();
    let there_and_back =
        CoordinateTransformer::y_up_to_z_up().then(&CoordinateTransformer::z_up_to_y_up());
    let restored = there_and_back.apply_to_geometry(&geometry);

    let original = geometry.as_mesh().unwrap();
    let restored = restored.as_mesh().unwrap();
    for (a, b) in original.vertices().iter().zip(restored.vertices()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-10);
    }
    assert_eq!(restored.metadata().name.as_deref(), Some("plane"));
}

#[test]
fn test_track_bearings() {
    let converter = VelocityConverter::default();
    let track = [
        Vector3D::new(0.0, 5.0, 0.0),
        Vector3D::new(5.0, 5.0, 0.0),
        Vector3D::new(5.0, 0.0, 1.0),
        Vector3D::new(0.0, 0.0, 3.0),
        Vector3D::new(-5.0, -5.0, 0.0),
    ];

    let bearings = converter.convert_sequence(&track).unwrap();
    let cardinals: Vec<_> = bearings.iter().map(|b| b.cardinal()).collect();
    assert_eq!(
        cardinals,
        vec![
            CardinalDirection::N,
            CardinalDirection::NE,
            CardinalDirection::E,
            CardinalDirection::N,
            CardinalDirection::SW,
        ]
    );
    assert!(bearings[3].is_stationary());
    assert_relative_eq!(bearings[4].degrees, 225.0, epsilon = 1e-10);
    assert_relative_eq!(bearings[1].speed, 50.0_f64.sqrt(), epsilon = 1e-10);
}
