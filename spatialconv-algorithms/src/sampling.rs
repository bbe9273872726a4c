//! Mesh to point cloud sampling
//!
//! Surface strategies walk the fan triangulation of every face and draw points
//! uniformly inside each triangle using folded barycentric coordinates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spatialconv_core::{Error, Mesh, Metadata, Point3D, PointCloud, Result, Triangle3D};

/// Metadata property holding the vertex count of the sampled mesh
pub const ORIGINAL_VERTEX_COUNT: &str = "original_vertex_count";

/// Upper bound on the points one sampling run may produce
pub const MAX_SAMPLED_POINTS: usize = 1 << 28;

/// How points are placed on a mesh
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SamplingStrategy {
    /// The mesh vertices, verbatim and in order
    #[default]
    VerticesOnly,
    /// `max(1, floor(area * points_per_unit))` points per triangle
    UniformSurface { points_per_unit: f64 },
    /// About `total_points` points spread by area weight
    ///
    /// Every triangle gets `max(1, floor(total_points * area / total_area))`
    /// points and the result is truncated from the end to `total_points`, so
    /// meshes with many tiny triangles can end up short of the target or lose
    /// their trailing triangles entirely.
    FixedCount { total_points: usize },
}

/// Configuration for [`MeshSampler`]
#[derive(Debug, Clone, Default)]
pub struct SamplerOptions {
    pub strategy: SamplingStrategy,
    /// Seed for reproducible sampling; the thread RNG is used when absent
    pub seed: Option<u64>,
}

/// Converts meshes into position-only point clouds
#[derive(Debug, Clone, Default)]
pub struct MeshSampler {
    options: SamplerOptions,
}

impl MeshSampler {
    pub fn new(strategy: SamplingStrategy) -> Self {
        Self {
            options: SamplerOptions {
                strategy,
                seed: None,
            },
        }
    }

    pub fn from_options(options: SamplerOptions) -> Self {
        Self { options }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.seed = Some(seed);
        self
    }

    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    /// Sample `mesh` with the configured seed, or the thread RNG
    pub fn sample(&self, mesh: &Mesh) -> Result<PointCloud> {
        match self.options.seed {
            Some(seed) => self.sample_with_rng(mesh, &mut StdRng::seed_from_u64(seed)),
            None => self.sample_with_rng(mesh, &mut rand::thread_rng()),
        }
    }

    /// Sample `mesh` drawing randomness from `rng`
    ///
    /// A mesh without triangles gives an empty cloud. Surface strategies fail
    /// on meshes whose faces reference missing vertices.
    pub fn sample_with_rng<R: Rng>(&self, mesh: &Mesh, rng: &mut R) -> Result<PointCloud> {
        let points = match self.options.strategy {
            SamplingStrategy::VerticesOnly => mesh.vertices().to_vec(),
            SamplingStrategy::UniformSurface { points_per_unit } => {
                sample_uniform(mesh, points_per_unit, rng)?
            }
            SamplingStrategy::FixedCount { total_points } => {
                sample_fixed_count(mesh, total_points, rng)?
            }
        };

        tracing::debug!(
            strategy = ?self.options.strategy,
            vertices = mesh.vertex_count(),
            points = points.len(),
            "Sampled mesh into point cloud"
        );

        let mut metadata = Metadata::new()
            .with_source_format("mesh")
            .with_property(ORIGINAL_VERTEX_COUNT, mesh.vertex_count());
        metadata.name = mesh.metadata().name.clone();

        Ok(PointCloud::from_points(points).with_metadata(metadata))
    }
}

/// Sample `mesh` with `strategy` using the thread RNG
pub fn mesh_to_point_cloud(mesh: &Mesh, strategy: SamplingStrategy) -> Result<PointCloud> {
    MeshSampler::new(strategy).sample(mesh)
}

/// Uniform point inside `triangle`
///
/// Two uniform draws fold back across the diagonal when their sum exceeds 1,
/// which keeps the density uniform over the triangle rather than the
/// parallelogram it spans.
pub fn sample_in_triangle<R: Rng>(triangle: &Triangle3D, rng: &mut R) -> Point3D {
    let mut r1: f64 = rng.gen();
    let mut r2: f64 = rng.gen();
    if r1 + r2 > 1.0 {
        r1 = 1.0 - r1;
        r2 = 1.0 - r2;
    }
    triangle.point_at(r1, r2)
}

fn sample_uniform<R: Rng>(
    mesh: &Mesh,
    points_per_unit: f64,
    rng: &mut R,
) -> Result<Vec<Point3D>> {
    if !points_per_unit.is_finite() || points_per_unit <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "points_per_unit must be positive, got {}",
            points_per_unit
        )));
    }

    let mut points = Vec::new();
    for triangle in mesh.triangles()? {
        let expected = triangle.area() * points_per_unit;
        if expected > (MAX_SAMPLED_POINTS - points.len()) as f64 {
            return Err(too_many_points(points_per_unit));
        }
        let count = samples_for(expected);
        points.extend((0..count).map(|_| sample_in_triangle(&triangle, rng)));
    }
    Ok(points)
}

fn sample_fixed_count<R: Rng>(
    mesh: &Mesh,
    total_points: usize,
    rng: &mut R,
) -> Result<Vec<Point3D>> {
    if total_points > MAX_SAMPLED_POINTS {
        return Err(too_many_points(total_points));
    }

    let triangles: Vec<Triangle3D> = mesh.triangles()?.collect();
    if triangles.is_empty() {
        return Ok(Vec::new());
    }

    let areas: Vec<f64> = triangles.iter().map(Triangle3D::area).collect();
    let total_area: f64 = areas.iter().sum();
    let uniform_weight = 1.0 / triangles.len() as f64;

    let mut points = Vec::with_capacity(total_points);
    for (triangle, area) in triangles.iter().zip(&areas) {
        // Anything past the target is truncated anyway
        if points.len() >= total_points {
            break;
        }
        let weight = if total_area > 0.0 {
            area / total_area
        } else {
            uniform_weight
        };
        let count = samples_for(total_points as f64 * weight);
        points.extend((0..count).map(|_| sample_in_triangle(triangle, rng)));
    }

    points.truncate(total_points);
    Ok(points)
}

/// `max(1, floor(expected))`
fn samples_for(expected: f64) -> usize {
    (expected.floor() as usize).max(1)
}

fn too_many_points(requested: impl std::fmt::Display) -> Error {
    Error::InvalidArgument(format!(
        "sampling with {} would exceed {} points",
        requested, MAX_SAMPLED_POINTS
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spatialconv_core::Face;

    fn unit_triangle_mesh() -> Mesh {
        Mesh::new(
            vec![
                Point3D::new(0.0, 0.0, 0.0),
                Point3D::new(1.0, 0.0, 0.0),
                Point3D::new(0.0, 1.0, 0.0),
            ],
            vec![Face::triangle(0, 1, 2)],
        )
    }

    /// Unit square at z = 1 split into two triangles by one quad face
    fn square_mesh() -> Mesh {
        Mesh::new(
            vec![
                Point3D::new(0.0, 0.0, 1.0),
                Point3D::new(1.0, 0.0, 1.0),
                Point3D::new(1.0, 1.0, 1.0),
                Point3D::new(0.0, 1.0, 1.0),
            ],
            vec![Face::new(vec![0, 1, 2, 3]).unwrap()],
        )
        .with_metadata(Metadata::new().with_name("square"))
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_vertices_only() {
        let mesh = square_mesh();
        let cloud = MeshSampler::new(SamplingStrategy::VerticesOnly).sample(&mesh).unwrap();
        assert_eq!(cloud.points(), mesh.vertices());
        assert!(cloud.colors().is_none());
        assert!(cloud.normals().is_none());
        assert!(cloud.intensity().is_none());
    }

    #[test]
    fn test_metadata_tags() {
        let cloud = MeshSampler::new(SamplingStrategy::FixedCount { total_points: 10 })
            .sample_with_rng(&square_mesh(), &mut rng())
            .unwrap();
        let metadata = cloud.metadata();
        assert_eq!(metadata.source_format.as_deref(), Some("mesh"));
        assert_eq!(metadata.property(ORIGINAL_VERTEX_COUNT), Some("4"));
        assert_eq!(metadata.name.as_deref(), Some("square"));
    }

    #[test]
    fn test_fixed_count_stays_inside_triangle() {
        let cloud = MeshSampler::new(SamplingStrategy::FixedCount { total_points: 500 })
            .sample_with_rng(&unit_triangle_mesh(), &mut rng())
            .unwrap();

        for p in cloud.iter() {
            assert_eq!(p.z, 0.0);
            assert!(p.x >= 0.0);
            assert!(p.y >= 0.0);
            assert!(p.x + p.y <= 1.0 + 1e-10);
        }
    }

    #[test]
    fn test_fixed_count_near_target() {
        let cloud = MeshSampler::new(SamplingStrategy::FixedCount { total_points: 100 })
            .with_seed(7)
            .sample(&unit_triangle_mesh())
            .unwrap();
        assert!((90..=110).contains(&cloud.len()));
    }

    #[test]
    fn test_fixed_count_truncates_to_target() {
        // Ten equal triangles each get max(1, floor(3 * 0.1)) = 1 point
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for i in 0..10 {
            let x = i as f64;
            let base = vertices.len();
            vertices.push(Point3D::new(x, 0.0, 0.0));
            vertices.push(Point3D::new(x + 1.0, 0.0, 0.0));
            vertices.push(Point3D::new(x, 1.0, 0.0));
            faces.push(Face::triangle(base, base + 1, base + 2));
        }
        let mesh = Mesh::new(vertices, faces);

        let cloud = MeshSampler::new(SamplingStrategy::FixedCount { total_points: 3 })
            .sample_with_rng(&mesh, &mut rng())
            .unwrap();
        assert_eq!(cloud.len(), 3);
        // Only the leading triangles contribute
        assert!(cloud.iter().all(|p| p.x < 3.0));
    }

    #[test]
    fn test_uniform_surface_counts() {
        // Two triangles of area 0.5 each, 10 points per unit -> 5 per triangle
        let cloud = MeshSampler::new(SamplingStrategy::UniformSurface { points_per_unit: 10.0 })
            .sample_with_rng(&square_mesh(), &mut rng())
            .unwrap();
        assert_eq!(cloud.len(), 10);
        assert!(cloud.iter().all(|p| p.z == 1.0));

        // Small densities still give one point per triangle
        let sparse = MeshSampler::new(SamplingStrategy::UniformSurface { points_per_unit: 0.1 })
            .sample_with_rng(&square_mesh(), &mut rng())
            .unwrap();
        assert_eq!(sparse.len(), 2);
    }

    #[test]
    fn test_uniform_surface_rejects_bad_density() {
        let sampler = MeshSampler::new(SamplingStrategy::UniformSurface { points_per_unit: 0.0 });
        assert!(matches!(
            sampler.sample(&square_mesh()),
            Err(Error::InvalidArgument(_))
        ));

        let nan = SamplingStrategy::UniformSurface {
            points_per_unit: f64::NAN,
        };
        assert!(MeshSampler::new(nan).sample(&square_mesh()).is_err());
    }

    #[test]
    fn test_oversized_requests_rejected() {
        let dense = SamplingStrategy::UniformSurface {
            points_per_unit: 1e30,
        };
        assert!(matches!(
            MeshSampler::new(dense).sample(&unit_triangle_mesh()),
            Err(Error::InvalidArgument(_))
        ));

        let huge = SamplingStrategy::FixedCount {
            total_points: usize::MAX,
        };
        assert!(matches!(
            MeshSampler::new(huge).sample(&unit_triangle_mesh()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_samples_are_uniform_over_the_triangle() {
        // x < 0.5 covers three quarters of the unit right triangle's area
        let triangle = Triangle3D::new(
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(0.0, 1.0, 0.0),
        );
        let mut rng = rng();
        let samples = 200_000;
        let mut left = 0usize;
        let mut low = 0usize;
        for _ in 0..samples {
            let p = sample_in_triangle(&triangle, &mut rng);
            left += usize::from(p.x < 0.5);
            low += usize::from(p.y < 0.5);
        }

        assert_relative_eq!(left as f64 / samples as f64, 0.75, epsilon = 0.01);
        assert_relative_eq!(low as f64 / samples as f64, 0.75, epsilon = 0.01);
    }

    #[test]
    fn test_empty_mesh_gives_empty_cloud() {
        let mesh = Mesh::default();
        for strategy in [
            SamplingStrategy::VerticesOnly,
            SamplingStrategy::UniformSurface { points_per_unit: 5.0 },
            SamplingStrategy::FixedCount { total_points: 50 },
        ] {
            let cloud = MeshSampler::new(strategy).sample(&mesh).unwrap();
            assert!(cloud.is_empty());
        }
    }

    #[test]
    fn test_dangling_faces_rejected() {
        let mesh = Mesh::new(vec![Point3D::origin()], vec![Face::triangle(0, 1, 2)]);
        let sampler = MeshSampler::new(SamplingStrategy::FixedCount { total_points: 5 });
        assert!(matches!(sampler.sample(&mesh), Err(Error::InvalidArgument(_))));

        // Vertices-only sampling never triangulates
        let cloud = MeshSampler::new(SamplingStrategy::VerticesOnly).sample(&mesh).unwrap();
        assert_eq!(cloud.len(), 1);
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let sampler =
            MeshSampler::new(SamplingStrategy::FixedCount { total_points: 20 }).with_seed(11);
        let a = sampler.sample(&square_mesh()).unwrap();
        let b = sampler.sample(&square_mesh()).unwrap();
        assert_eq!(a.points(), b.points());
    }

    #[test]
    fn test_degenerate_mesh_uses_uniform_weights() {
        let p = Point3D::new(2.0, 2.0, 2.0);
        let faces = vec![Face::triangle(0, 1, 2), Face::triangle(2, 1, 0)];
        let mesh = Mesh::new(vec![p, p, p], faces);
        let cloud = MeshSampler::new(SamplingStrategy::FixedCount { total_points: 6 })
            .sample_with_rng(&mesh, &mut rng())
            .unwrap();
        assert_eq!(cloud.len(), 6);
        assert!(cloud.iter().all(|q| *q == p));
    }
}
