//! Subcommand implementations

use anyhow::{bail, Context, Result};
use spatialconv_algorithms::{
    CoordinateTransformer, MeshSampler, SamplerOptions, SamplingStrategy, VelocityConverter,
};
use spatialconv_core::{Geometry, Transform3D, Vector3D};
use spatialconv_io::IoRegistry;
use std::path::Path;

fn read(registry: &IoRegistry, path: &Path) -> Result<Geometry> {
    registry
        .read_file(path)
        .with_context(|| format!("failed to read {}", path.display()))
}

fn write(registry: &IoRegistry, geometry: &Geometry, path: &Path) -> Result<()> {
    registry
        .write_file(geometry, path)
        .with_context(|| format!("failed to write {}", path.display()))
}

pub fn convert(input: &Path, output: &Path) -> Result<()> {
    let registry = IoRegistry::with_defaults();
    let geometry = read(&registry, input)?;
    write(&registry, &geometry, output)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        kind = geometry.kind(),
        "Converted"
    );
    Ok(())
}

pub fn sample(
    input: &Path,
    output: &Path,
    strategy: SamplingStrategy,
    seed: Option<u64>,
) -> Result<()> {
    let registry = IoRegistry::with_defaults();
    let geometry = read(&registry, input)?;
    let Some(mesh) = geometry.as_mesh() else {
        bail!("{} holds a {}, sampling needs a mesh", input.display(), geometry.kind());
    };

    let sampler = MeshSampler::from_options(SamplerOptions { strategy, seed });
    let cloud = sampler
        .sample(mesh)
        .with_context(|| format!("failed to sample {}", input.display()))?;
    tracing::info!(
        vertices = mesh.vertex_count(),
        points = cloud.len(),
        ?strategy,
        "Sampled mesh"
    );

    write(&registry, &Geometry::PointCloud(cloud), output)
}

/// Compose the requested steps in the order preset, scale, translate
pub fn build_transformer(
    preset: Option<CoordinateTransformer>,
    scale: Option<f64>,
    translate: Option<[f64; 3]>,
) -> CoordinateTransformer {
    let mut transformer =
        preset.unwrap_or_else(|| CoordinateTransformer::new(Transform3D::identity()));
    if let Some(factor) = scale {
        transformer = transformer.then(&CoordinateTransformer::scale(factor));
    }
    if let Some([x, y, z]) = translate {
        transformer = transformer.then(&CoordinateTransformer::translate(Vector3D::new(x, y, z)));
    }
    transformer
}

pub fn transform(
    input: &Path,
    output: &Path,
    preset: Option<CoordinateTransformer>,
    scale: Option<f64>,
    translate: Option<[f64; 3]>,
) -> Result<()> {
    let transformer = build_transformer(preset, scale, translate);
    if transformer.transform().is_identity(1e-12) {
        tracing::warn!("No transform requested, copying geometry unchanged");
    }

    let registry = IoRegistry::with_defaults();
    let geometry = read(&registry, input)?;
    let transformed = transformer.apply_to_geometry(&geometry);
    write(&registry, &transformed, output)
}

pub fn bearing(
    velocities: &[[f64; 3]],
    min_speed: Option<f64>,
    window: Option<usize>,
) -> Result<()> {
    let converter = match min_speed {
        Some(speed) => VelocityConverter::with_minimum_speed(speed).context("invalid --min-speed")?,
        None => VelocityConverter::default(),
    };

    let velocities: Vec<Vector3D> = velocities
        .iter()
        .map(|&[east, north, up]| Vector3D::new(east, north, up))
        .collect();

    let bearings = match window {
        Some(window) => converter.convert_smoothed(&velocities, window),
        None => converter.convert_sequence(&velocities),
    }
    .context("bearing conversion failed")?;

    for (index, bearing) in bearings.iter().enumerate() {
        if bearing.is_stationary() {
            println!("{}: stationary", index);
        } else {
            println!("{}: {}", index, bearing);
        }
    }
    Ok(())
}

pub fn info(input: &Path) -> Result<()> {
    let registry = IoRegistry::with_defaults();
    let geometry = read(&registry, input)?;
    let metadata = geometry.metadata();

    println!("file:      {}", input.display());
    println!("kind:      {}", geometry.kind());
    if let Some(name) = &metadata.name {
        println!("name:      {}", name);
    }

    let bounds = match &geometry {
        Geometry::Mesh(mesh) => {
            println!("vertices:  {}", mesh.vertex_count());
            println!("faces:     {}", mesh.face_count());
            println!("triangles: {}", mesh.triangle_count());
            println!("normals:   {}", mesh.normals().is_some());
            let invalid = mesh.validate().len();
            if invalid > 0 {
                println!("invalid faces: {}", invalid);
            }
            mesh.bounding_box()
        }
        Geometry::PointCloud(cloud) => {
            println!("points:    {}", cloud.len());
            println!("colors:    {}", cloud.colors().is_some());
            println!("normals:   {}", cloud.normals().is_some());
            println!("intensity: {}", cloud.intensity().is_some());
            cloud.bounding_box()
        }
    };

    if let Some(bounds) = bounds {
        let size = bounds.dimensions();
        println!(
            "bounds:    ({}, {}, {}) to ({}, {}, {})",
            bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
        );
        println!("size:      {} x {} x {}", size.x, size.y, size.z);
    }
    for (key, value) in &metadata.properties {
        println!("{}: {}", key, value);
    }
    Ok(())
}
