//! spatialconv command line
//!
//! # Commands
//!
//! - `spatialconv convert <in> <out>` - Re-encode geometry by file extension
//! - `spatialconv sample <in> <out>` - Turn a mesh into a point cloud
//! - `spatialconv transform <in> <out>` - Apply a preset, scale and offset
//! - `spatialconv bearing --velocity e,n,u` - Compass bearings of ENU velocities
//! - `spatialconv info <in>` - Summarize a file
//!
//! Logging is controlled through `RUST_LOG` (default `info`).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use spatialconv_algorithms::{CoordinateTransformer, SamplingStrategy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spatialconv")]
#[command(
    about = "Convert meshes and point clouds between formats and coordinate conventions",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a file and write it in the format implied by the output extension
    Convert { input: PathBuf, output: PathBuf },

    /// Sample a mesh into a point cloud
    Sample {
        input: PathBuf,
        output: PathBuf,

        #[arg(long, value_enum, default_value_t = Strategy::Vertices)]
        strategy: Strategy,

        /// Points per unit area for the uniform strategy
        #[arg(long, default_value_t = 100.0)]
        density: f64,

        /// Target point count for the fixed strategy
        #[arg(long, default_value_t = 10_000)]
        count: usize,

        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Transform geometry; steps run in the order preset, scale, translate
    Transform {
        input: PathBuf,
        output: PathBuf,

        #[arg(long, value_enum)]
        preset: Option<Preset>,

        #[arg(long)]
        scale: Option<f64>,

        /// Offset as `x,y,z`
        #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
        translate: Option<[f64; 3]>,
    },

    /// Convert ENU velocities to compass bearings
    Bearing {
        /// Velocity as `east,north,up`; repeat for a sequence
        #[arg(
            long = "velocity",
            required = true,
            value_parser = parse_triple,
            allow_hyphen_values = true
        )]
        velocities: Vec<[f64; 3]>,

        /// Horizontal speed below which a sample counts as stationary
        #[arg(long)]
        min_speed: Option<f64>,

        /// Moving-average window applied before conversion
        #[arg(long)]
        window: Option<usize>,
    },

    /// Print a summary of a geometry file
    Info { input: PathBuf },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Vertices,
    Uniform,
    Fixed,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    YUpToZUp,
    ZUpToYUp,
}

fn parse_triple(value: &str) -> std::result::Result<[f64; 3], String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{}': {}", value, e))?;

    <[f64; 3]>::try_from(parts)
        .map_err(|parts| format!("expected three comma-separated values, got {}", parts.len()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { input, output } => commands::convert(&input, &output),
        Commands::Sample {
            input,
            output,
            strategy,
            density,
            count,
            seed,
        } => {
            let strategy = match strategy {
                Strategy::Vertices => SamplingStrategy::VerticesOnly,
                Strategy::Uniform => SamplingStrategy::UniformSurface {
                    points_per_unit: density,
                },
                Strategy::Fixed => SamplingStrategy::FixedCount {
                    total_points: count,
                },
            };
            commands::sample(&input, &output, strategy, seed)
        }
        Commands::Transform {
            input,
            output,
            preset,
            scale,
            translate,
        } => {
            let preset = preset.map(|preset| match preset {
                Preset::YUpToZUp => CoordinateTransformer::y_up_to_z_up(),
                Preset::ZUpToYUp => CoordinateTransformer::z_up_to_y_up(),
            });
            commands::transform(&input, &output, preset, scale, translate)
        }
        Commands::Bearing {
            velocities,
            min_speed,
            window,
        } => commands::bearing(&velocities, min_speed, window),
        Commands::Info { input } => commands::info(&input),
    }
}
