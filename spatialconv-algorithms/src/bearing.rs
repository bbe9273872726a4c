//! ENU velocity to compass bearing conversion
//!
//! Velocities are East-North-Up vectors (x = East, y = North, z = Up). Bearings
//! are measured clockwise from North in degrees, in `[0, 360)`. The Up
//! component never contributes to either bearing or speed.

use spatialconv_core::{Error, Result, Vector3D};
use std::fmt;

/// Horizontal speeds below this are reported as [`Bearing::STATIONARY`]
pub const DEFAULT_MINIMUM_SPEED: f64 = 0.01;

/// Direction of travel and horizontal speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bearing {
    /// Clockwise from North, `[0, 360)`
    pub degrees: f64,
    /// Horizontal speed in the velocity's units
    pub speed: f64,
}

impl Bearing {
    pub const STATIONARY: Bearing = Bearing {
        degrees: 0.0,
        speed: 0.0,
    };

    pub fn is_stationary(&self) -> bool {
        *self == Self::STATIONARY
    }

    pub fn cardinal(&self) -> CardinalDirection {
        CardinalDirection::from_bearing(self.degrees)
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}° {} at {:.3}", self.degrees, self.cardinal(), self.speed)
    }
}

/// Eight-way compass direction, each sector 45 degrees wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CardinalDirection {
    /// Clockwise from North
    pub const ALL: [CardinalDirection; 8] = [
        CardinalDirection::N,
        CardinalDirection::NE,
        CardinalDirection::E,
        CardinalDirection::SE,
        CardinalDirection::S,
        CardinalDirection::SW,
        CardinalDirection::W,
        CardinalDirection::NW,
    ];

    /// Sector containing `degrees`; North covers `[337.5, 360)` and `[0, 22.5)`
    pub fn from_bearing(degrees: f64) -> Self {
        let sector = ((normalize_degrees(degrees) + 22.5) / 45.0).floor() as usize % 8;
        Self::ALL[sector]
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            CardinalDirection::N => "N",
            CardinalDirection::NE => "NE",
            CardinalDirection::E => "E",
            CardinalDirection::SE => "SE",
            CardinalDirection::S => "S",
            CardinalDirection::SW => "SW",
            CardinalDirection::W => "W",
            CardinalDirection::NW => "NW",
        }
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Converts ENU velocities into bearings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityConverter {
    minimum_speed: f64,
}

impl Default for VelocityConverter {
    fn default() -> Self {
        Self {
            minimum_speed: DEFAULT_MINIMUM_SPEED,
        }
    }
}

impl VelocityConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter with a custom stationary threshold
    pub fn with_minimum_speed(minimum_speed: f64) -> Result<Self> {
        if !minimum_speed.is_finite() || minimum_speed < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "minimum speed must be a non-negative number, got {}",
                minimum_speed
            )));
        }
        Ok(Self { minimum_speed })
    }

    pub fn minimum_speed(&self) -> f64 {
        self.minimum_speed
    }

    /// Bearing and horizontal speed of one velocity
    pub fn convert(&self, velocity: &Vector3D) -> Result<Bearing> {
        if !velocity.iter().all(|c| c.is_finite()) {
            return Err(Error::ComputationFailure(format!(
                "velocity ({}, {}, {}) has non-finite components",
                velocity.x, velocity.y, velocity.z
            )));
        }

        let (east, north) = (velocity.x, velocity.y);
        let speed = east.hypot(north);
        if speed < self.minimum_speed {
            return Ok(Bearing::STATIONARY);
        }

        // Same angle as 90 - atan2(north, east), without the round trip through 90
        let degrees = normalize_degrees(east.atan2(north).to_degrees());
        Ok(Bearing { degrees, speed })
    }

    /// Convert every velocity in order; the first failure aborts the batch
    pub fn convert_sequence(&self, velocities: &[Vector3D]) -> Result<Vec<Bearing>> {
        velocities
            .iter()
            .enumerate()
            .map(|(index, velocity)| {
                self.convert(velocity).map_err(|e| match e {
                    Error::ComputationFailure(message) => {
                        Error::ComputationFailure(format!("sample {}: {}", index, message))
                    }
                    other => other,
                })
            })
            .collect()
    }

    /// Smooth each component with a centred moving average, then convert
    pub fn convert_smoothed(&self, velocities: &[Vector3D], window: usize) -> Result<Vec<Bearing>> {
        let smoothed = moving_average(velocities, window)?;
        tracing::debug!(samples = velocities.len(), window, "Smoothed velocity sequence");
        self.convert_sequence(&smoothed)
    }
}

/// Centred moving average over `window` samples
///
/// Each output averages `(window - 1) / 2` samples before and `window / 2`
/// samples after its position. Near the ends the window shrinks to what is
/// available, so the output has as many samples as the input.
pub fn moving_average(values: &[Vector3D], window: usize) -> Result<Vec<Vector3D>> {
    if window == 0 {
        return Err(Error::InvalidArgument(
            "smoothing window must be at least 1".to_string(),
        ));
    }

    let before = (window - 1) / 2;
    let after = window / 2;
    let averaged = (0..values.len())
        .map(|i| {
            let span = &values[i.saturating_sub(before)..(i + after + 1).min(values.len())];
            span.iter().sum::<Vector3D>() / span.len() as f64
        })
        .collect();
    Ok(averaged)
}

/// Wrap into `[0, 360)`
fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
