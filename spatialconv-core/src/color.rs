//! RGBA colors attached to point clouds

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from wider integer channels, rejecting anything outside 0-255
    pub fn from_channels(r: i64, g: i64, b: i64, a: i64) -> Result<Self> {
        Ok(Self {
            r: channel("red", r)?,
            g: channel("green", g)?,
            b: channel("blue", b)?,
            a: channel("alpha", a)?,
        })
    }

    /// `#rrggbb`, alpha is not encoded
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse six hex digits with an optional leading `#`; alpha is 255
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::invalid(format!(
                "expected 6 hex digits for a color, got '{}'",
                hex
            )));
        }

        let byte = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| Error::invalid(format!("bad color '{}': {}", hex, e)))
        };
        Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

fn channel(name: &str, value: i64) -> Result<u8> {
    u8::try_from(value).map_err(|_| {
        Error::invalid(format!("{} channel must be in 0..=255, got {}", name, value))
    })
}
