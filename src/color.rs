//! # Color Module
//!
//! RGBA colors used by the material palette, the mesher, and the overlay geometry.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a hex color string.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorError {
    #[error("color `{0}` does not start with '#'")]
    MissingHash(String),
    #[error("color `{0}` must have 3 or 6 hex digits")]
    InvalidLength(String),
    #[error("color `{0}` contains a non-hex digit")]
    InvalidDigit(String),
}

/// A 32-bit float RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// Builds an opaque color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parses `#rrggbb` or the short form `#rgb`.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxel_world::color::Color;
    ///
    /// assert_eq!(Color::hex("#fff").unwrap(), Color::WHITE);
    /// assert!(Color::hex("fff").is_err());
    /// ```
    pub fn hex(s: &str) -> Result<Self, ColorError> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(s.to_string()))?;

        let nibble = |c: char| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| ColorError::InvalidDigit(s.to_string()))
        };
        let chars: Vec<char> = digits.chars().collect();

        match chars.len() {
            6 => Ok(Color::rgb8(
                nibble(chars[0])? << 4 | nibble(chars[1])?,
                nibble(chars[2])? << 4 | nibble(chars[3])?,
                nibble(chars[4])? << 4 | nibble(chars[5])?,
            )),
            3 => Ok(Color::rgb8(
                nibble(chars[0])? * 17,
                nibble(chars[1])? * 17,
                nibble(chars[2])? * 17,
            )),
            _ => Err(ColorError::InvalidLength(s.to_string())),
        }
    }

    /// The same color with its alpha replaced.
    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }

    /// Scales the RGB channels, leaving alpha untouched.
    pub fn shaded(self, factor: f32) -> Self {
        Color {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(R:{:.2} G:{:.2} B:{:.2} A:{:.2})",
            self.r, self.g, self.b, self.a
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        let c = Color::hex("#488c36").unwrap();
        assert_eq!(c, Color::rgb8(72, 140, 54));
        assert_eq!(Color::hex("#f00").unwrap(), Color::RED);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(
            Color::hex("#12345"),
            Err(ColorError::InvalidLength("#12345".to_string()))
        );
        assert_eq!(
            Color::hex("#zzz"),
            Err(ColorError::InvalidDigit("#zzz".to_string()))
        );
        assert!(matches!(Color::hex("123"), Err(ColorError::MissingHash(_))));
    }

    #[test]
    fn shading_keeps_alpha() {
        let c = Color::rgba(1.0, 0.5, 0.25, 0.8).shaded(0.5);
        assert_eq!(c.to_array(), [0.5, 0.25, 0.125, 0.8]);
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = Color::RED.with_alpha(0.25);
        assert_eq!(c.to_array(), [1.0, 0.0, 0.0, 0.25]);
    }
}
