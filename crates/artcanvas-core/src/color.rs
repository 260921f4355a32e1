//! Brush colors.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default brush color (`#2563eb`).
pub const DEFAULT_COLOR: SerializableColor = SerializableColor::new(0x25, 0x63, 0xeb, 255);

/// Quick-pick palette offered by the color picker.
pub const PALETTE: [SerializableColor; 12] = [
    SerializableColor::new(0x25, 0x63, 0xeb, 255),
    SerializableColor::new(0xdc, 0x26, 0x26, 255),
    SerializableColor::new(0x16, 0xa3, 0x4a, 255),
    SerializableColor::new(0xca, 0x8a, 0x04, 255),
    SerializableColor::new(0x93, 0x33, 0xea, 255),
    SerializableColor::new(0xc2, 0x41, 0x0c, 255),
    SerializableColor::new(0x08, 0x91, 0xb2, 255),
    SerializableColor::new(0xbe, 0x12, 0x3c, 255),
    SerializableColor::new(0x00, 0x00, 0x00, 255),
    SerializableColor::new(0x6b, 0x72, 0x80, 255),
    SerializableColor::new(0xf5, 0x9e, 0x0b, 255),
    SerializableColor::new(0xec, 0x48, 0x99, 255),
];

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color must start with '#': {0}")]
    MissingHash(String),
    #[error("expected 6 or 8 hex digits, got {0}")]
    BadLength(usize),
    #[error("invalid hex digit in {0}")]
    InvalidDigit(String),
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(hex.to_string()))?;
        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColorParseError::BadLength(digits.len()));
        }
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorParseError::InvalidDigit(hex.to_string()))
        };
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert to a peniko color with its alpha scaled by `factor`.
    pub fn with_alpha_factor(&self, factor: f64) -> Color {
        Color::from(*self).multiply_alpha(factor.clamp(0.0, 1.0) as f32)
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        DEFAULT_COLOR
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for SerializableColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.trim())
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let color = SerializableColor::from_hex("#2563eb").unwrap();
        assert_eq!(color, DEFAULT_COLOR);
        assert_eq!(color.to_hex(), "#2563eb");
    }

    #[test]
    fn test_parse_hex_with_alpha() {
        let color: SerializableColor = "#ff000080".parse().unwrap();
        assert_eq!(color, SerializableColor::new(255, 0, 0, 128));
        assert_eq!(color.to_string(), "#ff000080");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            SerializableColor::from_hex("2563eb"),
            Err(ColorParseError::MissingHash("2563eb".to_string()))
        );
        assert_eq!(
            SerializableColor::from_hex("#123"),
            Err(ColorParseError::BadLength(3))
        );
        assert!(matches!(
            SerializableColor::from_hex("#zz0000"),
            Err(ColorParseError::InvalidDigit(_))
        ));
    }

    #[test]
    fn test_peniko_roundtrip() {
        let color = SerializableColor::new(10, 20, 30, 255);
        let back = SerializableColor::from(Color::from(color));
        assert_eq!(back, color);
    }

    #[test]
    fn test_alpha_factor() {
        let color = SerializableColor::black().with_alpha_factor(0.5);
        let rgba = color.to_rgba8();
        assert!((rgba.a as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_palette_starts_with_default() {
        assert_eq!(PALETTE[0], DEFAULT_COLOR);
        assert_eq!(PALETTE[8], SerializableColor::black());
    }
}
