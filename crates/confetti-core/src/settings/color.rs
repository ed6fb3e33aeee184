//! Packed color decoding.
//!
//! The phone stores colors as 64-bit packed values: an sRGB color keeps its
//! ARGB bytes in the high 32 bits and color space id 0 in the low 6 bits.
//! Other color spaces pack half-float components and are not supported here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

const COLOR_SPACE_MASK: u64 = 0x3f;
const SRGB_SPACE: u64 = 0;

/// An sRGB color with alpha. Serialized as `#AARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub argb: u32,
}

impl Color {
    pub const fn from_argb(argb: u32) -> Self {
        Self { argb }
    }

    /// Opaque color from `0xRRGGBB`.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            argb: 0xff00_0000 | (rgb & 0x00ff_ffff),
        }
    }

    pub fn from_packed(packed: u64) -> Result<Self, ValidationError> {
        let space = packed & COLOR_SPACE_MASK;
        if space != SRGB_SPACE {
            return Err(ValidationError::UnsupportedColorSpace {
                packed,
                space: space as u8,
            });
        }
        Ok(Self {
            argb: (packed >> 32) as u32,
        })
    }

    pub const fn to_packed(self) -> u64 {
        (self.argb as u64) << 32
    }

    pub const fn alpha(self) -> u8 {
        (self.argb >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.argb >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.argb >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.argb as u8
    }

    /// `#AARRGGBB`
    pub fn to_hex(self) -> String {
        format!("#{:08X}", self.argb)
    }

    /// Parse `#AARRGGBB` or opaque `#RRGGBB`.
    pub fn from_hex(value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidValue {
            field: "color".into(),
            message: format!("expected #AARRGGBB or #RRGGBB, got '{value}'"),
        };
        let digits = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let parsed = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            8 => Ok(Self::from_argb(parsed)),
            6 => Ok(Self::from_rgb(parsed)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.argb)
    }
}

/// Decoded theme colors, ready to hand to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub primary: Color,
    pub primary_variant: Color,
    pub secondary: Color,
    pub secondary_variant: Color,
    pub surface: Color,
    pub error: Color,
    pub on_primary: Color,
    pub on_secondary: Color,
    pub on_background: Color,
    pub on_surface: Color,
    pub on_surface_variant: Color,
    pub on_error: Color,
}

impl Default for ThemePalette {
    // Wear Material defaults.
    fn default() -> Self {
        Self {
            primary: Color::from_rgb(0xAECBFA),
            primary_variant: Color::from_rgb(0x8AB4F8),
            secondary: Color::from_rgb(0xFDE293),
            secondary_variant: Color::from_rgb(0x594F33),
            surface: Color::from_rgb(0x303133),
            error: Color::from_rgb(0xEE675C),
            on_primary: Color::from_rgb(0x303133),
            on_secondary: Color::from_rgb(0x303133),
            on_background: Color::from_rgb(0xFFFFFF),
            on_surface: Color::from_rgb(0xFFFFFF),
            on_surface_variant: Color::from_rgb(0xDADCE0),
            on_error: Color::from_rgb(0x000000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_packed_srgb() {
        let color = Color::from_packed(0xFF33_6699_0000_0000).unwrap();
        assert_eq!(color.argb, 0xFF33_6699);
        assert_eq!(color.alpha(), 0xFF);
        assert_eq!(color.red(), 0x33);
        assert_eq!(color.green(), 0x66);
        assert_eq!(color.blue(), 0x99);
        assert_eq!(color.to_hex(), "#FF336699");
    }

    #[test]
    fn test_from_packed_rejects_other_space() {
        let err = Color::from_packed(0x3C00_3800_3400_0007).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedColorSpace {
                packed: 0x3C00_3800_3400_0007,
                space: 7,
            }
        );
    }

    #[test]
    fn test_to_packed_inverse() {
        let color = Color::from_argb(0x80FF_0000);
        assert_eq!(Color::from_packed(color.to_packed()).unwrap(), color);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#80FF0000").unwrap().argb, 0x80FF_0000);
        assert_eq!(Color::from_hex("#3b82f6").unwrap().argb, 0xFF3B_82F6);
        assert!(Color::from_hex("3b82f6").is_err());
        assert!(Color::from_hex("#3b82f").is_err());
        assert!(Color::from_hex("#+b82f6").is_err());
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::from_rgb(0x3B82F6)).unwrap();
        assert_eq!(json, "\"#FF3B82F6\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::from_rgb(0x3B82F6));
    }

    #[test]
    fn test_from_rgb_is_opaque() {
        assert_eq!(Color::from_rgb(0x123456).argb, 0xFF12_3456);
        assert_eq!(Color::from_rgb(0xAB12_3456).argb, 0xFF12_3456);
    }
}
