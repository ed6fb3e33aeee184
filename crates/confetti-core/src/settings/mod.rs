//! Settings shared from the phone to the wearable.
//!
//! The phone owns these values; the wearable only ever sees whole snapshots
//! replacing the previous one.

pub mod color;

pub use color::{Color, ThemePalette};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Theme colors in the phone's packed 64-bit color format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub primary: u64,
    pub primary_variant: u64,
    pub secondary: u64,
    pub secondary_variant: u64,
    pub surface: u64,
    pub error: u64,
    pub on_primary: u64,
    pub on_secondary: u64,
    pub on_background: u64,
    pub on_surface: u64,
    pub on_surface_variant: u64,
    pub on_error: u64,
}

impl Theme {
    /// Build a theme from unpacked colors.
    pub fn from_palette(palette: &ThemePalette) -> Self {
        Self {
            primary: palette.primary.to_packed(),
            primary_variant: palette.primary_variant.to_packed(),
            secondary: palette.secondary.to_packed(),
            secondary_variant: palette.secondary_variant.to_packed(),
            surface: palette.surface.to_packed(),
            error: palette.error.to_packed(),
            on_primary: palette.on_primary.to_packed(),
            on_secondary: palette.on_secondary.to_packed(),
            on_background: palette.on_background.to_packed(),
            on_surface: palette.on_surface.to_packed(),
            on_surface_variant: palette.on_surface_variant.to_packed(),
            on_error: palette.on_error.to_packed(),
        }
    }

    /// Decode every packed color. Fails on the first one outside sRGB.
    pub fn to_palette(&self) -> Result<ThemePalette, ValidationError> {
        Ok(ThemePalette {
            primary: Color::from_packed(self.primary)?,
            primary_variant: Color::from_packed(self.primary_variant)?,
            secondary: Color::from_packed(self.secondary)?,
            secondary_variant: Color::from_packed(self.secondary_variant)?,
            surface: Color::from_packed(self.surface)?,
            error: Color::from_packed(self.error)?,
            on_primary: Color::from_packed(self.on_primary)?,
            on_secondary: Color::from_packed(self.on_secondary)?,
            on_background: Color::from_packed(self.on_background)?,
            on_surface: Color::from_packed(self.on_surface)?,
            on_surface_variant: Color::from_packed(self.on_surface_variant)?,
            on_error: Color::from_packed(self.on_error)?,
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_palette(&ThemePalette::default())
    }
}

/// A settings snapshot as published by the phone.
///
/// Without a theme the wearable keeps its built-in palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WearSettings {
    #[serde(default)]
    pub theme: Option<Theme>,
}

impl WearSettings {
    pub fn with_theme(theme: Theme) -> Self {
        Self { theme: Some(theme) }
    }

    /// Palette to render with, if the phone sent a usable theme.
    ///
    /// An undecodable theme is treated like no theme.
    pub fn palette(&self) -> Option<ThemePalette> {
        let theme = self.theme.as_ref()?;
        match theme.to_palette() {
            Ok(palette) => Some(palette),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring undecodable theme");
                None
            }
        }
    }
}
