//! Export options and their validation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned by export option parsing and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// Scale factor not in {1, 2, 4, 8, 16}
    InvalidScale(u32),
    /// Palette (plus grid-line color) does not fit in 8-bit indices
    PaletteTooLarge(usize),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidScale(s) => {
                write!(f, "invalid export scale {} (expected 1, 2, 4, 8 or 16)", s)
            }
            RenderError::PaletteTooLarge(n) => {
                write!(f, "palette of {} colors cannot be exported as indexed image", n)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Pixels per cell edge in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ExportScale(u32);

impl ExportScale {
    /// The accepted factors.
    pub const ALLOWED: [u32; 5] = [1, 2, 4, 8, 16];

    /// Validate a scale factor.
    pub fn new(scale: u32) -> Result<Self, RenderError> {
        if Self::ALLOWED.contains(&scale) {
            Ok(Self(scale))
        } else {
            Err(RenderError::InvalidScale(scale))
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for ExportScale {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u32> for ExportScale {
    type Error = RenderError;

    fn try_from(scale: u32) -> Result<Self, Self::Error> {
        Self::new(scale)
    }
}

impl From<ExportScale> for u32 {
    fn from(scale: ExportScale) -> Self {
        scale.0
    }
}

/// How to export a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub scale: ExportScale,
    /// Draw a one-pixel line on the right and bottom edge of every cell.
    /// Ignored at scale 1.
    pub show_grid: bool,
    /// Attach palette and usage metadata
    pub include_color_info: bool,
}

impl ExportOptions {
    pub fn new(scale: ExportScale) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    #[inline]
    pub fn show_grid(mut self, enabled: bool) -> Self {
        self.show_grid = enabled;
        self
    }

    #[inline]
    pub fn include_color_info(mut self, enabled: bool) -> Self {
        self.include_color_info = enabled;
        self
    }
}
