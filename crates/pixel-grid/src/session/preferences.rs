//! Editor preferences carried by a session.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Allowed brush sizes.
pub const BRUSH_SIZE_RANGE: RangeInclusive<u8> = 1..=3;

/// Whether the grid accepts edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    View,
    Edit,
}

/// Active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushTool {
    /// Square brush of `brush_size`
    #[default]
    Pixel,
    /// 4-connected flood fill
    Fill,
    /// Pick the color under the cursor
    Eyedropper,
}

impl fmt::Display for BrushTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BrushTool::Pixel => "pixel",
            BrushTool::Fill => "fill",
            BrushTool::Eyedropper => "eyedropper",
        })
    }
}

/// Per-session editor state that is not part of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub mode: EditorMode,
    pub tool: BrushTool,
    /// Palette index painted by the pixel and fill tools
    pub selected_color: usize,
    /// Brush edge length, 1..=3
    pub brush_size: u8,
    /// Draw grid lines in views and exports
    pub show_grid: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            mode: EditorMode::View,
            tool: BrushTool::Pixel,
            selected_color: 0,
            brush_size: 1,
            show_grid: true,
        }
    }
}

impl Preferences {
    /// Check the brush size range.
    pub fn validate(&self) -> Result<(), super::SessionError> {
        if !BRUSH_SIZE_RANGE.contains(&self.brush_size) {
            return Err(super::SessionError::BrushSize(self.brush_size));
        }
        Ok(())
    }
}
