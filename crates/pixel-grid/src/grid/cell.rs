//! A single grid position.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// One grid cell: its coordinates, palette index, and the palette color.
///
/// `color` always equals the owning grid's `palette[color_index]`; cells are
/// only created and updated through [`Grid`](super::Grid), which keeps the
/// two in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    x: u32,
    y: u32,
    color_index: usize,
    color: Color,
}

impl Cell {
    pub(crate) fn new(x: u32, y: u32, color_index: usize, color: Color) -> Self {
        Self {
            x,
            y,
            color_index,
            color,
        }
    }

    /// Column.
    #[inline]
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Row.
    #[inline]
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Index into the grid palette.
    #[inline]
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Cached `palette[color_index]`.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn assign(&mut self, color_index: usize, color: Color) {
        self.color_index = color_index;
        self.color = color;
    }
}

/// A requested change of one cell's palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellUpdate {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
    /// New palette index
    pub color_index: usize,
}

impl CellUpdate {
    /// Create an update.
    pub fn new(x: u32, y: u32, color_index: usize) -> Self {
        Self { x, y, color_index }
    }
}
