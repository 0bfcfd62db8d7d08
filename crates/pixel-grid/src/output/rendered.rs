//! Indexed raster output of a grid export.

use serde::Serialize;

use super::options::{ExportOptions, RenderError};
use crate::color::Color;
use crate::grid::Grid;

/// Color of the grid-line overlay.
pub const GRID_LINE_COLOR: Color = Color::rgb(0x40, 0x40, 0x40);

/// A rendered export: palette indices, one per output pixel, row-major.
///
/// The palette is the grid palette, followed by [`GRID_LINE_COLOR`] when the
/// export has a grid overlay.
///
/// # Example
///
/// ```
/// use pixel_grid::{render, Color, ExportOptions, ExportScale, GridBuilder, Palette};
///
/// let palette = Palette::new(&[Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]).unwrap();
/// let grid = GridBuilder::new(2, 1, palette).build(&[0, 1]).unwrap();
///
/// let options = ExportOptions::new(ExportScale::new(4).unwrap());
/// let image = render(&grid, &options).unwrap();
///
/// assert_eq!((image.width(), image.height()), (8, 4));
/// assert_eq!(image.to_rgba().len(), 8 * 4 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGrid {
    indices: Vec<u8>,
    width: u32,
    height: u32,
    palette: Vec<Color>,
}

impl RenderedGrid {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Palette indices, row-major.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Colors the indices refer to.
    #[inline]
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// RGBA8 bytes, fully opaque.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.indices
            .iter()
            .flat_map(|&i| {
                let c = self.palette[i as usize];
                [c.r, c.g, c.b, 255]
            })
            .collect()
    }
}

/// Rasterise `grid` with each cell as a `scale x scale` block.
///
/// With `show_grid` and a scale of 2 or more, the last column and last row
/// of every block use the grid-line color.
pub fn render(grid: &Grid, options: &ExportOptions) -> Result<RenderedGrid, RenderError> {
    let scale = options.scale.get();
    let overlay = options.show_grid && scale >= 2;

    let mut palette: Vec<Color> = grid.palette().colors().to_vec();
    if overlay {
        palette.push(GRID_LINE_COLOR);
    }
    if palette.len() > 256 {
        return Err(RenderError::PaletteTooLarge(grid.palette().len()));
    }
    let line_index = (palette.len() - 1) as u8;

    let width = grid.width() * scale;
    let height = grid.height() * scale;
    let mut indices = Vec::with_capacity(width as usize * height as usize);

    for row in grid.cells() {
        for py in 0..scale {
            for cell in row {
                let index = cell.color_index() as u8;
                for px in 0..scale {
                    let on_line = overlay && (px == scale - 1 || py == scale - 1);
                    indices.push(if on_line { line_index } else { index });
                }
            }
        }
    }

    Ok(RenderedGrid {
        indices,
        width,
        height,
        palette,
    })
}

/// Palette and per-color usage of a grid, for export metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorInfo {
    /// `#rrggbb` per palette entry
    pub palette: Vec<String>,
    /// Cells using each palette entry
    pub usage: Vec<usize>,
}

impl ColorInfo {
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            palette: grid.palette().to_hex(),
            usage: grid.usage(),
        }
    }

    /// Palette as comma separated hex.
    pub fn palette_csv(&self) -> String {
        self.palette.join(",")
    }

    /// Usage counts as comma separated integers, in palette order.
    pub fn usage_csv(&self) -> String {
        self.usage
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}
