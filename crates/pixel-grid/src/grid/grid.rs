//! The pixel grid and its builder.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellUpdate};
use super::error::GridError;
use crate::color::Color;
use crate::palette::Palette;

/// A `width x height` grid of palette-indexed cells.
///
/// `cells` is indexed `[row][column]`, has `height` rows of `width` cells,
/// and every cell's index is valid for `palette`. All mutation goes through
/// methods that validate first, so these hold for every reachable value.
///
/// `Clone` is a full deep copy and costs O(width * height).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Vec<Cell>>,
    palette: Palette,
}

/// Assembles a [`Grid`] from row-major palette indices.
///
/// # Example
///
/// ```
/// use pixel_grid::{Color, GridBuilder, Palette};
///
/// let palette = Palette::new(&[Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]).unwrap();
/// let grid = GridBuilder::new(2, 1, palette).build(&[1, 0]).unwrap();
/// assert_eq!(grid.cell(0, 0).unwrap().color(), Color::rgb(255, 255, 255));
/// ```
#[derive(Debug, Clone)]
pub struct GridBuilder {
    width: u32,
    height: u32,
    palette: Palette,
}

impl GridBuilder {
    /// Builder for a grid of the given shape and palette.
    pub fn new(width: u32, height: u32, palette: Palette) -> Self {
        Self {
            width,
            height,
            palette,
        }
    }

    /// Build the grid; cell `(x, y)` takes `indices[y * width + x]`.
    ///
    /// # Errors
    ///
    /// - [`GridError::ShapeMismatch`] if `indices.len() != width * height`
    /// - [`GridError::InvalidColorIndex`] if an index is outside the palette
    pub fn build(self, indices: &[usize]) -> Result<Grid, GridError> {
        let width = self.width as usize;
        let expected = width * self.height as usize;
        if indices.len() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                actual: indices.len(),
            });
        }

        let mut cells = Vec::with_capacity(self.height as usize);
        for y in 0..self.height {
            let mut row = Vec::with_capacity(width);
            for x in 0..self.width {
                let index = indices[y as usize * width + x as usize];
                let color = color_at(&self.palette, index)?;
                row.push(Cell::new(x, y, index, color));
            }
            cells.push(row);
        }

        Ok(Grid {
            width: self.width,
            height: self.height,
            cells,
            palette: self.palette,
        })
    }

    /// Build a grid with every cell set to `index`.
    pub fn filled(self, index: usize) -> Result<Grid, GridError> {
        let count = self.width as usize * self.height as usize;
        self.build(&vec![index; count])
    }
}

fn color_at(palette: &Palette, index: usize) -> Result<Color, GridError> {
    palette.get(index).ok_or(GridError::InvalidColorIndex {
        index,
        palette_len: palette.len(),
    })
}

impl Grid {
    /// Width in cells.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The palette all cell indices point into.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Rows of cells, `[row][column]`.
    #[inline]
    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Cell at column `x`, row `y`.
    #[inline]
    pub fn cell(&self, x: u32, y: u32) -> Option<&Cell> {
        self.cells.get(y as usize)?.get(x as usize)
    }

    /// Palette indices in row-major order.
    pub fn indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .flat_map(|row| row.iter().map(Cell::color_index))
            .collect()
    }

    /// Cell colors in row-major order.
    pub fn colors(&self) -> Vec<Color> {
        self.cells
            .iter()
            .flat_map(|row| row.iter().map(Cell::color))
            .collect()
    }

    /// Number of cells using each palette entry.
    pub fn usage(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.palette.len()];
        for cell in self.cells.iter().flatten() {
            counts[cell.color_index()] += 1;
        }
        counts
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<(), GridError> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(GridError::OutOfBounds { x, y })
        }
    }

    /// Set one cell. Returns whether its index changed.
    pub fn set_cell(&mut self, x: u32, y: u32, color_index: usize) -> Result<bool, GridError> {
        self.check_bounds(x, y)?;
        let color = color_at(&self.palette, color_index)?;
        let cell = &mut self.cells[y as usize][x as usize];
        let changed = cell.color_index() != color_index;
        cell.assign(color_index, color);
        Ok(changed)
    }

    /// Apply a batch of updates atomically.
    ///
    /// Every update is validated before any is applied; on error the grid is
    /// unchanged. Later updates to the same cell win. Returns the number of
    /// updates that changed a cell.
    pub fn set_cells(&mut self, updates: &[CellUpdate]) -> Result<usize, GridError> {
        for u in updates {
            self.check_bounds(u.x, u.y)?;
            color_at(&self.palette, u.color_index)?;
        }
        let mut changed = 0;
        for u in updates {
            if self.set_cell(u.x, u.y, u.color_index)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Paint a `size x size` square brush around `(x, y)`.
    ///
    /// The square starts `(size - 1) / 2` cells up and left of `(x, y)` and
    /// is clipped to the grid. `(x, y)` itself must be inside the grid.
    pub fn paint(
        &mut self,
        x: u32,
        y: u32,
        size: u32,
        color_index: usize,
    ) -> Result<usize, GridError> {
        self.check_bounds(x, y)?;
        color_at(&self.palette, color_index)?;

        let size = i64::from(size.max(1));
        let back = (size - 1) / 2;
        let clip = |origin: u32, limit: u32| {
            let start = i64::from(origin) - back;
            let end = (start + size).min(i64::from(limit));
            (start.max(0) as u32, end as u32)
        };
        let (x0, x1) = clip(x, self.width);
        let (y0, y1) = clip(y, self.height);

        let mut changed = 0;
        for cy in y0..y1 {
            for cx in x0..x1 {
                if self.set_cell(cx, cy, color_index)? {
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    /// 4-connected flood fill starting at `(x, y)`.
    ///
    /// Replaces the region of cells sharing the start cell's index. Returns
    /// the number of cells changed; filling with the current index is a
    /// no-op.
    pub fn flood_fill(&mut self, x: u32, y: u32, color_index: usize) -> Result<usize, GridError> {
        self.check_bounds(x, y)?;
        let color = color_at(&self.palette, color_index)?;

        let target = self.cells[y as usize][x as usize].color_index();
        if target == color_index {
            return Ok(0);
        }

        let (w, h) = (self.width, self.height);
        let mut queue = VecDeque::from([(x, y)]);
        let mut changed = 0;
        while let Some((cx, cy)) = queue.pop_front() {
            let cell = &mut self.cells[cy as usize][cx as usize];
            if cell.color_index() != target {
                continue;
            }
            cell.assign(color_index, color);
            changed += 1;

            if cx > 0 {
                queue.push_back((cx - 1, cy));
            }
            if cx + 1 < w {
                queue.push_back((cx + 1, cy));
            }
            if cy > 0 {
                queue.push_back((cx, cy - 1));
            }
            if cy + 1 < h {
                queue.push_back((cx, cy + 1));
            }
        }
        Ok(changed)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCell {
    color_index: usize,
}

#[derive(Deserialize)]
struct RawGrid {
    width: u32,
    height: u32,
    cells: Vec<Vec<RawCell>>,
    palette: Palette,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let expected = raw.width as usize * raw.height as usize;
        let rows_ok = raw.cells.len() == raw.height as usize
            && raw.cells.iter().all(|row| row.len() == raw.width as usize);
        let indices: Vec<usize> = raw
            .cells
            .iter()
            .flatten()
            .map(|c| c.color_index)
            .collect();
        if !rows_ok {
            return Err(GridError::ShapeMismatch {
                expected,
                actual: indices.len(),
            });
        }
        GridBuilder::new(raw.width, raw.height, raw.palette).build(&indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette3() -> Palette {
        Palette::new(&[
            Color::rgb(0, 0, 0),
            Color::rgb(255, 0, 0),
            Color::rgb(255, 255, 255),
        ])
        .unwrap()
    }

    fn grid(width: u32, height: u32, indices: &[usize]) -> Grid {
        GridBuilder::new(width, height, palette3()).build(indices).unwrap()
    }

    #[test]
    fn test_build_layout() {
        let g = grid(3, 2, &[0, 1, 2, 2, 1, 0]);
        assert_eq!(g.cells().len(), 2);
        assert!(g.cells().iter().all(|row| row.len() == 3));
        let c = g.cell(2, 0).unwrap();
        assert_eq!((c.x(), c.y(), c.color_index()), (2, 0, 2));
        assert_eq!(c.color(), Color::rgb(255, 255, 255));
        assert_eq!(g.cell(0, 1).unwrap().color_index(), 2);
        assert_eq!(g.indices(), vec![0, 1, 2, 2, 1, 0]);
    }

    #[test]
    fn test_build_shape_mismatch() {
        let err = GridBuilder::new(2, 2, palette3()).build(&[0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            GridError::ShapeMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_build_invalid_index() {
        let err = GridBuilder::new(1, 1, palette3()).build(&[3]).unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidColorIndex {
                index: 3,
                palette_len: 3
            }
        );
    }

    #[test]
    fn test_set_cell_keeps_color_in_sync() {
        let mut g = grid(2, 2, &[0; 4]);
        assert_eq!(g.set_cell(1, 1, 1), Ok(true));
        assert_eq!(g.set_cell(1, 1, 1), Ok(false));
        let c = g.cell(1, 1).unwrap();
        assert_eq!(c.color(), g.palette().get(c.color_index()).unwrap());
    }

    #[test]
    fn test_set_cell_errors() {
        let mut g = grid(2, 2, &[0; 4]);
        assert_eq!(g.set_cell(2, 0, 0), Err(GridError::OutOfBounds { x: 2, y: 0 }));
        assert!(matches!(
            g.set_cell(0, 0, 7),
            Err(GridError::InvalidColorIndex { .. })
        ));
    }

    #[test]
    fn test_set_cells_is_atomic() {
        let mut g = grid(2, 2, &[0; 4]);
        let before = g.clone();
        let updates = [CellUpdate::new(0, 0, 1), CellUpdate::new(5, 5, 1)];
        assert!(g.set_cells(&updates).is_err());
        assert_eq!(g, before);

        let updates = [CellUpdate::new(0, 0, 1), CellUpdate::new(1, 0, 2)];
        assert_eq!(g.set_cells(&updates), Ok(2));
        assert_eq!(g.indices(), vec![1, 2, 0, 0]);
    }

    #[test]
    fn test_paint_brush_sizes() {
        let mut g = grid(4, 4, &[0; 16]);
        assert_eq!(g.paint(1, 1, 1, 1), Ok(1));

        let mut g = grid(4, 4, &[0; 16]);
        assert_eq!(g.paint(1, 1, 2, 1), Ok(4));
        assert_eq!(g.indices()[0..8], [0, 0, 0, 0, 0, 1, 1, 0]);

        let mut g = grid(4, 4, &[0; 16]);
        assert_eq!(g.paint(1, 1, 3, 1), Ok(9));
        assert_eq!(g.cell(0, 0).unwrap().color_index(), 1);
        assert_eq!(g.cell(2, 2).unwrap().color_index(), 1);
        assert_eq!(g.cell(3, 3).unwrap().color_index(), 0);
    }

    #[test]
    fn test_paint_clips_at_edges() {
        let mut g = grid(3, 3, &[0; 9]);
        assert_eq!(g.paint(0, 0, 3, 2), Ok(4));
        let mut g = grid(3, 3, &[0; 9]);
        assert_eq!(g.paint(2, 2, 3, 2), Ok(4));
    }

    #[test]
    fn test_flood_fill_four_connected() {
        // 0 0 1
        // 1 0 1
        // 0 1 0
        let mut g = grid(3, 3, &[0, 0, 1, 1, 0, 1, 0, 1, 0]);
        assert_eq!(g.flood_fill(0, 0, 2), Ok(3));
        assert_eq!(g.indices(), vec![2, 2, 1, 1, 2, 1, 0, 1, 0]);
    }

    #[test]
    fn test_flood_fill_same_index_noop() {
        let mut g = grid(2, 2, &[1; 4]);
        assert_eq!(g.flood_fill(0, 0, 1), Ok(0));
    }

    #[test]
    fn test_usage_counts() {
        let g = grid(3, 1, &[2, 0, 2]);
        assert_eq!(g.usage(), vec![1, 0, 2]);
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let g = grid(2, 1, &[0, 2]);
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["cells"][0][1]["colorIndex"], 2);
        assert_eq!(json["cells"][0][1]["color"]["r"], 255);
        let back: Grid = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, g);

        let mut bad = json;
        bad["cells"][0][1]["colorIndex"] = 9.into();
        assert!(serde_json::from_value::<Grid>(bad).is_err());
    }
}
