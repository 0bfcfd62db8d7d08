//! Grid assembly and cell editing.
//!
//! [`GridBuilder`] turns quantizer output into a [`Grid`]; the grid's edit
//! methods (`set_cell`, `set_cells`, `paint`, `flood_fill`) validate before
//! mutating so the palette-index invariant is never broken.

mod cell;
mod error;
mod grid;

pub use cell::{Cell, CellUpdate};
pub use error::GridError;
pub use grid::{Grid, GridBuilder};
