//! Export rasterisation of grids.
//!
//! [`render`] turns a [`Grid`](crate::Grid) into a [`RenderedGrid`]: one
//! palette index per output pixel plus the palette they index. The indexed
//! form is canonical; RGBA is produced on demand. Encoding to a file format
//! is left to the caller.

mod options;
mod rendered;

pub use options::{ExportOptions, ExportScale, RenderError};
pub use rendered::{render, ColorInfo, RenderedGrid, GRID_LINE_COLOR};
