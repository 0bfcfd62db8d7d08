#![allow(clippy::module_inception, clippy::needless_range_loop)]

//! pixel-grid: image to limited-palette pixel grid conversion
//!
//! This library converts a raster image into a fixed-size grid of
//! palette-indexed cells and provides the editing state machine around
//! that grid: cell edits, flood fill, and bounded undo/redo.
//!
//! # Quick Start
//!
//! The [`PixelArtConverter`] builder is the primary entry point:
//!
//! ```
//! use pixel_grid::{Color, Config, PixelArtConverter, SourceImage};
//!
//! let image = SourceImage::filled(64, 64, Color::rgba(200, 40, 40, 255)).unwrap();
//! let grid = PixelArtConverter::new(Config::new(16, 16, 8).dithering(true))
//!     .convert(&image)
//!     .unwrap();
//!
//! assert_eq!(grid.width(), 16);
//! assert_eq!(grid.palette().len(), 1);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! SourceImage (RGBA8, any size)
//!     |
//!     v
//! Resampler            aspect fit + center, box average per cell,
//!     |                nearest pixel when a cell covers no whole pixel
//!     v
//! Quantizer            weighted k-means (<= 20 rounds) for the palette,
//!     |                nearest index or serpentine Floyd-Steinberg
//!     v
//! GridBuilder          cells[row][col] = palette[indices[row * w + col]]
//!     |
//!     v
//! Grid  -->  EditorSession / EditHistory
//! ```
//!
//! All color matching uses [`nearest_index`]: Euclidean RGB distance with
//! ties going to the lowest palette index.
//!
//! # Editing
//!
//! [`EditorSession`] is the per-session context object. It tracks which
//! conversion request is current (late responses for superseded requests
//! are dropped), the working grid, the [`EditHistory`] and the editor
//! [`Preferences`]. Whole-grid replacement commits to history; cell edits
//! do not until [`EditorSession::commit`] is called.
//!
//! # Worker protocol
//!
//! [`ConversionRequest`] / [`ConversionResponse`] are the serde wire types
//! of the request/response boundary, and [`execute`] runs one request
//! synchronously. Running it off the interactive thread is the caller's
//! business.

pub mod api;
pub mod color;
pub mod dither;
pub mod grid;
pub mod history;
pub mod output;
pub mod palette;
pub mod protocol;
pub mod quantize;
pub mod resample;
pub mod session;


pub use api::{convert, Config, ConfigError, ConvertError, PixelArtConverter};
pub use color::{distance, nearest_index, Color};
pub use grid::{Cell, CellUpdate, Grid, GridBuilder, GridError};
pub use history::{EditHistory, DEFAULT_HISTORY_LIMIT};
pub use output::{render, ColorInfo, ExportOptions, ExportScale, RenderError, RenderedGrid};
pub use palette::{Palette, PaletteError, ParseColorError};
pub use protocol::{
    execute, ConversionPayload, ConversionRequest, ConversionResponse, ConversionResult,
    RequestId, RequestKind,
};
pub use quantize::{Quantized, Quantizer};
pub use resample::{aspect_fit, resample, Resampler, SourceImage};
pub use session::{
    BrushTool, Completion, EditorMode, EditorSession, Preferences, SessionError,
};
