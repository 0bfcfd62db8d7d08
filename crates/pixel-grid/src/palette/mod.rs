//! Palette types and utilities
//!
//! This module provides the ordered [`Palette`] used by quantization and
//! grids, together with error types for parsing and validation.

mod error;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use palette::Palette;
