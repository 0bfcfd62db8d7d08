//! Public API for the pixel-grid crate.
//!
//! This module provides the high-level API: the [`PixelArtConverter`]
//! builder, the validated [`Config`] and the [`ConvertError`] unified error
//! type.

mod builder;
mod config;
mod error;

pub use builder::{convert, PixelArtConverter};
pub use config::{Config, ConfigError, COLOR_COUNT_RANGE, DIMENSION_RANGE};
pub use error::ConvertError;
