//! Unified error type for the pixel-grid public API.
//!
//! [`ConvertError`] wraps all error types from the crate into a single enum
//! for convenient `?` propagation in application code.

use std::fmt;

use super::config::ConfigError;
use crate::grid::GridError;
use crate::palette::{PaletteError, ParseColorError};

/// Unified error type for the conversion pipeline.
///
/// Validation failures ([`InvalidFormat`](Self::InvalidFormat),
/// [`UnsupportedConfig`](Self::UnsupportedConfig),
/// [`SourceUnavailable`](Self::SourceUnavailable)) are caused by caller
/// input. [`ShapeMismatch`](Self::ShapeMismatch) means an internal invariant
/// broke and the conversion must be abandoned.
///
/// # Example
///
/// ```
/// use pixel_grid::{Config, ConvertError};
///
/// fn check(config: Config) -> Result<(), ConvertError> {
///     config.validate()?;
///     Ok(())
/// }
///
/// assert!(matches!(
///     check(Config::new(0, 4, 4)),
///     Err(ConvertError::UnsupportedConfig(_))
/// ));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Malformed hex or color string
    InvalidFormat(ParseColorError),
    /// Width, height or color count out of range
    UnsupportedConfig(ConfigError),
    /// Index count does not match `width * height`
    ShapeMismatch {
        /// Expected number of cells
        expected: usize,
        /// Number actually supplied
        actual: usize,
    },
    /// Source buffer missing, empty or inconsistent with its dimensions
    SourceUnavailable(String),
    /// Any other pipeline failure, including a crashed worker
    ConversionFailed(String),
}

impl ConvertError {
    /// True for errors caused by caller input rather than a broken invariant.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConvertError::InvalidFormat(_)
                | ConvertError::UnsupportedConfig(_)
                | ConvertError::SourceUnavailable(_)
        )
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InvalidFormat(err) => write!(f, "invalid format: {}", err),
            ConvertError::UnsupportedConfig(err) => write!(f, "unsupported config: {}", err),
            ConvertError::ShapeMismatch { expected, actual } => write!(
                f,
                "shape mismatch: expected {} cells, got {}",
                expected, actual
            ),
            ConvertError::SourceUnavailable(msg) => write!(f, "source unavailable: {}", msg),
            ConvertError::ConversionFailed(msg) => write!(f, "conversion failed: {}", msg),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::InvalidFormat(err) => Some(err),
            ConvertError::UnsupportedConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseColorError> for ConvertError {
    fn from(err: ParseColorError) -> Self {
        ConvertError::InvalidFormat(err)
    }
}

impl From<ConfigError> for ConvertError {
    fn from(err: ConfigError) -> Self {
        ConvertError::UnsupportedConfig(err)
    }
}

impl From<PaletteError> for ConvertError {
    fn from(err: PaletteError) -> Self {
        match err {
            PaletteError::ParseColor(err) => ConvertError::InvalidFormat(err),
            other => ConvertError::ConversionFailed(other.to_string()),
        }
    }
}

impl From<GridError> for ConvertError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::ShapeMismatch { expected, actual } => {
                ConvertError::ShapeMismatch { expected, actual }
            }
            other => ConvertError::ConversionFailed(other.to_string()),
        }
    }
}
