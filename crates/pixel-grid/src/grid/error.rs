//! Error type for grid assembly and editing.

use std::fmt;

/// Error returned when building or editing a [`Grid`](super::Grid).
///
/// Edits that fail leave the grid untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Index count does not match `width * height`
    ShapeMismatch {
        /// Expected number of cells
        expected: usize,
        /// Number actually supplied
        actual: usize,
    },
    /// Coordinates outside the grid
    OutOfBounds {
        /// Column
        x: u32,
        /// Row
        y: u32,
    },
    /// Color index not present in the palette
    InvalidColorIndex {
        /// Offending index
        index: usize,
        /// Palette length
        palette_len: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::ShapeMismatch { expected, actual } => {
                write!(f, "expected {} cell indices, got {}", expected, actual)
            }
            GridError::OutOfBounds { x, y } => {
                write!(f, "cell ({}, {}) is outside the grid", x, y)
            }
            GridError::InvalidColorIndex { index, palette_len } => write!(
                f,
                "color index {} is invalid for a palette of {} colors",
                index, palette_len
            ),
        }
    }
}

impl std::error::Error for GridError {}
