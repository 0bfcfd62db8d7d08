//! Color string and palette errors.

use std::fmt;

/// Why a color string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    /// Not 6 or 8 digits once `#` is stripped
    InvalidLength,
    /// A character outside `0-9a-fA-F`
    InvalidHex(char),
    /// Malformed `rgb(r, g, b)`: wrong arity, a non-digit or a channel over 255
    InvalidRgb(String),
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "hex color must have 6 or 8 digits")
            }
            ParseColorError::InvalidHex(c) => write!(f, "{:?} is not a hex digit", c),
            ParseColorError::InvalidRgb(s) => write!(f, "malformed rgb() color {:?}", s),
        }
    }
}

impl std::error::Error for ParseColorError {}

/// Why a set of colors is not a usable palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// A palette needs at least one color
    EmptyPalette,
    /// Same RGB value seen earlier in the list
    DuplicateColor {
        /// Position of the second occurrence
        index: usize,
    },
    /// One of the color strings did not parse
    ParseColor(ParseColorError),
}

impl From<ParseColorError> for PaletteError {
    fn from(err: ParseColorError) -> Self {
        PaletteError::ParseColor(err)
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => write!(f, "palette cannot be empty"),
            PaletteError::DuplicateColor { index } => {
                write!(f, "duplicate color found at index {}", index)
            }
            PaletteError::ParseColor(err) => write!(f, "invalid color: {}", err),
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(PaletteError::EmptyPalette.to_string(), "palette cannot be empty");
        assert_eq!(
            PaletteError::DuplicateColor { index: 3 }.to_string(),
            "duplicate color found at index 3"
        );
        assert_eq!(
            PaletteError::from(ParseColorError::InvalidLength).to_string(),
            "invalid color: hex color must have 6 or 8 digits"
        );
        assert_eq!(
            ParseColorError::InvalidHex('+').to_string(),
            "'+' is not a hex digit"
        );
        assert_eq!(
            ParseColorError::InvalidRgb("rgb(1, 2)".into()).to_string(),
            "malformed rgb() color \"rgb(1, 2)\""
        );
    }
}
