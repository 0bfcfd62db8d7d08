//! Ordered color palette with nearest-color matching.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PaletteError;
use crate::color::{nearest_index, Color};

/// An ordered, non-empty list of distinct colors.
///
/// A cell's color index points into this list, so the order is part of the
/// palette's identity. Alpha is stripped on construction; two entries are
/// duplicates when their RGB channels match.
///
/// Serializes as an array of colors; deserializing re-runs validation.
///
/// # Example
///
/// ```
/// use pixel_grid::{Color, Palette};
///
/// let palette = Palette::new(&[Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.find_nearest(Color::rgb(200, 200, 200)), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Create a palette from colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `colors` is empty
    /// - [`PaletteError::DuplicateColor`] if an RGB value repeats
    pub fn new(colors: &[Color]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }

        let mut seen = HashSet::with_capacity(colors.len());
        for (i, c) in colors.iter().enumerate() {
            if !seen.insert(c.to_bytes()) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        Ok(Self {
            colors: colors.iter().map(|c| c.opaque()).collect(),
        })
    }

    /// Build a palette from colors that may repeat, keeping first occurrences.
    ///
    /// Only fails when `colors` is empty.
    pub fn dedup_from(colors: &[Color]) -> Result<Self, PaletteError> {
        let mut seen = HashSet::with_capacity(colors.len());
        let unique: Vec<Color> = colors
            .iter()
            .map(|c| c.opaque())
            .filter(|c| seen.insert(c.to_bytes()))
            .collect();
        Self::new(&unique)
    }

    /// Parse a palette from hex strings such as `["#000000", "#ffffff"]`.
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .map(|s| Color::from_str(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&colors)
    }

    /// Number of colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; a palette holds at least one color.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, if in range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// All colors in order.
    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Index of the closest color (Euclidean RGB, lowest index on ties).
    #[inline]
    pub fn find_nearest(&self, color: Color) -> usize {
        nearest_index(color, &self.colors)
    }

    /// Colors as lowercase `#rrggbb` strings.
    pub fn to_hex(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = PaletteError;

    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        Palette::new(&colors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}
