//! Palette construction and palette-index assignment.
//!
//! [`Quantizer`] turns resampled cell colors into a [`Palette`] of at most
//! `color_count` entries and one palette index per cell. The palette comes
//! from weighted k-means over the distinct input colors; when there are no
//! more distinct colors than the budget, those colors are the palette as-is.
//! Palettes are ordered dark to light.

mod kmeans;

use serde::{Deserialize, Serialize};

use crate::api::ConvertError;
use crate::color::Color;
use crate::dither::{dither_with_kernel, FLOYD_STEINBERG};
use crate::palette::Palette;

use kmeans::{distinct_colors, kmeans};

/// Output of quantization: a palette and one index per input cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantized {
    /// Palette the indices point into
    pub palette: Palette,
    /// Palette index for each input cell, same order as the input
    pub indices: Vec<usize>,
}

/// Color quantizer with optional error diffusion.
///
/// Configuration methods consume and return `self`;
/// [`quantize()`](Self::quantize) takes `&self` so one quantizer can be
/// reused across inputs.
///
/// # Example
///
/// ```
/// use pixel_grid::{Color, Quantizer};
///
/// let cells = vec![Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)];
/// let result = Quantizer::new(8).quantize(&cells, 2, 1).unwrap();
/// assert_eq!(result.palette.len(), 2);
/// assert_eq!(result.indices, vec![0, 1]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    color_count: usize,
    dithering: bool,
    serpentine: bool,
    max_iterations: usize,
}

impl Quantizer {
    /// Iteration cap for k-means.
    pub const DEFAULT_MAX_ITERATIONS: usize = 20;

    /// Quantizer with a palette budget of `color_count` (at least 1).
    pub fn new(color_count: usize) -> Self {
        Self {
            color_count: color_count.max(1),
            dithering: false,
            serpentine: true,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Enable Floyd-Steinberg error diffusion for index assignment.
    #[inline]
    pub fn dithering(mut self, enabled: bool) -> Self {
        self.dithering = enabled;
        self
    }

    /// Alternate scan direction per row while dithering (default on).
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    /// Cap the number of k-means rounds.
    #[inline]
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Build the palette for `colors`.
    ///
    /// # Errors
    ///
    /// [`ConvertError::SourceUnavailable`] when `colors` is empty.
    pub fn build_palette(&self, colors: &[Color]) -> Result<Palette, ConvertError> {
        let samples = distinct_colors(colors);
        if samples.is_empty() {
            return Err(ConvertError::SourceUnavailable(
                "no colors to quantize".to_string(),
            ));
        }

        let mut entries: Vec<Color> = if samples.len() <= self.color_count {
            samples.iter().map(|s| s.color).collect()
        } else {
            kmeans(&samples, self.color_count, self.max_iterations)
        };
        entries.sort_by(|a, b| a.luminance().total_cmp(&b.luminance()));

        Ok(Palette::dedup_from(&entries)?)
    }

    /// Quantize `width * height` cell colors in row-major order.
    ///
    /// Without dithering every cell maps to its nearest palette entry.
    /// With dithering the assignment depends on scan order (see
    /// [`crate::dither`]).
    ///
    /// # Errors
    ///
    /// - [`ConvertError::ShapeMismatch`] if `colors.len() != width * height`
    /// - [`ConvertError::SourceUnavailable`] if there are no colors
    pub fn quantize(
        &self,
        colors: &[Color],
        width: usize,
        height: usize,
    ) -> Result<Quantized, ConvertError> {
        let expected = width * height;
        if colors.len() != expected {
            return Err(ConvertError::ShapeMismatch {
                expected,
                actual: colors.len(),
            });
        }

        let palette = self.build_palette(colors)?;

        let indices = if self.dithering {
            dither_with_kernel(
                colors,
                width,
                height,
                &palette,
                &FLOYD_STEINBERG,
                self.serpentine,
            )
        } else {
            colors.iter().map(|&c| palette.find_nearest(c)).collect()
        };

        Ok(Quantized { palette, indices })
    }
}
