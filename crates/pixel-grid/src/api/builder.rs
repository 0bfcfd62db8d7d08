//! PixelArtConverter -- the primary entry point for running the pipeline.
//!
//! [`PixelArtConverter`] composes Resampler, Quantizer and GridBuilder
//! behind one validated [`Config`].

use super::config::Config;
use super::error::ConvertError;
use crate::color::Color;
use crate::grid::{Grid, GridBuilder};
use crate::quantize::{Quantized, Quantizer};
use crate::resample::{Resampler, SourceImage};

/// Image to pixel-grid converter.
///
/// - Constructor takes the [`Config`]; it is validated by every operation
/// - Configuration methods consume and return `self`
/// - Operations take `&self` so one converter can process many images
///
/// # Example
///
/// ```
/// use pixel_grid::{Color, Config, PixelArtConverter, SourceImage};
///
/// let image = SourceImage::filled(8, 4, Color::rgba(0, 128, 255, 255)).unwrap();
/// let grid = PixelArtConverter::new(Config::new(4, 4, 8)).convert(&image).unwrap();
///
/// assert_eq!(grid.width(), 4);
/// assert_eq!(grid.cells().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PixelArtConverter {
    config: Config,
    resampler: Resampler,
    max_iterations: usize,
    serpentine: bool,
}

impl PixelArtConverter {
    /// Converter for `config`.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            resampler: Resampler::new(),
            max_iterations: Quantizer::DEFAULT_MAX_ITERATIONS,
            serpentine: true,
        }
    }

    /// Letterbox fill for cells outside the fitted image.
    #[inline]
    pub fn background(mut self, color: Color) -> Self {
        self.resampler = self.resampler.background(color);
        self
    }

    /// Cap k-means rounds.
    #[inline]
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Serpentine scanning while dithering (default on).
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    /// The config this converter runs with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn quantizer(&self) -> Quantizer {
        Quantizer::new(self.config.color_count as usize)
            .dithering(self.config.dithering)
            .serpentine(self.serpentine)
            .max_iterations(self.max_iterations)
    }

    /// Resample to one color per cell, row-major.
    pub fn resample(&self, image: &SourceImage) -> Result<Vec<Color>, ConvertError> {
        self.config.validate()?;
        Ok(self
            .resampler
            .resample(image, self.config.width, self.config.height))
    }

    /// Resample to an RGBA image of `width x height` pixels.
    pub fn resample_image(&self, image: &SourceImage) -> Result<SourceImage, ConvertError> {
        let cells = self.resample(image)?;
        SourceImage::from_colors(self.config.width, self.config.height, &cells)
    }

    /// Resample and quantize.
    pub fn quantize(&self, image: &SourceImage) -> Result<Quantized, ConvertError> {
        let cells = self.resample(image)?;
        self.quantizer().quantize(
            &cells,
            self.config.width as usize,
            self.config.height as usize,
        )
    }

    /// Run the whole pipeline.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::UnsupportedConfig`] for an out-of-range config
    /// - [`ConvertError::ShapeMismatch`] if stages disagree on the cell count
    pub fn convert(&self, image: &SourceImage) -> Result<Grid, ConvertError> {
        let Quantized { palette, indices } = self.quantize(image)?;
        let grid = GridBuilder::new(self.config.width, self.config.height, palette).build(&indices)?;
        Ok(grid)
    }
}

/// Convert `image` with `config` using default converter settings.
pub fn convert(image: &SourceImage, config: Config) -> Result<Grid, ConvertError> {
    PixelArtConverter::new(config).convert(image)
}
