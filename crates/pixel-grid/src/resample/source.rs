//! Raw RGBA pixel buffer handed to the pipeline.

use serde::{Deserialize, Serialize};

use crate::api::ConvertError;
use crate::color::Color;

/// Wire shape of [`SourceImage`] before validation.
#[derive(Deserialize)]
struct RawImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// An RGBA8 pixel buffer in row-major order.
///
/// Construction guarantees non-zero dimensions and
/// `data.len() == 4 * width * height`, including when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawImage")]
pub struct SourceImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl SourceImage {
    /// Wrap an RGBA8 buffer.
    ///
    /// # Errors
    ///
    /// [`ConvertError::SourceUnavailable`] if a dimension is zero or the
    /// buffer length does not match the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ConvertError> {
        if width == 0 || height == 0 {
            return Err(ConvertError::SourceUnavailable(format!(
                "image has zero dimension ({}x{})",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ConvertError::SourceUnavailable(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build an image from colors in row-major order. Missing alpha becomes 255.
    pub fn from_colors(width: u32, height: u32, colors: &[Color]) -> Result<Self, ConvertError> {
        let data = colors
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, c.a.unwrap_or(255)])
            .collect();
        Self::new(width, height, data)
    }

    /// A single-color image.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, ConvertError> {
        let colors = vec![color; width as usize * height as usize];
        Self::from_colors(width, height, &colors)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)` with its alpha. Caller guarantees bounds.
    #[inline]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width as usize + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Consume into the raw RGBA bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl TryFrom<RawImage> for SourceImage {
    type Error = ConvertError;

    fn try_from(raw: RawImage) -> Result<Self, Self::Error> {
        SourceImage::new(raw.width, raw.height, raw.data)
    }
}
