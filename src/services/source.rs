//! Upload validation and decoding into [`SourceImage`].

use base64::Engine;
use image::ImageFormat;
use pixel_grid::SourceImage;
use thiserror::Error;

use crate::models::{UploadConfig, UploadFormat};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("empty upload")]
    Empty,

    #[error("upload exceeds the {max} byte limit")]
    TooLarge { max: usize },

    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("format {0} is not accepted")]
    UnsupportedFormat(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("invalid image: {0}")]
    Image(String),
}

/// A decoded upload.
#[derive(Debug, Clone)]
pub struct DecodedSource {
    pub image: SourceImage,
    pub format: UploadFormat,
}

/// Validates uploads against the configured size and format limits.
#[derive(Debug, Clone)]
pub struct SourceDecoder {
    max_bytes: usize,
    formats: Vec<UploadFormat>,
}

impl SourceDecoder {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            max_bytes: config.max_bytes,
            formats: config.formats.clone(),
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check size and sniff the format without decoding.
    pub fn detect(&self, bytes: &[u8]) -> Result<UploadFormat, SourceError> {
        if bytes.is_empty() {
            return Err(SourceError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(SourceError::TooLarge {
                max: self.max_bytes,
            });
        }

        let format = match image::guess_format(bytes).map_err(|_| SourceError::UnknownFormat)? {
            ImageFormat::Jpeg => UploadFormat::Jpeg,
            ImageFormat::Png => UploadFormat::Png,
            ImageFormat::WebP => UploadFormat::Webp,
            other => return Err(SourceError::UnsupportedFormat(format!("{other:?}").to_lowercase())),
        };

        if !self.formats.contains(&format) {
            return Err(SourceError::UnsupportedFormat(format.to_string()));
        }
        Ok(format)
    }

    /// Validate and decode an upload to RGBA8.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedSource, SourceError> {
        let format = self.detect(bytes)?;

        let decoded = image::load_from_memory_with_format(bytes, image_format(format))
            .map_err(|e| SourceError::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();

        tracing::debug!(%format, width, height, bytes = bytes.len(), "Decoded upload");

        let image = SourceImage::new(width, height, decoded.into_raw())
            .map_err(|e| SourceError::Image(e.to_string()))?;
        Ok(DecodedSource { image, format })
    }

    /// [`decode`](Self::decode) on the blocking thread pool.
    pub async fn decode_blocking<B>(&self, bytes: B) -> Result<DecodedSource, SourceError>
    where
        B: AsRef<[u8]> + Send + 'static,
    {
        let decoder = self.clone();
        tokio::task::spawn_blocking(move || decoder.decode(bytes.as_ref()))
            .await
            .map_err(|e| SourceError::Decode(format!("decoder task failed: {e}")))?
    }
}

fn image_format(format: UploadFormat) -> ImageFormat {
    match format {
        UploadFormat::Jpeg => ImageFormat::Jpeg,
        UploadFormat::Png => ImageFormat::Png,
        UploadFormat::Webp => ImageFormat::WebP,
    }
}

pub fn mime_type(format: UploadFormat) -> &'static str {
    match format {
        UploadFormat::Jpeg => "image/jpeg",
        UploadFormat::Png => "image/png",
        UploadFormat::Webp => "image/webp",
    }
}

/// `data:` URL of an encoded image.
pub fn data_url(format: UploadFormat, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type(format),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
