//! Indexed PNG encoding of grid exports.

use base64::Engine;
use pixel_grid::{render, ColorInfo, ExportOptions, Grid, RenderError, RenderedGrid};
use std::io::Cursor;
use thiserror::Error;

/// tEXt keyword carrying the palette as comma separated hex
pub const PALETTE_KEYWORD: &str = "knemo:palette";
/// tEXt keyword carrying per-index cell counts
pub const USAGE_KEYWORD: &str = "knemo:usage";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}

/// Encodes grids as palette PNGs
#[derive(Debug, Clone, Copy)]
pub struct PngExporter {
    optimize: bool,
}

impl PngExporter {
    /// `optimize` re-compresses with oxipng
    pub fn new(optimize: bool) -> Self {
        Self { optimize }
    }

    /// Render `grid` and encode it as PNG
    pub fn export(&self, grid: &Grid, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
        let rendered = render(grid, options)?;
        let info = options
            .include_color_info
            .then(|| ColorInfo::from_grid(grid));
        let png_bytes = encode_indexed(&rendered, info.as_ref())?;

        tracing::debug!(
            width = rendered.width(),
            height = rendered.height(),
            colors = rendered.palette().len(),
            bytes = png_bytes.len(),
            "Encoded export"
        );

        if !self.optimize {
            return Ok(png_bytes);
        }

        // Re-compress with oxipng (zopfli + adaptive filter selection)
        let strip = if info.is_some() {
            oxipng::StripChunks::None
        } else {
            oxipng::StripChunks::Safe
        };
        let optimized = oxipng::optimize_from_memory(
            &png_bytes,
            &oxipng::Options {
                strip,
                optimize_alpha: false,
                ..Default::default()
            },
        )
        .unwrap_or(png_bytes);
        Ok(optimized)
    }

    /// 1x export as a `data:image/png` URL
    pub fn thumbnail(&self, grid: &Grid) -> Result<String, ExportError> {
        let png_bytes = self.export(grid, &ExportOptions::default())?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png_bytes)
        ))
    }
}

/// Smallest PNG bit depth that can index `colors` palette entries.
fn bit_depth_for(colors: usize) -> (png::BitDepth, u8) {
    match colors {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    }
}

fn encode_indexed(image: &RenderedGrid, info: Option<&ColorInfo>) -> Result<Vec<u8>, ExportError> {
    let plte: Vec<u8> = image.palette().iter().flat_map(|c| c.to_bytes()).collect();
    let (bit_depth, bits) = bit_depth_for(image.palette().len());
    let packed = if bits < 8 {
        pack_nbits(image.indices(), image.width(), bits)
    } else {
        image.indices().to_vec()
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(bit_depth);
        encoder.set_palette(plte);
        if let Some(info) = info {
            encoder
                .add_text_chunk(PALETTE_KEYWORD.to_string(), info.palette_csv())
                .map_err(|e| ExportError::PngEncode(e.to_string()))?;
            encoder
                .add_text_chunk(USAGE_KEYWORD.to_string(), info.usage_csv())
                .map_err(|e| ExportError::PngEncode(e.to_string()))?;
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&packed)
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / width as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
