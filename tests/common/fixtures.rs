//! Image fixtures for integration tests.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub const RED: [u8; 4] = [220, 30, 30, 255];
pub const BLUE: [u8; 4] = [30, 30, 220, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Encode an image built pixel by pixel
pub fn encode_with<F>(width: u32, height: u32, format: ImageFormat, pixel: F) -> Vec<u8>
where
    F: Fn(u32, u32) -> [u8; 4],
{
    let img = RgbaImage::from_fn(width, height, |x, y| Rgba(pixel(x, y)));
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
        _ => DynamicImage::ImageRgba8(img),
    };
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("Failed to encode fixture");
    buf
}

/// Single-color PNG
pub fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    encode_with(width, height, ImageFormat::Png, |_, _| color)
}

/// PNG with a red left half and a blue right half
pub fn split_png(width: u32, height: u32) -> Vec<u8> {
    encode_with(width, height, ImageFormat::Png, |x, _| {
        if x < width / 2 {
            RED
        } else {
            BLUE
        }
    })
}

/// Black and white checkerboard with square tiles
pub fn checker_png(width: u32, height: u32, tile: u32) -> Vec<u8> {
    encode_with(width, height, ImageFormat::Png, |x, y| {
        if (x / tile + y / tile) % 2 == 0 {
            BLACK
        } else {
            WHITE
        }
    })
}

/// Horizontal grayscale gradient
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    encode_with(width, height, ImageFormat::Png, |x, _| {
        let v = (x * 255 / width.saturating_sub(1).max(1)) as u8;
        [v, v, v, 255]
    })
}

/// Single-color JPEG
pub fn solid_jpeg(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    encode_with(width, height, ImageFormat::Jpeg, |_, _| color)
}

/// A GIF, which the server does not accept
pub fn gif_bytes() -> Vec<u8> {
    let mut bytes = b"GIF89a".to_vec();
    bytes.extend_from_slice(&[1, 0, 1, 0, 0, 0, 0, b';']);
    bytes
}

/// Decode a PNG response to RGBA8
pub fn decode_png(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .expect("Failed to decode PNG")
        .to_rgba8()
}

/// Pseudo-random pixels; compresses poorly, for size limit tests
pub fn noise_png(width: u32, height: u32) -> Vec<u8> {
    encode_with(width, height, ImageFormat::Png, |x, y| {
        let mut h = x.wrapping_mul(0x9E37_79B9) ^ y.wrapping_mul(0x85EB_CA6B);
        h ^= h >> 15;
        h = h.wrapping_mul(0x2C1B_3C6D);
        h ^= h >> 12;
        let [r, g, b, _] = h.to_le_bytes();
        [r, g, b, 255]
    })
}
