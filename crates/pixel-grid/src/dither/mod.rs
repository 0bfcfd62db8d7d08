//! Error diffusion dithering over grid cells.
//!
//! Cells are visited in raster order. With serpentine scanning, odd rows run
//! right-to-left and the kernel's horizontal offsets are mirrored, so error
//! always flows to cells that have not been visited yet. The visiting order
//! is part of the output: the same input always yields the same indices.

mod kernel;

pub use kernel::{Kernel, FLOYD_STEINBERG};

use crate::color::Color;
use crate::palette::Palette;

/// Row-based error accumulation buffer.
///
/// Holds `max_dy + 1` rows of per-channel error; the first row is the row
/// being processed.
pub struct ErrorBuffer {
    /// Error rows: rows[0] is current row, rows[1] is next, etc.
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// Create a buffer for rows of `width` cells, `row_depth` rows deep.
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Error accumulated so far for cell `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a future cell. Out-of-bounds targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for (acc, e) in self.rows[row_offset][x].iter_mut().zip(error) {
                *acc += e;
            }
        }
    }

    /// Rotate to the next row, clearing the row that falls off the front.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Dither `colors` (row-major, `width * height`) to palette indices.
///
/// For each cell the accumulated error is added to its color, the channels
/// are clamped to `0..=255`, and the rounded result is matched with
/// [`Palette::find_nearest`]. The difference between the clamped working
/// color and the chosen palette color is spread over the kernel.
///
/// Alpha is ignored.
pub fn dither_with_kernel(
    colors: &[Color],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
    serpentine: bool,
) -> Vec<usize> {
    let mut output = vec![0usize; width * height];
    if width == 0 || height == 0 || colors.len() < width * height {
        return output;
    }

    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        let reverse = serpentine && y % 2 == 1;

        let x_range: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..width).rev())
        } else {
            Box::new(0..width)
        };

        for x in x_range {
            let idx = y * width + x;

            let accumulated = error_buf.get_accumulated(x);
            let original = colors[idx].to_f32();
            let working = [
                (original[0] + accumulated[0]).clamp(0.0, 255.0),
                (original[1] + accumulated[1]).clamp(0.0, 255.0),
                (original[2] + accumulated[2]).clamp(0.0, 255.0),
            ];

            let chosen = palette.find_nearest(Color::from_f32(working));
            output[idx] = chosen;

            let target = palette.get(chosen).unwrap_or(Color::BLACK).to_f32();
            let error = [
                working[0] - target[0],
                working[1] - target[1],
                working[2] - target[2],
            ];

            for &(dx, dy, weight) in kernel.entries {
                let effective_dx = if reverse { -dx } else { dx };
                let nx = x as i32 + effective_dx;
                if nx >= 0 && (nx as usize) < width && y + (dy as usize) < height {
                    let w = weight as f32 / divisor;
                    error_buf.add_error(
                        nx as usize,
                        dy as usize,
                        [error[0] * w, error[1] * w, error[2] * w],
                    );
                }
            }
        }

        error_buf.advance_row();
    }

    output
}

/// Serpentine Floyd-Steinberg dithering.
pub fn floyd_steinberg(
    colors: &[Color],
    width: usize,
    height: usize,
    palette: &Palette,
) -> Vec<usize> {
    dither_with_kernel(colors, width, height, palette, &FLOYD_STEINBERG, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw() -> Palette {
        Palette::new(&[Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]).unwrap()
    }

    fn grey(v: u8) -> Color {
        Color::rgb(v, v, v)
    }

    #[test]
    fn test_error_buffer_add_and_get() {
        let mut buf = ErrorBuffer::new(10, 2);
        buf.add_error(5, 0, [1.0, 2.0, 3.0]);
        buf.add_error(5, 0, [1.0, 1.0, 1.0]);
        assert_eq!(buf.get_accumulated(5), [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_error_buffer_advance_row() {
        let mut buf = ErrorBuffer::new(4, 2);
        buf.add_error(0, 0, [1.0, 0.0, 0.0]);
        buf.add_error(0, 1, [2.0, 0.0, 0.0]);
        buf.advance_row();
        assert_eq!(buf.get_accumulated(0), [2.0, 0.0, 0.0]);
        buf.advance_row();
        assert_eq!(buf.get_accumulated(0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_error_buffer_bounds_checking() {
        let mut buf = ErrorBuffer::new(3, 2);
        buf.add_error(3, 0, [1.0; 3]);
        buf.add_error(0, 2, [1.0; 3]);
        assert_eq!(buf.get_accumulated(0), [0.0; 3]);
    }

    #[test]
    fn test_exact_palette_colors_unchanged() {
        let colors = vec![grey(0), grey(255), grey(255), grey(0)];
        assert_eq!(floyd_steinberg(&colors, 2, 2, &bw()), vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_mid_grey_mixes_both_colors() {
        let colors = vec![grey(128); 64];
        let indices = floyd_steinberg(&colors, 8, 8, &bw());
        let white = indices.iter().filter(|&&i| i == 1).count();
        assert!(
            (24..=40).contains(&white),
            "expected roughly half white, got {}",
            white
        );
    }

    #[test]
    fn test_serpentine_mirrors_on_odd_rows() {
        // Row 0 is exact black and diffuses nothing. On row 1 the scan
        // starts at x=1, whose error pushes x=0 over to white.
        let colors = vec![grey(0), grey(0), grey(100), grey(120)];
        let serpentine =
            dither_with_kernel(&colors, 2, 2, &bw(), &FLOYD_STEINBERG, true);
        assert_eq!(serpentine, vec![0, 0, 1, 0]);

        let raster = dither_with_kernel(&colors, 2, 2, &bw(), &FLOYD_STEINBERG, false);
        assert_eq!(raster, vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_deterministic() {
        let colors: Vec<Color> = (0..100).map(|i| grey((i * 37 % 256) as u8)).collect();
        let a = floyd_steinberg(&colors, 10, 10, &bw());
        let b = floyd_steinberg(&colors, 10, 10, &bw());
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_input_returns_zeroes() {
        assert_eq!(floyd_steinberg(&[grey(255)], 2, 1, &bw()), vec![0, 0]);
    }
}
