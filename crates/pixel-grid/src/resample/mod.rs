//! Aspect-preserving resampling of a source image onto the target grid.
//!
//! The source is fitted into the `width x height` cell box (see
//! [`aspect_fit`]) and centered. Every cell inside the fitted region takes
//! the mean color of the source pixels whose centers fall in the rectangle it
//! covers. When a cell covers no whole pixel, or the source is smaller than
//! the fitted region along an axis, the pixel nearest to the cell center is
//! used instead.
//!
//! Cells outside the fitted region (letterbox bars) are filled with the
//! resampler's background, [`Color::TRANSPARENT`] by default. The quantizer
//! ignores alpha, so those cells are matched as black.

mod fit;
mod source;

pub use fit::{aspect_fit, FitRect};
pub use source::SourceImage;

use crate::color::Color;

/// Box-filter resampler with nearest-pixel fallback.
///
/// # Example
///
/// ```
/// use pixel_grid::{Color, Resampler, SourceImage};
///
/// let red = Color::rgba(255, 0, 0, 255);
/// let image = SourceImage::filled(4, 4, red).unwrap();
/// let cells = Resampler::new().resample(&image, 2, 2);
/// assert_eq!(cells, vec![red; 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resampler {
    background: Color,
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Resampler {
    /// Resampler with a transparent black letterbox fill.
    pub fn new() -> Self {
        Self {
            background: Color::TRANSPARENT,
        }
    }

    /// Set the color used for cells outside the fitted region.
    #[inline]
    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Produce `width * height` cell colors in row-major order.
    ///
    /// Returns an empty vector when either target dimension is zero.
    pub fn resample(&self, image: &SourceImage, width: u32, height: u32) -> Vec<Color> {
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let rect = FitRect::centered(image.width(), image.height(), width, height);
        let src_w = image.width() as usize;
        let src_h = image.height() as usize;

        // Ranges only depend on one axis each
        let x_ranges: Vec<(usize, usize)> = (0..rect.width as usize)
            .map(|i| covered_range(i, src_w, rect.width as usize))
            .collect();
        let y_ranges: Vec<(usize, usize)> = (0..rect.height as usize)
            .map(|i| covered_range(i, src_h, rect.height as usize))
            .collect();

        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for cy in 0..height {
            for cx in 0..width {
                if !rect.contains(cx, cy) {
                    cells.push(self.background);
                    continue;
                }
                let xr = x_ranges[(cx - rect.x) as usize];
                let yr = y_ranges[(cy - rect.y) as usize];
                cells.push(average(image, xr, yr));
            }
        }
        cells
    }
}

/// Resample with the default [`Resampler`].
pub fn resample(image: &SourceImage, width: u32, height: u32) -> Vec<Color> {
    Resampler::new().resample(image, width, height)
}

/// Source pixel range `[start, end)` for fitted cell `i` along one axis.
///
/// Cell `i` covers `[i * src / fit, (i + 1) * src / fit)`; a pixel belongs to
/// it when its center `p + 0.5` lies in that span. Everything is scaled by
/// `2 * fit` so the test stays in integers.
fn covered_range(i: usize, src: usize, fit: usize) -> (usize, usize) {
    let nearest = || {
        let p = ((2 * i + 1) * src / (2 * fit)).min(src - 1);
        (p, p + 1)
    };

    if src < fit {
        return nearest();
    }

    let lo = (2 * i * src).saturating_sub(fit);
    let hi = (2 * (i + 1) * src).saturating_sub(fit);
    let start = lo.div_ceil(2 * fit);
    let end = hi.div_ceil(2 * fit).min(src);
    if start < end {
        (start, end)
    } else {
        nearest()
    }
}

fn average(image: &SourceImage, (x0, x1): (usize, usize), (y0, y1): (usize, usize)) -> Color {
    let mut sum = [0u64; 4];
    for y in y0..y1 {
        for x in x0..x1 {
            let p = image.pixel(x, y);
            for c in 0..4 {
                sum[c] += p[c] as u64;
            }
        }
    }
    let count = ((x1 - x0) * (y1 - y0)) as u64;
    let mean = |s: u64| ((s + count / 2) / count) as u8;
    Color::rgba(mean(sum[0]), mean(sum[1]), mean(sum[2]), mean(sum[3]))
}
