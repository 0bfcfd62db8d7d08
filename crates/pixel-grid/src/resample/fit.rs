//! Aspect-ratio fitting of a source image into a target cell box.

/// Largest size with the source's aspect ratio that fits inside the box.
///
/// Width-constrained first: `fit_w = box_w`, `fit_h = box_w / ratio`; if that
/// overflows the box height, the height is pinned instead. Both sides are
/// rounded half away from zero and kept within `1..=box`.
///
/// ```
/// use pixel_grid::aspect_fit;
/// assert_eq!(aspect_fit(200, 100, 50, 50), (50, 25));
/// assert_eq!(aspect_fit(100, 200, 50, 50), (25, 50));
/// ```
pub fn aspect_fit(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    if src_w == 0 || src_h == 0 || box_w == 0 || box_h == 0 {
        return (box_w, box_h);
    }

    let ratio = src_w as f64 / src_h as f64;
    let mut fit_w = box_w as f64;
    let mut fit_h = fit_w / ratio;
    if fit_h > box_h as f64 {
        fit_h = box_h as f64;
        fit_w = fit_h * ratio;
    }

    let w = (fit_w.round() as u32).clamp(1, box_w);
    let h = (fit_h.round() as u32).clamp(1, box_h);
    (w, h)
}

/// Placement of the fitted region inside the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitRect {
    /// Left offset of the fitted region in cells
    pub x: u32,
    /// Top offset of the fitted region in cells
    pub y: u32,
    /// Fitted width in cells
    pub width: u32,
    /// Fitted height in cells
    pub height: u32,
}

impl FitRect {
    /// Fit `src` into `box` and center the result (offsets round down).
    pub fn centered(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> Self {
        let (width, height) = aspect_fit(src_w, src_h, box_w, box_h);
        Self {
            x: (box_w - width) / 2,
            y: (box_h - height) / 2,
            width,
            height,
        }
    }

    /// Whether target cell `(cx, cy)` lies inside the fitted region.
    #[inline]
    pub fn contains(&self, cx: u32, cy: u32) -> bool {
        cx >= self.x && cx < self.x + self.width && cy >= self.y && cy < self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_constrained() {
        assert_eq!(aspect_fit(200, 100, 50, 50), (50, 25));
    }

    #[test]
    fn test_height_constrained() {
        assert_eq!(aspect_fit(100, 400, 40, 40), (10, 40));
    }

    #[test]
    fn test_same_ratio_fills_box() {
        assert_eq!(aspect_fit(640, 480, 32, 24), (32, 24));
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        // 10 / 4.0 = 2.5 -> 3
        assert_eq!(aspect_fit(400, 100, 10, 10), (10, 3));
    }

    #[test]
    fn test_extreme_ratio_keeps_one_cell() {
        assert_eq!(aspect_fit(10_000, 1, 10, 10), (10, 1));
        assert_eq!(aspect_fit(1, 10_000, 10, 10), (1, 10));
    }

    #[test]
    fn test_centered_offsets() {
        let rect = FitRect::centered(200, 100, 50, 50);
        assert_eq!(
            rect,
            FitRect {
                x: 0,
                y: 12,
                width: 50,
                height: 25
            }
        );
        assert!(rect.contains(0, 12));
        assert!(!rect.contains(0, 11));
        assert!(!rect.contains(0, 37));
    }
}
