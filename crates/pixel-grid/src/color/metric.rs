//! Color distance and nearest-palette lookup.
//!
//! All matching in the pipeline goes through these two functions so that
//! palette construction, plain assignment and dithering agree on what
//! "nearest" means.

use super::Color;

/// Squared Euclidean distance over (r, g, b). Alpha is ignored.
#[inline]
pub fn distance_sq(a: Color, b: Color) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Euclidean distance over (r, g, b). Alpha is ignored.
///
/// Always non-negative, symmetric, and zero iff the RGB channels match.
///
/// # Example
/// ```
/// use pixel_grid::{distance, Color};
/// assert_eq!(distance(Color::rgb(0, 0, 0), Color::rgb(3, 4, 0)), 5.0);
/// ```
#[inline]
pub fn distance(a: Color, b: Color) -> f64 {
    (distance_sq(a, b) as f64).sqrt()
}

/// Index of the palette entry closest to `target`.
///
/// Ties resolve to the lowest index: an entry only replaces the current best
/// when it is strictly closer. An empty palette yields 0.
///
/// Comparison uses the exact integer squared distance, so equidistant
/// entries are detected without floating point noise.
pub fn nearest_index(target: Color, palette: &[Color]) -> usize {
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, &candidate) in palette.iter().enumerate() {
        let dist = distance_sq(target, candidate);
        if dist < best_dist {
            best_dist = dist;
            best = i;
            if dist == 0 {
                break;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_equal_rgb() {
        let a = Color::rgb(12, 34, 56);
        assert_eq!(distance(a, a), 0.0);
        // Alpha is ignored
        assert_eq!(distance(a, Color::rgba(12, 34, 56, 0)), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Color::rgb(255, 0, 10);
        let b = Color::rgb(3, 200, 99);
        assert_eq!(distance(a, b), distance(b, a));
        assert!(distance(a, b) > 0.0);
    }

    #[test]
    fn test_nearest_exact_match() {
        let palette = [
            Color::rgb(0, 0, 0),
            Color::rgb(255, 255, 255),
            Color::rgb(255, 0, 0),
        ];
        assert_eq!(nearest_index(Color::rgb(250, 5, 5), &palette), 2);
        assert_eq!(nearest_index(Color::rgb(255, 255, 255), &palette), 1);
    }

    #[test]
    fn test_nearest_tie_prefers_lowest_index() {
        // 100 is exactly between 50 and 150
        let palette = [
            Color::rgb(0, 0, 0),
            Color::rgb(150, 0, 0),
            Color::rgb(50, 0, 0),
        ];
        assert_eq!(nearest_index(Color::rgb(100, 0, 0), &palette), 1);

        let palette = [Color::rgb(50, 0, 0), Color::rgb(150, 0, 0)];
        assert_eq!(nearest_index(Color::rgb(100, 0, 0), &palette), 0);
    }

    #[test]
    fn test_nearest_tie_with_duplicate_entries() {
        let c = Color::rgb(9, 9, 9);
        assert_eq!(nearest_index(c, &[Color::BLACK, c, c]), 1);
    }

    #[test]
    fn test_nearest_empty_palette() {
        assert_eq!(nearest_index(Color::BLACK, &[]), 0);
    }
}
