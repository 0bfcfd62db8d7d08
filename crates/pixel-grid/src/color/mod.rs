//! Color type and color-distance primitives.
//!
//! - [`Color`]: 8-bit RGB with optional alpha, hex and `rgb()` string forms
//! - [`distance`] / [`nearest_index`]: Euclidean RGB metric with a
//!   lowest-index tie-break

mod metric;
mod rgb;

pub use metric::{distance, distance_sq, nearest_index};
pub use rgb::Color;
