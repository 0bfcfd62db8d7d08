//! Conversion configuration and its validation.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Allowed grid width and height.
pub const DIMENSION_RANGE: RangeInclusive<u32> = 1..=500;

/// Allowed palette budget.
pub const COLOR_COUNT_RANGE: RangeInclusive<u32> = 2..=14;

/// Target grid shape and palette budget for one conversion.
///
/// Serialized with camelCase keys (`colorCount`) to match the wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Grid width in cells, 1..=500
    pub width: u32,
    /// Grid height in cells, 1..=500
    pub height: u32,
    /// Maximum palette size, 2..=14
    pub color_count: u32,
    /// Apply serpentine Floyd-Steinberg error diffusion
    #[serde(default)]
    pub dithering: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            color_count: 8,
            dithering: false,
        }
    }
}

impl Config {
    /// Create a config without dithering.
    pub fn new(width: u32, height: u32, color_count: u32) -> Self {
        Self {
            width,
            height,
            color_count,
            dithering: false,
        }
    }

    /// Set dithering.
    #[inline]
    pub fn dithering(mut self, enabled: bool) -> Self {
        self.dithering = enabled;
        self
    }

    /// Check every field against its declared range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !DIMENSION_RANGE.contains(&self.width) {
            return Err(ConfigError::Width(self.width));
        }
        if !DIMENSION_RANGE.contains(&self.height) {
            return Err(ConfigError::Height(self.height));
        }
        if !COLOR_COUNT_RANGE.contains(&self.color_count) {
            return Err(ConfigError::ColorCount(self.color_count));
        }
        Ok(())
    }

    /// Number of cells the grid will hold.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A [`Config`] field outside its allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Width outside 1..=500
    Width(u32),
    /// Height outside 1..=500
    Height(u32),
    /// Color count outside 2..=14
    ColorCount(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Width(w) => write!(
                f,
                "width {} out of range ({}..={})",
                w,
                DIMENSION_RANGE.start(),
                DIMENSION_RANGE.end()
            ),
            ConfigError::Height(h) => write!(
                f,
                "height {} out of range ({}..={})",
                h,
                DIMENSION_RANGE.start(),
                DIMENSION_RANGE.end()
            ),
            ConfigError::ColorCount(n) => write!(
                f,
                "color count {} out of range ({}..={})",
                n,
                COLOR_COUNT_RANGE.start(),
                COLOR_COUNT_RANGE.end()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(Config::new(1, 1, 2).validate().is_ok());
        assert!(Config::new(500, 500, 14).validate().is_ok());
    }

    #[test]
    fn test_out_of_range_fields() {
        assert_eq!(Config::new(0, 10, 4).validate(), Err(ConfigError::Width(0)));
        assert_eq!(
            Config::new(10, 501, 4).validate(),
            Err(ConfigError::Height(501))
        );
        assert_eq!(
            Config::new(10, 10, 1).validate(),
            Err(ConfigError::ColorCount(1))
        );
        assert_eq!(
            Config::new(10, 10, 15).validate(),
            Err(ConfigError::ColorCount(15))
        );
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            ConfigError::ColorCount(20).to_string(),
            "color count 20 out of range (2..=14)"
        );
    }

    #[test]
    fn test_serde_camel_case() {
        let config: Config =
            serde_json::from_str(r#"{"width":16,"height":8,"colorCount":4}"#).unwrap();
        assert_eq!(config, Config::new(16, 8, 4));
        let json = serde_json::to_string(&config.dithering(true)).unwrap();
        assert_eq!(
            json,
            r#"{"width":16,"height":8,"colorCount":4,"dithering":true}"#
        );
    }
}
