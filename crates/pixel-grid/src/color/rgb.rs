//! 8-bit RGB(A) color type
//!
//! [`Color`] is the value stored in palettes and grid cells. It parses from
//! and formats to the canonical `#rrggbb` hex form and the `rgb(r, g, b)`
//! CSS form; [`FromStr`] accepts either.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::palette::ParseColorError;

/// A color with 8-bit red, green and blue channels and an optional alpha.
///
/// Alpha is carried for sampled source pixels but never takes part in
/// distance calculations and is not encoded by [`Color::to_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
    /// Optional alpha channel (0..=255)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<u8>,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Fully transparent black, the letterbox fill of the resampler.
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: Some(0),
    };

    /// Create an opaque color without an alpha channel.
    ///
    /// # Example
    /// ```
    /// use pixel_grid::Color;
    /// let red = Color::rgb(255, 0, 0);
    /// assert_eq!(red.a, None);
    /// ```
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    /// Create a color with an explicit alpha channel.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a: Some(a),
        }
    }

    /// Convert to a byte array [R, G, B], dropping alpha.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Round and clamp float channels (0.0..=255.0 scale) into a color.
    ///
    /// Rounding is half away from zero.
    #[inline]
    pub fn from_f32(channels: [f32; 3]) -> Self {
        Self::rgb(
            channels[0].clamp(0.0, 255.0).round() as u8,
            channels[1].clamp(0.0, 255.0).round() as u8,
            channels[2].clamp(0.0, 255.0).round() as u8,
        )
    }

    /// Channels as floats on the 0.0..=255.0 scale.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// The same color with the alpha channel removed.
    #[inline]
    pub const fn opaque(self) -> Self {
        Self::rgb(self.r, self.g, self.b)
    }

    /// Rec. 601 luma on the 0.0..=255.0 scale.
    #[inline]
    pub fn luminance(self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }

    /// Format as a lowercase `#rrggbb` string. Alpha is not encoded.
    ///
    /// # Example
    /// ```
    /// use pixel_grid::Color;
    /// assert_eq!(Color::rgb(255, 128, 0).to_hex(), "#ff8000");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Format as `rgb(r, g, b)`.
    pub fn to_rgb_string(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, ParseColorError> {
        let s = s.trim();
        let digits = s.strip_prefix('#').unwrap_or(s);

        // Digits only: no signs, no inner whitespace
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidHex(bad));
        }
        let channel = |i: usize| hex_pair(&digits.as_bytes()[i..i + 2]);

        match digits.len() {
            6 => Ok(Self::rgb(channel(0), channel(2), channel(4))),
            8 => Ok(Self::rgba(channel(0), channel(2), channel(4), channel(6))),
            _ => Err(ParseColorError::InvalidLength),
        }
    }

    /// Parse the `rgb(r, g, b)` form; channels are decimal 0..=255.
    pub fn from_rgb_string(s: &str) -> Result<Self, ParseColorError> {
        let invalid = || ParseColorError::InvalidRgb(s.to_string());
        let inner = s
            .trim()
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let mut channels = [0u8; 3];
        let mut parts = inner.split(',');
        for channel in channels.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?.trim();
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *channel = part.parse().map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::rgb(channels[0], channels[1], channels[2]))
    }
}

/// Value of two ASCII hex digits already checked by the caller.
fn hex_pair(pair: &[u8]) -> u8 {
    let nibble = |b: u8| match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    };
    (nibble(pair[0]) << 4) | nibble(pair[1])
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse a color string.
    ///
    /// Accepted forms:
    /// - `rrggbb` or `#rrggbb` - opaque color, `a` is `None`
    /// - `rrggbbaa` or `#rrggbbaa` - color with alpha
    /// - `rgb(r, g, b)` - decimal channels
    ///
    /// Hex digits are case-insensitive. Surrounding whitespace is trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixel_grid::Color;
    ///
    /// let white: Color = "#FFFFFF".parse().unwrap();
    /// assert_eq!(white, Color::rgb(255, 255, 255));
    ///
    /// let faded: Color = "00ff0080".parse().unwrap();
    /// assert_eq!(faded.a, Some(0x80));
    ///
    /// let orange: Color = "rgb(255, 128, 0)".parse().unwrap();
    /// assert_eq!(orange, Color::rgb(255, 128, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim_start().starts_with("rgb(") {
            Self::from_rgb_string(s)
        } else {
            Self::from_hex(s)
        }
    }
}
