//! Color value object.
//!
//! Wraps a 7-character `#RRGGBB` hex string and exposes the usual
//! colorimetric views: decimal, RGB, HSV, HSL. Hue is in degrees,
//! saturation/value/lightness in `0..=1`.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Color {
    hex: String,
    value: u32,
}

impl Color {
    /// # Errors
    ///
    /// Fails with [`Error::InvalidHexColor`] unless `hex` is exactly
    /// `#RRGGBB`.
    pub fn new(hex: impl Into<String>) -> Result<Self, Error> {
        let hex = hex.into();
        let value = hex
            .strip_prefix('#')
            .filter(|digits| digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|digits| u32::from_str_radix(digits, 16).ok())
            .ok_or_else(|| Error::InvalidHexColor(hex.clone()))?;
        Ok(Self { hex, value })
    }

    /// The color as one decimal integer.
    #[must_use]
    pub fn to_dec(&self) -> u32 {
        self.value
    }

    #[must_use]
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.value.to_be_bytes();
        (r, g, b)
    }

    /// Hue in degrees, saturation and value in `0..=1`.
    #[must_use]
    pub fn to_hsv(&self) -> (f64, f64, f64) {
        let (r, g, b) = self.rgb_unit();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let saturation = if max <= f64::EPSILON {
            0.0
        } else {
            (max - min) / max
        };
        (hue(r, g, b, max, min), saturation, max)
    }

    /// Hue in degrees, saturation and lightness in `0..=1`.
    #[must_use]
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let (r, g, b) = self.rgb_unit();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;
        let delta = max - min;
        let saturation = if delta.abs() < f64::EPSILON {
            0.0
        } else if lightness <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };
        (hue(r, g, b, max, min), saturation, lightness)
    }

    /// The canonical `#RRGGBB` form this color was built from.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    fn rgb_unit(&self) -> (f64, f64, f64) {
        let (r, g, b) = self.to_rgb();
        (
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        )
    }
}

fn hue(r: f64, g: f64, b: f64, max: f64, min: f64) -> f64 {
    let delta = max - min;
    if delta.abs() < f64::EPSILON {
        return 0.0;
    }
    let hue = if (max - r).abs() < f64::EPSILON {
        ((g - b) / delta).rem_euclid(6.0)
    } else if (max - g).abs() < f64::EPSILON {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    60.0 * hue
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.hex)
    }
}
