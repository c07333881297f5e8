//! Style Model - colors, strokes, shadows and style records
//!
//! Styles compare structurally: two styles are equal when every field is
//! equal, with "both absent" counting as equal. This is what the derived
//! `PartialEq` on the `Option` fields gives us.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ConvertError;

/// Horizontal 0 (left), vertical 1 (top).
pub const DEFAULT_ALIGN: &str = "h0,v1";

static COLOR_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^r(\d*\.?\d*),g(\d*\.?\d*),b(\d*\.?\d*),a(\d*\.?\d*)$")
        .expect("color pattern is valid")
});

/// Round to the given number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let p = 10f64.powi(decimals);
    (value * p).round() / p
}

/// RGBA color, every channel in 0..=1 and rounded to 3 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red: round_to(red, 3),
            green: round_to(green, 3),
            blue: round_to(blue, 3),
            alpha: round_to(alpha, 3),
        }
    }

    /// Color from raw byte channels, normalized by 255.
    pub fn from_bytes(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            alpha,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r{:.3},g{:.3},b{:.3},a{:.3}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl FromStr for Color {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = COLOR_TEXT
            .captures(s)
            .ok_or_else(|| ConvertError::InvalidColor(s.to_string()))?;

        let channel = |i: usize| -> Result<f64, ConvertError> {
            caps[i]
                .parse::<f64>()
                .map_err(|_| ConvertError::InvalidColor(s.to_string()))
        };

        Ok(Self::new(channel(1)?, channel(2)?, channel(3)?, channel(4)?))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorAndDistance {
    pub color: Color,
    pub distance: f64,
}

pub type Stroke = ColorAndDistance;
pub type Shadow = ColorAndDistance;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl Style {
    /// Fill every field this style leaves unset from `common`.
    /// Fields already set are never overwritten.
    pub fn merge_from(&mut self, common: &Style) {
        if self.align.is_none() {
            self.align = common.align.clone();
        }
        if self.stroke.is_none() {
            self.stroke = common.stroke;
        }
        if self.fill.is_none() {
            self.fill = common.fill;
        }
        if self.rotation.is_none() {
            self.rotation = common.rotation;
        }
        if self.shadow.is_none() {
            self.shadow = common.shadow;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_fill() -> Style {
        Style {
            align: Some(DEFAULT_ALIGN.to_string()),
            fill: Some(Color::new(1.0, 0.0, 0.0, 1.0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_color_text_form() {
        let color: Color = "r0.700,g1,b0.9,a0.5".parse().unwrap();
        assert_eq!(color.red, 0.7);
        assert_eq!(color.green, 1.0);
        assert_eq!(color.blue, 0.9);
        assert_eq!(color.alpha, 0.5);
        assert_eq!(color.to_string(), "r0.700,g1.000,b0.900,a0.500");
    }

    #[test]
    fn test_color_json() {
        let color = Color::from_bytes(255, 0, 51, 0.5);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, r#""r1.000,g0.000,b0.200,a0.500""#);
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }

    #[test]
    fn test_parsed_color_rounded() {
        let color: Color = "r0.12345,g0.9996,b0,a0.5004".parse().unwrap();
        assert_eq!(color, Color::new(0.123, 1.0, 0.0, 0.5));
        assert_eq!(color.red, 0.123);
    }

    #[test]
    fn test_invalid_color_text() {
        assert!("rgb(1,2,3)".parse::<Color>().is_err());
    }

    #[test]
    fn test_equality_reflexive_and_symmetric() {
        let a = red_fill();
        let mut b = red_fill();
        b.rotation = Some(90.0);

        assert_eq!(a, a);
        assert_ne!(a, b);
        assert_ne!(b, a);
        assert_eq!(Style::default(), Style::default());
    }

    #[test]
    fn test_merge_keeps_local_fields() {
        let mut local = red_fill();
        let common = Style {
            fill: Some(Color::new(0.0, 0.0, 1.0, 1.0)),
            stroke: Some(ColorAndDistance {
                color: Color::new(0.0, 1.0, 0.0, 1.0),
                distance: 2.0,
            }),
            ..Default::default()
        };

        local.merge_from(&common);
        assert_eq!(local.fill, Some(Color::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(local.stroke, common.stroke);
    }

    #[test]
    fn test_merge_idempotent() {
        let mut once = red_fill();
        let common = Style {
            rotation: Some(45.0),
            ..Default::default()
        };
        once.merge_from(&common);
        let mut twice = once.clone();
        twice.merge_from(&common);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let json = serde_json::to_value(red_fill()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"align": "h0,v1", "fill": "r1.000,g0.000,b0.000,a1.000"})
        );
    }
}
