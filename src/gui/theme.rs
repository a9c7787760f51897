use palette::{FromColor, Hsv, Srgb, Srgba};
use serde_with::DeserializeFromStr;
use std::str::FromStr;
use thiserror::Error;

pub type Color = Srgba<f64>;

pub fn transparent() -> Color {
    Srgba::new(0.0, 0.0, 0.0, 0.0)
}

pub fn darker_gray() -> Color {
    Srgba::new(0xAA as f64 / 255.0, 0xAA as f64 / 255.0, 0xAA as f64 / 255.0, 1.0)
}

pub fn black() -> Color {
    Srgba::new(0.0, 0.0, 0.0, 1.0)
}

pub fn darken(color: Color) -> Color {
    adjust_brightness(color, 0.9)
}

pub fn lighten(color: Color) -> Color {
    adjust_brightness(color, 1.1)
}

/// Scales the HSV value channel, keeping hue, saturation and alpha.
fn adjust_brightness(color: Color, factor: f64) -> Color {
    let mut hsv = Hsv::<palette::encoding::Srgb, f64>::from_color(color.color);
    hsv.value = (hsv.value * factor).min(1.0);
    let rgb = Srgb::<f64>::from_color(hsv);
    Srgba::new(rgb.red, rgb.green, rgb.blue, color.alpha)
}

pub fn half_transparent(color: Color) -> Color {
    Srgba::new(color.red, color.green, color.blue, color.alpha / 2.0)
}

pub fn opaque(color: Color) -> Color {
    Srgba::new(color.red, color.green, color.blue, 1.0)
}

pub fn opacity_to_alpha(opacity: f64) -> u8 {
    (255.0 * opacity.clamp(0.0, 1.0)) as u8
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Invalid color '{0}', expected #RRGGBB or #RRGGBBAA")]
    Malformed(String),
}

/// A colour written as `#RRGGBB` or `#RRGGBBAA` in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr)]
pub struct HexColor(pub Color);

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ColorParseError::Malformed(s.to_string());
        let hex = s.trim().trim_start_matches('#');

        let (rgb, alpha) = match hex.len() {
            6 => (hex, 0xFF),
            8 => (
                &hex[..6],
                u8::from_str_radix(&hex[6..], 16).map_err(|_| malformed())?,
            ),
            _ => return Err(malformed()),
        };

        let rgb = Srgb::<u8>::from_str(rgb).map_err(|_| malformed())?;
        let rgb = rgb.into_format::<f64>();
        Ok(Self(Srgba::new(
            rgb.red,
            rgb.green,
            rgb.blue,
            alpha as f64 / 255.0,
        )))
    }
}

impl From<HexColor> for Color {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_hex_color_parsing() {
        let c = HexColor::from_str("#ff000080").unwrap().0;
        assert!(approx(c.red, 1.0));
        assert!(approx(c.green, 0.0));
        assert!(approx(c.alpha, 128.0 / 255.0));

        let c = HexColor::from_str("00ff00").unwrap().0;
        assert!(approx(c.green, 1.0));
        assert!(approx(c.alpha, 1.0));

        assert!(HexColor::from_str("#12345").is_err());
        assert!(HexColor::from_str("#zzzzzz").is_err());
    }

    #[test]
    fn test_brightness_adjustment_clamps_value() {
        let base = Srgba::new(0.5, 0.25, 0.25, 0.8);
        let dark = darken(base);
        assert!(approx(dark.red, 0.45));
        assert!(approx(dark.alpha, 0.8));

        let white = Srgba::new(1.0, 1.0, 1.0, 1.0);
        let light = lighten(white);
        assert!(approx(light.red, 1.0));
    }

    #[test]
    fn test_alpha_helpers() {
        let c = Srgba::new(0.2, 0.4, 0.6, 0.5);
        assert!(approx(half_transparent(c).alpha, 0.25));
        assert!(approx(opaque(c).alpha, 1.0));
        assert_eq!(opacity_to_alpha(0.02), 5);
    }
}
