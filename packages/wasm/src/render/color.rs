//! CSS-compatible colors.
//!
//! Colors are stored as 8-bit channels plus a floating point alpha, which is
//! exactly what `rgba(...)` strings express. They deserialize from the CSS
//! forms used in configs (`#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(...)`,
//! `rgba(...)`) and serialize back to `rgba(...)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BackdropError;

/// An sRGB color with straight alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same channels with a replaced alpha (clamped to `[0, 1]`).
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: clamp_unit(a),
            ..self
        }
    }

    /// Multiply the existing alpha by `factor`.
    #[inline]
    pub fn scale_alpha(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }

    /// CSS `rgba()` notation, as accepted by canvas fill and stroke styles.
    pub fn to_css(&self) -> String {
        let a = (clamp_unit(self.a) * 1000.0).round() / 1000.0;
        format!("rgba({},{},{},{})", self.r, self.g, self.b, a)
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Rgba {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || BackdropError::InvalidColor(s.to_string());

        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = text.to_ascii_lowercase();
        let (body, has_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let body = body.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != if has_alpha { 4 } else { 3 } {
            return Err(invalid());
        }

        let channel = |p: &str| p.parse::<u8>().ok();
        let r = channel(parts[0]).ok_or_else(invalid)?;
        let g = channel(parts[1]).ok_or_else(invalid)?;
        let b = channel(parts[2]).ok_or_else(invalid)?;
        let a = if has_alpha {
            let a: f32 = parts[3].parse().map_err(|_| invalid())?;
            if !a.is_finite() {
                return Err(invalid());
            }
            clamp_unit(a)
        } else {
            1.0
        };
        Ok(Self::new(r, g, b, a))
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)? as f32 / 255.0)),
        _ => None,
    }
}

impl TryFrom<String> for Rgba {
    type Error = BackdropError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_css()
    }
}

/// A color at a position along a gradient, `offset` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#3a1a18".parse::<Rgba>().unwrap(), Rgba::rgb(0x3a, 0x1a, 0x18));
        assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba::WHITE);
        let c: Rgba = "#00000080".parse().unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_rgba() {
        let c: Rgba = "rgba(255,255,255,0.08)".parse().unwrap();
        assert_eq!((c.r, c.g, c.b), (255, 255, 255));
        assert!((c.a - 0.08).abs() < 1e-6);

        let c: Rgba = " RGB(1, 2, 3) ".parse().unwrap();
        assert_eq!(c, Rgba::rgb(1, 2, 3));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Rgba>().is_err());
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("#gggggg".parse::<Rgba>().is_err());
        assert!("rgba(1,2,3)".parse::<Rgba>().is_err());
        assert!("rgb(300,0,0)".parse::<Rgba>().is_err());
        assert!("hsl(0, 50%, 50%)".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_scale_alpha() {
        let c = Rgba::new(10, 20, 30, 0.5);
        assert_eq!(c.scale_alpha(0.5), Rgba::new(10, 20, 30, 0.25));
        assert_eq!(c.scale_alpha(4.0).a, 1.0);
        assert_eq!(c.scale_alpha(-1.0).a, 0.0);
        assert_eq!(c.scale_alpha(f32::NAN).a, 0.0);
    }

    #[test]
    fn test_to_css() {
        assert_eq!(Rgba::new(255, 255, 255, 0.08).to_css(), "rgba(255,255,255,0.08)");
        assert_eq!(Rgba::WHITE.with_alpha(2.0).to_css(), "rgba(255,255,255,1)");
        assert_eq!(Rgba::WHITE.with_alpha(f32::NAN).a, 0.0);
    }

    #[test]
    fn test_serde_string_form() {
        let c: Rgba = serde_json::from_str("\"#ff0000\"").unwrap();
        assert_eq!(c, Rgba::rgb(255, 0, 0));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"rgba(255,0,0,1)\"");
    }
}
