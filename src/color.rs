//! Color parsing for palette entries and shape colors
//!
//! Hex colors (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`) take a fast path.
//! Any other CSS color string (`rgb()`, `hsl()`, named colors) goes through
//! lightningcss.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Fully transparent pixel
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a color string into an RGBA color.
///
/// # Examples
///
/// ```
/// use digrig::color::parse_color;
///
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_color("#3a2a1a80").unwrap(), image::Rgba([0x3a, 0x2a, 0x1a, 0x80]));
/// assert_eq!(parse_color("rgb(0, 255, 0)").unwrap(), image::Rgba([0, 255, 0, 255]));
/// ```
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    match s.strip_prefix('#') {
        Some(hex) => parse_hex_color(hex),
        None => parse_css_color(s),
    }
}

/// Format a color as `#RRGGBB`, or `#RRGGBBAA` when it is not fully opaque.
pub fn color_to_hex(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    if a == 255 {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, ColorError> {
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidHex(c)))
        .collect::<Result<Vec<u8>, _>>()?;

    match digits.as_slice() {
        // Short forms double each digit: #F80 == #FF8800
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r0, g1, g0, b1, b0] => Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, 255])),
        [r1, r0, g1, g0, b1, b0, a1, a0] => {
            Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, a1 * 16 + a0]))
        }
        other => Err(ColorError::InvalidLength(other.len())),
    }
}

fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse(format!("cannot convert '{}' to RGB", s)))?;

    match rgb {
        CssColor::RGBA(c) => Ok(Rgba([c.red, c.green, c.blue, c.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(c) => Ok(Rgba([
                unit_to_byte(c.r),
                unit_to_byte(c.g),
                unit_to_byte(c.b),
                unit_to_byte(c.alpha),
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hex() {
        assert_eq!(parse_color("#F80"), Ok(Rgba([255, 136, 0, 255])));
        assert_eq!(parse_color("#0008"), Ok(Rgba([0, 0, 0, 136])));
    }

    #[test]
    fn test_long_hex() {
        assert_eq!(parse_color("#8B5A2B"), Ok(Rgba([0x8B, 0x5A, 0x2B, 255])));
        assert_eq!(parse_color("#8b5a2b00"), Ok(Rgba([0x8B, 0x5A, 0x2B, 0])));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(parse_color("  #FFF "), Ok(Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_color(""), Err(ColorError::Empty));
        assert_eq!(parse_color("#12345"), Err(ColorError::InvalidLength(5)));
        assert_eq!(parse_color("#GG0000"), Err(ColorError::InvalidHex('G')));
        assert!(matches!(parse_color("not-a-color"), Err(ColorError::CssParse(_))));
    }

    #[test]
    fn test_named_and_functional() {
        assert_eq!(parse_color("blue"), Ok(Rgba([0, 0, 255, 255])));
        assert_eq!(parse_color("transparent").map(|c| c[3]), Ok(0));
        assert_eq!(parse_color("hsl(0, 100%, 50%)"), Ok(Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(color_to_hex(Rgba([255, 0, 16, 255])), "#FF0010");
        assert_eq!(color_to_hex(Rgba([1, 2, 3, 4])), "#01020304");
    }
}
