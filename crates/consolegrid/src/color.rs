//! Color values for grid configuration.
//!
//! Accepted forms:
//!
//! - names: `red`, `cyan`, `grey`, ...
//! - bright names: `bright_red`, `bright_white`, ...
//! - palette index: `0` through `255` (number or numeric string)
//! - hex: `#f80` or `#ff8800`, mapped to the nearest 256-color entry
//!
//! ```rust
//! use console::Color;
//! use consolegrid::color::parse_color_str;
//!
//! assert_eq!(parse_color_str("cyan").unwrap(), Color::Cyan);
//! assert_eq!(parse_color_str("bright_red").unwrap(), Color::Color256(9));
//! assert_eq!(parse_color_str("236").unwrap(), Color::Color256(236));
//! ```

use console::Color;
use serde_yaml::Value;

use crate::error::{GridError, Result};

/// Parses a color from a YAML scalar.
pub fn parse_color(value: &Value) -> Result<Color> {
    match value {
        Value::String(s) => parse_color_str(s),
        Value::Number(n) => n
            .as_u64()
            .and_then(|index| u8::try_from(index).ok())
            .map(Color::Color256)
            .ok_or_else(|| GridError::Config(format!("color index {n} out of range (0-255)"))),
        other => Err(GridError::Config(format!("invalid color value: {other:?}"))),
    }
}

/// Parses a color from its textual form.
pub fn parse_color_str(s: &str) -> Result<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        let (r, g, b) = parse_hex(hex)?;
        return Ok(Color::Color256(rgb_to_ansi256(r, g, b)));
    }
    if let Ok(index) = s.parse::<u16>() {
        return u8::try_from(index)
            .map(Color::Color256)
            .map_err(|_| GridError::Config(format!("color index {index} out of range (0-255)")));
    }

    let name = s.to_lowercase();
    if let Some(base) = name.strip_prefix("bright_") {
        return named_index(base)
            .map(|index| Color::Color256(index + 8))
            .ok_or_else(|| GridError::Config(format!("unknown color: {s}")));
    }
    match name.as_str() {
        "black" => Ok(Color::Black),
        "red" => Ok(Color::Red),
        "green" => Ok(Color::Green),
        "yellow" => Ok(Color::Yellow),
        "blue" => Ok(Color::Blue),
        "magenta" => Ok(Color::Magenta),
        "cyan" => Ok(Color::Cyan),
        "white" | "gray" | "grey" => Ok(Color::White),
        _ => Err(GridError::Config(format!("unknown color: {s}"))),
    }
}

fn named_index(name: &str) -> Option<u8> {
    let index = match name {
        "black" => 0,
        "red" => 1,
        "green" => 2,
        "yellow" => 3,
        "blue" => 4,
        "magenta" => 5,
        "cyan" => 6,
        "white" => 7,
        _ => return None,
    };
    Some(index)
}

fn parse_hex(hex: &str) -> Result<(u8, u8, u8)> {
    let invalid = || GridError::Config(format!("invalid hex color: #{hex}"));
    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
    if !hex.is_ascii() {
        return Err(invalid());
    }
    match hex.len() {
        3 => Ok((
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        6 => Ok((
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => Err(invalid()),
    }
}

/// Nearest xterm 256-color index for an RGB value.
pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let scale = |c: u8| (c as u16 * 5 / 255) as u8;
        16 + 36 * scale(r) + 6 * scale(g) + scale(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors() {
        assert_eq!(parse_color_str("Yellow").unwrap(), Color::Yellow);
        assert_eq!(parse_color_str("grey").unwrap(), Color::White);
        assert!(parse_color_str("mauve").is_err());
    }

    #[test]
    fn bright_colors_use_upper_palette() {
        assert_eq!(parse_color_str("bright_black").unwrap(), Color::Color256(8));
        assert_eq!(parse_color_str("bright_white").unwrap(), Color::Color256(15));
        assert!(parse_color_str("bright_mauve").is_err());
    }

    #[test]
    fn palette_indices() {
        assert_eq!(parse_color(&Value::Number(208.into())).unwrap(), Color::Color256(208));
        assert!(parse_color(&Value::Number(300.into())).is_err());
        assert!(parse_color_str("256").is_err());
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_color_str("#ff0000").unwrap(), Color::Color256(196));
        assert_eq!(parse_color_str("#fff").unwrap(), Color::Color256(231));
        assert_eq!(parse_color_str("#000000").unwrap(), Color::Color256(16));
        assert!(parse_color_str("#12").is_err());
        assert!(parse_color_str("#gggggg").is_err());
    }

    #[test]
    fn non_scalar_is_rejected() {
        assert!(parse_color(&Value::Bool(true)).is_err());
    }
}
