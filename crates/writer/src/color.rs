use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("missing leading '#'")]
    MissingHashPrefix,
    #[error("expected 6 or 8 hex digits")]
    InvalidLength,
    #[error("invalid hex digit")]
    InvalidHex,
}

/// RGBA color as stored by lexer styles. Written out as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let hex = input
            .trim()
            .strip_prefix('#')
            .ok_or(ColorParseError::MissingHashPrefix)?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::InvalidLength);
        }
        let mut rgba = [0xFFu8; 4];
        for (i, slot) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
            let start = i * 2;
            let digits = hex
                .get(start..start + 2)
                .ok_or(ColorParseError::InvalidHex)?;
            *slot = u8::from_str_radix(digits, 16).map_err(|_| ColorParseError::InvalidHex)?;
        }
        Ok(Color {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        })
    }

    /// Lower-case `#rrggbb`; alpha is not part of the exported form.
    pub fn name(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_six_and_eight_digit_values() {
        let color = Color::from_hex("#FFAA33").unwrap();
        assert_eq!(color.r, 0xFF);
        assert_eq!(color.a, 0xFF);

        let color = Color::from_hex("#11223344").unwrap();
        assert_eq!(color.b, 0x33);
        assert_eq!(color.a, 0x44);
    }

    #[test]
    fn parse_hex_rejects_invalid_input() {
        assert_eq!(
            Color::from_hex("123456").unwrap_err(),
            ColorParseError::MissingHashPrefix
        );
        assert_eq!(
            Color::from_hex("#123").unwrap_err(),
            ColorParseError::InvalidLength
        );
        assert_eq!(
            Color::from_hex("#12345G").unwrap_err(),
            ColorParseError::InvalidHex
        );
    }

    #[test]
    fn name_drops_alpha_and_lowercases() {
        let color = Color::from_hex("#A0B1C2DD").unwrap();
        assert_eq!(color.name(), "#a0b1c2");
    }
}
