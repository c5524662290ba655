//! Hex colors used for marker styling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A `#RRGGBB` or `#RRGGBBAA` color.
///
/// Stored normalized (leading `#`, uppercase digits) so two colors compare
/// equal regardless of how they were written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorParseError {
    #[error("Invalid hex color '{0}': expected #RRGGBB or #RRGGBBAA")]
    InvalidHex(String),
}

impl Color {
    /// Parse a hex color string. The leading `#` is optional.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().trim_start_matches('#');
        let valid_len = digits.len() == 6 || digits.len() == 8;
        if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(s.to_string()));
        }
        Ok(Color(format!("#{}", digits.to_ascii_uppercase())))
    }

    /// Opaque color from its channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(format!("#{:02X}{:02X}{:02X}", r, g, b))
    }

    /// The normalized `#RRGGBB[AA]` form.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        let s = self.0.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).unwrap_or(0);

        let alpha = if s.len() == 8 { channel(6) } else { 255 };
        (channel(0), channel(2), channel(4), alpha)
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
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
