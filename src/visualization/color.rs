//! Display colors given as CSS-style names or hex strings

use std::fmt;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::raster::errors::{RasterError, RasterResult};

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$").unwrap();
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("brown", [165, 42, 42]),
    ("gray", [128, 128, 128]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
];

/// An RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parse "blue", "FF0000" or "#00ff00"
    pub fn parse(text: &str) -> RasterResult<Self> {
        let trimmed = text.trim();
        if let Some((_, [r, g, b])) = NAMED_COLORS.iter().find(|(name, _)| name.eq_ignore_ascii_case(trimmed)) {
            return Ok(Color::new(*r, *g, *b));
        }

        let caps = HEX_COLOR.captures(trimmed)
            .ok_or_else(|| RasterError::ConfigError(format!("Invalid color '{}'", text)))?;
        let component = |i: usize| u8::from_str_radix(&caps[i], 16)
            .map_err(|_| RasterError::ConfigError(format!("Invalid color '{}'", text)));

        Ok(Color::new(component(1)?, component(2)?, component(3)?))
    }

    /// Hex representation without '#'
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::parse(&text).map_err(serde::de::Error::custom)
    }
}
