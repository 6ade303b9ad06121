use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while loading board parameters from disk
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid color {0:?}, expected #rrggbb")]
    Color(String),
}

/// Board parameters
///
/// Cell-valued fields (`border`, `corner_box`) are multiplied by
/// `unit_pixels` when painted; `padding` is already in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Identifier of the first tag painted
    pub start_id: u32,
    /// Border thickness around the code area, in cells
    pub border: u32,
    /// Side of each corner alignment box, in cells
    pub corner_box: u32,
    /// Blank margin around the board, in pixels
    pub padding: u32,
    /// Number of tag columns
    pub cols: u32,
    /// Number of tag rows
    pub rows: u32,
    /// Pixels per cell
    pub unit_pixels: u32,
}

impl BoardConfig {
    /// Number of tags on the board
    pub fn tag_count(&self) -> u64 {
        u64::from(self.cols) * u64::from(self.rows)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            start_id: 0,
            border: 2,
            corner_box: 1,
            padding: 50,
            cols: 6,
            rows: 6,
            unit_pixels: 10,
        }
    }
}

impl fmt::Display for BoardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} tags from ID {} (border {}, corner box {}, {}px/cell, {}px padding)",
            self.cols,
            self.rows,
            self.start_id,
            self.border,
            self.corner_box,
            self.unit_pixels,
            self.padding
        )
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    /// Parses `#rrggbb` or `rrggbb`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let invalid = || ConfigError::Color(s.to_string());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// The two colors a board is painted with
///
/// `foreground` fills the page and the code area; `background` fills tag
/// borders, zero bits and corner boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub foreground: Color,
    pub background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Color::WHITE,
            background: Color::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BoardConfig::from_toml_str("cols = 3\nrows = 2\nstart_id = 12\n").unwrap();
        assert_eq!(config.cols, 3);
        assert_eq!(config.rows, 2);
        assert_eq!(config.start_id, 12);
        assert_eq!(config.border, BoardConfig::default().border);
        assert_eq!(config.tag_count(), 6);
    }

    #[test]
    fn test_negative_values_rejected() {
        assert!(BoardConfig::from_toml_str("cols = -1").is_err());
    }

    #[test]
    fn test_palette_defaults() {
        let palette = Palette::default();
        assert_eq!(palette.foreground, Color::WHITE);
        assert_eq!(palette.background, Color::BLACK);
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
    }

    #[test]
    fn test_color_parse() {
        assert_eq!("#ff0010".parse::<Color>().unwrap(), Color::rgb(255, 0, 16));
        assert_eq!("0A0b0C".parse::<Color>().unwrap(), Color::rgb(10, 11, 12));
        assert!("#fff".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }
}
