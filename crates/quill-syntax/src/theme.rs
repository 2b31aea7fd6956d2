//! Color and theme types.
//!
//! The theme maps the eight token categories to display colors. It is
//! loaded once with the syntax configuration and immutable for the
//! session. Colors are written as hex strings in the configuration
//! (`#RRGGBB` or `#AARRGGBB`); unparseable values degrade to the default
//! text color rather than failing the load.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::highlighter::TokenCategory;
use crate::{SyntaxError, SyntaxResult};

/// An RGBA display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// The fallback text color (`#D4D4D4`).
    pub const DEFAULT_TEXT: Color = Color::rgb(0xD4, 0xD4, 0xD4);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#RRGGBB` or `#AARRGGBB` (case-insensitive).
    pub fn parse(s: &str) -> SyntaxResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| SyntaxError::InvalidColor(s.to_string()))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SyntaxError::InvalidColor(s.to_string()));
        }

        let channel = |at: usize| -> SyntaxResult<u8> {
            u8::from_str_radix(&hex[at..at + 2], 16)
                .map_err(|_| SyntaxError::InvalidColor(s.to_string()))
        };

        match hex.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(SyntaxError::InvalidColor(s.to_string())),
        }
    }

    /// Parses a hex string, falling back to [`Color::DEFAULT_TEXT`] on any
    /// malformed value (the configured theme must never fail to load).
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|_| {
            tracing::warn!(value = s, "unparseable color, using default");
            Self::DEFAULT_TEXT
        })
    }

    /// Formats the color back into its hex literal form.
    pub fn to_hex(self) -> String {
        if self.a == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Fail-open: a bad color value degrades to the default text color
        // instead of rejecting the whole configuration document.
        let s = String::deserialize(deserializer)?;
        Ok(Color::parse_or_default(&s))
    }
}

/// The token-category-to-color mapping for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub keywords: Color,
    pub strings: Color,
    pub comments: Color,
    pub numbers: Color,
    pub operators: Color,
    pub functions: Color,
    pub types: Color,
    #[serde(rename = "default")]
    pub default_text: Color,
}

impl Theme {
    /// Returns the display color for a token category.
    pub fn color_for(&self, category: TokenCategory) -> Color {
        match category {
            TokenCategory::Keyword => self.keywords,
            TokenCategory::String => self.strings,
            TokenCategory::Comment => self.comments,
            TokenCategory::Number => self.numbers,
            TokenCategory::Operator => self.operators,
            TokenCategory::Function => self.functions,
            TokenCategory::Type => self.types,
            TokenCategory::Default => self.default_text,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            keywords: Color::rgb(0x56, 0x9C, 0xD6),
            strings: Color::rgb(0xCE, 0x91, 0x78),
            comments: Color::rgb(0x6A, 0x99, 0x55),
            numbers: Color::rgb(0xB5, 0xCE, 0xA8),
            operators: Color::rgb(0xD4, 0xD4, 0xD4),
            functions: Color::rgb(0xDC, 0xDC, 0xAA),
            types: Color::rgb(0x4E, 0xC9, 0xB0),
            default_text: Color::DEFAULT_TEXT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb() {
        let color = Color::parse("#569CD6").unwrap();
        assert_eq!(color, Color::rgb(0x56, 0x9C, 0xD6));
    }

    #[test]
    fn test_parse_argb() {
        let color = Color::parse("#80FF9800").unwrap();
        assert_eq!(color.a, 0x80);
        assert_eq!((color.r, color.g, color.b), (0xFF, 0x98, 0x00));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Color::parse("red").is_err());
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("#GGGGGG").is_err());
    }

    #[test]
    fn test_parse_or_default_falls_back() {
        assert_eq!(Color::parse_or_default("#nothex"), Color::DEFAULT_TEXT);
    }

    #[test]
    fn test_theme_json_round_trip() {
        let theme = Theme::default();
        let json = serde_json::to_string(&theme).unwrap();
        let parsed: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, theme);
    }

    #[test]
    fn test_partial_theme_uses_defaults() {
        let parsed: Theme = serde_json::from_str(r##"{"keywords": "#000000"}"##).unwrap();
        assert_eq!(parsed.keywords, Color::rgb(0, 0, 0));
        assert_eq!(parsed.strings, Theme::default().strings);
    }
}
