//! 8-bit RGBA colors and their hex text format.
//!
//! Hex parsing accepts `#RGB`, `#RRGGBB` and `#RRGGBBAA` (the `#` is
//! optional, digits are case-insensitive). Serialization always writes
//! `#rrggbb`, so the alpha channel does not survive a serde round trip: a
//! decoded color always comes back fully opaque.
//!
//! ```
//! use render2d::geometry::Color;
//!
//! let orange = Color::hex("F90").unwrap();
//! assert_eq!(orange, Color::rgba(255, 153, 0, 255));
//! assert_eq!(orange.to_hex(), "#ff9900");
//! ```

use crate::errors::ParseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const INVISIBLE: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const GREY: Color = Color::rgba(153, 153, 153, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const SKY_BLUE: Color = Color::rgba(0, 153, 255, 255);
    pub const BLUE: Color = Color::rgba(0, 0, 255, 255);
    pub const DARK_BLUE: Color = Color::rgba(0, 0, 153, 255);
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    pub const DARK_RED: Color = Color::rgba(153, 0, 0, 255);
    pub const GREEN: Color = Color::rgba(0, 255, 0, 255);
    pub const DARK_GREEN: Color = Color::rgba(0, 153, 0, 255);
    pub const CYAN: Color = Color::rgba(0, 255, 255, 255);
    pub const DARK_CYAN: Color = Color::rgba(0, 153, 153, 255);
    pub const YELLOW: Color = Color::rgba(255, 255, 0, 255);
    pub const ORANGE: Color = Color::rgba(255, 153, 0, 255);
    pub const DARK_YELLOW: Color = Color::rgba(153, 153, 0, 255);
    pub const MAGENTA: Color = Color::rgba(255, 0, 255, 255);
    pub const PURPLE: Color = Color::rgba(153, 0, 153, 255);
    pub const PINK: Color = Color::rgba(255, 153, 255, 255);

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
        Color { red, green, blue, alpha }
    }

    /// Parses a color from a hex code.
    pub fn hex(code: &str) -> Result<Color, ParseError> {
        let digits = code.strip_prefix('#').unwrap_or(code);

        if !matches!(digits.len(), 3 | 6 | 8) {
            return Err(ParseError::HexLength(digits.len()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseError::HexDigit(code.to_string()));
        }

        // Every character is ASCII from here on, so byte slicing is safe.
        let expanded: String = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16)
                .map_err(|_| ParseError::HexDigit(code.to_string()))
        };

        let alpha = if expanded.len() == 8 { channel(3)? } else { 255 };

        Ok(Color::rgba(channel(0)?, channel(1)?, channel(2)?, alpha))
    }

    /// Parses a color from a hex code, panicking on malformed input.
    ///
    /// Intended for color literals baked into the application.
    pub fn must_hex(code: &str) -> Color {
        match Color::hex(code) {
            Ok(color) => color,
            Err(e) => panic!("must_hex({code:?}): {e}"),
        }
    }

    /// `#rrggbb`. The alpha channel is dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    /// Whether the pixel would not show up at all when drawn.
    pub fn is_transparent(&self) -> bool {
        self.alpha == 0
    }

    /// Whether every channel is zero. A zero color disables optional text
    /// effects like stroke and shadow.
    pub fn is_zero(&self) -> bool {
        *self == Color::INVISIBLE
    }

    /// Adds signed deltas to each channel, saturating at 0 and 255.
    pub fn add(&self, r: i32, g: i32, b: i32, a: i32) -> Color {
        fn cap8(v: i32) -> u8 {
            v.clamp(0, 255) as u8
        }

        Color {
            red: cap8(self.red as i32 + r),
            green: cap8(self.green as i32 + g),
            blue: cap8(self.blue as i32 + b),
            alpha: cap8(self.alpha as i32 + a),
        }
    }

    pub fn add_color(&self, other: Color) -> Color {
        self.add(
            other.red as i32,
            other.green as i32,
            other.blue as i32,
            other.alpha as i32,
        )
    }

    pub fn lighten(&self, v: i32) -> Color {
        self.add(v, v, v, 0)
    }

    pub fn darken(&self, v: i32) -> Color {
        self.add(-v, -v, -v, 0)
    }

    pub fn transparentize(&self, v: i32) -> Color {
        self.add(0, 0, 0, v)
    }

    pub fn with_alpha(mut self, alpha: u8) -> Color {
        self.alpha = alpha;
        self
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Color<#{:02x}{:02x}{:02x}+{:02x}>",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Color::hex(&code).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms_agree() {
        let short = Color::hex("F90").unwrap();
        let long = Color::hex("FF9900").unwrap();
        assert_eq!(short, long);
        assert_eq!(long, Color::rgba(255, 153, 0, 255));
        assert_eq!(Color::hex("#ff9900").unwrap(), long);
        assert_eq!(Color::hex("#FF990080").unwrap(), Color::rgba(255, 153, 0, 128));
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert_eq!(Color::hex("#FF99"), Err(ParseError::HexLength(4)));
        assert_eq!(Color::hex(""), Err(ParseError::HexLength(0)));
        assert!(matches!(Color::hex("#GG9900"), Err(ParseError::HexDigit(_))));
        assert!(matches!(Color::hex("ééé"), Err(ParseError::HexDigit(_))));
    }

    #[test]
    #[should_panic(expected = "must_hex")]
    fn must_hex_panics_on_garbage() {
        Color::must_hex("nope");
    }

    #[test]
    fn channel_math_saturates() {
        let light = Color::rgba(250, 250, 250, 255).lighten(40);
        assert_eq!(light, Color::rgba(255, 255, 255, 255));

        let dark = Color::rgba(10, 20, 30, 255).darken(25);
        assert_eq!(dark, Color::rgba(0, 0, 5, 255));

        let faded = Color::WHITE.transparentize(-300);
        assert_eq!(faded.alpha, 0);
        assert!(faded.is_transparent());

        assert_eq!(Color::rgba(100, 100, 100, 100).add_color(Color::GREY), Color::rgba(253, 253, 253, 255));
    }

    #[test]
    fn formatting() {
        assert_eq!(Color::ORANGE.to_hex(), "#ff9900");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "Color<#010203+04>");
        assert!(Color::INVISIBLE.is_zero());
        assert!(!Color::BLACK.is_zero());
        assert_eq!(Color::BLACK.with_alpha(7).alpha, 7);
    }

    #[test]
    fn json_round_trip_drops_alpha() {
        let translucent = Color::rgba(255, 0, 0, 128);
        let json = serde_json::to_string(&translucent).unwrap();
        assert_eq!(json, "\"#ff0000\"");

        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgba(255, 0, 0, 255));

        let with_alpha: Color = serde_json::from_str("\"#ff000080\"").unwrap();
        assert_eq!(with_alpha.alpha, 128);
    }
}
