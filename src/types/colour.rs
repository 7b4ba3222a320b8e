//! Colour type and parsing.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, TmxError};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent colour; the value of an empty colour property.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Opaque black, the default text colour.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a TMX hex colour string.
    ///
    /// Supports formats:
    /// - `#RRGGBB` (opaque)
    /// - `#AARRGGBB` (alpha byte first)
    ///
    /// The leading `#` is optional.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        if !hex.is_ascii() {
            return Err(invalid(s));
        }

        match hex.len() {
            6 => Ok(Self::rgb(
                parse_hex_byte(&hex[0..2])?,
                parse_hex_byte(&hex[2..4])?,
                parse_hex_byte(&hex[4..6])?,
            )),
            8 => Ok(Self::new(
                parse_hex_byte(&hex[2..4])?,
                parse_hex_byte(&hex[4..6])?,
                parse_hex_byte(&hex[6..8])?,
                parse_hex_byte(&hex[0..2])?,
            )),
            _ => Err(invalid(s)),
        }
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Check if the alpha channel is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

impl FromStr for Colour {
    type Err = TmxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }
}

fn invalid(s: &str) -> TmxError {
    TmxError::Parse {
        message: format!("Invalid hex colour: {}", s),
        help: Some("Use #RRGGBB or #AARRGGBB format".to_string()),
    }
}

fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| TmxError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_6digit() {
        let c = Colour::from_hex("#FF0000").unwrap();
        assert_eq!(c, Colour::rgb(255, 0, 0));

        let c = Colour::from_hex("#1a1a2e").unwrap();
        assert_eq!(c, Colour::rgb(0x1a, 0x1a, 0x2e));
    }

    #[test]
    fn test_from_hex_8digit_alpha_first() {
        let c = Colour::from_hex("#FF112233").unwrap();
        assert_eq!(c.a, 0xFF);
        assert_eq!(c.r, 0x11);
        assert_eq!(c.g, 0x22);
        assert_eq!(c.b, 0x33);

        let c = Colour::from_hex("#80FF0000").unwrap();
        assert_eq!(c, Colour::new(255, 0, 0, 128));
    }

    #[test]
    fn test_from_hex_no_hash() {
        assert_eq!(Colour::from_hex("00ff00").unwrap(), Colour::rgb(0, 255, 0));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Colour::from_hex("#GGGGGG").is_err());
        assert!(Colour::from_hex("#12345").is_err());
        assert!(Colour::from_hex("#FFF").is_err());
        assert!(Colour::from_hex("").is_err());
        assert!(Colour::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        assert_eq!(Colour::rgb(255, 0, 0).to_string(), "#FF0000");
        assert_eq!(Colour::new(255, 0, 0, 128).to_string(), "#80FF0000");

        let c: Colour = "#80112233".parse().unwrap();
        assert_eq!(c.to_string().parse::<Colour>().unwrap(), c);
    }

    #[test]
    fn test_constants() {
        assert!(Colour::BLACK.is_opaque());
        assert!(!Colour::TRANSPARENT.is_opaque());
        assert_eq!(Colour::WHITE.to_rgba(), [255, 255, 255, 255]);
    }
}
