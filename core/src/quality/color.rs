use serde::{Deserialize, Serialize};
use std::fmt;

/// sRGB 8-bit triplet, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn parse_hex(value: &str) -> Result<Self, String> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected #RRGGBB, got {:?}", value));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| format!("invalid hex color {:?}", value))
        };
        Ok(Self([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parse_accepts_optional_hash() {
        assert_eq!(Rgb::parse_hex("#1A9641").unwrap(), Rgb::new(0x1A, 0x96, 0x41));
        assert_eq!(Rgb::parse_hex("808080").unwrap(), Rgb::new(128, 128, 128));
    }

    #[test]
    fn hex_parse_rejects_short_or_invalid() {
        assert!(Rgb::parse_hex("#FFF").is_err());
        assert!(Rgb::parse_hex("#GG0000").is_err());
    }

    #[test]
    fn display_is_uppercase_hex() {
        assert_eq!(Rgb::new(215, 25, 28).to_string(), "#D7191C");
    }
}
