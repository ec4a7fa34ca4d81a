use std::fmt;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Unique identifier for an emitter in the visualization.
/// Opaque string; only equality matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmitterId(pub String);

impl EmitterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmitterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// 24-bit RGB color, stored as 0xRRGGBB.
///
/// Serializes as a plain integer. Deserializes from an integer or from a
/// `"#rrggbb"` string, which is what color pickers usually hand back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const MAGENTA: Color = Color(0xFF00FF);

    /// Parse `#rrggbb`, `rrggbb` or `0xrrggbb`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Color)
    }

    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0 & 0xFF_FFFF)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0 & 0xFF_FFFF)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u32),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) if n <= 0xFF_FFFF => Ok(Color(n)),
            Repr::Number(n) => Err(de::Error::custom(format!("color {n} out of range"))),
            Repr::Text(s) => Color::from_hex(&s)
                .ok_or_else(|| de::Error::custom(format!("invalid color string {s:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_hex_variants() {
        assert_eq!(Color::from_hex("#ff00ff"), Some(Color::MAGENTA));
        assert_eq!(Color::from_hex("0x000000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("ffffff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#gggggg"), None);
    }

    #[test]
    fn color_serializes_as_number() {
        let json = serde_json::to_string(&Color(0x123456)).unwrap();
        assert_eq!(json, "1193046");
    }

    #[test]
    fn color_deserializes_from_string() {
        let c: Color = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(c, Color(0x00FF00));
        assert!(serde_json::from_str::<Color>("16777216").is_err());
    }

    #[test]
    fn color_hex_round_trip() {
        assert_eq!(Color::BLACK.to_hex(), "#000000");
        assert_eq!(Color(0xAB12CD).to_hex(), "#ab12cd");
        assert_eq!(Color::from_hex(&Color(0xAB12CD).to_hex()), Some(Color(0xAB12CD)));
    }
}
