use serde::{Deserialize, Serialize};

pub const CANVAS_WIDTH: u32 = 1000;
pub const CANVAS_HEIGHT: u32 = 600;

pub const MIN_BRUSH_WIDTH: u32 = 1;
pub const MAX_BRUSH_WIDTH: u32 = 20;

/// An opaque RGB color configured as a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            anyhow::bail!("expected #RRGGBB color, got {hex:?}");
        }
        let r = u8::from_str_radix(&digits[0..2], 16)?;
        let g = u8::from_str_radix(&digits[2..4], 16)?;
        let b = u8::from_str_radix(&digits[4..6], 16)?;
        Ok(Self { r, g, b })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

/// The 12 swatches offered by the palette popup.
pub fn default_palette() -> Vec<Color> {
    [
        "#000000", "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8",
        "#F7DC6F", "#BB8FCE", "#85C1E9", "#F8C471",
    ]
    .iter()
    .map(|hex| Color::from_hex(hex).expect("palette colors are valid hex"))
    .collect()
}

/// Pen color and stroke width selected by the user. Width is held to
/// `MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH` by the slider and re-clamped here so a
/// hand-edited settings file cannot smuggle a degenerate width in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushConfig {
    pub color: Color,
    pub width: u32,
}

impl BrushConfig {
    pub fn new(color: Color, width: u32) -> Self {
        Self {
            color,
            width: width.clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH),
        }
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip_preserves_channels() {
        let color = Color::from_hex("#4ECDC4").expect("parse");
        assert_eq!(color, Color::rgb(0x4E, 0xCD, 0xC4));
        assert_eq!(color.to_hex(), "#4ECDC4");
    }

    #[test]
    fn hex_parse_accepts_missing_hash_and_rejects_garbage() {
        assert_eq!(Color::from_hex("ffffff").expect("parse"), Color::WHITE);
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn palette_has_twelve_distinct_swatches() {
        let palette = default_palette();
        assert_eq!(palette.len(), 12);
        for (i, a) in palette.iter().enumerate() {
            for b in palette.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn brush_width_is_clamped_to_slider_range() {
        assert_eq!(BrushConfig::new(Color::BLACK, 0).width, MIN_BRUSH_WIDTH);
        assert_eq!(BrushConfig::new(Color::BLACK, 99).width, MAX_BRUSH_WIDTH);
        assert_eq!(BrushConfig::new(Color::BLACK, 7).width, 7);
    }

    #[test]
    fn color_serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::rgb(255, 107, 107)).expect("serialize");
        assert_eq!(json, "\"#FF6B6B\"");
        let back: Color = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Color::rgb(255, 107, 107));
    }
}
