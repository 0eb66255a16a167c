//! Color types and deterministic categorization.
//!
//! Colors are bucketed by fixed HSL thresholds into the categories the
//! merge stage builds its scheme from. The hue ranges (80-140 "primary
//! green", 140-200 "secondary green") are calibration for green-themed
//! templates, not a general color taxonomy; they are part of the merge
//! contract and must not be made configurable per call.

use crate::error::{DesignError, Result};
use serde::{Deserialize, Serialize};

/// An RGB color. Serializes as a `[r, g, b]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse a hex color string, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(DesignError::invalid_color(hex));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| DesignError::invalid_color(hex))
        };
        Ok(Self(parse(0..2)?, parse(2..4)?, parse(4..6)?))
    }

    /// Format as a lowercase `#rrggbb` string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Format as the uppercase six-digit value OOXML attributes use (no `#`).
    pub fn to_ooxml(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Convert to integer HSL: (hue in degrees, saturation %, lightness %).
    ///
    /// Fractional components are truncated, so thresholds compare whole
    /// integers. The same input always yields the same triple.
    pub fn hsl(self) -> (u16, u8, u8) {
        let r = f64::from(self.0) / 255.0;
        let g = f64::from(self.1) / 255.0;
        let b = f64::from(self.2) / 255.0;

        let maxc = r.max(g).max(b);
        let minc = r.min(g).min(b);
        let l = (maxc + minc) / 2.0;

        if maxc == minc {
            return (0, 0, (l * 100.0) as u8);
        }

        let d = maxc - minc;
        let s = if l <= 0.5 {
            d / (maxc + minc)
        } else {
            d / (2.0 - maxc - minc)
        };

        let rc = (maxc - r) / d;
        let gc = (maxc - g) / d;
        let bc = (maxc - b) / d;
        let h = if r == maxc {
            bc - gc
        } else if g == maxc {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        };
        let h = (h / 6.0).rem_euclid(1.0);

        ((h * 360.0) as u16, (s * 100.0) as u8, (l * 100.0) as u8)
    }
}

/// Category a color falls into after HSL thresholding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCategory {
    /// Lightness above 90
    Light,

    /// Lightness below 20
    Dark,

    /// Saturation below 20
    Neutral,

    /// Hue in the 80-140 degree range
    PrimaryGreen,

    /// Hue in the 140-200 degree range
    SecondaryGreen,

    /// Everything else
    Accent,
}

/// The HSL profile of a categorized color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorProfile {
    pub category: ColorCategory,
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
    pub is_green_family: bool,
}

/// Categorize a color by its HSL properties.
///
/// Pure function of the input: lightness and saturation cuts first, then
/// hue bucketing. Hue 140 lands in the primary range because the first
/// range is checked inclusively first.
pub fn categorize(color: Rgb) -> ColorProfile {
    let (hue, saturation, lightness) = color.hsl();

    let category = if lightness > 90 {
        ColorCategory::Light
    } else if lightness < 20 {
        ColorCategory::Dark
    } else if saturation < 20 {
        ColorCategory::Neutral
    } else if (80..=140).contains(&hue) {
        ColorCategory::PrimaryGreen
    } else if (140..=200).contains(&hue) {
        ColorCategory::SecondaryGreen
    } else {
        ColorCategory::Accent
    };

    ColorProfile {
        category,
        hue,
        saturation,
        lightness,
        is_green_family: (80..=200).contains(&hue),
    }
}

/// A palette color with its category, source frequency, and raw values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedColor {
    pub category: ColorCategory,
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
    pub is_green_family: bool,
    pub hex: String,
    pub frequency: u64,
    pub rgb: Rgb,
}

impl CategorizedColor {
    /// Categorize a hex palette entry with its frequency rank
    pub fn new(hex: &str, frequency: u64) -> Result<Self> {
        let rgb = Rgb::from_hex(hex)?;
        let profile = categorize(rgb);
        Ok(Self {
            category: profile.category,
            hue: profile.hue,
            saturation: profile.saturation,
            lightness: profile.lightness,
            is_green_family: profile.is_green_family,
            hex: hex.to_string(),
            frequency,
            rgb,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Rgb::from_hex("#456446").unwrap();
        assert_eq!(c, Rgb(0x45, 0x64, 0x46));
        assert_eq!(c.to_hex(), "#456446");
        assert_eq!(c.to_ooxml(), "456446");

        // Leading '#' is optional
        assert_eq!(Rgb::from_hex("456446").unwrap(), c);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(Rgb::from_hex("#45644").is_err());
        assert!(Rgb::from_hex("#45644g").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn test_hsl_known_values() {
        // Pure white and black are the degenerate axis
        assert_eq!(Rgb(255, 255, 255).hsl(), (0, 0, 100));
        assert_eq!(Rgb(0, 0, 0).hsl(), (0, 0, 0));

        // Saturated mid green
        let (h, s, l) = Rgb(0x22, 0xaa, 0x44).hsl();
        assert_eq!(h, 135);
        assert_eq!(s, 66);
        assert_eq!(l, 40);
    }

    #[test]
    fn test_categorize_is_deterministic() {
        for hex in ["#456446", "#22aa44", "#ffffff", "#111111", "#cc2222"] {
            let rgb = Rgb::from_hex(hex).unwrap();
            let first = categorize(rgb);
            let second = categorize(rgb);
            assert_eq!(first, second, "category drifted for {hex}");
            assert_eq!(rgb.hsl(), rgb.hsl());
        }
    }

    #[test]
    fn test_category_thresholds() {
        assert_eq!(categorize(Rgb::from_hex("#ffffff").unwrap()).category, ColorCategory::Light);
        assert_eq!(categorize(Rgb::from_hex("#111111").unwrap()).category, ColorCategory::Dark);
        // Low saturation wins over hue, even for greenish colors
        assert_eq!(categorize(Rgb::from_hex("#456446").unwrap()).category, ColorCategory::Neutral);
        assert_eq!(categorize(Rgb::from_hex("#22aa44").unwrap()).category, ColorCategory::PrimaryGreen);
        assert_eq!(categorize(Rgb::from_hex("#22aacc").unwrap()).category, ColorCategory::SecondaryGreen);
        assert_eq!(categorize(Rgb::from_hex("#cc2222").unwrap()).category, ColorCategory::Accent);
    }

    #[test]
    fn test_green_family_flag() {
        assert!(categorize(Rgb::from_hex("#22aa44").unwrap()).is_green_family);
        assert!(categorize(Rgb::from_hex("#22aacc").unwrap()).is_green_family);
        assert!(!categorize(Rgb::from_hex("#cc2222").unwrap()).is_green_family);
    }

    #[test]
    fn test_categorized_color_record() {
        let color = CategorizedColor::new("#22aa44", 12).unwrap();
        assert_eq!(color.category, ColorCategory::PrimaryGreen);
        assert_eq!(color.hex, "#22aa44");
        assert_eq!(color.frequency, 12);
        assert_eq!(color.rgb, Rgb(0x22, 0xaa, 0x44));
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&ColorCategory::PrimaryGreen).unwrap();
        assert_eq!(json, "\"primary_green\"");
        let json = serde_json::to_string(&ColorCategory::SecondaryGreen).unwrap();
        assert_eq!(json, "\"secondary_green\"");
    }
}
