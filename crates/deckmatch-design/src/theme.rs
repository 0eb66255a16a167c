//! Theme records extracted from a template.
//!
//! A theme names a fixed set of color roles (dk1, lt1, accent1..6, ...)
//! and two font roles (major for headings, minor for body), each of which
//! may carry per-script typefaces. Roles that a template does not
//! customize are simply absent; consumers fall back to defaults.

use crate::color::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Typeface fallback when a template resolves no fonts at all
pub const FALLBACK_FONT: &str = "Gothic A1";

/// Color and font roles of one template theme
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeRecord {
    /// Color role name -> hex RGB value (no `#`, as stored in the XML)
    #[serde(default)]
    pub colors: BTreeMap<String, String>,

    /// Font roles
    #[serde(default)]
    pub fonts: FontScheme,
}

impl ThemeRecord {
    /// Look up a color role as an `Rgb`, tolerating values with or
    /// without a leading `#`. Absent or unparseable roles yield `None`.
    pub fn color(&self, role: &str) -> Option<Rgb> {
        self.colors.get(role).and_then(|v| Rgb::from_hex(v).ok())
    }
}

/// Major/minor font roles with per-script typefaces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontScheme {
    /// Heading font: script -> typeface (key "latin" for the latin face)
    #[serde(rename = "majorFont", default)]
    pub major: BTreeMap<String, String>,

    /// Body font: script -> typeface
    #[serde(rename = "minorFont", default)]
    pub minor: BTreeMap<String, String>,
}

impl FontScheme {
    /// Resolve the major font: latin, then Jpan, then any script entry.
    pub fn resolve_major(&self) -> Option<&str> {
        resolve_font(&self.major)
    }

    /// Resolve the minor font with the same fallback chain.
    pub fn resolve_minor(&self) -> Option<&str> {
        resolve_font(&self.minor)
    }
}

/// Ordered fallback: "latin" -> "Jpan" -> first non-empty entry.
fn resolve_font(entries: &BTreeMap<String, String>) -> Option<&str> {
    entries
        .get("latin")
        .filter(|v| !v.is_empty())
        .or_else(|| entries.get("Jpan").filter(|v| !v.is_empty()))
        .or_else(|| entries.values().find(|v| !v.is_empty()))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_color_role_lookup() {
        let mut theme = ThemeRecord::default();
        theme
            .colors
            .insert("accent1".to_string(), "456446".to_string());
        theme
            .colors
            .insert("dk1".to_string(), "#2d4a2e".to_string());

        assert_eq!(theme.color("accent1"), Some(Rgb(0x45, 0x64, 0x46)));
        assert_eq!(theme.color("dk1"), Some(Rgb(0x2d, 0x4a, 0x2e)));
        assert_eq!(theme.color("accent2"), None);
    }

    #[test]
    fn test_font_fallback_latin_first() {
        let fonts = FontScheme {
            major: scheme(&[("latin", "Gothic A1"), ("Jpan", "Yu Gothic")]),
            minor: BTreeMap::new(),
        };
        assert_eq!(fonts.resolve_major(), Some("Gothic A1"));
    }

    #[test]
    fn test_font_fallback_jpan_then_any() {
        let fonts = FontScheme {
            major: scheme(&[("Jpan", "Yu Gothic")]),
            minor: scheme(&[("Hang", "Malgun Gothic")]),
        };
        assert_eq!(fonts.resolve_major(), Some("Yu Gothic"));
        assert_eq!(fonts.resolve_minor(), Some("Malgun Gothic"));
    }

    #[test]
    fn test_empty_typefaces_are_skipped() {
        let fonts = FontScheme {
            major: scheme(&[("latin", ""), ("Hans", "SimSun")]),
            minor: scheme(&[("latin", "")]),
        };
        assert_eq!(fonts.resolve_major(), Some("SimSun"));
        assert_eq!(fonts.resolve_minor(), None);
    }

    #[test]
    fn test_serde_role_names() {
        let json = r#"{
            "majorFont": {"latin": "Gothic A1"},
            "minorFont": {"latin": "Gothic A1"}
        }"#;
        let fonts: FontScheme = serde_json::from_str(json).unwrap();
        assert_eq!(fonts.resolve_major(), Some("Gothic A1"));
    }
}
