//! Serde models for the two analysis input files.
//!
//! The structural analysis file carries what was read out of the template
//! itself (theme roles, slide size, layout placeholders); the visual
//! analysis file carries what an external image pass derived from
//! rendered slides (ranked palette, layout density). Both are plain JSON
//! and both tolerate missing sections.

use crate::error::{DesignError, Result};
use crate::theme::{FontScheme, ThemeRecord};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Structural analysis of one template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateAnalysis {
    /// Color role name -> hex value
    #[serde(default)]
    pub color_scheme: BTreeMap<String, String>,

    /// Major/minor font roles; absent when the analyzer saw no font scheme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_scheme: Option<FontScheme>,

    /// Raw canvas size; empty when the template had no size element
    #[serde(default)]
    pub slide_dimensions: RawDimensions,

    /// Per-layout placeholder inventory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layouts: Vec<LayoutAnalysis>,

    /// Slide inventory of the analyzed deck, if the analyzer recorded one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slides: Vec<serde_json::Value>,
}

impl TemplateAnalysis {
    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_input(path)?;
        serde_json::from_str(&text).map_err(|e| DesignError::malformed(path.display().to_string(), &e))
    }

    /// The theme record view (color roles + font roles)
    pub fn theme(&self) -> ThemeRecord {
        ThemeRecord {
            colors: self.color_scheme.clone(),
            fonts: self.font_scheme.clone().unwrap_or_default(),
        }
    }
}

/// Canvas size as the analyzer reports it. Values may be strings (copied
/// straight from XML attributes) or numbers; either parses. An empty
/// record means the template had no size element and downstream stages
/// must fall back to defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RawDimensions {
    #[serde(
        default,
        deserialize_with = "flexible_float",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<f64>,

    #[serde(
        default,
        deserialize_with = "flexible_float",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<f64>,
}

impl RawDimensions {
    /// Whether both extents are present
    pub fn is_set(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

/// One layout's placeholder inventory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutAnalysis {
    pub name: String,

    #[serde(default)]
    pub placeholders: Vec<PlaceholderAnalysis>,
}

/// One placeholder slot in a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderAnalysis {
    /// Placeholder index within the layout
    pub idx: u32,

    /// Placeholder type name (TITLE, SUBTITLE, BODY, PICTURE, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Shape name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Visual analysis of the rendered template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Absent when the image pass produced no palette
    #[serde(default)]
    pub color_palette: Option<ColorPalette>,

    #[serde(default)]
    pub layout_patterns: LayoutPatterns,
}

impl ImageAnalysis {
    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_input(path)?;
        serde_json::from_str(&text).map_err(|e| DesignError::malformed(path.display().to_string(), &e))
    }
}

/// Ranked palette from the image pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorPalette {
    /// `[hex, pixel frequency]` pairs, most frequent first
    #[serde(default)]
    pub most_common_colors: Vec<(String, u64)>,

    #[serde(default)]
    pub total_unique_colors: u64,

    #[serde(default)]
    pub color_consistency: f64,
}

/// Layout density metrics from the image pass
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutPatterns {
    #[serde(default = "default_avg_elements")]
    pub avg_elements_per_slide: f64,

    #[serde(default)]
    pub element_count_variance: f64,
}

impl Default for LayoutPatterns {
    fn default() -> Self {
        Self {
            avg_elements_per_slide: default_avg_elements(),
            element_count_variance: 0.0,
        }
    }
}

fn default_avg_elements() -> f64 {
    1.0
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DesignError::missing_input(path.display().to_string())
        } else {
            DesignError::IoError(e)
        }
    })
}

/// Accept a float from either a JSON number or a numeric string.
fn flexible_float<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    let value = Option::<NumOrStr>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumOrStr::Num(n)) => Some(n),
        Some(NumOrStr::Str(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_analysis_from_analyzer_output() {
        let json = r#"{
            "color_scheme": {"accent1": "456446", "dk1": "2d4a2e"},
            "font_scheme": {
                "majorFont": {"latin": "Gothic A1"},
                "minorFont": {"latin": "Gothic A1"}
            },
            "slide_dimensions": {"width": "12192000", "height": "6858000"}
        }"#;

        let analysis: TemplateAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.slide_dimensions.width, Some(12_192_000.0));
        assert_eq!(analysis.slide_dimensions.height, Some(6_858_000.0));
        assert!(analysis.slide_dimensions.is_set());

        let theme = analysis.theme();
        assert!(theme.color("accent1").is_some());
        assert_eq!(theme.fonts.resolve_major(), Some("Gothic A1"));
        assert!(analysis.font_scheme.is_some());
    }

    #[test]
    fn test_missing_dimensions_are_unset() {
        let analysis: TemplateAnalysis =
            serde_json::from_str(r#"{"slide_dimensions": {}}"#).unwrap();
        assert!(!analysis.slide_dimensions.is_set());

        let analysis: TemplateAnalysis = serde_json::from_str("{}").unwrap();
        assert!(!analysis.slide_dimensions.is_set());
    }

    #[test]
    fn test_numeric_dimensions_also_parse() {
        let analysis: TemplateAnalysis = serde_json::from_str(
            r#"{"slide_dimensions": {"width": 10, "height": 7.5}}"#,
        )
        .unwrap();
        assert_eq!(analysis.slide_dimensions.width, Some(10.0));
        assert_eq!(analysis.slide_dimensions.height, Some(7.5));
    }

    #[test]
    fn test_image_analysis_palette() {
        let json = r##"{
            "color_palette": {
                "most_common_colors": [["#456446", 120], ["#ffffff", 80]],
                "total_unique_colors": 2412,
                "color_consistency": 0.82
            },
            "layout_patterns": {
                "avg_elements_per_slide": 2.4,
                "element_count_variance": 0.7
            }
        }"##;

        let analysis: ImageAnalysis = serde_json::from_str(json).unwrap();
        let palette = analysis.color_palette.as_ref().unwrap();
        assert_eq!(palette.most_common_colors.len(), 2);
        assert_eq!(palette.most_common_colors[0], ("#456446".to_string(), 120));
        assert!((analysis.layout_patterns.avg_elements_per_slide - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_layout_patterns_default_density() {
        let analysis: ImageAnalysis = serde_json::from_str("{}").unwrap();
        assert!(analysis.color_palette.is_none());
        assert!((analysis.layout_patterns.avg_elements_per_slide - 1.0).abs() < 1e-9);
        assert_eq!(analysis.layout_patterns.element_count_variance, 0.0);
    }

    #[test]
    fn test_missing_file_error() {
        let err = TemplateAnalysis::from_file("/nonexistent/template_analysis.json").unwrap_err();
        assert_eq!(err.code(), "DSN001");
    }

    #[test]
    fn test_malformed_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = TemplateAnalysis::from_file(&path).unwrap_err();
        assert_eq!(err.code(), "DSN002");
    }
}
