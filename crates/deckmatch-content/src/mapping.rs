//! Declarative placeholder-mapping configuration.
//!
//! A `MappingSet` describes, for each logical slide, which placeholder
//! receives which content type from which dotted path in the content
//! record. Sets are built once (from TOML or the built-in defaults) and
//! never mutated during a run. Placeholder and layout indices are only
//! meaningful relative to one specific template.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The closed set of content types a placeholder can receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    BulletList,
    Table,
    Image,
    Title,
    Subtitle,
}

impl ContentType {
    /// Whether the resolved value must be a sequence
    pub fn requires_list(self) -> bool {
        matches!(self, Self::BulletList | Self::Table)
    }
}

/// Configuration for a single placeholder mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderMapping {
    /// Placeholder index within the slide's layout
    pub placeholder_index: u32,

    /// What kind of content this placeholder receives
    pub content_type: ContentType,

    /// Dotted path into the content record
    /// (e.g. "presentation_data.title_slide.title")
    pub path: String,

    /// Run the resolved text through the substitution pass
    #[serde(default = "default_true")]
    pub substitution: bool,

    /// Optional formatting overrides, passed through to the assembly stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting: Option<serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl PlaceholderMapping {
    /// Create a mapping with substitution enabled and no overrides
    pub fn new(placeholder_index: u32, content_type: ContentType, path: impl Into<String>) -> Self {
        Self {
            placeholder_index,
            content_type,
            path: path.into(),
            substitution: true,
            formatting: None,
        }
    }
}

/// Configuration for a single slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideConfig {
    /// Key of this slide's block under `presentation_data`
    pub slide_key: String,

    /// Layout index within the template (0-based)
    pub layout_index: u32,

    /// Ordered placeholder mappings
    pub placeholders: Vec<PlaceholderMapping>,

    /// Path to the slide's own title, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_path: Option<String>,
}

impl SlideConfig {
    /// The path to this slide's data block in the content record
    pub fn data_path(&self) -> String {
        format!("presentation_data.{}", self.slide_key)
    }
}

/// The full, ordered set of slide configurations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingSet {
    #[serde(rename = "slide", default)]
    pub slides: Vec<SlideConfig>,
}

impl MappingSet {
    /// Load a mapping set from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a mapping set from a TOML string
    pub fn parse(toml_content: &str) -> Result<Self> {
        let set: MappingSet = toml::from_str(toml_content)?;
        Ok(set)
    }

    /// Get the configuration for a slide key
    pub fn get(&self, slide_key: &str) -> Option<&SlideConfig> {
        self.slides.iter().find(|c| c.slide_key == slide_key)
    }

    /// All configured slide keys, in order
    pub fn keys(&self) -> Vec<&str> {
        self.slides.iter().map(|c| c.slide_key.as_str()).collect()
    }

    /// Add or replace the configuration for a slide key
    pub fn upsert(&mut self, config: SlideConfig) {
        match self
            .slides
            .iter_mut()
            .find(|c| c.slide_key == config.slide_key)
        {
            Some(existing) => *existing = config,
            None => self.slides.push(config),
        }
    }

    /// The built-in default set: a title slide, a bulleted benefits
    /// slide with an image, and a table-backed impact slide.
    pub fn default_set() -> Self {
        Self {
            slides: vec![
                SlideConfig {
                    slide_key: "title_slide".to_string(),
                    layout_index: 0,
                    placeholders: vec![
                        PlaceholderMapping::new(
                            0,
                            ContentType::Title,
                            "presentation_data.title_slide.title",
                        ),
                        PlaceholderMapping::new(
                            1,
                            ContentType::Subtitle,
                            "presentation_data.title_slide.subtitle",
                        ),
                    ],
                    title_path: Some("presentation_data.title_slide.title".to_string()),
                },
                SlideConfig {
                    slide_key: "benefits_slide".to_string(),
                    layout_index: 1,
                    placeholders: vec![
                        PlaceholderMapping::new(
                            0,
                            ContentType::Title,
                            "presentation_data.benefits_slide.slide_title",
                        ),
                        PlaceholderMapping::new(
                            1,
                            ContentType::BulletList,
                            "presentation_data.benefits_slide.text_body",
                        ),
                        PlaceholderMapping::new(
                            2,
                            ContentType::Image,
                            "presentation_data.benefits_slide.image_description",
                        ),
                    ],
                    title_path: Some("presentation_data.benefits_slide.slide_title".to_string()),
                },
                SlideConfig {
                    slide_key: "impact_slide".to_string(),
                    layout_index: 1,
                    placeholders: vec![
                        PlaceholderMapping::new(
                            0,
                            ContentType::Title,
                            "presentation_data.impact_slide.slide_title",
                        ),
                        PlaceholderMapping::new(
                            1,
                            ContentType::Table,
                            "presentation_data.impact_slide.table_data",
                        ),
                    ],
                    title_path: Some("presentation_data.impact_slide.slide_title".to_string()),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_shape() {
        let set = MappingSet::default_set();

        assert_eq!(set.keys(), vec!["title_slide", "benefits_slide", "impact_slide"]);

        let title = set.get("title_slide").unwrap();
        assert_eq!(title.layout_index, 0);
        assert_eq!(title.placeholders.len(), 2);
        assert_eq!(title.placeholders[0].content_type, ContentType::Title);
        assert_eq!(title.data_path(), "presentation_data.title_slide");

        let impact = set.get("impact_slide").unwrap();
        assert_eq!(impact.placeholders[1].content_type, ContentType::Table);
        assert_eq!(
            impact.placeholders[1].path,
            "presentation_data.impact_slide.table_data"
        );
    }

    #[test]
    fn test_get_unknown_key() {
        let set = MappingSet::default_set();
        assert!(set.get("nope").is_none());
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let mut set = MappingSet::default_set();
        let replacement = SlideConfig {
            slide_key: "title_slide".to_string(),
            layout_index: 5,
            placeholders: vec![],
            title_path: None,
        };
        set.upsert(replacement);

        assert_eq!(set.slides.len(), 3);
        assert_eq!(set.get("title_slide").unwrap().layout_index, 5);
    }

    #[test]
    fn test_upsert_appends_new() {
        let mut set = MappingSet::default_set();
        set.upsert(SlideConfig {
            slide_key: "summary_slide".to_string(),
            layout_index: 2,
            placeholders: vec![],
            title_path: None,
        });
        assert_eq!(set.slides.len(), 4);
        assert!(set.get("summary_slide").is_some());
    }

    #[test]
    fn test_parse_toml_mapping() {
        let toml = r#"
[[slide]]
slide_key = "title_slide"
layout_index = 0
title_path = "presentation_data.title_slide.title"

[[slide.placeholders]]
placeholder_index = 0
content_type = "title"
path = "presentation_data.title_slide.title"

[[slide.placeholders]]
placeholder_index = 1
content_type = "subtitle"
path = "presentation_data.title_slide.subtitle"
substitution = false
"#;

        let set = MappingSet::parse(toml).unwrap();
        let slide = set.get("title_slide").unwrap();

        assert_eq!(slide.placeholders.len(), 2);
        assert_eq!(slide.placeholders[0].content_type, ContentType::Title);
        assert!(slide.placeholders[0].substitution);
        assert!(!slide.placeholders[1].substitution);
    }

    #[test]
    fn test_content_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&ContentType::BulletList).unwrap(),
            "\"bullet_list\""
        );
        let parsed: ContentType = serde_json::from_str("\"table\"").unwrap();
        assert_eq!(parsed, ContentType::Table);
    }

    #[test]
    fn test_requires_list() {
        assert!(ContentType::BulletList.requires_list());
        assert!(ContentType::Table.requires_list());
        assert!(!ContentType::Text.requires_list());
        assert!(!ContentType::Title.requires_list());
    }
}
