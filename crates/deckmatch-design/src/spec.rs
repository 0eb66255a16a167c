//! The merged design specification.
//!
//! A `DesignSpecification` is built once per template by the merge stage
//! and treated as read-only afterwards: the assembly stage and the
//! reduced generator config are both derived from it. Sections that the
//! merge could not populate (no palette, no font scheme, no size
//! element) serialize as empty records rather than being omitted.

use crate::analysis::PlaceholderAnalysis;
use crate::color::{CategorizedColor, Rgb};
use crate::error::Result;
use crate::units::{SlideDimensions, DEFAULT_SLIDE_HEIGHT_EMU, DEFAULT_SLIDE_WIDTH_EMU};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

/// Brand color used when no palette entry lands in the primary bucket
pub const FALLBACK_PRIMARY: &str = "#456446";

/// Brand color used when no palette entry lands in the light bucket
pub const FALLBACK_SECONDARY: &str = "#e7f3ec";

/// Brand color used when no palette entry lands in the secondary bucket
pub const FALLBACK_ACCENT: &str = "#6f8770";

/// Dark text color applied to every styled run
pub const TEXT_DARK: &str = "#2d4a2e";

/// Light text color for dark surfaces
pub const TEXT_LIGHT: &str = "#ffffff";

/// Default slide background
pub const BACKGROUND: &str = "#ffffff";

/// The complete merged design specification for one template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignSpecification {
    #[serde(
        serialize_with = "none_as_empty_map",
        deserialize_with = "empty_map_as_none",
        default
    )]
    pub slide_dimensions: Option<DimensionRecord>,

    #[serde(
        serialize_with = "none_as_empty_map",
        deserialize_with = "empty_map_as_none",
        default
    )]
    pub color_scheme: Option<ColorScheme>,

    #[serde(
        serialize_with = "none_as_empty_map",
        deserialize_with = "empty_map_as_none",
        default
    )]
    pub typography: Option<Typography>,

    #[serde(default)]
    pub layout_templates: BTreeMap<String, LayoutTemplate>,

    #[serde(default)]
    pub design_elements: DesignElements,

    #[serde(default)]
    pub brand_guidelines: BrandGuidelines,
}

/// Slide dimensions in both units plus the derived ratio and label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRecord {
    pub width_inches: f64,
    pub width_emu: i64,
    pub height_inches: f64,
    pub height_emu: i64,
    pub aspect_ratio: f64,
    pub format: String,
}

impl From<SlideDimensions> for DimensionRecord {
    fn from(dims: SlideDimensions) -> Self {
        Self {
            width_inches: dims.width_inches(),
            width_emu: dims.width_emu,
            height_inches: dims.height_inches(),
            height_emu: dims.height_emu,
            aspect_ratio: dims.aspect_ratio(),
            format: dims.format_label().to_string(),
        }
    }
}

impl DimensionRecord {
    /// The EMU dimensions this record was derived from
    pub fn dimensions(&self) -> SlideDimensions {
        SlideDimensions::from_emu(self.width_emu, self.height_emu)
    }
}

/// Categorized palette with named brand colors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary_colors: Vec<CategorizedColor>,
    pub secondary_colors: Vec<CategorizedColor>,
    pub neutral_colors: Vec<CategorizedColor>,
    pub light_colors: Vec<CategorizedColor>,
    pub dark_colors: Vec<CategorizedColor>,
    pub accent_colors: Vec<CategorizedColor>,
    pub total_unique_colors: u64,
    pub color_consistency: f64,
    pub dominant_color_family: String,
    pub brand_colors: BrandColors,
}

/// First-match-per-bucket brand colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        Self {
            primary: FALLBACK_PRIMARY.to_string(),
            secondary: FALLBACK_SECONDARY.to_string(),
            accent: FALLBACK_ACCENT.to_string(),
        }
    }
}

/// Resolved fonts bound to the fixed size scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Typography {
    pub primary_font_family: String,
    pub font_families: Vec<String>,
    pub font_hierarchy: BTreeMap<String, Vec<FontEntry>>,
    pub total_font_variations: usize,
    pub size_range: SizeRange,
    pub recommended_sizes: SizeScale,
}

/// One font binding in the hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontEntry {
    pub name: String,
    pub size: u32,
    pub size_pt: u32,
}

/// Smallest and largest sizes in the scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: u32,
    pub max: u32,
}

/// The fixed five-tier point-size scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeScale {
    pub title: u32,
    pub heading: u32,
    pub subheading: u32,
    pub body: u32,
    pub caption: u32,
}

impl Default for SizeScale {
    fn default() -> Self {
        Self {
            title: 44,
            heading: 32,
            subheading: 24,
            body: 18,
            caption: 14,
        }
    }
}

/// Named tiers of the size scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeTier {
    Title,
    Heading,
    Subheading,
    Body,
    Caption,
}

impl SizeTier {
    /// Tier name as used in hierarchy keys
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Heading => "heading",
            Self::Subheading => "subheading",
            Self::Body => "body",
            Self::Caption => "caption",
        }
    }

    /// All tiers in scale order, largest first
    pub fn all() -> [SizeTier; 5] {
        [
            Self::Title,
            Self::Heading,
            Self::Subheading,
            Self::Body,
            Self::Caption,
        ]
    }
}

impl SizeScale {
    /// Point size for a tier
    pub fn for_tier(&self, tier: SizeTier) -> u32 {
        match tier {
            SizeTier::Title => self.title,
            SizeTier::Heading => self.heading,
            SizeTier::Subheading => self.subheading,
            SizeTier::Body => self.body,
            SizeTier::Caption => self.caption,
        }
    }
}

/// One layout's placeholder histogram and inferred usage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutTemplate {
    pub name: String,
    pub placeholder_count: usize,
    pub placeholder_types: BTreeMap<String, u32>,
    pub placeholders: Vec<PlaceholderAnalysis>,
    pub usage_pattern: UsagePattern,
}

/// What a layout is used for, inferred from its placeholder histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsagePattern {
    TitleSlide,
    ContentSlide,
    ImageSlide,
    MultiContent,
    Custom,
}

/// Classify a placeholder-type histogram. First matching rule wins:
/// title slide, content slide, image slide, multi-content, custom.
pub fn infer_usage_pattern(types: &BTreeMap<String, u32>) -> UsagePattern {
    let has = |name: &str| types.get(name).copied().unwrap_or(0) > 0;

    if has("TITLE") && has("SUBTITLE") {
        UsagePattern::TitleSlide
    } else if has("TITLE") && has("BODY") {
        UsagePattern::ContentSlide
    } else if has("TITLE") && has("PICTURE") {
        UsagePattern::ImageSlide
    } else if types.get("BODY").copied().unwrap_or(0) > 1 {
        UsagePattern::MultiContent
    } else {
        UsagePattern::Custom
    }
}

/// Aggregate layout metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignElements {
    pub slide_count: usize,
    pub average_elements_per_slide: f64,
    pub layout_consistency: f64,
    pub design_style: String,
    pub visual_hierarchy: String,
    pub content_density: String,
}

impl Default for DesignElements {
    fn default() -> Self {
        Self {
            slide_count: 0,
            average_elements_per_slide: 1.0,
            layout_consistency: 0.0,
            design_style: "professional_academic".to_string(),
            visual_hierarchy: "clean_minimal".to_string(),
            content_density: "low".to_string(),
        }
    }
}

/// The distilled brand contract the assembly stage styles against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandGuidelines {
    pub theme: String,
    pub color_palette: PaletteColors,
    pub typography_scale: SizeScale,
    pub font_family: String,
    pub design_principles: Vec<String>,
    pub usage_guidelines: UsageGuidelines,
}

impl Default for BrandGuidelines {
    fn default() -> Self {
        Self {
            theme: "Scientific Conference - Green Nature Theme".to_string(),
            color_palette: PaletteColors::default(),
            typography_scale: SizeScale::default(),
            font_family: crate::theme::FALLBACK_FONT.to_string(),
            design_principles: default_design_principles(),
            usage_guidelines: UsageGuidelines::default(),
        }
    }
}

/// The six named colors of the brand palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text_dark: String,
    pub text_light: String,
    pub background: String,
}

impl Default for PaletteColors {
    fn default() -> Self {
        Self {
            primary: FALLBACK_PRIMARY.to_string(),
            secondary: FALLBACK_SECONDARY.to_string(),
            accent: FALLBACK_ACCENT.to_string(),
            text_dark: TEXT_DARK.to_string(),
            text_light: TEXT_LIGHT.to_string(),
            background: BACKGROUND.to_string(),
        }
    }
}

/// Prose guidance attached to the brand palette
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageGuidelines {
    pub primary_color_usage: String,
    pub secondary_color_usage: String,
    pub font_pairing: String,
    pub layout_spacing: String,
    pub image_treatment: String,
}

impl Default for UsageGuidelines {
    fn default() -> Self {
        Self {
            primary_color_usage: "Headers, important text, accent elements".to_string(),
            secondary_color_usage: "Backgrounds, subtle highlights".to_string(),
            font_pairing: "Use Gothic A1 family for consistency".to_string(),
            layout_spacing: "Maintain generous white space".to_string(),
            image_treatment: "Clean, professional imagery with green tints".to_string(),
        }
    }
}

pub(crate) fn default_design_principles() -> Vec<String> {
    [
        "Clean and minimal layout",
        "Nature-inspired green color scheme",
        "Professional academic presentation style",
        "Consistent typography hierarchy",
        "Balanced white space usage",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl DesignSpecification {
    /// Load a previously saved specification from JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                crate::error::DesignError::missing_input(path.display().to_string())
            } else {
                crate::error::DesignError::IoError(e)
            }
        })?;
        serde_json::from_str(&text)
            .map_err(|e| crate::error::DesignError::malformed(path.display().to_string(), &e))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Slide dimensions, falling back to the standard 4:3 canvas
    pub fn dimensions_or_default(&self) -> SlideDimensions {
        self.slide_dimensions
            .as_ref()
            .map(DimensionRecord::dimensions)
            .unwrap_or(SlideDimensions {
                width_emu: DEFAULT_SLIDE_WIDTH_EMU,
                height_emu: DEFAULT_SLIDE_HEIGHT_EMU,
            })
    }

    /// The font family every styled run uses
    pub fn primary_font(&self) -> &str {
        &self.brand_guidelines.font_family
    }

    /// Point size for a scale tier
    pub fn tier_size(&self, tier: SizeTier) -> u32 {
        self.brand_guidelines.typography_scale.for_tier(tier)
    }

    /// The dark text color, parsed from the brand palette
    pub fn text_dark(&self) -> Result<Rgb> {
        Rgb::from_hex(&self.brand_guidelines.color_palette.text_dark)
    }

    /// Background fill, only when explicitly set and not pure white
    pub fn background_fill(&self) -> Option<Rgb> {
        let hex = &self.brand_guidelines.color_palette.background;
        let rgb = Rgb::from_hex(hex).ok()?;
        if rgb == Rgb(0xff, 0xff, 0xff) {
            None
        } else {
            Some(rgb)
        }
    }

    /// Find a layout template by name
    pub fn layout(&self, name: &str) -> Option<&LayoutTemplate> {
        self.layout_templates.get(name)
    }

    /// Derive the reduced configuration the assembly stage consumes
    pub fn generator_config(&self) -> GeneratorConfig {
        let dims = self.dimensions_or_default();
        GeneratorConfig {
            slide_dimensions: GeneratorDimensions {
                width: dims.width_emu,
                height: dims.height_emu,
            },
            colors: GeneratorColors {
                primary: self.brand_guidelines.color_palette.primary.clone(),
                secondary: self.brand_guidelines.color_palette.secondary.clone(),
                accent: self.brand_guidelines.color_palette.accent.clone(),
                text_dark: self.brand_guidelines.color_palette.text_dark.clone(),
                text_light: self.brand_guidelines.color_palette.text_light.clone(),
            },
            fonts: GeneratorFonts {
                primary: self.brand_guidelines.font_family.clone(),
                sizes: self.brand_guidelines.typography_scale,
            },
            layouts: self.layout_templates.clone(),
        }
    }
}

/// The reduced configuration written as `enhanced_template_config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub slide_dimensions: GeneratorDimensions,
    pub colors: GeneratorColors,
    pub fonts: GeneratorFonts,
    pub layouts: BTreeMap<String, LayoutTemplate>,
}

/// Canvas size in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorDimensions {
    pub width: i64,
    pub height: i64,
}

/// The five named colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text_dark: String,
    pub text_light: String,
}

/// Font family plus the size map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorFonts {
    pub primary: String,
    pub sizes: SizeScale,
}

/// Serialize `None` as an empty JSON object so unpopulated sections stay
/// visible in the output.
fn none_as_empty_map<S, T>(value: &Option<T>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => BTreeMap::<String, ()>::new().serialize(serializer),
    }
}

/// Accept either a populated section or an empty object for `None`.
fn empty_map_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.as_object().is_some_and(|m| m.is_empty()) || value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_usage_pattern_priority() {
        assert_eq!(
            infer_usage_pattern(&histogram(&[("TITLE", 1), ("SUBTITLE", 1)])),
            UsagePattern::TitleSlide
        );
        assert_eq!(
            infer_usage_pattern(&histogram(&[("TITLE", 1), ("BODY", 1)])),
            UsagePattern::ContentSlide
        );
        assert_eq!(
            infer_usage_pattern(&histogram(&[("TITLE", 1), ("PICTURE", 1)])),
            UsagePattern::ImageSlide
        );
        assert_eq!(
            infer_usage_pattern(&histogram(&[("BODY", 2)])),
            UsagePattern::MultiContent
        );
        assert_eq!(
            infer_usage_pattern(&histogram(&[("FOOTER", 1)])),
            UsagePattern::Custom
        );
    }

    #[test]
    fn test_title_rule_beats_multi_content() {
        // TITLE+SUBTITLE wins even when the layout also has two bodies
        let types = histogram(&[("TITLE", 1), ("SUBTITLE", 1), ("BODY", 2)]);
        assert_eq!(infer_usage_pattern(&types), UsagePattern::TitleSlide);
    }

    #[test]
    fn test_default_size_scale() {
        let scale = SizeScale::default();
        assert_eq!(scale.title, 44);
        assert_eq!(scale.heading, 32);
        assert_eq!(scale.subheading, 24);
        assert_eq!(scale.body, 18);
        assert_eq!(scale.caption, 14);
        assert_eq!(scale.for_tier(SizeTier::Body), 18);
    }

    #[test]
    fn test_empty_sections_serialize_as_empty_maps() {
        let spec = DesignSpecification::default();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["slide_dimensions"], serde_json::json!({}));
        assert_eq!(json["color_scheme"], serde_json::json!({}));
        assert_eq!(json["typography"], serde_json::json!({}));

        // And round-trip back to None
        let parsed: DesignSpecification = serde_json::from_value(json).unwrap();
        assert!(parsed.slide_dimensions.is_none());
        assert!(parsed.color_scheme.is_none());
        assert!(parsed.typography.is_none());
    }

    #[test]
    fn test_dimension_record_round_trip() {
        let dims = SlideDimensions::from_emu(12_192_000, 6_858_000);
        let record = DimensionRecord::from(dims);
        assert_eq!(record.format, "Widescreen (16:9)");
        assert_eq!(record.dimensions(), dims);
    }

    #[test]
    fn test_background_fill_white_is_skipped() {
        let spec = DesignSpecification::default();
        assert!(spec.background_fill().is_none());

        let mut spec = DesignSpecification::default();
        spec.brand_guidelines.color_palette.background = "#e7f3ec".to_string();
        assert_eq!(spec.background_fill(), Some(Rgb(0xe7, 0xf3, 0xec)));
    }

    #[test]
    fn test_generator_config_shape() {
        let spec = DesignSpecification::default();
        let config = spec.generator_config();

        assert_eq!(config.slide_dimensions.width, 9_144_000);
        assert_eq!(config.colors.primary, FALLBACK_PRIMARY);
        assert_eq!(config.colors.text_dark, TEXT_DARK);
        assert_eq!(config.fonts.sizes.title, 44);

        let json = serde_json::to_value(&config).unwrap();
        assert!(json["colors"].get("background").is_none());
    }
}
