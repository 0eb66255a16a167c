//! Merging structural and visual analysis into a design specification.
//!
//! The merger combines what was read out of the template container
//! (theme, canvas size, layout placeholders) with the externally produced
//! palette and density metrics. Every stage degrades on missing input:
//! an absent section of either analysis file leaves the corresponding
//! section of the specification empty and the brand guidelines fall back
//! to their literal defaults.

use crate::analysis::{ImageAnalysis, TemplateAnalysis};
use crate::color::{CategorizedColor, ColorCategory};
use crate::spec::{
    infer_usage_pattern, BrandColors, BrandGuidelines, ColorScheme, DesignElements,
    DesignSpecification, DimensionRecord, FontEntry, LayoutTemplate, PaletteColors, SizeRange,
    SizeScale, SizeTier, Typography, FALLBACK_ACCENT, FALLBACK_PRIMARY, FALLBACK_SECONDARY,
};
use crate::theme::FALLBACK_FONT;
use crate::units::{inches_to_emu, SlideDimensions};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Width values above this are taken to be EMU already; anything smaller
/// is treated as inches.
const EMU_THRESHOLD: f64 = 1000.0;

/// Merges one template's structural and visual analysis
#[derive(Debug)]
pub struct DesignMerger {
    template: TemplateAnalysis,
    image: ImageAnalysis,
}

impl DesignMerger {
    /// Create a merger over the two analysis records
    pub fn new(template: TemplateAnalysis, image: ImageAnalysis) -> Self {
        Self { template, image }
    }

    /// Run the full merge
    pub fn merge(&self) -> DesignSpecification {
        let slide_dimensions = self.merge_dimensions();
        let color_scheme = self.merge_color_scheme();
        let typography = self.merge_typography();
        let layout_templates = self.merge_layouts();
        let design_elements = self.merge_design_elements();
        let brand_guidelines = build_brand_guidelines(color_scheme.as_ref(), typography.as_ref());

        DesignSpecification {
            slide_dimensions,
            color_scheme,
            typography,
            layout_templates,
            design_elements,
            brand_guidelines,
        }
    }

    /// Normalize the canvas size. Values above the threshold are EMU
    /// already; smaller values are inches and get converted.
    fn merge_dimensions(&self) -> Option<DimensionRecord> {
        let raw = self.template.slide_dimensions;
        let (width, height) = (raw.width?, raw.height?);

        let dims = if width > EMU_THRESHOLD {
            SlideDimensions::from_emu(width as i64, height as i64)
        } else {
            SlideDimensions::from_emu(inches_to_emu(width), inches_to_emu(height))
        };

        let record = DimensionRecord::from(dims);
        debug!(
            "slide dimensions: {:.2}\" x {:.2}\" ({})",
            record.width_inches, record.height_inches, record.format
        );
        Some(record)
    }

    /// Bucket the ranked palette and pick brand colors first-match per
    /// bucket, falling back to the literal defaults for empty buckets.
    fn merge_color_scheme(&self) -> Option<ColorScheme> {
        let palette = self.image.color_palette.as_ref()?;

        let mut buckets = ColorBuckets::new();
        for (hex, frequency) in &palette.most_common_colors {
            match CategorizedColor::new(hex, *frequency) {
                Ok(color) => buckets.entry(color.category).or_default().push(color),
                Err(err) => warn!("skipping palette entry: {err}"),
            }
        }

        let brand_colors = BrandColors {
            primary: first_hex(&buckets, ColorCategory::PrimaryGreen, FALLBACK_PRIMARY),
            secondary: first_hex(&buckets, ColorCategory::Light, FALLBACK_SECONDARY),
            accent: first_hex(&buckets, ColorCategory::SecondaryGreen, FALLBACK_ACCENT),
        };

        Some(ColorScheme {
            primary_colors: take(&buckets, ColorCategory::PrimaryGreen, 3),
            secondary_colors: take(&buckets, ColorCategory::SecondaryGreen, 3),
            neutral_colors: take(&buckets, ColorCategory::Neutral, 3),
            light_colors: take(&buckets, ColorCategory::Light, 3),
            dark_colors: take(&buckets, ColorCategory::Dark, 3),
            accent_colors: take(&buckets, ColorCategory::Accent, 2),
            total_unique_colors: palette.total_unique_colors,
            color_consistency: palette.color_consistency,
            dominant_color_family: "green".to_string(),
            brand_colors,
        })
    }

    /// Resolve the template fonts and bind them to the fixed size scale.
    fn merge_typography(&self) -> Option<Typography> {
        let fonts = self.template.font_scheme.as_ref()?;

        let major = fonts.resolve_major();
        let minor = fonts.resolve_minor();

        let (primary, families) = match (major, minor) {
            (None, None) => (FALLBACK_FONT.to_string(), vec![FALLBACK_FONT.to_string()]),
            (Some(major), Some(minor)) if major != minor => (
                major.to_string(),
                vec![major.to_string(), minor.to_string()],
            ),
            (major, minor) => {
                let family = major.or(minor).unwrap_or(FALLBACK_FONT).to_string();
                (family.clone(), vec![family])
            }
        };

        let sizes = SizeScale::default();
        let mut hierarchy = BTreeMap::new();
        let mut all_sizes = Vec::new();
        for tier in SizeTier::all() {
            let size = sizes.for_tier(tier);
            hierarchy.insert(
                tier.name().to_string(),
                vec![FontEntry {
                    name: primary.clone(),
                    size,
                    size_pt: size,
                }],
            );
            all_sizes.push(size);
        }

        Some(Typography {
            primary_font_family: primary,
            font_families: families,
            total_font_variations: all_sizes.len(),
            size_range: SizeRange {
                min: all_sizes.iter().copied().min().unwrap_or(12),
                max: all_sizes.iter().copied().max().unwrap_or(44),
            },
            font_hierarchy: hierarchy,
            recommended_sizes: sizes,
        })
    }

    /// Build per-layout placeholder histograms and infer usage patterns.
    fn merge_layouts(&self) -> BTreeMap<String, LayoutTemplate> {
        let mut templates = BTreeMap::new();

        for layout in &self.template.layouts {
            let mut types: BTreeMap<String, u32> = BTreeMap::new();
            for placeholder in &layout.placeholders {
                *types.entry(placeholder.kind.clone()).or_insert(0) += 1;
            }

            let usage_pattern = infer_usage_pattern(&types);
            templates.insert(
                layout.name.clone(),
                LayoutTemplate {
                    name: layout.name.clone(),
                    placeholder_count: layout.placeholders.len(),
                    placeholder_types: types,
                    placeholders: layout.placeholders.clone(),
                    usage_pattern,
                },
            );
        }

        templates
    }

    /// Aggregate density metrics into design elements.
    fn merge_design_elements(&self) -> DesignElements {
        let patterns = &self.image.layout_patterns;
        let avg = patterns.avg_elements_per_slide;

        DesignElements {
            slide_count: self.template.slides.len(),
            average_elements_per_slide: avg,
            layout_consistency: patterns.element_count_variance,
            content_density: if avg < 3.0 { "low" } else { "medium" }.to_string(),
            ..DesignElements::default()
        }
    }
}

type ColorBuckets = BTreeMap<ColorCategory, Vec<CategorizedColor>>;

/// First color in a bucket by input order, or the fallback literal.
fn first_hex(buckets: &ColorBuckets, category: ColorCategory, fallback: &str) -> String {
    buckets
        .get(&category)
        .and_then(|colors| colors.first())
        .map(|c| c.hex.clone())
        .unwrap_or_else(|| fallback.to_string())
}

/// Up to `n` colors from a bucket, preserving input order.
fn take(buckets: &ColorBuckets, category: ColorCategory, n: usize) -> Vec<CategorizedColor> {
    buckets
        .get(&category)
        .map(|colors| colors[..colors.len().min(n)].to_vec())
        .unwrap_or_default()
}

/// Fold the merged scheme and typography into the brand contract.
fn build_brand_guidelines(
    scheme: Option<&ColorScheme>,
    typography: Option<&Typography>,
) -> BrandGuidelines {
    let brand = scheme.map(|s| s.brand_colors.clone()).unwrap_or_default();
    let font_family = typography
        .map(|t| t.primary_font_family.clone())
        .unwrap_or_else(|| FALLBACK_FONT.to_string());
    let typography_scale = typography
        .map(|t| t.recommended_sizes)
        .unwrap_or_default();

    BrandGuidelines {
        color_palette: PaletteColors {
            primary: brand.primary,
            secondary: brand.secondary,
            accent: brand.accent,
            ..PaletteColors::default()
        },
        typography_scale,
        font_family,
        ..BrandGuidelines::default()
    }
}
