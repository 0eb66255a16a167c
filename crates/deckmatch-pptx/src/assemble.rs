//! Slide assembly: mapping resolved content onto template layouts.
//!
//! Each configured slide moves through the same pipeline: pick its
//! layout (an unknown layout falls back to the default, never fails),
//! run its text through the substitution pass, bind resolved values to
//! placeholders, and stamp the design's typography and colors on every
//! run. Failures degrade at the smallest useful granularity: a missing
//! path skips one binding, a styling failure leaves one shape unstyled,
//! and only a substitution engine failure skips a whole slide.

use crate::deck::{
    AssembledDeck, AssembledSlide, AssemblyWarning, BoundBody, BoundContent, TextStyle,
};
use crate::layout::LayoutInfo;
use crate::subst::Substitutor;
use crate::template::PptxTemplate;
use deckmatch_content::{resolve, ContentType, MappingSet, PlaceholderMapping, SlideConfig};
use deckmatch_design::{DesignSpecification, SizeTier};
use log::warn;
use serde_json::Value;

/// Assembles slides from a design specification, a template, and a
/// mapping set. All three are read-only; one assembler can process any
/// number of content records.
pub struct SlideAssembler<'a> {
    design: &'a DesignSpecification,
    template: &'a PptxTemplate,
    mappings: &'a MappingSet,
    subst: Substitutor,
}

impl<'a> SlideAssembler<'a> {
    /// Create an assembler
    pub fn new(
        design: &'a DesignSpecification,
        template: &'a PptxTemplate,
        mappings: &'a MappingSet,
    ) -> Self {
        Self {
            design,
            template,
            mappings,
            subst: Substitutor::new(),
        }
    }

    /// Assemble every configured slide against a content record.
    pub fn assemble(&self, record: &Value) -> AssembledDeck {
        let mut deck = AssembledDeck::default();

        for config in &self.mappings.slides {
            if let Some(slide) = self.assemble_slide(config, record, &mut deck.warnings) {
                deck.slides.push(slide);
            }
        }

        deck
    }

    /// Resolve a layout by name, falling back to the default (first)
    /// layout when the name is unknown.
    pub fn select_layout_by_name(&self, name: &str) -> Option<&LayoutInfo> {
        if let Some(layout) = self.template.layout_by_name(name) {
            return Some(layout);
        }
        warn!("layout '{name}' not found, using default");
        self.template.layouts().first()
    }

    fn assemble_slide(
        &self,
        config: &SlideConfig,
        record: &Value,
        warnings: &mut Vec<AssemblyWarning>,
    ) -> Option<AssembledSlide> {
        let layout = match self.template.layout_at(config.layout_index) {
            Some(layout) => layout,
            None => {
                warn!(
                    "layout index {} not in template, using default",
                    config.layout_index
                );
                warnings.push(AssemblyWarning::new(
                    &config.slide_key,
                    format!(
                        "layout index {} not in template, using default",
                        config.layout_index
                    ),
                ));
                match self.template.layouts().first() {
                    Some(layout) => layout,
                    None => {
                        warnings.push(AssemblyWarning::new(
                            &config.slide_key,
                            "template has no layouts, slide skipped",
                        ));
                        return None;
                    }
                }
            }
        };

        if resolve(record, &config.data_path()).is_none() {
            warnings.push(AssemblyWarning::new(
                &config.slide_key,
                format!("Missing slide data for: {}", config.slide_key),
            ));
        }

        let mut bindings = Vec::new();
        for mapping in &config.placeholders {
            let Some(value) = resolve(record, &mapping.path) else {
                warnings.push(AssemblyWarning::new(
                    &config.slide_key,
                    format!("Missing data for path: {}", mapping.path),
                ));
                continue;
            };

            let Some(target) = locate_placeholder(layout, mapping) else {
                warnings.push(AssemblyWarning::new(
                    &config.slide_key,
                    format!(
                        "layout '{}' has no placeholder for {:?} content (index {})",
                        layout.name, mapping.content_type, mapping.placeholder_index
                    ),
                ));
                continue;
            };

            let body = match self.bind_body(mapping, value, record) {
                Ok(body) => body,
                Err(err) => {
                    // A substitution engine failure aborts this slide only
                    warn!("skipping slide '{}': {err}", config.slide_key);
                    warnings.push(AssemblyWarning::new(
                        &config.slide_key,
                        format!("substitution failed, slide skipped: {err}"),
                    ));
                    return None;
                }
            };

            let style = self.style_for(mapping.content_type, &config.slide_key, warnings);

            bindings.push(BoundContent {
                placeholder_index: target,
                content_type: mapping.content_type,
                body,
                style,
            });
        }

        Some(AssembledSlide {
            key: config.slide_key.clone(),
            layout_index: layout.index,
            layout_name: layout.name.clone(),
            background: self.design.background_fill(),
            bindings,
        })
    }

    /// Turn a resolved value into bound content, substituting text
    /// fields where the mapping enables it.
    fn bind_body(
        &self,
        mapping: &PlaceholderMapping,
        value: &Value,
        record: &Value,
    ) -> Result<BoundBody, minijinja::Error> {
        let render = |text: String| -> Result<String, minijinja::Error> {
            if mapping.substitution {
                self.subst.render(&text, record)
            } else {
                Ok(text)
            }
        };

        match mapping.content_type {
            ContentType::BulletList => match value.as_array() {
                Some(items) => {
                    let mut paragraphs = Vec::with_capacity(items.len());
                    for item in items {
                        paragraphs.push(render(scalar_text(item))?);
                    }
                    Ok(BoundBody::Paragraphs(paragraphs))
                }
                None => Ok(BoundBody::Paragraphs(vec![render(scalar_text(value))?])),
            },
            ContentType::Table => match value.as_array() {
                Some(rows) => {
                    let mut table = Vec::with_capacity(rows.len());
                    for row in rows {
                        let cells = match row.as_array() {
                            Some(cells) => cells.iter().map(scalar_text).collect(),
                            None => vec![scalar_text(row)],
                        };
                        let mut rendered = Vec::with_capacity(cells.len());
                        for cell in cells {
                            rendered.push(render(cell)?);
                        }
                        table.push(rendered);
                    }
                    Ok(BoundBody::Table(table))
                }
                None => Ok(BoundBody::Paragraphs(vec![render(scalar_text(value))?])),
            },
            ContentType::Image => Ok(BoundBody::ImageRef(render(scalar_text(value))?)),
            ContentType::Text | ContentType::Title | ContentType::Subtitle => {
                Ok(BoundBody::Paragraphs(vec![render(scalar_text(value))?]))
            }
        }
    }

    /// Style for a content type: the tier's point size, the design's
    /// font family, and the dark text color. A color that fails to
    /// parse logs and leaves the shape unstyled.
    fn style_for(
        &self,
        content_type: ContentType,
        slide_key: &str,
        warnings: &mut Vec<AssemblyWarning>,
    ) -> Option<TextStyle> {
        if content_type == ContentType::Image {
            return None;
        }

        let tier = match content_type {
            ContentType::Title => SizeTier::Title,
            ContentType::Subtitle => SizeTier::Heading,
            _ => SizeTier::Body,
        };

        match self.design.text_dark() {
            Ok(color) => Some(TextStyle {
                font_family: self.design.primary_font().to_string(),
                size_pt: self.design.tier_size(tier),
                color,
            }),
            Err(err) => {
                warn!("could not style shape on '{slide_key}': {err}");
                warnings.push(AssemblyWarning::new(
                    slide_key,
                    format!("could not apply styling: {err}"),
                ));
                None
            }
        }
    }
}

/// Text form of a scalar value; containers fall back to compact JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Find the placeholder a mapping writes to: by kind for the named
/// roles, by index for everything else, with the layout's first body
/// placeholder as the last resort for content.
fn locate_placeholder(layout: &LayoutInfo, mapping: &PlaceholderMapping) -> Option<u32> {
    let found = match mapping.content_type {
        ContentType::Title => layout
            .title_placeholder()
            .or_else(|| layout.by_index(mapping.placeholder_index)),
        ContentType::Subtitle => layout
            .subtitle_placeholder()
            .or_else(|| layout.by_index(mapping.placeholder_index)),
        ContentType::Image => layout
            .picture_placeholder()
            .or_else(|| layout.by_index(mapping.placeholder_index)),
        _ => layout
            .by_index(mapping.placeholder_index)
            .or_else(|| layout.body_placeholder()),
    };
    found.map(|p| p.index)
}
