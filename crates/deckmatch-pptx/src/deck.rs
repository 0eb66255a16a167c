//! Populated slide structures.
//!
//! An `AssembledDeck` is what the assembly stage hands to the writer:
//! per-slide placeholder bindings with their styled text, plus the
//! diagnostics collected along the way. Nothing here touches the
//! container format.

use deckmatch_content::ContentType;
use deckmatch_design::Rgb;
use serde::{Deserialize, Serialize};

/// An ordered set of populated slides
#[derive(Debug, Clone, Default)]
pub struct AssembledDeck {
    /// Slides in configuration order (skipped slides are absent)
    pub slides: Vec<AssembledSlide>,

    /// Per-run diagnostics for everything that degraded
    pub warnings: Vec<AssemblyWarning>,
}

impl AssembledDeck {
    /// The number of slides that made it through assembly
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether no slide was assembled
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// A note about something that degraded during assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyWarning {
    /// Slide key the warning belongs to
    pub slide_key: String,

    /// What happened
    pub message: String,
}

impl AssemblyWarning {
    /// Create a warning for a slide
    pub fn new(slide_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            slide_key: slide_key.into(),
            message: message.into(),
        }
    }
}

/// One populated slide
#[derive(Debug, Clone)]
pub struct AssembledSlide {
    /// The slide key from the mapping configuration
    pub key: String,

    /// 0-based layout position the slide was bound against
    pub layout_index: u32,

    /// Layout name, for diagnostics and the writer
    pub layout_name: String,

    /// Explicit background fill, when the design sets one
    pub background: Option<Rgb>,

    /// Placeholder bindings in mapping order
    pub bindings: Vec<BoundContent>,
}

impl AssembledSlide {
    /// The slide's title text, when a title was bound
    pub fn title_text(&self) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.content_type == ContentType::Title)
            .and_then(|b| b.body.first_text())
    }

    /// The binding for a placeholder index, if any
    pub fn binding(&self, placeholder_index: u32) -> Option<&BoundContent> {
        self.bindings
            .iter()
            .find(|b| b.placeholder_index == placeholder_index)
    }
}

/// Resolved content written into one placeholder
#[derive(Debug, Clone)]
pub struct BoundContent {
    /// Placeholder index on the layout
    pub placeholder_index: u32,

    /// The content type this binding carries
    pub content_type: ContentType,

    /// The content itself
    pub body: BoundBody,

    /// Text styling; `None` when styling failed and the shape is left
    /// unstyled
    pub style: Option<TextStyle>,
}

/// The shapes content can take after binding
#[derive(Debug, Clone, PartialEq)]
pub enum BoundBody {
    /// One paragraph per entry, all at indent level 0. For list content
    /// the first paragraph replaces the placeholder's existing text and
    /// the rest are appended in order.
    Paragraphs(Vec<String>),

    /// Table rows of cell text
    Table(Vec<Vec<String>>),

    /// Reference to an external image asset (description only; media is
    /// resolved outside this pipeline)
    ImageRef(String),
}

impl BoundBody {
    /// The first piece of text, when there is one
    pub fn first_text(&self) -> Option<&str> {
        match self {
            Self::Paragraphs(paragraphs) => paragraphs.first().map(String::as_str),
            Self::Table(rows) => rows.first()?.first().map(String::as_str),
            Self::ImageRef(text) => Some(text),
        }
    }
}

/// Font, size, and color applied to every run of a binding
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font family name
    pub font_family: String,

    /// Size in points
    pub size_pt: u32,

    /// Run color
    pub color: Rgb,
}
