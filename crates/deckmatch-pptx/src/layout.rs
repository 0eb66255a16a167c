//! Slide layouts and placeholder kinds.
//!
//! Layouts are identified by their 0-based position in the template's
//! layout list; placeholder kinds map OOXML `p:ph` type attributes to
//! the names the analysis histogram is keyed on.

use deckmatch_design::analysis::{LayoutAnalysis, PlaceholderAnalysis};
use std::collections::BTreeMap;

/// Types of placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// Title placeholder
    Title,

    /// Center title (title slides)
    CenterTitle,

    /// Subtitle
    Subtitle,

    /// Body content
    Body,

    /// Object content (untyped content placeholders land here too)
    Object,

    /// Date/time
    DateTime,

    /// Footer
    Footer,

    /// Slide number
    SlideNumber,

    /// Chart
    Chart,

    /// Table
    Table,

    /// Diagram/SmartArt
    Diagram,

    /// Media (video/audio)
    Media,

    /// Picture
    Picture,

    /// Other/custom
    Other,
}

impl PlaceholderKind {
    /// Parse from the OOXML `type` attribute. A missing attribute means
    /// a plain content placeholder, which callers pass as "".
    pub fn from_ooxml_type(s: &str) -> Self {
        match s {
            "title" => Self::Title,
            "ctrTitle" => Self::CenterTitle,
            "subTitle" => Self::Subtitle,
            "body" | "" => Self::Body,
            "obj" => Self::Object,
            "dt" => Self::DateTime,
            "ftr" => Self::Footer,
            "sldNum" => Self::SlideNumber,
            "chart" => Self::Chart,
            "tbl" => Self::Table,
            "dgm" => Self::Diagram,
            "media" => Self::Media,
            "pic" => Self::Picture,
            _ => Self::Other,
        }
    }

    /// The OOXML `type` attribute value
    pub fn ooxml_type(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CenterTitle => "ctrTitle",
            Self::Subtitle => "subTitle",
            Self::Body => "body",
            Self::Object => "obj",
            Self::DateTime => "dt",
            Self::Footer => "ftr",
            Self::SlideNumber => "sldNum",
            Self::Chart => "chart",
            Self::Table => "tbl",
            Self::Diagram => "dgm",
            Self::Media => "media",
            Self::Picture => "pic",
            Self::Other => "",
        }
    }

    /// The histogram bucket this kind counts toward. Center titles count
    /// as TITLE and object placeholders as BODY so the usage-pattern
    /// rules see through the OOXML spelling.
    pub fn analysis_name(&self) -> &'static str {
        match self {
            Self::Title | Self::CenterTitle => "TITLE",
            Self::Subtitle => "SUBTITLE",
            Self::Body | Self::Object => "BODY",
            Self::Picture => "PICTURE",
            Self::DateTime => "DATE",
            Self::Footer => "FOOTER",
            Self::SlideNumber => "SLIDE_NUMBER",
            Self::Chart => "CHART",
            Self::Table => "TABLE",
            Self::Diagram => "DIAGRAM",
            Self::Media => "MEDIA",
            Self::Other => "OTHER",
        }
    }

    /// Whether this kind holds a slide title
    pub fn is_title(&self) -> bool {
        matches!(self, Self::Title | Self::CenterTitle)
    }

    /// Whether this kind holds body content
    pub fn is_body(&self) -> bool {
        matches!(self, Self::Body | Self::Object)
    }
}

/// One placeholder slot in a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderRef {
    /// Placeholder index (`idx` attribute)
    pub index: u32,

    /// Placeholder kind
    pub kind: PlaceholderKind,
}

impl PlaceholderRef {
    /// Create a placeholder reference
    pub fn new(index: u32, kind: PlaceholderKind) -> Self {
        Self { index, kind }
    }
}

/// A slide layout from a template
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutInfo {
    /// 0-based position in the template's layout list
    pub index: u32,

    /// Layout name from `p:cSld`
    pub name: String,

    /// Placeholders available in this layout
    pub placeholders: Vec<PlaceholderRef>,
}

impl LayoutInfo {
    /// Create a layout with no placeholders
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            placeholders: Vec::new(),
        }
    }

    /// Create a layout with placeholders
    pub fn with_placeholders(
        index: u32,
        name: impl Into<String>,
        placeholders: Vec<PlaceholderRef>,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            placeholders,
        }
    }

    /// Histogram of placeholder kinds, keyed by analysis name
    pub fn histogram(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for placeholder in &self.placeholders {
            *counts
                .entry(placeholder.kind.analysis_name().to_string())
                .or_insert(0) += 1;
        }
        counts
    }

    /// The title placeholder, if present
    pub fn title_placeholder(&self) -> Option<&PlaceholderRef> {
        self.placeholders.iter().find(|p| p.kind.is_title())
    }

    /// The subtitle placeholder, if present
    pub fn subtitle_placeholder(&self) -> Option<&PlaceholderRef> {
        self.placeholders
            .iter()
            .find(|p| p.kind == PlaceholderKind::Subtitle)
    }

    /// The first body/content placeholder, if present
    pub fn body_placeholder(&self) -> Option<&PlaceholderRef> {
        self.placeholders.iter().find(|p| p.kind.is_body())
    }

    /// The picture placeholder, if present
    pub fn picture_placeholder(&self) -> Option<&PlaceholderRef> {
        self.placeholders
            .iter()
            .find(|p| p.kind == PlaceholderKind::Picture)
    }

    /// Look up a placeholder by its index
    pub fn by_index(&self, index: u32) -> Option<&PlaceholderRef> {
        self.placeholders.iter().find(|p| p.index == index)
    }

    /// The analysis record for this layout
    pub fn to_analysis(&self) -> LayoutAnalysis {
        LayoutAnalysis {
            name: self.name.clone(),
            placeholders: self
                .placeholders
                .iter()
                .map(|p| PlaceholderAnalysis {
                    idx: p.index,
                    kind: p.kind.analysis_name().to_string(),
                    name: None,
                })
                .collect(),
        }
    }
}

/// Layout name a typed content slide maps to
pub fn layout_name_for_slide_type(slide_type: &str) -> Option<&'static str> {
    match slide_type {
        "title_and_content" => Some("Title and Content"),
        "section_header" => Some("Section Header"),
        "two_content" => Some("Two Content"),
        "comparison" => Some("Comparison"),
        "title_only" => Some("Title Only"),
        "blank" => Some("Blank"),
        "content_with_caption" => Some("Content with Caption"),
        "picture_with_caption" => Some("Picture with Caption"),
        _ => None,
    }
}
