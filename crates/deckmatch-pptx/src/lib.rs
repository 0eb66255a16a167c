//! # deckmatch-pptx
//!
//! The PPTX side of deckmatch: template structural extraction, slide
//! assembly, and package generation.
//!
//! A [`PptxTemplate`] is read out of a `.pptx`/`.potx` container (theme
//! roles, canvas size, layout placeholders). The [`SlideAssembler`]
//! binds a validated content record onto those layouts according to a
//! mapping set and styles the result from a design specification, and
//! the [`DeckWriter`] emits the populated deck as a new package.
//!
//! ## Example
//!
//! ```rust
//! use deckmatch_content::MappingSet;
//! use deckmatch_design::DesignSpecification;
//! use deckmatch_pptx::{DeckWriter, PptxTemplate, SlideAssembler};
//! use serde_json::json;
//!
//! let design = DesignSpecification::default();
//! let template = PptxTemplate::standard();
//! let mappings = MappingSet::default_set();
//!
//! let record = json!({
//!     "presentation_data": {"title_slide": {"title": "Hello", "subtitle": "World"}}
//! });
//!
//! let deck = SlideAssembler::new(&design, &template, &mappings).assemble(&record);
//! let bytes = DeckWriter::new(&design).generate(&deck).unwrap();
//! assert!(!bytes.is_empty());
//! ```

pub mod assemble;
pub mod deck;
pub mod error;
pub mod layout;
pub mod subst;
pub mod template;
pub mod write;

// Re-exports
pub use assemble::SlideAssembler;
pub use deck::{AssembledDeck, AssembledSlide, AssemblyWarning, BoundBody, BoundContent, TextStyle};
pub use error::{PptxError, Result};
pub use layout::{layout_name_for_slide_type, LayoutInfo, PlaceholderKind, PlaceholderRef};
pub use subst::Substitutor;
pub use template::PptxTemplate;
pub use write::DeckWriter;

/// OOXML constants
pub mod constants {
    /// PresentationML namespace
    pub const NS_PRESENTATION: &str =
        "http://schemas.openxmlformats.org/presentationml/2006/main";

    /// DrawingML namespace
    pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    /// Relationships namespace
    pub const NS_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// Slide relationship type
    pub const REL_TYPE_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

    /// Slide layout relationship type
    pub const REL_TYPE_SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

    /// Slide master relationship type
    pub const REL_TYPE_SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

    /// Theme relationship type
    pub const REL_TYPE_THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
}
