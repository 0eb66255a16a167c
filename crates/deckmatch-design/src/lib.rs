//! # deckmatch-design
//!
//! Design-property extraction and merging for deckmatch.
//!
//! This crate owns the data model of the pipeline's first half: the
//! theme and dimension records read out of a template, the serde models
//! of the two analysis input files, and the merge that combines them
//! into an immutable [`DesignSpecification`] for the assembly stage.
//!
//! ## Example
//!
//! ```rust
//! use deckmatch_design::analysis::{ImageAnalysis, TemplateAnalysis};
//! use deckmatch_design::merge::DesignMerger;
//!
//! let template = TemplateAnalysis::default();
//! let image = ImageAnalysis::default();
//! let spec = DesignMerger::new(template, image).merge();
//! assert_eq!(spec.brand_guidelines.color_palette.text_dark, "#2d4a2e");
//! ```

pub mod analysis;
pub mod color;
pub mod error;
pub mod merge;
pub mod spec;
pub mod theme;
pub mod units;

// Re-exports
pub use analysis::{ImageAnalysis, TemplateAnalysis};
pub use color::{categorize, CategorizedColor, ColorCategory, ColorProfile, Rgb};
pub use error::{DesignError, Result};
pub use merge::DesignMerger;
pub use spec::{
    DesignSpecification, GeneratorConfig, LayoutTemplate, SizeScale, SizeTier, UsagePattern,
};
pub use theme::{FontScheme, ThemeRecord};
pub use units::{SlideDimensions, EMU_PER_INCH};
