//! # deckmatch-content
//!
//! Placeholder-mapping configuration and content-record resolution.
//!
//! The mapping layer never owns content: records are caller-supplied
//! JSON that this crate only reads. A [`MappingSet`] declares which
//! placeholder receives which content type from which dotted path, the
//! resolver walks those paths (absence is a normal outcome, not an
//! error), and validation collects every mismatch it can find.
//!
//! ## Example
//!
//! ```rust
//! use deckmatch_content::{resolve, validate, MappingSet};
//! use serde_json::json;
//!
//! let record = json!({
//!     "presentation_data": {"title_slide": {"title": "Hello"}}
//! });
//!
//! let value = resolve(&record, "presentation_data.title_slide.title");
//! assert_eq!(value.unwrap(), "Hello");
//!
//! let issues = validate(&record, &MappingSet::default_set());
//! assert!(!issues.is_empty()); // benefits and impact slides are missing
//! ```

pub mod error;
pub mod mapping;
pub mod resolve;
pub mod validate;

// Re-exports
pub use error::{ContentError, Result};
pub use mapping::{ContentType, MappingSet, PlaceholderMapping, SlideConfig};
pub use resolve::{load_record, resolve, resolve_text};
pub use validate::{validate, Severity, ValidationIssue};
