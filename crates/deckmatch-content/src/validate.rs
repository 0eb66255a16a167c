//! Advisory validation of a content record against a mapping set.
//!
//! Validation never stops at the first problem: it walks every
//! configured slide and placeholder and collects everything it finds.
//! The caller decides whether issues are fatal.

use crate::mapping::{ContentType, MappingSet};
use crate::resolve::resolve;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A configured path resolved to nothing
    Warning,

    /// Structurally wrong data (missing slide block, wrong shape)
    Error,
}

/// One finding from validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,

    /// The dotted path the issue refers to, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ValidationIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            path: None,
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            path: None,
        }
    }

    fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Whether this issue should fail a strict run
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Validate a content record against every configured slide.
///
/// Checks, per slide: the slide's own data block exists; every
/// placeholder path resolves; and bullet-list and table paths resolve to
/// sequences rather than scalars or mappings.
pub fn validate(record: &Value, mappings: &MappingSet) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for slide in &mappings.slides {
        let data_path = slide.data_path();
        if resolve(record, &data_path).is_none() {
            issues.push(
                ValidationIssue::error(format!("Missing slide data for: {}", slide.slide_key))
                    .with_path(data_path),
            );
            continue;
        }

        for placeholder in &slide.placeholders {
            match resolve(record, &placeholder.path) {
                None => issues.push(
                    ValidationIssue::warning(format!(
                        "Missing data for path: {}",
                        placeholder.path
                    ))
                    .with_path(&placeholder.path),
                ),
                Some(value) if placeholder.content_type.requires_list() && !value.is_array() => {
                    let label = match placeholder.content_type {
                        ContentType::Table => "Table data",
                        _ => "Bullet list data",
                    };
                    issues.push(
                        ValidationIssue::error(format!(
                            "{} must be a list: {}",
                            label, placeholder.path
                        ))
                        .with_path(&placeholder.path),
                    );
                }
                Some(_) => {}
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_record() -> Value {
        json!({
            "presentation_data": {
                "title_slide": {
                    "title": "Sustainable Urban Farming",
                    "subtitle": "Feeding Cities Differently"
                },
                "benefits_slide": {
                    "slide_title": "Benefits",
                    "text_body": ["Lower food miles", "Year-round yield"],
                    "image_description": "rooftop garden"
                },
                "impact_slide": {
                    "slide_title": "Impact",
                    "table_data": [["Metric", "Value"]]
                }
            }
        })
    }

    #[test]
    fn test_complete_record_is_clean() {
        let issues = validate(&full_record(), &MappingSet::default_set());
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn test_missing_slide_block_is_reported() {
        let mut record = full_record();
        record["presentation_data"]
            .as_object_mut()
            .unwrap()
            .remove("benefits_slide");

        let issues = validate(&record, &MappingSet::default_set());

        assert!(issues
            .iter()
            .any(|i| i.is_error() && i.message.contains("benefits_slide")));
        // Placeholder paths of the missing slide are not separately reported
        assert_eq!(
            issues
                .iter()
                .filter(|i| i.message.contains("benefits_slide"))
                .count(),
            1
        );
    }

    #[test]
    fn test_missing_path_is_a_warning() {
        let mut record = full_record();
        record["presentation_data"]["title_slide"]
            .as_object_mut()
            .unwrap()
            .remove("subtitle");

        let issues = validate(&record, &MappingSet::default_set());

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0]
            .message
            .contains("presentation_data.title_slide.subtitle"));
    }

    #[test]
    fn test_table_scalar_is_rejected() {
        let mut record = full_record();
        record["presentation_data"]["impact_slide"]["table_data"] = json!("not a table");

        let issues = validate(&record, &MappingSet::default_set());

        assert!(issues.iter().any(|i| {
            i.is_error()
                && i.message
                    .contains("Table data must be a list: presentation_data.impact_slide.table_data")
        }));
    }

    #[test]
    fn test_bullet_list_mapping_is_rejected() {
        let mut record = full_record();
        record["presentation_data"]["benefits_slide"]["text_body"] = json!({"first": "x"});

        let issues = validate(&record, &MappingSet::default_set());

        assert!(issues
            .iter()
            .any(|i| i.is_error() && i.message.contains("Bullet list data must be a list")));
    }

    #[test]
    fn test_all_issues_are_collected() {
        // Empty record: every slide block is missing
        let record = json!({});
        let issues = validate(&record, &MappingSet::default_set());
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.is_error()));
    }

    #[test]
    fn test_issue_serialization() {
        let issue = ValidationIssue::warning("Missing data for path: a.b").with_path("a.b");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["path"], "a.b");
    }
}
