//! Dotted-path resolution over content records.
//!
//! Absence is a normal outcome here: any missing key, or an attempt to
//! descend through a value that is not an object, yields `None`. Callers
//! check, they never catch.

use serde_json::Value;
use std::path::Path;

use crate::error::{ContentError, Result};

/// Resolve a dotted path against a nested content record.
///
/// Only objects are traversable; sequences and scalars terminate the
/// descent. The returned reference points into the record.
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    match path.split_once('.') {
        Some((head, rest)) => resolve(record.as_object()?.get(head)?, rest),
        None => record.as_object()?.get(path),
    }
}

/// Resolve a path and render it as plain text, if it is a scalar.
///
/// Strings come back verbatim; numbers and booleans are formatted.
/// Objects and arrays yield `None` since they have no single text form.
pub fn resolve_text(record: &Value, path: &str) -> Option<String> {
    match resolve(record, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Load a content record from a JSON file.
pub fn load_record(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ContentError::missing_input(path.display().to_string())
        } else {
            ContentError::IoError(e)
        }
    })?;
    serde_json::from_str(&text).map_err(|e| ContentError::malformed(path.display().to_string(), &e))
}
