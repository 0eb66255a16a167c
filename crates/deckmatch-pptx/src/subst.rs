//! Text substitution over `{{ }}` variables.
//!
//! Slide text runs through a minijinja pass against the content record.
//! The context is wrapped so that a variable that resolves nowhere
//! renders back as its own literal `{{ path }}` text instead of an empty
//! string; a template syntax error is returned to the caller, which
//! aborts only the slide being rendered.

use minijinja::value::{Enumerator, Object, ObjectRepr, Value};
use minijinja::Environment;
use std::fmt;
use std::sync::Arc;

/// The substitution engine
pub struct Substitutor {
    env: Environment<'static>,
}

impl Default for Substitutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Substitutor {
    /// Create an engine with default settings
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Render one text field against a content record.
    ///
    /// Resolved variables substitute; unresolved ones stay literal.
    /// Errors only surface for malformed template syntax.
    pub fn render(
        &self,
        text: &str,
        record: &serde_json::Value,
    ) -> Result<String, minijinja::Error> {
        // Plain text needs no engine round-trip
        if !text.contains("{{") && !text.contains("{%") {
            return Ok(text.to_string());
        }

        let ctx = Value::from_object(EchoNode {
            value: record.clone(),
            path: String::new(),
        });
        self.env.render_str(text, ctx)
    }
}

/// A context node that echoes unknown lookups.
///
/// Known keys descend into the record; unknown keys produce an
/// [`Unresolved`] chain that renders as the original `{{ path }}`.
#[derive(Debug)]
struct EchoNode {
    value: serde_json::Value,
    path: String,
}

impl EchoNode {
    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }
}

impl Object for EchoNode {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let key = key.as_str()?;
        let child_path = self.child_path(key);

        match self.value.get(key) {
            Some(child @ serde_json::Value::Object(_)) => Some(Value::from_object(EchoNode {
                value: child.clone(),
                path: child_path,
            })),
            Some(child) => Some(Value::from_serialize(child)),
            None => Some(Value::from_object(Unresolved { path: child_path })),
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        match self.value.as_object() {
            Some(map) => Enumerator::Values(
                map.keys().map(|k| Value::from(k.as_str())).collect(),
            ),
            None => Enumerator::Empty,
        }
    }
}

/// A lookup that resolved nowhere. Deeper lookups extend the path, and
/// rendering reproduces the original placeholder text.
#[derive(Debug)]
struct Unresolved {
    path: String,
}

impl Object for Unresolved {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let key = key.as_str()?;
        Some(Value::from_object(Unresolved {
            path: format!("{}.{}", self.path, key),
        }))
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        Self: Sized + 'static,
    {
        write!(f, "{{{{ {} }}}}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> serde_json::Value {
        json!({
            "presentation_data": {
                "title_slide": {
                    "title": "Sustainable Urban Farming",
                    "year": 2024
                }
            }
        })
    }

    #[test]
    fn test_plain_text_passes_through_byte_exact() {
        let subst = Substitutor::new();
        let text = "Sustainable Urban Farming";
        assert_eq!(subst.render(text, &record()).unwrap(), text);
    }

    #[test]
    fn test_resolved_variable_substitutes() {
        let subst = Substitutor::new();
        let out = subst
            .render("Topic: {{ presentation_data.title_slide.title }}", &record())
            .unwrap();
        assert_eq!(out, "Topic: Sustainable Urban Farming");
    }

    #[test]
    fn test_numeric_values_render() {
        let subst = Substitutor::new();
        let out = subst
            .render("({{ presentation_data.title_slide.year }})", &record())
            .unwrap();
        assert_eq!(out, "(2024)");
    }

    #[test]
    fn test_unresolved_variable_stays_literal() {
        let subst = Substitutor::new();
        let out = subst
            .render("Topic: {{ presentation_data.missing_slide.title }}", &record())
            .unwrap();
        assert_eq!(out, "Topic: {{ presentation_data.missing_slide.title }}");
    }

    #[test]
    fn test_mixed_resolution() {
        let subst = Substitutor::new();
        let out = subst
            .render(
                "{{ presentation_data.title_slide.title }} / {{ nope.nothing }}",
                &record(),
            )
            .unwrap();
        assert_eq!(out, "Sustainable Urban Farming / {{ nope.nothing }}");
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let subst = Substitutor::new();
        assert!(subst.render("{{ unclosed", &record()).is_err());
    }
}
