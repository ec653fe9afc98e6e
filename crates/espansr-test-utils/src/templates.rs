//! Template documents in their on-disk JSON shape.
//!
//! These builders produce `serde_json::Value`s rather than typed templates so
//! the fixtures stay independent of the crates under test.

use serde_json::{Value, json};

/// A template document with no variables.
///
/// An empty `trigger` produces a template that is never synced.
pub fn template_json(name: &str, trigger: &str, content: &str) -> Value {
    json!({
        "name": name,
        "trigger": trigger,
        "content": content,
        "variables": [],
    })
}

/// A `form` variable document.
pub fn form_var(name: &str, label: &str) -> Value {
    json!({ "name": name, "label": label, "type": "form" })
}

/// A `date` variable document with a `format` param.
pub fn date_var(name: &str, format: &str) -> Value {
    json!({ "name": name, "type": "date", "params": { "format": format } })
}

/// Attach variables to a template document.
pub fn with_variables(mut template: Value, variables: Vec<Value>) -> Value {
    template["variables"] = Value::Array(variables);
    template
}
