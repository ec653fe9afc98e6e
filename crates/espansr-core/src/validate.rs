//! Template validation
//!
//! Findings are either blocking ([`Severity::Error`]) or advisory
//! ([`Severity::Warning`]). Every rule runs; nothing short-circuits.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::template::Template;

/// Minimum trigger length Espanso accepts reliably
pub const MIN_TRIGGER_LEN: usize = 2;

/// Whether a finding blocks sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// One issue found in one template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub severity: Severity,
    pub message: String,
    pub template_name: String,
}

impl ValidationFinding {
    pub fn error(template_name: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            template_name: template_name.to_string(),
        }
    }

    pub fn warning(template_name: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            template_name: template_name.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.template_name, self.message)
    }
}

/// Check one template in isolation.
pub fn validate_template(template: &Template) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    let name = template.name.as_str();
    let trigger = template.trigger.as_str();

    if trigger.is_empty() {
        findings.push(ValidationFinding::error(name, "Trigger is empty"));
    } else {
        if trigger.chars().count() < MIN_TRIGGER_LEN {
            findings.push(ValidationFinding::error(
                name,
                format!("Trigger '{trigger}' is too short (minimum {MIN_TRIGGER_LEN} characters)"),
            ));
        }
        if !trigger.starts_with(':') && !trigger.starts_with('/') {
            findings.push(ValidationFinding::warning(
                name,
                format!(
                    "Trigger '{trigger}' does not start with ':' or '/'; \
                     Espanso keyword triggers conventionally start with ':'"
                ),
            ));
        }
    }

    let placeholders = template.placeholders();
    let mut defined = BTreeSet::new();
    for variable in &template.variables {
        if !defined.insert(variable.name.clone()) {
            findings.push(ValidationFinding::error(
                name,
                format!("Variable '{}' is defined more than once", variable.name),
            ));
        }
    }

    for missing in placeholders.difference(&defined) {
        findings.push(ValidationFinding::warning(
            name,
            format!("Placeholder '{{{{{missing}}}}}' in content has no matching variable defined"),
        ));
    }
    for unused in defined.difference(&placeholders) {
        findings.push(ValidationFinding::warning(
            name,
            format!("Variable '{unused}' is defined but never referenced in content"),
        ));
    }

    findings
}

/// Check every template with a trigger, plus trigger uniqueness across them.
///
/// Templates without a trigger are not synced and are skipped.
pub fn validate_all(templates: &[Template]) -> Vec<ValidationFinding> {
    let triggered: Vec<&Template> = templates.iter().filter(|t| t.has_trigger()).collect();

    let mut findings: Vec<ValidationFinding> = triggered
        .iter()
        .flat_map(|t| validate_template(t))
        .collect();

    let mut by_trigger: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for template in &triggered {
        by_trigger
            .entry(template.trigger.as_str())
            .or_default()
            .push(template.name.as_str());
    }

    for (trigger, names) in by_trigger.iter().filter(|(_, names)| names.len() > 1) {
        for (index, name) in names.iter().enumerate() {
            let others: Vec<&str> = names
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, n)| *n)
                .collect();
            findings.push(ValidationFinding::error(
                name,
                format!(
                    "Duplicate trigger '{trigger}' (also used by: {})",
                    others.join(", ")
                ),
            ));
        }
    }

    findings
}

/// Split findings into (errors, warnings), preserving order.
pub fn partition(
    findings: Vec<ValidationFinding>,
) -> (Vec<ValidationFinding>, Vec<ValidationFinding>) {
    findings.into_iter().partition(ValidationFinding::is_error)
}
