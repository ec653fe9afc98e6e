//! Snippet templates and where they come from
//!
//! A [`Template`] is read-only to the sync pipeline. Templates reach it
//! through a [`TemplateSource`]; [`TemplateDir`] is the on-disk source
//! (one JSON document per template).

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use espansr_fs::DocumentStore;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// `{{name}}` placeholders, tolerant of whitespace inside the braces.
pub static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").unwrap());

/// Type-specific variable parameters, kept verbatim.
pub type Params = BTreeMap<String, serde_json::Value>;

/// A named snippet definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Raw text containing `{{var}}` placeholders
    #[serde(default)]
    pub content: String,
    /// Keyword that expands this template; empty means "not synced"
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Template {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            content: content.into(),
            trigger: String::new(),
            variables: Vec::new(),
        }
    }

    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = trigger.into();
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn has_trigger(&self) -> bool {
        !self.trigger.is_empty()
    }

    /// Distinct placeholder names referenced by `content`.
    pub fn placeholders(&self) -> BTreeSet<String> {
        PLACEHOLDER
            .captures_iter(&self.content)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// A named substitution slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VariableRecord", into = "VariableRecord")]
pub struct Variable {
    pub name: String,
    /// Human-readable prompt; defaults to `name`
    pub label: String,
    pub default: Option<String>,
    pub kind: VariableKind,
}

/// What kind of value a variable expands to
#[derive(Debug, Clone, PartialEq)]
pub enum VariableKind {
    /// Prompted from the user at expansion time
    Form { multiline: bool },
    /// Resolved by Espanso from the current date; `params` carries `format`
    Date { params: Params },
}

impl VariableKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Form { .. } => "form",
            Self::Date { .. } => "date",
        }
    }
}

impl Variable {
    /// Single-line form variable labelled with its own name.
    pub fn form(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            default: None,
            kind: VariableKind::Form { multiline: false },
        }
    }

    /// Date variable with the given strftime-style format.
    pub fn date(name: impl Into<String>, format: impl Into<String>) -> Self {
        let name = name.into();
        let mut params = Params::new();
        params.insert("format".into(), serde_json::Value::String(format.into()));
        Self {
            label: name.clone(),
            name,
            default: None,
            kind: VariableKind::Date { params },
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        let default = default.into();
        self.default = (!default.is_empty()).then_some(default);
        self
    }

    /// Make a form variable multiline. No effect on other kinds.
    pub fn multiline(mut self) -> Self {
        if let VariableKind::Form { multiline } = &mut self.kind {
            *multiline = true;
        }
        self
    }

    pub fn is_form(&self) -> bool {
        matches!(self.kind, VariableKind::Form { .. })
    }
}

/// On-disk shape of a variable
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VariableRecord {
    name: String,
    #[serde(default)]
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<String>,
    #[serde(rename = "type", default = "default_type")]
    kind: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    params: Params,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    multiline: bool,
}

fn default_type() -> String {
    "form".into()
}

impl TryFrom<VariableRecord> for Variable {
    type Error = String;

    fn try_from(record: VariableRecord) -> std::result::Result<Self, Self::Error> {
        let kind = match record.kind.as_str() {
            "form" => VariableKind::Form {
                multiline: record.multiline,
            },
            "date" => VariableKind::Date {
                params: record.params,
            },
            other => {
                return Err(format!(
                    "variable '{}' has unsupported type '{other}'",
                    record.name
                ));
            }
        };
        let label = if record.label.is_empty() {
            record.name.clone()
        } else {
            record.label
        };
        Ok(Self {
            name: record.name,
            label,
            default: record.default.filter(|d| !d.is_empty()),
            kind,
        })
    }
}

impl From<Variable> for VariableRecord {
    fn from(variable: Variable) -> Self {
        let kind = variable.kind.type_name().to_string();
        let (multiline, params) = match variable.kind {
            VariableKind::Form { multiline } => (multiline, Params::new()),
            VariableKind::Date { params } => (false, params),
        };
        Self {
            name: variable.name,
            label: variable.label,
            default: variable.default,
            kind,
            params,
            multiline,
        }
    }
}

/// Supplier of templates for validation and sync
pub trait TemplateSource {
    /// All templates, in the source's stable order.
    fn templates(&self) -> Result<Vec<Template>>;

    /// Templates with a non-empty trigger, in the same order.
    fn triggered(&self) -> Result<Vec<Template>> {
        Ok(self
            .templates()?
            .into_iter()
            .filter(|t| t.has_trigger())
            .collect())
    }
}

impl TemplateSource for [Template] {
    fn templates(&self) -> Result<Vec<Template>> {
        Ok(self.to_vec())
    }
}

impl TemplateSource for Vec<Template> {
    fn templates(&self) -> Result<Vec<Template>> {
        Ok(self.clone())
    }
}

/// Directory of `*.json` template documents.
///
/// Files are read in file-name order, subdirectories included. A file that
/// fails to parse is skipped with a warning, as is a second template
/// reusing an earlier template's name.
#[derive(Debug, Clone)]
pub struct TemplateDir {
    root: PathBuf,
}

impl TemplateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<own config dir>/templates`
    pub fn in_config_dir(own_config_dir: &Path) -> Self {
        Self::new(own_config_dir.join("templates"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load one template file.
    pub fn load_file(path: &Path) -> Result<Template> {
        let template: Template =
            DocumentStore::new()
                .load(path)
                .map_err(|e| Error::InvalidTemplate {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
        if template.name.trim().is_empty() {
            return Err(Error::InvalidTemplate {
                path: path.to_path_buf(),
                message: "template name is empty".into(),
            });
        }
        Ok(template)
    }

    fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        let mut entries = fs::read_dir(dir)
            .map_err(|e| espansr_fs::Error::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect::<Vec<_>>();
        entries.sort();

        for path in entries {
            if path.is_dir() {
                Self::collect_files(&path, files)?;
            } else if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(())
    }
}

impl TemplateSource for TemplateDir {
    fn templates(&self) -> Result<Vec<Template>> {
        if !self.root.is_dir() {
            tracing::debug!(dir = %self.root.display(), "Template directory does not exist");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        Self::collect_files(&self.root, &mut files)?;

        let mut seen = HashSet::new();
        let mut templates = Vec::with_capacity(files.len());
        for path in files {
            match Self::load_file(&path) {
                Ok(template) => {
                    if seen.insert(template.name.clone()) {
                        templates.push(template);
                    } else {
                        tracing::warn!(
                            path = %path.display(),
                            name = %template.name,
                            "Skipping template with duplicate name"
                        );
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Skipping template"),
            }
        }
        tracing::debug!(dir = %self.root.display(), count = templates.len(), "Loaded templates");
        Ok(templates)
    }
}
