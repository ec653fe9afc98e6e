//! Rendering templates into Espanso's match-file format
//!
//! Espanso exposes a form field as `{{name.value}}`, while date variables
//! are referenced by plain name. Content placeholders are rewritten
//! accordingly and each variable becomes a `vars` descriptor.
//!
//! The launcher file is a separate single-match document whose `shell`
//! variable starts espansr's desktop front-end.

use std::path::Path;

use espansr_platform::PlatformInfo;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::template::{PLACEHOLDER, Params, Template, Variable, VariableKind};

/// The `espansr.yml` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchFile {
    pub matches: Vec<EspansoMatch>,
}

/// One trigger -> replacement rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EspansoMatch {
    pub trigger: String,
    pub replace: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vars: Vec<EspansoVar>,
}

/// A variable descriptor inside a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EspansoVar {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
}

impl MatchFile {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Rewrite `{{name}}` / `{{ name }}` to `{{name.value}}` for form variables.
///
/// Placeholders naming date variables, or no variable at all, are left as
/// they are.
pub fn render_content(content: &str, variables: &[Variable]) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            let is_form = variables.iter().any(|v| v.name == name && v.is_form());
            if is_form {
                format!("{{{{{name}.value}}}}")
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Build the descriptor for one variable.
pub fn build_var(variable: &Variable) -> EspansoVar {
    let params = match &variable.kind {
        VariableKind::Date { params } => params.clone(),
        VariableKind::Form { multiline } => {
            let mut params = Params::new();
            params.insert(
                "layout".into(),
                Value::String(format!("{}: [[value]]", variable.label)),
            );
            if let Some(default) = &variable.default {
                params.insert("default".into(), Value::String(default.clone()));
            }
            if *multiline {
                params.insert("fields".into(), json!({"value": {"multiline": true}}));
            }
            params
        }
    };

    EspansoVar {
        name: variable.name.clone(),
        kind: variable.kind.type_name().to_string(),
        params,
    }
}

/// Build the match for one template.
pub fn build_match(template: &Template) -> EspansoMatch {
    EspansoMatch {
        trigger: template.trigger.clone(),
        replace: render_content(&template.content, &template.variables),
        vars: template.variables.iter().map(build_var).collect(),
    }
}

/// Build the match file for every template that has a trigger, in order.
pub fn build_match_file(templates: &[Template]) -> MatchFile {
    MatchFile {
        matches: templates
            .iter()
            .filter(|t| t.has_trigger())
            .map(build_match)
            .collect(),
    }
}

/// Subcommand the launcher trigger runs
pub const LAUNCHER_SUBCOMMAND: &str = "gui";

/// Name of the launcher's `shell` variable
const LAUNCHER_VAR: &str = "output";

/// Shell command the launcher trigger runs, detached.
///
/// On WSL2 Espanso runs on the Windows side, so the command goes through
/// `wsl.exe`, targeting the detected distro when there is one.
pub fn launcher_command(platform: &PlatformInfo, binary: &Path) -> String {
    let launch = format!("{} {LAUNCHER_SUBCOMMAND}", binary.display());
    if !platform.is_wsl2() {
        return format!("{launch} &");
    }
    match platform.wsl_distro.as_deref() {
        Some(distro) => format!("wsl.exe -d {distro} -- {launch} &"),
        None => format!("wsl.exe -- {launch} &"),
    }
}

/// Build the launcher match file for `trigger`.
pub fn build_launcher_file(trigger: &str, command: &str) -> MatchFile {
    let mut params = Params::new();
    params.insert("cmd".into(), Value::String(command.to_string()));

    MatchFile {
        matches: vec![EspansoMatch {
            trigger: trigger.to_string(),
            replace: format!("{{{{{LAUNCHER_VAR}}}}}"),
            vars: vec![EspansoVar {
                name: LAUNCHER_VAR.to_string(),
                kind: "shell".to_string(),
                params,
            }],
        }],
    }
}
