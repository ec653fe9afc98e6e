//! Environment diagnostics
//!
//! [`run_doctor`] inspects everything a sync depends on and reports each
//! item as ok, warn or fail. Only `fail` items mean a sync cannot work.

use std::fmt;

use espansr_platform::{Host, PlatformKind, find_executable};
use serde::{Deserialize, Serialize};

use crate::managed::{ManagedFile, match_dir};
use crate::sync::SyncEngine;
use crate::template::{TemplateDir, TemplateSource};
use crate::validate::{partition, validate_all};

/// Result level of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckLevel {
    Ok,
    Warn,
    Fail,
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Warn => f.write_str("warn"),
            Self::Fail => f.write_str("FAIL"),
        }
    }
}

/// One diagnostic line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorCheck {
    pub name: String,
    pub level: CheckLevel,
    pub detail: String,
}

impl DoctorCheck {
    fn new(name: &str, level: CheckLevel, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            level,
            detail: detail.into(),
        }
    }
}

/// Ordered diagnostic results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.level == CheckLevel::Fail)
    }

    pub fn get(&self, name: &str) -> Option<&DoctorCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    fn push(&mut self, name: &str, level: CheckLevel, detail: impl Into<String>) {
        self.checks.push(DoctorCheck::new(name, level, detail));
    }
}

/// Run every diagnostic in order.
///
/// Resolving the Espanso config dir goes through the engine, so a fresh
/// discovery is cached just as a sync would cache it.
pub fn run_doctor(engine: &SyncEngine, host: &dyn Host, templates: &TemplateDir) -> DoctorReport {
    let platform = engine.platform();
    let mut report = DoctorReport::default();

    match platform.kind {
        PlatformKind::Unknown => {
            report.push("Platform", CheckLevel::Warn, "unknown; no Espanso locations to probe")
        }
        kind => report.push("Platform", CheckLevel::Ok, kind.as_str()),
    }

    let own = platform.own_config_dir();
    if own.is_dir() {
        report.push("Config directory", CheckLevel::Ok, own.display().to_string());
    } else {
        report.push(
            "Config directory",
            CheckLevel::Warn,
            format!("{} (not created yet)", own.display()),
        );
    }

    if templates.root().is_dir() {
        report.push(
            "Templates directory",
            CheckLevel::Ok,
            templates.root().display().to_string(),
        );
    } else {
        report.push(
            "Templates directory",
            CheckLevel::Warn,
            format!("{} (missing)", templates.root().display()),
        );
    }

    let resolved = engine.resolve_target_dir();
    let espanso_dir = resolved.dir().map(|d| d.to_path_buf());
    match &espanso_dir {
        Some(dir) => report.push("Espanso config", CheckLevel::Ok, dir.display().to_string()),
        None => report.push("Espanso config", CheckLevel::Fail, "not found"),
    }

    match &espanso_dir {
        Some(dir) if match_dir(dir).is_dir() => report.push(
            "Match directory",
            CheckLevel::Ok,
            match_dir(dir).display().to_string(),
        ),
        Some(dir) => report.push(
            "Match directory",
            CheckLevel::Warn,
            format!("{} (created on first sync)", match_dir(dir).display()),
        ),
        None => report.push("Match directory", CheckLevel::Fail, "no Espanso config"),
    }

    match find_executable(host, "espanso") {
        Some(path) => report.push("Espanso binary", CheckLevel::Ok, path.display().to_string()),
        None if platform.is_wsl2() => report.push(
            "Espanso binary",
            CheckLevel::Ok,
            "Windows host (WSL2; manage through PowerShell)",
        ),
        None => report.push("Espanso binary", CheckLevel::Fail, "not found on PATH"),
    }

    let triggered = match templates.triggered() {
        Ok(triggered) => triggered,
        Err(e) => {
            report.push("Templates with triggers", CheckLevel::Fail, e.to_string());
            Vec::new()
        }
    };
    if triggered.is_empty() {
        if report.get("Templates with triggers").is_none() {
            report.push("Templates with triggers", CheckLevel::Fail, "none found");
        }
    } else {
        report.push(
            "Templates with triggers",
            CheckLevel::Ok,
            triggered.len().to_string(),
        );
    }

    let (errors, warnings) = partition(validate_all(&triggered));
    if !errors.is_empty() {
        report.push(
            "Validation",
            CheckLevel::Fail,
            format!("{} error(s), {} warning(s)", errors.len(), warnings.len()),
        );
    } else if !warnings.is_empty() {
        report.push(
            "Validation",
            CheckLevel::Warn,
            format!("{} warning(s)", warnings.len()),
        );
    } else {
        report.push("Validation", CheckLevel::Ok, "no issues");
    }

    match &espanso_dir {
        Some(dir) => {
            let launcher = ManagedFile::Launcher.path_in(dir);
            if launcher.is_file() {
                report.push("Launcher file", CheckLevel::Ok, launcher.display().to_string());
            } else {
                report.push(
                    "Launcher file",
                    CheckLevel::Warn,
                    format!("{} not installed (run 'espansr launcher')", launcher.display()),
                );
            }
        }
        None => report.push("Launcher file", CheckLevel::Fail, "no match directory"),
    }

    report
}
