//! espansr's own settings file (`config.json`)
//!
//! [`Settings`] is an immutable value: transitions such as caching the
//! resolved Espanso directory return the next value, and only
//! [`SettingsStore::save`] touches disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use espansr_fs::DocumentStore;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Settings file name inside the own config dir
pub const SETTINGS_FILE: &str = "config.json";

/// Default trigger for the launcher match
pub const DEFAULT_LAUNCHER_TRIGGER: &str = ":aopen";

/// Top-level settings document
///
/// Unknown keys are ignored on load. The `ui` section belongs to
/// presentation front-ends and is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub espanso: EspansoSettings,
    pub ui: serde_json::Map<String, serde_json::Value>,
}

/// Espanso integration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EspansoSettings {
    /// Cached Espanso config dir; empty means unset
    pub config_path: String,
    pub auto_sync: bool,
    /// RFC 3339 timestamp of the last successful write; empty if never
    pub last_sync: String,
    pub launcher_trigger: String,
}

impl Default for EspansoSettings {
    fn default() -> Self {
        Self {
            config_path: String::new(),
            auto_sync: false,
            last_sync: String::new(),
            launcher_trigger: DEFAULT_LAUNCHER_TRIGGER.to_string(),
        }
    }
}

impl Settings {
    /// The cached Espanso config dir, with a leading `~` expanded.
    pub fn cached_target_dir(&self) -> Option<PathBuf> {
        let raw = self.espanso.config_path.trim();
        if raw.is_empty() {
            return None;
        }
        Some(expand_home(raw))
    }

    /// Cache `dir`. `None` if the path is not valid UTF-8, since the
    /// settings file could not store it faithfully.
    pub fn with_cached_target_dir(&self, dir: &Path) -> Option<Self> {
        let mut next = self.clone();
        next.espanso.config_path = dir.to_str()?.to_string();
        Some(next)
    }

    pub fn without_cached_target_dir(&self) -> Self {
        let mut next = self.clone();
        next.espanso.config_path.clear();
        next
    }

    pub fn with_last_sync(&self, at: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.espanso.last_sync = at.to_rfc3339_opts(SecondsFormat::Secs, true);
        next
    }

    /// Trigger for the launcher match; blank falls back to the default.
    pub fn launcher_trigger(&self) -> &str {
        match self.espanso.launcher_trigger.trim() {
            "" => DEFAULT_LAUNCHER_TRIGGER,
            trigger => trigger,
        }
    }

    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.espanso.last_sync)
            .ok()
            .map(|at| at.with_timezone(&Utc))
    }
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~")
        && (rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\'))
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest.trim_start_matches(['/', '\\']));
    }
    PathBuf::from(raw)
}

/// Reads and writes [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    store: DocumentStore,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            store: DocumentStore::new(),
        }
    }

    /// Store for `<own config dir>/config.json`.
    pub fn in_config_dir(own_config_dir: &Path) -> Self {
        Self::new(own_config_dir.join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. A missing or malformed file yields defaults.
    pub fn load(&self) -> Settings {
        self.store.load_or_default(&self.path)
    }

    /// Persist settings atomically.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        self.store.save(&self.path, settings)?;
        tracing::debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }

    pub fn cached_target_dir(&self) -> Option<PathBuf> {
        self.load().cached_target_dir()
    }

    pub fn set_cached_target_dir(&self, dir: &Path) -> Result<Settings> {
        let next = self
            .load()
            .with_cached_target_dir(dir)
            .ok_or_else(|| Error::NonUtf8Path {
                path: dir.to_path_buf(),
            })?;
        self.save(&next)?;
        Ok(next)
    }

    pub fn clear_cached_target_dir(&self) -> Result<Settings> {
        let next = self.load().without_cached_target_dir();
        self.save(&next)?;
        Ok(next)
    }
}
