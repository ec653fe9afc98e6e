//! [`TestEnv`]: a throwaway directory tree standing in for a user's machine.
//!
//! Layout under the temporary root:
//!
//! ```text
//! <root>/espansr/             own config dir (config.json, templates/)
//! <root>/<candidate>/match/   Espanso config dirs created on demand
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// A temporary espansr + Espanso layout with setup and assertion helpers.
///
/// # Example
///
/// ```rust,no_run
/// use espansr_test_utils::{TestEnv, template_json};
///
/// let env = TestEnv::new();
/// let canonical = env.create_espanso_dir("primary");
/// env.write_template("greet", &template_json("Greet", ":greet", "Hello"));
/// env.assert_file_exists(&canonical.join("match"));
/// ```
pub struct TestEnv {
    temp_dir: TempDir,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// espansr's own config dir. Not created until something is written.
    pub fn own_config_dir(&self) -> PathBuf {
        self.root().join("espansr")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.own_config_dir().join("templates")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.own_config_dir().join("config.json")
    }

    /// Path of a candidate Espanso config dir without creating it.
    pub fn candidate(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Create an Espanso config dir with an empty `match/` subdirectory.
    ///
    /// Realism level: MINIMAL. Espanso itself would also create `config/`.
    pub fn create_espanso_dir(&self, name: &str) -> PathBuf {
        let dir = self.candidate(name);
        fs::create_dir_all(dir.join("match")).unwrap();
        dir
    }

    /// Write `templates/<stem>.json`.
    pub fn write_template(&self, stem: &str, template: &Value) -> PathBuf {
        let dir = self.templates_dir();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{stem}.json"));
        fs::write(&path, serde_json::to_string_pretty(template).unwrap()).unwrap();
        path
    }

    /// Write `config.json` with the given document.
    pub fn write_settings(&self, settings: &Value) {
        fs::create_dir_all(self.own_config_dir()).unwrap();
        fs::write(
            self.settings_path(),
            serde_json::to_string_pretty(settings).unwrap(),
        )
        .unwrap();
    }

    /// Read `config.json` back as JSON.
    ///
    /// # Panics
    /// Panics if the file is missing or not valid JSON.
    pub fn read_settings(&self) -> Value {
        let path = self.settings_path();
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read {}: {e}", path.display()));
        serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Invalid JSON in {}: {e}", path.display()))
    }

    /// Write an arbitrary file, creating parent directories.
    pub fn write_file(&self, path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Read a file to a string.
    ///
    /// # Panics
    /// Panics with the path in the message if the file cannot be read.
    pub fn read_file(&self, path: &Path) -> String {
        fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Could not read file {}: {e}", path.display()))
    }

    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &Path) {
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &Path) {
        assert!(
            !path.exists(),
            "Expected file NOT to exist: {}",
            path.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_espanso_dir_has_match_subdir() {
        let env = TestEnv::new();
        let dir = env.create_espanso_dir("espanso");
        assert!(dir.join("match").is_dir());
    }

    #[test]
    fn test_settings_round_trip() {
        let env = TestEnv::new();
        env.write_settings(&serde_json::json!({"espanso": {"auto_sync": true}}));
        assert_eq!(env.read_settings()["espanso"]["auto_sync"], true);
    }
}
