//! Format-agnostic document loading and saving

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, io};

/// Format-agnostic document store.
///
/// Detects the format from the file extension (`.json`, `.yaml`, `.yml`)
/// and always saves through [`io::write_atomic`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentStore;

impl DocumentStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a document from a file.
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = io::read_text(path)?;
        self.parse(path, &content)
    }

    /// Load a document, falling back to `T::default()` when the file is
    /// missing or cannot be parsed.
    ///
    /// A missing file is silent; an unreadable or malformed one is logged.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, path: &Path) -> T {
        if !path.exists() {
            return T::default();
        }
        match self.load(path) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Falling back to defaults");
                T::default()
            }
        }
    }

    /// Serialize a document to a string in the format implied by `path`.
    pub fn render<T: Serialize>(&self, path: &Path, value: &T) -> Result<String> {
        let extension = extension_of(path);
        match extension.as_str() {
            "json" => serde_json::to_string_pretty(value)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| Error::Serialize {
                    path: path.to_path_buf(),
                    format: "JSON".into(),
                    message: e.to_string(),
                }),
            "yaml" | "yml" => serde_yaml::to_string(value).map_err(|e| Error::Serialize {
                path: path.to_path_buf(),
                format: "YAML".into(),
                message: e.to_string(),
            }),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    /// Save a document atomically.
    pub fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let content = self.render(path, value)?;
        io::write_atomic(path, content.as_bytes())
    }

    fn parse<T: DeserializeOwned>(&self, path: &Path, content: &str) -> Result<T> {
        let extension = extension_of(path);
        match extension.as_str() {
            "json" => serde_json::from_str(content).map_err(|e| Error::Parse {
                path: path.to_path_buf(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(content).map_err(|e| Error::Parse {
                path: path.to_path_buf(),
                format: "YAML".into(),
                message: e.to_string(),
            }),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}
