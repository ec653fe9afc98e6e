//! Error types for espansr-core

use std::path::PathBuf;

/// Result type for espansr-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in espansr-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A template file could not be turned into a [`crate::Template`]
    #[error("Invalid template {path}: {message}")]
    InvalidTemplate { path: PathBuf, message: String },

    /// No Espanso config directory could be resolved
    #[error("{message}")]
    EspansoNotFound { message: String },

    /// A path that the settings file cannot hold as text
    #[error("Path is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    /// The match file could not be serialized
    #[error("Failed to render match file: {0}")]
    Render(#[from] serde_yaml::Error),

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from espansr-fs
    #[error(transparent)]
    Fs(#[from] espansr_fs::Error),

    /// Standard IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
