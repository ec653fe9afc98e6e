//! Error types for espansr-platform

/// Why a best-effort lookup produced no value.
///
/// This is an expected outcome (e.g. `cmd.exe` does not exist outside
/// WSL2), so callers treat every variant as "feature unavailable".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Unavailable {
    #[error("{program} not found")]
    NotFound { program: String },

    #[error("{program} timed out after {seconds}s")]
    TimedOut { program: String, seconds: u64 },

    #[error("{program} exited with code {code}: {stderr}")]
    Failed {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("{program} produced no output")]
    Empty { program: String },

    #[error("{program} could not be run: {message}")]
    Spawn { program: String, message: String },
}
