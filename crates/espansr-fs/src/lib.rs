//! Filesystem helpers for espansr
//!
//! Provides atomic writes, best-effort removal, checksums and
//! extension-detected document persistence.

pub mod checksum;
pub mod document;
pub mod error;
pub mod io;

pub use checksum::{compute_content_checksum, compute_file_checksum};
pub use document::DocumentStore;
pub use error::{Error, Result};
pub use io::{RemoveOutcome, remove_if_exists, same_dir, write_atomic};
