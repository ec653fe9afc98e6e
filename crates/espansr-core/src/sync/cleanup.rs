//! Legacy and stale managed-file cleanup
//!
//! Legacy files are removed from every candidate directory, canonical
//! included. Current managed files are removed only from directories that
//! are not canonical, since a previous resolution may have written there.

use std::path::{Path, PathBuf};

use espansr_fs::{RemoveOutcome, remove_if_exists, same_dir};

use crate::managed::{ManagedFile, match_dir};

/// Why a file is scheduled for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupReason {
    /// Written by the pre-rename release
    Legacy,
    /// Current file outside the canonical directory
    Stale,
}

/// A managed file that should be removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupAction {
    pub path: PathBuf,
    pub file: ManagedFile,
    pub reason: CleanupReason,
}

impl CleanupAction {
    pub fn describe(&self) -> String {
        match self.reason {
            CleanupReason::Legacy => format!("legacy file {}", self.path.display()),
            CleanupReason::Stale => format!("stale copy {}", self.path.display()),
        }
    }
}

/// Files to remove, given the candidates and the canonical directory.
///
/// Candidates without a `match/` directory are skipped. The canonical
/// directory is swept for legacy files even when it is not a candidate
/// (e.g. a cached path from an older candidate list).
pub fn plan_cleanup(candidates: &[PathBuf], canonical: &Path) -> Vec<CleanupAction> {
    let mut dirs: Vec<&Path> = candidates.iter().map(PathBuf::as_path).collect();
    if !dirs.iter().any(|d| same_dir(d, canonical)) {
        dirs.push(canonical);
    }

    let mut actions = Vec::new();
    for dir in dirs {
        let matches = match_dir(dir);
        if !matches.is_dir() {
            tracing::trace!(dir = %dir.display(), "No match directory, skipping");
            continue;
        }

        for file in ManagedFile::LEGACY {
            let path = file.path_in(dir);
            if path.exists() {
                actions.push(CleanupAction {
                    path,
                    file,
                    reason: CleanupReason::Legacy,
                });
            }
        }

        if same_dir(dir, canonical) {
            continue;
        }

        for file in ManagedFile::CURRENT {
            let path = file.path_in(dir);
            if path.exists() {
                actions.push(CleanupAction {
                    path,
                    file,
                    reason: CleanupReason::Stale,
                });
            }
        }
    }
    actions
}

/// Remove the planned files. Never fails.
///
/// Returns the removed actions and a message for each failure.
pub fn execute_cleanup(actions: Vec<CleanupAction>) -> (Vec<CleanupAction>, Vec<String>) {
    let mut removed = Vec::new();
    let mut failures = Vec::new();

    for action in actions {
        match remove_if_exists(&action.path) {
            Ok(RemoveOutcome::Removed) => {
                tracing::info!(
                    path = %action.path.display(),
                    reason = ?action.reason,
                    "Removed managed file"
                );
                removed.push(action);
            }
            Ok(RemoveOutcome::Absent) => {}
            Err(e) => {
                tracing::warn!(
                    path = %action.path.display(),
                    error = %e,
                    "Could not remove managed file"
                );
                failures.push(format!("Could not remove {}: {e}", action.describe()));
            }
        }
    }

    (removed, failures)
}
