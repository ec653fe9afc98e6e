//! Sync report types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How a sync ended, from the caller's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Matches written (or would be, for a dry run), no caveats
    Synced,
    /// Matches written, with warnings to show
    SyncedWithWarnings,
    /// Success with zero matches
    NothingToSync,
    /// Resolution, validation or the write failed
    Failed,
}

/// Report from a sync
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Whether the operation completed successfully
    pub success: bool,
    /// Number of matches written (or that would be written)
    pub count: usize,
    /// Whether the match file bytes differ from what was there before
    pub changed: bool,
    pub dry_run: bool,
    /// The canonical Espanso config dir, if one was resolved
    pub target_dir: Option<PathBuf>,
    /// Actions taken (or planned, for a dry run)
    pub actions: Vec<String>,
    /// Advisory messages; never affect `success`
    pub warnings: Vec<String>,
    /// Errors encountered during the operation
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Create a successful sync report
    pub fn success() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Create a failed sync report
    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            success: false,
            errors,
            ..Self::default()
        }
    }

    pub fn outcome(&self) -> SyncOutcome {
        if !self.success {
            SyncOutcome::Failed
        } else if self.count == 0 {
            SyncOutcome::NothingToSync
        } else if self.warnings.is_empty() {
            SyncOutcome::Synced
        } else {
            SyncOutcome::SyncedWithWarnings
        }
    }

    /// Mark the report failed, zeroing the count.
    pub(crate) fn fail(&mut self, error: String) {
        self.success = false;
        self.count = 0;
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, 3, &[], SyncOutcome::Synced)]
    #[case(true, 3, &["caveat"], SyncOutcome::SyncedWithWarnings)]
    #[case(true, 0, &["caveat"], SyncOutcome::NothingToSync)]
    #[case(false, 0, &[], SyncOutcome::Failed)]
    fn test_outcome(
        #[case] success: bool,
        #[case] count: usize,
        #[case] warnings: &[&str],
        #[case] expected: SyncOutcome,
    ) {
        let report = SyncReport {
            success,
            count,
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
            ..SyncReport::default()
        };
        assert_eq!(report.outcome(), expected);
    }

    #[test]
    fn test_fail_zeroes_count() {
        let mut report = SyncReport::success();
        report.count = 2;
        report.fail("disk full".into());
        assert!(!report.success);
        assert_eq!(report.count, 0);
        assert_eq!(report.errors, vec!["disk full"]);
    }
}
