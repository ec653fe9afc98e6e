//! Sync pipeline
//!
//! [`SyncEngine::sync`] runs, in order: resolve the Espanso config dir,
//! sweep legacy and stale managed files, validate, render, write the match
//! file atomically and, on WSL2, restart the daemon.

mod cleanup;
mod engine;
mod report;

pub use cleanup::{CleanupAction, CleanupReason, execute_cleanup, plan_cleanup};
pub use engine::{SyncEngine, SyncOptions};
pub use report::{SyncOutcome, SyncReport};
