//! Doctor command implementation

use colored::Colorize;

use espansr_core::CheckLevel;
use espansr_platform::SystemHost;

use crate::context::AppContext;
use crate::error::{CliError, Result};

/// Run the doctor command
///
/// Prints one line per check and fails if any check failed.
pub fn run_doctor(ctx: &AppContext) -> Result<()> {
    let engine = ctx.engine();
    let report = espansr_core::run_doctor(&engine, &SystemHost, &ctx.templates);

    for check in &report.checks {
        let tag = match check.level {
            CheckLevel::Ok => "[ok]".green(),
            CheckLevel::Warn => "[warn]".yellow(),
            CheckLevel::Fail => "[FAIL]".red().bold(),
        };
        println!("{:<7} {}: {}", tag, check.name, check.detail);
    }

    if report.has_failures() {
        Err(CliError::user("doctor found problems"))
    } else {
        Ok(())
    }
}
