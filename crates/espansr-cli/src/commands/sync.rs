//! Sync command implementation

use colored::Colorize;

use espansr_core::{SyncOptions, SyncOutcome, SyncReport};

use crate::context::AppContext;
use crate::error::{CliError, Result};

/// Run the sync command
///
/// Exits non-zero only when the sync itself failed; warnings and an empty
/// template set are successes.
pub fn run_sync(ctx: &AppContext, dry_run: bool, json: bool) -> Result<()> {
    let engine = ctx.engine();
    if !json {
        let what = if dry_run { "Planning sync" } else { "Syncing templates" };
        println!("{} {} to Espanso...", "=>".blue().bold(), what);
    }

    let report = engine.sync(&ctx.templates, SyncOptions { dry_run });

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.success {
        Ok(())
    } else {
        Err(CliError::user("Sync failed"))
    }
}

fn print_report(report: &SyncReport) {
    if let Some(dir) = &report.target_dir {
        println!("   Espanso config: {}", dir.display().to_string().cyan());
    }

    for action in &report.actions {
        println!("   {} {}", "+".green(), action);
    }
    for warning in &report.warnings {
        println!("   {} {}", "warning:".yellow().bold(), warning);
    }
    for error in &report.errors {
        println!("   {} {}", "!".red(), error);
    }

    let dry = if report.dry_run { " (dry run)" } else { "" };
    match report.outcome() {
        SyncOutcome::Synced => {
            println!("{} Synced {} trigger(s){}.", "OK".green().bold(), report.count, dry);
        }
        SyncOutcome::SyncedWithWarnings => {
            println!(
                "{} Synced {} trigger(s) with {} warning(s){}.",
                "OK".green().bold(),
                report.count,
                report.warnings.len(),
                dry
            );
        }
        SyncOutcome::NothingToSync => {
            println!("{} No templates with triggers found{}.", "OK".green().bold(), dry);
        }
        SyncOutcome::Failed => {
            println!("{} Could not sync to Espanso.", "ERROR".red().bold());
        }
    }
}
