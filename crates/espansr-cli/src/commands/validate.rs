//! Validate command implementation

use colored::Colorize;

use espansr_core::validate::partition;
use espansr_core::{TemplateSource, validate_all};

use crate::context::AppContext;
use crate::error::{CliError, Result};

/// Run the validate command
///
/// Fails when any finding is an error.
pub fn run_validate(ctx: &AppContext, json: bool) -> Result<()> {
    let templates = ctx.templates.triggered()?;
    let findings = validate_all(&templates);

    if json {
        println!("{}", serde_json::to_string_pretty(&findings)?);
    }

    let (errors, warnings) = partition(findings);

    if !json {
        for w in &warnings {
            println!(
                "{} [{}]: {}",
                "Warning".yellow().bold(),
                w.template_name.cyan(),
                w.message
            );
        }
        for e in &errors {
            println!(
                "{} [{}]: {}",
                "Error".red().bold(),
                e.template_name.cyan(),
                e.message
            );
        }
        if errors.is_empty() && warnings.is_empty() {
            println!("{} All templates valid.", "OK".green().bold());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} validation error(s) found",
            errors.len()
        )))
    }
}
