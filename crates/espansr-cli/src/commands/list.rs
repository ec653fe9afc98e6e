//! List command implementation

use colored::Colorize;

use espansr_core::TemplateSource;

use crate::context::AppContext;
use crate::error::Result;

/// Run the list command
pub fn run_list(ctx: &AppContext) -> Result<()> {
    let triggered = ctx.templates.triggered()?;

    if triggered.is_empty() {
        println!("No templates with triggers found.");
        println!(
            "Add a {} field (e.g. {}) to a template JSON to include it in sync.",
            "\"trigger\"".cyan(),
            "\":foo\"".cyan()
        );
        return Ok(());
    }

    println!("{:<22} {}", "TRIGGER".bold(), "TEMPLATE NAME".bold());
    println!("{}", "-".repeat(60));
    for template in &triggered {
        println!("  {:<20} {}", template.trigger.green(), template.name);
    }

    Ok(())
}
