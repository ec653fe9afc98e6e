//! Status command implementation

use colored::Colorize;

use espansr_platform::{SystemHost, find_executable};

use crate::context::AppContext;
use crate::error::Result;

/// Run the status command
///
/// Informational only; always succeeds.
pub fn run_status(ctx: &AppContext) -> Result<()> {
    let engine = ctx.engine();
    let platform = engine.platform();

    println!("{:<16} {}", "Platform:".bold(), platform.kind);

    match engine.resolve_target_dir().dir() {
        Some(dir) => println!("{:<16} {}", "Espanso config:".bold(), dir.display()),
        None => println!("{:<16} {}", "Espanso config:".bold(), "not found".yellow()),
    }

    let binary = match find_executable(&SystemHost, "espanso") {
        Some(path) => path.display().to_string(),
        None if platform.is_wsl2() => "Windows host (WSL2; use PowerShell to manage)".to_string(),
        None => "not found".yellow().to_string(),
    };
    println!("{:<16} {}", "Espanso binary:".bold(), binary);

    let settings = engine.settings_store().load();
    let auto_sync = if settings.espanso.auto_sync { "on" } else { "off" };
    println!("{:<16} {}", "Auto-sync:".bold(), auto_sync);

    let last_sync = settings
        .last_sync()
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());
    println!("{:<16} {}", "Last sync:".bold(), last_sync);

    Ok(())
}
