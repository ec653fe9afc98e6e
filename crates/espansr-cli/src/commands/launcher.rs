//! Launcher command implementation

use std::path::PathBuf;

use colored::Colorize;

use espansr_platform::{SystemHost, find_executable};

use crate::context::AppContext;
use crate::error::{CliError, Result};

/// Run the launcher command
pub fn run_launcher(ctx: &AppContext) -> Result<()> {
    let binary = espansr_binary()
        .ok_or_else(|| CliError::user("Could not locate the espansr executable"))?;
    tracing::debug!(binary = %binary.display(), "Using espansr binary for launcher");

    let path = ctx.engine().install_launcher(&binary)?;
    println!(
        "{} Launcher trigger written to {}",
        "OK".green().bold(),
        path.display().to_string().cyan()
    );
    Ok(())
}

/// `espansr` on the PATH, else the running executable.
fn espansr_binary() -> Option<PathBuf> {
    find_executable(&SystemHost, "espansr").or_else(|| std::env::current_exe().ok())
}
