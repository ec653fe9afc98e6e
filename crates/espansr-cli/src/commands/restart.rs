//! Restart command implementation

use colored::Colorize;

use espansr_core::restart_espanso;
use espansr_platform::SystemHost;

use crate::context::AppContext;
use crate::error::{CliError, Result};

/// Run the restart command
pub fn run_restart(ctx: &AppContext) -> Result<()> {
    println!("{} Restarting Espanso...", "=>".blue().bold());

    match restart_espanso(&SystemHost, &ctx.platform) {
        Ok(()) => {
            println!("{} Espanso restarted.", "OK".green().bold());
            Ok(())
        }
        Err(e) => {
            tracing::debug!(reason = %e, "Restart failed");
            Err(CliError::user(format!("Could not restart Espanso: {e}")))
        }
    }
}
