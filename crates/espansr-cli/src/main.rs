//! espansr CLI
//!
//! Syncs snippet templates into Espanso's match directory and diagnoses the
//! setup.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::AppContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let Some(command) = cli.command.clone() else {
        // No command provided - show help hint
        println!("{} Espanso template sync", "espansr".green().bold());
        println!();
        println!("Run {} for available commands.", "espansr --help".cyan());
        return Ok(());
    };

    let ctx = AppContext::from_cli(&cli);
    execute_command(&ctx, command)
}

fn execute_command(ctx: &AppContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sync { dry_run, json } => commands::run_sync(ctx, dry_run, json),
        Commands::Validate { json } => commands::run_validate(ctx, json),
        Commands::List => commands::run_list(ctx),
        Commands::Status => commands::run_status(ctx),
        Commands::Doctor => commands::run_doctor(ctx),
        Commands::Restart => commands::run_restart(ctx),
        Commands::Launcher => commands::run_launcher(ctx),
    }
}
