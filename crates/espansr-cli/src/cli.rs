//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// espansr - Sync text-expansion templates into Espanso
#[derive(Parser, Debug)]
#[command(name = "espansr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding espansr's config.json and templates/
    #[arg(long, global = true, env = "ESPANSR_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Use this Espanso config directory instead of the platform defaults
    #[arg(long, global = true, env = "ESPANSR_ESPANSO_DIR", value_name = "DIR")]
    pub espanso_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Sync templates to the Espanso match file
    ///
    /// Examples:
    ///   espansr sync             # Write espansr.yml
    ///   espansr sync --dry-run   # Show what would happen
    Sync {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Output the sync report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate templates for Espanso compatibility
    Validate {
        /// Output findings as JSON
        #[arg(long)]
        json: bool,
    },

    /// List templates with triggers
    List,

    /// Show Espanso config location, binary and sync state
    Status,

    /// Diagnose the espansr and Espanso setup
    Doctor,

    /// Restart the Espanso daemon
    Restart,

    /// Install the Espanso launcher trigger
    Launcher,
}
