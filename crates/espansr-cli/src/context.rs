//! Runtime context shared by commands
//!
//! Detects the platform once, applies command-line overrides and hands out
//! the pieces commands need.

use std::path::PathBuf;

use espansr_core::{SyncEngine, TemplateDir};
use espansr_platform::PlatformInfo;

use crate::cli::Cli;

/// Platform snapshot plus the template source derived from it
#[derive(Debug, Clone)]
pub struct AppContext {
    pub platform: PlatformInfo,
    pub templates: TemplateDir,
    /// Espanso config dir named on the command line
    pub espanso_dir: Option<PathBuf>,
}

impl AppContext {
    /// Build from the detected platform and the global flags.
    pub fn from_cli(cli: &Cli) -> Self {
        let detected = espansr_platform::current().as_ref().clone();
        Self::new(detected, cli.config_dir.clone(), cli.espanso_dir.clone())
    }

    pub fn new(
        mut platform: PlatformInfo,
        config_dir: Option<PathBuf>,
        espanso_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(dir) = config_dir {
            platform = platform.with_own_config_dir(dir);
        }
        if let Some(dir) = &espanso_dir {
            platform = platform.with_candidate_dirs(vec![dir.clone()]);
        }
        tracing::debug!(
            platform = %platform.kind,
            own_config_dir = %platform.own_config_dir().display(),
            candidates = platform.candidate_dirs().len(),
            "Resolved runtime context"
        );
        let templates = TemplateDir::in_config_dir(platform.own_config_dir());
        Self {
            platform,
            templates,
            espanso_dir,
        }
    }

    /// Engine for the context; an explicit Espanso dir is pinned as canonical.
    pub fn engine(&self) -> SyncEngine {
        let engine = SyncEngine::new(self.platform.clone());
        match &self.espanso_dir {
            Some(dir) => engine.with_target_dir(dir),
            None => engine,
        }
    }
}
