//! Core orchestration for espansr
//!
//! Turns a set of snippet [`Template`]s into an Espanso match file:
//!
//! ```text
//!   TemplateSource ──> Validator ──> render ──> write_atomic
//!                                                  ^
//!   PlatformInfo ──> TargetResolver (SettingsStore cache) ──┘
//! ```
//!
//! [`SyncEngine`] drives the pipeline and reports through [`SyncReport`].
//! Platform facts come from `espansr-platform`, file handling from
//! `espansr-fs`.

pub mod daemon;
pub mod doctor;
pub mod error;
pub mod managed;
pub mod render;
pub mod resolve;
pub mod settings;
pub mod sync;
pub mod template;
pub mod validate;

pub use daemon::{DaemonControl, WslDaemon, restart_espanso};
pub use doctor::{CheckLevel, DoctorCheck, DoctorReport, run_doctor};
pub use error::{Error, Result};
pub use managed::{MATCH_SUBDIR, ManagedFile, match_dir};
pub use render::{
    EspansoMatch, EspansoVar, LAUNCHER_SUBCOMMAND, MatchFile, build_launcher_file, build_match_file,
    launcher_command, render_content,
};
pub use resolve::{DirProbe, LocalDirs, ResolvedConfigPath, TargetResolver};
pub use settings::{EspansoSettings, Settings, SettingsStore};
pub use sync::{SyncEngine, SyncOptions, SyncOutcome, SyncReport};
pub use template::{Template, TemplateDir, TemplateSource, Variable, VariableKind};
pub use validate::{Severity, ValidationFinding, validate_all, validate_template};
