//! Platform detection and Espanso path discovery
//!
//! Detects which environment espansr runs in (Linux, macOS, Windows or
//! WSL2 on Windows) and derives where espansr keeps its own settings and
//! where Espanso's configuration may live.
//!
//! Everything environment-dependent goes through the [`Host`] trait so the
//! detection logic stays a pure function of its inputs:
//!
//! ```text
//!   Host (OS, /proc/version, env vars, home, external commands)
//!     |
//!   probe::detect  ->  PlatformInfo { kind, own_config_dir, candidate_dirs }
//!     |
//!   PathResolver
//! ```

pub mod command;
pub mod error;
pub mod host;
pub mod lookup;
pub mod paths;
pub mod probe;

pub use error::Unavailable;
pub use host::{FixedHost, Host, OsFamily, SystemHost};
pub use lookup::{find_executable, windows_username, wsl_distro_name};
pub use paths::PathResolver;
pub use probe::{PlatformInfo, PlatformKind, current, detect, reset_cache};
