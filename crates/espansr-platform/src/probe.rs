//! Platform detection
//!
//! [`detect`] is a pure function of a [`Host`]. [`current`] memoizes the
//! result for the real process; [`reset_cache`] forces re-detection.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::host::{Host, OsFamily, SystemHost};
use crate::lookup;
use crate::paths::PathResolver;

/// Environment class espansr is running in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Linux,
    Macos,
    Windows,
    Wsl2,
    Unknown,
}

impl PlatformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
            Self::Wsl2 => "wsl2",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of the execution environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo {
    pub kind: PlatformKind,
    /// Where espansr keeps its settings and templates
    pub own_config_dir: PathBuf,
    /// Ordered Espanso config directories to probe
    pub candidate_dirs: Vec<PathBuf>,
    /// Windows username (WSL2 only)
    pub windows_username: Option<String>,
    /// WSL distribution name (WSL2 only)
    pub wsl_distro: Option<String>,
}

impl PlatformInfo {
    pub fn is_wsl2(&self) -> bool {
        self.kind == PlatformKind::Wsl2
    }

    pub fn candidate_dirs(&self) -> &[PathBuf] {
        &self.candidate_dirs
    }

    pub fn own_config_dir(&self) -> &Path {
        &self.own_config_dir
    }

    /// Replace the own config dir, e.g. from a command-line override.
    pub fn with_own_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.own_config_dir = dir.into();
        self
    }

    /// Replace the candidate list, e.g. to point at a test fixture.
    pub fn with_candidate_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.candidate_dirs = dirs;
        self
    }
}

/// Classify the environment from the OS family and kernel marker.
///
/// An unreadable marker on Linux means plain Linux: a missing
/// virtualization signal is not an error.
pub fn detect_kind(host: &dyn Host) -> PlatformKind {
    match host.os_family() {
        OsFamily::Darwin => PlatformKind::Macos,
        OsFamily::Windows => PlatformKind::Windows,
        OsFamily::Linux => match host.kernel_version() {
            Some(version) => {
                let version = version.to_lowercase();
                if version.contains("microsoft") || version.contains("wsl") {
                    PlatformKind::Wsl2
                } else {
                    PlatformKind::Linux
                }
            }
            None => {
                tracing::debug!("Kernel version marker unreadable, assuming linux");
                PlatformKind::Linux
            }
        },
        OsFamily::Other(name) => {
            tracing::debug!(os = %name, "Unrecognised operating system");
            PlatformKind::Unknown
        }
    }
}

/// Detect the platform and derive every path espansr needs.
pub fn detect(host: &dyn Host) -> PlatformInfo {
    let kind = detect_kind(host);

    let (windows_username, wsl_distro) = if kind == PlatformKind::Wsl2 {
        let user = lookup::windows_username(host)
            .inspect_err(|e| tracing::debug!(reason = %e, "Windows username unavailable"))
            .ok();
        let distro = lookup::wsl_distro_name(host)
            .inspect_err(|e| tracing::debug!(reason = %e, "WSL distro name unavailable"))
            .ok();
        (user, distro)
    } else {
        (None, None)
    };

    let resolver = PathResolver::from_host(host);
    let info = PlatformInfo {
        kind,
        own_config_dir: resolver.own_config_dir(kind),
        candidate_dirs: resolver.candidate_dirs(kind, windows_username.as_deref()),
        windows_username,
        wsl_distro,
    };
    tracing::debug!(
        platform = %info.kind,
        candidates = info.candidate_dirs.len(),
        "Detected platform"
    );
    info
}

static CURRENT: Mutex<Option<Arc<PlatformInfo>>> = Mutex::new(None);

/// The platform of the running process, detected once and cached.
pub fn current() -> Arc<PlatformInfo> {
    let mut slot = CURRENT.lock().unwrap_or_else(PoisonError::into_inner);
    slot.get_or_insert_with(|| Arc::new(detect(&SystemHost))).clone()
}

/// Drop the cached platform so the next [`current`] call re-detects.
pub fn reset_cache() {
    *CURRENT.lock().unwrap_or_else(PoisonError::into_inner) = None;
}
