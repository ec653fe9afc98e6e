//! Espanso candidate directories and espansr's own config directory
//!
//! Candidate order encodes priority: the first existing directory wins.

use std::path::{Path, PathBuf};

use crate::host::Host;
use crate::probe::PlatformKind;

/// Directory name Espanso uses under platform config roots
pub const ESPANSO_DIR: &str = "espanso";

/// Dotfile-style Espanso directory under the home directory
pub const ESPANSO_DOT_DIR: &str = ".espanso";

/// Directory name espansr uses for its own settings and templates
pub const OWN_DIR: &str = "espansr";

/// Windows drive mount point as seen from WSL2
pub const WSL_WINDOWS_USERS: &str = "/mnt/c/Users";

/// Derives per-platform paths from home and a few environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathResolver {
    home: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    appdata: Option<PathBuf>,
}

impl PathResolver {
    /// Create a resolver rooted at `home` with no overrides.
    pub fn new(home: Option<PathBuf>) -> Self {
        Self {
            home,
            ..Self::default()
        }
    }

    /// Capture home, `XDG_CONFIG_HOME` and `APPDATA` from a host.
    pub fn from_host(host: &dyn Host) -> Self {
        Self {
            home: host.home_dir(),
            xdg_config_home: host.env_var("XDG_CONFIG_HOME").map(PathBuf::from),
            appdata: host.env_var("APPDATA").map(PathBuf::from),
        }
    }

    pub fn with_xdg_config_home(mut self, dir: impl Into<PathBuf>) -> Self {
        self.xdg_config_home = Some(dir.into());
        self
    }

    pub fn with_appdata(mut self, dir: impl Into<PathBuf>) -> Self {
        self.appdata = Some(dir.into());
        self
    }

    /// Ordered directories where Espanso's configuration may live.
    ///
    /// `windows_user` only matters for WSL2, where the Windows-side
    /// locations take priority over the Linux-side ones.
    pub fn candidate_dirs(&self, kind: PlatformKind, windows_user: Option<&str>) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        match kind {
            PlatformKind::Wsl2 => {
                if let Some(user) = windows_user {
                    let win_home = Path::new(WSL_WINDOWS_USERS).join(user);
                    dirs.push(win_home.join(".config").join(ESPANSO_DIR));
                    dirs.push(win_home.join(ESPANSO_DOT_DIR));
                    dirs.push(win_home.join("AppData").join("Roaming").join(ESPANSO_DIR));
                }
                dirs.extend(self.unix_candidates());
            }
            PlatformKind::Linux => dirs.extend(self.unix_candidates()),
            PlatformKind::Macos => {
                if let Some(home) = &self.home {
                    dirs.push(application_support(home).join(ESPANSO_DIR));
                    dirs.push(home.join(".config").join(ESPANSO_DIR));
                }
            }
            PlatformKind::Windows => {
                if let Some(appdata) = &self.appdata {
                    dirs.push(appdata.join(ESPANSO_DIR));
                }
                if let Some(home) = &self.home {
                    dirs.push(home.join(ESPANSO_DOT_DIR));
                }
            }
            PlatformKind::Unknown => {}
        }
        dirs
    }

    /// Where espansr keeps its own settings and templates.
    ///
    /// Deterministic per platform; this path is never probed.
    pub fn own_config_dir(&self, kind: PlatformKind) -> PathBuf {
        let home = self.home.clone().unwrap_or_else(|| PathBuf::from("."));
        match kind {
            PlatformKind::Linux | PlatformKind::Wsl2 => self.xdg_config_dir().join(OWN_DIR),
            PlatformKind::Macos => application_support(&home).join(OWN_DIR),
            PlatformKind::Windows => match &self.appdata {
                Some(appdata) => appdata.join(OWN_DIR),
                None => home.join(OWN_DIR),
            },
            PlatformKind::Unknown => home.join(".config").join(OWN_DIR),
        }
    }

    fn xdg_config_dir(&self) -> PathBuf {
        match (&self.xdg_config_home, &self.home) {
            (Some(xdg), _) => xdg.clone(),
            (None, Some(home)) => home.join(".config"),
            (None, None) => PathBuf::from(".config"),
        }
    }

    fn unix_candidates(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if self.xdg_config_home.is_some() || self.home.is_some() {
            dirs.push(self.xdg_config_dir().join(ESPANSO_DIR));
        }
        if let Some(home) = &self.home {
            dirs.push(home.join(ESPANSO_DOT_DIR));
        }
        dirs
    }
}

fn application_support(home: &Path) -> PathBuf {
    home.join("Library").join("Application Support")
}
