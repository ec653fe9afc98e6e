//! Files espansr owns inside an Espanso configuration directory

use std::path::{Path, PathBuf};

/// Subdirectory of an Espanso config dir that holds match files
pub const MATCH_SUBDIR: &str = "match";

/// A file espansr may write, regenerate or delete.
///
/// Every managed file lives in `<espanso config>/match/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagedFile {
    /// The generated match file
    Matches,
    /// Shell trigger that launches espansr
    Launcher,
    /// Match file written by the pre-rename release
    LegacyMatches,
    /// Launcher written by the pre-rename release
    LegacyLauncher,
}

impl ManagedFile {
    /// Current managed files; stale copies are removed outside the canonical dir.
    pub const CURRENT: [ManagedFile; 2] = [Self::Matches, Self::Launcher];

    /// Legacy managed files; removed from every candidate dir.
    pub const LEGACY: [ManagedFile; 2] = [Self::LegacyMatches, Self::LegacyLauncher];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Matches => "espansr.yml",
            Self::Launcher => "espansr-launcher.yml",
            Self::LegacyMatches => "automatr-espanso.yml",
            Self::LegacyLauncher => "automatr-launcher.yml",
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::LegacyMatches | Self::LegacyLauncher)
    }

    /// Location of this file for the given Espanso config directory.
    pub fn path_in(&self, config_dir: &Path) -> PathBuf {
        match_dir(config_dir).join(self.file_name())
    }
}

/// `match/` directory of an Espanso config directory.
pub fn match_dir(config_dir: &Path) -> PathBuf {
    config_dir.join(MATCH_SUBDIR)
}
