//! Locating the canonical Espanso config directory
//!
//! Resolution trusts the cached directory in [`SettingsStore`] whenever it
//! still exists and probes nothing else in that case. Otherwise the stale
//! entry is cleared and the platform's candidates are walked in priority
//! order.

use std::path::{Path, PathBuf};

use crate::settings::SettingsStore;

/// Existence check used during resolution.
pub trait DirProbe {
    fn is_dir(&self, path: &Path) -> bool;
}

/// [`DirProbe`] backed by the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDirs;

impl DirProbe for LocalDirs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Outcome of resolving the Espanso config directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedConfigPath {
    /// The cached directory still exists
    Cached(PathBuf),
    /// Found by walking the candidates; now cached
    Probed(PathBuf),
    /// Named explicitly by the caller; the cache is neither read nor written
    Explicit(PathBuf),
    NotFound,
}

impl ResolvedConfigPath {
    pub fn dir(&self) -> Option<&Path> {
        match self {
            Self::Cached(dir) | Self::Probed(dir) | Self::Explicit(dir) => Some(dir),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.dir().is_some()
    }
}

/// Resolves the Espanso config dir through the settings cache.
pub struct TargetResolver<'a> {
    store: &'a SettingsStore,
    candidates: &'a [PathBuf],
    probe: &'a dyn DirProbe,
}

impl<'a> TargetResolver<'a> {
    pub fn new(
        store: &'a SettingsStore,
        candidates: &'a [PathBuf],
        probe: &'a dyn DirProbe,
    ) -> Self {
        Self {
            store,
            candidates,
            probe,
        }
    }

    /// Resolve, writing the settings file at most once for a stale cache
    /// and at most once for a fresh discovery.
    ///
    /// Failing to persist the cache is logged; the resolved directory is
    /// still returned.
    pub fn resolve(&self) -> ResolvedConfigPath {
        let mut settings = self.store.load();

        if let Some(cached) = settings.cached_target_dir() {
            if self.probe.is_dir(&cached) {
                tracing::debug!(dir = %cached.display(), "Using cached Espanso config dir");
                return ResolvedConfigPath::Cached(cached);
            }

            tracing::info!(
                dir = %cached.display(),
                "Cached Espanso config dir is gone, re-probing"
            );
            settings = settings.without_cached_target_dir();
            if let Err(e) = self.store.save(&settings) {
                tracing::warn!(error = %e, "Could not clear cached Espanso config dir");
            }
        }

        for candidate in self.candidates {
            if self.probe.is_dir(candidate) {
                tracing::info!(dir = %candidate.display(), "Found Espanso config dir");
                match settings.with_cached_target_dir(candidate) {
                    Some(next) => {
                        if let Err(e) = self.store.save(&next) {
                            tracing::warn!(error = %e, "Could not cache Espanso config dir");
                        }
                    }
                    None => tracing::warn!(
                        dir = %candidate.display(),
                        "Espanso config dir is not valid UTF-8, not caching it"
                    ),
                }
                return ResolvedConfigPath::Probed(candidate.clone());
            }
        }

        tracing::debug!(candidates = self.candidates.len(), "No Espanso config dir found");
        ResolvedConfigPath::NotFound
    }
}
