//! SyncEngine implementation
//!
//! The SyncEngine reconciles the template set into Espanso's match
//! directory. Only a failed resolution, a blocking validation finding or a
//! failed match-file write make a sync fail; cleanup and daemon restart
//! problems become warnings.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use espansr_fs::{compute_content_checksum, compute_file_checksum, write_atomic};
use espansr_platform::{PlatformInfo, SystemHost};

use crate::daemon::{DaemonControl, WslDaemon};
use crate::error::{Error, Result};
use crate::managed::{ManagedFile, match_dir};
use crate::render::{MatchFile, build_launcher_file, build_match_file, launcher_command};
use crate::resolve::{DirProbe, LocalDirs, ResolvedConfigPath, TargetResolver};
use crate::settings::SettingsStore;
use crate::template::{Template, TemplateSource};
use crate::validate::{partition, validate_all};

use super::cleanup::{execute_cleanup, plan_cleanup};
use super::report::SyncReport;

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, resolve, validate and render but touch nothing else.
    /// Actions will be prefixed with "Would ..."
    pub dry_run: bool,
}

/// Engine for syncing templates into Espanso
///
/// Holds the platform snapshot, the settings store backing the resolution
/// cache, and the seams used to probe directories and restart the daemon.
pub struct SyncEngine {
    platform: PlatformInfo,
    settings: SettingsStore,
    probe: Box<dyn DirProbe>,
    daemon: Box<dyn DaemonControl>,
    target_dir: Option<PathBuf>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a sync returns.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncEngine {
    /// Create an engine for `platform`, keeping settings in its own config dir.
    pub fn new(platform: PlatformInfo) -> Self {
        let settings = SettingsStore::in_config_dir(platform.own_config_dir());
        Self {
            platform,
            settings,
            probe: Box::new(LocalDirs),
            daemon: Box::new(WslDaemon::new(SystemHost)),
            target_dir: None,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_settings_store(mut self, settings: SettingsStore) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_probe(mut self, probe: impl DirProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn with_daemon(mut self, daemon: impl DaemonControl + 'static) -> Self {
        self.daemon = Box::new(daemon);
        self
    }

    /// Pin the canonical Espanso config dir, bypassing the cache.
    ///
    /// A cached directory elsewhere is then treated like any other
    /// non-canonical location.
    pub fn with_target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_dir = Some(dir.into());
        self
    }

    pub fn platform(&self) -> &PlatformInfo {
        &self.platform
    }

    pub fn settings_store(&self) -> &SettingsStore {
        &self.settings
    }

    /// Resolve the canonical Espanso config dir: the pinned dir if one was
    /// set, otherwise through the settings cache.
    pub fn resolve_target_dir(&self) -> ResolvedConfigPath {
        if let Some(dir) = &self.target_dir {
            return if self.probe.is_dir(dir) {
                ResolvedConfigPath::Explicit(dir.clone())
            } else {
                ResolvedConfigPath::NotFound
            };
        }
        TargetResolver::new(
            &self.settings,
            self.platform.candidate_dirs(),
            self.probe.as_ref(),
        )
        .resolve()
    }

    /// Where the match file goes for a given Espanso config dir.
    pub fn output_path(target_dir: &Path) -> PathBuf {
        ManagedFile::Matches.path_in(target_dir)
    }

    /// Sync every triggered template from `source` into Espanso.
    ///
    /// An overlapping call on the same engine fails immediately without
    /// touching the filesystem.
    pub fn sync<S: TemplateSource + ?Sized>(
        &self,
        source: &S,
        options: SyncOptions,
    ) -> SyncReport {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::warn!("Sync requested while another sync is running");
            return SyncReport::failure(vec!["A sync is already in progress".to_string()]);
        };

        tracing::debug!(
            platform = %self.platform.kind,
            dry_run = options.dry_run,
            "Starting sync"
        );

        let resolved = self.resolve_target_dir();
        let Some(target_dir) = resolved.dir() else {
            return SyncReport::failure(vec![self.not_found_message()]);
        };

        let templates = match source.triggered() {
            Ok(templates) => templates,
            Err(e) => {
                let mut report =
                    SyncReport::failure(vec![format!("Could not load templates: {e}")]);
                report.target_dir = Some(target_dir.to_path_buf());
                return report;
            }
        };

        let mut report = SyncReport::success();
        report.target_dir = Some(target_dir.to_path_buf());

        if options.dry_run {
            report.dry_run = true;
            self.plan(target_dir, &templates, &mut report);
        } else {
            self.run(target_dir, &templates, &mut report);
        }

        tracing::info!(
            success = report.success,
            count = report.count,
            changed = report.changed,
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            "Sync finished"
        );
        report
    }

    /// Write the launcher match file into the canonical Espanso dir.
    ///
    /// The trigger comes from settings; `binary` is the espansr executable
    /// the trigger starts. Returns the written path.
    pub fn install_launcher(&self, binary: &Path) -> Result<PathBuf> {
        let resolved = self.resolve_target_dir();
        let Some(target_dir) = resolved.dir() else {
            return Err(Error::EspansoNotFound {
                message: self.not_found_message(),
            });
        };

        let settings = self.settings.load();
        let command = launcher_command(&self.platform, binary);
        let yaml = build_launcher_file(settings.launcher_trigger(), &command).to_yaml()?;
        let path = ManagedFile::Launcher.path_in(target_dir);
        write_atomic(&path, yaml.as_bytes())?;

        tracing::info!(
            path = %path.display(),
            trigger = settings.launcher_trigger(),
            "Installed launcher trigger"
        );
        Ok(path)
    }

    fn run(&self, target_dir: &Path, templates: &[Template], report: &mut SyncReport) {
        let plan = plan_cleanup(self.platform.candidate_dirs(), target_dir);
        let (removed, failures) = execute_cleanup(plan);
        report
            .actions
            .extend(removed.iter().map(|a| format!("Removed {}", a.describe())));
        report.warnings.extend(failures);

        if !validate_into(templates, report, "Sync aborted") {
            return;
        }

        let output = Self::output_path(target_dir);
        let match_file = build_match_file(templates);
        if match_file.is_empty() {
            report.actions.push(format!(
                "No templates with triggers; left {} as it was",
                output.display()
            ));
            return;
        }

        let Some(yaml) = render_yaml(&match_file, report) else {
            return;
        };
        let changed = has_changed(&output, &yaml);

        if let Err(e) = write_atomic(&output, yaml.as_bytes()) {
            report.fail(format!("Failed to write {}: {e}", output.display()));
            return;
        }
        report.changed = changed;
        report.count = match_file.len();
        report.actions.push(format!(
            "Wrote {} match(es) to {}",
            match_file.len(),
            output.display()
        ));

        self.record_last_sync(report);
        self.notify_daemon(report);
    }

    fn plan(&self, target_dir: &Path, templates: &[Template], report: &mut SyncReport) {
        for candidate in self.platform.candidate_dirs() {
            if candidate.is_dir() && !match_dir(candidate).is_dir() {
                report
                    .actions
                    .push(format!("Would skip {}: no match directory", candidate.display()));
            }
        }
        report.actions.extend(
            plan_cleanup(self.platform.candidate_dirs(), target_dir)
                .iter()
                .map(|a| format!("Would remove {}", a.describe())),
        );

        if !validate_into(templates, report, "Sync would abort") {
            return;
        }

        let output = Self::output_path(target_dir);
        let match_file = build_match_file(templates);
        if match_file.is_empty() {
            report.actions.push(format!(
                "Would skip writing {}: no templates with triggers",
                output.display()
            ));
            return;
        }

        let Some(yaml) = render_yaml(&match_file, report) else {
            return;
        };
        report.changed = has_changed(&output, &yaml);
        report.count = match_file.len();
        report.actions.push(format!(
            "Would write {} match(es) to {}",
            match_file.len(),
            output.display()
        ));
    }

    fn record_last_sync(&self, report: &mut SyncReport) {
        let next = self.settings.load().with_last_sync(Utc::now());
        if let Err(e) = self.settings.save(&next) {
            tracing::warn!(error = %e, "Could not record last sync time");
            report.warnings.push(format!("Could not record last sync time: {e}"));
        }
    }

    fn notify_daemon(&self, report: &mut SyncReport) {
        if !self.platform.is_wsl2() {
            return;
        }
        // Every write restarts, changed or not
        match self.daemon.restart() {
            Ok(()) => report.actions.push("Restarted Espanso".to_string()),
            Err(e) => {
                tracing::warn!(reason = %e, "Espanso restart failed");
                report.warnings.push(format!(
                    "Could not restart Espanso ({e}); run 'espanso restart' from Windows PowerShell to reload triggers"
                ));
            }
        }
    }

    fn not_found_message(&self) -> String {
        if let Some(dir) = &self.target_dir {
            return format!(
                "Could not find Espanso config directory (searched: {})",
                dir.display()
            );
        }
        let candidates = self.platform.candidate_dirs();
        if candidates.is_empty() {
            return format!(
                "Could not find Espanso config directory (no known locations on platform '{}')",
                self.platform.kind
            );
        }
        let searched = candidates
            .iter()
            .map(|c| c.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Could not find Espanso config directory (searched: {searched})")
    }
}

/// Record findings in the report. Returns false if any finding blocks.
fn validate_into(templates: &[Template], report: &mut SyncReport, abort: &str) -> bool {
    let (errors, warnings) = partition(validate_all(templates));
    report
        .warnings
        .extend(warnings.iter().map(ToString::to_string));

    if errors.is_empty() {
        return true;
    }
    report.errors.extend(errors.iter().map(ToString::to_string));
    report.fail(format!("{abort}: {} validation error(s) found", errors.len()));
    false
}

fn render_yaml(match_file: &MatchFile, report: &mut SyncReport) -> Option<String> {
    match match_file.to_yaml() {
        Ok(yaml) => Some(yaml),
        Err(e) => {
            report.fail(e.to_string());
            None
        }
    }
}

fn has_changed(output: &Path, content: &str) -> bool {
    let next = compute_content_checksum(content.as_bytes());
    compute_file_checksum(output).as_deref() != Some(next.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Variable;
    use crate::{Result, SyncOutcome};
    use espansr_platform::{PlatformKind, Unavailable};
    use espansr_test_utils::TestEnv;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::rc::Rc;

    /// Counts restarts; the first `failures` attempts time out.
    #[derive(Clone)]
    struct FakeDaemon {
        restarts: Rc<Cell<usize>>,
        failures: usize,
    }

    impl FakeDaemon {
        fn new(fail: bool) -> Self {
            Self::failing_first(if fail { usize::MAX } else { 0 })
        }

        fn failing_first(failures: usize) -> Self {
            Self {
                restarts: Rc::new(Cell::new(0)),
                failures,
            }
        }
    }

    impl DaemonControl for FakeDaemon {
        fn restart(&self) -> std::result::Result<(), Unavailable> {
            self.restarts.set(self.restarts.get() + 1);
            if self.restarts.get() <= self.failures {
                Err(Unavailable::TimedOut {
                    program: "powershell.exe".into(),
                    seconds: 10,
                })
            } else {
                Ok(())
            }
        }
    }

    fn platform(env: &TestEnv, kind: PlatformKind, candidates: &[&str]) -> PlatformInfo {
        PlatformInfo {
            kind,
            own_config_dir: env.own_config_dir(),
            candidate_dirs: candidates.iter().map(|c| env.candidate(c)).collect(),
            windows_username: None,
            wsl_distro: None,
        }
    }

    fn greet() -> Vec<Template> {
        vec![Template::new("Greet", "Hello, World!").with_trigger(":greet")]
    }

    fn read_matches(path: &Path) -> MatchFile {
        serde_yaml::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_sync_writes_match_file_and_caches_dir() {
        let env = TestEnv::new();
        let dir = env.create_espanso_dir("espanso");
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["espanso"]));

        let report = engine.sync(&greet(), SyncOptions::default());

        assert_eq!(report.outcome(), SyncOutcome::Synced);
        assert_eq!(report.count, 1);
        assert!(report.changed);
        let written = read_matches(&SyncEngine::output_path(&dir));
        assert_eq!(written.matches[0].trigger, ":greet");
        assert_eq!(
            env.read_settings()["espanso"]["config_path"],
            dir.to_string_lossy().to_string()
        );
        assert_ne!(env.read_settings()["espanso"]["last_sync"], "");
    }

    #[test]
    fn test_pinned_target_wins_over_cached_dir() {
        let env = TestEnv::new();
        let cached = env.create_espanso_dir("cached");
        let chosen = env.create_espanso_dir("chosen");
        SyncEngine::new(platform(&env, PlatformKind::Linux, &["cached"]))
            .sync(&greet(), SyncOptions::default());
        let chosen_output = SyncEngine::output_path(&chosen);
        env.write_file(&chosen_output, "matches: []\n");

        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["chosen"]))
            .with_target_dir(&chosen);
        let report = engine.sync(&greet(), SyncOptions::default());

        assert!(report.success);
        assert_eq!(report.target_dir.as_deref(), Some(chosen.as_path()));
        assert!(report.actions.iter().all(|a| !a.contains("stale copy")));
        assert_eq!(read_matches(&chosen_output).matches[0].trigger, ":greet");
        env.assert_file_exists(&SyncEngine::output_path(&cached));
        assert_eq!(
            env.read_settings()["espanso"]["config_path"],
            cached.to_string_lossy().to_string()
        );
    }

    #[test]
    fn test_missing_pinned_target_fails() {
        let env = TestEnv::new();
        env.create_espanso_dir("espanso");
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["espanso"]))
            .with_target_dir(env.candidate("gone"));

        let report = engine.sync(&greet(), SyncOptions::default());

        assert!(!report.success);
        assert!(report.errors[0].contains("gone"));
    }

    #[test]
    fn test_sync_fails_when_nothing_resolves() {
        let env = TestEnv::new();
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["missing"]));

        let report = engine.sync(&greet(), SyncOptions::default());

        assert_eq!(report.outcome(), SyncOutcome::Failed);
        assert!(report.errors[0].contains("Could not find Espanso config directory"));
        assert!(report.errors[0].contains("missing"));
    }

    #[test]
    fn test_unknown_platform_reports_no_known_locations() {
        let env = TestEnv::new();
        let engine = SyncEngine::new(platform(&env, PlatformKind::Unknown, &[]));
        let report = engine.sync(&greet(), SyncOptions::default());
        assert!(report.errors[0].contains("no known locations"));
    }

    #[test]
    fn test_validation_error_blocks_write() {
        let env = TestEnv::new();
        let dir = env.create_espanso_dir("espanso");
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["espanso"]));
        let templates = vec![
            Template::new("A", "a").with_trigger(":dup"),
            Template::new("B", "b").with_trigger(":dup"),
        ];

        let report = engine.sync(&templates, SyncOptions::default());

        assert!(!report.success);
        assert_eq!(report.count, 0);
        assert!(report.errors.iter().any(|e| e.contains("Sync aborted: 2 validation error(s)")));
        env.assert_file_not_exists(&SyncEngine::output_path(&dir));
    }

    #[test]
    fn test_warnings_do_not_block() {
        let env = TestEnv::new();
        env.create_espanso_dir("espanso");
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["espanso"]));
        let templates = vec![Template::new("Bare", "{{who}}").with_trigger("bare")];

        let report = engine.sync(&templates, SyncOptions::default());

        assert_eq!(report.outcome(), SyncOutcome::SyncedWithWarnings);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_empty_match_list_leaves_previous_file() {
        let env = TestEnv::new();
        let dir = env.create_espanso_dir("espanso");
        let output = SyncEngine::output_path(&dir);
        env.write_file(&output, "previous\n");
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["espanso"]));

        let report = engine.sync(&vec![Template::new("Draft", "x")], SyncOptions::default());

        assert_eq!(report.outcome(), SyncOutcome::NothingToSync);
        assert_eq!(env.read_file(&output), "previous\n");
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let env = TestEnv::new();
        let canonical = env.create_espanso_dir("canonical");
        let other = env.create_espanso_dir("other");
        let legacy = ManagedFile::LegacyMatches.path_in(&canonical);
        let stale = ManagedFile::Matches.path_in(&other);
        env.write_file(&legacy, "old\n");
        env.write_file(&stale, "old\n");
        let daemon = FakeDaemon::new(false);
        let engine = SyncEngine::new(platform(&env, PlatformKind::Wsl2, &["canonical", "other"]))
            .with_daemon(daemon.clone());

        let report = engine.sync(&greet(), SyncOptions { dry_run: true });

        assert!(report.success);
        assert!(report.dry_run);
        assert_eq!(report.count, 1);
        assert!(report.actions.iter().any(|a| a.starts_with("Would remove legacy file")));
        assert!(report.actions.iter().any(|a| a.starts_with("Would remove stale copy")));
        assert!(report.actions.iter().any(|a| a.starts_with("Would write 1 match(es)")));
        env.assert_file_exists(&legacy);
        env.assert_file_exists(&stale);
        env.assert_file_not_exists(&SyncEngine::output_path(&canonical));
        assert_eq!(daemon.restarts.get(), 0);
    }

    #[test]
    fn test_dry_run_reports_skipped_candidates() {
        let env = TestEnv::new();
        env.create_espanso_dir("canonical");
        fs::create_dir_all(env.candidate("bare")).unwrap();
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["canonical", "bare"]));

        let report = engine.sync(&greet(), SyncOptions { dry_run: true });

        assert!(report.actions.iter().any(|a| a.starts_with("Would skip") && a.contains("bare")));
    }

    #[test]
    fn test_wsl2_restarts_after_every_write() {
        let env = TestEnv::new();
        env.create_espanso_dir("espanso");
        let daemon = FakeDaemon::new(false);
        let engine = SyncEngine::new(platform(&env, PlatformKind::Wsl2, &["espanso"]))
            .with_daemon(daemon.clone());

        let first = engine.sync(&greet(), SyncOptions::default());
        let second = engine.sync(&greet(), SyncOptions::default());

        assert!(first.changed);
        assert!(!second.changed);
        assert_eq!(daemon.restarts.get(), 2);
        assert!(second.actions.iter().any(|a| a == "Restarted Espanso"));
    }

    #[test]
    fn test_failed_restart_is_retried_on_next_sync() {
        let env = TestEnv::new();
        env.create_espanso_dir("espanso");
        let daemon = FakeDaemon::failing_first(1);
        let engine = SyncEngine::new(platform(&env, PlatformKind::Wsl2, &["espanso"]))
            .with_daemon(daemon.clone());

        let first = engine.sync(&greet(), SyncOptions::default());
        let second = engine.sync(&greet(), SyncOptions::default());

        assert_eq!(first.outcome(), SyncOutcome::SyncedWithWarnings);
        assert_eq!(second.outcome(), SyncOutcome::Synced);
        assert!(!second.changed);
        assert_eq!(daemon.restarts.get(), 2);
        assert!(second.actions.iter().any(|a| a == "Restarted Espanso"));
    }

    #[test]
    fn test_restart_failure_is_only_a_warning() {
        let env = TestEnv::new();
        env.create_espanso_dir("espanso");
        let engine = SyncEngine::new(platform(&env, PlatformKind::Wsl2, &["espanso"]))
            .with_daemon(FakeDaemon::new(true));

        let report = engine.sync(&greet(), SyncOptions::default());

        assert_eq!(report.outcome(), SyncOutcome::SyncedWithWarnings);
        assert!(report.warnings[0].contains("espanso restart"));
    }

    #[test]
    fn test_native_platform_never_restarts() {
        let env = TestEnv::new();
        env.create_espanso_dir("espanso");
        let daemon = FakeDaemon::new(false);
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["espanso"]))
            .with_daemon(daemon.clone());

        engine.sync(&greet(), SyncOptions::default());
        assert_eq!(daemon.restarts.get(), 0);
    }

    #[test]
    fn test_install_launcher_uses_default_trigger() {
        let env = TestEnv::new();
        let dir = env.create_espanso_dir("espanso");
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["espanso"]));

        let path = engine.install_launcher(Path::new("/opt/espansr")).unwrap();

        assert_eq!(path, ManagedFile::Launcher.path_in(&dir));
        let launcher = read_matches(&path);
        assert_eq!(launcher.matches[0].trigger, ":aopen");
        assert_eq!(launcher.matches[0].vars[0].params["cmd"], "/opt/espansr gui &");
    }

    #[test]
    fn test_install_launcher_on_wsl2_targets_distro() {
        let env = TestEnv::new();
        env.create_espanso_dir("espanso");
        env.write_settings(&serde_json::json!({"espanso": {"launcher_trigger": ":app"}}));
        let mut info = platform(&env, PlatformKind::Wsl2, &["espanso"]);
        info.wsl_distro = Some("Debian".to_string());
        let engine = SyncEngine::new(info);

        let launcher = read_matches(&engine.install_launcher(Path::new("/usr/bin/espansr")).unwrap());

        assert_eq!(launcher.matches[0].trigger, ":app");
        assert_eq!(
            launcher.matches[0].vars[0].params["cmd"],
            "wsl.exe -d Debian -- /usr/bin/espansr gui &"
        );
    }

    #[test]
    fn test_install_launcher_without_espanso_dir_errors() {
        let env = TestEnv::new();
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["missing"]));

        let err = engine.install_launcher(Path::new("/opt/espansr")).unwrap_err();
        assert!(matches!(err, Error::EspansoNotFound { .. }));
        assert!(err.to_string().contains("Could not find Espanso config directory"));
    }

    #[test]
    fn test_cleanup_failure_is_a_warning() {
        let env = TestEnv::new();
        let canonical = env.create_espanso_dir("canonical");
        let other = env.create_espanso_dir("other");
        // A directory in the file's place cannot be unlinked
        let blocked = SyncEngine::output_path(&other);
        env.write_file(&blocked.join("keep"), "x");
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["canonical", "other"]));

        let report = engine.sync(&greet(), SyncOptions::default());

        assert!(report.success);
        assert_eq!(report.outcome(), SyncOutcome::Synced);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("Could not remove stale copy"));
        assert!(blocked.is_dir());
        env.assert_file_exists(&SyncEngine::output_path(&canonical));
    }

    #[test]
    fn test_write_failure_fails_sync() {
        let env = TestEnv::new();
        let dir = env.create_espanso_dir("espanso");
        let output = SyncEngine::output_path(&dir);
        env.write_file(&output.join("keep"), "x");
        let daemon = FakeDaemon::new(false);
        let engine = SyncEngine::new(platform(&env, PlatformKind::Wsl2, &["espanso"]))
            .with_daemon(daemon.clone());

        let report = engine.sync(&greet(), SyncOptions::default());

        assert!(!report.success);
        assert_eq!(report.count, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Failed to write"));
        assert_eq!(daemon.restarts.get(), 0);
        assert_eq!(env.read_settings()["espanso"]["last_sync"], "");
    }

    #[test]
    fn test_sync_keeps_launcher_in_canonical_dir() {
        let env = TestEnv::new();
        let dir = env.create_espanso_dir("espanso");
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["espanso"]));
        let launcher = engine.install_launcher(Path::new("/opt/espansr")).unwrap();

        engine.sync(&greet(), SyncOptions::default());

        env.assert_file_exists(&launcher);
        env.assert_file_exists(&SyncEngine::output_path(&dir));
    }

    /// A source that tries to start a second sync while the first is running.
    struct Reentrant<'a> {
        engine: &'a SyncEngine,
        inner: RefCell<Option<SyncReport>>,
    }

    impl TemplateSource for Reentrant<'_> {
        fn templates(&self) -> Result<Vec<Template>> {
            let nested = self.engine.sync(&greet(), SyncOptions::default());
            *self.inner.borrow_mut() = Some(nested);
            Ok(greet())
        }
    }

    #[test]
    fn test_overlapping_sync_is_rejected() {
        let env = TestEnv::new();
        env.create_espanso_dir("espanso");
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["espanso"]));
        let source = Reentrant {
            engine: &engine,
            inner: RefCell::new(None),
        };

        let outer = engine.sync(&source, SyncOptions::default());
        let nested = source.inner.borrow_mut().take().unwrap();

        assert!(outer.success);
        assert!(!nested.success);
        assert_eq!(nested.errors, vec!["A sync is already in progress"]);
        assert!(engine.sync(&greet(), SyncOptions::default()).success);
    }

    #[test]
    fn test_form_variables_render_with_value_accessor() {
        let env = TestEnv::new();
        let dir = env.create_espanso_dir("espanso");
        let engine = SyncEngine::new(platform(&env, PlatformKind::Linux, &["espanso"]));
        let templates = vec![
            Template::new("Sign", "{{ name }} on {{today}}")
                .with_trigger(":sign")
                .with_variable(Variable::form("name").with_label("Name"))
                .with_variable(Variable::date("today", "%Y-%m-%d")),
        ];

        engine.sync(&templates, SyncOptions::default());

        let written = read_matches(&SyncEngine::output_path(&dir));
        assert_eq!(written.matches[0].replace, "{{name.value}} on {{today}}");
        assert_eq!(written.matches[0].vars.len(), 2);
        assert_eq!(written.matches[0].vars[0].params["layout"], "Name: [[value]]");
    }
}
