//! End-to-end sync scenarios
//!
//! Each test builds a throwaway machine layout with [`TestEnv`], detects a
//! platform for it (through a [`FixedHost`] where the platform matters) and
//! drives [`SyncEngine`] against the on-disk template directory.

use std::fs;
use std::path::{Path, PathBuf};

use espansr_core::{ManagedFile, MatchFile, SyncEngine, SyncOptions, SyncOutcome, TemplateDir};
use espansr_fs::compute_file_checksum;
use espansr_platform::{FixedHost, OsFamily, PlatformInfo, PlatformKind, Unavailable, detect};
use espansr_test_utils::{TestEnv, template_json};
use pretty_assertions::assert_eq;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// A Linux platform whose candidates are `names` under the env root.
fn linux(env: &TestEnv, names: &[&str]) -> PlatformInfo {
    PlatformInfo {
        kind: PlatformKind::Linux,
        own_config_dir: env.own_config_dir(),
        candidate_dirs: names.iter().map(|n| env.candidate(n)).collect(),
        windows_username: None,
        wsl_distro: None,
    }
}

fn templates(env: &TestEnv) -> TemplateDir {
    TemplateDir::in_config_dir(&env.own_config_dir())
}

fn output(dir: &Path) -> PathBuf {
    ManagedFile::Matches.path_in(dir)
}

fn read_matches(path: &Path) -> MatchFile {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Could not read {}: {e}", path.display()));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Invalid match file {}: {e}", path.display()))
}

/// Copy every template under `test-fixtures/templates` into the env.
fn install_fixture_templates(env: &TestEnv) {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/templates");
    let mut entries: Vec<_> = fs::read_dir(&fixtures)
        .unwrap_or_else(|e| panic!("Missing fixtures at {}: {e}", fixtures.display()))
        .map(|e| e.unwrap().path())
        .collect();
    entries.sort();
    for path in entries {
        let target = env.templates_dir().join(path.file_name().unwrap());
        env.write_file(&target, &fs::read_to_string(&path).unwrap());
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn happy_path_writes_single_match() {
    let env = TestEnv::new();
    let dir = env.create_espanso_dir("espanso");
    env.write_template("greet", &template_json("Greet", ":greet", "Hello, World!"));
    let engine = SyncEngine::new(linux(&env, &["espanso"]));

    let report = engine.sync(&templates(&env), SyncOptions::default());

    assert_eq!(report.outcome(), SyncOutcome::Synced);
    assert_eq!(report.count, 1);
    let written = read_matches(&output(&dir));
    assert_eq!(written.matches.len(), 1);
    assert_eq!(written.matches[0].trigger, ":greet");
    assert_eq!(written.matches[0].replace, "Hello, World!");
    assert!(written.matches[0].vars.is_empty());
}

#[test]
fn no_triggers_is_success_without_writing() {
    let env = TestEnv::new();
    let dir = env.create_espanso_dir("espanso");
    env.write_template("a", &template_json("A", "", "a"));
    env.write_template("b", &template_json("B", "", "b"));
    let engine = SyncEngine::new(linux(&env, &["espanso"]));

    let report = engine.sync(&templates(&env), SyncOptions::default());

    assert!(report.success);
    assert_eq!(report.count, 0);
    assert_eq!(report.outcome(), SyncOutcome::NothingToSync);
    env.assert_file_not_exists(&output(&dir));
}

#[test]
fn legacy_files_removed_from_every_candidate() {
    let env = TestEnv::new();
    let canonical = env.create_espanso_dir("canonical");
    let secondary = env.create_espanso_dir("secondary");
    let legacy: Vec<PathBuf> = [&canonical, &secondary]
        .into_iter()
        .flat_map(|dir| ManagedFile::LEGACY.map(|f| f.path_in(dir)))
        .collect();
    for path in &legacy {
        env.write_file(path, "matches: []\n");
    }
    env.write_file(&output(&canonical), "matches: []\n");
    env.write_template("greet", &template_json("Greet", ":greet", "Hello, World!"));
    let engine = SyncEngine::new(linux(&env, &["canonical", "secondary"]));

    let report = engine.sync(&templates(&env), SyncOptions::default());

    assert!(report.success);
    for path in &legacy {
        env.assert_file_not_exists(path);
    }
    assert_eq!(read_matches(&output(&canonical)).matches[0].trigger, ":greet");
}

#[test]
fn stale_copy_removed_outside_canonical() {
    let env = TestEnv::new();
    let canonical = env.create_espanso_dir("canonical");
    let secondary = env.create_espanso_dir("secondary");
    let stale = output(&secondary);
    env.write_file(&stale, "matches: []\n");
    env.write_template("greet", &template_json("Greet", ":greet", "Hello, World!"));
    let engine = SyncEngine::new(linux(&env, &["canonical", "secondary"]));

    let report = engine.sync(&templates(&env), SyncOptions::default());

    assert!(report.success);
    env.assert_file_not_exists(&stale);
    env.assert_file_exists(&output(&canonical));
}

#[test]
fn sync_is_idempotent() {
    let env = TestEnv::new();
    let dir = env.create_espanso_dir("espanso");
    install_fixture_templates(&env);
    let engine = SyncEngine::new(linux(&env, &["espanso"]));

    let first = engine.sync(&templates(&env), SyncOptions::default());
    let first_bytes = fs::read(output(&dir)).unwrap();
    let second = engine.sync(&templates(&env), SyncOptions::default());
    let second_bytes = fs::read(output(&dir)).unwrap();

    assert_eq!(first.count, 3);
    assert_eq!(second.count, first.count);
    assert_eq!(first_bytes, second_bytes);
    assert!(first.changed);
    assert!(!second.changed);
}

#[test]
fn fixture_templates_render_espanso_vars() {
    let env = TestEnv::new();
    let dir = env.create_espanso_dir("espanso");
    install_fixture_templates(&env);
    let engine = SyncEngine::new(linux(&env, &["espanso"]));

    engine.sync(&templates(&env), SyncOptions::default());
    let written = read_matches(&output(&dir));

    let triggers: Vec<_> = written.matches.iter().map(|m| m.trigger.as_str()).collect();
    assert_eq!(triggers, vec![":greet", ":sig", ":standup"]);

    let signature = &written.matches[1];
    assert_eq!(signature.replace, "Best regards,\n{{name.value}}");
    assert_eq!(signature.vars[0].params["layout"], "Your name: [[value]]");
    assert_eq!(signature.vars[0].params["default"], "Alex");

    let standup = &written.matches[2];
    assert!(standup.replace.starts_with("Standup {{today}}"));
    assert!(standup.replace.contains("{{done.value}}"));
    assert_eq!(standup.vars[0].kind, "date");
    assert_eq!(standup.vars[0].params["format"], "%Y-%m-%d");
    assert_eq!(standup.vars[2].params["fields"]["value"]["multiline"], true);
}

#[test]
fn deleted_cache_dir_falls_back_to_probing() {
    let env = TestEnv::new();
    let first = env.create_espanso_dir("first");
    let second = env.create_espanso_dir("second");
    env.write_template("greet", &template_json("Greet", ":greet", "Hello"));
    let engine = SyncEngine::new(linux(&env, &["first", "second"]));

    engine.sync(&templates(&env), SyncOptions::default());
    assert_eq!(
        env.read_settings()["espanso"]["config_path"],
        first.to_string_lossy().to_string()
    );

    fs::remove_dir_all(&first).unwrap();
    let report = engine.sync(&templates(&env), SyncOptions::default());

    assert!(report.success);
    assert_eq!(report.target_dir.as_deref(), Some(second.as_path()));
    assert_eq!(
        env.read_settings()["espanso"]["config_path"],
        second.to_string_lossy().to_string()
    );
    env.assert_file_exists(&output(&second));
}

#[test]
fn validation_error_writes_zero_bytes() {
    let env = TestEnv::new();
    let dir = env.create_espanso_dir("espanso");
    env.write_file(&output(&dir), "previous\n");
    let before = compute_file_checksum(&output(&dir));
    env.write_template("a", &template_json("A", ":dup", "a"));
    env.write_template("b", &template_json("B", ":dup", "b"));
    env.write_template("c", &template_json("C", "x", "c"));
    let engine = SyncEngine::new(linux(&env, &["espanso"]));

    let report = engine.sync(&templates(&env), SyncOptions::default());

    assert!(!report.success);
    assert_eq!(report.count, 0);
    // two duplicate participants, one short trigger, one summary line
    assert_eq!(report.errors.len(), 4);
    assert_eq!(compute_file_checksum(&output(&dir)), before);
}

#[test]
fn wsl2_without_windows_user_uses_linux_side_dirs() {
    let env = TestEnv::new();
    let home = env.root().join("home");
    let espanso = home.join(".config").join("espanso");
    fs::create_dir_all(espanso.join("match")).unwrap();

    let host = FixedHost::new(OsFamily::Linux)
        .with_kernel_version("Linux version 5.15.153.1-microsoft-standard-WSL2")
        .with_home(&home)
        .with_command_error(
            "cmd.exe",
            Unavailable::TimedOut {
                program: "cmd.exe".into(),
                seconds: 5,
            },
        );
    let platform = detect(&host);
    assert_eq!(platform.kind, PlatformKind::Wsl2);
    assert_eq!(platform.windows_username, None);

    let own = platform.own_config_dir().to_path_buf();
    env.write_file(
        &own.join("templates").join("greet.json"),
        &template_json("Greet", ":greet", "Hello").to_string(),
    );

    let report = SyncEngine::new(platform).sync(
        &TemplateDir::in_config_dir(&own),
        SyncOptions { dry_run: true },
    );

    assert!(report.success);
    assert_eq!(report.target_dir, Some(espanso));
    assert_eq!(report.count, 1);
}
