//! Integration tests for the artisync CLI binary.
//!
//! These tests exercise the actual compiled binary using assert_cmd. The
//! upstream fixture repository doubles as the mirror, so no network or
//! clone is involved.

use std::fs;
use std::path::{Path, PathBuf};

use artisync_test_utils::UpstreamRepo;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REL: &str = "agents/review.agent.md";
const BASE: &str = "# Review\nline two\nline three\nline four\n";
const LOCAL: &str = "# Review\nline two\nline three, local\nline four\n";
const UPSTREAM: &str = "# Review\nline two\nline three, upstream\nline four\n";

/// Get a Command for the artisync binary with isolated settings
fn artisync(sandbox: &Sandbox) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("artisync"));
    cmd.env_remove("ARTISYNC_CONFIG")
        .env_remove("RUST_LOG")
        .current_dir(sandbox.workspace())
        .arg("--config")
        .arg(&sandbox.config);
    cmd
}

/// Temporary workspace with a settings file pointing all state inside it
struct Sandbox {
    dir: TempDir,
    config: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("workspace")).unwrap();
        let config = dir.path().join("settings.toml");
        fs::write(
            &config,
            format!(
                "storage_dir = '{}'\nworkspace_state_dir = '{}'\n",
                dir.path().join("data").display(),
                dir.path().join("state").display()
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn workspace(&self) -> PathBuf {
        self.dir.path().join("workspace")
    }

    fn installed(&self) -> PathBuf {
        self.workspace().join("agents").join("review.agent.md")
    }
}

fn install(sandbox: &Sandbox, upstream: &UpstreamRepo) {
    artisync(sandbox)
        .arg("install")
        .arg(upstream.path_of(REL))
        .arg(sandbox.workspace().join("agents"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed"));
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// ============================================================================
// Help and naming
// ============================================================================

#[test]
fn help_output() {
    Command::new(assert_cmd::cargo::cargo_bin!("artisync"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("agents and skills"));
}

#[test]
fn no_command_prints_hint() {
    let sandbox = Sandbox::new();
    artisync(&sandbox)
        .assert()
        .success()
        .stdout(predicate::str::contains("artisync --help"));
}

#[test]
fn mirror_name_prints_owner_repo_and_hash() {
    let sandbox = Sandbox::new();
    artisync(&sandbox)
        .args(["mirror-name", "https://github.com/octo/prompts.git"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^octo_prompts_[0-9a-f]{6}\n$").unwrap());
}

// ============================================================================
// Install, status, update
// ============================================================================

#[test]
fn install_then_status_reports_clean() {
    let sandbox = Sandbox::new();
    let upstream = UpstreamRepo::new();
    let r1 = upstream.commit_file(REL, BASE);

    install(&sandbox, &upstream);

    assert_eq!(read(&sandbox.installed()), BASE);
    assert!(sandbox
        .dir
        .path()
        .join("state")
        .join("workspace-state.json")
        .is_file());

    artisync(&sandbox)
        .arg("status")
        .arg(upstream.path_of(REL))
        .arg(sandbox.installed())
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\": \"clean\""))
        .stdout(predicate::str::contains(r1.as_str()));
}

#[test]
fn update_cancel_keeps_local_file() {
    let sandbox = Sandbox::new();
    let upstream = UpstreamRepo::new();
    upstream.commit_file(REL, BASE);
    install(&sandbox, &upstream);

    fs::write(sandbox.installed(), LOCAL).unwrap();
    upstream.commit_file(REL, UPSTREAM);

    artisync(&sandbox)
        .arg("update")
        .arg(upstream.path_of(REL))
        .arg(sandbox.installed())
        .args(["--on-conflict", "cancel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cancelled"));

    assert_eq!(read(&sandbox.installed()), LOCAL);
}

#[test]
fn update_manual_leaves_markers() {
    let sandbox = Sandbox::new();
    let upstream = UpstreamRepo::new();
    upstream.commit_file(REL, BASE);
    install(&sandbox, &upstream);

    fs::write(sandbox.installed(), LOCAL).unwrap();
    upstream.commit_file(REL, UPSTREAM);

    artisync(&sandbox)
        .arg("update")
        .arg(upstream.path_of(REL))
        .arg(sandbox.installed())
        .args(["--on-conflict", "manual"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));

    let content = read(&sandbox.installed());
    assert!(content.contains("<<<<<<< current"), "got:\n{content}");
    assert!(content.contains(">>>>>>> new"), "got:\n{content}");

    artisync(&sandbox)
        .arg("status")
        .arg(upstream.path_of(REL))
        .arg(sandbox.installed())
        .assert()
        .success()
        .stdout(predicate::str::contains("locally modified"));
}

#[test]
fn update_of_unmodified_copy_overwrites() {
    let sandbox = Sandbox::new();
    let upstream = UpstreamRepo::new();
    upstream.commit_file(REL, BASE);
    install(&sandbox, &upstream);
    upstream.commit_file(REL, UPSTREAM);

    artisync(&sandbox)
        .arg("update")
        .arg(upstream.path_of(REL))
        .arg(sandbox.installed())
        .assert()
        .success();

    assert_eq!(read(&sandbox.installed()), UPSTREAM);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn missing_source_fails_with_error_prefix() {
    let sandbox = Sandbox::new();
    artisync(&sandbox)
        .args(["install", "does/not/exist.agent.md", "out"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("Source file not found"));
}

#[test]
fn unreadable_settings_file_fails() {
    let sandbox = Sandbox::new();
    fs::write(&sandbox.config, "storage_dir = [").unwrap();
    let upstream = UpstreamRepo::new();
    upstream.commit_file(REL, BASE);

    artisync(&sandbox)
        .arg("install")
        .arg(upstream.path_of(REL))
        .arg("out")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("TOML"));
}
