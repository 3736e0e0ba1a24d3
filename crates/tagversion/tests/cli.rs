//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI surface behaves correctly from a user's perspective.

mod common;

use assert_cmd::Command;
use common::TestRepo;
use predicates::prelude::*;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("bump"));
}

#[test]
fn long_help_lists_environment() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("GIT_BRANCH"))
        .stdout(predicate::str::contains("TAGVERSION_LOG_DIR"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn bump_help_shows_flags() {
    cmd()
        .args(["bump", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bump"))
        .stdout(predicate::str::contains("--patch"))
        .stdout(predicate::str::contains("--minor"))
        .stdout(predicate::str::contains("--major"))
        .stdout(predicate::str::contains("--no-branch"))
        .stdout(predicate::str::contains("--dry-run"));
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    let repo = TestRepo::new();
    repo.tag("1.0.0");
    repo.cmd().args(["-q", "bump"]).assert().success().stdout("1.0.0\n");
}

#[test]
fn verbose_flags_keep_stdout_to_one_line() {
    let repo = TestRepo::new();
    repo.tag("1.0.0");
    repo.cmd().args(["-vv", "bump"]).assert().success().stdout("1.0.0\n");
}

#[test]
fn color_choices_accepted() {
    let repo = TestRepo::new();
    repo.tag("1.0.0");
    for choice in ["auto", "always", "never"] {
        repo.cmd()
            .args(["--color", choice, "bump"])
            .assert()
            .success()
            .stdout("1.0.0\n");
    }
}

#[test]
fn chdir_flag_runs_in_repository() {
    let repo = TestRepo::new();
    repo.tag("4.5.6");
    let elsewhere = tempfile::TempDir::new().unwrap();

    repo.cmd()
        .current_dir(elsewhere.path())
        .args(["-C", repo.path().to_str().unwrap(), "bump"])
        .assert()
        .success()
        .stdout("4.5.6\n");
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn invalid_flag_shows_error() {
    cmd()
        .args(["bump", "--not-a-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "bump"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to change directory"));
}
