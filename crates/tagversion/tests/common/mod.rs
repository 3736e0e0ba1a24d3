//! Shared fixtures: throwaway git repositories and a preconfigured binary.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Environment that isolates git from the host's global configuration.
const GIT_ENV: &[(&str, &str)] = &[
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
    ("GIT_AUTHOR_NAME", "Test"),
    ("GIT_AUTHOR_EMAIL", "test@example.com"),
    ("GIT_COMMITTER_NAME", "Test"),
    ("GIT_COMMITTER_EMAIL", "test@example.com"),
];

/// A git repository in a temporary directory, plus a separate directory for
/// logs and user config so the binary never writes inside the repository.
pub struct TestRepo {
    dir: TempDir,
    logs: TempDir,
    commits: usize,
}

impl TestRepo {
    /// Initialize a repository on `main` with a single commit.
    pub fn new() -> Self {
        let mut repo = Self {
            dir: TempDir::new().unwrap(),
            logs: TempDir::new().unwrap(),
            commits: 0,
        };
        repo.git(&["init", "--quiet"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.commit();
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git in the repository, asserting success, and return stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = std::process::Command::new("git")
            .args(args)
            .current_dir(self.path())
            .envs(GIT_ENV.iter().copied())
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Add and commit a new file.
    pub fn commit(&mut self) {
        self.commits += 1;
        let name = format!("file{}.txt", self.commits);
        fs::write(self.path().join(&name), format!("{}\n", self.commits)).unwrap();
        self.git(&["add", &name]);
        self.git(&["commit", "--quiet", "-m", &format!("commit {}", self.commits)]);
    }

    pub fn tag(&self, name: &str) {
        self.git(&["tag", "-a", name, "-m", name]);
    }

    pub fn checkout_new(&self, branch: &str) {
        self.git(&["checkout", "--quiet", "-b", branch]);
    }

    /// All tags, sorted by name.
    pub fn tags(&self) -> Vec<String> {
        self.git(&["tag", "--list"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// The binary, running inside this repository with a clean environment.
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
        cmd.current_dir(self.path())
            .envs(GIT_ENV.iter().copied())
            .env("TAGVERSION_LOG_DIR", self.logs.path())
            .env("XDG_CONFIG_HOME", self.logs.path())
            .env_remove("GIT_BRANCH")
            .env_remove("RUST_LOG")
            .env_remove("TAGVERSION_LOG_PATH");
        cmd
    }
}
