//! Git queries consumed by the version resolver.
//!
//! Shells out to `git` for all operations. This ensures we inherit the user's
//! GPG signing, hooks, identity, and other configuration when tagging.
//!
//! The [`Vcs`] trait is the seam the rest of the crate depends on; [`GitCli`]
//! is the production implementation.

use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

#[cfg(test)]
pub(crate) mod fake;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// Failed to execute the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// The `git` binary could not be found on `PATH`.
    #[error("git executable not found: {0}")]
    NotInstalled(#[from] which::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "status").
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// A describe query found no matching tag.
    #[error("no tag found for `{query}`")]
    NotFound {
        /// The describe invocation that came back empty.
        query: String,
    },

    /// Not inside a git repository.
    #[error("not a git repository (or any parent up to mount point)")]
    NotARepo,
}

impl GitError {
    /// Whether this is the "no tag" condition rather than a real failure.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// The repository queries the resolver and orchestrator need.
///
/// Implementations must report a missing tag from either describe query as
/// [`GitError::NotFound`]; every other failure is treated as fatal.
pub trait Vcs {
    /// Most recent tag reachable from HEAD, with git's `-<n>-g<hash>` suffix
    /// when HEAD is past it.
    fn describe_tags(&self) -> GitResult<String>;

    /// The tag HEAD sits on exactly, or [`GitError::NotFound`].
    fn describe_exact_match(&self) -> GitResult<String>;

    /// One entry per local branch; the checked-out one is prefixed with `*`.
    fn list_branches(&self) -> GitResult<Vec<String>>;

    /// One line per modified or untracked path. Empty means clean.
    fn status_short(&self) -> GitResult<Vec<String>>;

    /// Create an annotated tag on HEAD.
    fn create_annotated_tag(&self, name: &str, message: &str) -> GitResult<()>;
}

/// [`Vcs`] backed by the `git` command line.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    workdir: Option<Utf8PathBuf>,
}

impl GitCli {
    /// Run git in the process's current directory.
    pub const fn new() -> Self {
        Self { workdir: None }
    }

    /// Run git inside `dir` instead of the current directory.
    pub fn in_dir<P: AsRef<Utf8Path>>(dir: P) -> Self {
        Self {
            workdir: Some(dir.as_ref().to_path_buf()),
        }
    }

    /// Like [`GitCli::new`], but fail early when `git` is not installed.
    #[instrument]
    pub fn locate() -> GitResult<Self> {
        let path = which::which("git")?;
        debug!(path = %path.display(), "found git");
        Ok(Self::new())
    }

    /// Run a git command and return its stdout.
    fn git(&self, args: &[&str]) -> GitResult<String> {
        let mut command = Command::new("git");
        command.args(args);
        if let Some(ref dir) = self.workdir {
            command.current_dir(dir);
        }
        let output = command.output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

            // Detect "not a git repo" specifically
            if stderr.contains("not a git repository") {
                return Err(GitError::NotARepo);
            }

            Err(GitError::Command {
                command: args.first().unwrap_or(&"").to_string(),
                stderr,
            })
        }
    }

    /// Run a describe query, mapping git's "nothing to describe" messages
    /// onto [`GitError::NotFound`].
    fn describe(&self, args: &[&str]) -> GitResult<String> {
        match self.git(args) {
            Ok(out) => Ok(out.trim().to_string()),
            Err(GitError::Command { stderr, .. }) if is_missing_tag(&stderr) => {
                Err(GitError::NotFound {
                    query: args.join(" "),
                })
            }
            Err(e) => Err(e),
        }
    }
}

impl Vcs for GitCli {
    #[instrument(skip(self))]
    fn describe_tags(&self) -> GitResult<String> {
        let described = self.describe(&["describe", "--tags"])?;
        debug!(%described, "describe");
        Ok(described)
    }

    #[instrument(skip(self))]
    fn describe_exact_match(&self) -> GitResult<String> {
        let tag = self.describe(&["describe", "--tags", "--exact-match"])?;
        debug!(%tag, "exact match");
        Ok(tag)
    }

    #[instrument(skip(self))]
    fn list_branches(&self) -> GitResult<Vec<String>> {
        let output = self.git(&["branch", "--no-color"])?;
        Ok(non_empty_lines(&output))
    }

    #[instrument(skip(self))]
    fn status_short(&self) -> GitResult<Vec<String>> {
        let output = self.git(&["status", "--short", "--untracked-files=all"])?;
        let lines = non_empty_lines(&output);
        debug!(count = lines.len(), "working copy status");
        Ok(lines)
    }

    #[instrument(skip(self, message))]
    fn create_annotated_tag(&self, name: &str, message: &str) -> GitResult<()> {
        self.git(&["tag", "-a", name, "-m", message])?;
        debug!(%name, "created annotated tag");
        Ok(())
    }
}

/// Pick the checked-out branch out of `git branch` output.
///
/// Returns `None` when no entry is marked current, or when the marked entry
/// is a detached HEAD such as `* (HEAD detached at 1a2b3c4)`.
pub fn parse_current_branch<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    let line = lines
        .iter()
        .map(|l| l.as_ref().trim())
        .find(|l| l.starts_with('*'))?;
    let name = line.trim_start_matches('*').trim();
    if name.is_empty() || name.starts_with('(') {
        return None;
    }
    name.split_whitespace().last().map(str::to_string)
}

fn is_missing_tag(stderr: &str) -> bool {
    stderr.contains("No names found")
        || stderr.contains("No tags can describe")
        || stderr.contains("no tag exactly matches")
}

fn non_empty_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
