//! Report-or-bump orchestration.
//!
//! All decision logic lives here. The CLI is purely a display layer that
//! turns a [`BumpOutcome`] or [`BumpError`] into output and an exit code.
//!
//! # Flow
//!
//! 1. **Gate**: refuse to do anything while the working copy is dirty.
//! 2. **Report**: without `--bump`, print the current version.
//! 3. **Bump**: compute the next version and create an annotated tag.

use semver::Version;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::git::{GitError, Vcs};
use crate::state::{Resolver, StateError, StateOptions};
use crate::version::{self, BumpLevel, INITIAL_VERSION};

/// Placeholder replaced by the version in tag message templates.
pub const VERSION_PLACEHOLDER: &str = "{version}";

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors from the report-or-bump flow.
#[derive(Error, Debug)]
pub enum BumpError {
    /// Uncommitted or untracked changes block every action.
    #[error("working copy not clean")]
    DirtyWorkingCopy {
        /// `git status --short` lines, one per offending path.
        lines: Vec<String>,
    },

    /// HEAD already sits on a plain version tag.
    #[error("Is version={version} already bumped?")]
    AlreadyBumped {
        /// The version HEAD is tagged with.
        version: String,
    },

    /// Resolving the current version failed.
    #[error(transparent)]
    State(StateError),

    /// A git query or the tag creation failed.
    #[error(transparent)]
    Git(#[from] GitError),
}

impl BumpError {
    /// Whether this is an anticipated refusal rather than a malfunction.
    pub const fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::DirtyWorkingCopy { .. } | Self::AlreadyBumped { .. }
        )
    }
}

impl From<StateError> for BumpError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::AlreadyBumped { version } => Self::AlreadyBumped { version },
            StateError::Git(e) => Self::Git(e),
            other => Self::State(other),
        }
    }
}

/// Result alias for bump operations.
pub type BumpResult<T> = Result<T, BumpError>;

// ──────────────────────────────────────────────
// Request / outcome
// ──────────────────────────────────────────────

/// Everything one invocation asks for.
#[derive(Debug, Clone, Default)]
pub struct BumpRequest {
    /// Create a new tag instead of reporting the current version.
    pub bump: bool,
    /// Which field to increment.
    pub level: BumpLevel,
    /// Decorate the reported version with the branch name.
    pub decorate_branch: bool,
    /// Branch name to use instead of asking git.
    pub branch_override: Option<String>,
    /// Compute the next version but do not create the tag.
    pub dry_run: bool,
    /// Tag message template; `{version}` is replaced. Defaults to the version.
    pub tag_message: Option<String>,
}

/// What a successful (or quietly unsuccessful) invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpOutcome {
    /// Report mode: the current, possibly decorated, version.
    Current(String),
    /// Report mode with no tags yet; `first` is what a bump would create.
    Unversioned {
        /// The version the first bump would produce.
        first: Version,
    },
    /// A new tag was created (or would have been, on a dry run).
    Tagged {
        /// The new version, also the tag name.
        version: Version,
        /// Whether tag creation was skipped.
        dry_run: bool,
    },
}

impl BumpOutcome {
    /// Whether the CLI should exit successfully.
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Unversioned { .. })
    }
}

// ──────────────────────────────────────────────
// Run
// ──────────────────────────────────────────────

/// Run one report-or-bump invocation against `vcs`.
#[instrument(skip(vcs), fields(bump = request.bump, level = %request.level))]
pub fn run<V: Vcs>(vcs: &V, request: &BumpRequest) -> BumpResult<BumpOutcome> {
    // Gate
    let lines = vcs.status_short()?;
    if !lines.is_empty() {
        warn!(count = lines.len(), "working copy not clean");
        return Err(BumpError::DirtyWorkingCopy { lines });
    }

    let resolver = Resolver::new(
        vcs,
        StateOptions {
            decorate_branch: request.decorate_branch,
            branch_override: request.branch_override.clone(),
        },
    );

    if !request.bump {
        return match resolver.current_version_string()? {
            Some(current) => {
                debug!(%current, "reporting current version");
                Ok(BumpOutcome::Current(current))
            }
            None => Ok(BumpOutcome::Unversioned {
                first: version::next_version(&INITIAL_VERSION, request.level)
                    .map_err(StateError::from)?,
            }),
        };
    }

    let next = resolver.bump_candidate(request.level)?;
    let name = version::format_version(&next);

    if request.dry_run {
        info!(tag = %name, "dry run, tag not created");
    } else {
        let message = render_message(request.tag_message.as_deref(), &name);
        vcs.create_annotated_tag(&name, &message)?;
        info!(tag = %name, "created tag");
    }

    Ok(BumpOutcome::Tagged {
        version: next,
        dry_run: request.dry_run,
    })
}

/// Expand a tag message template. No template means the bare version.
pub fn render_message(template: Option<&str>, version: &str) -> String {
    template.map_or_else(
        || version.to_string(),
        |t| t.replace(VERSION_PLACEHOLDER, version),
    )
}
