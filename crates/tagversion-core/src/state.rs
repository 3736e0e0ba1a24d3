//! Repository state resolution.
//!
//! Combines the individual git queries into the one answer the CLI cares
//! about: what version should be reported, or bumped from, right now.
//! Nothing here is cached; every call asks git again.

use semver::Version;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::git::{self, GitError, Vcs};
use crate::version::{self, BumpLevel, INITIAL_VERSION, TagVersion, VersionError};

/// Errors from resolving repository state.
#[derive(Error, Debug)]
pub enum StateError {
    /// No branch is checked out (detached HEAD) or `git branch` was unreadable.
    #[error("unable to determine branch")]
    Branch,

    /// HEAD already sits on a plain version tag.
    #[error("Is version={version} already bumped?")]
    AlreadyBumped {
        /// The undecorated version HEAD is tagged with.
        version: String,
    },

    /// An existing tag is not a version.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// A git query failed.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Result alias for state resolution.
pub type StateResult<T> = Result<T, StateError>;

/// How the reported version gets decorated.
#[derive(Debug, Clone, Default)]
pub struct StateOptions {
    /// Append the branch name when HEAD is not exactly on a tag.
    pub decorate_branch: bool,
    /// Branch name to use instead of asking git (e.g., from `GIT_BRANCH`).
    pub branch_override: Option<String>,
}

/// Answers version questions about the repository behind a [`Vcs`].
#[derive(Debug)]
pub struct Resolver<'a, V: Vcs> {
    vcs: &'a V,
    options: StateOptions,
}

impl<'a, V: Vcs> Resolver<'a, V> {
    /// Create a resolver over `vcs`.
    pub const fn new(vcs: &'a V, options: StateOptions) -> Self {
        Self { vcs, options }
    }

    /// The version to report for HEAD, or `None` when no tag exists.
    ///
    /// With branch decoration on and HEAD past the tag, the result is
    /// `<tag>-<branch>`. Without decoration, git's describe output is
    /// returned as-is (e.g., `1.2.3-4-g1a2b3c4`).
    #[instrument(skip(self), fields(decorate = self.options.decorate_branch))]
    pub fn current_version_string(&self) -> StateResult<Option<String>> {
        let described = match self.vcs.describe_tags() {
            Ok(described) => described,
            Err(e) if e.is_not_found() => {
                debug!("no tags in repository");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if !self.options.decorate_branch {
            return Ok(Some(described));
        }

        match self.vcs.describe_exact_match() {
            Ok(_) => Ok(Some(described)),
            Err(e) if e.is_not_found() => {
                let tag = version::strip_describe_suffix(&described);
                let decorated = format!("{tag}-{}", self.branch()?);
                debug!(%decorated, "HEAD is past the tag");
                Ok(Some(decorated))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The sanitized name of the current branch.
    ///
    /// The override wins over asking git.
    #[instrument(skip(self))]
    pub fn branch(&self) -> StateResult<String> {
        let name = match self.options.branch_override {
            Some(ref name) => name.clone(),
            None => {
                let lines = self.vcs.list_branches()?;
                git::parse_current_branch(&lines).ok_or(StateError::Branch)?
            }
        };
        Ok(sanitize_branch(&name))
    }

    /// The version a bump at `level` would create.
    ///
    /// Refuses with [`StateError::AlreadyBumped`] when the current version
    /// carries no decoration, since that means HEAD is already tagged.
    #[instrument(skip(self))]
    pub fn bump_candidate(&self, level: BumpLevel) -> StateResult<Version> {
        let base = match self.current_version_string()? {
            Some(current) => {
                let Some((head, _)) = current.split_once('-') else {
                    return Err(StateError::AlreadyBumped { version: current });
                };
                TagVersion::parse(head)?.base
            }
            None => INITIAL_VERSION,
        };

        let next = version::next_version(&base, level)?;
        debug!(%base, %next, %level, "bump candidate");
        Ok(next)
    }
}

/// Make a branch name safe to append to a version.
///
/// Every `/` becomes `--`, so `feature/x` reads as `feature--x`.
pub fn sanitize_branch(name: &str) -> String {
    name.replace('/', "--")
}
