//! Version model and bump computation.
//!
//! Tags are plain `major.minor.patch` strings. Anything after the first `-`
//! is an opaque decoration: git's describe suffix, a branch name, or both.

use std::fmt;

use semver::Version;
use thiserror::Error;

/// Base version used when the repository has no tags yet.
pub const INITIAL_VERSION: Version = Version::new(0, 0, 0);

/// Errors from version operations.
#[derive(Error, Debug)]
pub enum VersionError {
    /// A tag does not follow the `major.minor.patch` convention.
    #[error("malformed version `{text}`: {reason}")]
    Malformed {
        /// The text that failed to parse.
        text: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result alias for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// Semver bump level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BumpLevel {
    /// Patch release (x.y.Z).
    #[default]
    Patch,
    /// Minor release (x.Y.0).
    Minor,
    /// Major release (X.0.0).
    Major,
}

impl BumpLevel {
    /// Resolve the `--major`/`--minor`/`--patch` flags.
    ///
    /// Major wins over minor, minor over patch. Patch is the fallback even
    /// when its own flag is off.
    pub const fn from_flags(major: bool, minor: bool, _patch: bool) -> Self {
        if major {
            Self::Major
        } else if minor {
            Self::Minor
        } else {
            Self::Patch
        }
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patch => write!(f, "patch"),
            Self::Minor => write!(f, "minor"),
            Self::Major => write!(f, "major"),
        }
    }
}

/// A version as found in a tag or describe output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVersion {
    /// The numeric triple.
    pub base: Version,
    /// Everything after the first `-`, carried as-is.
    pub decoration: Option<String>,
}

impl TagVersion {
    /// Parse `major.minor.patch[-decoration]`.
    ///
    /// The decoration is split off at the first `-` and not validated.
    /// Fields past the third are ignored, so `1.2.3.4` parses as `1.2.3`.
    pub fn parse(text: &str) -> VersionResult<Self> {
        let (head, decoration) = match text.split_once('-') {
            Some((head, rest)) => (head, Some(rest.to_string())),
            None => (text, None),
        };

        let malformed = |reason: String| VersionError::Malformed {
            text: text.to_string(),
            reason,
        };

        let fields: Vec<&str> = head.splitn(4, '.').collect();
        if fields.len() < 3 {
            return Err(malformed(format!(
                "expected major.minor.patch, found {} field(s)",
                fields.len()
            )));
        }

        let mut numbers = [0u64; 3];
        for (slot, field) in numbers.iter_mut().zip(&fields) {
            *slot = field
                .parse()
                .map_err(|_| malformed(format!("`{field}` is not a non-negative integer")))?;
        }

        Ok(Self {
            base: Version::new(numbers[0], numbers[1], numbers[2]),
            decoration,
        })
    }
}

/// Render a numeric triple as `major.minor.patch`.
///
/// Pre-release and build metadata are never part of a tag name.
pub fn format_version(version: &Version) -> String {
    format!("{}.{}.{}", version.major, version.minor, version.patch)
}

/// Compute the next version by applying a bump level.
///
/// Fails when the bumped field is already `u64::MAX`.
pub fn next_version(current: &Version, level: BumpLevel) -> VersionResult<Version> {
    let next = match level {
        BumpLevel::Patch => current
            .patch
            .checked_add(1)
            .map(|patch| Version::new(current.major, current.minor, patch)),
        BumpLevel::Minor => current
            .minor
            .checked_add(1)
            .map(|minor| Version::new(current.major, minor, 0)),
        BumpLevel::Major => current
            .major
            .checked_add(1)
            .map(|major| Version::new(major, 0, 0)),
    };
    next.ok_or_else(|| VersionError::Malformed {
        text: format_version(current),
        reason: format!("{level} field overflows"),
    })
}

/// Drop git describe's trailing `-<count>-g<hash>`, if present.
///
/// `1.2.3-4-g1a2b3c4` becomes `1.2.3`; anything else is returned unchanged.
pub fn strip_describe_suffix(described: &str) -> &str {
    let mut parts = described.rsplitn(3, '-');
    let (Some(hash), Some(count), Some(tag)) = (parts.next(), parts.next(), parts.next()) else {
        return described;
    };

    let is_hash = hash
        .strip_prefix('g')
        .is_some_and(|h| !h.is_empty() && h.chars().all(|c| c.is_ascii_hexdigit()));
    let is_count = !count.is_empty() && count.chars().all(|c| c.is_ascii_digit());

    if is_hash && is_count { tag } else { described }
}
