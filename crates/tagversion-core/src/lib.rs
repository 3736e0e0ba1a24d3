//! Core library for tagversion.
//!
//! Derives the current semantic version of a git repository from its tags
//! and computes (and creates) the next one.
//!
//! # Modules
//!
//! - [`bump`] - Report-or-bump orchestration behind the CLI
//! - [`config`] - Configuration loading and management
//! - [`error`] - Configuration error types and result aliases
//! - [`git`] - The [`git::Vcs`] query trait and its `git` implementation
//! - [`state`] - Current-version resolution and branch decoration
//! - [`version`] - Version parsing, formatting and bump arithmetic
//!
//! # Quick Start
//!
//! ```no_run
//! use tagversion_core::bump::{self, BumpRequest};
//! use tagversion_core::git::GitCli;
//!
//! let git = GitCli::locate().expect("git is installed");
//! let request = BumpRequest {
//!     decorate_branch: true,
//!     ..BumpRequest::default()
//! };
//! let outcome = bump::run(&git, &request).expect("version resolved");
//! println!("{outcome:?}");
//! ```
#![deny(unsafe_code)]

pub mod bump;

pub mod config;

pub mod error;

pub mod git;

pub mod state;

pub mod version;

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult};

// Re-export semver so downstream crates don't need a direct dependency.
pub use semver;
