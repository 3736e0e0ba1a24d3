//! Bump command: thin CLI layer over `tagversion_core::bump`.

use std::process::ExitCode;

use anyhow::Context;
use clap::Args;
use tracing::{debug, instrument};

use tagversion_core::bump::{self, BumpError, BumpOutcome, BumpRequest};
use tagversion_core::config::Config;
use tagversion_core::git::Vcs;
use tagversion_core::version::{BumpLevel, format_version};

use super::print_diagnostic;

/// Arguments for the `bump` subcommand.
#[derive(Args, Debug)]
pub struct BumpArgs {
    /// Perform a version bump; by default the current version is displayed
    #[arg(long)]
    pub bump: bool,

    /// Bump the patch version; this is the default bump if one is not specified
    #[arg(long, default_value_t = true)]
    pub patch: bool,

    /// Bump the minor version and reset patch back to 0
    #[arg(long)]
    pub minor: bool,

    /// Bump the major version and reset minor and patch back to 0
    #[arg(long)]
    pub major: bool,

    /// Do not append the branch to the version when the current commit is not tagged
    #[arg(long)]
    pub no_branch: bool,

    /// Show the version a bump would create without tagging
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for BumpArgs {
    fn default() -> Self {
        Self {
            bump: false,
            patch: true,
            minor: false,
            major: false,
            no_branch: false,
            dry_run: false,
        }
    }
}

impl BumpArgs {
    /// Combine flags, configuration and the branch override into a request.
    pub fn to_request(&self, config: &Config, branch_override: Option<String>) -> BumpRequest {
        BumpRequest {
            bump: self.bump,
            level: BumpLevel::from_flags(self.major, self.minor, self.patch),
            decorate_branch: !self.no_branch && config.decorate_branch(),
            branch_override,
            dry_run: self.dry_run,
            tag_message: config.tag_message().map(str::to_string),
        }
    }
}

/// Execute the bump command.
///
/// Anticipated refusals (dirty working copy, already bumped, nothing to
/// report) are printed here and yield a failure exit code. Anything else is
/// returned as an error for `main` to report.
#[instrument(name = "cmd_bump", skip_all, fields(bump = args.bump, dry_run = args.dry_run))]
pub fn cmd_bump<V: Vcs>(
    args: &BumpArgs,
    config: &Config,
    vcs: &V,
    branch_override: Option<String>,
) -> anyhow::Result<ExitCode> {
    let request = args.to_request(config, branch_override);
    debug!(?request, "executing bump command");

    match bump::run(vcs, &request) {
        Ok(outcome) => {
            report_outcome(&outcome);
            Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(BumpError::DirtyWorkingCopy { lines }) => {
            for line in &lines {
                eprintln!("{line}");
            }
            print_diagnostic("Abort:", "working copy not clean.");
            Ok(ExitCode::FAILURE)
        }
        Err(err @ BumpError::AlreadyBumped { .. }) => {
            eprintln!("{err}");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err).context("version resolution failed"),
    }
}

fn report_outcome(outcome: &BumpOutcome) {
    match outcome {
        BumpOutcome::Current(version) => println!("{version}"),
        BumpOutcome::Unversioned { first } => {
            eprintln!(
                "No version found, use --bump to set to {}",
                format_version(first)
            );
        }
        BumpOutcome::Tagged { version, dry_run } => {
            if *dry_run {
                eprintln!("Dry run: tag not created.");
            }
            println!("{}", format_version(version));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: BumpArgs,
    }

    fn parse(argv: &[&str]) -> BumpArgs {
        let mut full = vec!["bump"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    #[test]
    fn defaults_report_with_patch_level() {
        let args = parse(&[]);
        assert!(!args.bump);
        assert!(args.patch);
        let request = args.to_request(&Config::default(), None);
        assert_eq!(request.level, BumpLevel::Patch);
        assert!(request.decorate_branch);
        assert!(!request.bump);
    }

    #[test]
    fn major_beats_minor() {
        let request = parse(&["--bump", "--minor", "--major"]).to_request(&Config::default(), None);
        assert!(request.bump);
        assert_eq!(request.level, BumpLevel::Major);
    }

    #[test]
    fn minor_beats_patch() {
        let request = parse(&["--patch", "--minor"]).to_request(&Config::default(), None);
        assert_eq!(request.level, BumpLevel::Minor);
    }

    #[test]
    fn no_branch_disables_decoration() {
        let request = parse(&["--no-branch"]).to_request(&Config::default(), None);
        assert!(!request.decorate_branch);
    }

    #[test]
    fn config_can_disable_decoration() {
        let config = Config {
            branch: Some(tagversion_core::config::BranchConfig {
                decorate: Some(false),
                env_var: None,
            }),
            ..Config::default()
        };
        assert!(!parse(&[]).to_request(&config, None).decorate_branch);
    }

    #[test]
    fn branch_override_and_message_flow_through() {
        let config = Config {
            tag: Some(tagversion_core::config::TagConfig {
                message: Some("Release {version}".to_string()),
            }),
            ..Config::default()
        };
        let request = parse(&["--dry-run"]).to_request(&config, Some("ci/main".to_string()));
        assert!(request.dry_run);
        assert_eq!(request.branch_override.as_deref(), Some("ci/main"));
        assert_eq!(request.tag_message.as_deref(), Some("Release {version}"));
    }

    #[test]
    fn default_matches_parsed_defaults() {
        let parsed = parse(&[]);
        let default = BumpArgs::default();
        assert_eq!(parsed.patch, default.patch);
        assert_eq!(parsed.bump, default.bump);
        assert_eq!(parsed.no_branch, default.no_branch);
    }
}
