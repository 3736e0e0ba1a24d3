//! Scripted [`Vcs`] for exercising resolver and orchestrator logic.

use std::cell::RefCell;

use super::{GitError, GitResult, Vcs};

/// In-memory repository answers. `None` for a describe field means git
/// would report "no tag".
#[derive(Debug, Default)]
pub struct FakeVcs {
    pub described: Option<String>,
    pub exact: Option<String>,
    pub branches: Vec<String>,
    pub status: Vec<String>,
    pub fail_tagging: bool,
    pub tags: RefCell<Vec<(String, String)>>,
}

impl FakeVcs {
    /// Clean repository without tags, on `main`.
    pub fn untagged() -> Self {
        Self {
            branches: vec!["* main".to_string()],
            ..Self::default()
        }
    }

    /// HEAD sits exactly on `tag`.
    pub fn on_tag(tag: &str) -> Self {
        Self {
            described: Some(tag.to_string()),
            exact: Some(tag.to_string()),
            ..Self::untagged()
        }
    }

    /// HEAD is `ahead` commits past `tag` on `branch`.
    pub fn past_tag(tag: &str, ahead: u32, branch: &str) -> Self {
        Self {
            described: Some(format!("{tag}-{ahead}-g1a2b3c4")),
            exact: None,
            branches: vec!["  main".to_string(), format!("* {branch}")],
            ..Self::default()
        }
    }

    pub fn with_status(mut self, lines: &[&str]) -> Self {
        self.status = lines.iter().map(|l| (*l).to_string()).collect();
        self
    }

    pub fn created_tags(&self) -> Vec<String> {
        self.tags.borrow().iter().map(|(n, _)| n.clone()).collect()
    }
}

fn not_found(query: &str) -> GitError {
    GitError::NotFound {
        query: query.to_string(),
    }
}

impl Vcs for FakeVcs {
    fn describe_tags(&self) -> GitResult<String> {
        self.described
            .clone()
            .ok_or_else(|| not_found("describe --tags"))
    }

    fn describe_exact_match(&self) -> GitResult<String> {
        self.exact
            .clone()
            .ok_or_else(|| not_found("describe --tags --exact-match"))
    }

    fn list_branches(&self) -> GitResult<Vec<String>> {
        Ok(self.branches.clone())
    }

    fn status_short(&self) -> GitResult<Vec<String>> {
        Ok(self.status.clone())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> GitResult<()> {
        if self.fail_tagging {
            return Err(GitError::Command {
                command: "tag".to_string(),
                stderr: format!("fatal: tag '{name}' already exists"),
            });
        }
        self.tags
            .borrow_mut()
            .push((name.to_string(), message.to_string()));
        Ok(())
    }
}
