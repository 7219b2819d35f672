//! Shared types for the generation pipeline.

use serde::{Deserialize, Serialize};

const COMMIT_TEMPLATE: &str = include_str!("../prompts/commit.md");
const BRANCH_TEMPLATE: &str = include_str!("../prompts/branch.md");
const PR_TEMPLATE: &str = include_str!("../prompts/pr.md");

/// Raw git context handed to prompt rendering. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitContext {
    /// `git status --short` output.
    pub status: String,
    /// Unified diff of the changes being described.
    pub diff: String,
    /// Current branch name.
    pub branch: String,
    /// Recent `git log --oneline` entries.
    pub log: String,
}

impl GitContext {
    /// Context carrying only a diff, as used by branch-name and PR prompts.
    pub fn from_diff(diff: impl Into<String>) -> Self {
        Self {
            diff: diff.into(),
            ..Self::default()
        }
    }
}

/// Validated pull-request text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrContent {
    /// Non-empty, trimmed.
    pub title: String,
    /// Trimmed, may be empty.
    pub description: String,
}

/// The three outputs the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    CommitMessage,
    BranchName,
    PrContent,
}

impl Artifact {
    /// Maximum number of diff characters substituted into the prompt.
    pub fn max_diff_chars(self) -> usize {
        match self {
            Artifact::CommitMessage | Artifact::PrContent => 5000,
            Artifact::BranchName => 3000,
        }
    }

    /// Built-in prompt template used when no custom template is configured.
    pub fn default_template(self) -> &'static str {
        match self {
            Artifact::CommitMessage => COMMIT_TEMPLATE,
            Artifact::BranchName => BRANCH_TEMPLATE,
            Artifact::PrContent => PR_TEMPLATE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Artifact::CommitMessage => "commit",
            Artifact::BranchName => "branch",
            Artifact::PrContent => "pr",
        }
    }
}
