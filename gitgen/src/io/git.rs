//! Git adapter that collects the context fed into prompts.
//!
//! Only read-only queries live here; gitgen never commits or switches branches.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument};

use crate::core::types::GitContext;

/// Number of recent commits included in commit-message context.
pub const DEFAULT_LOG_LIMIT: usize = 10;

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Current branch name, or `HEAD` when detached.
    pub fn current_branch(&self) -> Result<String> {
        let out = self.run_capture(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(out.trim().to_string())
    }

    /// Short-format status including untracked files.
    pub fn status_short(&self) -> Result<String> {
        self.run_capture(&["status", "--short"])
    }

    /// Diff of all uncommitted changes (staged and unstaged) against HEAD.
    ///
    /// Falls back to the staged diff in a repository without commits.
    pub fn diff_uncommitted(&self) -> Result<String> {
        if self.has_head()? {
            self.run_capture(&["diff", "HEAD"])
        } else {
            self.run_capture(&["diff", "--cached"])
        }
    }

    /// Diff from the merge base of `base` to HEAD (`git diff base...HEAD`).
    pub fn diff_from_base(&self, base: &str) -> Result<String> {
        let range = format!("{base}...HEAD");
        self.run_capture(&["diff", &range])
    }

    /// Most recent `limit` commits, one line each. Empty for a repository without commits.
    pub fn log_oneline(&self, limit: usize) -> Result<String> {
        if !self.has_head()? {
            return Ok(String::new());
        }
        let count = format!("-{limit}");
        self.run_capture(&["log", "--oneline", &count])
    }

    /// Context for a commit message: status, uncommitted diff, branch, recent log.
    #[instrument(skip_all, fields(workdir = %self.workdir.display()))]
    pub fn commit_context(&self) -> Result<GitContext> {
        let context = GitContext {
            status: self.status_short()?,
            diff: self.diff_uncommitted()?,
            branch: self.current_branch().unwrap_or_default(),
            log: self.log_oneline(DEFAULT_LOG_LIMIT)?,
        };
        debug!(
            status_bytes = context.status.len(),
            diff_bytes = context.diff.len(),
            branch = %context.branch,
            "collected commit context"
        );
        Ok(context)
    }

    fn has_head(&self) -> Result<bool> {
        let out = self.run(&["rev-parse", "--verify", "--quiet", "HEAD"])?;
        Ok(out.status.success())
    }

    fn run_capture(&self, args: &[&str]) -> Result<String> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))
    }
}
