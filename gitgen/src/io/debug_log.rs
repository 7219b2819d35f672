//! Best-effort append-only log of raw tool requests and responses.
//!
//! Each entry is assembled in memory and appended with a single write, so blocks
//! from concurrent callers may interleave but never split a line. Failures to open
//! or write the file are reported through tracing and otherwise ignored.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::prompt::truncate_chars;

/// Prompt characters recorded per request.
pub const PROMPT_PREVIEW_CHARS: usize = 500;

/// File sink for invocation diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugLog {
    path: PathBuf,
}

impl DebugLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<temp_dir>/gitgen-debug.log`.
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join("gitgen-debug.log")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a successful invocation: truncated prompt, raw stdout and stderr.
    pub fn record_response(&self, prompt: &str, stdout: &str, stderr: &str) {
        let mut entry = request_header(prompt);
        entry.push_str("=== CLAUDE CLI RAW RESPONSE ===\n");
        entry.push_str(&format!("STDOUT: {stdout}\n"));
        entry.push_str(&format!("STDERR: {stderr}\n"));
        self.append(&entry);
    }

    /// Record a failed invocation: truncated prompt, failure cause and stderr.
    pub fn record_failure(&self, prompt: &str, cause: &str, stderr: &str) {
        let mut entry = request_header(prompt);
        entry.push_str(&format!("ERROR: {cause}\n"));
        entry.push_str(&format!("STDERR: {stderr}\n"));
        self.append(&entry);
    }

    /// Record the content selected from a successful response, before defencing.
    pub fn record_content(&self, content: &str) {
        self.append(&format!("=== EXTRACTED CONTENT ===\nContent: {content}\n"));
    }

    fn append(&self, entry: &str) {
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(entry.as_bytes()));
        if let Err(err) = result {
            debug!(path = %self.path.display(), err = %err, "debug log write skipped");
        }
    }
}

fn request_header(prompt: &str) -> String {
    format!(
        "=== CLAUDE CLI REQUEST ===\nPrompt: {}\n",
        truncate_chars(prompt, PROMPT_PREVIEW_CHARS)
    )
}
