//! Error taxonomy for the generation pipeline.
//!
//! Every failure is terminal for the call that produced it. Callers get either a
//! validated artifact or one of these variants, never a partial result.

use std::fmt;
use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

use crate::exit_codes;

/// Why the external tool did not produce usable stdout.
#[derive(Debug)]
pub enum ProcessFailure {
    /// The program could not be launched at all.
    Spawn(io::Error),
    /// The program ran and exited unsuccessfully.
    Exit(ExitStatus),
    /// The program was killed after exceeding its deadline.
    TimedOut(Duration),
    /// Waiting on or reading from the child failed after launch.
    Io(String),
}

impl fmt::Display for ProcessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessFailure::Spawn(err) => write!(f, "spawn failed: {err}"),
            ProcessFailure::Exit(status) => write!(f, "{status}"),
            ProcessFailure::TimedOut(after) => write!(f, "timed out after {after:?}"),
            ProcessFailure::Io(msg) => write!(f, "{msg}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GenerateError {
    /// Tool failed to launch, exited non-zero, or timed out.
    #[error("claude CLI failed: {cause}: {stderr}")]
    Process {
        cause: ProcessFailure,
        stderr: String,
    },

    /// Tool stdout or the artifact payload was not the expected JSON shape.
    #[error("failed to parse {what}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Tool stdout decoded fine but no record carried usable content.
    #[error("no content found in {records} messages")]
    NotFound { records: usize },

    #[error("AI generated empty commit subject")]
    EmptyResult,

    #[error("AI generated invalid branch name")]
    InvalidName,

    #[error("AI generated empty PR title")]
    EmptyTitle,
}

impl GenerateError {
    /// Returns the CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::Process { .. } => exit_codes::TOOL_FAILED,
            GenerateError::Parse { .. }
            | GenerateError::NotFound { .. }
            | GenerateError::EmptyResult
            | GenerateError::InvalidName
            | GenerateError::EmptyTitle => exit_codes::BAD_OUTPUT,
        }
    }
}
