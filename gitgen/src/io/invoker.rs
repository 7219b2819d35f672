//! Invoker abstraction for the external generation tool.
//!
//! The [`Invoker`] trait decouples the generation pipeline from the actual
//! backend (currently `claude -p`). Tests use scripted invokers that return
//! predetermined stdout without spawning processes.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::error::{GenerateError, ProcessFailure};
use crate::io::debug_log::DebugLog;
use crate::io::process::run_command_with_timeout;

/// Abstraction over tool backends. Returns raw stdout for parsing.
pub trait Invoker {
    fn invoke(&self, prompt: &str) -> Result<String, GenerateError>;

    /// Sink for post-parse diagnostics, if the backend keeps one.
    fn debug_log(&self) -> Option<&DebugLog> {
        None
    }
}

impl<I: Invoker + ?Sized> Invoker for &I {
    fn invoke(&self, prompt: &str) -> Result<String, GenerateError> {
        (**self).invoke(prompt)
    }

    fn debug_log(&self) -> Option<&DebugLog> {
        (**self).debug_log()
    }
}

/// Invoker that spawns `<program> -p <prompt> --output-format json`.
#[derive(Debug, Clone)]
pub struct ClaudeCli {
    /// Program to run, `claude` unless overridden.
    pub program: PathBuf,
    /// Maximum time to wait for the tool before killing it.
    pub timeout: Duration,
    /// Truncate captured stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
    /// Where to append raw requests and responses, if enabled.
    pub debug_log: Option<DebugLog>,
}

impl ClaudeCli {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
            output_limit_bytes: 8 * 1024 * 1024,
            debug_log: None,
        }
    }

    pub fn with_debug_log(mut self, debug_log: Option<DebugLog>) -> Self {
        self.debug_log = debug_log;
        self
    }

    pub fn with_output_limit(mut self, output_limit_bytes: usize) -> Self {
        self.output_limit_bytes = output_limit_bytes;
        self
    }

    fn command(&self, prompt: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-p")
            .arg(prompt)
            .arg("--output-format")
            .arg("json");
        cmd
    }

    fn fail(&self, prompt: &str, cause: ProcessFailure, stderr: String) -> GenerateError {
        if let Some(log) = &self.debug_log {
            log.record_failure(prompt, &cause.to_string(), &stderr);
        }
        GenerateError::Process { cause, stderr }
    }
}

impl Invoker for ClaudeCli {
    #[instrument(skip_all, fields(program = %self.program.display(), prompt_bytes = prompt.len()))]
    fn invoke(&self, prompt: &str) -> Result<String, GenerateError> {
        info!("invoking claude CLI");

        let output = match run_command_with_timeout(
            self.command(prompt),
            self.timeout,
            self.output_limit_bytes,
        ) {
            Ok(output) => output,
            Err(cause) => return Err(self.fail(prompt, cause, String::new())),
        };
        let stderr = output.stderr_lossy();

        if output.timed_out {
            warn!(timeout_ms = self.timeout.as_millis() as u64, "claude CLI timed out");
            return Err(self.fail(prompt, ProcessFailure::TimedOut(self.timeout), stderr));
        }
        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "claude CLI failed");
            return Err(self.fail(prompt, ProcessFailure::Exit(output.status), stderr));
        }

        let stdout = output.stdout_lossy();
        if let Some(log) = &self.debug_log {
            log.record_response(prompt, &stdout, &stderr);
        }
        debug!(stdout_bytes = stdout.len(), "claude CLI completed");
        Ok(stdout)
    }

    fn debug_log(&self) -> Option<&DebugLog> {
        self.debug_log.as_ref()
    }
}
