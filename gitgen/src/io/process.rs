//! Helpers for running child processes with timeouts and bounded output.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use crate::error::ProcessFailure;

/// How long to keep reading pipes once the child has exited or been killed.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

type StreamResult = std::io::Result<(Vec<u8>, usize)>;

/// Captured child process output.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Run a command with a timeout and capture stdout/stderr without risking pipe deadlocks.
///
/// Stdin is closed. Output is read concurrently while the child runs.
/// `output_limit_bytes` bounds the amount of stdout/stderr stored in memory (bytes
/// beyond this are discarded while still draining the pipe). A child still running
/// at the deadline is killed and reaped, and `timed_out` is set.
///
/// Descendants of the child may inherit its pipes and outlive it. Readers that
/// have not reached EOF by the deadline (or [`DRAIN_GRACE`] after a kill) are
/// abandoned, their output is dropped and `timed_out` is set.
#[instrument(
    skip_all,
    fields(timeout_ms = timeout.as_millis() as u64, output_limit_bytes = output_limit_bytes)
)]
pub fn run_command_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<CommandOutput, ProcessFailure> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning child process");
    let started = Instant::now();
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(ProcessFailure::Spawn(e));
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ProcessFailure::Io("stdout was not piped".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| ProcessFailure::Io("stderr was not piped".to_string()))?;

    let stdout_rx = spawn_reader(stdout, output_limit_bytes);
    let stderr_rx = spawn_reader(stderr, output_limit_bytes);

    let mut timed_out = false;
    let waited = child
        .wait_timeout(timeout)
        .map_err(|e| ProcessFailure::Io(format!("wait for command: {e}")))?;
    let status = match waited {
        Some(status) => status,
        None => {
            warn!(timeout_ms = timeout.as_millis() as u64, "command timed out, killing");
            timed_out = true;
            child
                .kill()
                .map_err(|e| ProcessFailure::Io(format!("kill command: {e}")))?;
            child
                .wait()
                .map_err(|e| ProcessFailure::Io(format!("wait command after kill: {e}")))?
        }
    };

    let grace = Instant::now() + DRAIN_GRACE;
    let drain_deadline = if timed_out {
        grace
    } else {
        started
            .checked_add(timeout)
            .map_or(grace, |deadline| deadline.max(grace))
    };
    let stdout = collect_output(&stdout_rx, drain_deadline, "stdout")?;
    let stderr = collect_output(&stderr_rx, drain_deadline, "stderr")?;
    if stdout.is_none() || stderr.is_none() {
        timed_out = true;
    }
    let (stdout, stdout_truncated) = stdout.unwrap_or_default();
    let (stderr, stderr_truncated) = stderr.unwrap_or_default();

    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
        timed_out,
    })
}

fn spawn_reader<R: Read + Send + 'static>(reader: R, limit: usize) -> Receiver<StreamResult> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver is gone if the caller stopped waiting.
        let _ = tx.send(read_stream_limited(reader, limit));
    });
    rx
}

/// Wait for a reader until `deadline`. `None` means the pipe was still open.
fn collect_output(
    rx: &Receiver<StreamResult>,
    deadline: Instant,
    label: &str,
) -> Result<Option<(Vec<u8>, usize)>, ProcessFailure> {
    let wait = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(wait) {
        Ok(result) => result
            .map(Some)
            .map_err(|e| ProcessFailure::Io(format!("read {label}: {e}"))),
        Err(RecvTimeoutError::Timeout) => {
            warn!(stream = label, "pipe held open past deadline, abandoning reader");
            Ok(None)
        }
        Err(RecvTimeoutError::Disconnected) => {
            Err(ProcessFailure::Io(format!("{label} reader thread panicked")))
        }
    }
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> std::io::Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        if remaining > 0 {
            let keep = n.min(remaining);
            buf.extend_from_slice(&chunk[..keep]);
            truncated += n.saturating_sub(keep);
        } else {
            truncated += n;
        }
    }

    Ok((buf, truncated))
}
