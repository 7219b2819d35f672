//! Test-only helpers: scripted invokers, fake tool scripts and throwaway git repositories.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use serde_json::json;
use tempfile::TempDir;

use crate::error::{GenerateError, ProcessFailure};
use crate::io::invoker::Invoker;

#[derive(Debug, Clone)]
enum ScriptedResponse {
    Stdout(String),
    Fail { stderr: String },
}

/// Invoker that returns the same scripted response on every call and records prompts.
#[derive(Debug)]
pub struct ScriptedInvoker {
    response: ScriptedResponse,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedInvoker {
    /// Succeed with `stdout` as the tool's raw output.
    pub fn with_stdout(stdout: &str) -> Self {
        Self {
            response: ScriptedResponse::Stdout(stdout.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fail as if the tool exited unsuccessfully with `stderr`.
    pub fn failing(stderr: &str) -> Self {
        Self {
            response: ScriptedResponse::Fail {
                stderr: stderr.to_string(),
            },
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

impl Invoker for ScriptedInvoker {
    fn invoke(&self, prompt: &str) -> Result<String, GenerateError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match &self.response {
            ScriptedResponse::Stdout(stdout) => Ok(stdout.clone()),
            ScriptedResponse::Fail { stderr } => Err(GenerateError::Process {
                cause: ProcessFailure::Io("scripted failure".to_string()),
                stderr: stderr.clone(),
            }),
        }
    }
}

/// Tool stdout holding a single `result` record.
pub fn result_stdout(result: &str) -> String {
    json!([
        {"type": "system", "subtype": "init", "session_id": "test"},
        {"type": "result", "subtype": "success", "is_error": false, "result": result},
    ])
    .to_string()
}

/// Tool stdout holding a single `assistant` record with one text block.
pub fn assistant_stdout(text: &str) -> String {
    json!([
        {
            "type": "assistant",
            "message": {
                "model": "test-model",
                "id": "msg_test",
                "role": "assistant",
                "content": [{"type": "text", "text": text}],
                "stop_reason": "end_turn",
            },
        },
    ])
    .to_string()
}

/// Write an executable `sh` script named `claude` into `dir` and return its path.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("claude");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod fake tool");
    path
}

/// Temporary git repository with a local identity configured.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp repo dir")?;
        let repo = Self { dir };
        repo.git(&["init", "--quiet"])?;
        repo.git(&["config", "user.email", "test@example.com"])?;
        repo.git(&["config", "user.name", "Test"])?;
        repo.git(&["config", "commit.gpgsign", "false"])?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git in the repository, failing on non-zero exit.
    pub fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))?;
        if !output.status.success() {
            return Err(anyhow!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Write `contents` to `name` and commit it with `message`.
    pub fn commit_file(&self, name: &str, contents: &str, message: &str) -> Result<()> {
        std::fs::write(self.path().join(name), contents)
            .with_context(|| format!("write {name}"))?;
        self.git(&["add", name])?;
        self.git(&["commit", "--quiet", "-m", message])?;
        Ok(())
    }
}
