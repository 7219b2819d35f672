//! Gitgen configuration stored as TOML.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::types::Artifact;
use crate::io::debug_log::DebugLog;
use crate::io::invoker::ClaudeCli;

/// Gitgen configuration (TOML).
///
/// Missing fields default to values that work with a stock `claude` install.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub tool: ToolConfig,
    pub debug: DebugConfig,
    pub prompts: PromptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolConfig {
    /// Program invoked as `<program> -p <prompt> --output-format json`.
    pub program: String,

    /// Kill the tool if it has not exited after this many seconds.
    pub timeout_secs: u64,

    /// Truncate captured stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "claude".to_string(),
            timeout_secs: 120,
            output_limit_bytes: 8 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DebugConfig {
    /// Append raw requests/responses to the debug log.
    pub enabled: bool,

    /// Debug log location. Defaults to `<temp_dir>/gitgen-debug.log`.
    pub path: Option<PathBuf>,
}

/// Custom prompt templates. An empty string selects the built-in template.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PromptConfig {
    pub commit: String,
    pub branch: String,
    pub pr: String,
}

impl PromptConfig {
    /// Template to render for `artifact`.
    pub fn template(&self, artifact: Artifact) -> &str {
        let custom = match artifact {
            Artifact::CommitMessage => self.commit.as_str(),
            Artifact::BranchName => self.branch.as_str(),
            Artifact::PrContent => self.pr.as_str(),
        };
        if custom.is_empty() {
            artifact.default_template()
        } else {
            custom
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.tool.program.trim().is_empty() {
            return Err(anyhow!("tool.program must be non-empty"));
        }
        if self.tool.timeout_secs == 0 {
            return Err(anyhow!("tool.timeout_secs must be > 0"));
        }
        if self.tool.output_limit_bytes == 0 {
            return Err(anyhow!("tool.output_limit_bytes must be > 0"));
        }
        Ok(())
    }

    /// Debug sink when enabled, at the configured or default path.
    pub fn debug_log(&self) -> Option<DebugLog> {
        self.debug.enabled.then(|| {
            DebugLog::new(
                self.debug
                    .path
                    .clone()
                    .unwrap_or_else(DebugLog::default_path),
            )
        })
    }

    /// Production invoker built from the `[tool]` and `[debug]` sections.
    pub fn invoker(&self) -> ClaudeCli {
        ClaudeCli::new(&self.tool.program, Duration::from_secs(self.tool.timeout_secs))
            .with_output_limit(self.tool.output_limit_bytes)
            .with_debug_log(self.debug_log())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `Config::default()`.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let cfg = Config::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
