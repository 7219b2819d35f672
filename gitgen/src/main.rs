//! Generate commit subjects, branch names and PR text with the `claude` CLI.
//!
//! Reads git context from the repository, asks the tool for an artifact, and
//! prints the validated result to stdout. Diagnostics go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use gitgen::error::GenerateError;
use gitgen::exit_codes;
use gitgen::generate::Generator;
use gitgen::io::config::{Config, load_config};
use gitgen::io::git::Git;
use gitgen::logging;

#[derive(Parser)]
#[command(
    name = "gitgen",
    version,
    about = "Generate commit subjects, branch names and PR text from git changes"
)]
struct Cli {
    /// Path to a TOML config file. Missing files fall back to defaults.
    #[arg(long, global = true, env = "GITGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Git repository to read context from.
    #[arg(long, global = true, default_value = ".")]
    repo: PathBuf,

    /// Append raw tool requests and responses to the debug log.
    #[arg(long, global = true)]
    debug_log: bool,

    /// Override the configured tool timeout.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a one-line commit subject for the uncommitted changes.
    Commit,
    /// Print a branch name for the uncommitted changes.
    Branch,
    /// Print a PR title and description for the commits since `base`.
    Pr {
        /// Base ref the branch will merge into.
        #[arg(long, default_value = "main")]
        base: String,
        /// Print `{"title": .., "description": ..}` instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Check that the tool is installed and responds.
    Check,
}

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::from(exit_codes::OK as u8),
        Err(err) => {
            eprintln!("{:#}", err);
            let code = err
                .downcast_ref::<GenerateError>()
                .map(GenerateError::exit_code)
                .unwrap_or(exit_codes::INVALID);
            ExitCode::from(code as u8)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let generator = Generator::new(config.invoker(), config.prompts.clone());
    let git = Git::new(&cli.repo);

    match cli.command {
        Command::Commit => {
            let context = git.commit_context().context("collect git context")?;
            println!("{}", generator.commit_message(&context)?);
        }
        Command::Branch => {
            let diff = git.diff_uncommitted().context("collect git diff")?;
            println!("{}", generator.branch_name(&diff)?);
        }
        Command::Pr { base, json } => {
            let diff = git.diff_from_base(&base).context("collect git diff")?;
            let pr = generator.pr_content(&diff)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pr).context("serialize pr")?);
            } else if pr.description.is_empty() {
                println!("{}", pr.title);
            } else {
                println!("{}\n\n{}", pr.title, pr.description);
            }
        }
        Command::Check => {
            generator.check_connection()?;
            println!("ok");
        }
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if cli.debug_log {
        config.debug.enabled = true;
    }
    if let Some(secs) = cli.timeout_secs {
        config.tool.timeout_secs = secs;
    }
    config.validate()?;
    debug!(
        program = %config.tool.program,
        timeout_secs = config.tool.timeout_secs,
        "resolved config"
    );
    Ok(config)
}
