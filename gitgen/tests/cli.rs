//! CLI tests for the `gitgen` binary.
//!
//! Spawns the binary inside a temporary git repository with a config that
//! points `tool.program` at a fake `claude` script.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use gitgen::exit_codes;
use gitgen::test_support::{TestRepo, fake_tool, result_stdout};

fn write_config(dir: &Path, tool: &Path, extra: &str) -> PathBuf {
    let path = dir.join("gitgen.toml");
    fs::write(
        &path,
        format!(
            "[tool]\nprogram = \"{}\"\ntimeout_secs = 10\n{extra}",
            tool.display()
        ),
    )
    .expect("write config");
    path
}

fn gitgen(repo: &TestRepo, config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gitgen"))
        .current_dir(repo.path())
        .env_remove("GITGEN_CONFIG")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("run gitgen")
}

fn tool_printing(dir: &Path, stdout: &str) -> PathBuf {
    let payload = dir.join("stdout.json");
    fs::write(&payload, stdout).expect("write payload");
    fake_tool(dir, &format!("cat '{}'", payload.display()))
}

#[test]
fn commit_prints_subject() {
    let repo = TestRepo::new().expect("repo");
    repo.commit_file("a.txt", "one\n", "chore: first").expect("commit");
    fs::write(repo.path().join("a.txt"), "two\n").expect("modify");

    let tools = tempfile::tempdir().expect("tools");
    let tool = tool_printing(tools.path(), &result_stdout("fix: update a.txt"));
    let config = write_config(tools.path(), &tool, "");

    let out = gitgen(&repo, &config, &["commit"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "fix: update a.txt\n");
}

#[test]
fn branch_prints_slug_and_writes_debug_log() {
    let repo = TestRepo::new().expect("repo");
    repo.commit_file("a.txt", "one\n", "chore: first").expect("commit");
    fs::write(repo.path().join("a.txt"), "two\n").expect("modify");

    let tools = tempfile::tempdir().expect("tools");
    let tool = tool_printing(tools.path(), &result_stdout("Update A File"));
    let log_path = tools.path().join("debug.log");
    let config = write_config(
        tools.path(),
        &tool,
        &format!("\n[debug]\npath = \"{}\"\n", log_path.display()),
    );

    let out = gitgen(&repo, &config, &["branch", "--debug-log"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "update-a-file\n");
    let log = fs::read_to_string(&log_path).expect("debug log");
    assert!(log.contains("=== CLAUDE CLI RAW RESPONSE ==="));
}

#[test]
fn pr_json_output() {
    let repo = TestRepo::new().expect("repo");
    repo.commit_file("a.txt", "one\n", "chore: first").expect("commit");
    let base = repo
        .git(&["rev-parse", "--abbrev-ref", "HEAD"])
        .expect("branch")
        .trim()
        .to_string();
    repo.git(&["checkout", "-q", "-b", "feature"]).expect("checkout");
    repo.commit_file("b.txt", "two\n", "feat: b").expect("commit");

    let tools = tempfile::tempdir().expect("tools");
    let tool = tool_printing(
        tools.path(),
        &result_stdout(r#"{"title":"Add b","description":"Adds b.txt"}"#),
    );
    let config = write_config(tools.path(), &tool, "");

    let out = gitgen(&repo, &config, &["pr", "--base", &base, "--json"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(value["title"], "Add b");
    assert_eq!(value["description"], "Adds b.txt");
}

#[test]
fn bad_output_exit_code() {
    let repo = TestRepo::new().expect("repo");
    let tools = tempfile::tempdir().expect("tools");
    let tool = tool_printing(tools.path(), "[]");
    let config = write_config(tools.path(), &tool, "");

    let out = gitgen(&repo, &config, &["check"]);
    assert_eq!(out.status.code(), Some(exit_codes::BAD_OUTPUT));
    assert!(String::from_utf8_lossy(&out.stderr).contains("no content found in 0 messages"));
}

#[test]
fn tool_failure_exit_code() {
    let repo = TestRepo::new().expect("repo");
    let tools = tempfile::tempdir().expect("tools");
    let tool = fake_tool(tools.path(), "echo 'not logged in' >&2; exit 1");
    let config = write_config(tools.path(), &tool, "");

    let out = gitgen(&repo, &config, &["check"]);
    assert_eq!(out.status.code(), Some(exit_codes::TOOL_FAILED));
    assert!(String::from_utf8_lossy(&out.stderr).contains("not logged in"));
}

#[test]
fn invalid_config_exit_code() {
    let repo = TestRepo::new().expect("repo");
    let tools = tempfile::tempdir().expect("tools");
    let config = tools.path().join("gitgen.toml");
    fs::write(&config, "[tool]\ntimeout_secs = 0\n").expect("write config");

    let out = gitgen(&repo, &config, &["check"]);
    assert_eq!(out.status.code(), Some(exit_codes::INVALID));
}
