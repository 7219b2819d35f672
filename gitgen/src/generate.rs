//! The three generation operations: prompt, invoke, parse, defence, extract.

use tracing::{debug, info, instrument};

use crate::core::defence::strip_code_fence;
use crate::core::extract;
use crate::core::parser::parse_output;
use crate::core::prompt::PromptBuilder;
use crate::core::types::{Artifact, GitContext, PrContent};
use crate::error::GenerateError;
use crate::io::config::PromptConfig;
use crate::io::invoker::Invoker;

/// Prompt sent by [`Generator::check_connection`].
pub const CONNECTION_CHECK_PROMPT: &str = "Say 'test' and nothing else.";

/// Runs one tool invocation per call and turns its output into a validated artifact.
///
/// Holds no per-call state, so a single generator may serve concurrent callers
/// when its invoker allows it.
#[derive(Debug, Clone)]
pub struct Generator<I> {
    invoker: I,
    prompts: PromptConfig,
}

impl<I: Invoker> Generator<I> {
    pub fn new(invoker: I, prompts: PromptConfig) -> Self {
        Self { invoker, prompts }
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// One-line commit subject from status, diff, branch and log.
    #[instrument(skip_all)]
    pub fn commit_message(&self, context: &GitContext) -> Result<String, GenerateError> {
        let content = self.run(Artifact::CommitMessage, context)?;
        extract::commit_message(&content)
    }

    /// Branch slug from a diff.
    #[instrument(skip_all)]
    pub fn branch_name(&self, diff: &str) -> Result<String, GenerateError> {
        let content = self.run(Artifact::BranchName, &GitContext::from_diff(diff))?;
        extract::branch_name(&content)
    }

    /// Pull-request title and description from a diff.
    #[instrument(skip_all)]
    pub fn pr_content(&self, diff: &str) -> Result<PrContent, GenerateError> {
        let content = self.run(Artifact::PrContent, &GitContext::from_diff(diff))?;
        extract::pr_content(&content)
    }

    /// Round-trip a trivial prompt to confirm the tool is installed and authenticated.
    #[instrument(skip_all)]
    pub fn check_connection(&self) -> Result<(), GenerateError> {
        self.invoke_and_parse(CONNECTION_CHECK_PROMPT)?;
        info!("claude CLI responded");
        Ok(())
    }

    fn run(&self, artifact: Artifact, context: &GitContext) -> Result<String, GenerateError> {
        let template = self.prompts.template(artifact);
        let prompt = PromptBuilder::for_artifact(artifact).build(template, context);
        debug!(
            artifact = artifact.as_str(),
            prompt_bytes = prompt.len(),
            "built prompt"
        );

        let content = self.invoke_and_parse(&prompt)?;
        Ok(strip_code_fence(content.trim()))
    }

    fn invoke_and_parse(&self, prompt: &str) -> Result<String, GenerateError> {
        let raw = self.invoker.invoke(prompt)?;
        let content = parse_output(&raw)?;
        if let Some(log) = self.invoker.debug_log() {
            log.record_content(&content);
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedInvoker, result_stdout};

    fn generator(stdout: &str) -> Generator<ScriptedInvoker> {
        Generator::new(
            ScriptedInvoker::with_stdout(stdout),
            PromptConfig::default(),
        )
    }

    #[test]
    fn commit_prompt_is_rendered_from_context() {
        let generator = generator(&result_stdout("feat: x"));
        let context = GitContext {
            status: "STATUS-MARKER".to_string(),
            diff: "DIFF-MARKER".to_string(),
            branch: "BRANCH-MARKER".to_string(),
            log: "LOG-MARKER".to_string(),
        };

        generator.commit_message(&context).expect("commit");

        let prompts = generator.invoker().prompts();
        assert_eq!(prompts.len(), 1);
        for marker in ["STATUS-MARKER", "DIFF-MARKER", "BRANCH-MARKER", "LOG-MARKER"] {
            assert!(prompts[0].contains(marker), "prompt missing {marker}");
        }
        assert!(!prompts[0].contains("{diff}"));
    }

    #[test]
    fn branch_prompt_caps_diff_at_three_thousand_chars() {
        let mut prompts = PromptConfig::default();
        prompts.branch = "{diff}".to_string();
        let generator = Generator::new(ScriptedInvoker::with_stdout(&result_stdout("x")), prompts);

        generator.branch_name(&"d".repeat(4000)).expect("branch");

        assert_eq!(generator.invoker().prompts()[0].len(), 3000);
    }

    #[test]
    fn custom_template_replaces_default() {
        let mut prompts = PromptConfig::default();
        prompts.pr = "describe: {diff}".to_string();
        let generator = Generator::new(
            ScriptedInvoker::with_stdout(&result_stdout(r#"{"title":"T","description":"D"}"#)),
            prompts,
        );

        generator.pr_content("+line").expect("pr");

        assert_eq!(generator.invoker().prompts()[0], "describe: +line");
    }

    #[test]
    fn fenced_commit_message_is_unwrapped() {
        let generator = generator(&result_stdout("```\nfix: handle empty diff\n```"));
        let msg = generator.commit_message(&GitContext::default()).expect("commit");
        assert_eq!(msg, "fix: handle empty diff");
    }

    #[test]
    fn blank_commit_message_fails() {
        let generator = generator(&result_stdout("```\n   \n```"));
        let err = generator.commit_message(&GitContext::default()).unwrap_err();
        assert!(matches!(err, GenerateError::EmptyResult));
    }

    #[test]
    fn process_errors_pass_through() {
        let generator = Generator::new(
            ScriptedInvoker::failing("quota exceeded"),
            PromptConfig::default(),
        );
        let err = generator.branch_name("+x").unwrap_err();
        match err {
            GenerateError::Process { stderr, .. } => assert_eq!(stderr, "quota exceeded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn check_connection_sends_fixed_prompt() {
        let generator = generator(&result_stdout("test"));
        generator.check_connection().expect("check");
        assert_eq!(
            generator.invoker().prompts(),
            vec![CONNECTION_CHECK_PROMPT.to_string()]
        );
    }

    #[test]
    fn check_connection_fails_without_content() {
        let generator = generator("[]");
        let err = generator.check_connection().unwrap_err();
        assert!(matches!(err, GenerateError::NotFound { records: 0 }));
    }
}
