//! Prompt rendering from templates with literal `{token}` placeholders.

use tracing::debug;

use crate::core::types::{Artifact, GitContext};

const TOKENS: [&str; 4] = ["{status}", "{diff}", "{branch}", "{log}"];

/// Renders prompt templates with a hard cap on the diff size.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_diff_chars: usize,
}

impl PromptBuilder {
    pub fn new(max_diff_chars: usize) -> Self {
        Self { max_diff_chars }
    }

    /// Builder using the diff cap configured for `artifact`.
    pub fn for_artifact(artifact: Artifact) -> Self {
        Self::new(artifact.max_diff_chars())
    }

    /// Substitute each placeholder in `template` with its context value.
    ///
    /// The diff is cut to `max_diff_chars` before substitution. The template is
    /// scanned once, so inserted values are never searched for tokens again.
    pub fn build(&self, template: &str, context: &GitContext) -> String {
        let diff = truncate_chars(&context.diff, self.max_diff_chars);
        if diff.len() < context.diff.len() {
            debug!(
                original_bytes = context.diff.len(),
                kept_bytes = diff.len(),
                "truncated diff for prompt"
            );
        }

        let mut out = String::with_capacity(template.len() + diff.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let candidate = &rest[open..];
            match TOKENS.iter().find(|token| candidate.starts_with(**token)) {
                Some(token) => {
                    out.push_str(match *token {
                        "{status}" => context.status.as_str(),
                        "{diff}" => diff,
                        "{branch}" => context.branch.as_str(),
                        _ => context.log.as_str(),
                    });
                    rest = &candidate[token.len()..];
                }
                None => {
                    out.push('{');
                    rest = &candidate[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Return at most the first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
