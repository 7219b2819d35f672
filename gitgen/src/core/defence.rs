//! Markdown code-fence stripping for model output.

const FENCE: &str = "```";

/// Remove a triple-backtick fence (and optional language tag) wrapping `content`.
///
/// Multi-line content drops the whole opening line. Single-line content only has
/// a literal "```json" or "```" prefix removed. Either way a trailing fence is
/// removed and the result re-trimmed. Unfenced content is only trimmed.
pub fn strip_code_fence(content: &str) -> String {
    let trimmed = content.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed.to_string();
    }

    let mut body = match trimmed.find('\n') {
        Some(newline) => &trimmed[newline + 1..],
        None => trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix(FENCE))
            .unwrap_or(trimmed),
    };
    if let Some(stripped) = body.strip_suffix(FENCE) {
        body = stripped;
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_fence_with_language_tag() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn multi_line_fence_drops_any_language_tag() {
        assert_eq!(strip_code_fence("```text\nfeat: add login\n```"), "feat: add login");
        assert_eq!(strip_code_fence("```\nfix-auth\n```\n"), "fix-auth");
    }

    #[test]
    fn single_line_fence_strips_json_prefix_then_suffix() {
        assert_eq!(strip_code_fence("```jsonX```"), "X");
    }

    #[test]
    fn single_line_fence_without_language() {
        assert_eq!(strip_code_fence("```feat: x```"), "feat: x");
    }

    #[test]
    fn single_line_keeps_other_language_tags_as_content() {
        assert_eq!(strip_code_fence("```text hi```"), "text hi");
    }

    #[test]
    fn missing_closing_fence_is_tolerated() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn bare_fence_becomes_empty() {
        assert_eq!(strip_code_fence("```"), "");
    }

    #[test]
    fn unfenced_content_is_trimmed_only() {
        assert_eq!(strip_code_fence("  plain ```text```  \n"), "plain ```text```");
    }

    #[test]
    fn already_clean_content_is_unchanged() {
        let once = strip_code_fence("```json\n{\"title\":\"x\"}\n```");
        assert_eq!(strip_code_fence(&once), once);
        assert_eq!(strip_code_fence("feat: x"), "feat: x");
    }
}
