//! Artifact-specific validation of defenced model output.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::core::types::PrContent;
use crate::error::GenerateError;

/// Longest branch slug we accept.
pub const MAX_BRANCH_LEN: usize = 40;

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("slug pattern is valid"));

/// Commit subject: trimmed and non-empty, otherwise verbatim.
pub fn commit_message(content: &str) -> Result<String, GenerateError> {
    let subject = content.trim();
    if subject.is_empty() {
        return Err(GenerateError::EmptyResult);
    }
    Ok(subject.to_string())
}

/// Branch slug restricted to `[a-z0-9-]`, without edge hyphens, at most 40 chars.
///
/// The length cut happens after hyphen trimming and may leave a trailing hyphen.
pub fn branch_name(content: &str) -> Result<String, GenerateError> {
    let lowered = content.trim().to_lowercase().replace([' ', '_'], "-");
    let slug = NON_SLUG_RE.replace_all(&lowered, "");
    let mut name = slug.trim_matches('-').to_string();
    name.truncate(MAX_BRANCH_LEN);
    if name.is_empty() {
        return Err(GenerateError::InvalidName);
    }
    Ok(name)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPrContent {
    title: Option<String>,
    description: Option<String>,
}

/// PR title/description decoded from a JSON object.
pub fn pr_content(content: &str) -> Result<PrContent, GenerateError> {
    let raw: RawPrContent =
        serde_json::from_str(content).map_err(|source| GenerateError::Parse {
            what: "AI response",
            source,
        })?;
    let title = raw.title.unwrap_or_default().trim().to_string();
    if title.is_empty() {
        return Err(GenerateError::EmptyTitle);
    }
    Ok(PrContent {
        title,
        description: raw.description.unwrap_or_default().trim().to_string(),
    })
}
