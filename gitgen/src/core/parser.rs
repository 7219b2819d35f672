//! Selects the usable content from the tool's JSON output.

use tracing::{debug, instrument};

use crate::core::message::MessageRecord;
use crate::core::prompt::truncate_chars;
use crate::error::GenerateError;

const PREVIEW_CHARS: usize = 100;

/// Decode `raw` stdout and return the first qualifying record's content.
///
/// Records are scanned in array order. A `result` record with a non-empty
/// `result`, or an `assistant` record with a non-empty text block, wins at the
/// position where it appears; later records are never inspected.
#[instrument(skip_all, fields(raw_bytes = raw.len()))]
pub fn parse_output(raw: &str) -> Result<String, GenerateError> {
    let records: Vec<MessageRecord> = serde_json::from_str(raw.trim()).map_err(|source| {
        debug!(err = %source, "failed to parse JSON array");
        GenerateError::Parse {
            what: "claude CLI output",
            source,
        }
    })?;
    debug!(records = records.len(), "parsed message records");

    select_content(&records)
        .map(str::to_string)
        .ok_or(GenerateError::NotFound {
            records: records.len(),
        })
}

/// Positional selection over already-decoded records.
pub fn select_content(records: &[MessageRecord]) -> Option<&str> {
    for (index, record) in records.iter().enumerate() {
        debug!(index, kind = record.kind(), subtype = record.subtype(), "message");
        let found = match record {
            MessageRecord::Result { result, .. } if !result.is_empty() => Some(result.as_str()),
            MessageRecord::Assistant { message } => message.first_text(),
            _ => None,
        };
        if let Some(content) = found {
            debug!(
                index,
                kind = record.kind(),
                preview = truncate_chars(content, PREVIEW_CHARS),
                "selected content"
            );
            return Some(content);
        }
    }
    None
}
