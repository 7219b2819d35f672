//! Message records emitted by `claude --output-format json`.
//!
//! The tool prints a JSON array whose elements are tagged by `type`. Field
//! presence is not guaranteed, so each element is decoded through a lenient raw
//! shape and then converted into the closed [`MessageRecord`] set. A `null`
//! element decodes as an untyped record.

use serde::Deserialize;

/// One element of the tool's output array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<RawRecord>")]
pub enum MessageRecord {
    /// Final outcome of the session.
    Result { subtype: String, result: String },
    /// A model turn with content blocks.
    Assistant { message: AssistantMessage },
    /// Any other record kind (`system`, `user`, ...). Never selected.
    Other { kind: String, subtype: String },
}

impl MessageRecord {
    /// The record's `type` tag.
    pub fn kind(&self) -> &str {
        match self {
            MessageRecord::Result { .. } => "result",
            MessageRecord::Assistant { .. } => "assistant",
            MessageRecord::Other { kind, .. } => kind,
        }
    }

    pub fn subtype(&self) -> &str {
        match self {
            MessageRecord::Result { subtype, .. } | MessageRecord::Other { subtype, .. } => {
                subtype
            }
            MessageRecord::Assistant { .. } => "",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssistantMessage {
    pub model: String,
    pub id: String,
    pub role: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: String,
}

impl AssistantMessage {
    /// First non-empty `text` block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|block| block.kind == "text" && !block.text.is_empty())
            .map(|block| block.text.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentBlock {
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecord {
    #[serde(rename = "type")]
    kind: Option<String>,
    subtype: Option<String>,
    result: Option<String>,
    message: Option<RawMessage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMessage {
    model: Option<String>,
    id: Option<String>,
    role: Option<String>,
    content: Option<Vec<Option<RawBlock>>>,
    stop_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBlock {
    #[serde(rename = "type")]
    kind: Option<String>,
    text: Option<String>,
}

impl From<Option<RawRecord>> for MessageRecord {
    fn from(raw: Option<RawRecord>) -> Self {
        let raw = raw.unwrap_or_default();
        let kind = raw.kind.unwrap_or_default();
        let subtype = raw.subtype.unwrap_or_default();
        match kind.as_str() {
            "result" => MessageRecord::Result {
                subtype,
                result: raw.result.unwrap_or_default(),
            },
            "assistant" => MessageRecord::Assistant {
                message: raw.message.map(AssistantMessage::from).unwrap_or_default(),
            },
            _ => MessageRecord::Other { kind, subtype },
        }
    }
}

impl From<RawMessage> for AssistantMessage {
    fn from(raw: RawMessage) -> Self {
        Self {
            model: raw.model.unwrap_or_default(),
            id: raw.id.unwrap_or_default(),
            role: raw.role.unwrap_or_default(),
            content: raw
                .content
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .map(|block| ContentBlock {
                    kind: block.kind.unwrap_or_default(),
                    text: block.text.unwrap_or_default(),
                })
                .collect(),
            stop_reason: raw.stop_reason.unwrap_or_default(),
        }
    }
}
