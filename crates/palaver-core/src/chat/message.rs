//! Message types for the conversation view.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    User,
    AiAgent,
    System,
}

impl MessageSource {
    pub fn is_user(self) -> bool {
        matches!(self, MessageSource::User)
    }

    pub fn is_agent(self) -> bool {
        matches!(self, MessageSource::AiAgent)
    }
}

/// Message content.
///
/// Either plain text (fragments concatenated in arrival order), an ordered
/// list of fragments, or an opaque structured value rendered as serialized
/// JSON. Variant order matters for untagged deserialization: a JSON string
/// becomes `Text`, an array of strings becomes `Fragments`, anything else
/// becomes `Data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Fragments(Vec<String>),
    Data(Value),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl MessageContent {
    /// Appends a textual fragment.
    ///
    /// Opaque `Data` content is left untouched: merging only grows fields and
    /// a structured value has no append position.
    pub fn push_fragment(&mut self, fragment: &str) {
        match self {
            MessageContent::Text(text) => text.push_str(fragment),
            MessageContent::Fragments(fragments) => fragments.push(fragment.to_string()),
            MessageContent::Data(_) => {
                tracing::debug!("dropping text fragment aimed at structured content");
            }
        }
    }

    /// Concatenated text for display. `Data` renders as pretty-printed JSON.
    pub fn rendered(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Fragments(fragments) => fragments.concat(),
            MessageContent::Data(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            MessageContent::Text(text) => text.is_empty(),
            MessageContent::Fragments(fragments) => fragments.iter().all(String::is_empty),
            MessageContent::Data(value) => value.is_null(),
        }
    }
}

/// One tool invocation attached to a message.
///
/// A call without a `result` is pending and rendered as a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_call_id: String,
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ToolCall {
    pub fn is_pending(&self) -> bool {
        self.result.is_none()
    }
}

/// One turn in a conversation.
///
/// Identity is the `id`; all other fields only grow for the lifetime of the
/// message. `revision` is stamped by the store on every merge that touches
/// this message, so renderers can skip untouched messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub source: MessageSource,
    pub content: MessageContent,
    pub reasoning: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub revision: u64,
}

impl Message {
    pub fn new(id: impl Into<String>, source: MessageSource) -> Self {
        Self {
            id: id.into(),
            source,
            content: MessageContent::default(),
            reasoning: None,
            tool_calls: Vec::new(),
            revision: 0,
        }
    }

    /// Returns the tool call with the given id, if present.
    pub fn tool_call(&self, tool_call_id: &str) -> Option<&ToolCall> {
        self.tool_calls
            .iter()
            .find(|call| call.tool_call_id == tool_call_id)
    }
}
