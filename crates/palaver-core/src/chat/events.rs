//! Stream event types.
//!
//! One event is one incremental update scoped to a single message id. The
//! same shape is used on the wire (SSE `message` payloads and the historical
//! events endpoint) and in memory.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::MessageSource;

/// A partial piece of content carried by a `Content` payload.
///
/// Untagged: a JSON string is a text fragment, anything else is an opaque
/// structured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentFragment {
    Text(String),
    Data(Value),
}

/// The partial payload of a stream event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// A content fragment to append to the message.
    Content { fragment: ContentFragment },
    /// A reasoning fragment to append to the message.
    Reasoning { fragment: String },
    /// A tool-call update: a new entry, or a result for a pending entry.
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
    },
}

/// One incremental update delivered by the streaming transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub id: String,
    pub source: MessageSource,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl StreamEvent {
    /// A text content fragment event.
    pub fn content(id: impl Into<String>, source: MessageSource, fragment: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source,
            payload: EventPayload::Content {
                fragment: ContentFragment::Text(fragment.into()),
            },
        }
    }

    /// An opaque structured content event.
    pub fn data(id: impl Into<String>, source: MessageSource, value: Value) -> Self {
        Self {
            id: id.into(),
            source,
            payload: EventPayload::Content {
                fragment: ContentFragment::Data(value),
            },
        }
    }

    /// A reasoning fragment event.
    pub fn reasoning(
        id: impl Into<String>,
        source: MessageSource,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            payload: EventPayload::Reasoning {
                fragment: fragment.into(),
            },
        }
    }

    /// A tool-call update event.
    pub fn tool_call(
        id: impl Into<String>,
        source: MessageSource,
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        result: Option<Value>,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            payload: EventPayload::ToolCall {
                tool_call_id: tool_call_id.into(),
                tool_name: tool_name.into(),
                result,
            },
        }
    }
}
