//! Ordered, id-keyed message store and event merger.

use std::collections::HashMap;

use super::events::{ContentFragment, EventPayload, StreamEvent};
use super::message::{Message, MessageContent, ToolCall};

/// The message store for one session view.
///
/// Insertion order equals first-arrival order of each distinct message id.
/// Merging is monotonic: fields only grow, never shrink or reorder. Every
/// applied event bumps the store revision and stamps the touched message, so
/// the presentation layer can redraw on revision change instead of comparing
/// values.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    index: HashMap<String, usize>,
    revision: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one stream event into the store.
    ///
    /// An unseen id inserts a new message at the end, seeded with whatever
    /// the event carries; this is the message's single insertion point. A
    /// seen id merges the partial payload into the existing message.
    pub fn apply(&mut self, event: &StreamEvent) {
        self.revision += 1;
        let revision = self.revision;

        if let Some(&pos) = self.index.get(&event.id) {
            let message = &mut self.messages[pos];
            merge_payload(message, &event.payload);
            message.revision = revision;
        } else {
            let mut message = Message::new(event.id.clone(), event.source);
            merge_payload(&mut message, &event.payload);
            message.revision = revision;
            self.index.insert(event.id.clone(), self.messages.len());
            self.messages.push(message);
        }
    }

    /// Replays a sequence of historical events in delivery order.
    ///
    /// Used to seed the store from the backend before any live streaming.
    pub fn replay<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = StreamEvent>,
    {
        for event in events {
            self.apply(&event);
        }
    }

    /// Empties the store entirely.
    ///
    /// Used on session teardown, not mid-stream cancellation. The revision
    /// keeps counting up so a reset still invalidates render gates.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.index.clear();
        self.revision += 1;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.index.get(id).map(|&pos| &self.messages[pos])
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Current store revision; bumped by every `apply` and `reset`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True while the most recent message is from the user.
    ///
    /// Combined with an open stream this is the "agent is composing" signal;
    /// it clears the instant the first event of the reply is merged.
    pub fn awaiting_reply(&self) -> bool {
        self.last().is_some_and(|message| message.source.is_user())
    }
}

fn merge_payload(message: &mut Message, payload: &EventPayload) {
    match payload {
        EventPayload::Content { fragment } => match fragment {
            ContentFragment::Text(text) => message.content.push_fragment(text),
            ContentFragment::Data(value) => {
                // An opaque value only lands in an empty slot; it never
                // replaces accumulated content.
                if message.content.is_empty() {
                    message.content = MessageContent::Data(value.clone());
                } else {
                    tracing::debug!(id = %message.id, "ignoring structured content for non-empty message");
                }
            }
        },
        EventPayload::Reasoning { fragment } => {
            message
                .reasoning
                .get_or_insert_with(String::new)
                .push_str(fragment);
        }
        EventPayload::ToolCall {
            tool_call_id,
            tool_name,
            result,
        } => {
            if let Some(call) = message
                .tool_calls
                .iter_mut()
                .find(|call| call.tool_call_id == *tool_call_id)
            {
                if call.result.is_none() {
                    call.result.clone_from(result);
                }
            } else {
                message.tool_calls.push(ToolCall {
                    tool_call_id: tool_call_id.clone(),
                    tool_name: tool_name.clone(),
                    result: result.clone(),
                });
            }
        }
    }
}
