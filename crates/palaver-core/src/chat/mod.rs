//! Conversation state engine.
//!
//! The message store is the single source of truth for what a session view
//! renders. Stream events (live or replayed from the backend) are folded into
//! it by the event merger; everything downstream keys off revision counters.

mod events;
mod message;
mod store;

pub use events::{ContentFragment, EventPayload, StreamEvent};
pub use message::{Message, MessageContent, MessageSource, ToolCall};
pub use store::MessageStore;
