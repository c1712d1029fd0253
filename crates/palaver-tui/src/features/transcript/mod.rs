//! Transcript feature: the rendered conversation.
//!
//! Owns the message store, scroll state, and the per-message wrap cache that
//! implements the message-level render gate.

mod state;
mod tools;
mod view;
mod wrap;

pub use state::{ScrollMode, TranscriptState};
pub use tools::ToolRenderers;
pub use view::transcript_lines;
pub use wrap::wrap_text;
