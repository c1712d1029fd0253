//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer itself never
//! performs I/O.

use palaver_core::api::SessionCreationParams;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Fetch the session list for the sidebar.
    LoadSessions,

    /// Fetch the agent catalog for the picker.
    LoadAgents,

    /// Fetch a session and its historical events, then open it.
    OpenSession { session_id: String },

    /// Open the event stream for one agent turn. When `create` is set the
    /// session is POSTed first; a creation failure aborts the stream.
    StartStream {
        session_id: String,
        text: String,
        create: Option<SessionCreationParams>,
    },

    /// Request cooperative cancellation of a stream task.
    CancelStream { cancel: CancellationToken },

    /// Read the stored draft for a session.
    LoadDraft { session_id: String },

    /// Mirror the current input text to durable storage.
    PersistDraft { session_id: String, text: String },

    /// Remove the stored draft for a session.
    ClearDraft { session_id: String },

    /// Persist the sidebar collapse preference to config.
    PersistSidebarCollapsed { collapsed: bool },
}
