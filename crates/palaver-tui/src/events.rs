//! UI event types.
//!
//! Everything the reducer consumes arrives as a `UiEvent`: terminal input,
//! ticks, stream updates drained from the active channel, and async results
//! delivered through the runtime inbox.

use palaver_core::api::Agent;
use palaver_core::chat::StreamEvent;
use palaver_core::sessions::Session;
use palaver_core::stream::StreamUpdate;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick (animation, coalescing).
    Tick,

    /// Raw terminal event.
    Terminal(crossterm::event::Event),

    /// One update drained from the active stream channel.
    Stream(StreamUpdate),

    /// The transport opened a stream and handed back its channel.
    StreamStarted {
        rx: mpsc::Receiver<StreamUpdate>,
        cancel: CancellationToken,
    },

    /// Result of loading the session list for the sidebar.
    SessionsLoaded(Result<Vec<Session>, String>),

    /// Result of loading the agent catalog for the picker.
    AgentsLoaded(Result<Vec<Agent>, String>),

    /// A session and its historical events were fetched.
    SessionOpened {
        session: Session,
        events: Vec<StreamEvent>,
    },

    /// Fetching a session (or its events) failed before rendering.
    SessionOpenFailed { error: String },

    /// The backend acknowledged a session created on first submit.
    SessionCreated(Session),

    /// Creating the session failed; the stream was never opened.
    SessionCreateFailed { error: String },

    /// A stored draft was found for the active session.
    DraftLoaded { session_id: String, text: String },
}
