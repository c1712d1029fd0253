//! Application state composition.
//!
//! State hierarchy:
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── input: InputState          (draft text, cursor)
//! │   ├── transcript: TranscriptState (message store, scroll, wrap cache)
//! │   ├── sidebar: SidebarState      (grouped session list)
//! │   ├── session: SessionView       (active session metadata)
//! │   └── stream: StreamState        (Idle / Opening / Streaming)
//! └── overlay: Option<Overlay>       (modal overlays)
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay
//! handlers can take `&mut self` and `&mut TuiState` simultaneously.

use palaver_core::config::Config;
use palaver_core::stream::StreamUpdate;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::input::InputState;
use crate::overlays::Overlay;
use crate::sidebar::SidebarState;
use crate::transcript::TranscriptState;

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            tui: TuiState::new(config),
            overlay: None,
        }
    }
}

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Sidebar,
}

/// The active session view, if any.
#[derive(Debug, Clone)]
pub enum SessionView {
    /// Nothing open yet; the agent picker or sidebar leads somewhere.
    None,
    Open {
        id: String,
        agent_id: String,
        title: Option<String>,
        /// True until the backend knows about the session; it is created on
        /// the first submit, with a title derived from that message.
        pending_create: bool,
    },
}

impl SessionView {
    pub fn id(&self) -> Option<&str> {
        match self {
            SessionView::None => None,
            SessionView::Open { id, .. } => Some(id),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SessionView::Open { .. })
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            SessionView::None => None,
            SessionView::Open { title, .. } => title.as_deref(),
        }
    }
}

/// Stream lifecycle for the active session view.
///
/// At most one stream exists per view. `Opening` covers the window between
/// the submit and the transport handing back its channel; it already counts
/// as active so a second submit is rejected rather than doubled.
#[derive(Debug)]
pub enum StreamState {
    Idle,
    Opening,
    Streaming {
        rx: mpsc::Receiver<StreamUpdate>,
        cancel: CancellationToken,
    },
}

impl StreamState {
    /// True while a stream is open or being opened.
    pub fn is_active(&self) -> bool {
        !matches!(self, StreamState::Idle)
    }
}

/// One-shot transient status message (stream and submission-guard errors).
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
}

/// TUI application state (non-overlay).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Client configuration.
    pub config: Config,
    /// User input state.
    pub input: InputState,
    /// Transcript state (message store, scroll, wrap cache).
    pub transcript: TranscriptState,
    /// Sessions sidebar state.
    pub sidebar: SidebarState,
    /// Active session metadata.
    pub session: SessionView,
    /// Stream lifecycle.
    pub stream: StreamState,
    /// Transient notice shown in the status line.
    pub notice: Option<Notice>,
    /// Full-view load error (failed to open a session).
    pub load_error: Option<String>,
    /// Bumped whenever notice or load_error change, for the render gate.
    pub status_seq: u64,
    /// Which pane receives navigation keys.
    pub focus: Focus,
    /// Spinner animation frame; advances only while a stream is active.
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(config: Config) -> Self {
        let sidebar = SidebarState::new(config.sidebar_collapsed);
        Self {
            should_quit: false,
            config,
            input: InputState::new(),
            transcript: TranscriptState::new(),
            sidebar,
            session: SessionView::None,
            stream: StreamState::Idle,
            notice: None,
            load_error: None,
            status_seq: 0,
            focus: Focus::Input,
            spinner_frame: 0,
        }
    }

    /// True while the agent is composing: a stream is active and the most
    /// recent message is still the user's.
    pub fn is_thinking(&self) -> bool {
        self.stream.is_active() && self.transcript.store.awaiting_reply()
    }

    /// Replaces the current notice. Each call is one user-visible signal.
    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice { text: text.into() });
        self.status_seq += 1;
    }

    pub fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.status_seq += 1;
        }
    }

    /// Enters the full-view error state (load errors, §7a).
    pub fn set_load_error(&mut self, text: impl Into<String>) {
        self.load_error = Some(text.into());
        self.status_seq += 1;
    }

    pub fn clear_load_error(&mut self) {
        if self.load_error.take().is_some() {
            self.status_seq += 1;
        }
    }
}
