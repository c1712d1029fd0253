//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects; the reducer itself never performs I/O.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use palaver_core::api::SessionCreationParams;
use palaver_core::chat::{MessageSource, StreamEvent};
use palaver_core::sessions::derive_title;
use palaver_core::stream::StreamUpdate;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::input::{self, InputKeyResult};
use crate::overlays::{AgentPickerOutcome, AgentPickerState, Overlay};
use crate::state::{AppState, Focus, SessionView, StreamState, TuiState};

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            if app.tui.stream.is_active() {
                app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            }
            vec![]
        }
        UiEvent::Terminal(terminal_event) => handle_terminal_event(app, terminal_event),
        UiEvent::Stream(update) => handle_stream_update(&mut app.tui, update),
        UiEvent::StreamStarted { rx, cancel } => {
            if matches!(app.tui.stream, StreamState::Opening) {
                app.tui.stream = StreamState::Streaming { rx, cancel };
                vec![]
            } else {
                // Stopped before the transport came up; the channel is
                // dropped here so nothing from it is ever merged.
                vec![UiEffect::CancelStream { cancel }]
            }
        }
        UiEvent::SessionsLoaded(Ok(sessions)) => {
            app.tui.sidebar.set_sessions(sessions);
            vec![]
        }
        UiEvent::SessionsLoaded(Err(error)) => {
            app.tui.sidebar.set_loading(false);
            app.tui.set_notice(format!("Failed to load sessions: {error}"));
            vec![]
        }
        UiEvent::AgentsLoaded(result) => {
            if let Some(Overlay::AgentPicker(picker)) = &mut app.overlay {
                match result {
                    Ok(agents) => picker.set_agents(agents),
                    Err(error) => picker.set_error(error),
                }
            }
            vec![]
        }
        UiEvent::SessionOpened { session, events } => {
            // A stream still running for the previous view must not outlive
            // it; cancellation and reset always travel together.
            let mut effects = stop_stream(&mut app.tui);
            app.tui.clear_load_error();
            app.tui.transcript.reset();
            app.tui.session = SessionView::Open {
                id: session.id.clone(),
                agent_id: session.agent_id,
                title: session.title,
                pending_create: false,
            };
            app.tui.transcript.store.replay(events);
            app.tui.transcript.scroll_to_bottom();
            app.tui.focus = Focus::Input;
            effects.push(UiEffect::LoadDraft {
                session_id: session.id,
            });
            effects
        }
        UiEvent::SessionOpenFailed { error } => {
            app.tui.set_load_error(error);
            vec![]
        }
        UiEvent::SessionCreated(session) => {
            if let SessionView::Open {
                id,
                title,
                pending_create,
                ..
            } = &mut app.tui.session
                && *id == session.id
            {
                *pending_create = false;
                if title.is_none() {
                    title.clone_from(&session.title);
                }
            }
            app.tui.sidebar.set_loading(true);
            vec![UiEffect::LoadSessions]
        }
        UiEvent::SessionCreateFailed { error } => {
            app.tui.stream = StreamState::Idle;
            app.tui.set_notice(format!("Failed to create session: {error}"));
            vec![]
        }
        UiEvent::DraftLoaded { session_id, text } => {
            // The live control value wins over the stored draft.
            if app.tui.session.id() == Some(session_id.as_str()) && app.tui.input.is_empty() {
                app.tui.input.set_text(&text);
            }
            vec![]
        }
    }
}

// ============================================================================
// Session lifecycle helpers
// ============================================================================

/// Starts a fresh, not-yet-created session for the given agent.
pub fn start_new_session(app: &mut AppState, agent_id: String) -> Vec<UiEffect> {
    let mut effects = close_session(&mut app.tui);
    let session_id = uuid::Uuid::new_v4().to_string();
    app.tui.clear_load_error();
    app.tui.session = SessionView::Open {
        id: session_id.clone(),
        agent_id,
        title: None,
        pending_create: true,
    };
    app.tui.focus = Focus::Input;
    effects.push(UiEffect::LoadDraft { session_id });
    effects
}

/// Opens the agent picker overlay and requests the catalog.
pub fn open_agent_picker(app: &mut AppState) -> Vec<UiEffect> {
    app.overlay = Some(Overlay::AgentPicker(AgentPickerState::open()));
    vec![UiEffect::LoadAgents]
}

/// Tears down the active session view: cancel any open stream, then reset
/// the store. The two always compose; there is no bare store clear.
fn close_session(tui: &mut TuiState) -> Vec<UiEffect> {
    let effects = stop_stream(tui);
    tui.transcript.reset();
    tui.session = SessionView::None;
    tui.input.clear();
    effects
}

/// Requests cooperative cancellation and drops the receiving end, so no
/// in-flight fragment can be merged after this returns. Already-merged
/// content is retained.
fn stop_stream(tui: &mut TuiState) -> Vec<UiEffect> {
    match std::mem::replace(&mut tui.stream, StreamState::Idle) {
        StreamState::Streaming { cancel, .. } => vec![UiEffect::CancelStream { cancel }],
        StreamState::Opening | StreamState::Idle => vec![],
    }
}

fn request_quit(tui: &mut TuiState) -> Vec<UiEffect> {
    let mut effects = close_session(tui);
    effects.push(UiEffect::Quit);
    effects
}

// ============================================================================
// Stream updates
// ============================================================================

fn handle_stream_update(tui: &mut TuiState, update: StreamUpdate) -> Vec<UiEffect> {
    match update {
        StreamUpdate::Event(event) => {
            tui.transcript.store.apply(&event);
            vec![]
        }
        StreamUpdate::Completed => {
            tui.stream = StreamState::Idle;
            vec![]
        }
        StreamUpdate::Failed { message } => {
            // Surfaced exactly once; merged content is kept, no retry.
            tui.stream = StreamState::Idle;
            tui.set_notice(format!("Stream error: {message}"));
            vec![]
        }
    }
}

// ============================================================================
// Terminal events
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Paste(text) => {
            if app.overlay.is_none() && app.tui.focus == Focus::Input {
                app.tui.input.insert_str(&text);
                return persist_draft_effect(&app.tui);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    // Overlay first: it swallows keys while open.
    if let Some(Overlay::AgentPicker(picker)) = &mut app.overlay {
        return match picker.handle_key(key) {
            AgentPickerOutcome::Stay => vec![],
            AgentPickerOutcome::Close => {
                app.overlay = None;
                vec![]
            }
            AgentPickerOutcome::Start(agent) => {
                app.overlay = None;
                start_new_session(app, agent.id)
            }
        };
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') if ctrl => return request_quit(&mut app.tui),
        KeyCode::Char('c') if ctrl => {
            // Ctrl+C stops a running stream; quits when idle.
            return if app.tui.stream.is_active() {
                stop_stream(&mut app.tui)
            } else {
                request_quit(&mut app.tui)
            };
        }
        KeyCode::Char('n') if ctrl => return open_agent_picker(app),
        KeyCode::Char('t') if ctrl => {
            let collapsed = app.tui.sidebar.toggle_collapsed();
            if collapsed && app.tui.focus == Focus::Sidebar {
                app.tui.focus = Focus::Input;
            }
            return vec![UiEffect::PersistSidebarCollapsed { collapsed }];
        }
        KeyCode::Char('r') if ctrl => {
            app.tui.sidebar.set_loading(true);
            return vec![UiEffect::LoadSessions];
        }
        KeyCode::Tab => {
            if !app.tui.sidebar.is_collapsed() {
                app.tui.focus = match app.tui.focus {
                    Focus::Input => Focus::Sidebar,
                    Focus::Sidebar => Focus::Input,
                };
            }
            return vec![];
        }
        KeyCode::Esc => return handle_escape(&mut app.tui),
        KeyCode::PageUp => {
            let page = app.tui.transcript.page_size();
            app.tui.transcript.scroll_up(page);
            return vec![];
        }
        KeyCode::PageDown => {
            let page = app.tui.transcript.page_size();
            app.tui.transcript.scroll_down(page);
            return vec![];
        }
        _ => {}
    }

    match app.tui.focus {
        Focus::Sidebar => handle_sidebar_key(app, key),
        Focus::Input => handle_input_key(&mut app.tui, key),
    }
}

/// Esc: stop the stream, else dismiss errors/notices, else leave the
/// sidebar.
fn handle_escape(tui: &mut TuiState) -> Vec<UiEffect> {
    if tui.stream.is_active() {
        return stop_stream(tui);
    }
    if tui.load_error.is_some() {
        tui.clear_load_error();
        return vec![];
    }
    if tui.notice.is_some() {
        tui.clear_notice();
        return vec![];
    }
    if tui.focus == Focus::Sidebar {
        tui.sidebar.clear_filter();
        tui.focus = Focus::Input;
    }
    vec![]
}

fn handle_sidebar_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Up => {
            app.tui.sidebar.select_prev();
            vec![]
        }
        KeyCode::Down => {
            app.tui.sidebar.select_next();
            vec![]
        }
        KeyCode::Backspace => {
            app.tui.sidebar.pop_filter();
            vec![]
        }
        KeyCode::Enter => {
            let Some(session_id) = app
                .tui
                .sidebar
                .selected_session()
                .map(|session| session.id.clone())
            else {
                return vec![];
            };
            if app.tui.session.id() == Some(session_id.as_str()) {
                app.tui.focus = Focus::Input;
                return vec![];
            }
            let mut effects = close_session(&mut app.tui);
            effects.push(UiEffect::OpenSession { session_id });
            effects
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.tui.sidebar.push_filter(c);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_input_key(tui: &mut TuiState, key: KeyEvent) -> Vec<UiEffect> {
    match input::handle_key(&mut tui.input, key) {
        InputKeyResult::Submit => submit(tui),
        InputKeyResult::Edited => persist_draft_effect(tui),
        InputKeyResult::Moved | InputKeyResult::Ignored => vec![],
    }
}

/// Mirrors the current input text to the durable draft slot.
fn persist_draft_effect(tui: &TuiState) -> Vec<UiEffect> {
    match tui.session.id() {
        Some(session_id) => vec![UiEffect::PersistDraft {
            session_id: session_id.to_string(),
            text: tui.input.text().to_string(),
        }],
        None => vec![],
    }
}

// ============================================================================
// Submission
// ============================================================================

/// Handles a submit request.
///
/// Empty input is a no-op. A submit while a stream is active is rejected
/// with a notice and no state change. Otherwise the user message is appended
/// locally, the draft is cleared, and the transport is asked to open a
/// stream (creating the session first for a fresh view).
fn submit(tui: &mut TuiState) -> Vec<UiEffect> {
    let text = tui.input.text().trim().to_string();
    if text.is_empty() {
        return vec![];
    }
    if tui.stream.is_active() {
        tui.set_notice("Wait for the agent to finish its reply.");
        return vec![];
    }

    let (session_id, agent_id, pending_create) = match &tui.session {
        SessionView::Open {
            id,
            agent_id,
            pending_create,
            ..
        } => (id.clone(), agent_id.clone(), *pending_create),
        SessionView::None => {
            tui.set_notice("Pick an agent first (ctrl+n).");
            return vec![];
        }
    };

    let user_message_id = format!("user-{}", uuid::Uuid::new_v4());
    tui.transcript.store.apply(&StreamEvent::content(
        user_message_id,
        MessageSource::User,
        text.clone(),
    ));
    tui.transcript.scroll_to_bottom();

    let create = pending_create.then(|| SessionCreationParams {
        id: session_id.clone(),
        title: derive_title(&text),
        agent_id,
    });
    if let Some(params) = &create
        && let SessionView::Open { title, .. } = &mut tui.session
    {
        *title = Some(params.title.clone());
    }

    tui.input.clear();
    tui.clear_notice();
    tui.stream = StreamState::Opening;

    vec![
        UiEffect::ClearDraft {
            session_id: session_id.clone(),
        },
        UiEffect::StartStream {
            session_id,
            text,
            create,
        },
    ]
}

#[cfg(test)]
mod tests {
    use palaver_core::config::Config;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use super::*;

    fn app() -> AppState {
        AppState::new(Config::default())
    }

    fn app_with_session() -> AppState {
        let mut app = app();
        app.tui.session = SessionView::Open {
            id: "s1".to_string(),
            agent_id: "triage".to_string(),
            title: Some("hello".to_string()),
            pending_create: false,
        };
        app
    }

    fn press(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    fn press_ctrl(app: &mut AppState, c: char) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::CONTROL,
            ))),
        )
    }

    fn start_streaming(app: &mut AppState) -> mpsc::Sender<StreamUpdate> {
        app.tui.stream = StreamState::Opening;
        let (tx, rx) = mpsc::channel(8);
        let effects = update(
            app,
            UiEvent::StreamStarted {
                rx,
                cancel: CancellationToken::new(),
            },
        );
        assert!(effects.is_empty());
        tx
    }

    fn agent_fragment(id: &str, text: &str) -> UiEvent {
        UiEvent::Stream(StreamUpdate::Event(StreamEvent::content(
            id,
            MessageSource::AiAgent,
            text,
        )))
    }

    #[test]
    fn empty_submit_is_a_noop() {
        let mut app = app_with_session();
        let effects = press(&mut app, KeyCode::Enter);
        assert!(effects.is_empty());
        assert!(app.tui.transcript.store.is_empty());
        assert!(!app.tui.stream.is_active());

        app.tui.input.set_text("   ");
        let effects = press(&mut app, KeyCode::Enter);
        assert!(effects.is_empty());
        assert!(app.tui.transcript.store.is_empty());
    }

    #[test]
    fn submit_appends_user_message_and_opens_a_stream() {
        let mut app = app_with_session();
        app.tui.input.set_text("hello");

        let effects = press(&mut app, KeyCode::Enter);

        assert_eq!(app.tui.transcript.store.len(), 1);
        let message = app.tui.transcript.store.last().unwrap();
        assert_eq!(message.source, MessageSource::User);
        assert_eq!(message.content.rendered(), "hello");
        assert!(app.tui.input.is_empty());
        assert!(app.tui.is_thinking());

        assert!(matches!(effects[0], UiEffect::ClearDraft { .. }));
        assert!(matches!(
            &effects[1],
            UiEffect::StartStream { session_id, text, create: None }
                if session_id == "s1" && text == "hello"
        ));
    }

    #[test]
    fn first_submit_of_a_fresh_session_creates_it_with_a_derived_title() {
        let mut app = app();
        let effects = start_new_session(&mut app, "triage".to_string());
        assert!(matches!(effects.last(), Some(UiEffect::LoadDraft { .. })));

        app.tui.input.set_text("what is the weather in lisbon");
        let effects = press(&mut app, KeyCode::Enter);

        match &effects[1] {
            UiEffect::StartStream {
                create: Some(params),
                ..
            } => {
                assert_eq!(params.title, "what is the");
                assert_eq!(params.agent_id, "triage");
            }
            other => panic!("expected StartStream with create, got {other:?}"),
        }
        assert_eq!(app.tui.session.title(), Some("what is the"));
    }

    #[test]
    fn submit_while_streaming_is_rejected_with_a_notice() {
        let mut app = app_with_session();
        app.tui.input.set_text("first");
        press(&mut app, KeyCode::Enter);
        let count = app.tui.transcript.store.len();

        app.tui.input.set_text("second");
        let effects = press(&mut app, KeyCode::Enter);

        assert!(effects.is_empty());
        assert_eq!(app.tui.transcript.store.len(), count);
        assert!(app.tui.notice.is_some());
        assert_eq!(app.tui.input.text(), "second");
    }

    #[test]
    fn streaming_scenario_merges_fragments_and_tracks_thinking() {
        let mut app = app_with_session();
        app.tui.input.set_text("hello");
        press(&mut app, KeyCode::Enter);
        start_streaming(&mut app);

        assert!(app.tui.is_thinking());

        update(&mut app, agent_fragment("m1", "Hi"));
        assert!(!app.tui.is_thinking());
        assert_eq!(app.tui.transcript.store.len(), 2);

        update(&mut app, agent_fragment("m1", " there"));
        assert_eq!(app.tui.transcript.store.len(), 2);
        assert_eq!(
            app.tui.transcript.store.get("m1").unwrap().content.rendered(),
            "Hi there"
        );

        update(&mut app, UiEvent::Stream(StreamUpdate::Completed));
        assert!(!app.tui.stream.is_active());
    }

    #[test]
    fn stop_streaming_goes_idle_and_drops_the_channel() {
        let mut app = app_with_session();
        app.tui.input.set_text("hello");
        press(&mut app, KeyCode::Enter);
        let tx = start_streaming(&mut app);
        update(&mut app, agent_fragment("m1", "partial"));

        let effects = press(&mut app, KeyCode::Esc);

        assert!(matches!(effects.as_slice(), [UiEffect::CancelStream { .. }]));
        assert!(!app.tui.stream.is_active());
        // The receiver is gone, so nothing in flight can be merged.
        assert!(tx.is_closed());
        // Partial content already merged is retained.
        assert_eq!(
            app.tui.transcript.store.get("m1").unwrap().content.rendered(),
            "partial"
        );
    }

    #[test]
    fn stream_failure_surfaces_one_notice_and_returns_to_idle() {
        let mut app = app_with_session();
        app.tui.input.set_text("hello");
        press(&mut app, KeyCode::Enter);
        start_streaming(&mut app);
        update(&mut app, agent_fragment("m1", "partial"));

        update(
            &mut app,
            UiEvent::Stream(StreamUpdate::Failed {
                message: "boom".to_string(),
            }),
        );

        assert!(!app.tui.stream.is_active());
        assert!(app.tui.notice.as_ref().unwrap().text.contains("boom"));
        assert_eq!(
            app.tui.transcript.store.get("m1").unwrap().content.rendered(),
            "partial"
        );
    }

    #[test]
    fn session_create_failure_returns_to_idle_with_a_notice() {
        let mut app = app();
        start_new_session(&mut app, "triage".to_string());
        app.tui.input.set_text("hello");
        press(&mut app, KeyCode::Enter);
        assert!(app.tui.stream.is_active());

        update(
            &mut app,
            UiEvent::SessionCreateFailed {
                error: "agent not found".to_string(),
            },
        );

        assert!(!app.tui.stream.is_active());
        assert!(app.tui.notice.is_some());
    }

    #[test]
    fn stale_stream_started_is_cancelled_not_adopted() {
        let mut app = app_with_session();
        let (_tx, rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();

        let effects = update(&mut app, UiEvent::StreamStarted { rx, cancel });

        assert!(matches!(effects.as_slice(), [UiEffect::CancelStream { .. }]));
        assert!(!app.tui.stream.is_active());
    }

    #[test]
    fn quitting_cancels_the_stream_and_resets_the_store() {
        let mut app = app_with_session();
        app.tui.input.set_text("hello");
        press(&mut app, KeyCode::Enter);
        let tx = start_streaming(&mut app);

        let effects = press_ctrl(&mut app, 'q');

        assert!(effects.iter().any(|e| matches!(e, UiEffect::CancelStream { .. })));
        assert!(effects.iter().any(|e| matches!(e, UiEffect::Quit)));
        assert!(app.tui.transcript.store.is_empty());
        assert!(tx.is_closed());
    }

    #[test]
    fn draft_loaded_fills_only_an_empty_input() {
        let mut app = app_with_session();
        update(
            &mut app,
            UiEvent::DraftLoaded {
                session_id: "s1".to_string(),
                text: "recovered".to_string(),
            },
        );
        assert_eq!(app.tui.input.text(), "recovered");

        app.tui.input.set_text("live edit");
        update(
            &mut app,
            UiEvent::DraftLoaded {
                session_id: "s1".to_string(),
                text: "stale".to_string(),
            },
        );
        assert_eq!(app.tui.input.text(), "live edit");
    }

    #[test]
    fn typing_mirrors_the_draft() {
        let mut app = app_with_session();
        let effects = press(&mut app, KeyCode::Char('h'));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::PersistDraft { session_id, text }] if session_id == "s1" && text == "h"
        ));
    }

    #[test]
    fn opening_a_session_replays_history_and_loads_the_draft() {
        let mut app = app();
        let session = palaver_core::sessions::Session {
            id: "s9".to_string(),
            title: Some("older chat".to_string()),
            agent_id: "triage".to_string(),
            created_at: "2026-08-01T00:00:00Z".parse().unwrap(),
        };
        let events = vec![
            StreamEvent::content("u1", MessageSource::User, "hi"),
            StreamEvent::content("m1", MessageSource::AiAgent, "hello"),
        ];

        let effects = update(&mut app, UiEvent::SessionOpened { session, events });

        assert_eq!(app.tui.transcript.store.len(), 2);
        assert_eq!(app.tui.session.title(), Some("older chat"));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::LoadDraft { session_id }] if session_id == "s9"
        ));
    }

}
