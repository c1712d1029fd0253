//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here. The
//! reducer stays pure and produces effects; this module executes them.
//!
//! Async results come back through an inbox channel: handlers send
//! `UiEvent`s to `inbox_tx`, and the loop drains `inbox_rx` each frame. The
//! active stream keeps its own channel, drained separately, so event order
//! within one stream is preserved.

mod handlers;

use std::future::Future;
use std::io::Stdout;

use anyhow::{Context, Result};
use crossterm::event;
use palaver_core::api::ApiClient;
use palaver_core::config::Config;
use palaver_core::draft::DraftStore;
use palaver_core::stream::StreamUpdate;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::render_gate::RenderGate;
use crate::state::{AppState, StreamState};
use crate::{render, terminal, update};

/// Tick cadence while something is moving (streaming, loading).
const FRAME_DURATION: std::time::Duration = std::time::Duration::from_millis(33);

/// Poll duration when idle; longer timeout reduces CPU usage.
const IDLE_POLL_DURATION: std::time::Duration = std::time::Duration::from_millis(150);

/// Full-screen TUI runtime.
///
/// Terminal state is restored on drop, panic, or quit.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    client: ApiClient,
    drafts: DraftStore,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    gate: RenderGate,
    last_tick: std::time::Instant,
}

impl TuiRuntime {
    /// Creates the runtime: installs the panic hook, enters the alternate
    /// screen, and builds the initial state.
    pub fn new(config: Config, client: ApiClient, drafts: DraftStore) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let state = AppState::new(config);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            client,
            drafts,
            inbox_tx,
            inbox_rx,
            gate: RenderGate::new(),
            last_tick: std::time::Instant::now(),
        })
    }

    /// Runs the main event loop until quit.
    pub fn run(&mut self, initial: Vec<UiEffect>) -> Result<()> {
        self.execute_effects(initial);

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;
            for event in events {
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            let size = self.terminal.size()?;
            if self.gate.should_render(&self.state, (size.width, size.height)) {
                self.terminal
                    .draw(|frame| render::render(&self.state, frame))?;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let busy = self.state.tui.stream.is_active() || self.state.tui.sidebar.is_loading();
        let tick_interval = if busy { FRAME_DURATION } else { IDLE_POLL_DURATION };

        self.collect_stream_events(&mut events);
        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        // Block on the terminal only when there is nothing else to process,
        // and never past the next tick.
        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            std::time::Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(std::time::Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = std::time::Instant::now();
        }

        Ok(events)
    }

    /// Drains the active stream channel in delivery order.
    fn collect_stream_events(&mut self, events: &mut Vec<UiEvent>) {
        let mut saw_terminal = false;
        let mut disconnected = false;

        if let StreamState::Streaming { rx, .. } = &mut self.state.tui.stream {
            loop {
                match rx.try_recv() {
                    Ok(update) => {
                        saw_terminal |= matches!(
                            update,
                            StreamUpdate::Completed | StreamUpdate::Failed { .. }
                        );
                        events.push(UiEvent::Stream(update));
                        if saw_terminal {
                            break;
                        }
                    }
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        // A closed channel without a terminal update means the stream task
        // died; surface it as a stream error rather than hanging.
        if disconnected && !saw_terminal {
            events.push(UiEvent::Stream(StreamUpdate::Failed {
                message: "stream closed unexpectedly".to_string(),
            }));
        }
    }

    // ========================================================================
    // Effect dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async effect whose result lands in the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }

            UiEffect::LoadSessions => {
                self.state.tui.sidebar.set_loading(true);
                let client = self.client.clone();
                self.spawn_effect(move || handlers::load_sessions(client));
            }
            UiEffect::LoadAgents => {
                let client = self.client.clone();
                self.spawn_effect(move || handlers::load_agents(client));
            }
            UiEffect::OpenSession { session_id } => {
                let client = self.client.clone();
                self.spawn_effect(move || handlers::open_session(client, session_id));
            }
            UiEffect::StartStream {
                session_id,
                text,
                create,
            } => {
                let client = self.client.clone();
                let tx = self.inbox_tx.clone();
                tokio::spawn(async move {
                    handlers::create_and_stream(client, tx, session_id, text, create).await;
                });
            }
            UiEffect::CancelStream { cancel } => {
                cancel.cancel();
            }

            // Draft I/O is small synchronous fs work; errors are logged, a
            // lost draft mirror must not interrupt typing.
            UiEffect::LoadDraft { session_id } => {
                if let Some(text) = self.drafts.load(&session_id) {
                    let _ = self.inbox_tx.send(UiEvent::DraftLoaded { session_id, text });
                }
            }
            UiEffect::PersistDraft { session_id, text } => {
                if let Err(err) = self.drafts.save(&session_id, &text) {
                    tracing::warn!("failed to persist draft: {err:#}");
                }
            }
            UiEffect::ClearDraft { session_id } => {
                if let Err(err) = self.drafts.clear(&session_id) {
                    tracing::warn!("failed to clear draft: {err:#}");
                }
            }

            UiEffect::PersistSidebarCollapsed { collapsed } => {
                if let Err(err) = Config::save_sidebar_collapsed(collapsed) {
                    tracing::warn!("failed to persist sidebar preference: {err:#}");
                }
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
