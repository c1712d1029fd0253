//! Terminal UI for palaver.
//!
//! Elm-style architecture: `state` holds the data, `update` is the pure
//! reducer producing `effects`, and `runtime` owns the terminal, executes
//! effects, and drains async results back into the reducer. Rendering is
//! gated on revision stamps instead of value comparison.

pub mod effects;
pub mod events;
mod features;
pub mod overlays;
pub mod render;
pub mod render_gate;
pub mod runtime;
pub mod state;
mod terminal;
pub mod update;

use std::time::Duration;

use anyhow::{Context, Result};
use palaver_core::api::ApiClient;
use palaver_core::config::Config;
use palaver_core::draft::DraftStore;

pub use features::{input, sidebar, transcript};

/// What the chat view should show first.
#[derive(Debug, Clone)]
pub enum Launch {
    /// Resume an existing session by id.
    Resume(String),
    /// Start a fresh session with a known agent.
    NewSession(String),
    /// Ask the user to pick an agent.
    PickAgent,
}

/// Runs the interactive chat TUI until the user quits.
pub async fn run(config: Config, launch: Launch) -> Result<()> {
    let client = ApiClient::new(
        &config.server_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("invalid server configuration")?;
    let drafts = DraftStore::open_default();

    let mut runtime = runtime::TuiRuntime::new(config, client, drafts)?;

    let mut initial = vec![effects::UiEffect::LoadSessions];
    match launch {
        Launch::Resume(session_id) => {
            initial.push(effects::UiEffect::OpenSession { session_id });
        }
        Launch::NewSession(agent_id) => {
            initial.extend(update::start_new_session(&mut runtime.state, agent_id));
        }
        Launch::PickAgent => {
            initial.extend(update::open_agent_picker(&mut runtime.state));
        }
    }

    runtime.run(initial)
}
