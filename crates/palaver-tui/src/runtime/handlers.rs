//! Effect handlers: pure async functions returning `UiEvent`s.

use palaver_core::api::{ApiClient, SessionCreationParams};
use palaver_core::stream;
use tokio::sync::mpsc;

use crate::events::UiEvent;

pub async fn load_sessions(client: ApiClient) -> UiEvent {
    UiEvent::SessionsLoaded(
        client
            .list_sessions()
            .await
            .map_err(|err| err.to_string()),
    )
}

pub async fn load_agents(client: ApiClient) -> UiEvent {
    UiEvent::AgentsLoaded(client.list_agents().await.map_err(|err| err.to_string()))
}

/// Fetches a session and its historical events for replay.
pub async fn open_session(client: ApiClient, session_id: String) -> UiEvent {
    let session = match client.get_session(&session_id).await {
        Ok(session) => session,
        Err(err) => {
            return UiEvent::SessionOpenFailed {
                error: err.to_string(),
            };
        }
    };
    match client.session_events(&session_id).await {
        Ok(events) => UiEvent::SessionOpened { session, events },
        Err(err) => UiEvent::SessionOpenFailed {
            error: err.to_string(),
        },
    }
}

/// Creates the session when needed, then opens the stream and hands its
/// channel back to the reducer. A creation failure aborts before any stream
/// is opened.
pub async fn create_and_stream(
    client: ApiClient,
    tx: mpsc::UnboundedSender<UiEvent>,
    session_id: String,
    text: String,
    create: Option<SessionCreationParams>,
) {
    if let Some(params) = create {
        match client.create_session(&params).await {
            Ok(session) => {
                let _ = tx.send(UiEvent::SessionCreated(session));
            }
            Err(err) => {
                let _ = tx.send(UiEvent::SessionCreateFailed {
                    error: err.to_string(),
                });
                return;
            }
        }
    }

    let handle = stream::open(&client, &session_id, &text);
    let (rx, cancel) = handle.into_parts();
    let _ = tx.send(UiEvent::StreamStarted { rx, cancel });
}
