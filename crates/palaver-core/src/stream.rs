//! Streaming transport for live agent replies.
//!
//! `open` POSTs the user text and reads the server-sent event stream in a
//! background task, forwarding updates over an mpsc channel in delivery
//! order. Cancellation is cooperative: once the token fires, nothing further
//! is emitted, but already-delivered events stay merged upstream.

use bytes::Bytes;
use eventsource_stream::{EventStream, Eventsource};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, ApiError};
use crate::chat::StreamEvent;

/// Channel capacity for in-flight updates.
const CHANNEL_CAPACITY: usize = 256;

/// One item on the stream channel: an event to merge, or a terminal signal.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamUpdate {
    Event(StreamEvent),
    /// The stream ended normally.
    Completed,
    /// The transport or the server reported a failure.
    Failed { message: String },
}

impl StreamUpdate {
    fn is_terminal(&self) -> bool {
        matches!(self, StreamUpdate::Completed | StreamUpdate::Failed { .. })
    }
}

/// Handle to an open stream: the receiving end plus its cancel token.
#[derive(Debug)]
pub struct StreamHandle {
    pub rx: mpsc::Receiver<StreamUpdate>,
    pub cancel: CancellationToken,
}

impl StreamHandle {
    pub fn into_parts(self) -> (mpsc::Receiver<StreamUpdate>, CancellationToken) {
        (self.rx, self.cancel)
    }
}

/// Opens the event stream for one agent turn.
///
/// Returns immediately; connecting and reading happen in a spawned task.
/// Failures (including connect failures) arrive as `StreamUpdate::Failed`.
pub fn open(client: &ApiClient, session_id: &str, text: &str) -> StreamHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();
    let request = client.stream_request(session_id, text);
    let token = cancel.clone();

    tokio::spawn(async move {
        match request {
            Ok(request) => run(request, tx, token).await,
            Err(err) => {
                let _ = tx
                    .send(StreamUpdate::Failed {
                        message: err.to_string(),
                    })
                    .await;
            }
        }
    });

    StreamHandle { rx, cancel }
}

async fn run(
    request: reqwest::RequestBuilder,
    tx: mpsc::Sender<StreamUpdate>,
    cancel: CancellationToken,
) {
    let connect = async {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StreamFailure::Status(format!("HTTP {status}: {body}")));
        }
        Ok(response)
    };

    let response = tokio::select! {
        () = cancel.cancelled() => return,
        response = connect => match response {
            Ok(response) => response,
            Err(failure) => {
                let _ = tx
                    .send(StreamUpdate::Failed {
                        message: failure.to_string(),
                    })
                    .await;
                return;
            }
        },
    };

    // Boxed for Unpin; the hyper body stream is not.
    let events = response.bytes_stream().boxed().eventsource();
    pump(events, &tx, &cancel).await;
}

enum StreamFailure {
    Transport(ApiError),
    Status(String),
}

impl From<reqwest::Error> for StreamFailure {
    fn from(err: reqwest::Error) -> Self {
        StreamFailure::Transport(err.into())
    }
}

impl std::fmt::Display for StreamFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamFailure::Transport(err) => write!(f, "{err}"),
            StreamFailure::Status(message) => write!(f, "{message}"),
        }
    }
}

/// Reads SSE events until a terminal update, end of stream, or cancellation.
///
/// Exposed at this granularity so tests can drive it with a mock byte stream.
async fn pump<S, E>(
    mut events: EventStream<S>,
    tx: &mpsc::Sender<StreamUpdate>,
    cancel: &CancellationToken,
) where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::error::Error,
{
    loop {
        let item = tokio::select! {
            () = cancel.cancelled() => return,
            item = events.next() => item,
        };

        let update = match item {
            None => StreamUpdate::Completed,
            Some(Ok(event)) => match parse_sse_event(&event.event, &event.data) {
                Ok(Some(update)) => update,
                Ok(None) => continue,
                Err(message) => StreamUpdate::Failed { message },
            },
            Some(Err(err)) => StreamUpdate::Failed {
                message: format!("stream error: {err}"),
            },
        };

        let terminal = update.is_terminal();
        if tx.send(update).await.is_err() {
            // Receiver dropped: the view stopped the stream.
            return;
        }
        if terminal {
            return;
        }
    }
}

#[derive(Debug, Deserialize)]
struct SseErrorPayload {
    message: String,
}

/// Parses one SSE event into a `StreamUpdate`. `None` means "nothing to
/// forward" (keep-alive pings).
fn parse_sse_event(event_type: &str, data: &str) -> Result<Option<StreamUpdate>, String> {
    match event_type {
        "ping" => Ok(None),
        // eventsource-stream defaults the type to "message" when absent.
        "message" => serde_json::from_str::<StreamEvent>(data)
            .map(|event| Some(StreamUpdate::Event(event)))
            .map_err(|err| format!("invalid stream event: {err}")),
        "done" => Ok(Some(StreamUpdate::Completed)),
        "error" => {
            let message = serde_json::from_str::<SseErrorPayload>(data)
                .map(|payload| payload.message)
                .unwrap_or_else(|_| data.to_string());
            Ok(Some(StreamUpdate::Failed { message }))
        }
        other => Err(format!("unknown SSE event type: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{EventPayload, MessageSource};

    /// SSE fixture simulating a short streamed reply.
    const SSE_REPLY: &str = "event: message\ndata: {\"id\":\"m1\",\"source\":\"ai_agent\",\"kind\":\"content\",\"fragment\":\"Hi\"}\n\nevent: ping\ndata: {}\n\nevent: message\ndata: {\"id\":\"m1\",\"source\":\"ai_agent\",\"kind\":\"content\",\"fragment\":\" there\"}\n\nevent: done\ndata: {}\n\n";

    const SSE_ERROR: &str = "event: message\ndata: {\"id\":\"m1\",\"source\":\"ai_agent\",\"kind\":\"content\",\"fragment\":\"partial\"}\n\nevent: error\ndata: {\"message\":\"agent runner crashed\"}\n\n";

    fn mock_byte_stream(data: &str) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Unpin {
        let chunks: Vec<_> = data
            .as_bytes()
            .chunks(17) // Simulate chunked delivery across event boundaries
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        futures_util::stream::iter(chunks)
    }

    async fn collect_updates(data: &str) -> Vec<StreamUpdate> {
        let (tx, mut rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        pump(mock_byte_stream(data).eventsource(), &tx, &cancel).await;
        drop(tx);

        let mut updates = Vec::new();
        while let Some(update) = rx.recv().await {
            updates.push(update);
        }
        updates
    }

    #[tokio::test]
    async fn reply_stream_yields_events_then_completed() {
        let updates = collect_updates(SSE_REPLY).await;
        assert_eq!(updates.len(), 3);

        assert!(matches!(
            &updates[0],
            StreamUpdate::Event(StreamEvent {
                id,
                source: MessageSource::AiAgent,
                payload: EventPayload::Content { .. },
            }) if id == "m1"
        ));
        assert_eq!(updates[2], StreamUpdate::Completed);
    }

    #[tokio::test]
    async fn error_event_is_terminal_and_keeps_prior_events() {
        let updates = collect_updates(SSE_ERROR).await;
        assert_eq!(updates.len(), 2);
        assert!(matches!(&updates[0], StreamUpdate::Event(_)));
        assert!(matches!(
            &updates[1],
            StreamUpdate::Failed { message } if message == "agent runner crashed"
        ));
    }

    #[tokio::test]
    async fn end_of_stream_without_done_still_completes() {
        let data = "event: message\ndata: {\"id\":\"m1\",\"source\":\"ai_agent\",\"kind\":\"content\",\"fragment\":\"x\"}\n\n";
        let updates = collect_updates(data).await;
        assert_eq!(updates.last(), Some(&StreamUpdate::Completed));
    }

    #[tokio::test]
    async fn cancellation_emits_nothing_further() {
        let (tx, mut rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        cancel.cancel();

        pump(mock_byte_stream(SSE_REPLY).eventsource(), &tx, &cancel).await;
        drop(tx);

        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn malformed_event_data_is_a_failure() {
        let result = parse_sse_event("message", "{not json");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_event_type_is_a_failure() {
        assert!(parse_sse_event("surprise", "{}").is_err());
    }
}
