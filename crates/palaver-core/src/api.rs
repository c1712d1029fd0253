//! REST client for the agent server.
//!
//! Thin reqwest wrapper over the backend surface: agent catalog, session
//! listing/creation, and historical event replay. List endpoints use a
//! `{ "data": [...] }` envelope.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::chat::StreamEvent;
use crate::sessions::Session;

/// An agent catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
}

/// Parameters for creating a session.
///
/// The id is client-generated so the session view can exist before the
/// backend knows about it; the title is derived from the first user message.
#[derive(Debug, Clone, Serialize)]
pub struct SessionCreationParams {
    pub id: String,
    pub title: String,
    pub agent_id: String,
}

/// Error categories for `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// HTTP status error (4xx, 5xx)
    HttpStatus,
    /// Connection/request timeout
    Timeout,
    /// Response parsing failed
    Parse,
    /// Transport-level failure (DNS, refused connection, ...)
    Transport,
}

/// Structured error from the API client.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ApiErrorKind::Timeout
        } else if err.is_decode() {
            ApiErrorKind::Parse
        } else if err.is_status() {
            ApiErrorKind::HttpStatus
        } else {
            ApiErrorKind::Transport
        };
        ApiError::new(kind, err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    data: Vec<T>,
}

/// REST client bound to one server base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    request_timeout: Duration,
}

impl ApiClient {
    /// Builds a client for the given base URL.
    ///
    /// The timeout applies per plain REST request; the event stream sets its
    /// own (none) because it is expected to stay open between events.
    pub fn new(base_url: &str, request_timeout: Duration) -> ApiResult<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|err| ApiError::new(ApiErrorKind::Parse, format!("invalid server URL: {err}")))?;
        // Url::join treats a path without a trailing slash as a file.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Transport, err.to_string()))?;

        Ok(Self {
            http,
            base_url,
            request_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/agents`
    pub async fn list_agents(&self) -> ApiResult<Vec<Agent>> {
        self.get_json::<ListEnvelope<Agent>>("api/agents")
            .await
            .map(|envelope| envelope.data)
    }

    /// `GET /api/agents/{agent_id}`
    pub async fn get_agent(&self, agent_id: &str) -> ApiResult<Agent> {
        self.get_json(&format!("api/agents/{agent_id}")).await
    }

    /// `GET /api/sessions`
    pub async fn list_sessions(&self) -> ApiResult<Vec<Session>> {
        self.get_json::<ListEnvelope<Session>>("api/sessions")
            .await
            .map(|envelope| envelope.data)
    }

    /// `POST /api/sessions`
    pub async fn create_session(&self, params: &SessionCreationParams) -> ApiResult<Session> {
        let url = self.endpoint("api/sessions")?;
        let response = self
            .http
            .post(url)
            .timeout(self.request_timeout)
            .json(params)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// `GET /api/sessions/{session_id}`
    pub async fn get_session(&self, session_id: &str) -> ApiResult<Session> {
        self.get_json(&format!("api/sessions/{session_id}")).await
    }

    /// `GET /api/sessions/{session_id}/events`: historical replay, used to
    /// seed the message store before any live streaming begins.
    pub async fn session_events(&self, session_id: &str) -> ApiResult<Vec<StreamEvent>> {
        self.get_json::<ListEnvelope<StreamEvent>>(&format!("api/sessions/{session_id}/events"))
            .await
            .map(|envelope| envelope.data)
    }

    /// Builds the streaming request for `stream::open`. No request timeout:
    /// the transport may suspend indefinitely between events.
    pub(crate) fn stream_request(
        &self,
        session_id: &str,
        text: &str,
    ) -> ApiResult<reqwest::RequestBuilder> {
        let url = self.endpoint(&format!("api/sessions/{session_id}/events/stream"))?;
        Ok(self
            .http
            .post(url)
            .json(&serde_json::json!({ "content": text })))
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(ApiErrorKind::Parse, format!("invalid endpoint: {err}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::new(
            ApiErrorKind::HttpStatus,
            format!("HTTP {status}: {body}"),
        ))
    }
}
