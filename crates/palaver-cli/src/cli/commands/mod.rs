//! Command handlers.

pub mod agents;
pub mod sessions;

use std::time::Duration;

use anyhow::{Context, Result};
use palaver_core::api::ApiClient;
use palaver_core::config::Config;

/// Builds the API client from config.
pub fn client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(
        &config.server_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("invalid server configuration")
}
