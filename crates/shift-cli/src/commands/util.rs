//! Shared helpers for remote-backed commands.

use anyhow::{Context, Result};

use shift_api::Client;

use crate::Config;

/// Builds the backend client. Remote commands require a configured URL.
pub fn api_client(config: &Config) -> Result<Client> {
    let url = config.api_url.as_deref().ok_or_else(|| {
        anyhow::anyhow!("no backend configured (set SHIFT_API_URL or api_url in config.toml)")
    })?;
    Client::new(url, config.api_token.clone()).context("failed to create backend client")
}

/// Builds a runtime for bridging into async client calls.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")
}
