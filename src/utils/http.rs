// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::CheckerConfig;

/// Create a configured asynchronous HTTP client.
///
/// One client is shared by the wiki API, the link checker and the webhook
/// so connection pools are reused across a run.
pub fn create_client(config: &CheckerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}
