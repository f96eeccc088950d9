// src/services/webhook.rs

//! Discord webhook delivery.
//!
//! Posts embed batches to a webhook endpoint, one atomic post per batch,
//! strictly in order. Any non-success response aborts the remaining
//! batches; partial delivery without the full picture would mislead an
//! operator, so there is no retry here.

use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::WebhookConfig;

/// A single renderable notification unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub description: String,
}

impl Embed {
    /// Characters this embed contributes to a batch's size budget.
    pub fn char_count(&self) -> usize {
        self.title.chars().count() + self.description.chars().count()
    }
}

/// One webhook post worth of embeds.
pub type EmbedBatch = Vec<Embed>;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    embeds: &'a [Embed],
}

/// Client for one Discord webhook.
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig, client: Client) -> Self {
        Self {
            client,
            url: format!(
                "https://discord.com/api/webhooks/{}/{}",
                config.id, config.token
            ),
        }
    }

    /// Deliver batches sequentially, in render order, failing fast.
    pub async fn deliver(&self, batches: Vec<EmbedBatch>) -> Result<()> {
        let total = batches.len();
        for (index, batch) in batches.iter().enumerate() {
            self.execute(batch).await?;
            log::debug!("Delivered batch {}/{}", index + 1, total);
        }
        Ok(())
    }

    /// Post one batch as a single webhook message.
    async fn execute(&self, embeds: &[Embed]) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { embeds })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::webhook(status.as_u16(), message));
        }
        Ok(())
    }
}
