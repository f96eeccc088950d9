// src/services/mod.rs

//! Network-facing services: the wiki query API, the link prober and the
//! notification webhook.

pub mod checker;
pub mod webhook;
pub mod wiki;

pub use checker::{HttpProbe, LinkChecker, LinkProbe};
pub use webhook::{Embed, EmbedBatch, WebhookClient};
pub use wiki::WikiClient;
