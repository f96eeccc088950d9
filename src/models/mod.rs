// src/models/mod.rs

//! Domain models for the maintenance runner.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod links;
mod report;

// Re-export all public types
pub use config::{CheckerConfig, Config, StorageConfig, WebhookConfig, WikiConfig};
pub use links::{ExternalLinksMap, LinkError, LinkFailure};
pub use report::{CategorizedDiff, Diff, MaintenanceMap};
