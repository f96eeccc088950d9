// src/error.rs

//! Unified error handling for the maintenance runner.

use std::fmt;

use thiserror::Error;

/// Result type alias for maintenance operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wiki API reported an error
    #[error("Wiki API error '{code}': {info}")]
    Api { code: String, info: String },

    /// Webhook delivery failed
    #[error("Webhook delivery failed with status {status}: {message}")]
    Webhook { status: u16, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a wiki API error.
    pub fn api(code: impl Into<String>, info: impl fmt::Display) -> Self {
        Self::Api {
            code: code.into(),
            info: info.to_string(),
        }
    }

    /// Create a webhook delivery error.
    pub fn webhook(status: u16, message: impl Into<String>) -> Self {
        Self::Webhook {
            status,
            message: message.into(),
        }
    }
}
