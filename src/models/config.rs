// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target wiki identity and report selection
    pub wiki: WikiConfig,

    /// Link probing behavior settings
    #[serde(default)]
    pub checker: CheckerConfig,

    /// Discord webhook credentials
    pub webhook: WebhookConfig,

    /// Snapshot storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::config(format!(
                "Cannot read config file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.wiki.id.trim().is_empty() {
            return Err(AppError::validation("wiki.id is empty"));
        }
        if self.wiki.id.contains(['/', '\\']) {
            return Err(AppError::validation(
                "wiki.id must not contain path separators",
            ));
        }
        if !self.wiki.base_url.starts_with("http://") && !self.wiki.base_url.starts_with("https://")
        {
            return Err(AppError::validation("wiki.base_url must be http(s)"));
        }
        if !self.wiki.article_path.starts_with('/') {
            return Err(AppError::validation("wiki.article_path must start with /"));
        }
        if !self.wiki.script_path.starts_with('/') {
            return Err(AppError::validation("wiki.script_path must start with /"));
        }
        if self.checker.user_agent.trim().is_empty() {
            return Err(AppError::validation("checker.user_agent is empty"));
        }
        if self.checker.timeout_secs == 0 {
            return Err(AppError::validation("checker.timeout_secs must be > 0"));
        }
        if self.checker.max_concurrent == 0 {
            return Err(AppError::validation("checker.max_concurrent must be > 0"));
        }
        if self.webhook.id.is_empty() || !self.webhook.id.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::validation("webhook.id must be numeric"));
        }
        if self.webhook.token.trim().is_empty() {
            return Err(AppError::validation("webhook.token is empty"));
        }
        Ok(())
    }
}

/// Target wiki identity and report selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Identifier namespacing this wiki's snapshots on disk
    pub id: String,

    /// Wiki origin, e.g. "https://wiki.example.com"
    pub base_url: String,

    /// Path prefix for article URLs
    #[serde(default = "defaults::article_path")]
    pub article_path: String,

    /// Path prefix for the Action API endpoint
    #[serde(default = "defaults::script_path")]
    pub script_path: String,

    /// Namespaces whose external links are checked
    #[serde(default = "defaults::namespaces")]
    pub namespaces: Vec<u32>,

    /// Special query pages to report on; the literal name "LintErrors"
    /// selects the lint-error report instead of a query page
    #[serde(default)]
    pub querypages: Vec<String>,
}

/// Link probing behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent probe requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Hosts known to block automated probing, skipped entirely
    #[serde(default = "defaults::denied_hosts")]
    pub denied_hosts: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            denied_hosts: defaults::denied_hosts(),
        }
    }
}

/// Discord webhook credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Numeric webhook id
    pub id: String,

    /// Webhook token
    pub token: String,
}

/// Snapshot storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding per-wiki snapshot files
    #[serde(default = "defaults::data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
        }
    }
}

mod defaults {
    // Wiki defaults
    pub fn article_path() -> String {
        "/wiki".into()
    }
    pub fn script_path() -> String {
        "/w".into()
    }
    pub fn namespaces() -> Vec<u32> {
        vec![0]
    }

    // Checker defaults
    pub fn user_agent() -> String {
        "wikimaint/0.1 (MediaWiki maintenance reports)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        8
    }
    pub fn denied_hosts() -> Vec<String> {
        vec!["mega.nz".into()]
    }

    // Storage defaults
    pub fn data_dir() -> String {
        "data".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        toml::from_str(
            r#"
            [wiki]
            id = "testwiki"
            base_url = "https://wiki.example.com"

            [webhook]
            id = "123456789"
            token = "secret-token"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn parse_applies_section_defaults() {
        let config = test_config();
        assert_eq!(config.wiki.article_path, "/wiki");
        assert_eq!(config.wiki.script_path, "/w");
        assert_eq!(config.wiki.namespaces, vec![0]);
        assert_eq!(config.checker.timeout_secs, 30);
        assert_eq!(config.checker.denied_hosts, vec!["mega.nz".to_string()]);
        assert_eq!(config.storage.data_dir, "data");
    }

    #[test]
    fn validate_accepts_minimal_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut config = test_config();
        config.wiki.base_url = "ftp://wiki.example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_numeric_webhook_id() {
        let mut config = test_config();
        config.webhook.id = "abc123".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_wiki_id_with_path_separator() {
        let mut config = test_config();
        config.wiki.id = "../escape".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = test_config();
        config.checker.max_concurrent = 0;
        assert!(config.validate().is_err());
    }
}
