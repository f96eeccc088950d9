// src/pipeline/querypages.rs

//! Query-page and lint-error report.
//!
//! Fetches the configured special query pages (plus lint errors when
//! enabled) and reports newly listed and newly resolved pages per query
//! page.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{CategorizedDiff, Config, MaintenanceMap};
use crate::services::{WebhookClient, WikiClient};
use crate::services::wiki::LINT_ERRORS;
use crate::storage::SnapshotStore;
use crate::utils::{PageUrls, api_url};

use super::diff::compare_string_maps;
use super::notify::DiffFormat;
use super::report::{ReportProducer, run_report};

/// Snapshot key for this report.
const REPORT_KEY: &str = "querypages";

/// Produces the current query-page result map.
struct QueryPageReport<'a> {
    wiki: &'a WikiClient,
    querypages: &'a [String],
}

#[async_trait]
impl ReportProducer for QueryPageReport<'_> {
    type Item = String;

    fn report_key(&self) -> &str {
        REPORT_KEY
    }

    fn diff(
        &self,
        previous: &MaintenanceMap<String>,
        current: &MaintenanceMap<String>,
    ) -> CategorizedDiff<String> {
        compare_string_maps(previous, current)
    }

    async fn produce(&self) -> Result<MaintenanceMap<String>> {
        let mut result = MaintenanceMap::new();
        for name in self.querypages {
            if name == LINT_ERRORS {
                continue;
            }
            // Empty results still claim their category so the snapshot
            // records that the query page was checked.
            result.insert(name.clone(), self.wiki.query_page(name).await?);
        }

        if self.querypages.iter().any(|name| name == LINT_ERRORS) {
            result.extend(self.wiki.lint_errors().await?);
        }
        Ok(result)
    }
}

/// Formats query-page titles for the notification channel.
struct QueryPageFormat {
    pages: PageUrls,
}

impl DiffFormat<String> for QueryPageFormat {
    fn added_title(&self, category: &str) -> String {
        format!("New reports on {category}")
    }

    fn removed_title(&self, category: &str) -> String {
        format!("Resolved reports on {category}")
    }

    fn format_item(&self, item: &String) -> String {
        format!("- {}", self.pages.markdown_link(item))
    }
}

/// Run the query-page report.
pub async fn run_querypages(
    config: &Config,
    client: &Client,
    store: &SnapshotStore,
    webhook: &WebhookClient,
) -> Result<()> {
    let wiki = WikiClient::new(api_url(&config.wiki), client.clone());

    let producer = QueryPageReport {
        wiki: &wiki,
        querypages: &config.wiki.querypages,
    };
    let format = QueryPageFormat {
        pages: PageUrls::new(&config.wiki)?,
    };

    run_report(&producer, &format, store, webhook).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WikiConfig;

    #[test]
    fn items_render_as_markdown_links() {
        let wiki = WikiConfig {
            id: "testwiki".into(),
            base_url: "https://wiki.example.com".into(),
            article_path: "/wiki".into(),
            script_path: "/w".into(),
            namespaces: vec![0],
            querypages: vec![],
        };
        let format = QueryPageFormat {
            pages: PageUrls::new(&wiki).unwrap(),
        };

        assert_eq!(
            format.format_item(&"Broken Page".to_string()),
            "- [Broken Page](<https://wiki.example.com/wiki/Broken%20Page>)"
        );
        assert_eq!(
            format.added_title("BrokenRedirects"),
            "New reports on BrokenRedirects"
        );
        assert_eq!(
            format.removed_title("LintErrors/obsolete-tag"),
            "Resolved reports on LintErrors/obsolete-tag"
        );
    }
}
