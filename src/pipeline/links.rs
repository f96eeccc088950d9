// src/pipeline/links.rs

//! External link report.
//!
//! Fetches every external link used in the configured namespaces, probes
//! them for liveness and reports newly broken and newly resolved links per
//! failure class.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{CategorizedDiff, Config, LinkError, MaintenanceMap};
use crate::services::{HttpProbe, LinkChecker, LinkProbe, WebhookClient, WikiClient};
use crate::storage::SnapshotStore;
use crate::utils::{PageUrls, api_url};

use super::diff::compare_maps;
use super::notify::DiffFormat;
use super::report::{ReportProducer, run_report};

/// Snapshot key for this report.
const REPORT_KEY: &str = "link-errors";

/// Produces the current broken-link map.
struct LinkReport<'a, P: LinkProbe> {
    wiki: &'a WikiClient,
    checker: &'a LinkChecker<P>,
    namespaces: &'a [u32],
}

#[async_trait]
impl<P: LinkProbe> ReportProducer for LinkReport<'_, P> {
    type Item = LinkError;

    fn report_key(&self) -> &str {
        REPORT_KEY
    }

    /// A link error is the same logical item as long as the link matches;
    /// changes to the referencing pages alone are not reported.
    fn diff(
        &self,
        previous: &MaintenanceMap<LinkError>,
        current: &MaintenanceMap<LinkError>,
    ) -> CategorizedDiff<LinkError> {
        compare_maps(previous, current, |a, b| a.link == b.link)
    }

    async fn produce(&self) -> Result<MaintenanceMap<LinkError>> {
        let usage = self.wiki.external_link_usage(self.namespaces).await?;
        Ok(self.checker.check_all(&usage).await)
    }
}

/// Formats link errors for the notification channel.
struct LinkErrorFormat {
    pages: PageUrls,
}

impl DiffFormat<LinkError> for LinkErrorFormat {
    fn added_title(&self, category: &str) -> String {
        format!("New {category} link errors")
    }

    fn removed_title(&self, category: &str) -> String {
        format!("Resolved {category} link errors")
    }

    fn format_item(&self, item: &LinkError) -> String {
        let pages = item
            .pages
            .iter()
            .map(|page| self.pages.markdown_link(page))
            .collect::<Vec<_>>()
            .join(", ");
        format!("- <{}>: {}", item.link, pages)
    }
}

/// Run the external link report.
pub async fn run_links(
    config: &Config,
    client: &Client,
    store: &SnapshotStore,
    webhook: &WebhookClient,
) -> Result<()> {
    let wiki = WikiClient::new(api_url(&config.wiki), client.clone());
    let checker = LinkChecker::new(HttpProbe::new(client.clone()), &config.checker);

    let producer = LinkReport {
        wiki: &wiki,
        checker: &checker,
        namespaces: &config.wiki.namespaces,
    };
    let format = LinkErrorFormat {
        pages: PageUrls::new(&config.wiki)?,
    };

    run_report(&producer, &format, store, webhook).await
}
