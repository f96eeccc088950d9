// src/services/wiki.rs

//! MediaWiki Action API client.
//!
//! Implements the `continue` continuation protocol over `action=query`
//! lists. Each operation pages through the full result set before
//! returning, so callers always diff against complete data.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{ExternalLinksMap, MaintenanceMap};

/// Category prefix for lint error reports.
pub const LINT_ERRORS: &str = "LintErrors";

/// One page of an `action=query` response.
#[derive(Debug, Deserialize)]
struct QueryResponse<Q> {
    #[serde(rename = "continue", default)]
    continuation: Option<HashMap<String, Value>>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
    query: Option<Q>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    info: String,
}

/// Convert a continuation value back into a request parameter.
///
/// The API returns continuation tokens as strings or numbers; both go back
/// on the wire as plain strings.
fn continuation_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Thin client for one wiki's Action API endpoint.
pub struct WikiClient {
    client: Client,
    api_url: String,
}

impl WikiClient {
    pub fn new(api_url: String, client: Client) -> Self {
        Self { client, api_url }
    }

    /// Run an `action=query` request to completion, following `continue`
    /// markers, and collect every page's `query` member.
    ///
    /// A page without a `query` member is skipped, not an error; some lists
    /// return a bare continuation marker as their final page.
    async fn continued_query<Q: DeserializeOwned>(
        &self,
        params: &[(&str, String)],
    ) -> Result<Vec<Q>> {
        let mut pages = Vec::new();
        let mut continuation: Vec<(String, String)> = Vec::new();

        loop {
            let mut query: Vec<(&str, &str)> = vec![
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
            ];
            query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));
            query.extend(continuation.iter().map(|(k, v)| (k.as_str(), v.as_str())));

            let response = self
                .client
                .get(&self.api_url)
                .query(&query)
                .send()
                .await?
                .error_for_status()?;
            let page: QueryResponse<Q> = response.json().await?;

            if let Some(error) = page.error {
                return Err(AppError::api(error.code, error.info));
            }
            if let Some(data) = page.query {
                pages.push(data);
            }

            match page.continuation {
                Some(markers) => {
                    continuation = markers
                        .iter()
                        .map(|(k, v)| (k.clone(), continuation_param(v)))
                        .collect();
                }
                None => break,
            }
        }
        Ok(pages)
    }

    /// Fetch external link usage for the given namespaces.
    ///
    /// Returns a mapping from link URL to the titles of the pages using it,
    /// verbatim as reported by the wiki; candidate filtering is the
    /// checker's concern.
    pub async fn external_link_usage(&self, namespaces: &[u32]) -> Result<ExternalLinksMap> {
        #[derive(Debug, Deserialize)]
        struct ExtUrlUsageQuery {
            #[serde(default)]
            exturlusage: Vec<ExtUrlUsageEntry>,
        }
        #[derive(Debug, Deserialize)]
        struct ExtUrlUsageEntry {
            title: String,
            url: String,
        }

        let namespaces = namespaces
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("|");
        let params = [
            ("list", "exturlusage".to_string()),
            ("eulimit", "max".to_string()),
            ("euprop", "title|url".to_string()),
            ("eunamespace", namespaces),
        ];

        let mut usage = ExternalLinksMap::new();
        for page in self.continued_query::<ExtUrlUsageQuery>(&params).await? {
            for entry in page.exturlusage {
                usage.entry(entry.url).or_default().push(entry.title);
            }
        }
        Ok(usage)
    }

    /// Fetch the page titles listed on one special query page.
    pub async fn query_page(&self, name: &str) -> Result<Vec<String>> {
        #[derive(Debug, Deserialize)]
        struct QueryPageQuery {
            #[serde(default)]
            querypage: QueryPageBody,
        }
        #[derive(Debug, Default, Deserialize)]
        struct QueryPageBody {
            #[serde(default)]
            results: Vec<TitleEntry>,
        }
        #[derive(Debug, Deserialize)]
        struct TitleEntry {
            title: String,
        }

        let params = [
            ("list", "querypage".to_string()),
            ("qppage", name.to_string()),
            ("qplimit", "max".to_string()),
        ];

        let titles = self
            .continued_query::<QueryPageQuery>(&params)
            .await?
            .into_iter()
            .flat_map(|page| page.querypage.results)
            .map(|entry| entry.title)
            .collect();
        Ok(titles)
    }

    /// Fetch all lint errors, grouped under `LintErrors/{category}`.
    pub async fn lint_errors(&self) -> Result<MaintenanceMap<String>> {
        #[derive(Debug, Deserialize)]
        struct LintQuery {
            #[serde(default)]
            linterrors: Vec<LintEntry>,
        }
        #[derive(Debug, Deserialize)]
        struct LintEntry {
            title: String,
            category: String,
        }

        let params = [
            ("list", "linterrors".to_string()),
            ("lntlimit", "max".to_string()),
        ];

        let mut result = MaintenanceMap::new();
        for page in self.continued_query::<LintQuery>(&params).await? {
            for entry in page.linterrors {
                result
                    .entry(format!("{LINT_ERRORS}/{}", entry.category))
                    .or_default()
                    .push(entry.title);
            }
        }
        Ok(result)
    }
}
