// src/services/checker.rs

//! Link reachability checker.
//!
//! Probes external links with a cheap HEAD request and classifies the
//! failures into a maintenance map keyed by failure class. Links whose
//! servers reject HEAD outright (405) get a second chance with a full GET
//! before anything is recorded, since many servers serve GET normally
//! while refusing HEAD.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{Client, Method};
use url::Url;

use crate::models::{CheckerConfig, ExternalLinksMap, LinkError, LinkFailure, MaintenanceMap};
use crate::utils::is_private_host;

/// HTTP status class that triggers the GET retry.
const METHOD_NOT_ALLOWED: &str = "405";

/// Probes a single URL. `None` means the link is reachable.
#[async_trait]
pub trait LinkProbe: Send + Sync {
    async fn probe(&self, link: &str, method: Method) -> Option<LinkFailure>;
}

/// Production probe backed by reqwest.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkProbe for HttpProbe {
    async fn probe(&self, link: &str, method: Method) -> Option<LinkFailure> {
        match self.client.request(method, link).send().await {
            Ok(response) if response.status().is_success() => None,
            Ok(response) => {
                let status = response.status();
                Some(LinkFailure::Http {
                    status: status.as_u16(),
                    status_text: status.canonical_reason().unwrap_or("").to_string(),
                })
            }
            Err(error) => Some(LinkFailure::Fetch {
                code: fetch_code(&error),
            }),
        }
    }
}

/// Map a transport-level failure to a stable classification code.
///
/// The code is the diff engine's category identity, so identical failure
/// modes must yield identical strings across runs.
fn fetch_code(error: &reqwest::Error) -> String {
    let code = if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_redirect() {
        "redirect"
    } else if error.is_body() || error.is_decode() {
        "body"
    } else if error.is_request() {
        "request"
    } else {
        "unknown"
    };
    code.to_string()
}

/// Group link errors into a maintenance map by failure class.
pub fn group_errors(errors: Vec<LinkError>) -> MaintenanceMap<LinkError> {
    let mut grouped = MaintenanceMap::new();
    for error in errors {
        grouped
            .entry(error.failure.class_key())
            .or_default()
            .push(error);
    }
    grouped
}

/// Service probing external links for liveness.
pub struct LinkChecker<P: LinkProbe> {
    probe: P,
    max_concurrent: usize,
    denied_hosts: Vec<String>,
}

impl<P: LinkProbe> LinkChecker<P> {
    pub fn new(probe: P, config: &CheckerConfig) -> Self {
        Self {
            probe,
            max_concurrent: config.max_concurrent,
            denied_hosts: config.denied_hosts.clone(),
        }
    }

    /// Whether a candidate link is excluded from probing entirely.
    ///
    /// Drops non-HTTP(S) schemes, loopback and private-range hosts, the
    /// configured denylist, and anything that fails to parse as a URL.
    pub fn should_skip(&self, link: &str) -> bool {
        let Ok(url) = Url::parse(link) else {
            return true;
        };
        if !matches!(url.scheme(), "http" | "https") {
            return true;
        }
        let Some(host) = url.host_str() else {
            return true;
        };
        is_private_host(host)
            || self
                .denied_hosts
                .iter()
                .any(|denied| denied.eq_ignore_ascii_case(host))
    }

    /// Probe every eligible link and return the final errors grouped by
    /// failure class.
    pub async fn check_all(&self, links: &ExternalLinksMap) -> MaintenanceMap<LinkError> {
        let candidates: Vec<(String, Vec<String>)> = links
            .iter()
            .filter(|(link, _)| !self.should_skip(link))
            .map(|(link, pages)| (link.clone(), pages.clone()))
            .collect();

        log::info!(
            "Probing {} of {} external links",
            candidates.len(),
            links.len()
        );

        let errors = self.probe_all(candidates, Method::HEAD).await;
        let mut grouped = group_errors(errors);
        self.retry_method_not_allowed(&mut grouped).await;
        grouped
    }

    /// Probe candidates concurrently, preserving input order so grouping is
    /// deterministic given identical responses.
    async fn probe_all(
        &self,
        candidates: Vec<(String, Vec<String>)>,
        method: Method,
    ) -> Vec<LinkError> {
        let concurrency = self.max_concurrent.max(1);
        let results: Vec<Option<LinkError>> = stream::iter(candidates)
            .map(|(link, pages)| {
                let method = method.clone();
                async move {
                    self.probe
                        .probe(&link, method)
                        .await
                        .map(|failure| LinkError {
                            link,
                            pages,
                            failure,
                        })
                }
            })
            .buffered(concurrency)
            .collect()
            .await;
        results.into_iter().flatten().collect()
    }

    /// Re-probe every 405 with a full GET; only failures on retry are kept,
    /// classified by whatever the GET produced.
    async fn retry_method_not_allowed(&self, grouped: &mut MaintenanceMap<LinkError>) {
        let Some(retries) = grouped.remove(METHOD_NOT_ALLOWED) else {
            return;
        };
        log::info!("Retrying {} method-not-allowed links with GET", retries.len());

        for LinkError { link, pages, .. } in retries {
            if let Some(failure) = self.probe.probe(&link, Method::GET).await {
                grouped
                    .entry(failure.class_key())
                    .or_default()
                    .push(LinkError {
                        link,
                        pages,
                        failure,
                    });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Probe answering from a fixed script; unlisted (link, method) pairs
    /// are reachable.
    struct ScriptedProbe {
        responses: HashMap<(String, String), LinkFailure>,
    }

    impl ScriptedProbe {
        fn new(entries: &[(&str, &str, LinkFailure)]) -> Self {
            Self {
                responses: entries
                    .iter()
                    .map(|(link, method, failure)| {
                        ((link.to_string(), method.to_string()), failure.clone())
                    })
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl LinkProbe for ScriptedProbe {
        async fn probe(&self, link: &str, method: Method) -> Option<LinkFailure> {
            self.responses
                .get(&(link.to_string(), method.as_str().to_string()))
                .cloned()
        }
    }

    fn http(status: u16) -> LinkFailure {
        LinkFailure::Http {
            status,
            status_text: String::new(),
        }
    }

    fn checker(probe: ScriptedProbe) -> LinkChecker<ScriptedProbe> {
        LinkChecker::new(probe, &CheckerConfig::default())
    }

    fn links(entries: &[&str]) -> ExternalLinksMap {
        entries
            .iter()
            .map(|link| (link.to_string(), vec!["Some Page".to_string()]))
            .collect()
    }

    #[test]
    fn skips_non_http_schemes() {
        let checker = checker(ScriptedProbe::new(&[]));
        assert!(checker.should_skip("ftp://example.com/file"));
        assert!(checker.should_skip("mailto:someone@example.com"));
        assert!(!checker.should_skip("https://example.com"));
        assert!(!checker.should_skip("http://example.com"));
    }

    #[test]
    fn skips_private_and_denied_hosts() {
        let checker = checker(ScriptedProbe::new(&[]));
        assert!(checker.should_skip("http://192.168.1.5/router"));
        assert!(checker.should_skip("http://10.0.0.1/"));
        assert!(checker.should_skip("http://127.0.0.1:8080/"));
        assert!(checker.should_skip("http://localhost/dev"));
        assert!(checker.should_skip("https://mega.nz/file/abc"));
        assert!(checker.should_skip("not a url"));
        assert!(!checker.should_skip("https://wiki.example.com/page"));
    }

    #[tokio::test]
    async fn private_hosts_never_reach_output() {
        // The probe reports everything it sees as broken; the private link
        // must not even be probed.
        let checker = checker(ScriptedProbe::new(&[
            ("http://192.168.1.5/", "HEAD", http(500)),
            ("https://ok.example.com/", "HEAD", http(500)),
        ]));

        let errors = checker
            .check_all(&links(&["http://192.168.1.5/", "https://ok.example.com/"]))
            .await;

        let all: Vec<&LinkError> = errors.values().flatten().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].link, "https://ok.example.com/");
    }

    #[tokio::test]
    async fn reachable_links_produce_no_errors() {
        let checker = checker(ScriptedProbe::new(&[]));
        let errors = checker.check_all(&links(&["https://fine.example.com/"])).await;
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn errors_group_by_class_key() {
        let checker = checker(ScriptedProbe::new(&[
            ("https://a.example/", "HEAD", http(404)),
            ("https://b.example/", "HEAD", http(404)),
            (
                "https://c.example/",
                "HEAD",
                LinkFailure::Fetch {
                    code: "timeout".into(),
                },
            ),
        ]));

        let errors = checker
            .check_all(&links(&[
                "https://a.example/",
                "https://b.example/",
                "https://c.example/",
            ]))
            .await;

        assert_eq!(errors["404"].len(), 2);
        assert_eq!(errors["timeout"].len(), 1);
        assert!(!errors.contains_key("405"));
    }

    #[tokio::test]
    async fn retry_drops_links_that_allow_get() {
        // 405 on HEAD, reachable via GET: not an error.
        let checker = checker(ScriptedProbe::new(&[(
            "https://headless.example/",
            "HEAD",
            http(405),
        )]));

        let errors = checker.check_all(&links(&["https://headless.example/"])).await;
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn retry_records_get_failure_class() {
        // 405 on HEAD, 500 on GET: exactly one error, classified 500.
        let checker = checker(ScriptedProbe::new(&[
            ("https://broken.example/", "HEAD", http(405)),
            ("https://broken.example/", "GET", http(500)),
        ]));

        let errors = checker.check_all(&links(&["https://broken.example/"])).await;
        assert!(!errors.contains_key("405"));
        assert_eq!(errors["500"].len(), 1);
        assert_eq!(errors["500"][0].link, "https://broken.example/");
        assert_eq!(errors["500"][0].pages, vec!["Some Page".to_string()]);
    }

    #[tokio::test]
    async fn retry_keeps_transport_failures_on_get() {
        let checker = checker(ScriptedProbe::new(&[
            ("https://flaky.example/", "HEAD", http(405)),
            (
                "https://flaky.example/",
                "GET",
                LinkFailure::Fetch {
                    code: "connect".into(),
                },
            ),
        ]));

        let errors = checker.check_all(&links(&["https://flaky.example/"])).await;
        assert_eq!(errors["connect"].len(), 1);
    }

    #[test]
    fn group_errors_preserves_insertion_order_within_class() {
        let errors = vec![
            LinkError {
                link: "https://first.example/".into(),
                pages: vec![],
                failure: http(404),
            },
            LinkError {
                link: "https://second.example/".into(),
                pages: vec![],
                failure: http(404),
            },
        ];

        let grouped = group_errors(errors);
        assert_eq!(grouped["404"][0].link, "https://first.example/");
        assert_eq!(grouped["404"][1].link, "https://second.example/");
    }
}
