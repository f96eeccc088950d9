// src/utils/url.rs

//! URL construction and host classification helpers.

use std::net::IpAddr;

use url::Url;

use crate::error::{AppError, Result};
use crate::models::WikiConfig;

/// Build the Action API endpoint URL for a wiki.
pub fn api_url(wiki: &WikiConfig) -> String {
    format!(
        "{}{}/api.php",
        wiki.base_url.trim_end_matches('/'),
        wiki.script_path
    )
}

/// Check whether a host must never be probed.
///
/// Covers `localhost`, loopback (127.0.0.0/8, ::1) and the RFC1918 ranges
/// 10.0.0.0/8, 172.16.0.0/12 and 192.168.0.0/16. Hostnames that are not
/// IP literals are not private.
pub fn is_private_host(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => ip.is_loopback() || ip.is_private(),
        Ok(IpAddr::V6(ip)) => ip.is_loopback(),
        Err(_) => false,
    }
}

/// Builds fully-qualified, percent-encoded page URLs for a wiki.
#[derive(Debug, Clone)]
pub struct PageUrls {
    base: Url,
    article_path: String,
}

impl PageUrls {
    pub fn new(wiki: &WikiConfig) -> Result<Self> {
        let base = Url::parse(&wiki.base_url)?;
        if base.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "wiki.base_url cannot hold a path: {}",
                wiki.base_url
            )));
        }
        Ok(Self {
            base,
            article_path: wiki.article_path.clone(),
        })
    }

    /// The canonical URL of a wiki page, title percent-encoded.
    pub fn page(&self, title: &str) -> String {
        let mut url = self.base.clone();
        {
            // new() rejects cannot-be-a-base URLs, so segments are available
            let mut segments = match url.path_segments_mut() {
                Ok(segments) => segments,
                Err(()) => return format!("{}{}/{}", self.base, self.article_path, title),
            };
            segments.pop_if_empty();
            for part in self.article_path.split('/').filter(|p| !p.is_empty()) {
                segments.push(part);
            }
            segments.push(title);
        }
        url.into()
    }

    /// A Markdown link to a wiki page, URL wrapped in `<>` to suppress
    /// the chat client's link preview.
    pub fn markdown_link(&self, title: &str) -> String {
        format!("[{}](<{}>)", title, self.page(title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wiki() -> WikiConfig {
        WikiConfig {
            id: "testwiki".into(),
            base_url: "https://wiki.example.com".into(),
            article_path: "/wiki".into(),
            script_path: "/w".into(),
            namespaces: vec![0],
            querypages: vec![],
        }
    }

    #[test]
    fn test_api_url() {
        assert_eq!(api_url(&wiki()), "https://wiki.example.com/w/api.php");

        let mut trailing = wiki();
        trailing.base_url = "https://wiki.example.com/".into();
        assert_eq!(api_url(&trailing), "https://wiki.example.com/w/api.php");
    }

    #[test]
    fn test_page_url_plain() {
        let pages = PageUrls::new(&wiki()).unwrap();
        assert_eq!(
            pages.page("Main_Page"),
            "https://wiki.example.com/wiki/Main_Page"
        );
    }

    #[test]
    fn test_page_url_encodes_title() {
        let pages = PageUrls::new(&wiki()).unwrap();
        assert_eq!(
            pages.page("C# (programming)"),
            "https://wiki.example.com/wiki/C%23%20(programming)"
        );
    }

    #[test]
    fn test_markdown_link() {
        let pages = PageUrls::new(&wiki()).unwrap();
        assert_eq!(
            pages.markdown_link("Sandbox"),
            "[Sandbox](<https://wiki.example.com/wiki/Sandbox>)"
        );
    }

    #[test]
    fn test_private_hosts() {
        assert!(is_private_host("localhost"));
        assert!(is_private_host("127.0.0.1"));
        assert!(is_private_host("10.1.2.3"));
        assert!(is_private_host("172.16.0.1"));
        assert!(is_private_host("172.31.255.255"));
        assert!(is_private_host("192.168.1.5"));
        assert!(is_private_host("::1"));
    }

    #[test]
    fn test_public_hosts() {
        assert!(!is_private_host("wiki.example.com"));
        assert!(!is_private_host("8.8.8.8"));
        assert!(!is_private_host("172.15.0.1"));
        assert!(!is_private_host("172.32.0.1"));
        assert!(!is_private_host("11.0.0.1"));
    }
}
