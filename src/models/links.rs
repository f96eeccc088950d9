// src/models/links.rs

//! Link error models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from external link URL to the wiki pages referencing it.
pub type ExternalLinksMap = BTreeMap<String, Vec<String>>;

/// Why a link probe failed.
///
/// Serialized adjacently tagged so snapshots read as
/// `{"type": "http", "error": {"status": 404, ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "error", rename_all = "lowercase")]
pub enum LinkFailure {
    /// The server answered with a non-2xx status.
    Http {
        status: u16,
        #[serde(default)]
        status_text: String,
    },
    /// The request never produced a response (DNS, refused, timeout).
    Fetch { code: String },
}

impl LinkFailure {
    /// The category key this failure is grouped under.
    ///
    /// HTTP errors key by numeric status, transport errors by failure code.
    /// Keys must stay stable across runs for identical failure modes, since
    /// they are the diff engine's category identity.
    pub fn class_key(&self) -> String {
        match self {
            LinkFailure::Http { status, .. } => status.to_string(),
            LinkFailure::Fetch { code } => code.clone(),
        }
    }
}

/// A broken external link together with the pages referencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkError {
    pub link: String,
    pub pages: Vec<String>,
    #[serde(flatten)]
    pub failure: LinkFailure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_key_for_http_is_status_string() {
        let failure = LinkFailure::Http {
            status: 404,
            status_text: "Not Found".into(),
        };
        assert_eq!(failure.class_key(), "404");
    }

    #[test]
    fn class_key_for_fetch_is_code() {
        let failure = LinkFailure::Fetch {
            code: "timeout".into(),
        };
        assert_eq!(failure.class_key(), "timeout");
    }

    #[test]
    fn link_error_serialization_shape() {
        let error = LinkError {
            link: "https://example.com/dead".into(),
            pages: vec!["Main Page".into()],
            failure: LinkFailure::Http {
                status: 410,
                status_text: "Gone".into(),
            },
        };

        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["type"], "http");
        assert_eq!(value["error"]["status"], 410);
        assert_eq!(value["link"], "https://example.com/dead");
    }

    #[test]
    fn link_error_round_trip() {
        let error = LinkError {
            link: "https://example.com".into(),
            pages: vec!["A".into(), "B".into()],
            failure: LinkFailure::Fetch {
                code: "connect".into(),
            },
        };

        let json = serde_json::to_string(&error).unwrap();
        let parsed: LinkError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, error);
    }
}
