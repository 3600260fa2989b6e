//! Data structures shared across the navigator
//!
//! - **Space**: where relative URLs resolve (local disk or a remote service)
//! - **Spec**: a decoded navigation document and its three node kinds
//! - **Media**: MIME classification of loaded resources

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Spaces
// =============================================================================

/// A named spec service reachable over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteService {
    /// Service name, also usable as a URL scheme alias (`<name>://path`)
    pub name: String,
    /// Base URL that relative paths are appended to
    pub base_url: String,
}

impl RemoteService {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }

    /// Join a relative path onto the base URL (plain prefixing, no normalisation)
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for RemoteService {
    fn default() -> Self {
        Self::new("zoro", "http://localhost:8080/")
    }
}

/// Origin for resolving relative URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Space {
    /// Relative URLs are filesystem paths
    Local,
    /// Relative URLs are appended to the service's base URL
    Remote(RemoteService),
}

impl Space {
    pub fn is_local(&self) -> bool {
        matches!(self, Space::Local)
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Space::Local => write!(f, "local"),
            Space::Remote(service) => write!(f, "{} ({})", service.name, service.base_url),
        }
    }
}

// =============================================================================
// Spec Documents
// =============================================================================

/// One selectable entry of a list node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub url: String,
}

impl Item {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            url: url.into(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subtitle {
            Some(sub) if !sub.is_empty() => write!(f, "{} ({})", self.title, sub),
            _ => write!(f, "{}", self.title),
        }
    }
}

/// Live search node: the query text is appended to `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchNode {
    pub url: String,
}

impl SearchNode {
    /// Build the query URL for the given user text
    pub fn query_url(&self, text: &str) -> String {
        format!("{}{}", self.url, urlencoding::encode(text))
    }
}

/// A decoded navigation node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spec {
    /// Final URL; empty means navigation is finished
    Terminal(String),
    /// Ordered selectable entries
    List(Vec<Item>),
    /// Search-as-you-type prompt
    Search(SearchNode),
}

/// Raw wire shape; at most one field is expected to be present
#[derive(Debug, Default, Deserialize)]
struct SpecDocument {
    url: Option<String>,
    list: Option<Vec<Item>>,
    search: Option<SearchNode>,
}

/// Errors decoding a spec document
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid spec JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("spec sets {0} of url/list/search, expected exactly one")]
    Ambiguous(usize),
    #[error("expected a list node, got {0}")]
    UnexpectedNode(&'static str),
    #[error("expected a JSON spec, got '{0}'")]
    NotJson(String),
}

impl Spec {
    /// Decode a JSON buffer into exactly one node kind
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let doc: SpecDocument = serde_json::from_slice(bytes)?;

        let populated = [doc.url.is_some(), doc.list.is_some(), doc.search.is_some()]
            .iter()
            .filter(|set| **set)
            .count();
        if populated != 1 {
            return Err(DecodeError::Ambiguous(populated));
        }

        Ok(match (doc.url, doc.list, doc.search) {
            (Some(url), _, _) => Spec::Terminal(url),
            (_, Some(items), _) => Spec::List(items),
            (_, _, Some(search)) => Spec::Search(search),
            (None, None, None) => return Err(DecodeError::Ambiguous(0)),
        })
    }

    /// Consume the spec, requiring a list node
    pub fn into_items(self) -> Result<Vec<Item>, DecodeError> {
        match self {
            Spec::List(items) => Ok(items),
            other => Err(DecodeError::UnexpectedNode(other.kind())),
        }
    }

    /// Short name of the node kind, for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Spec::Terminal(_) => "url",
            Spec::List(_) => "list",
            Spec::Search(_) => "search",
        }
    }
}

// =============================================================================
// Media Classification
// =============================================================================

/// Coarse classification of a resource's MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Navigation spec, always buffered
    Json,
    /// Playable media, left streaming
    Video,
    /// Anything else, left streaming
    Other,
}

impl MediaKind {
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("application/json") {
            MediaKind::Json
        } else if mime.starts_with("video") {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_terminal_url() {
        let spec = Spec::decode(br#"{"url": "https://cdn/ep1.mp4"}"#).unwrap();
        assert_eq!(spec, Spec::Terminal("https://cdn/ep1.mp4".into()));

        let empty = Spec::decode(br#"{"url": ""}"#).unwrap();
        assert_eq!(empty, Spec::Terminal(String::new()));
    }

    #[test]
    fn test_decode_list_keeps_order() {
        let spec = Spec::decode(
            br#"{"list": [
                {"title": "B", "subtitle": "second", "url": "b.json"},
                {"title": "A", "url": "a.json"}
            ]}"#,
        )
        .unwrap();

        let items = spec.into_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "B");
        assert_eq!(items[0].subtitle.as_deref(), Some("second"));
        assert_eq!(items[1].subtitle, None);
        assert_eq!(items[1].url, "a.json");
    }

    #[test]
    fn test_decode_search() {
        let spec = Spec::decode(br#"{"search": {"url": "search?q="}}"#).unwrap();
        assert_eq!(
            spec,
            Spec::Search(SearchNode {
                url: "search?q=".into()
            })
        );
    }

    #[test]
    fn test_decode_rejects_ambiguous() {
        assert!(matches!(
            Spec::decode(br#"{}"#),
            Err(DecodeError::Ambiguous(0))
        ));
        assert!(matches!(
            Spec::decode(br#"{"url": "x", "list": []}"#),
            Err(DecodeError::Ambiguous(2))
        ));
        assert!(matches!(
            Spec::decode(br#"{"url": null, "search": null}"#),
            Err(DecodeError::Ambiguous(0))
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(Spec::decode(b"not json"), Err(DecodeError::Json(_))));
        assert!(matches!(Spec::decode(b""), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_into_items_requires_list() {
        let err = Spec::Terminal("x".into()).into_items().unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedNode("url")));
    }

    #[test]
    fn test_query_url_percent_encodes() {
        let node = SearchNode {
            url: "http://x/search?q=".into(),
        };
        assert_eq!(
            node.query_url("one piece & co"),
            "http://x/search?q=one%20piece%20%26%20co"
        );
        assert_eq!(node.query_url(""), "http://x/search?q=");
    }

    #[test]
    fn test_media_kind_from_mime() {
        assert_eq!(MediaKind::from_mime("application/json"), MediaKind::Json);
        assert_eq!(
            MediaKind::from_mime("application/json; charset=utf-8"),
            MediaKind::Json
        );
        assert_eq!(MediaKind::from_mime("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("Video/x-matroska"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("text/html"), MediaKind::Other);
        assert_eq!(MediaKind::from_mime(""), MediaKind::Other);
    }

    #[test]
    fn test_remote_service_join() {
        let service = RemoteService::new("zoro", "http://x/");
        assert_eq!(service.join("a/b.json"), "http://x/a/b.json");
    }
}
