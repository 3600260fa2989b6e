//! Resource loader
//!
//! Resolves navigation URLs against the configured space and opens them:
//! filesystem paths are sniffed from their first bytes, HTTP responses use
//! the declared content type. JSON is buffered, everything else streams.

pub mod resource;
pub mod sniff;

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use futures::TryStreamExt;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

use crate::config::SessionConfig;
use crate::models::{RemoteService, Space};

pub use resource::{ByteStream, Resource};

/// Errors from loading a resource
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to read {url}: {source}")]
    Read {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to persist media to {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where a URL resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Http(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::File(path) => write!(f, "file {}", path.display()),
            Target::Http(url) => write!(f, "GET {}", url),
        }
    }
}

/// Loads navigation specs and media from the configured space
#[derive(Debug, Clone)]
pub struct Loader {
    space: Space,
    service: RemoteService,
    client: reqwest::Client,
}

impl Loader {
    /// Create a loader. `service` is reachable through its scheme alias
    /// even when `space` is local.
    pub fn new(space: Space, service: RemoteService) -> Self {
        Self {
            space,
            service,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.space.clone(), config.service.clone())
    }

    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Decide where a raw URL points without touching it.
    ///
    /// Only `http(s)`, `file` and the service alias are treated as schemes;
    /// anything else, colons included, is relative to the space.
    pub fn resolve(&self, raw: &str) -> Result<Target, LoadError> {
        if let Some(scheme) = scheme_of(raw) {
            let scheme = scheme.to_ascii_lowercase();
            let rest = &raw[scheme.len() + 1..];

            match scheme.as_str() {
                "http" | "https" => return http_target(raw.to_string()),
                "file" => return file_target(raw),
                alias if alias == self.service.name.to_ascii_lowercase() => {
                    let path = rest.strip_prefix("//").unwrap_or(rest);
                    return http_target(self.service.join(path));
                }
                _ => {}
            }
        }

        match &self.space {
            Space::Local => Ok(Target::File(PathBuf::from(raw))),
            Space::Remote(service) => http_target(service.join(raw)),
        }
    }

    /// Load a URL, buffering it when it is JSON
    pub async fn load(&self, raw: &str) -> Result<Resource, LoadError> {
        let target = self.resolve(raw)?;
        log::info!("Loading {} ({})", raw, target);

        let (stream, mime) = match &target {
            Target::File(path) => open_file(path).await?,
            Target::Http(url) => self.open_http(url).await?,
        };
        log::debug!("Mime {}", mime);

        let resource = Resource::from_stream(display_name(raw), mime, stream)
            .await
            .map_err(|source| LoadError::Read {
                url: raw.to_string(),
                source,
            })?;

        if let Some(body) = resource.buffer() {
            log::debug!("Body {}", String::from_utf8_lossy(body));
        }

        Ok(resource)
    }

    async fn open_http(&self, url: &str) -> Result<(ByteStream, String), LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| LoadError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status,
            });
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response.bytes_stream().map_err(std::io::Error::other);
        let stream: ByteStream = Box::new(StreamReader::new(Box::pin(body)));
        Ok((stream, mime))
    }
}

async fn open_file(path: &Path) -> Result<(ByteStream, String), LoadError> {
    let io_err = |source: std::io::Error| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::open(path).await.map_err(io_err)?;

    let mut head = Vec::with_capacity(sniff::SNIFF_LEN);
    (&mut file)
        .take(sniff::SNIFF_LEN as u64)
        .read_to_end(&mut head)
        .await
        .map_err(io_err)?;

    let mime = sniff::detect(&head);
    // Put the peeked bytes back in front of the rest of the file
    let stream: ByteStream = Box::new(Cursor::new(head).chain(file));
    Ok((stream, mime))
}

fn http_target(url: String) -> Result<Target, LoadError> {
    match reqwest::Url::parse(&url) {
        Ok(_) => Ok(Target::Http(url)),
        Err(e) => Err(LoadError::InvalidUrl {
            url,
            reason: e.to_string(),
        }),
    }
}

fn file_target(raw: &str) -> Result<Target, LoadError> {
    let invalid = |reason: &str| LoadError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };
    let url = reqwest::Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    url.to_file_path()
        .map(Target::File)
        .map_err(|_| invalid("not a local file path"))
}

/// Extract an RFC 3986 scheme, if the string has one. Single letters are
/// drive prefixes (`C:\specs`), not schemes.
fn scheme_of(raw: &str) -> Option<&str> {
    let (scheme, _) = raw.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if scheme.len() > 1
        && first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        Some(scheme)
    } else {
        None
    }
}

/// Last path segment of a URL, without query or fragment
fn display_name(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or(raw);
    path.rsplit('/').next().unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> RemoteService {
        RemoteService::new("zoro", "http://x/")
    }

    #[test]
    fn test_resolve_relative_local() {
        let loader = Loader::new(Space::Local, remote());
        assert_eq!(
            loader.resolve("a/b.json").unwrap(),
            Target::File(PathBuf::from("a/b.json"))
        );
    }

    #[test]
    fn test_resolve_relative_remote() {
        let loader = Loader::new(Space::Remote(remote()), remote());
        assert_eq!(
            loader.resolve("a/b.json").unwrap(),
            Target::Http("http://x/a/b.json".into())
        );
    }

    #[test]
    fn test_resolve_absolute_ignores_space() {
        for space in [Space::Local, Space::Remote(remote())] {
            let loader = Loader::new(space, remote());
            assert_eq!(
                loader.resolve("https://y/z").unwrap(),
                Target::Http("https://y/z".into())
            );
        }
    }

    #[test]
    fn test_resolve_service_alias() {
        let loader = Loader::new(Space::Local, remote());
        assert_eq!(
            loader.resolve("zoro://shows/1.json").unwrap(),
            Target::Http("http://x/shows/1.json".into())
        );
        assert_eq!(
            loader.resolve("ZORO:shows/1.json").unwrap(),
            Target::Http("http://x/shows/1.json".into())
        );
    }

    #[test]
    fn test_resolve_unknown_scheme_follows_space() {
        let local = Loader::new(Space::Local, remote());
        assert_eq!(
            local.resolve("s1:e1.json").unwrap(),
            Target::File(PathBuf::from("s1:e1.json"))
        );

        let remote_loader = Loader::new(Space::Remote(remote()), remote());
        assert_eq!(
            remote_loader.resolve("S01:E01.json").unwrap(),
            Target::Http("http://x/S01:E01.json".into())
        );
    }

    #[test]
    fn test_resolve_drive_letter_is_a_path() {
        let loader = Loader::new(Space::Local, remote());
        assert_eq!(
            loader.resolve(r"C:\specs\index.json").unwrap(),
            Target::File(PathBuf::from(r"C:\specs\index.json"))
        );
    }

    #[test]
    fn test_resolve_invalid_remote_join() {
        let loader = Loader::new(Space::Remote(RemoteService::new("svc", "not a url/")), remote());
        assert!(matches!(
            loader.resolve("a.json"),
            Err(LoadError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_scheme_of() {
        assert_eq!(scheme_of("http://x"), Some("http"));
        assert_eq!(scheme_of("zoro:path"), Some("zoro"));
        assert_eq!(scheme_of("a/b.json"), None);
        assert_eq!(scheme_of("./c:d"), None);
        assert_eq!(scheme_of("1abc:x"), None);
        assert_eq!(scheme_of("C:/specs"), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("http://x/a/ep1.mp4?token=1"), "ep1.mp4");
        assert_eq!(display_name("a/b.json"), "b.json");
        assert_eq!(display_name("plain"), "plain");
    }
}
