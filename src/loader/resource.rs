//! Loaded resources
//!
//! A resource is either buffered (navigation specs, stream already drained
//! and dropped) or streaming (media, stream still open and owned by the
//! caller).

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use super::LoadError;
use crate::models::MediaKind;

/// Open byte stream handed out by the loader
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Resource body
pub enum Body {
    /// Fully materialised content; the source stream is closed
    Buffered(Vec<u8>),
    /// Open stream, not yet consumed
    Streaming(ByteStream),
}

/// Result of a load: detected MIME type, display name and body
pub struct Resource {
    mime: String,
    file_name: String,
    body: Body,
}

impl Resource {
    /// Wrap an open stream, draining it into memory when the MIME type is JSON
    pub async fn from_stream(
        file_name: impl Into<String>,
        mime: impl Into<String>,
        mut stream: ByteStream,
    ) -> std::io::Result<Self> {
        let mime = mime.into();
        let body = if MediaKind::from_mime(&mime) == MediaKind::Json {
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).await?;
            drop(stream);
            Body::Buffered(buf)
        } else {
            Body::Streaming(stream)
        };

        Ok(Self {
            mime,
            file_name: file_name.into(),
            body,
        })
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.mime)
    }

    pub fn is_json(&self) -> bool {
        self.kind() == MediaKind::Json
    }

    pub fn is_video(&self) -> bool {
        self.kind() == MediaKind::Video
    }

    /// Whether the underlying stream is still open
    pub fn is_streaming(&self) -> bool {
        matches!(self.body, Body::Streaming(_))
    }

    /// Buffered content, present only for JSON resources
    pub fn buffer(&self) -> Option<&[u8]> {
        match &self.body {
            Body::Buffered(buf) => Some(buf.as_slice()),
            Body::Streaming(_) => None,
        }
    }

    /// Take the body as a reader, whichever form it is in
    pub fn into_reader(self) -> ByteStream {
        match self.body {
            Body::Buffered(buf) => Box::new(Cursor::new(buf)),
            Body::Streaming(stream) => stream,
        }
    }

    /// Persist the remaining bytes into a uniquely named file under `dir`.
    ///
    /// The copy completes before the path is returned, so the file is safe
    /// to hand to a player.
    pub async fn save(self, dir: &Path) -> Result<PathBuf, LoadError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| LoadError::Persist {
                path: dir.to_path_buf(),
                source,
            })?;

        let (prefix, suffix) = temp_affixes(&self.file_name);
        let (file, path) = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(dir)
            .and_then(|named| named.keep().map_err(|e| e.error))
            .map_err(|source| LoadError::Persist {
                path: dir.to_path_buf(),
                source,
            })?;

        let persist_err = |source: std::io::Error| LoadError::Persist {
            path: path.clone(),
            source,
        };

        let mut file = tokio::fs::File::from_std(file);
        let mut reader = self.into_reader();
        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(persist_err)?;
        file.flush().await.map_err(persist_err)?;

        log::info!("Saved {} bytes to {}", written, path.display());
        Ok(path)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match &self.body {
            Body::Buffered(buf) => format!("Buffered({} bytes)", buf.len()),
            Body::Streaming(_) => "Streaming".to_string(),
        };
        f.debug_struct("Resource")
            .field("mime", &self.mime)
            .field("file_name", &self.file_name)
            .field("body", &body)
            .finish()
    }
}

/// Split a display name into temp-file prefix and suffix, keeping the extension
fn temp_affixes(file_name: &str) -> (String, String) {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("resource");
    let suffix = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    (format!("{}-", stem), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(bytes: &'static [u8]) -> ByteStream {
        Box::new(Cursor::new(bytes))
    }

    #[tokio::test]
    async fn test_json_is_buffered() {
        let res = Resource::from_stream("a.json", "application/json", stream(b"{}"))
            .await
            .unwrap();
        assert!(res.is_json());
        assert!(!res.is_streaming());
        assert_eq!(res.buffer(), Some(&b"{}"[..]));
    }

    #[tokio::test]
    async fn test_video_is_streaming() {
        let res = Resource::from_stream("ep.mp4", "video/mp4", stream(b"\x00\x00"))
            .await
            .unwrap();
        assert!(res.is_video());
        assert!(res.is_streaming());
        assert!(res.buffer().is_none());
    }

    #[tokio::test]
    async fn test_save_copies_remaining_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let res = Resource::from_stream("ep1.mp4", "video/mp4", stream(b"frames"))
            .await
            .unwrap();

        let path = res.save(&dir.path().join("tmp")).await.unwrap();
        assert!(path.starts_with(dir.path().join("tmp")));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp4"));
        assert_eq!(std::fs::read(&path).unwrap(), b"frames");
    }

    #[tokio::test]
    async fn test_save_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = Resource::from_stream("ep.mp4", "video/mp4", stream(b"a"))
            .await
            .unwrap()
            .save(dir.path())
            .await
            .unwrap();
        let b = Resource::from_stream("ep.mp4", "video/mp4", stream(b"b"))
            .await
            .unwrap()
            .save(dir.path())
            .await
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_temp_affixes() {
        assert_eq!(
            temp_affixes("ep1.mp4"),
            ("ep1-".to_string(), ".mp4".to_string())
        );
        assert_eq!(
            temp_affixes("stream"),
            ("stream-".to_string(), String::new())
        );
        assert_eq!(temp_affixes(""), ("resource-".to_string(), String::new()));
    }
}
