//! Content-based MIME detection for filesystem reads
//!
//! Magic bytes come from `infer`; JSON and plain text are recognised by
//! inspecting the head of the file, accepting a document cut off by the
//! sniff window.

use serde::de::IgnoredAny;

/// Number of bytes peeked from a file before detection
pub const SNIFF_LEN: usize = 512;

pub const JSON: &str = "application/json";
pub const TEXT: &str = "text/plain; charset=utf-8";
pub const BINARY: &str = "application/octet-stream";

/// Detect a MIME type from the first bytes of a file
pub fn detect(head: &[u8]) -> String {
    if let Some(kind) = infer::get(head) {
        return kind.mime_type().to_string();
    }

    if looks_like_json(head) {
        JSON.to_string()
    } else if is_text(head) {
        TEXT.to_string()
    } else {
        BINARY.to_string()
    }
}

fn looks_like_json(head: &[u8]) -> bool {
    let Some(start) = head.iter().position(|b| !b.is_ascii_whitespace()) else {
        return false;
    };
    if !matches!(head[start], b'{' | b'[') {
        return false;
    }

    match serde_json::from_slice::<IgnoredAny>(head) {
        Ok(_) => true,
        // Running out of input only counts when the window was full
        Err(e) => e.is_eof() && head.len() >= SNIFF_LEN,
    }
}

fn is_text(head: &[u8]) -> bool {
    match std::str::from_utf8(head) {
        Ok(s) => !s.contains('\0'),
        // A multi-byte sequence split by the window is still text
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_json_object_and_array() {
        assert_eq!(detect(br#"{"url": "x"}"#), JSON);
        assert_eq!(detect(b"  \n[1, 2, 3]"), JSON);
    }

    #[test]
    fn test_detects_json_cut_by_window() {
        let mut doc = br#"{"list": ["#.to_vec();
        while doc.len() < SNIFF_LEN {
            doc.extend_from_slice(br#"{"title":"t","url":"u"},"#);
        }
        doc.truncate(SNIFF_LEN);
        assert_eq!(detect(&doc), JSON);
    }

    #[test]
    fn test_short_broken_json_is_text() {
        assert_eq!(detect(br#"{"url": "#), TEXT);
    }

    #[test]
    fn test_detects_video_magic() {
        let flv = [0x46, 0x4C, 0x56, 0x01, 0x05, 0x00, 0x00, 0x00, 0x09];
        assert_eq!(detect(&flv), "video/x-flv");
    }

    #[test]
    fn test_detects_plain_text_and_binary() {
        assert_eq!(detect(b"hello world"), TEXT);
        assert_eq!(detect(&[0x00, 0x9f, 0x92, 0x96]), BINARY);
    }
}
