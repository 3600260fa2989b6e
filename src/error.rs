//! Session-level error type
//!
//! Every failure that ends a navigation session funnels into `NavError`;
//! `cli::ExitCode` maps it to a process exit status.

use thiserror::Error;

use crate::loader::LoadError;
use crate::models::DecodeError;
use crate::player::PlayerError;
use crate::query::QueryError;
use crate::selector::SelectionError;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("selection failed: {0}")]
    Selection(SelectionError),
    #[error("playback failed: {0}")]
    Playback(#[from] PlayerError),
    #[error("{url} has unsupported content type '{mime}'")]
    Unsupported { url: String, mime: String },
}

impl From<QueryError> for NavError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Load(e) => NavError::Load(e),
            QueryError::Decode(e) => NavError::Decode(e),
        }
    }
}

impl From<SelectionError> for NavError {
    fn from(err: SelectionError) -> Self {
        match err {
            // A failed live search is a broken chain, not a UI problem
            SelectionError::Query(e) => e.into(),
            other => NavError::Selection(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_failures_unwrap_to_cause() {
        let err: NavError =
            SelectionError::Query(QueryError::Decode(DecodeError::Ambiguous(0))).into();
        assert!(matches!(err, NavError::Decode(DecodeError::Ambiguous(0))));

        let err: NavError = SelectionError::OutOfRange { index: 3, len: 1 }.into();
        assert!(matches!(err, NavError::Selection(_)));
    }
}
