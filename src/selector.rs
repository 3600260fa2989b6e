//! Interactive selection seam
//!
//! The interpreter blocks on a `Selector` whenever a list or search node
//! needs a human decision. The terminal implementation lives in `ui`.

use thiserror::Error;

use crate::models::Item;
use crate::query::{LiveQuery, QueryError};

/// Errors from the interactive selector
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("selected index {index} is out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
    #[error("search failed: {0}")]
    Query(#[from] QueryError),
    #[error("search prompts need a multi-threaded tokio runtime")]
    SingleThreadedRuntime,
}

/// Blocking provider of user choices.
///
/// `None` means the user dismissed the prompt without choosing. Calls block
/// the calling thread, so the interpreter runs them under
/// `tokio::task::block_in_place`; search queries progress on the remaining
/// runtime workers.
pub trait Selector {
    /// Show `items` in order and wait for one to be chosen
    fn select(&mut self, items: &[Item]) -> Result<Option<usize>, SelectionError>;

    /// Run a search prompt, feeding text changes to `query` and rendering what
    /// it returns. Returns the item chosen from the latest rendered list.
    fn search(&mut self, query: &mut dyn LiveQuery) -> Result<Option<Item>, SelectionError>;
}
