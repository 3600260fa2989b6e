//! Spec interpreter
//!
//! Turns a buffered spec document into the next URL to visit, asking the
//! selector whenever the node needs a choice.

use std::time::Duration;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task;

use crate::error::NavError;
use crate::models::{Item, SearchNode, Spec};
use crate::query::{QueryController, QuerySource, DEBOUNCE};
use crate::selector::{SelectionError, Selector};

/// What the interpreter decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Continue with this URL; empty means navigation is finished
    Next(String),
    /// The user left the prompt without choosing
    Dismissed,
}

pub struct Interpreter<S> {
    selector: S,
    debounce: Duration,
}

impl<S: Selector> Interpreter<S> {
    pub fn new(selector: S) -> Self {
        Self {
            selector,
            debounce: DEBOUNCE,
        }
    }

    /// Override the search debounce window
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    /// Decode `buffer` and resolve it to the next URL.
    ///
    /// Prompts block the calling thread. On a multi-threaded tokio runtime the
    /// worker is handed off first, which search nodes rely on: their queries
    /// run as tasks on the same runtime. Anywhere else a search node fails
    /// with `SelectionError::SingleThreadedRuntime` instead of hanging.
    pub fn interpret<Q: QuerySource>(
        &mut self,
        source: &Q,
        buffer: &[u8],
    ) -> Result<Resolution, NavError> {
        let spec = Spec::decode(buffer)?;
        log::debug!("Interpreting {} node", spec.kind());

        match spec {
            Spec::Terminal(url) => Ok(Resolution::Next(url)),
            Spec::List(items) => self.choose(&items),
            Spec::Search(node) => self.search(source, node),
        }
    }

    fn choose(&mut self, items: &[Item]) -> Result<Resolution, NavError> {
        let selector = &mut self.selector;
        let choice = if on_multi_thread_runtime() {
            task::block_in_place(|| selector.select(items))
        } else {
            selector.select(items)
        };

        let Some(index) = choice? else {
            return Ok(Resolution::Dismissed);
        };

        let item = items.get(index).ok_or(SelectionError::OutOfRange {
            index,
            len: items.len(),
        })?;
        log::info!("Selected '{}' -> {}", item.title, item.url);
        Ok(Resolution::Next(item.url.clone()))
    }

    fn search<Q: QuerySource>(
        &mut self,
        source: &Q,
        node: SearchNode,
    ) -> Result<Resolution, NavError> {
        if !on_multi_thread_runtime() {
            return Err(SelectionError::SingleThreadedRuntime.into());
        }

        let mut controller =
            QueryController::new(source.clone(), node).with_debounce(self.debounce);
        let selector = &mut self.selector;
        let choice = task::block_in_place(|| selector.search(&mut controller))?;

        Ok(match choice {
            Some(item) => {
                log::info!("Selected '{}' -> {}", item.title, item.url);
                Resolution::Next(item.url)
            }
            None => Resolution::Dismissed,
        })
    }
}

/// Whether a blocking prompt can give its worker back to the runtime
fn on_multi_thread_runtime() -> bool {
    Handle::try_current()
        .is_ok_and(|handle| handle.runtime_flavor() == RuntimeFlavor::MultiThread)
}
