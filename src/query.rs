//! Debounced search-as-you-type
//!
//! Every text change restarts a 200ms timer and cancels whatever the previous
//! change started, pending timer and in-flight fetch alike. Results travel
//! back over a channel tagged with the generation that produced them, and
//! only the current generation is ever handed to the UI.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::loader::{LoadError, Loader};
use crate::models::{DecodeError, Item, SearchNode, Spec};

/// Quiet period before a query is issued
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// A fetch that failed for real (cancellation is not an error)
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Something that turns a query URL into a result list
pub trait QuerySource: Clone + Send + Sync + 'static {
    fn fetch(&self, url: String) -> impl Future<Output = Result<Vec<Item>, QueryError>> + Send;
}

impl QuerySource for Loader {
    fn fetch(&self, url: String) -> impl Future<Output = Result<Vec<Item>, QueryError>> + Send {
        let loader = self.clone();
        async move {
            let resource = loader.load(&url).await?;
            let Some(body) = resource.buffer() else {
                return Err(DecodeError::NotJson(resource.mime().to_string()).into());
            };
            Ok(Spec::decode(body)?.into_items()?)
        }
    }
}

/// The face of a running search that the selector sees
pub trait LiveQuery {
    /// Record a text change; fire-and-forget
    fn on_text_changed(&mut self, text: &str);

    /// Latest results for the current text, if any arrived since the last poll.
    /// A failed fetch for the current text is returned as an error.
    fn poll(&mut self) -> Result<Option<Vec<Item>>, QueryError>;
}

/// Results from one generation of the query
struct Rendered {
    generation: u64,
    result: Result<Vec<Item>, QueryError>,
}

/// Marker for a superseded query; swallowed inside the task
struct Cancelled;

/// Debounced query controller bound to one search node
pub struct QueryController<Q: QuerySource> {
    source: Q,
    node: SearchNode,
    debounce: Duration,
    generation: u64,
    pending: Option<CancellationToken>,
    tx: UnboundedSender<Rendered>,
    rx: UnboundedReceiver<Rendered>,
}

impl<Q: QuerySource> QueryController<Q> {
    pub fn new(source: Q, node: SearchNode) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            node,
            debounce: DEBOUNCE,
            generation: 0,
            pending: None,
            tx,
            rx,
        }
    }

    /// Override the quiet period
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Number of text changes seen so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl<Q: QuerySource> LiveQuery for QueryController<Q> {
    fn on_text_changed(&mut self, text: &str) {
        self.cancel_pending();
        self.generation += 1;

        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let generation = self.generation;
        let url = self.node.query_url(text);
        let deadline = Instant::now() + self.debounce;
        let source = self.source.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            match run_query(&source, url, deadline, &token).await {
                Ok(result) => {
                    // The receiver only goes away with the controller
                    let _ = tx.send(Rendered { generation, result });
                }
                Err(Cancelled) => log::debug!("Query {} superseded", generation),
            }
        });
    }

    fn poll(&mut self) -> Result<Option<Vec<Item>>, QueryError> {
        let mut latest = None;
        while let Ok(rendered) = self.rx.try_recv() {
            if rendered.generation != self.generation {
                log::debug!("Dropping stale results from query {}", rendered.generation);
                continue;
            }
            latest = Some(rendered.result?);
        }
        Ok(latest)
    }
}

impl<Q: QuerySource> Drop for QueryController<Q> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

async fn run_query<Q: QuerySource>(
    source: &Q,
    url: String,
    deadline: Instant,
    token: &CancellationToken,
) -> Result<Result<Vec<Item>, QueryError>, Cancelled> {
    tokio::select! {
        biased;
        _ = token.cancelled() => return Err(Cancelled),
        _ = tokio::time::sleep_until(deadline) => {}
    }

    log::debug!("Querying {}", url);
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Cancelled),
        result = source.fetch(url) => Ok(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Echo;

    impl QuerySource for Echo {
        fn fetch(&self, url: String) -> impl Future<Output = Result<Vec<Item>, QueryError>> + Send {
            async move { Ok(vec![Item::new(url.clone(), url)]) }
        }
    }

    fn node() -> SearchNode {
        SearchNode {
            url: "q=".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_generation_is_never_rendered() {
        let mut controller = QueryController::new(Echo, node());
        controller.on_text_changed("a");
        controller.on_text_changed("ab");

        // A result from generation 1 that slipped through before cancellation
        controller
            .tx
            .send(Rendered {
                generation: 1,
                result: Ok(vec![Item::new("stale", "stale")]),
            })
            .unwrap_or_else(|_| panic!("receiver dropped"));
        assert!(controller.poll().unwrap().is_none());

        tokio::time::advance(DEBOUNCE).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        let items = controller.poll().unwrap().unwrap();
        assert_eq!(items[0].url, "q=ab");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_query() {
        let mut controller = QueryController::new(Echo, node());
        controller.on_text_changed("a");
        let token = controller.pending.clone().unwrap();
        drop(controller);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_generation_counts_changes() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let _guard = rt.enter();
        let mut controller = QueryController::new(Echo, node());
        assert_eq!(controller.generation(), 0);
        controller.on_text_changed("x");
        controller.on_text_changed("xy");
        assert_eq!(controller.generation(), 2);
    }
}
