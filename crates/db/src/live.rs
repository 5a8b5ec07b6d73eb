//! Live queries: a query kept up to date as its collection changes.
//!
//! Each live query runs as one task that listens to the store's change feed
//! and re-evaluates the query whenever its collection is written. Consumers
//! read the most recent snapshot from a `watch` channel, so intermediate
//! snapshots may be skipped but the latest one is never lost.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;

use crate::document::Document;
use crate::error::StoreError;
use crate::query::Query;
use crate::store::DocumentStore;

/// Post-query filter for conditions the query model cannot express.
pub type DocumentFilter = Arc<dyn Fn(&Document) -> bool + Send + Sync>;

/// Result set of one evaluation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Increases by one per evaluation, starting at 0.
    pub sequence: u64,
    pub documents: Arc<Vec<Document>>,
}

pub struct LiveQuery {
    collection: String,
    query: Query,
    filter: Option<DocumentFilter>,
}

impl LiveQuery {
    pub fn new(collection: impl Into<String>, query: Query) -> Self {
        Self {
            collection: collection.into(),
            query,
            filter: None,
        }
    }

    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&Document) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(f));
        self
    }

    async fn evaluate(&self, store: &dyn DocumentStore) -> Result<Vec<Document>, StoreError> {
        let mut docs = store.query(&self.collection, &self.query).await?;
        if let Some(filter) = &self.filter {
            docs.retain(|d| filter(d));
        }
        Ok(docs)
    }

    /// Evaluate once and keep the result fresh until the subscription ends.
    pub async fn start(self, store: Arc<dyn DocumentStore>) -> Result<Subscription, StoreError> {
        // Subscribe before the first read so no write falls between them.
        let mut changes = store.changes();
        let initial = self.evaluate(store.as_ref()).await?;
        let (tx, rx) = watch::channel(Snapshot {
            sequence: 0,
            documents: Arc::new(initial),
        });
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut sequence = 0u64;
            loop {
                let refresh = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = tx.closed() => break,
                    change = changes.recv() => match change {
                        Ok(change) => change.collection == self.collection,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(collection = %self.collection, skipped, "Live query lagged, re-evaluating");
                            true
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                };
                if !refresh {
                    continue;
                }
                match self.evaluate(store.as_ref()).await {
                    Ok(docs) => {
                        sequence += 1;
                        let _ = tx.send(Snapshot {
                            sequence,
                            documents: Arc::new(docs),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(collection = %self.collection, error = %e, "Live query refresh failed");
                    }
                }
            }
            tracing::debug!(collection = %self.collection, "Live query stopped");
        });

        Ok(Subscription { rx, cancel })
    }
}

/// Handle on a running live query. Dropping it stops the query.
pub struct Subscription {
    rx: watch::Receiver<Snapshot>,
    cancel: CancellationToken,
}

impl Subscription {
    /// Most recent snapshot.
    pub fn current(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Wait for a snapshot newer than the last one seen. `None` once stopped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stream of snapshots starting with the current one. The stream owns the
    /// subscription.
    pub fn into_stream(self) -> SnapshotStream {
        SnapshotStream {
            inner: WatchStream::new(self.rx.clone()),
            _subscription: self,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub struct SnapshotStream {
    inner: WatchStream<Snapshot>,
    _subscription: Subscription,
}

impl Stream for SnapshotStream {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
