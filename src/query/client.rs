//! # Query Client
//!
//! The cloneable handle used to talk to a [`QueryActor`](crate::query::QueryActor),
//! and the subscription type handed to consumers that want to observe a key.

use crate::query::message::QueryRequest;
use crate::query::{CacheError, FetchFn, Query, QueryEntry};
use tokio::sync::{mpsc, oneshot, watch};

/// ## QueryClient
///
/// Forwards cache requests over a Tokio mpsc channel and awaits the reply on a
/// oneshot channel. Holds only a sender, so cloning is cheap and every clone talks to
/// the same cache.
pub struct QueryClient<Q: Query> {
    sender: mpsc::Sender<QueryRequest<Q>>,
}

impl<Q: Query> Clone for QueryClient<Q> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<Q: Query> QueryClient<Q> {
    pub fn new(sender: mpsc::Sender<QueryRequest<Q>>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> QueryRequest<Q>,
    ) -> Result<T, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| CacheError::ActorClosed)?;
        response.await.map_err(|_| CacheError::ActorDropped)
    }

    /// Returns the current entry for `key`, starting `fetch` if the key has never
    /// been fetched. A key that is loading, or already settled, is returned as is.
    pub async fn get(&self, key: Q::Key, fetch: FetchFn<Q>) -> Result<QueryEntry<Q>, CacheError> {
        self.request(|respond_to| QueryRequest::Get {
            key,
            fetch,
            respond_to,
        })
        .await
    }

    /// Like [`get`](Self::get), but waits until the entry has settled.
    pub async fn fetch(
        &self,
        key: Q::Key,
        fetch: FetchFn<Q>,
    ) -> Result<QueryEntry<Q>, CacheError> {
        let entry = self.get(key.clone(), fetch).await?;
        if entry.status.is_settled() {
            return Ok(entry);
        }
        self.subscribe(key).await?.settled().await
    }

    /// Returns the entry for `key` without starting a fetch.
    pub async fn peek(&self, key: Q::Key) -> Result<Option<QueryEntry<Q>>, CacheError> {
        self.request(|respond_to| QueryRequest::Peek { key, respond_to })
            .await
    }

    /// Registers interest in `key`. Dropping the subscription unsubscribes.
    pub async fn subscribe(&self, key: Q::Key) -> Result<QuerySubscription<Q>, CacheError> {
        let receiver = self
            .request(|respond_to| QueryRequest::Subscribe { key, respond_to })
            .await?;
        Ok(QuerySubscription { receiver })
    }

    /// Marks `key` stale and re-runs its fetch function.
    ///
    /// Returns `None` when nothing has ever been fetched for `key`.
    #[tracing::instrument(skip(self))]
    pub async fn invalidate(&self, key: Q::Key) -> Result<Option<QueryEntry<Q>>, CacheError> {
        tracing::debug!("Sending request");
        self.request(|respond_to| QueryRequest::Refetch { key, respond_to })
            .await
    }

    /// Re-runs the fetch for `key`, typically after an error.
    ///
    /// Same semantics as [`invalidate`](Self::invalidate).
    #[tracing::instrument(skip(self))]
    pub async fn retry(&self, key: Q::Key) -> Result<Option<QueryEntry<Q>>, CacheError> {
        tracing::debug!("Sending request");
        self.request(|respond_to| QueryRequest::Refetch { key, respond_to })
            .await
    }
}

/// A consumer's view of one cache key.
///
/// Every transition of the entry (loading, success, error) is observable through
/// [`changed`](Self::changed). Intermediate states may be skipped if the consumer
/// is slow; the latest entry is always available.
pub struct QuerySubscription<Q: Query> {
    receiver: watch::Receiver<QueryEntry<Q>>,
}

impl<Q: Query> QuerySubscription<Q> {
    /// The latest entry.
    pub fn current(&self) -> QueryEntry<Q> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next transition and returns the new entry.
    pub async fn changed(&mut self) -> Result<QueryEntry<Q>, CacheError> {
        self.receiver
            .changed()
            .await
            .map_err(|_| CacheError::ActorClosed)?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Waits until the entry holds either data or an error.
    pub async fn settled(&mut self) -> Result<QueryEntry<Q>, CacheError> {
        let entry = self
            .receiver
            .wait_for(|entry| entry.status.is_settled())
            .await
            .map_err(|_| CacheError::ActorClosed)?;
        Ok(entry.clone())
    }
}
