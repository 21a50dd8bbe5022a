//! # Mock Cache Client
//!
//! Utilities for testing code built on top of a [`QueryClient`] without spawning a
//! [`QueryActor`](crate::query::QueryActor).
//!
//! [`create_mock_client`] returns a client and the receiving end of its channel. The
//! test then pulls requests with helpers like [`expect_get`] or [`expect_refetch`],
//! asserts on them, and answers through the returned responder.
//!
//! ```rust,ignore
//! let (client, mut receiver) = create_mock_client::<ProductList>(10);
//! let catalog = CatalogClient::new(source, client, products);
//! let task = tokio::spawn(async move { catalog.list_products().await });
//!
//! let (key, _fetch, responder) = expect_get(&mut receiver).await.unwrap();
//! assert_eq!(key, CatalogKey::Products);
//! ```

use crate::query::message::{QueryRequest, Response};
use crate::query::{FetchFn, Query, QueryClient, QueryEntry};
use tokio::sync::mpsc;

/// Creates a client wired to a channel the test controls.
pub fn create_mock_client<Q: Query>(
    buffer_size: usize,
) -> (QueryClient<Q>, mpsc::Receiver<QueryRequest<Q>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (QueryClient::new(sender), receiver)
}

/// Builds the entry a real cache would hold for `key` before any fetch.
pub fn idle_entry<Q: Query>(key: Q::Key) -> QueryEntry<Q> {
    QueryEntry::idle(key)
}

/// Helper to verify that the next message is a Get request.
pub async fn expect_get<Q: Query>(
    receiver: &mut mpsc::Receiver<QueryRequest<Q>>,
) -> Option<(Q::Key, FetchFn<Q>, Response<QueryEntry<Q>>)> {
    match receiver.recv().await {
        Some(QueryRequest::Get {
            key,
            fetch,
            respond_to,
        }) => Some((key, fetch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an invalidate/retry request.
pub async fn expect_refetch<Q: Query>(
    receiver: &mut mpsc::Receiver<QueryRequest<Q>>,
) -> Option<(Q::Key, Response<Option<QueryEntry<Q>>>)> {
    match receiver.recv().await {
        Some(QueryRequest::Refetch { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{fetch_fn, CacheError, QueryStatus};

    #[derive(Debug, Clone)]
    struct Greeting;

    #[derive(Debug, Clone, thiserror::Error)]
    #[error("greeting failed")]
    struct GreetingError;

    impl Query for Greeting {
        type Key = String;
        type Data = String;
        type Error = GreetingError;

        fn fetch_aborted(_: &str) -> GreetingError {
            GreetingError
        }
    }

    #[tokio::test]
    async fn test_mock_client_get() {
        let (client, mut receiver) = create_mock_client::<Greeting>(10);

        let get_task = tokio::spawn(async move {
            let fetch = fetch_fn::<Greeting, _, _>(|| async { Ok("hello".to_string()) });
            client.get("en".to_string(), fetch).await
        });

        let (key, fetch, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(key, "en");
        assert_eq!(fetch().await.unwrap(), "hello");

        let mut entry = idle_entry::<Greeting>(key);
        entry.begin_fetch();
        responder.send(entry).unwrap();

        let result = get_task.await.unwrap().unwrap();
        assert_eq!(result.status, QueryStatus::Loading);
    }

    #[tokio::test]
    async fn test_dropped_responder_reports_actor_dropped() {
        let (client, mut receiver) = create_mock_client::<Greeting>(10);

        let retry_task = tokio::spawn(async move { client.retry("en".to_string()).await });

        let (_, responder) = expect_refetch(&mut receiver).await.expect("Expected Refetch request");
        drop(responder);

        let result = retry_task.await.unwrap();
        assert_eq!(result.unwrap_err(), CacheError::ActorDropped);
    }
}
