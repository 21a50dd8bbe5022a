//! # Query Actor
//!
//! The `QueryActor` owns every cache entry for one [`Query`] family and processes
//! requests sequentially. Fetches are the only work that runs outside the loop: each
//! one is spawned into a `JoinSet` and its result is applied by the loop when it
//! completes, so entry state is only ever touched from one place.

use crate::query::client::QueryClient;
use crate::query::message::QueryRequest;
use crate::query::{FetchFn, Query, QueryEntry, QueryStatus};
use std::collections::HashMap;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// One cached key: the broadcast channel holding its entry, plus the fetch function
/// that `invalidate`/`retry` re-run.
struct Slot<Q: Query> {
    state: watch::Sender<QueryEntry<Q>>,
    fetch: Option<FetchFn<Q>>,
}

impl<Q: Query> Slot<Q> {
    fn new(key: Q::Key) -> Self {
        let (state, _) = watch::channel(QueryEntry::idle(key));
        Self { state, fetch: None }
    }

    fn snapshot(&self) -> QueryEntry<Q> {
        self.state.borrow().clone()
    }

    fn status(&self) -> QueryStatus {
        self.state.borrow().status
    }
}

type Completion<Q> = (<Q as Query>::Key, Result<<Q as Query>::Data, <Q as Query>::Error>);

/// The keyed fetch cache for one query family.
///
/// **Concurrency model**: requests are handled one at a time, so the check
/// "is this key already loading?" and the decision to start a fetch cannot
/// interleave with another request. That is what guarantees a single outstanding
/// fetch per key without any locking.
///
/// # Usage Pattern
///
/// ```rust,ignore
/// let (actor, client) = QueryActor::<ProductDetail>::new(32);
/// tokio::spawn(actor.run());
/// let entry = client.get(key, fetch).await?;
/// ```
pub struct QueryActor<Q: Query> {
    receiver: mpsc::Receiver<QueryRequest<Q>>,
    slots: HashMap<Q::Key, Slot<Q>>,
    tasks: JoinSet<Completion<Q>>,
}

impl<Q: Query> QueryActor<Q> {
    /// Creates a new `QueryActor` and its associated `QueryClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait when it
    /// is full.
    pub fn new(buffer_size: usize) -> (Self, QueryClient<Q>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            slots: HashMap::new(),
            tasks: JoinSet::new(),
        };
        (actor, QueryClient::new(sender))
    }

    /// Runs the request loop.
    ///
    /// Returns once every client has been dropped and every outstanding fetch has
    /// landed. Fetches are never cancelled.
    pub async fn run(mut self) {
        let query = std::any::type_name::<Q>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(query, "Query actor started");

        loop {
            tokio::select! {
                Some(msg) = self.receiver.recv() => self.handle(query, msg),
                Some(joined) = self.tasks.join_next() => match joined {
                    Ok((key, result)) => self.complete(query, key, result),
                    Err(e) => warn!(query, error = %e, "Fetch task lost"),
                },
                else => break,
            }
        }

        info!(query, size = self.slots.len(), "Shutdown");
    }

    fn handle(&mut self, query: &str, msg: QueryRequest<Q>) {
        match msg {
            QueryRequest::Get {
                key,
                fetch,
                respond_to,
            } => {
                let slot = self
                    .slots
                    .entry(key.clone())
                    .or_insert_with(|| Slot::new(key.clone()));
                let fetch = slot.fetch.get_or_insert(fetch).clone();
                let status = slot.status();
                debug!(query, %key, %status, "Get");

                if status == QueryStatus::Idle {
                    Self::start_fetch(query, &mut self.tasks, slot, key, fetch);
                }
                let _ = respond_to.send(slot.snapshot());
            }
            QueryRequest::Peek { key, respond_to } => {
                let entry = self.slots.get(&key).map(Slot::snapshot);
                debug!(query, %key, found = entry.is_some(), "Peek");
                let _ = respond_to.send(entry);
            }
            QueryRequest::Subscribe { key, respond_to } => {
                let slot = self
                    .slots
                    .entry(key.clone())
                    .or_insert_with(|| Slot::new(key.clone()));
                debug!(query, %key, subscribers = slot.state.receiver_count(), "Subscribe");
                let _ = respond_to.send(slot.state.subscribe());
            }
            QueryRequest::Refetch { key, respond_to } => {
                let Some(slot) = self.slots.get_mut(&key) else {
                    debug!(query, %key, "Refetch of unknown key ignored");
                    let _ = respond_to.send(None);
                    return;
                };
                let Some(fetch) = slot.fetch.clone() else {
                    debug!(query, %key, "Refetch without fetch function ignored");
                    let _ = respond_to.send(None);
                    return;
                };

                if slot.status() == QueryStatus::Loading {
                    debug!(query, %key, "Refetch joined outstanding fetch");
                } else {
                    Self::start_fetch(query, &mut self.tasks, slot, key, fetch);
                }
                let _ = respond_to.send(Some(slot.snapshot()));
            }
        }
    }

    fn start_fetch(
        query: &str,
        tasks: &mut JoinSet<Completion<Q>>,
        slot: &mut Slot<Q>,
        key: Q::Key,
        fetch: FetchFn<Q>,
    ) {
        slot.state.send_modify(QueryEntry::begin_fetch);
        info!(query, %key, attempt = slot.state.borrow().fetch_count, "Fetch started");

        tasks.spawn(async move {
            // Both the call and the future run in the inner task, so a panic in
            // either becomes an error entry for `key`.
            let result = match tokio::spawn(async move { fetch().await }).await {
                Ok(result) => result,
                Err(e) => Err(Q::fetch_aborted(&e.to_string())),
            };
            (key, result)
        });
    }

    fn complete(&mut self, query: &str, key: Q::Key, result: Result<Q::Data, Q::Error>) {
        let Some(slot) = self.slots.get_mut(&key) else {
            warn!(query, %key, "Completion for unknown key dropped");
            return;
        };

        match &result {
            Ok(_) => info!(query, %key, "Fetch ok"),
            Err(e) => warn!(query, %key, error = %e, "Fetch failed"),
        }
        slot.state.send_modify(|entry| entry.complete(result));
        debug!(query, %key, subscribers = slot.state.receiver_count(), "Broadcast");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{fetch_fn, FetchFuture};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[derive(Debug, Clone)]
    struct Square;

    #[derive(Debug, Clone, thiserror::Error, PartialEq)]
    #[error("square failed: {0}")]
    struct SquareError(String);

    impl Query for Square {
        type Key = u64;
        type Data = u64;
        type Error = SquareError;

        fn fetch_aborted(reason: &str) -> SquareError {
            SquareError(reason.to_string())
        }
    }

    fn counting_fetch(key: u64, calls: Arc<AtomicUsize>, gate: Arc<Notify>) -> FetchFn<Square> {
        fetch_fn::<Square, _, _>(move || {
            let calls = calls.clone();
            let gate = gate.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                Ok(key * key)
            }
        })
    }

    #[tokio::test]
    async fn test_concurrent_gets_share_one_fetch() {
        let (actor, client) = QueryActor::<Square>::new(8);
        tokio::spawn(actor.run());

        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let first = client
            .get(4, counting_fetch(4, calls.clone(), gate.clone()))
            .await
            .unwrap();
        let second = client
            .get(4, counting_fetch(4, calls.clone(), gate.clone()))
            .await
            .unwrap();
        assert_eq!(first.status, QueryStatus::Loading);
        assert_eq!(second.status, QueryStatus::Loading);
        assert_eq!(second.fetch_count, 1);

        let mut sub = client.subscribe(4).await.unwrap();
        gate.notify_one();
        let settled = sub.settled().await.unwrap();

        assert_eq!(settled.data, Some(16));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_settled_entry_is_served_without_refetch() {
        let (actor, client) = QueryActor::<Square>::new(8);
        tokio::spawn(actor.run());

        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());
        gate.notify_one();

        let entry = client
            .fetch(3, counting_fetch(3, calls.clone(), gate.clone()))
            .await
            .unwrap();
        assert_eq!(entry.data, Some(9));

        let again = client
            .get(3, counting_fetch(3, calls.clone(), gate.clone()))
            .await
            .unwrap();
        assert!(again.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_fetch_becomes_error_entry() {
        let (actor, client) = QueryActor::<Square>::new(8);
        tokio::spawn(actor.run());

        let fetch = fetch_fn::<Square, _, _>(|| async {
            let missing: Option<u64> = None;
            Ok(missing.expect("exploded"))
        });
        let entry = client.fetch(1, fetch).await.unwrap();

        assert!(entry.is_error());
        assert!(entry.data.is_none());
    }

    #[tokio::test]
    async fn test_fetch_fn_panicking_before_future_becomes_error_entry() {
        let (actor, client) = QueryActor::<Square>::new(8);
        tokio::spawn(actor.run());

        let fetch: FetchFn<Square> = Arc::new(|| -> FetchFuture<Square> {
            let missing: Option<u64> = None;
            let value = missing.expect("exploded before the future");
            Box::pin(async move { Ok(value) })
        });
        let entry = client.fetch(2, fetch).await.unwrap();
        assert_eq!(entry.status, QueryStatus::Error);
        assert!(entry.data.is_none());

        // The key is not stuck: a retry runs again and settles again.
        let retrying = client.retry(2).await.unwrap().unwrap();
        assert_eq!(retrying.fetch_count, 2);
        let mut sub = client.subscribe(2).await.unwrap();
        let settled = sub.settled().await.unwrap();
        assert_eq!(settled.status, QueryStatus::Error);
        assert_eq!(settled.fetch_count, 2);
    }

    #[tokio::test]
    async fn test_dropped_subscription_does_not_cancel_fetch() {
        let (actor, client) = QueryActor::<Square>::new(8);
        tokio::spawn(actor.run());

        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());
        client
            .get(6, counting_fetch(6, calls.clone(), gate.clone()))
            .await
            .unwrap();
        let sub = client.subscribe(6).await.unwrap();
        drop(sub);

        gate.notify_one();
        let mut late = client.subscribe(6).await.unwrap();
        let settled = late.settled().await.unwrap();
        assert_eq!(settled.status, QueryStatus::Success);
        assert_eq!(settled.data, Some(36));
        assert_eq!(settled.fetch_count, 1);

        let peeked = client.peek(6).await.unwrap().unwrap();
        assert_eq!(peeked.data, Some(36));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refetch_of_unknown_key_is_ignored() {
        let (actor, client) = QueryActor::<Square>::new(8);
        tokio::spawn(actor.run());

        assert!(client.invalidate(42).await.unwrap().is_none());
        assert!(client.peek(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_actor_drains_fetches_after_clients_drop() {
        let (actor, client) = QueryActor::<Square>::new(8);
        let handle = tokio::spawn(actor.run());

        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());
        client
            .get(5, counting_fetch(5, calls.clone(), gate.clone()))
            .await
            .unwrap();
        let mut sub = client.subscribe(5).await.unwrap();
        drop(client);

        gate.notify_one();
        let settled = sub.settled().await.unwrap();
        assert_eq!(settled.data, Some(25));
        handle.await.unwrap();
    }
}
