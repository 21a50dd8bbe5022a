//! # Cache Messages
//!
//! The request type sent from a [`QueryClient`](crate::query::QueryClient) to its
//! [`QueryActor`](crate::query::QueryActor).

use crate::query::{FetchFn, Query, QueryEntry};
use tokio::sync::{oneshot, watch};

/// Type alias for the one-shot response channel used by the cache actor.
pub type Response<T> = oneshot::Sender<T>;

/// Requests understood by the cache actor.
///
/// - **Get**: return the entry, starting `fetch` when the key has never been fetched.
/// - **Peek**: return the entry if one exists, without side effects.
/// - **Subscribe**: hand out a watch receiver for the key (creates an idle entry).
/// - **Refetch**: the invalidate/retry path; re-runs the stored fetch function.
pub enum QueryRequest<Q: Query> {
    Get {
        key: Q::Key,
        fetch: FetchFn<Q>,
        respond_to: Response<QueryEntry<Q>>,
    },
    Peek {
        key: Q::Key,
        respond_to: Response<Option<QueryEntry<Q>>>,
    },
    Subscribe {
        key: Q::Key,
        respond_to: Response<watch::Receiver<QueryEntry<Q>>>,
    },
    Refetch {
        key: Q::Key,
        respond_to: Response<Option<QueryEntry<Q>>>,
    },
}

impl<Q: Query> std::fmt::Debug for QueryRequest<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (op, key) = match self {
            QueryRequest::Get { key, .. } => ("Get", key),
            QueryRequest::Peek { key, .. } => ("Peek", key),
            QueryRequest::Subscribe { key, .. } => ("Subscribe", key),
            QueryRequest::Refetch { key, .. } => ("Refetch", key),
        };
        f.debug_struct(op).field("key", key).finish()
    }
}
