//! # Query Entries
//!
//! The per-key state held by the cache and broadcast to subscribers.

use crate::query::Query;
use std::fmt;

/// Lifecycle of a cache entry.
///
/// `Idle -> Loading -> {Success, Error}`. Leaving `Success` or `Error` requires an
/// explicit invalidate or retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

impl QueryStatus {
    /// True once a fetch has produced either data or an error.
    pub fn is_settled(self) -> bool {
        matches!(self, QueryStatus::Success | QueryStatus::Error)
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QueryStatus::Idle => "idle",
            QueryStatus::Loading => "loading",
            QueryStatus::Success => "success",
            QueryStatus::Error => "error",
        };
        f.write_str(label)
    }
}

/// Snapshot of the cached state for one key.
#[derive(Debug, Clone)]
pub struct QueryEntry<Q: Query> {
    pub key: Q::Key,
    pub status: QueryStatus,
    pub data: Option<Q::Data>,
    pub error: Option<Q::Error>,
    /// Number of fetches started for this key since the entry was created.
    pub fetch_count: u32,
}

impl<Q: Query> QueryEntry<Q> {
    pub(crate) fn idle(key: Q::Key) -> Self {
        Self {
            key,
            status: QueryStatus::Idle,
            data: None,
            error: None,
            fetch_count: 0,
        }
    }

    /// Whether a fetch for this key is outstanding.
    pub fn in_flight(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// Consumes the entry into a plain `Result`, or `None` while not settled.
    pub fn into_result(self) -> Option<Result<Q::Data, Q::Error>> {
        match self.status {
            QueryStatus::Success => self.data.map(Ok),
            QueryStatus::Error => self.error.map(Err),
            QueryStatus::Idle | QueryStatus::Loading => None,
        }
    }

    // Keeps prior data/error visible while the refetch runs.
    pub(crate) fn begin_fetch(&mut self) {
        self.status = QueryStatus::Loading;
        self.fetch_count += 1;
    }

    pub(crate) fn complete(&mut self, result: Result<Q::Data, Q::Error>) {
        match result {
            Ok(data) => {
                self.status = QueryStatus::Success;
                self.data = Some(data);
                self.error = None;
            }
            Err(error) => {
                self.status = QueryStatus::Error;
                self.data = None;
                self.error = Some(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Echo;

    #[derive(Debug, Clone, thiserror::Error, PartialEq)]
    #[error("echo failed: {0}")]
    struct EchoError(String);

    impl Query for Echo {
        type Key = u32;
        type Data = String;
        type Error = EchoError;

        fn fetch_aborted(reason: &str) -> EchoError {
            EchoError(reason.to_string())
        }
    }

    #[test]
    fn test_refetch_keeps_previous_data_until_completion() {
        let mut entry = QueryEntry::<Echo>::idle(1);
        entry.begin_fetch();
        entry.complete(Ok("first".into()));

        entry.begin_fetch();
        assert!(entry.in_flight());
        assert_eq!(entry.data.as_deref(), Some("first"));
        assert_eq!(entry.fetch_count, 2);

        entry.complete(Err(EchoError("boom".into())));
        assert!(entry.is_error());
        assert!(entry.data.is_none());
        assert_eq!(entry.into_result(), Some(Err(EchoError("boom".into()))));
    }

    #[test]
    fn test_success_clears_error() {
        let mut entry = QueryEntry::<Echo>::idle(7);
        entry.begin_fetch();
        entry.complete(Err(EchoError("down".into())));
        entry.begin_fetch();
        entry.complete(Ok("up".into()));

        assert!(entry.is_success());
        assert!(entry.error.is_none());
        assert_eq!(entry.status.to_string(), "success");
    }

    #[test]
    fn test_unsettled_entry_has_no_result() {
        let entry = QueryEntry::<Echo>::idle(3);
        assert!(!entry.status.is_settled());
        assert!(entry.into_result().is_none());
    }
}
