//! # Cache Errors
//!
//! Errors raised by the cache plumbing itself. Fetch failures are never reported
//! here: they live in [`QueryEntry::error`](crate::query::QueryEntry::error).

/// Errors that can occur while talking to a [`QueryActor`](crate::query::QueryActor).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Query actor closed")]
    ActorClosed,
    #[error("Query actor dropped response channel")]
    ActorDropped,
}
