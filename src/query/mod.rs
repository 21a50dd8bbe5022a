//! Keyed asynchronous fetch cache.
//!
//! This module provides the building blocks for caching remote reads by key, with
//! in-flight deduplication and change notification.
//!
//! # Main Components
//!
//! - [`Query`] - Trait that fixes the key, data and error types of a query family
//! - [`QueryActor`] - The actor that owns the entries and runs fetches
//! - [`QueryClient`] - Cloneable handle used to get, subscribe, invalidate and retry
//! - [`QueryEntry`] / [`QueryStatus`] - The per-key state observed by consumers
//! - [`CacheError`] - Channel failures between client and actor
//!
//! # Testing
//!
//! See [`mock`] for utilities to test code on top of a client without a running actor.

pub mod actor;
pub mod client;
pub mod entry;
pub mod error;
pub mod message;
pub mod mock;
#[allow(clippy::module_inception)]
pub mod query;

// Re-export core types for convenience
pub use actor::QueryActor;
pub use client::{QueryClient, QuerySubscription};
pub use entry::{QueryEntry, QueryStatus};
pub use error::CacheError;
pub use message::{QueryRequest, Response};
pub use query::{fetch_fn, FetchFn, FetchFuture, Query};
