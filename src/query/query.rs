//! # Query Trait
//!
//! The `Query` trait describes one family of cacheable remote reads (for example
//! "the product list" or "a product by id"). It fixes the key, result and error types
//! so that a [`QueryActor`](crate::query::QueryActor) can be written once and reused
//! for every kind of query.
//!
//! A `ProductList` cache accepts only `ProductList` keys and fetch functions, and the
//! compiler rejects a fetch function that returns the wrong data type.

use std::fmt::{Debug, Display};
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::Arc;

/// Trait implemented by a marker type for every cached query family.
pub trait Query: Clone + Debug + Send + Sync + 'static {
    /// Identifies a single fetchable query (e.g. the catalog list, or product 5).
    type Key: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// The value produced by a successful fetch.
    type Data: Clone + Send + Sync + Debug + 'static;

    /// The classified failure produced by an unsuccessful fetch.
    ///
    /// It must be `Clone` because the same failure is handed to every subscriber.
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    /// Builds the error recorded when a fetch task dies without producing a result
    /// (for example a panic inside the fetch function).
    fn fetch_aborted(reason: &str) -> Self::Error;
}

/// Boxed future returned by a fetch function.
pub type FetchFuture<Q> =
    Pin<Box<dyn Future<Output = Result<<Q as Query>::Data, <Q as Query>::Error>> + Send>>;

/// A re-invocable fetch function.
///
/// The cache keeps it alongside the entry so `invalidate`/`retry` can run it again.
pub type FetchFn<Q> = Arc<dyn Fn() -> FetchFuture<Q> + Send + Sync>;

/// Wraps an async closure into a [`FetchFn`].
///
/// ```rust,ignore
/// let source = source.clone();
/// let fetch = fetch_fn::<ProductDetail, _, _>(move || {
///     let source = source.clone();
///     async move { source.fetch_product(id).await }
/// });
/// ```
pub fn fetch_fn<Q, F, Fut>(f: F) -> FetchFn<Q>
where
    Q: Query,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Q::Data, Q::Error>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()) as FetchFuture<Q>)
}
