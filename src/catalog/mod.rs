//! # Catalog
//!
//! Typed, cached access to the remote product catalog.
//!
//! ## Structure
//!
//! - [`query`] - [`CatalogKey`] and the two query families, [`ProductList`] and [`ProductDetail`]
//! - [`source`] - [`ProductSource`] and the `reqwest`-backed [`HttpProductSource`]
//! - [`client`] - [`CatalogClient`], the API used by the presentation layer
//! - [`error`] - [`CatalogError`], the failure classification stored in cache entries
//! - [`mock`] - [`MockProductSource`](mock::MockProductSource) for tests
//! - [`new()`] - Factory function that creates the cache actors and the client
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (list_actor, detail_actor, catalog) = catalog::new(source, 32);
//! tokio::spawn(list_actor.run());
//! tokio::spawn(detail_actor.run());
//!
//! let entry = catalog.load_product(ProductId(5)).await?;
//! match entry.into_result() {
//!     Some(Ok(product)) => println!("{}", product.title),
//!     Some(Err(e)) => eprintln!("{e}"),
//!     None => unreachable!("load_product waits for a settled entry"),
//! }
//! ```

pub mod client;
pub mod error;
pub mod mock;
pub mod query;
pub mod source;

pub use client::*;
pub use error::*;
pub use query::*;
pub use source::*;

use crate::query::QueryActor;
use std::sync::Arc;

/// Creates the list and detail cache actors and a client wired to both.
pub fn new(
    source: Arc<dyn ProductSource>,
    buffer_size: usize,
) -> (QueryActor<ProductList>, QueryActor<ProductDetail>, CatalogClient) {
    let (list_actor, lists) = QueryActor::new(buffer_size);
    let (detail_actor, products) = QueryActor::new(buffer_size);
    let client = CatalogClient::new(source, lists, products);

    (list_actor, detail_actor, client)
}
