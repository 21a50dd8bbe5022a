//! # Storefront Core
//!
//! The non-UI core of a product catalog app: a keyed query cache, a typed catalog
//! client over a remote JSON API, and a local shopping cart.
//!
//! ## Design
//!
//! ### 1. One actor per query family
//! [`QueryActor<Q>`](query::QueryActor) exclusively owns the key → entry map for one
//! family of queries (the product list, product details). Requests arrive over an
//! `mpsc` channel and are handled one at a time, so no locks guard the cache. Fetches
//! run as separate tasks and report back to the actor, which is what lets concurrent
//! requests for the same key share a single network call.
//!
//! ### 2. Results are values, not exceptions
//! A failed fetch is stored in the entry (`status = Error`, `error = Some(..)`) and
//! broadcast to every subscriber of that key. Nothing is retried automatically; the
//! caller decides when to call `retry` or `invalidate`.
//!
//! ### 3. Typed errors per component
//! [`CacheError`](query::CacheError), [`CatalogError`](catalog::CatalogError),
//! [`ConfigError`](lifecycle::ConfigError) and
//! [`StorefrontError`](lifecycle::StorefrontError) are `thiserror` enums. Conversions
//! between them are `From` impls so `?` works across layers.
//!
//! ### 4. Synchronous cart
//! [`CartStore`](cart::CartStore) is plain data behind `&mut self`. It never awaits and
//! never fails.
//!
//! ## Module Tour
//!
//! - [`query`] - the generic cache engine: [`Query`](query::Query), the actor, its
//!   client and subscriptions, plus a mock client for tests
//! - [`catalog`] - catalog keys, the `reqwest` source and [`CatalogClient`](catalog::CatalogClient)
//! - [`cart`] - [`CartStore`](cart::CartStore)
//! - [`model`] - [`Product`](model::Product), [`CartItem`](model::CartItem) and the wire shapes
//! - [`lifecycle`] - [`Storefront`](lifecycle::Storefront), configuration and tracing setup
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the demo against the public catalog
//! RUST_LOG=info cargo run
//!
//! # Point it somewhere else
//! CATALOG_BASE_URL=http://localhost:8080 CATALOG_TIMEOUT_SECS=5 cargo run
//! ```

pub mod cart;
pub mod catalog;
pub mod lifecycle;
pub mod model;
pub mod query;
