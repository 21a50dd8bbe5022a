//! Startup, configuration and shutdown.
//!
//! - [`Storefront`] - the state container that owns the cache actors, the catalog
//!   client and the cart
//! - [`StorefrontConfig`] - environment-driven settings
//! - [`setup_tracing`] - installs the logging subscriber for binaries

pub mod config;
pub mod storefront;
pub mod tracing;

pub use config::*;
pub use storefront::*;
pub use self::tracing::setup_tracing;
