//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber used by the demo binary.
//! Library code only emits events; it never installs a subscriber itself.
//!
//! ## Configuration
//!
//! Log levels come from `RUST_LOG`. The output uses the compact format and hides the
//! module path (`with_target(false)`): every event already carries a `query` or
//! `product_id` field that says where it came from.
//!
//! ```bash
//! # Cache lifecycle and fetch results
//! RUST_LOG=info cargo run
//!
//! # Plus every cache request and cart mutation
//! RUST_LOG=debug cargo run
//!
//! # Only the cache actors
//! RUST_LOG=storefront_core::query=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Cache actors**: startup, fetch start/finish per key, shutdown with the number of
//!   cached entries
//! - **Catalog client**: one span per call (`get_product{id=ProductId(5)}`), with the request
//!   logged at `debug`
//! - **HTTP source**: status and body size of each response
//! - **Cart**: every mutation at `debug`, with the product id and resulting quantity
//!
//! With `RUST_LOG=info` a cold product load looks like:
//!
//! ```text
//! INFO Query actor started query="ProductDetail"
//! INFO Fetch started query="ProductDetail" key=product/5 attempt=1
//! INFO Fetch ok query="ProductDetail" key=product/5
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Call once, at the start of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
