//! # Cart
//!
//! Local selection state: line items merged by product id, with derived count and
//! total. See [`CartStore`].

pub mod store;

pub use store::*;
