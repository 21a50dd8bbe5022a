//! Cache keys and query families for the catalog.

use crate::catalog::CatalogError;
use crate::model::{Product, ProductId};
use crate::query::Query;
use std::fmt;

/// Identifies one catalog read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKey {
    /// The full product list.
    Products,
    /// A single product by id.
    Product(ProductId),
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKey::Products => f.write_str("products"),
            CatalogKey::Product(id) => write!(f, "product/{id}"),
        }
    }
}

/// `GET /products`
#[derive(Debug, Clone, Copy)]
pub struct ProductList;

impl Query for ProductList {
    type Key = CatalogKey;
    type Data = Vec<Product>;
    type Error = CatalogError;

    fn fetch_aborted(reason: &str) -> CatalogError {
        CatalogError::Transport(format!("fetch aborted: {reason}"))
    }
}

/// `GET /products/{id}`
#[derive(Debug, Clone, Copy)]
pub struct ProductDetail;

impl Query for ProductDetail {
    type Key = CatalogKey;
    type Data = Product;
    type Error = CatalogError;

    fn fetch_aborted(reason: &str) -> CatalogError {
        CatalogError::Transport(format!("fetch aborted: {reason}"))
    }
}
