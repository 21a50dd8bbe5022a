//! Error types for the catalog.

use crate::model::ProductId;
use crate::query::CacheError;
use thiserror::Error;

/// Classified catalog failures.
///
/// The fetch variants (`Transport`, `HttpStatus`, `Decode`, `NotFound`) are what a
/// [`QueryEntry`](crate::query::QueryEntry) carries in its `error` field, shared by
/// every subscriber of the key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No response was received (connection refused, DNS, timeout, broken body).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response arrived with a status outside 2xx.
    #[error("HTTP status {status}")]
    HttpStatus { status: u16 },

    /// The response body did not match the expected product shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The catalog has no product with this id.
    #[error("Product not found: {id}")]
    NotFound { id: ProductId },

    /// The cache actor could not be reached.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

impl From<CacheError> for CatalogError {
    fn from(e: CacheError) -> Self {
        CatalogError::CacheUnavailable(e.to_string())
    }
}
