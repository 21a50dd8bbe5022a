use crate::cart::CartStore;
use crate::catalog::{CatalogClient, HttpProductSource, ProductSource};
use crate::lifecycle::{ConfigError, StorefrontConfig};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Errors from starting or stopping a [`Storefront`].
#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Actor task failed: {0}")]
    ActorFailed(String),
}

/// The application state container.
///
/// `Storefront` is constructed once at startup and passed by reference to whatever
/// renders the UI. It is responsible for:
/// - **Lifecycle Management**: spawning the list and detail cache actors and stopping them
/// - **Dependency Wiring**: connecting the [`CatalogClient`] to its [`ProductSource`]
/// - **Local State**: owning the [`CartStore`]
///
/// # Example
///
/// ```ignore
/// let mut storefront = Storefront::new(StorefrontConfig::from_env()?)?;
///
/// let entry = storefront.catalog.load_product(ProductId(5)).await?;
/// if let Some(product) = entry.data {
///     storefront.cart.add_to_cart(&product);
/// }
///
/// storefront.shutdown().await?;
/// ```
pub struct Storefront {
    /// Cached access to the remote catalog.
    pub catalog: CatalogClient,

    /// The shopping cart. Mutated directly; no actor involved.
    pub cart: CartStore,

    /// Cache actor tasks, awaited on shutdown.
    handles: Vec<JoinHandle<()>>,
}

impl Storefront {
    /// Builds the HTTP source from `config` and starts the cache actors.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: StorefrontConfig) -> Result<Self, StorefrontError> {
        let source = HttpProductSource::new(&config)?;
        info!(base_url = %source.base_url(), "Catalog source ready");
        Ok(Self::with_source(Arc::new(source), config.channel_capacity))
    }

    /// Starts the cache actors over an arbitrary source.
    pub fn with_source(source: Arc<dyn ProductSource>, channel_capacity: usize) -> Self {
        let (list_actor, detail_actor, catalog) = crate::catalog::new(source, channel_capacity);

        let list_handle = tokio::spawn(list_actor.run());
        let detail_handle = tokio::spawn(detail_actor.run());

        Self {
            catalog,
            cart: CartStore::new(),
            handles: vec![list_handle, detail_handle],
        }
    }

    /// Gracefully shuts down the cache actors.
    ///
    /// Dropping the catalog client closes the request channels. Each actor then
    /// finishes the fetches it already started and exits. Clones of the catalog
    /// client handed out earlier keep their actor alive until they are dropped too.
    pub async fn shutdown(self) -> Result<(), StorefrontError> {
        info!(cart_lines = self.cart.len(), "Shutting down storefront...");

        drop(self.catalog);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(StorefrontError::ActorFailed(e.to_string()));
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::MockProductSource;
    use crate::model::{Product, ProductId};

    #[tokio::test]
    async fn test_storefront_wires_catalog_and_cart() {
        let source = Arc::new(MockProductSource::new());
        source
            .expect_product(ProductId(1))
            .return_ok(Product::new(1, "Mug", 10.0));

        let mut storefront = Storefront::with_source(source.clone(), 8);

        let entry = storefront.catalog.load_product(ProductId(1)).await.unwrap();
        storefront.cart.add_to_cart(entry.data.as_ref().unwrap());
        assert_eq!(storefront.cart.count(), 1);
        assert_eq!(storefront.cart.total(), 10.0);

        storefront.shutdown().await.unwrap();
        source.verify();
    }

    #[tokio::test]
    async fn test_new_from_default_config() {
        // Building the reqwest client does not touch the network.
        let storefront = Storefront::new(StorefrontConfig::default()).unwrap();
        assert!(storefront.cart.is_empty());
        storefront.shutdown().await.unwrap();
    }
}
