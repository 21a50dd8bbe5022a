//! # Catalog Client
//!
//! Provides the typed catalog API used by the presentation layer. It wraps two
//! [`QueryClient`]s (list and detail) and builds the fetch functions that call the
//! [`ProductSource`].
use crate::catalog::{CatalogError, CatalogKey, ProductDetail, ProductList, ProductSource};
use crate::model::ProductId;
use crate::query::{fetch_fn, FetchFn, QueryClient, QueryEntry, QuerySubscription};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for reading the catalog through the cache.
#[derive(Clone)]
pub struct CatalogClient {
    source: Arc<dyn ProductSource>,
    lists: QueryClient<ProductList>,
    products: QueryClient<ProductDetail>,
}

impl CatalogClient {
    pub fn new(
        source: Arc<dyn ProductSource>,
        lists: QueryClient<ProductList>,
        products: QueryClient<ProductDetail>,
    ) -> Self {
        Self {
            source,
            lists,
            products,
        }
    }

    fn list_fetch(&self) -> FetchFn<ProductList> {
        let source = self.source.clone();
        fetch_fn::<ProductList, _, _>(move || {
            let source = source.clone();
            async move { source.fetch_products().await }
        })
    }

    fn product_fetch(&self, id: ProductId) -> FetchFn<ProductDetail> {
        let source = self.source.clone();
        fetch_fn::<ProductDetail, _, _>(move || {
            let source = source.clone();
            async move { source.fetch_product(id).await }
        })
    }

    /// Current entry for the product list, starting the fetch on first use.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<QueryEntry<ProductList>, CatalogError> {
        debug!("Sending request");
        Ok(self.lists.get(CatalogKey::Products, self.list_fetch()).await?)
    }

    /// Current entry for one product, starting the fetch on first use.
    #[instrument(skip(self))]
    pub async fn get_product(
        &self,
        id: ProductId,
    ) -> Result<QueryEntry<ProductDetail>, CatalogError> {
        debug!("Sending request");
        Ok(self
            .products
            .get(CatalogKey::Product(id), self.product_fetch(id))
            .await?)
    }

    /// Like [`list_products`](Self::list_products) but waits for the settled entry.
    #[instrument(skip(self))]
    pub async fn load_products(&self) -> Result<QueryEntry<ProductList>, CatalogError> {
        debug!("Sending request");
        Ok(self.lists.fetch(CatalogKey::Products, self.list_fetch()).await?)
    }

    /// Like [`get_product`](Self::get_product) but waits for the settled entry.
    #[instrument(skip(self))]
    pub async fn load_product(
        &self,
        id: ProductId,
    ) -> Result<QueryEntry<ProductDetail>, CatalogError> {
        debug!("Sending request");
        Ok(self
            .products
            .fetch(CatalogKey::Product(id), self.product_fetch(id))
            .await?)
    }

    pub async fn subscribe_products(&self) -> Result<QuerySubscription<ProductList>, CatalogError> {
        Ok(self.lists.subscribe(CatalogKey::Products).await?)
    }

    pub async fn subscribe_product(
        &self,
        id: ProductId,
    ) -> Result<QuerySubscription<ProductDetail>, CatalogError> {
        Ok(self.products.subscribe(CatalogKey::Product(id)).await?)
    }

    /// Re-runs the list fetch after a failure. `None` if the list was never requested.
    pub async fn retry_products(&self) -> Result<Option<QueryEntry<ProductList>>, CatalogError> {
        Ok(self.lists.retry(CatalogKey::Products).await?)
    }

    pub async fn retry_product(
        &self,
        id: ProductId,
    ) -> Result<Option<QueryEntry<ProductDetail>>, CatalogError> {
        Ok(self.products.retry(CatalogKey::Product(id)).await?)
    }

    pub async fn invalidate_products(
        &self,
    ) -> Result<Option<QueryEntry<ProductList>>, CatalogError> {
        Ok(self.lists.invalidate(CatalogKey::Products).await?)
    }

    pub async fn invalidate_product(
        &self,
        id: ProductId,
    ) -> Result<Option<QueryEntry<ProductDetail>>, CatalogError> {
        Ok(self.products.invalidate(CatalogKey::Product(id)).await?)
    }
}
