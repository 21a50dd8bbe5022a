//! # Product Sources
//!
//! Where catalog data actually comes from. [`HttpProductSource`] talks to the remote
//! JSON API and classifies every failure into a [`CatalogError`].

use crate::catalog::CatalogError;
use crate::lifecycle::StorefrontConfig;
use crate::model::{Product, ProductId, ProductPage};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

/// Remote access to the catalog.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch every product.
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Fetch one product by id.
    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError>;
}

/// [`ProductSource`] backed by `reqwest`.
///
/// Timeout policy belongs here: the cache itself never gives up on a fetch.
#[derive(Debug, Clone)]
pub struct HttpProductSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpProductSource {
    pub fn new(config: &StorefrontConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        self.base_url
            .join(path)
            .map_err(|e| CatalogError::Transport(format!("invalid url for {path}: {e}")))
    }

    /// GET `url` and decode the body, mapping 404 to `NotFound` when `id` is given.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        id: Option<ProductId>,
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match id {
                Some(id) if status == StatusCode::NOT_FOUND => CatalogError::NotFound { id },
                _ => CatalogError::HttpStatus {
                    status: status.as_u16(),
                },
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        debug!(%status, bytes = body.len(), "Response received");

        serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let url = self.endpoint("products")?;
        let page: ProductPage = self.get_json(url, None).await?;
        Ok(page.products)
    }

    #[instrument(skip(self))]
    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        self.get_json(url, Some(id)).await
    }
}
