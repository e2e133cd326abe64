//! Catalog service port and its HTTP implementation.

use std::sync::Arc;

use async_trait::async_trait;
use rocketshoes_data::{FetchClient, FetchError};

use crate::catalog::{ProductDetails, Stock};
use crate::ids::ProductId;

/// Read-only access to product details and stock levels.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch a product's details.
    async fn product(&self, id: ProductId) -> Result<ProductDetails, FetchError>;

    /// Fetch a product's available stock.
    async fn stock(&self, id: ProductId) -> Result<Stock, FetchError>;
}

#[async_trait]
impl<C: CatalogService + ?Sized> CatalogService for Arc<C> {
    async fn product(&self, id: ProductId) -> Result<ProductDetails, FetchError> {
        (**self).product(id).await
    }

    async fn stock(&self, id: ProductId) -> Result<Stock, FetchError> {
        (**self).stock(id).await
    }
}

/// Catalog backed by the storefront API (`products/:id`, `stock/:id`).
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: FetchClient,
}

impl HttpCatalog {
    /// Use an already configured client; relative paths resolve against its base URL.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    /// Create a catalog for the API at `base_url` with default client settings.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(FetchClient::new().with_base_url(base_url))
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn product(&self, id: ProductId) -> Result<ProductDetails, FetchError> {
        self.client.get_json(format!("products/{id}")).await
    }

    async fn stock(&self, id: ProductId) -> Result<Stock, FetchError> {
        self.client.get_json(format!("stock/{id}")).await
    }
}
