//! In-memory catalog.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use rocketshoes_data::FetchError;

use crate::catalog::{CatalogService, ProductDetails, Stock};
use crate::ids::ProductId;

/// Catalog held in process memory.
///
/// Unknown ids answer like the API does, with a 404. The catalog can be
/// switched offline to make every lookup fail with a request error.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, ProductDetails>>,
    stock: RwLock<HashMap<ProductId, u32>>,
    offline: AtomicBool,
    product_requests: AtomicUsize,
    stock_requests: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with its stock level.
    pub fn with_product(self, details: ProductDetails, stock: u32) -> Self {
        self.insert(details, stock);
        self
    }

    /// Add or replace a product with its stock level.
    pub fn insert(&self, details: ProductDetails, stock: u32) {
        let id = details.id;
        if let Ok(mut products) = self.products.write() {
            products.insert(id, details);
        }
        self.set_stock(id, stock);
    }

    /// Change the stock level of a product.
    pub fn set_stock(&self, id: ProductId, amount: u32) {
        if let Ok(mut stock) = self.stock.write() {
            stock.insert(id, amount);
        }
    }

    /// Make every lookup fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `product` lookups served so far.
    pub fn product_requests(&self) -> usize {
        self.product_requests.load(Ordering::SeqCst)
    }

    /// Number of `stock` lookups served so far.
    pub fn stock_requests(&self) -> usize {
        self.stock_requests.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), FetchError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::RequestError("catalog offline".to_string()));
        }
        Ok(())
    }
}

fn not_found(path: &str, id: ProductId) -> FetchError {
    FetchError::HttpError {
        status: 404,
        message: format!("{path}/{id} not found"),
    }
}

fn poisoned<T>(_: T) -> FetchError {
    FetchError::RequestError("catalog lock poisoned".to_string())
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn product(&self, id: ProductId) -> Result<ProductDetails, FetchError> {
        self.product_requests.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.products
            .read()
            .map_err(poisoned)?
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("products", id))
    }

    async fn stock(&self, id: ProductId) -> Result<Stock, FetchError> {
        self.stock_requests.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.stock
            .read()
            .map_err(poisoned)?
            .get(&id)
            .map(|amount| Stock::new(id, *amount))
            .ok_or_else(|| not_found("stock", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sneaker(id: u64) -> ProductDetails {
        ProductDetails::new(ProductId::new(id), format!("Tênis {id}"), 99.9, "img")
    }

    #[tokio::test]
    async fn test_lookup_seeded_product() {
        let catalog = InMemoryCatalog::new().with_product(sneaker(1), 4);

        let product = catalog.product(ProductId::new(1)).await.unwrap();
        let stock = catalog.stock(ProductId::new(1)).await.unwrap();

        assert_eq!(product.title, "Tênis 1");
        assert_eq!(stock.amount, 4);
        assert_eq!(catalog.product_requests(), 1);
        assert_eq!(catalog.stock_requests(), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let catalog = InMemoryCatalog::new();
        let err = catalog.stock(ProductId::new(9)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_offline_fails_requests() {
        let catalog = InMemoryCatalog::new().with_product(sneaker(1), 4);
        catalog.set_offline(true);

        let err = catalog.product(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, FetchError::RequestError(_)));

        catalog.set_offline(false);
        assert!(catalog.product(ProductId::new(1)).await.is_ok());
    }
}
