//! Commerce error types.

use rocketshoes_cache::CacheError;
use rocketshoes_data::FetchError;
use thiserror::Error;

use crate::ids::ProductId;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// The catalog or stock endpoint could not be read.
    #[error("Catalog request failed: {0}")]
    Catalog(#[from] FetchError),

    /// The cart could not be read from or written to storage.
    #[error("Storage error: {0}")]
    Storage(#[from] CacheError),

    /// Requested amount exceeds available stock.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Item not in cart.
    #[error("Product not in cart: {0}")]
    ItemNotInCart(ProductId),

    /// Item already in cart.
    #[error("Product already in cart: {0}")]
    DuplicateItem(ProductId),

    /// Amounts held in the cart must be positive.
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),
}
