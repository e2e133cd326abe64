//! Stock levels reported by the catalog.

use crate::error::CartError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Available quantity for a product (`GET stock/:id`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stock {
    /// Echoed product id; the endpoint may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    /// Units available.
    pub amount: u32,
}

impl Stock {
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self {
            id: Some(id),
            amount,
        }
    }

    /// Check if a specific quantity is available.
    pub fn can_fulfill(&self, requested: u32) -> bool {
        requested <= self.amount
    }

    /// Fail with [`CartError::OutOfStock`] unless `requested` units are available.
    pub fn ensure_available(&self, product_id: ProductId, requested: u32) -> Result<(), CartError> {
        if self.can_fulfill(requested) {
            return Ok(());
        }
        Err(CartError::OutOfStock {
            product_id,
            requested: i64::from(requested),
            available: i64::from(self.amount),
        })
    }
}
