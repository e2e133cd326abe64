//! The cart collection.

use crate::catalog::Product;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Ordered list of products, unique by id, each held with a positive amount.
///
/// Serializes as a bare JSON array of [`Product`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored products.
    ///
    /// Entries with a zero amount and repeated ids are dropped; the first
    /// occurrence of an id wins.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut cart = Self::new();
        for product in products {
            if product.amount == 0 {
                tracing::warn!(product_id = %product.id, "dropping cart entry with zero amount");
                continue;
            }
            if cart.contains(product.id) {
                tracing::warn!(product_id = %product.id, "dropping duplicate cart entry");
                continue;
            }
            cart.items.push(product);
        }
        cart
    }

    /// Products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.items.iter()
    }

    /// Get a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Append a product that is not yet in the cart.
    pub fn insert(&mut self, product: Product) -> Result<(), CartError> {
        if product.amount == 0 {
            return Err(CartError::InvalidAmount(0));
        }
        if self.contains(product.id) {
            return Err(CartError::DuplicateItem(product.id));
        }
        self.items.push(product);
        Ok(())
    }

    /// Set the amount of a product already in the cart, keeping its position.
    pub fn set_amount(&mut self, id: ProductId, amount: u32) -> Result<(), CartError> {
        if amount == 0 {
            return Err(CartError::InvalidAmount(0));
        }
        let product = self
            .items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CartError::ItemNotInCart(id))?;
        product.amount = amount;
        Ok(())
    }

    /// Remove a product. Returns whether it was present.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|p| p.id != id);
        self.items.len() < len_before
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all amounts.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|p| u64::from(p.amount)).sum()
    }

    /// Sum of all product subtotals.
    pub fn total(&self) -> Money {
        self.items.iter().map(Product::subtotal).sum()
    }
}

impl From<Vec<Product>> for Cart {
    fn from(products: Vec<Product>) -> Self {
        Self::from_products(products)
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
