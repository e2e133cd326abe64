//! Product types.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product as the catalog describes it (`GET products/:id`).
///
/// Fields the storefront does not use are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDetails {
    pub id: ProductId,
    pub title: String,
    /// Unit price in reais.
    pub price: f64,
    /// Image URL.
    pub image: String,
}

impl ProductDetails {
    pub fn new(id: ProductId, title: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
        }
    }

    /// Turn catalog details into a cart entry holding `amount` units.
    pub fn into_cart_product(self, amount: u32) -> Product {
        Product {
            id: self.id,
            title: self.title,
            price: self.price,
            image: self.image,
            amount,
        }
    }
}

/// A product held in the cart.
///
/// This is the exact shape persisted under the cart storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price in reais.
    pub price: f64,
    /// Image URL.
    pub image: String,
    /// Quantity held in the cart.
    pub amount: u32,
}

impl Product {
    /// Unit price as money.
    pub fn unit_price(&self) -> Money {
        Money::from_decimal(self.price)
    }

    /// Unit price times amount.
    pub fn subtotal(&self) -> Money {
        self.unit_price() * self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_ignore_unknown_fields() {
        let json = r#"{"id": 1, "title": "Tênis de Caminhada Leve Confortável", "price": 179.9,
            "image": "https://example.com/1.jpg", "brand": "ignored"}"#;
        let details: ProductDetails = serde_json::from_str(json).unwrap();

        assert_eq!(details.id, ProductId::new(1));
        assert_eq!(details.price, 179.9);
    }

    #[test]
    fn test_into_cart_product() {
        let product = ProductDetails::new(ProductId::new(2), "Tênis VR Caminhada", 139.9, "img")
            .into_cart_product(1);

        assert_eq!(product.amount, 1);
        assert_eq!(product.title, "Tênis VR Caminhada");
    }

    #[test]
    fn test_cart_product_wire_shape() {
        let product = ProductDetails::new(ProductId::new(3), "Tênis", 10.5, "img").into_cart_product(2);
        let json = serde_json::to_string(&product).unwrap();

        assert_eq!(
            json,
            r#"{"id":3,"title":"Tênis","price":10.5,"image":"img","amount":2}"#
        );
    }

    #[test]
    fn test_subtotal() {
        let product = ProductDetails::new(ProductId::new(1), "Tênis", 179.9, "img").into_cart_product(3);
        assert_eq!(product.subtotal(), Money::new(53970));
    }
}
