//! Shopping cart state for the RocketShoes storefront.
//!
//! This crate provides:
//!
//! - **Catalog**: product details, stock levels and the read-only
//!   [`CatalogService`](catalog::CatalogService) behind `products/:id` and `stock/:id`
//! - **Cart**: the [`Cart`] collection and the [`CartStore`] that adds,
//!   removes and re-quantifies products, persisting after every change
//! - **Notifications**: toasts shown to the user when an operation fails
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cache::FileStore;
//! use rocketshoes_commerce::prelude::*;
//!
//! let catalog = HttpCatalog::with_base_url("http://localhost:3333");
//! let storage = FileStore::open(".rocketshoes/storage.json")?;
//! let mut store = CartStore::load(catalog, storage, TracingNotifier);
//!
//! store.add_product(ProductId::new(1)).await;
//! store
//!     .update_product_amount(UpdateProductAmount::new(ProductId::new(1), 2))
//!     .await;
//! println!("Total: {}", store.total());
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod notify;

pub mod cart;
pub mod catalog;

pub use cart::{Cart, CartOutcome, CartStore, UpdateProductAmount, CART_STORAGE_KEY};
pub use error::CartError;
pub use ids::ProductId;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{
        CatalogService, HttpCatalog, InMemoryCatalog, Product, ProductDetails, Stock,
    };

    // Cart
    pub use crate::cart::{Cart, CartOutcome, CartStore, UpdateProductAmount, CART_STORAGE_KEY};

    // Notifications
    pub use crate::notify::{messages, Notifier, RecordingNotifier, Toast, ToastKind, TracingNotifier};
}
