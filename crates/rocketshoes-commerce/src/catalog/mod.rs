//! Product catalog module.
//!
//! Contains product and stock types and the read-only catalog service.

mod inventory;
mod memory;
mod product;
mod service;

pub use inventory::Stock;
pub use memory::InMemoryCatalog;
pub use product::{Product, ProductDetails};
pub use service::{CatalogService, HttpCatalog};
