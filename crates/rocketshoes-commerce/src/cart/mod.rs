//! Shopping cart module.
//!
//! Contains the cart collection and the store that keeps it in sync with
//! the catalog and local storage.

mod cart;
mod store;

pub use cart::Cart;
pub use store::{CartOutcome, CartStore, UpdateProductAmount, CART_STORAGE_KEY};
