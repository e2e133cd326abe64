//! Cart store: the cart plus its catalog, storage and notification surface.

use rocketshoes_cache::{Cache, KeyValueStore};
use serde::Serialize;

use crate::cart::Cart;
use crate::catalog::{CatalogService, Product};
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::notify::{messages, Notifier, Toast};

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Request to set the amount of a product in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Desired amount. Values of zero or below are ignored.
    pub amount: i64,
}

impl UpdateProductAmount {
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}

/// What a cart operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOutcome {
    /// The cart changed and was persisted.
    Updated,
    /// Nothing to do; cart and storage untouched.
    Unchanged,
    /// Rejected for lack of stock; the user was told.
    OutOfStock,
    /// A catalog or storage call failed; the user was told.
    Failed,
}

impl CartOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, CartOutcome::Updated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CartOutcome::Updated => "updated",
            CartOutcome::Unchanged => "unchanged",
            CartOutcome::OutOfStock => "out_of_stock",
            CartOutcome::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Add => "add_product",
            Operation::Remove => "remove_product",
            Operation::Update => "update_product_amount",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Operation::Add => messages::ADD_FAILED,
            Operation::Remove => messages::REMOVE_FAILED,
            Operation::Update => messages::UPDATE_FAILED,
        }
    }
}

/// Client-side cart state synchronized to local storage.
///
/// Every operation is a single attempt. Failures are reported only through
/// the [`Notifier`]; the returned [`CartOutcome`] says what happened.
/// A change is written to storage before it is applied in memory, so the
/// two never disagree after an operation returns.
pub struct CartStore<C, S, N> {
    catalog: C,
    cache: Cache<S>,
    notifier: N,
    cart: Cart,
}

impl<C, S, N> CartStore<C, S, N>
where
    C: CatalogService,
    S: KeyValueStore,
    N: Notifier,
{
    /// Create a store, loading the cart persisted in `storage`.
    ///
    /// A missing entry yields an empty cart. Text that does not parse is
    /// logged and ignored; it stays in storage until the next successful
    /// mutation replaces it.
    pub fn load(catalog: C, storage: S, notifier: N) -> Self {
        let cache = Cache::new(storage);
        let cart = match cache.get::<Cart>(CART_STORAGE_KEY) {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(key = CART_STORAGE_KEY, error = %e, "ignoring unreadable stored cart");
                Cart::new()
            }
        };

        tracing::debug!(products = cart.len(), "cart loaded");

        Self {
            catalog,
            cache,
            notifier,
            cart,
        }
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Get a product in the cart by id.
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.cart.get(id)
    }

    /// Number of distinct products in the cart.
    pub fn cart_size(&self) -> usize {
        self.cart.len()
    }

    /// Sum of all amounts in the cart.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Sum of all product subtotals.
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn storage(&self) -> &S {
        self.cache.store()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its amount incremented while stock
    /// allows; a new product is fetched from the catalog and inserted with
    /// amount 1.
    pub async fn add_product(&mut self, product_id: ProductId) -> CartOutcome {
        let result = self.try_add_product(product_id).await;
        self.settle(Operation::Add, product_id, result)
    }

    /// Remove a product. Removing a product that is not in the cart does nothing.
    pub fn remove_product(&mut self, product_id: ProductId) -> CartOutcome {
        let result = if self.cart.contains(product_id) {
            let mut next = self.cart.clone();
            next.remove(product_id);
            Ok(Some(next))
        } else {
            Ok(None)
        };
        self.settle(Operation::Remove, product_id, result)
    }

    /// Set the exact amount of a product in the cart.
    ///
    /// Amounts of zero or below are ignored. Amounts above the current stock
    /// are rejected as out of stock.
    pub async fn update_product_amount(&mut self, request: UpdateProductAmount) -> CartOutcome {
        let result = self.try_update_product_amount(request).await;
        self.settle(Operation::Update, request.product_id, result)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<Option<Cart>, CartError> {
        let stock = self.catalog.stock(product_id).await?;
        let mut next = self.cart.clone();

        match self.cart.get(product_id) {
            Some(existing) => {
                let requested = existing.amount.saturating_add(1);
                stock.ensure_available(product_id, requested)?;
                // An incremented product moves to the end of the cart.
                let mut product = existing.clone();
                product.amount = requested;
                next.remove(product_id);
                next.insert(product)?;
            }
            None => {
                stock.ensure_available(product_id, 1)?;
                let details = self.catalog.product(product_id).await?;
                next.insert(details.into_cart_product(1))?;
            }
        }

        Ok(Some(next))
    }

    async fn try_update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<Option<Cart>, CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        if amount <= 0 {
            return Ok(None);
        }
        if !self.cart.contains(product_id) {
            return Err(CartError::ItemNotInCart(product_id));
        }

        let stock = self.catalog.stock(product_id).await?;
        if amount > i64::from(stock.amount) {
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: i64::from(stock.amount),
            });
        }

        let amount = u32::try_from(amount).map_err(|_| CartError::InvalidAmount(amount))?;
        let mut next = self.cart.clone();
        next.set_amount(product_id, amount)?;
        Ok(Some(next))
    }

    /// Persist and commit a computed cart, or turn an error into a toast.
    fn settle(
        &mut self,
        op: Operation,
        product_id: ProductId,
        result: Result<Option<Cart>, CartError>,
    ) -> CartOutcome {
        let result = match result {
            Ok(Some(next)) => self.commit(next).map(|()| CartOutcome::Updated),
            Ok(None) => Ok(CartOutcome::Unchanged),
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => {
                tracing::info!(
                    operation = op.name(),
                    product_id = %product_id,
                    outcome = outcome.as_str(),
                    products = self.cart.len(),
                    "cart operation finished"
                );
                outcome
            }
            Err(e @ CartError::OutOfStock { .. }) => {
                tracing::warn!(operation = op.name(), product_id = %product_id, error = %e, "out of stock");
                self.notifier.notify(Toast::error(messages::OUT_OF_STOCK));
                CartOutcome::OutOfStock
            }
            Err(e) => {
                tracing::warn!(operation = op.name(), product_id = %product_id, error = %e, "cart operation failed");
                self.notifier.notify(Toast::error(op.failure_message()));
                CartOutcome::Failed
            }
        }
    }

    fn commit(&mut self, next: Cart) -> Result<(), CartError> {
        self.cache.set(CART_STORAGE_KEY, &next)?;
        self.cart = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, ProductDetails};
    use crate::notify::RecordingNotifier;
    use rocketshoes_cache::{CacheError, MemoryStore};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    type TestStore = CartStore<Arc<InMemoryCatalog>, Arc<MemoryStore>, Arc<RecordingNotifier>>;

    struct Harness {
        catalog: Arc<InMemoryCatalog>,
        storage: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
    }

    impl Harness {
        fn new() -> Self {
            let catalog = InMemoryCatalog::new()
                .with_product(sneaker(1, 179.9), 3)
                .with_product(sneaker(2, 139.9), 1)
                .with_product(sneaker(3, 219.9), 0);
            Self {
                catalog: Arc::new(catalog),
                storage: Arc::new(MemoryStore::new()),
                notifier: Arc::new(RecordingNotifier::new()),
            }
        }

        fn store(&self) -> TestStore {
            CartStore::load(
                Arc::clone(&self.catalog),
                Arc::clone(&self.storage),
                Arc::clone(&self.notifier),
            )
        }

        fn persisted(&self) -> Option<Cart> {
            self.storage
                .get(CART_STORAGE_KEY)
                .unwrap()
                .map(|text| serde_json::from_str(&text).unwrap())
        }
    }

    fn sneaker(id: u64, price: f64) -> ProductDetails {
        ProductDetails::new(ProductId::new(id), format!("Tênis {id}"), price, format!("{id}.jpg"))
    }

    fn id(n: u64) -> ProductId {
        ProductId::new(n)
    }

    #[tokio::test]
    async fn test_add_new_product_inserts_with_amount_one() {
        let h = Harness::new();
        let mut store = h.store();

        assert_eq!(store.add_product(id(1)).await, CartOutcome::Updated);

        let product = store.product(id(1)).unwrap();
        assert_eq!(product.amount, 1);
        assert_eq!(product.title, "Tênis 1");
        assert_eq!(h.persisted().as_ref(), Some(store.cart()));
        assert!(h.notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_product_increments_within_stock() {
        let h = Harness::new();
        let mut store = h.store();

        store.add_product(id(1)).await;
        store.add_product(id(1)).await;
        assert_eq!(store.add_product(id(1)).await, CartOutcome::Updated);

        assert_eq!(store.product(id(1)).unwrap().amount, 3);
        assert_eq!(store.cart_size(), 1);
        // Details are fetched only for the first insert.
        assert_eq!(h.catalog.product_requests(), 1);
        assert_eq!(h.persisted().as_ref(), Some(store.cart()));
    }

    #[tokio::test]
    async fn test_add_existing_product_moves_it_to_the_end() {
        let h = Harness::new();
        h.catalog.set_stock(id(1), 5);
        h.catalog.set_stock(id(2), 5);
        let mut store = h.store();

        store.add_product(id(1)).await;
        store.add_product(id(2)).await;
        assert_eq!(store.add_product(id(1)).await, CartOutcome::Updated);

        let order: Vec<u64> = store.cart().iter().map(|p| p.id.get()).collect();
        assert_eq!(order, vec![2, 1]);
        assert_eq!(store.product(id(1)).unwrap().amount, 2);

        let persisted = h.persisted().unwrap();
        let persisted_order: Vec<u64> = persisted.iter().map(|p| p.id.get()).collect();
        assert_eq!(persisted_order, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_is_out_of_stock() {
        let h = Harness::new();
        let mut store = h.store();

        store.add_product(id(2)).await;
        let before = store.cart().clone();

        assert_eq!(store.add_product(id(2)).await, CartOutcome::OutOfStock);
        assert_eq!(store.cart(), &before);
        assert_eq!(h.persisted(), Some(before));
        assert_eq!(h.notifier.messages(), vec![messages::OUT_OF_STOCK]);
    }

    #[tokio::test]
    async fn test_add_new_product_without_stock_is_out_of_stock() {
        let h = Harness::new();
        let mut store = h.store();

        assert_eq!(store.add_product(id(3)).await, CartOutcome::OutOfStock);
        assert!(store.cart().is_empty());
        assert_eq!(h.persisted(), None);
        assert_eq!(h.catalog.product_requests(), 0);
    }

    #[tokio::test]
    async fn test_add_unknown_product_fails() {
        let h = Harness::new();
        let mut store = h.store();

        assert_eq!(store.add_product(id(99)).await, CartOutcome::Failed);
        assert!(store.cart().is_empty());
        assert_eq!(h.notifier.messages(), vec![messages::ADD_FAILED]);
    }

    #[tokio::test]
    async fn test_add_when_catalog_offline_fails() {
        let h = Harness::new();
        let mut store = h.store();
        store.add_product(id(1)).await;
        h.catalog.set_offline(true);

        assert_eq!(store.add_product(id(1)).await, CartOutcome::Failed);
        assert_eq!(store.product(id(1)).unwrap().amount, 1);
        assert_eq!(h.notifier.messages(), vec![messages::ADD_FAILED]);
    }

    #[tokio::test]
    async fn test_remove_present_product() {
        let h = Harness::new();
        let mut store = h.store();
        store.add_product(id(1)).await;
        store.add_product(id(2)).await;

        assert_eq!(store.remove_product(id(1)), CartOutcome::Updated);

        assert!(store.product(id(1)).is_none());
        assert_eq!(store.cart_size(), 1);
        assert_eq!(h.persisted().as_ref(), Some(store.cart()));
    }

    #[tokio::test]
    async fn test_remove_absent_product_is_silent_noop() {
        let h = Harness::new();
        let mut store = h.store();
        store.add_product(id(1)).await;
        let before = store.cart().clone();

        assert_eq!(store.remove_product(id(2)), CartOutcome::Unchanged);
        assert_eq!(store.cart(), &before);
        assert!(h.notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_update_non_positive_amount_is_noop() {
        let h = Harness::new();
        let mut store = h.store();
        store.add_product(id(1)).await;
        let requests = h.catalog.stock_requests();

        for amount in [0, -1] {
            let outcome = store
                .update_product_amount(UpdateProductAmount::new(id(1), amount))
                .await;
            assert_eq!(outcome, CartOutcome::Unchanged);
        }

        assert_eq!(store.product(id(1)).unwrap().amount, 1);
        assert_eq!(h.catalog.stock_requests(), requests);
        assert!(h.notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_update_sets_exact_amount() {
        let h = Harness::new();
        let mut store = h.store();
        store.add_product(id(1)).await;

        let outcome = store
            .update_product_amount(UpdateProductAmount::new(id(1), 3))
            .await;

        assert_eq!(outcome, CartOutcome::Updated);
        assert_eq!(store.product(id(1)).unwrap().amount, 3);
        assert_eq!(h.persisted().as_ref(), Some(store.cart()));
    }

    #[tokio::test]
    async fn test_update_above_stock_is_out_of_stock() {
        let h = Harness::new();
        let mut store = h.store();
        store.add_product(id(1)).await;

        let outcome = store
            .update_product_amount(UpdateProductAmount::new(id(1), 4))
            .await;

        assert_eq!(outcome, CartOutcome::OutOfStock);
        assert_eq!(store.product(id(1)).unwrap().amount, 1);
        assert_eq!(h.notifier.messages(), vec![messages::OUT_OF_STOCK]);
    }

    #[tokio::test]
    async fn test_update_product_not_in_cart_fails() {
        let h = Harness::new();
        let mut store = h.store();

        let outcome = store
            .update_product_amount(UpdateProductAmount::new(id(1), 2))
            .await;

        assert_eq!(outcome, CartOutcome::Failed);
        assert!(store.cart().is_empty());
        assert_eq!(h.notifier.messages(), vec![messages::UPDATE_FAILED]);
    }

    #[tokio::test]
    async fn test_update_when_stock_lookup_fails() {
        let h = Harness::new();
        let mut store = h.store();
        store.add_product(id(1)).await;
        h.catalog.set_offline(true);

        let outcome = store
            .update_product_amount(UpdateProductAmount::new(id(1), 2))
            .await;

        assert_eq!(outcome, CartOutcome::Failed);
        assert_eq!(h.notifier.messages(), vec![messages::UPDATE_FAILED]);
    }

    #[tokio::test]
    async fn test_load_restores_persisted_cart() {
        let h = Harness::new();
        let mut store = h.store();
        store.add_product(id(1)).await;
        store.add_product(id(2)).await;
        store
            .update_product_amount(UpdateProductAmount::new(id(1), 2))
            .await;

        let reloaded = h.store();
        assert_eq!(reloaded.cart(), store.cart());
        assert_eq!(reloaded.item_count(), 3);
        assert_eq!(reloaded.total(), Money::new(17990 * 2 + 13990));
    }

    #[tokio::test]
    async fn test_load_ignores_unreadable_text() {
        let h = Harness::new();
        h.storage.set(CART_STORAGE_KEY, "{not a cart").unwrap();

        let mut store = h.store();
        assert!(store.cart().is_empty());

        store.add_product(id(1)).await;
        assert_eq!(h.persisted().as_ref(), Some(store.cart()));
    }

    /// Store whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(CacheError::StoreError("quota exceeded".to_string()));
            }
            self.inner.set(key, value)
        }

        fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.inner.delete(key)
        }

        fn keys(&self) -> Result<Vec<String>, CacheError> {
            self.inner.keys()
        }
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_memory_unchanged() {
        let h = Harness::new();
        let storage = Arc::new(FlakyStore::default());
        let mut store = CartStore::load(
            Arc::clone(&h.catalog),
            Arc::clone(&storage),
            Arc::clone(&h.notifier),
        );
        store.add_product(id(1)).await;
        storage.fail_writes.store(true, Ordering::SeqCst);

        assert_eq!(store.add_product(id(1)).await, CartOutcome::Failed);
        assert_eq!(store.remove_product(id(1)), CartOutcome::Failed);

        assert_eq!(store.product(id(1)).unwrap().amount, 1);
        assert_eq!(
            h.notifier.messages(),
            vec![messages::ADD_FAILED, messages::REMOVE_FAILED]
        );
    }

    #[test]
    fn test_outcome_labels() {
        assert!(CartOutcome::Updated.is_updated());
        assert!(!CartOutcome::Unchanged.is_updated());
        assert_eq!(CartOutcome::OutOfStock.as_str(), "out_of_stock");
        assert_eq!(
            serde_json::to_string(&CartOutcome::OutOfStock).unwrap(),
            r#""out_of_stock""#
        );
    }
}
