//! In-memory state container with reducer-style mutations.
//!
//! One [`Store`] per process, constructed explicitly and passed to whatever
//! needs it. Mutations go through named reducer methods behind a single
//! lock, so concurrent operations interleave at reducer granularity and a
//! snapshot is always a coherent state.

mod auth;
mod shop;

pub use auth::{AuthOp, AuthSlice};
pub use shop::{ShopOp, ShopSlice};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use terracota_core::{
    CartLine, Category, CategoryId, OpStatus, Product, ProductId, Session, SiteConfig,
};

/// Full application state: one shop slice, one auth slice.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub shop: ShopSlice,
    pub auth: AuthSlice,
}

/// Shared, lock-guarded state container. Cheap to clone.
#[derive(Clone, Default)]
pub struct Store {
    state: Arc<Mutex<StoreState>>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted (or test-fixture) state.
    #[must_use]
    pub fn from_state(state: StoreState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Clone of the full state, for rendering or persisting.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // Reducers cannot leave the state half-written, so a guard from a
        // panicked holder is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Shop reducers
    // =========================================================================

    pub fn set_products(&self, products: Vec<Product>) {
        self.lock().shop.set_products(products);
    }

    pub fn add_product(&self, product: Product) {
        self.lock().shop.add_product(product);
    }

    pub fn update_product(&self, product: Product) {
        self.lock().shop.update_product(product);
    }

    pub fn delete_product(&self, id: ProductId) {
        self.lock().shop.delete_product(id);
    }

    pub fn set_categories(&self, categories: Vec<Category>) {
        self.lock().shop.set_categories(categories);
    }

    pub fn add_category(&self, category: Category) {
        self.lock().shop.add_category(category);
    }

    pub fn update_category(&self, category: Category) {
        self.lock().shop.update_category(category);
    }

    pub fn delete_category(&self, id: CategoryId) {
        self.lock().shop.delete_category(id);
    }

    pub fn set_cart(&self, lines: Vec<CartLine>) {
        self.lock().shop.set_cart(lines);
    }

    pub fn add_to_cart(&self, product: &Product) {
        self.lock().shop.add_to_cart(product);
    }

    pub fn remove_from_cart(&self, id: ProductId) {
        self.lock().shop.remove_from_cart(id);
    }

    pub fn increment_cart_item(&self, id: ProductId) {
        self.lock().shop.increment_cart_item(id);
    }

    pub fn decrement_cart_item(&self, id: ProductId) {
        self.lock().shop.decrement_cart_item(id);
    }

    #[must_use]
    pub fn shop_status(&self, op: ShopOp) -> OpStatus {
        self.lock().shop.status(op)
    }

    pub fn clear_shop_status(&self) {
        self.lock().shop.clear_status();
    }

    pub(crate) fn set_shop_status(&self, op: ShopOp, status: OpStatus) {
        self.lock().shop.status.insert(op, status);
    }

    // =========================================================================
    // Auth reducers
    // =========================================================================

    pub fn login(&self, session: Session) {
        self.lock().auth.login(session);
    }

    /// Drop the session. The cart and the site config survive.
    pub fn logout(&self) {
        self.lock().auth.logout();
    }

    pub fn set_site_config(&self, config: SiteConfig) {
        self.lock().auth.set_site_config(config);
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().auth.is_authenticated()
    }

    /// Current bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().auth.token().map(str::to_owned)
    }

    #[must_use]
    pub fn auth_status(&self, op: AuthOp) -> OpStatus {
        self.lock().auth.status(op)
    }

    pub fn clear_auth_status(&self) {
        self.lock().auth.clear_status();
    }

    pub(crate) fn set_auth_status(&self, op: AuthOp, status: OpStatus) {
        self.lock().auth.status.insert(op, status);
    }
}

// =============================================================================
// Tests
// =============================================================================
