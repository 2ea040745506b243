//! The storefront session handle.
//!
//! [`Storefront`] owns every store over one storage backend and passes the
//! right handles between them. Consumers (the CLI, tests) hold a single
//! `Storefront` instead of reaching for globals.

use std::sync::Arc;

use tracing::{info, instrument};

use metamart_core::{OrderId, OrderStatus, ProductId};

use crate::config::StorefrontConfig;
use crate::error::{Result, StoreError};
use crate::models::{CartLine, CustomerInfo, Order, Product, ProductDraft, User};
use crate::services::auth::{AuthService, Provider};
use crate::services::dashboard::{self, Dashboard};
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::stores::{CartStore, CatalogStore, OrderStore, SessionStore, WishlistStore};

/// One shopper's (or admin's) view of the store.
pub struct Storefront {
    config: StorefrontConfig,
    catalog: CatalogStore,
    cart: CartStore,
    wishlist: WishlistStore,
    orders: OrderStore,
    session: SessionStore,
}

impl Storefront {
    /// Open a storefront over file storage in `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the directory or a document cannot
    /// be read.
    pub fn open(config: StorefrontConfig) -> Result<Self> {
        let storage = FileStorage::open(&config.data_dir)?;
        Self::with_storage(Arc::new(storage), config)
    }

    /// Open a storefront over an arbitrary backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if a document cannot be read.
    #[instrument(skip_all)]
    pub fn with_storage(storage: Arc<dyn Storage>, config: StorefrontConfig) -> Result<Self> {
        let catalog = CatalogStore::open(Arc::clone(&storage))?;
        let cart = CartStore::open(Arc::clone(&storage))?;
        let wishlist = WishlistStore::open(Arc::clone(&storage))?;
        let orders = OrderStore::open(Arc::clone(&storage))?;
        let session = SessionStore::open(storage)?;

        info!(
            products = catalog.len(),
            cart_lines = cart.lines().len(),
            orders = orders.len(),
            "Opened storefront"
        );

        Ok(Self {
            config,
            catalog,
            cart,
            wishlist,
            orders,
            session,
        })
    }

    /// A throwaway storefront with default configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the in-memory backend fails.
    pub fn in_memory() -> Result<Self> {
        Self::with_storage(Arc::new(MemoryStorage::new()), StorefrontConfig::default())
    }

    /// Restore the seed catalog and clear the cart, wishlist, order history
    /// and session.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if a write fails.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<()> {
        self.catalog.reset()?;
        self.cart.reset()?;
        self.wishlist.reset()?;
        self.orders.reset()?;
        self.session.sign_out()?;
        info!("Reset storefront");
        Ok(())
    }

    /// Re-read the catalog and order history written by other sessions.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if a document cannot be read.
    pub fn refresh(&mut self) -> Result<()> {
        self.catalog.reload()?;
        self.orders.reload()?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderStore {
        &self.orders
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.session.current()
    }

    // =========================================================================
    // Shopping
    // =========================================================================

    /// Add units of a product to the cart, checked against live stock.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add_item`].
    pub fn add_to_cart(&mut self, id: &ProductId, quantity: u32) -> Result<CartLine> {
        self.catalog.reload()?;
        self.cart.add_item(&self.catalog, id, quantity)
    }

    /// Set a cart line's quantity; zero removes it.
    ///
    /// # Errors
    ///
    /// See [`CartStore::set_quantity`].
    pub fn set_cart_quantity(&mut self, id: &ProductId, quantity: u32) -> Result<Option<CartLine>> {
        self.catalog.reload()?;
        self.cart.set_quantity(&self.catalog, id, quantity)
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// See [`CartStore::remove_item`].
    pub fn remove_from_cart(&mut self, id: &ProductId) -> Result<bool> {
        self.cart.remove_item(id)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// See [`CartStore::clear`].
    pub fn clear_cart(&mut self) -> Result<()> {
        self.cart.clear()
    }

    /// Place an order for the cart, attributed to the signed-in user if any.
    ///
    /// # Errors
    ///
    /// See [`crate::services::checkout::place_order`].
    pub fn checkout(&mut self, customer: CustomerInfo) -> Result<Order> {
        let user = self.session.current();
        self.cart
            .checkout(&mut self.catalog, &mut self.orders, user, customer)
    }

    /// Add or remove a product from the wishlist. Requires a signed-in user.
    ///
    /// A product deleted from the catalog can still be removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AuthRequired` when signed out,
    /// `StoreError::NotFound` for an unknown product, or
    /// `StoreError::Storage` if the write fails.
    pub fn toggle_wishlist(&mut self, id: &ProductId) -> Result<bool> {
        if self.session.current().is_none() {
            return Err(StoreError::AuthRequired);
        }
        let product = self
            .catalog
            .get_by_id(id)
            .or_else(|| self.wishlist.list().iter().find(|p| &p.id == id))
            .cloned()
            .ok_or_else(|| StoreError::product_not_found(id))?;
        Ok(self.wishlist.toggle(&product)?)
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// See [`AuthService::login`]; also `StoreError::Storage`.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let user = AuthService::new(&self.config.admin).login(email, password)?;
        self.session.sign_in(user.clone())?;
        Ok(user)
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// See [`AuthService::signup`]; also `StoreError::Storage`.
    pub fn signup(&mut self, email: &str, password: &str, name: &str) -> Result<User> {
        let user = AuthService::new(&self.config.admin).signup(email, password, name)?;
        self.session.sign_in(user.clone())?;
        Ok(user)
    }

    /// Sign in through an external provider.
    ///
    /// # Errors
    ///
    /// See [`AuthService::login_with_provider`]; also `StoreError::Storage`.
    pub fn login_with_provider(&mut self, provider: Provider) -> Result<User> {
        let user = AuthService::new(&self.config.admin).login_with_provider(provider)?;
        self.session.sign_in(user.clone())?;
        Ok(user)
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the backend fails.
    pub fn logout(&mut self) -> Result<()> {
        Ok(self.session.sign_out()?)
    }

    /// The signed-in admin.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AuthRequired` when signed out, or
    /// `StoreError::Forbidden` for a non-admin user.
    pub fn require_admin(&self) -> Result<&User> {
        let user = self.session.current().ok_or(StoreError::AuthRequired)?;
        if !user.is_admin {
            return Err(StoreError::Forbidden(format!(
                "{} is not an admin",
                user.email
            )));
        }
        Ok(user)
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Create a product. Admin only.
    ///
    /// # Errors
    ///
    /// See [`Storefront::require_admin`] and [`CatalogStore::create`].
    pub fn create_product(&mut self, draft: ProductDraft) -> Result<Product> {
        self.require_admin()?;
        self.catalog.reload()?;
        self.catalog.create(draft)
    }

    /// Replace a product. Admin only.
    ///
    /// # Errors
    ///
    /// See [`Storefront::require_admin`] and [`CatalogStore::update`].
    pub fn update_product(&mut self, product: Product) -> Result<Product> {
        self.require_admin()?;
        self.catalog.reload()?;
        self.catalog.update(product)
    }

    /// Delete a product. Admin only.
    ///
    /// # Errors
    ///
    /// See [`Storefront::require_admin`] and [`CatalogStore::delete`].
    pub fn delete_product(&mut self, id: &ProductId) -> Result<bool> {
        self.require_admin()?;
        self.catalog.reload()?;
        self.catalog.delete(id)
    }

    /// Move an order to its next status. Admin only.
    ///
    /// # Errors
    ///
    /// See [`Storefront::require_admin`] and [`OrderStore::update_status`].
    pub fn update_order_status(&mut self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        self.require_admin()?;
        self.orders.update_status(id, status)
    }

    /// Advance an order one step. Admin only.
    ///
    /// # Errors
    ///
    /// See [`Storefront::require_admin`] and [`OrderStore::advance`].
    pub fn advance_order(&mut self, id: &OrderId) -> Result<Order> {
        self.require_admin()?;
        self.orders.reload()?;
        self.orders.advance(id)
    }

    /// The admin dashboard. Admin only.
    ///
    /// # Errors
    ///
    /// See [`Storefront::require_admin`].
    pub fn dashboard(&self) -> Result<Dashboard<'_>> {
        self.require_admin()?;
        Ok(dashboard::build(
            &self.catalog,
            &self.orders,
            self.config.low_stock_threshold,
        ))
    }
}
