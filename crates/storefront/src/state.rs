//! Application state: the containers, client, and router for one session.
//!
//! Constructed once at startup and threaded through the application
//! explicitly - there are no global singleton registries. Each container
//! exclusively owns its in-memory state; the durable slots behind the shared
//! [`Storage`] handle are the only cross-container resource.

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::router::Router;
use crate::storage::Storage;
use crate::stores::{AuthStore, CartStore, WishlistStore};

/// State for one application session.
///
/// Rehydrates every container from durable storage on construction, before
/// anything reads them.
pub struct AppState {
    config: StorefrontConfig,
    api: ApiClient,
    router: Router,
    cart: CartStore,
    wishlist: WishlistStore,
    auth: AuthStore,
}

impl AppState {
    /// Create the application state with file-backed storage under the
    /// configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be constructed.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let storage = Storage::file(config.data_dir.clone());
        Self::with_storage(config, storage)
    }

    /// Create the application state over an explicit storage handle.
    ///
    /// Used by tests to substitute in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be constructed.
    pub fn with_storage(config: StorefrontConfig, storage: Storage) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config)?;

        let cart = CartStore::new(storage.clone());
        let wishlist = WishlistStore::new(storage.clone());
        let auth = AuthStore::new(api.clone(), storage);

        Ok(Self {
            config,
            api,
            router: Router::with_default_routes(),
            cart,
            wishlist,
            auth,
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get a reference to the catalog service client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Get a reference to the navigation router.
    #[must_use]
    pub const fn router(&self) -> &Router {
        &self.router
    }

    /// Get a reference to the cart container.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Get a mutable reference to the cart container.
    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// Get a reference to the wishlist container.
    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    /// Get a mutable reference to the wishlist container.
    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    /// Get a reference to the authentication session.
    #[must_use]
    pub const fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// Get a mutable reference to the authentication session.
    pub const fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }
}
