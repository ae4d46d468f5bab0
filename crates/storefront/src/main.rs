//! Vetrina Storefront - client-side storefront state layer.
//!
//! # Architecture
//!
//! - Cart and wishlist containers persisted to file-backed slots
//! - Authentication session with a durable token
//! - REST client for the remote catalog service (products, carts, login)
//!
//! The view layer is out of scope: this binary rehydrates the local state,
//! reports it, and verifies the catalog is reachable.

#![cfg_attr(not(test), forbid(unsafe_code))]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vetrina_storefront::api::ListParams;
use vetrina_storefront::config::StorefrontConfig;
use vetrina_storefront::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vetrina_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build application state; containers rehydrate from the data directory
    let state = AppState::new(config).expect("Failed to initialize application state");

    tracing::info!(
        lines = state.cart().items().len(),
        total_items = state.cart().total_items(),
        total_price = %state.cart().total_price(),
        "Cart rehydrated"
    );
    tracing::info!(items = state.wishlist().total_items(), "Wishlist rehydrated");
    tracing::info!(
        authenticated = state.auth().is_authenticated(),
        "Session rehydrated"
    );

    // The local state layer works without the remote catalog; a failure here
    // is reported, not fatal
    match state.api().get_products(&ListParams::default()).await {
        Ok(products) => {
            tracing::info!(count = products.len(), "Catalog loaded");
        }
        Err(e) => {
            tracing::error!(error = %e, "Catalog unavailable");
        }
    }
}
