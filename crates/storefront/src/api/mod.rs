//! Remote catalog service client.
//!
//! # Architecture
//!
//! - Single `request` primitive over `reqwest`; every endpoint builds on it
//! - The remote service is source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for catalog reads (5 minute TTL)
//! - Cart and auth endpoints are never cached (mutable state)
//!
//! Product search has no remote endpoint: it fetches the product list and
//! substring-matches title and description client-side.
//!
//! # Example
//!
//! ```rust,ignore
//! use vetrina_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config)?;
//!
//! // Get a product
//! let product = client.get_product(ProductId::new(1)).await?;
//!
//! // Log in
//! let response = client.login(&credentials).await?;
//! ```

mod cache;
pub mod types;

pub use types::{
    ListParams, LoginRequest, LoginResponse, NewProduct, Product, ProductUpdate, Rating,
    RemoteCart, RemoteCartEntry, SortOrder,
};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use vetrina_core::{CartId, ProductId, UserId};

use crate::config::StorefrontConfig;
use cache::CacheValue;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service responded with a non-success status.
    #[error("{message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// JSON (de)serialization failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL or a derived endpoint URL is invalid.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the remote catalog service.
///
/// Provides access to products, categories, server-side carts, and login.
/// Catalog reads are cached for 5 minutes.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new catalog service client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        // A trailing slash makes Url::join treat the base path as a directory
        let mut base = config.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url,
                cache,
            }),
        })
    }

    /// Execute a request against the service and parse the JSON response.
    ///
    /// Query pairs with an absent value are omitted from the URL. A non-success
    /// status becomes [`ApiError::Status`] with a message enriched from the
    /// error body when it is JSON-parseable.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, Option<String>)],
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let mut url = self.inner.base_url.join(path)?;
        for (key, value) in query {
            if let Some(value) = value {
                url.query_pairs_mut().append_pair(key, value);
            }
        }

        let mut request = self.inner.http.request(method, url);
        if let Some(body) = body {
            // .json() also sets the JSON content type
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                path,
                "Catalog service returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                message: error_message(status, &response_text),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog service response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, params: &ListParams) -> Result<Vec<Product>, ApiError> {
        let cache_key = format!("products:{:?}:{:?}", params.limit, params.sort);

        // Check cache
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .request(Method::GET, "products", &params.query(), None)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{product_id}");

        // Check cache
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .request(Method::GET, &format!("products/{product_id}"), &[], None)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get the list of category names.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<String>, ApiError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<String> = self
            .request(Method::GET, "products/categories", &[], None)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Get the products in a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn get_products_by_category(
        &self,
        category: &str,
        params: &ListParams,
    ) -> Result<Vec<Product>, ApiError> {
        let cache_key = format!("category:{category}:{:?}:{:?}", params.limit, params.sort);

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .request(
                Method::GET,
                &format!("products/category/{category}"),
                &params.query(),
                None,
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Create a catalog product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, product))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let body = serde_json::to_value(product)?;
        let created = self
            .request(Method::POST, "products", &[], Some(body))
            .await?;

        self.invalidate_all().await;
        Ok(created)
    }

    /// Update a catalog product. Absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, update), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        let body = serde_json::to_value(update)?;
        let updated = self
            .request(
                Method::PUT,
                &format!("products/{product_id}"),
                &[],
                Some(body),
            )
            .await?;

        self.invalidate_all().await;
        Ok(updated)
    }

    /// Delete a catalog product, returning the deleted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete_product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let deleted = self
            .request(
                Method::DELETE,
                &format!("products/{product_id}"),
                &[],
                None,
            )
            .await?;

        self.invalidate_all().await;
        Ok(deleted)
    }

    /// Search products by title and description, case-insensitively.
    ///
    /// The service has no search endpoint; this fetches the product list and
    /// filters it client-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying list request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let needle = query.to_lowercase();
        let products = self.get_products(&ListParams::default()).await?;

        Ok(products
            .into_iter()
            .filter(|product| matches_query(product, &needle))
            .collect())
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get all server-side carts.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_carts(&self, params: &ListParams) -> Result<Vec<RemoteCart>, ApiError> {
        self.request(Method::GET, "carts", &params.query(), None)
            .await
    }

    /// Get a server-side cart by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart does not exist or the request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: CartId) -> Result<RemoteCart, ApiError> {
        self.request(Method::GET, &format!("carts/{cart_id}"), &[], None)
            .await
    }

    /// Get the carts belonging to a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user_carts(&self, user_id: UserId) -> Result<Vec<RemoteCart>, ApiError> {
        self.request(Method::GET, &format!("carts/user/{user_id}"), &[], None)
            .await
    }

    /// Create a server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, cart))]
    pub async fn create_cart(&self, cart: &RemoteCart) -> Result<RemoteCart, ApiError> {
        let body = serde_json::to_value(cart)?;
        self.request(Method::POST, "carts", &[], Some(body)).await
    }

    /// Replace a server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, cart), fields(cart_id = %cart_id))]
    pub async fn update_cart(
        &self,
        cart_id: CartId,
        cart: &RemoteCart,
    ) -> Result<RemoteCart, ApiError> {
        let body = serde_json::to_value(cart)?;
        self.request(Method::PUT, &format!("carts/{cart_id}"), &[], Some(body))
            .await
    }

    /// Delete a server-side cart, returning the deleted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn delete_cart(&self, cart_id: CartId) -> Result<RemoteCart, ApiError> {
        self.request(Method::DELETE, &format!("carts/{cart_id}"), &[], None)
            .await
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(credentials)?;
        self.request(Method::POST, "auth/login", &[], Some(body))
            .await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Whether a product matches a lowercased search needle.
fn matches_query(product: &Product, needle_lower: &str) -> bool {
    product.title.to_lowercase().contains(needle_lower)
        || product.description.to_lowercase().contains(needle_lower)
}

/// Best-effort error message for a non-success response.
///
/// The service encodes errors as a JSON string, or as an object with a
/// `message` or `error` field; anything else falls back to the status line.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value {
            serde_json::Value::String(message) if !message.is_empty() => return message,
            serde_json::Value::Object(fields) => {
                for key in ["message", "error"] {
                    if let Some(serde_json::Value::String(message)) = fields.get(key)
                        && !message.is_empty()
                    {
                        return message.clone();
                    }
                }
            }
            _ => {}
        }
    }

    format!("API error: {status}")
}
