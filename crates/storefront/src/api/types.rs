//! Domain types for the remote catalog service.
//!
//! These mirror the JSON shapes the service produces and consumes. Products
//! are remote-owned values: immutable once fetched, identified by numeric id.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vetrina_core::{CartId, ProductId, UserId};

// =============================================================================
// Product Types
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Remote catalog id.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Decimal,
    /// Display description.
    pub description: String,
    /// Category name.
    pub category: String,
    /// Product image URL.
    pub image: String,
    /// Aggregate review rating, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// Aggregate review rating attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating value (e.g., 4.5).
    pub rate: f64,
    /// Number of reviews.
    pub count: u64,
}

/// Payload for creating a catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub price: Decimal,
    pub description: String,
    pub category: String,
    pub image: String,
}

/// Partial update of a catalog product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// =============================================================================
// Remote Cart Types
// =============================================================================

/// A server-side cart record.
///
/// Distinct from the local [`crate::stores::CartStore`]: these are the
/// catalog service's own cart resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCart {
    pub id: CartId,
    pub user_id: UserId,
    pub date: DateTime<Utc>,
    pub products: Vec<RemoteCartEntry>,
}

/// A line in a server-side cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCartEntry {
    pub product_id: ProductId,
    pub quantity: u32,
}

// =============================================================================
// Auth Types
// =============================================================================

/// Credentials for the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Opaque session token.
    pub token: String,
}

// =============================================================================
// List Parameters
// =============================================================================

/// Sort order accepted by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire value for the `sort` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Result ordering by id.
    pub sort: Option<SortOrder>,
}

impl ListParams {
    /// Query pairs for a request; absent values are omitted from the URL.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("limit", self.limit.map(|limit| limit.to_string())),
            ("sort", self.sort.map(|sort| sort.as_str().to_string())),
        ]
    }
}
