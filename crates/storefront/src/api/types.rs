//! Wire types for the store backend.
//!
//! Field names follow the backend's camelCase JSON. Optional collections and
//! counters default when absent so older records still parse.

use chrono::{DateTime, Utc};
use lumina_core::{OrderId, OrderStatus, PaymentMethod, Price, ProductId, ReviewId, UserRole};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Products
// =============================================================================

/// A catalogue product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub alt_names: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Image URLs; the first one is the primary image.
    #[serde(default, alias = "images")]
    pub image: Vec<String>,
    /// Selling price.
    pub price: Price,
    /// List price, shown struck through when above `price`.
    pub labelled_price: Price,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

impl Product {
    /// The first image URL, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image.first().map(String::as_str)
    }

    /// Whether the product can currently be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.is_available && self.stock > 0
    }

    /// Whole-percent discount against the labelled price.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        lumina_core::discount_percent(self.price, self.labelled_price)
    }
}

const fn default_true() -> bool {
    true
}

/// Body for creating or replacing a product (admin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub product_id: ProductId,
    pub name: String,
    pub alt_names: Vec<String>,
    pub description: String,
    pub image: Vec<String>,
    pub labelled_price: Price,
    pub price: Price,
    pub stock: i64,
}

impl NewProduct {
    /// Split a comma-separated alternative name field, dropping blanks.
    #[must_use]
    pub fn parse_alt_names(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl From<&Product> for NewProduct {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            alt_names: product.alt_names.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            labelled_price: product.labelled_price,
            price: product.price,
            stock: product.stock,
        }
    }
}

// =============================================================================
// Reviews
// =============================================================================

/// A shopper review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    pub product_id: ProductId,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    /// Star rating, 1 to 5.
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub helpful_yes: u32,
    #[serde(default)]
    pub helpful_no: u32,
}

/// Body for submitting a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product_id: ProductId,
    pub rating: u8,
    pub comment: String,
    pub user_name: String,
    pub user_email: String,
}

/// Body for a helpful / not helpful vote.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VoteRequest {
    pub is_helpful: bool,
}

// =============================================================================
// Orders
// =============================================================================

/// One product line in an order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub qty: u32,
}

/// Body for placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub products: Vec<OrderLine>,
    pub phone: String,
    pub address: String,
    pub payment_method: PaymentMethod,
}

/// Product details captured on an order line by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductInfo {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Vec<String>,
    pub price: Price,
}

/// An order line as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_info: OrderProductInfo,
    pub quantity: u32,
}

impl OrderItem {
    /// Price of the line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product_info.price.times(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub date: DateTime<Utc>,
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub products: Vec<OrderItem>,
}

// =============================================================================
// Users
// =============================================================================

/// Result of a successful sign-in.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(deserialize_with = "deserialize_secret")]
    pub token: SecretString,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub message: Option<String>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleLoginRequest<'a> {
    pub access_token: &'a str,
}

/// Account registration details.
#[derive(Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: lumina_core::Email,
    pub password: SecretString,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Error body returned by the backend on failure.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}
