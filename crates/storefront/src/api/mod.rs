//! REST client for the store backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth for products, reviews, orders and
//!   users - NO local sync, direct API calls
//! - Product reads are cached in memory via `moka` (TTL from config);
//!   admin product writes invalidate the cache
//! - Authenticated calls send `Authorization: Bearer <token>`
//!
//! # Example
//!
//! ```rust,ignore
//! use lumina_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config)?;
//! let product = client.get_product(&"COSM24001".into()).await?;
//! cart.add_to_cart(&product, 1);
//! ```

mod cache;
mod types;

pub use types::*;

use std::sync::Arc;

use lumina_core::{Email, OrderId, OrderStatus, ProductId, ReviewId};
use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or rejected bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Signed in, but not allowed (e.g. admin-only endpoint).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success response.
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or the status reason.
        message: String,
    },
}

impl ApiError {
    /// Map a non-success response to an error, preferring the body's
    /// `message` field.
    fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether the error means the stored token should be discarded.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the store backend.
///
/// Cheap to clone; clones share the HTTP connection pool and product cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("lumina-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
                cache,
            }),
        })
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let path = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Ok(self.inner.base_url.join(&path)?)
    }

    fn get(&self, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.get(self.endpoint(segments)?))
    }

    fn post(&self, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.post(self.endpoint(segments)?))
    }

    fn put(&self, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.put(self.endpoint(segments)?))
    }

    fn delete(&self, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.delete(self.endpoint(segments)?))
    }

    /// Send a request and return the body of a successful response.
    async fn send_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::from_response(status, &body));
        }

        Ok(body)
    }

    /// Send a request and decode a JSON response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request, ignoring the response body.
    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send_raw(request).await.map(|_| ())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List every product in the catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let products: Vec<Product> = self.send(self.get(&["products"])?).await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::new(products.clone())))
            .await;

        Ok(products)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist, or another
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(product_id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(product.as_ref().clone());
        }

        let product: Product = self
            .send(self.get(&["products", product_id.as_str()])?)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Arc::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Search products by name. A blank query returns no results without a
    /// request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.send(self.get(&["products", "search", query])?).await
    }

    /// Create a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token, product), fields(product_id = %product.product_id))]
    pub async fn create_product(
        &self,
        token: &SecretString,
        product: &NewProduct,
    ) -> Result<(), ApiError> {
        let request = self
            .post(&["products"])?
            .bearer_auth(token.expose_secret())
            .json(product);
        self.send_empty(request).await?;
        self.invalidate_products();
        Ok(())
    }

    /// Replace a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token, product), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        token: &SecretString,
        product_id: &ProductId,
        product: &NewProduct,
    ) -> Result<(), ApiError> {
        let request = self
            .put(&["products", product_id.as_str()])?
            .bearer_auth(token.expose_secret())
            .json(product);
        self.send_empty(request).await?;
        self.invalidate_products();
        Ok(())
    }

    /// Delete a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn delete_product(
        &self,
        token: &SecretString,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        let request = self
            .delete(&["products", product_id.as_str()])?
            .bearer_auth(token.expose_secret());
        self.send_empty(request).await?;
        self.invalidate_products();
        Ok(())
    }

    /// Drop every cached product read.
    pub fn invalidate_products(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// List reviews for a product, in backend order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn list_reviews(&self, product_id: &ProductId) -> Result<Vec<Review>, ApiError> {
        self.send(self.get(&["reviews", product_id.as_str()])?).await
    }

    /// Submit a review.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token, review), fields(product_id = %review.product_id))]
    pub async fn create_review(
        &self,
        token: &SecretString,
        review: &NewReview,
    ) -> Result<(), ApiError> {
        let request = self
            .post(&["reviews"])?
            .bearer_auth(token.expose_secret())
            .json(review);
        self.send_empty(request).await
    }

    /// Delete a review (author or admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token), fields(review_id = %review_id))]
    pub async fn delete_review(
        &self,
        token: &SecretString,
        review_id: &ReviewId,
    ) -> Result<(), ApiError> {
        let request = self
            .delete(&["reviews", review_id.as_str()])?
            .bearer_auth(token.expose_secret());
        self.send_empty(request).await
    }

    /// Vote a review helpful or not helpful.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token), fields(review_id = %review_id))]
    pub async fn vote_review(
        &self,
        token: &SecretString,
        review_id: &ReviewId,
        is_helpful: bool,
    ) -> Result<(), ApiError> {
        let request = self
            .put(&["reviews", review_id.as_str(), "vote"])?
            .bearer_auth(token.expose_secret())
            .json(&VoteRequest { is_helpful });
        self.send_empty(request).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token, order), fields(lines = order.products.len()))]
    pub async fn place_order(
        &self,
        token: &SecretString,
        order: &OrderRequest,
    ) -> Result<Order, ApiError> {
        let request = self
            .post(&["orders"])?
            .bearer_auth(token.expose_secret())
            .json(order);
        self.send(request).await
    }

    /// List orders visible to the signed-in account (all orders for admins).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn list_orders(&self, token: &SecretString) -> Result<Vec<Order>, ApiError> {
        let request = self.get(&["orders"])?.bearer_auth(token.expose_secret());
        self.send(request).await
    }

    /// Change an order's status (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token), fields(order_id = %order_id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &SecretString,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let request = self
            .put(&["orders", order_id.as_str(), status.as_str()])?
            .bearer_auth(token.expose_secret())
            .json(&serde_json::json!({}));
        self.send_empty(request).await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails (e.g. the email is taken).
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let body = RegisterRequest {
            first_name: &registration.first_name,
            last_name: &registration.last_name,
            email: registration.email.as_str(),
            password: registration.password.expose_secret(),
        };
        self.send_empty(self.post(&["users"])?.json(&body)).await
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.send(self.post(&["users", "login"])?.json(&body)).await
    }

    /// Exchange an identity-provider access token for a backend token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, access_token))]
    pub async fn login_with_google(
        &self,
        access_token: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = GoogleLoginRequest {
            access_token: access_token.expose_secret(),
        };
        self.send(self.post(&["users", "login", "google"])?.json(&body))
            .await
    }
}
