//! End-to-end tests for the Lumina storefront client.
//!
//! Each test gets a [`TestContext`]: a `wiremock` server standing in for the
//! store backend and a fresh file-backed storage profile in a temp directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lumina-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use lumina_storefront::api::ApiClient;
use lumina_storefront::auth::TokenStore;
use lumina_storefront::cart::CartStore;
use lumina_storefront::config::ClientConfig;
use lumina_storefront::storage::{FileStorage, StorageError};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::MockServer;

/// A mock backend plus an isolated storage profile.
pub struct TestContext {
    pub server: MockServer,
    pub api: ApiClient,
    pub config: ClientConfig,
    profile: TempDir,
}

impl TestContext {
    /// Start a mock backend and create an empty profile.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory or client cannot be created.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let profile = TempDir::new().expect("Failed to create temp profile");

        let mut config = ClientConfig::new(&server.uri()).expect("mock server URI is valid");
        config.data_dir = profile.path().to_path_buf();
        config.http_timeout = Duration::from_secs(5);

        let api = ApiClient::new(&config).expect("Failed to build API client");

        Self {
            server,
            api,
            config,
            profile,
        }
    }

    /// Open the storage profile, as a new process would.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile directory cannot be created.
    pub fn storage(&self) -> Result<FileStorage, StorageError> {
        FileStorage::open(self.profile.path())
    }

    /// A cart store over a fresh handle to the profile.
    ///
    /// # Panics
    ///
    /// Panics if the profile cannot be opened.
    #[allow(clippy::expect_used)]
    pub fn cart(&self) -> CartStore<FileStorage> {
        CartStore::new(self.storage().expect("Failed to open profile"))
    }

    /// A token store over a fresh handle to the profile.
    ///
    /// # Panics
    ///
    /// Panics if the profile cannot be opened.
    #[allow(clippy::expect_used)]
    pub fn tokens(&self) -> TokenStore<FileStorage> {
        TokenStore::new(self.storage().expect("Failed to open profile"))
    }
}

/// Backend JSON for a product.
#[must_use]
pub fn product_json(id: &str, name: &str, price: f64, labelled_price: f64) -> Value {
    json!({
        "_id": format!("mongo-{id}"),
        "productId": id,
        "name": name,
        "altNames": [],
        "description": format!("{name} description"),
        "image": [format!("https://cdn.example.com/{id}.jpg")],
        "price": price,
        "labelledPrice": labelled_price,
        "stock": 50,
        "isAvailable": true,
        "__v": 0
    })
}

/// Backend JSON for a placed order.
#[must_use]
pub fn order_json(order_id: &str, total: f64) -> Value {
    json!({
        "orderId": order_id,
        "name": "Ann Perera",
        "email": "ann@example.com",
        "phone": "0771234567",
        "address": "12 Palm Grove",
        "date": "2025-05-01T10:00:00.000Z",
        "total": total,
        "status": "pending",
        "products": []
    })
}
