//! CLI command implementations.

pub mod account;
pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;

use lumina_storefront::api::ApiClient;
use lumina_storefront::auth::TokenStore;
use lumina_storefront::cart::CartStore;
use lumina_storefront::config::ClientConfig;
use lumina_storefront::error::AppError;
use lumina_storefront::storage::FileStorage;
use secrecy::SecretString;

/// Everything a command needs: the backend client and the local profile.
pub struct Context {
    pub api: ApiClient,
    storage: FileStorage,
}

impl Context {
    /// Load config from the environment and open the storage profile.
    pub fn load() -> Result<Self, AppError> {
        let config = ClientConfig::from_env()?;
        let storage = FileStorage::open(&config.data_dir)?;
        let api = ApiClient::new(&config)?;

        tracing::debug!(
            api_url = %config.api_url,
            profile = %storage.path().display(),
            "Context loaded"
        );

        Ok(Self { api, storage })
    }

    pub fn cart(&self) -> CartStore<FileStorage> {
        CartStore::new(self.storage.clone())
    }

    pub fn tokens(&self) -> TokenStore<FileStorage> {
        TokenStore::new(self.storage.clone())
    }

    /// The stored bearer token, or `NotAuthenticated`.
    pub fn require_token(&self) -> Result<SecretString, AppError> {
        self.tokens().get().ok_or(AppError::NotAuthenticated)
    }
}

/// Print the shopper-facing error message.
#[allow(clippy::print_stderr)]
pub fn report_error(err: &AppError) {
    eprintln!("error: {}", err.user_message());
}
