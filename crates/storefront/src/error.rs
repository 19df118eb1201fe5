//! Unified error handling.
//!
//! Provides a unified `AppError` type for front ends that drive the
//! storefront. Each error maps to a shopper-facing message that hides
//! transport details.

use lumina_core::{EmailError, IdError, StatusParseError};
use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::reviews::ReviewError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout was rejected.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Review form was invalid.
    #[error(transparent)]
    Review(#[from] ReviewError),

    /// The command needs a signed-in account.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<IdError> for AppError {
    fn from(err: IdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<StatusParseError> for AppError {
    fn from(err: StatusParseError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl AppError {
    /// Message suitable for showing to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.to_string(),
            Self::Storage(_) => "Could not access local data".to_string(),
            Self::Api(err) | Self::Checkout(CheckoutError::Api(err)) => api_message(err),
            Self::Checkout(err) => err.to_string(),
            Self::Review(err) => err.to_string(),
            Self::NotAuthenticated => "Please sign in first".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Process exit code for command-line front ends.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::NotAuthenticated
            | Self::Api(ApiError::Unauthorized(_))
            | Self::Checkout(
                CheckoutError::NotAuthenticated | CheckoutError::Api(ApiError::Unauthorized(_)),
            ) => 77,
            Self::BadRequest(_) | Self::Review(_) | Self::Checkout(_) => 2,
            Self::Storage(_) | Self::Api(_) => 1,
        }
    }
}

fn api_message(err: &ApiError) -> String {
    match err {
        ApiError::NotFound(msg) | ApiError::Forbidden(msg) | ApiError::Unauthorized(msg) => {
            msg.clone()
        }
        ApiError::Status { message, .. } => message.clone(),
        ApiError::RateLimited(secs) => format!("Too many requests, try again in {secs}s"),
        ApiError::Http(_) | ApiError::Url(_) | ApiError::Parse(_) => {
            "Could not reach the store, please try again".to_string()
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
