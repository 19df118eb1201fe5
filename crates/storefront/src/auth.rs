//! Bearer token persistence.
//!
//! Signing in yields a bearer token that later requests send in the
//! `Authorization` header. The token is kept under [`keys::TOKEN`] in the
//! same storage profile as the cart.

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::storage::{Storage, StorageError, keys};

/// Reads and writes the stored bearer token.
#[derive(Debug)]
pub struct TokenStore<S> {
    storage: S,
}

impl<S: Storage> TokenStore<S> {
    /// Wrap a storage backend.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The stored token, if any. Unreadable storage reads as signed out.
    #[must_use]
    pub fn get(&self) -> Option<SecretString> {
        match self.storage.get(keys::TOKEN) {
            Ok(token) => token
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "Token storage unavailable, treating as signed out");
                None
            }
        }
    }

    /// Whether a token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// Store a token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the token cannot be written.
    pub fn set(&mut self, token: &SecretString) -> Result<(), StorageError> {
        self.storage.set(keys::TOKEN, token.expose_secret())
    }

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage cannot be written.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(keys::TOKEN)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_set_get_clear() {
        let mut tokens = TokenStore::new(MemoryStorage::new());
        assert!(!tokens.is_authenticated());

        tokens.set(&SecretString::from("header.payload.sig")).unwrap();
        assert_eq!(tokens.get().unwrap().expose_secret(), "header.payload.sig");

        tokens.clear().unwrap();
        assert!(tokens.get().is_none());
    }

    #[test]
    fn test_blank_token_is_signed_out() {
        let tokens = TokenStore::new(MemoryStorage::with_entries([("token", "  ")]));
        assert!(!tokens.is_authenticated());
    }

    #[test]
    fn test_shares_profile_with_cart() {
        let storage = MemoryStorage::with_entries([("cart", "[]"), ("token", "abc")]);
        let mut tokens = TokenStore::new(storage);
        tokens.clear().unwrap();
        assert_eq!(tokens.storage.get("cart").unwrap().as_deref(), Some("[]"));
    }
}
