//! Local key/value storage.
//!
//! The storefront keeps two pieces of client state between runs: the cart
//! contents and the shopper's bearer token. Both live in a flat string
//! key/value store, the same shape as browser local storage. [`Storage`] is
//! the seam; [`MemoryStorage`] backs tests and [`FileStorage`] persists a
//! profile on disk.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// Key holding the JSON-encoded cart line items.
    pub const CART: &str = "cart";

    /// Key holding the bearer token of the signed-in account.
    pub const TOKEN: &str = "token";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not contain a valid key/value document.
    #[error("storage data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A string key/value store.
///
/// Reads take `&self`; writes take `&mut self`, so a single owner sequences
/// every read-modify-write.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
