//! In-memory storage backend.

use std::collections::HashMap;

use super::{Storage, StorageError};

/// Storage held in a `HashMap`. Contents vanish when it is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("cart").unwrap(), None);

        storage.set("cart", "[]").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));

        storage.remove("cart").unwrap();
        assert!(storage.is_empty());

        // removing again is fine
        storage.remove("cart").unwrap();
    }

    #[test]
    fn test_with_entries() {
        let storage = MemoryStorage::with_entries([("token", "abc")]);
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc"));
    }
}
