//! File-backed storage backend.
//!
//! All keys live in one JSON object at `<dir>/storage.json`. Every operation
//! re-reads the file, so several handles on the same directory stay
//! consistent as long as they are used one after another. Writes go to a
//! temporary sibling file which is then renamed over the original.
//!
//! A corrupt file reads as an error. The next write replaces it with a fresh
//! document holding only the key being written, so every other key is lost,
//! including the stored token: a corrupt profile signs the shopper out.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{Storage, StorageError};

const FILE_NAME: &str = "storage.json";

type Entries = BTreeMap<String, String>;

/// Storage persisted as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Open (or prepare) the storage profile in `dir`, creating the
    /// directory if needed. The file itself is created on first write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(FILE_NAME),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Entries::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    /// Load entries for a write. A corrupt document is discarded so the
    /// profile heals on the next write instead of failing forever.
    fn load_for_write(&self) -> Result<Entries, StorageError> {
        match self.load() {
            Err(StorageError::Corrupt(e)) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Storage file is corrupt, starting from an empty profile"
                );
                Ok(Entries::new())
            }
            other => other,
        }
    }

    fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = entries.len(), "Storage written");
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load_for_write()?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get("cart").unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("token", "abc.def.ghi").unwrap();
        storage.set("cart", "[]").unwrap();

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc.def.ghi"));
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_remove_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("token", "t").unwrap();
        storage.set("cart", "[]").unwrap();

        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("profiles").join("default");
        let mut storage = FileStorage::open(&nested).unwrap();
        storage.set("cart", "[]").unwrap();
        assert!(nested.join("storage.json").exists());
    }

    #[test]
    fn test_corrupt_file_errors_on_read_and_heals_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        fs::write(storage.path(), "{ not json").unwrap();

        assert!(matches!(storage.get("cart"), Err(StorageError::Corrupt(_))));

        storage.set("cart", "[]").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_healing_write_drops_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("token", "jwt").unwrap();

        // truncate mid-document
        let raw = fs::read_to_string(storage.path()).unwrap();
        fs::write(storage.path(), raw.get(..raw.len() / 2).unwrap()).unwrap();

        storage.set("cart", "[]").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));
    }
}
