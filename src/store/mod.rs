//! License key storage.
//!
//! The key lives in site-wide configuration that is read on every check and
//! written rarely, from the admin settings form. Access goes through
//! [`KeyStore`] so the gate never touches ambient state directly.

pub mod file;
pub mod sanitize;

use crate::BlockGateError;
use std::sync::RwLock;

pub use file::FileKeyStore;
pub use sanitize::sanitize_text_field;

/// Read-many, write-rare storage for the site's license key.
pub trait KeyStore: Send + Sync {
    /// Return the stored key, or `None` if none was ever saved.
    fn get(&self) -> Result<Option<String>, BlockGateError>;

    /// Persist `key`, replacing any previous value.
    fn set(&self, key: &str) -> Result<(), BlockGateError>;
}

/// Process-local key store.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    key: RwLock<Option<String>>,
}

impl MemoryKeyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: RwLock::new(Some(key.into())),
        }
    }
}

impl KeyStore for MemoryKeyStore {
    fn get(&self) -> Result<Option<String>, BlockGateError> {
        self.key
            .read()
            .map(|key| key.clone())
            .map_err(|_| BlockGateError::StoreIO("key store lock poisoned".to_string()))
    }

    fn set(&self, key: &str) -> Result<(), BlockGateError> {
        let mut slot = self
            .key
            .write()
            .map_err(|_| BlockGateError::StoreIO("key store lock poisoned".to_string()))?;
        *slot = Some(key.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_starts_empty() {
        let store = MemoryKeyStore::new();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn memory_store_set_replaces() {
        let store = MemoryKeyStore::with_key("OLD");
        store.set("NEW").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("NEW"));
    }
}
