//! Time-bounded cache of remote validation answers.
//!
//! Only definitive answers (the server replied with a parseable body) are
//! stored. Transport failures are never cached, so an outage does not outlive
//! itself. The gate clears the cache whenever the stored key changes.

pub mod file;
pub mod format;

use crate::BlockGateError;
use format::CacheRecord;
use std::collections::HashMap;
use std::sync::RwLock;

pub use file::FileCache;

/// Storage for [`CacheRecord`]s, keyed by [`cache_key`].
pub trait ResultCache: Send + Sync {
    /// Load the record for `key_hash`, if any.
    fn load(&self, key_hash: &str) -> Result<Option<CacheRecord>, BlockGateError>;

    /// Store `record`, replacing any record for the same key.
    fn save(&self, record: &CacheRecord) -> Result<(), BlockGateError>;

    /// Drop every record.
    fn clear(&self) -> Result<(), BlockGateError>;
}

/// In-process cache for long-lived hosts.
#[derive(Debug, Default)]
pub struct MemoryCache {
    records: RwLock<HashMap<String, CacheRecord>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> BlockGateError {
    BlockGateError::CacheIO("cache lock poisoned".to_string())
}

impl ResultCache for MemoryCache {
    fn load(&self, key_hash: &str) -> Result<Option<CacheRecord>, BlockGateError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(key_hash).cloned())
    }

    fn save(&self, record: &CacheRecord) -> Result<(), BlockGateError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.insert(record.key_hash.clone(), record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), BlockGateError> {
        self.records.write().map_err(|_| poisoned())?.clear();
        Ok(())
    }
}

/// Compute a SHA-256 hash of the license key for use as cache key.
///
/// Keeps the raw key out of cache files and logs.
pub fn hash_license_key(license_key: &str) -> String {
    use sha2::{Digest, Sha256};
    let hash = Sha256::digest(license_key.as_bytes());
    hex::encode(hash)
}

/// Cache key for one answer: the license key as validated for one site
/// against one license server.
///
/// A record written for one domain or endpoint never matches a check for
/// another.
pub fn cache_key(endpoint: &str, domain: &str, license_key: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    for part in [endpoint, domain, license_key] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}
