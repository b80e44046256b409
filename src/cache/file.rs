//! File-based result cache with atomic writes.
//!
//! Stores records under `dirs::data_dir()/<namespace>/cache/` so the TTL
//! holds across short-lived processes (one per page render).
//! Uses temp file + rename for atomic writes.

use crate::cache::format::CacheRecord;
use crate::cache::ResultCache;
use crate::BlockGateError;
use std::fs;
use std::path::PathBuf;

/// File-based cache backend.
#[derive(Debug)]
pub struct FileCache {
    cache_dir: PathBuf,
}

impl FileCache {
    /// Create a cache under the platform data directory.
    pub fn new(namespace: &str) -> Result<Self, BlockGateError> {
        let base_dir = dirs::data_dir()
            .ok_or_else(|| BlockGateError::CacheIO("Could not find data directory".to_string()))?;
        Self::with_path(base_dir.join(namespace).join("cache"))
    }

    /// Create a cache in an explicit directory.
    pub fn with_path(cache_dir: PathBuf) -> Result<Self, BlockGateError> {
        fs::create_dir_all(&cache_dir)
            .map_err(|e| BlockGateError::CacheIO(format!("Failed to create cache dir: {}", e)))?;
        Ok(Self { cache_dir })
    }

    fn record_path(&self, key_hash: &str) -> PathBuf {
        // A hash prefix is enough to separate keys and keeps the full hash off disk names.
        let safe_name = &key_hash[..16.min(key_hash.len())];
        self.cache_dir.join(format!("{}.json", safe_name))
    }
}

impl ResultCache for FileCache {
    fn load(&self, key_hash: &str) -> Result<Option<CacheRecord>, BlockGateError> {
        let path = self.record_path(key_hash);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| BlockGateError::CacheIO(format!("Failed to read cache file: {}", e)))?;
        CacheRecord::from_json(&json).map(Some)
    }

    fn save(&self, record: &CacheRecord) -> Result<(), BlockGateError> {
        let target_path = self.record_path(&record.key_hash);
        let temp_path = target_path.with_extension("tmp");

        let json = record.to_json()?;
        fs::write(&temp_path, &json)
            .map_err(|e| BlockGateError::CacheIO(format!("Failed to write temp file: {}", e)))?;
        fs::rename(&temp_path, &target_path)
            .map_err(|e| BlockGateError::CacheIO(format!("Failed to rename cache file: {}", e)))?;

        Ok(())
    }

    fn clear(&self) -> Result<(), BlockGateError> {
        for entry in fs::read_dir(&self.cache_dir)
            .map_err(|e| BlockGateError::CacheIO(format!("Failed to read cache dir: {}", e)))?
        {
            let entry =
                entry.map_err(|e| BlockGateError::CacheIO(format!("Failed to read entry: {}", e)))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path)
                    .map_err(|e| BlockGateError::CacheIO(format!("Failed to delete: {}", e)))?;
            }
        }
        Ok(())
    }
}
