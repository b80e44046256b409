//! File-backed key store with atomic writes.
//!
//! Stores the key as JSON under `dirs::data_dir()/<namespace>/license.json`.
//! Writes go to a temp file first and are renamed into place.

use crate::store::KeyStore;
use crate::BlockGateError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const KEY_FILE: &str = "license.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredKey {
    license_key: String,
}

/// Key store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileKeyStore {
    dir: PathBuf,
}

impl FileKeyStore {
    /// Create a store under the platform data directory.
    pub fn new(namespace: &str) -> Result<Self, BlockGateError> {
        let base_dir = dirs::data_dir()
            .ok_or_else(|| BlockGateError::StoreIO("Could not find data directory".to_string()))?;
        Self::with_path(base_dir.join(namespace))
    }

    /// Create a store in an explicit directory.
    pub fn with_path(dir: PathBuf) -> Result<Self, BlockGateError> {
        fs::create_dir_all(&dir)
            .map_err(|e| BlockGateError::StoreIO(format!("Failed to create store dir: {}", e)))?;
        Ok(Self { dir })
    }

    /// Directory holding the key file.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self) -> PathBuf {
        self.dir.join(KEY_FILE)
    }
}

impl KeyStore for FileKeyStore {
    fn get(&self) -> Result<Option<String>, BlockGateError> {
        let path = self.key_path();
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| BlockGateError::StoreIO(format!("Failed to read key file: {}", e)))?;
        let stored: StoredKey = serde_json::from_str(&json)
            .map_err(|e| BlockGateError::StoreIO(format!("Failed to parse key file: {}", e)))?;

        Ok(Some(stored.license_key))
    }

    fn set(&self, key: &str) -> Result<(), BlockGateError> {
        let json = serde_json::to_string_pretty(&StoredKey {
            license_key: key.to_string(),
        })
        .map_err(|e| BlockGateError::StoreIO(format!("Failed to serialize key: {}", e)))?;

        let temp_path = self.dir.join(format!("{}.tmp", KEY_FILE));
        fs::write(&temp_path, json)
            .map_err(|e| BlockGateError::StoreIO(format!("Failed to write temp file: {}", e)))?;
        fs::rename(&temp_path, self.key_path())
            .map_err(|e| BlockGateError::StoreIO(format!("Failed to rename key file: {}", e)))?;

        Ok(())
    }
}
