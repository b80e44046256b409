//! License gate - the main server-side API.
//!
//! The `LicenseGate` answers one question per page render: may pro blocks
//! load? It:
//! - reads the stored key through a [`KeyStore`]
//! - reuses a recent definitive answer from the [`ResultCache`]
//! - otherwise asks the license server, failing closed on any error
//!
//! The reason for an inactive result is kept in [`InactiveReason`] and logged,
//! so a network outage reads differently from a rejected key.

use crate::cache::format::CacheRecord;
use crate::cache::{cache_key, hash_license_key, FileCache, ResultCache};
use crate::client::http::{HttpTransport, LicenseClient, LicenseTransport};
use crate::clock::{Clock, SystemClock};
use crate::config::BlockGateConfig;
use crate::features::flag::FeatureFlag;
use crate::store::{sanitize_text_field, KeyStore};
use crate::BlockGateError;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a license is not active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InactiveReason {
    /// No key stored; the server was not contacted.
    MissingKey,
    /// The server answered and did not accept the key.
    Rejected,
    /// The request never completed (timeout, DNS, TLS, connection).
    Network,
    /// The server answered with a non-2xx status.
    HttpStatus(u16),
    /// The server's reply was not the expected JSON.
    MalformedResponse,
    /// The stored key could not be read.
    StoreUnavailable,
    /// Any other internal failure.
    Internal,
}

impl From<&BlockGateError> for InactiveReason {
    fn from(err: &BlockGateError) -> Self {
        match err {
            BlockGateError::MissingLicense => Self::MissingKey,
            BlockGateError::InvalidLicense => Self::Rejected,
            BlockGateError::Transport(_) => Self::Network,
            BlockGateError::HttpStatus { status } => Self::HttpStatus(*status),
            BlockGateError::MalformedResponse(_) => Self::MalformedResponse,
            BlockGateError::StoreIO(_) => Self::StoreUnavailable,
            _ => Self::Internal,
        }
    }
}

/// License status as shown on the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    /// The server accepted the key.
    Active,
    /// Pro features stay locked.
    Inactive(InactiveReason),
}

impl LicenseStatus {
    /// True only for [`LicenseStatus::Active`].
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Admin-facing label. Every inactive reason shares one label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "License Active",
            Self::Inactive(_) => "License Inactive",
        }
    }
}

/// Result of one license check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseCheck {
    /// Active or inactive, with reason.
    pub status: LicenseStatus,

    /// Email of the license holder, when the server reported one.
    pub email: Option<String>,

    /// Whether the answer came from the result cache.
    pub from_cache: bool,
}

impl LicenseCheck {
    fn inactive(reason: InactiveReason) -> Self {
        Self {
            status: LicenseStatus::Inactive(reason),
            email: None,
            from_cache: false,
        }
    }

    fn from_answer(valid: bool, email: Option<String>, from_cache: bool) -> Self {
        let status = if valid {
            LicenseStatus::Active
        } else {
            LicenseStatus::Inactive(InactiveReason::Rejected)
        };
        Self {
            status,
            email,
            from_cache,
        }
    }

    /// Shorthand for `status.is_active()`.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Server-side license gate.
///
/// Create one per site and reuse it; it is `Send + Sync`.
pub struct LicenseGate {
    config: BlockGateConfig,
    clock: Arc<dyn Clock>,
    client: LicenseClient,
    store: Arc<dyn KeyStore>,
    cache: Arc<dyn ResultCache>,
}

impl LicenseGate {
    /// Create a gate with the HTTP transport, a file-backed result cache
    /// and the system clock.
    ///
    /// # Errors
    /// - Configuration validation fails
    /// - HTTP client creation fails
    /// - Cache directory creation fails
    pub fn new(config: BlockGateConfig, store: Arc<dyn KeyStore>) -> Result<Self, BlockGateError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        let cache = FileCache::new(&config.namespace)?;
        Self::from_parts(
            config,
            store,
            Box::new(transport),
            Arc::new(cache),
            Arc::new(SystemClock),
        )
    }

    /// Create a gate from explicit collaborators.
    pub fn from_parts(
        config: BlockGateConfig,
        store: Arc<dyn KeyStore>,
        transport: Box<dyn LicenseTransport>,
        cache: Arc<dyn ResultCache>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, BlockGateError> {
        config.validate()?;
        let client = LicenseClient::new(&config, transport);

        Ok(Self {
            config,
            clock,
            client,
            store,
            cache,
        })
    }

    /// Check the stored key. Never fails: every error is an inactive status.
    pub fn check(&self) -> LicenseCheck {
        let key = match self.store.get() {
            Ok(Some(key)) if !key.is_empty() => key,
            Ok(_) => {
                debug!("no license key stored; skipping remote validation");
                return LicenseCheck::inactive(InactiveReason::MissingKey);
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "license key unreadable; treating license as inactive");
                return LicenseCheck::inactive(InactiveReason::from(&e));
            }
        };

        let key_hash = cache_key(&self.config.endpoint, &self.config.domain, &key);
        if let Some(check) = self.cached(&key_hash) {
            return check;
        }

        self.check_remote(&key, key_hash)
    }

    /// True when the license is active. Fail-closed.
    pub fn is_valid(&self) -> bool {
        self.check().is_active()
    }

    /// Flag to inject into the rendered page.
    pub fn feature_flag(&self) -> FeatureFlag {
        FeatureFlag::new(self.is_valid())
    }

    /// Currently stored key.
    pub fn license_key(&self) -> Result<Option<String>, BlockGateError> {
        self.store.get()
    }

    /// Sanitize and store a submitted key, returning what was stored.
    ///
    /// The result cache is cleared when the stored key actually changes.
    pub fn set_license_key(&self, raw: &str) -> Result<String, BlockGateError> {
        let key = sanitize_text_field(raw);
        let previous = self.store.get()?;

        if previous.as_deref() == Some(key.as_str()) {
            debug!("submitted license key unchanged");
            return Ok(key);
        }

        self.store.set(&key)?;
        self.invalidate()?;
        info!(key_hash = short_hash(&key), "license key updated");
        Ok(key)
    }

    /// Drop every cached answer, forcing the next check to go remote.
    pub fn invalidate(&self) -> Result<(), BlockGateError> {
        self.cache.clear()
    }

    /// Get the current configuration.
    pub fn config(&self) -> &BlockGateConfig {
        &self.config
    }

    fn cached(&self, key_hash: &str) -> Option<LicenseCheck> {
        if self.config.cache_ttl.is_zero() {
            return None;
        }

        let record = match self.cache.load(key_hash) {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "result cache unreadable");
                return None;
            }
        };

        match record.check(key_hash, self.config.cache_ttl, self.clock.as_ref()) {
            Ok(()) => {
                debug!(valid = record.valid, from_cache = true, "using cached license answer");
                Some(LicenseCheck::from_answer(record.valid, record.email, true))
            }
            Err(BlockGateError::CacheExpired) => None,
            Err(e) => {
                warn!(kind = e.kind(), "discarding cached license answer");
                None
            }
        }
    }

    fn check_remote(&self, key: &str, key_hash: String) -> LicenseCheck {
        let result = match self.client.validate_key(key) {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    kind = e.kind(),
                    error = %e,
                    domain = %self.config.domain,
                    "license validation failed; treating license as inactive"
                );
                return LicenseCheck::inactive(InactiveReason::from(&e));
            }
        };

        if !self.config.cache_ttl.is_zero() {
            let record = CacheRecord::new(key_hash, &result, self.clock.as_ref());
            if let Err(e) = self.cache.save(&record) {
                warn!(kind = e.kind(), error = %e, "failed to cache license answer");
            }
        }

        if result.valid {
            info!(domain = %self.config.domain, "license active");
        } else {
            info!(
                kind = BlockGateError::InvalidLicense.kind(),
                domain = %self.config.domain,
                "license rejected by server"
            );
        }

        LicenseCheck::from_answer(result.valid, result.email, false)
    }
}

fn short_hash(key: &str) -> String {
    hash_license_key(key)[..12].to_string()
}
