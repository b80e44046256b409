//! Blockgate error types.

use thiserror::Error;

/// Errors that can occur while validating a license or resolving features.
///
/// Callers of [`crate::LicenseGate::is_valid`] never see these: every variant
/// collapses to "inactive". They surface through the fallible APIs and in
/// logs, where [`BlockGateError::kind`] keeps outages distinguishable from
/// genuinely rejected keys.
#[derive(Debug, Error)]
pub enum BlockGateError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No license key is stored.
    #[error("No license key provided")]
    MissingLicense,

    /// The license server answered and rejected the key.
    #[error("Invalid or inactive license")]
    InvalidLicense,

    /// HTTP transport error talking to the license server (timeout, DNS, TLS).
    #[error("License server transport error: {0}")]
    Transport(String),

    /// License server answered with a non-2xx status.
    #[error("License server returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// Response body was not the expected JSON shape.
    #[error("Malformed license response: {0}")]
    MalformedResponse(String),

    /// License key storage could not be read or written.
    #[error("Key store I/O error: {0}")]
    StoreIO(String),

    /// Result cache I/O error.
    #[error("Cache I/O error: {0}")]
    CacheIO(String),

    /// Cached result is older than the configured TTL.
    #[error("Cached validation expired")]
    CacheExpired,

    /// Cached result is dated in the future or belongs to another key.
    #[error("Cached validation is inconsistent")]
    CacheTampered,

    /// A settings form submission lacked a required field.
    #[error("Form field missing: {0}")]
    MissingFormField(String),

    /// The host editor refused a block registration.
    #[error("Failed to register block {block}: {reason}")]
    RegistrationFailed {
        /// Fully qualified block name, e.g. `web-advisor/button-block`.
        block: String,
        /// Reason reported by the registrar.
        reason: String,
    },
}

impl BlockGateError {
    /// Stable snake_case label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "config",
            Self::MissingLicense => "missing_license",
            Self::InvalidLicense => "invalid_license",
            Self::Transport(_) => "network",
            Self::HttpStatus { .. } => "http_status",
            Self::MalformedResponse(_) => "malformed_response",
            Self::StoreIO(_) => "store_io",
            Self::CacheIO(_) => "cache_io",
            Self::CacheExpired => "cache_expired",
            Self::CacheTampered => "cache_tampered",
            Self::MissingFormField(_) => "missing_form_field",
            Self::RegistrationFailed { .. } => "registration_failed",
        }
    }
}
