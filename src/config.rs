//! Blockgate configuration.

use crate::BlockGateError;
use std::time::Duration;

/// Hard ceiling on a single validation round trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// How long a definitive answer from the license server is reused.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Default storage namespace under the platform data directory.
pub const DEFAULT_NAMESPACE: &str = "web-advisor-theme-builder";

/// Configuration for the license gate.
///
/// `endpoint` and `secret` identify the license server and are normally
/// compiled into the plugin. `domain` is the site being licensed.
#[derive(Debug, Clone)]
pub struct BlockGateConfig {
    /// License server URL receiving the `validate` POST.
    pub endpoint: String,

    /// Shared secret sent with every validation request.
    pub secret: String,

    /// Domain of the site being licensed (e.g. "example.com").
    pub domain: String,

    /// User-Agent product identifier (e.g. "web-advisor-pro").
    pub user_agent_product: String,

    /// Storage namespace for the key store and result cache.
    /// Each site install should use its own.
    pub namespace: String,

    /// Per-request timeout. Requests that exceed it fail closed.
    pub request_timeout: Duration,

    /// Result cache lifetime. Zero disables caching.
    pub cache_ttl: Duration,
}

impl BlockGateConfig {
    /// Build a config with default timeout, TTL and namespace.
    pub fn new(
        endpoint: impl Into<String>,
        secret: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            secret: secret.into(),
            domain: domain.into(),
            user_agent_product: "web-advisor-pro".to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), BlockGateError> {
        if self.endpoint.is_empty() {
            return Err(BlockGateError::ConfigError(
                "endpoint cannot be empty".to_string(),
            ));
        }
        if !self.endpoint.starts_with("https://") && !is_loopback_http(&self.endpoint) {
            return Err(BlockGateError::ConfigError(format!(
                "endpoint must use https, got {}",
                self.endpoint
            )));
        }
        if self.secret.is_empty() {
            return Err(BlockGateError::ConfigError(
                "secret cannot be empty".to_string(),
            ));
        }
        if self.domain.trim().is_empty() {
            return Err(BlockGateError::ConfigError(
                "domain cannot be empty".to_string(),
            ));
        }
        if self.namespace.is_empty() {
            return Err(BlockGateError::ConfigError(
                "namespace cannot be empty".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(BlockGateError::ConfigError(
                "request_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Plain http is only accepted for a license server on the local machine.
fn is_loopback_http(endpoint: &str) -> bool {
    let Some(rest) = endpoint.strip_prefix("http://") else {
        return false;
    };
    let host = rest.split(['/', ':']).next().unwrap_or_default();
    matches!(host, "localhost" | "127.0.0.1")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BlockGateConfig {
        BlockGateConfig::new("https://license.example.com/api.php", "s3cret", "example.com")
    }

    #[test]
    fn defaults_are_applied() {
        let config = base();
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.cache_ttl, DEFAULT_CACHE_TTL);
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_plain_http_to_remote_host() {
        let mut config = base();
        config.endpoint = "http://license.example.com/api.php".to_string();
        assert!(matches!(
            config.validate(),
            Err(BlockGateError::ConfigError(_))
        ));
    }

    #[test]
    fn allows_plain_http_to_localhost() {
        let mut config = base();
        config.endpoint = "http://127.0.0.1:8080/validate".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_secret_and_domain() {
        let mut config = base();
        config.secret = String::new();
        assert!(config.validate().is_err());

        let mut config = base();
        config.domain = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = base();
        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
