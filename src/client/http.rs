//! Reqwest-based HTTP client for the license server.
//!
//! [`LicenseTransport`] is the network seam: the gate only ever talks to the
//! server through it, so tests can count calls or simulate outages.

use crate::config::BlockGateConfig;
use crate::protocol::models::{parse_validation_response, LicenseValidationResult};
use crate::BlockGateError;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::debug;

/// Raw HTTP response from the license server.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    /// HTTP status code.
    pub status: u16,

    /// Raw response body.
    pub body: Vec<u8>,
}

impl RemoteResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends form-encoded POST requests.
pub trait LicenseTransport: Send + Sync {
    /// POST `fields` form-encoded to `url`.
    ///
    /// # Errors
    /// `Transport` when no response was received at all.
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<RemoteResponse, BlockGateError>;
}

/// Blocking reqwest transport with a fixed timeout.
pub struct HttpTransport {
    client: Client,
    user_agent: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport from config.
    pub fn new(config: &BlockGateConfig) -> Result<Self, BlockGateError> {
        Self::with_timeout(build_user_agent(config), config.request_timeout)
    }

    /// Create a transport with an explicit user agent and timeout.
    pub fn with_timeout(user_agent: String, timeout: Duration) -> Result<Self, BlockGateError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BlockGateError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            user_agent,
            timeout,
        })
    }

    /// Whole-request timeout applied to every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl LicenseTransport for HttpTransport {
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<RemoteResponse, BlockGateError> {
        let response = self
            .client
            .post(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .form(fields)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    BlockGateError::Transport(format!("Request timed out: {}", e))
                } else {
                    BlockGateError::Transport(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| BlockGateError::Transport(format!("Failed to read body: {}", e)))?
            .to_vec();

        Ok(RemoteResponse { status, body })
    }
}

/// License server client: builds the `validate` request and interprets the reply.
pub struct LicenseClient {
    transport: Box<dyn LicenseTransport>,
    endpoint: String,
    secret: String,
    domain: String,
}

impl LicenseClient {
    /// Create a client over the given transport.
    pub fn new(config: &BlockGateConfig, transport: Box<dyn LicenseTransport>) -> Self {
        Self {
            transport,
            endpoint: config.endpoint.clone(),
            secret: config.secret.clone(),
            domain: config.domain.clone(),
        }
    }

    /// Ask the server whether `license_key` is valid for this domain.
    ///
    /// # Errors
    /// - `MissingLicense` for an empty key (no request is sent)
    /// - `Transport` when the request could not complete
    /// - `HttpStatus` for a non-2xx reply
    /// - `MalformedResponse` when the body is not the expected JSON
    pub fn validate_key(&self, license_key: &str) -> Result<LicenseValidationResult, BlockGateError> {
        if license_key.is_empty() {
            return Err(BlockGateError::MissingLicense);
        }

        let fields = [
            ("license_key", license_key),
            ("domain", self.domain.as_str()),
            ("secret", self.secret.as_str()),
            ("action", "validate"),
        ];

        let response = self.transport.post_form(&self.endpoint, &fields)?;
        debug!(status = response.status, domain = %self.domain, "license server replied");

        if !response.is_success() {
            return Err(BlockGateError::HttpStatus {
                status: response.status,
            });
        }

        parse_validation_response(&response.body)
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Build a User-Agent string from config.
///
/// Format: `<product>/blockgate-<version> <domain>`
/// Example: `web-advisor-pro/blockgate-0.1.0 example.com`
pub fn build_user_agent(config: &BlockGateConfig) -> String {
    format!(
        "{}/blockgate-{} {}",
        config.user_agent_product,
        env!("CARGO_PKG_VERSION"),
        config.domain
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Sent = Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>;

    struct CannedTransport {
        reply: Result<RemoteResponse, String>,
        sent: Sent,
    }

    impl LicenseTransport for CannedTransport {
        fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<RemoteResponse, BlockGateError> {
            self.sent.lock().unwrap().push((
                url.to_string(),
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            self.reply.clone().map_err(BlockGateError::Transport)
        }
    }

    fn test_config() -> BlockGateConfig {
        BlockGateConfig::new("https://license.example.com/api.php", "shh", "example.com")
    }

    fn client_with(reply: Result<RemoteResponse, String>) -> (LicenseClient, Sent) {
        let sent = Sent::default();
        let transport = CannedTransport {
            reply,
            sent: sent.clone(),
        };
        (LicenseClient::new(&test_config(), Box::new(transport)), sent)
    }

    fn ok(status: u16, body: &str) -> Result<RemoteResponse, String> {
        Ok(RemoteResponse {
            status,
            body: body.as_bytes().to_vec(),
        })
    }

    #[test]
    fn sends_validate_form() {
        let (client, sent) = client_with(ok(200, r#"{"valid":true}"#));
        client.validate_key("ABC123").unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (url, fields) = &sent[0];
        assert_eq!(url, "https://license.example.com/api.php");
        assert_eq!(
            fields,
            &vec![
                ("license_key".to_string(), "ABC123".to_string()),
                ("domain".to_string(), "example.com".to_string()),
                ("secret".to_string(), "shh".to_string()),
                ("action".to_string(), "validate".to_string()),
            ]
        );
    }

    #[test]
    fn empty_key_sends_nothing() {
        let (client, sent) = client_with(ok(200, r#"{"valid":true}"#));
        assert!(matches!(
            client.validate_key(""),
            Err(BlockGateError::MissingLicense)
        ));
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn non_2xx_is_http_status_even_with_valid_body() {
        let (client, _) = client_with(ok(500, r#"{"valid":true}"#));
        assert!(matches!(
            client.validate_key("ABC123"),
            Err(BlockGateError::HttpStatus { status: 500 })
        ));
    }

    #[test]
    fn transport_error_propagates() {
        let (client, _) = client_with(Err("timed out".to_string()));
        assert!(matches!(
            client.validate_key("ABC123"),
            Err(BlockGateError::Transport(_))
        ));
    }

    #[test]
    fn test_build_user_agent() {
        let ua = build_user_agent(&test_config());
        assert_eq!(
            ua,
            format!("web-advisor-pro/blockgate-{} example.com", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn http_transport_uses_configured_timeout() {
        let transport = HttpTransport::new(&test_config()).unwrap();
        assert_eq!(transport.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn remote_response_success_range() {
        let mk = |status| RemoteResponse {
            status,
            body: Vec::new(),
        };
        assert!(mk(200).is_success());
        assert!(mk(204).is_success());
        assert!(!mk(301).is_success());
        assert!(!mk(404).is_success());
    }
}
