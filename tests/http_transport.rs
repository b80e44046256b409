//! The reqwest transport against a local HTTP server.
//!
//! The transport is blocking, so every call runs on tokio's blocking pool
//! while the mock server keeps serving on the runtime.

use blockgate::cache::MemoryCache;
use blockgate::client::http::{HttpTransport, LicenseClient, LicenseTransport};
use blockgate::{
    BlockGateConfig, BlockGateError, InactiveReason, LicenseGate, LicenseStatus, MemoryKeyStore,
    SystemClock,
};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FORM_BODY: &str = "license_key=ABC123&domain=example.com&secret=shh&action=validate";

fn config_for(server: &MockServer) -> BlockGateConfig {
    BlockGateConfig::new(format!("{}/api.php", server.uri()), "shh", "example.com")
}

fn client(config: &BlockGateConfig, timeout: Duration) -> LicenseClient {
    let transport = HttpTransport::with_timeout("blockgate-tests".to_string(), timeout).unwrap();
    LicenseClient::new(config, Box::new(transport))
}

#[tokio::test(flavor = "multi_thread")]
async fn posts_validate_form_and_reads_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("user-agent", "blockgate-tests"))
        .and(body_string(FORM_BODY))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"valid":true,"email":"x@y.com"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = tokio::task::spawn_blocking(move || {
        client(&config, Duration::from_secs(5)).validate_key("ABC123")
    })
    .await
    .unwrap()
    .unwrap();

    assert!(result.valid);
    assert_eq!(result.email.as_deref(), Some("x@y.com"));
}

#[tokio::test(flavor = "multi_thread")]
async fn service_unavailable_is_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string(r#"{"valid":true}"#))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = tokio::task::spawn_blocking(move || {
        client(&config, Duration::from_secs(5)).validate_key("ABC123")
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(BlockGateError::HttpStatus { status: 503 })));
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"valid":true}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = tokio::task::spawn_blocking(move || {
        client(&config, Duration::from_millis(200)).validate_key("ABC123")
    })
    .await
    .unwrap();

    match result {
        Err(BlockGateError::Transport(msg)) => assert!(msg.contains("timed out"), "{}", msg),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_server_fails_closed_through_the_gate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"valid":true}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    let check = tokio::task::spawn_blocking(move || {
        let transport =
            HttpTransport::with_timeout("blockgate-tests".to_string(), Duration::from_millis(200))
                .unwrap();
        let gate = LicenseGate::from_parts(
            config,
            Arc::new(MemoryKeyStore::with_key("ABC123")),
            Box::new(transport),
            Arc::new(MemoryCache::new()),
            Arc::new(SystemClock),
        )
        .unwrap();
        gate.check()
    })
    .await
    .unwrap();

    assert_eq!(check.status, LicenseStatus::Inactive(InactiveReason::Network));
}

#[test]
fn refused_connection_is_transport_error() {
    // Bind then release a port so nothing is listening on it.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let transport =
        HttpTransport::with_timeout("blockgate-tests".to_string(), Duration::from_secs(2)).unwrap();

    let result = transport.post_form(
        &format!("http://127.0.0.1:{}/api.php", port),
        &[("action", "validate")],
    );
    assert!(matches!(result, Err(BlockGateError::Transport(_))));
}
