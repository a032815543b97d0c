//! Common test utilities for Manifold
//!
//! This module provides the shared test harness and helper functions used
//! across the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;

use manifold::relay::{TransportError, UpstreamResponse};
use manifold::{
    routes, AppState, Config, ExchangeRecord, HttpTransport, MemoryAuditStore, OutboundTransport,
    ResolvedCall,
};

use crate::mocks::MockUpstream;

/// Test configuration constants
pub mod constants {
    /// Default test API key
    pub const TEST_API_KEY: &str = "test-api-key";
    /// Default test secret id for the signing provider
    pub const TEST_SECRET_ID: &str = "AKIDtest";
    /// Default test secret key for the signing provider
    pub const TEST_SECRET_KEY: &str = "test-secret-key";
}

/// Create a test config; nothing connects to the Redis URL it carries.
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        redis_url: "redis://localhost:6379".to_string(),
        upstream_timeout_seconds: 30,
        connect_timeout_seconds: 5,
        audit_max_buffer_bytes: 16 * 1024 * 1024,
        audit_channel_buffer: 64,
    }
}

/// Transport that redirects every resolved call to the mock upstream.
///
/// The resolved path and query are kept intact, so wiremock matchers see
/// exactly what the adapter built; only the scheme and authority change.
pub struct RedirectingTransport {
    inner: HttpTransport,
    base: String,
}

impl RedirectingTransport {
    pub fn new(base: String) -> Self {
        Self {
            inner: HttpTransport::new(reqwest::Client::new()),
            base,
        }
    }

    fn redirect(&self, url: &str) -> String {
        let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
        match url[after_scheme..].find('/') {
            Some(i) => format!("{}{}", self.base, &url[after_scheme + i..]),
            None => self.base.clone(),
        }
    }
}

#[async_trait]
impl OutboundTransport for RedirectingTransport {
    async fn send(&self, mut call: ResolvedCall) -> Result<UpstreamResponse, TransportError> {
        call.url = self.redirect(&call.url);
        self.inner.send(call).await
    }
}

/// Test harness for blackbox gateway tests
///
/// Creates a complete test environment with:
/// - Mock upstream vendor (wiremock) that all resolved calls are routed to
/// - In-memory audit store with record inspection
/// - Real app router served by axum-test
///
/// No Redis connection is required.
///
/// # Example
///
/// ```ignore
/// let harness = TestHarness::new().await;
/// harness.upstream.mock_chat_completion().await;
///
/// let response = harness.server
///     .post("/proxy")
///     .json(&test_data::chat_request("openai"))
///     .await;
///
/// response.assert_status_ok();
/// let records = harness.wait_for_records(1, Duration::from_secs(2)).await;
/// assert_eq!(records.len(), 1);
/// ```
pub struct TestHarness {
    pub server: TestServer,
    pub upstream: MockUpstream,
    pub store: Arc<MemoryAuditStore>,
}

impl TestHarness {
    /// Create a new test harness with the default config
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a new test harness with the given config
    pub async fn with_config(config: Config) -> Self {
        // The Prometheus recorder is process-wide; without it, counters
        // incremented during a test land in the default no-op recorder.
        routes::metrics::init_metrics();

        let upstream = MockUpstream::start().await;
        let store = Arc::new(MemoryAuditStore::new());

        let transport: Arc<dyn OutboundTransport> =
            Arc::new(RedirectingTransport::new(upstream.uri()));
        let state = Arc::new(AppState::new_for_testing(config, transport, store.clone()));

        let app = routes::create_router(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            upstream,
            store,
        }
    }

    /// Wait until the audit store holds at least `min_count` records.
    ///
    /// Polls the store until the expected number of records arrive or the
    /// timeout is reached, then returns whatever is there.
    pub async fn wait_for_records(
        &self,
        min_count: usize,
        timeout: Duration,
    ) -> Vec<ExchangeRecord> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let records = self.store.records();
            if records.len() >= min_count {
                return records;
            }
            if tokio::time::Instant::now() > deadline {
                return records;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Assert that no audit record shows up within a grace period.
    pub async fn assert_no_records(&self) {
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(
            self.store.is_empty(),
            "expected no audit records, found {}",
            self.store.len()
        );
    }
}

/// Sample request data for tests
pub mod test_data {
    use super::constants;
    use serde_json::json;

    /// Valid buffered request for an OpenAI-compatible provider
    pub fn chat_request(provider: &str) -> serde_json::Value {
        json!({
            "provider": provider,
            "model": "gpt-4",
            "messages": [{"role": "user", "content": "hi"}],
            "apiKey": constants::TEST_API_KEY
        })
    }

    /// Valid streaming request for an OpenAI-compatible provider
    pub fn streaming_chat_request(provider: &str) -> serde_json::Value {
        let mut request = chat_request(provider);
        request["stream"] = json!(true);
        request
    }

    /// Request for the signing provider
    pub fn hunyuan_request() -> serde_json::Value {
        json!({
            "provider": "hunyuan",
            "model": "hunyuan-lite",
            "messages": [{"role": "user", "content": "hi"}],
            "secretId": constants::TEST_SECRET_ID,
            "secretKey": constants::TEST_SECRET_KEY
        })
    }
}
