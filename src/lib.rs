//! Manifold - Multi-provider LLM gateway
//!
//! This library provides the core functionality for the Manifold gateway.
//! It translates one vendor-agnostic chat request into the provider-specific
//! upstream call, relays the response back buffered or streamed, and records
//! every completed exchange asynchronously.

pub mod audit;
pub mod config;
pub mod error;
pub mod providers;
pub mod relay;
pub mod routes;
pub mod signing;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::audit::{
    AuditDispatcher, AuditStore, ExchangeRecord, MemoryAuditStore, RedisAuditStore,
};
pub use crate::config::Config;
pub use crate::providers::{Adapter, ChatMessage, Credentials, ResolvedCall};
pub use crate::relay::{HttpTransport, OutboundTransport, RelayEngine};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Audit store; also probed by the health endpoints
    pub audit_store: Arc<dyn AuditStore>,
    /// Relay engine that executes resolved upstream calls
    pub engine: Arc<RelayEngine>,
}

impl AppState {
    /// Create a new application state
    pub async fn new(config: Config) -> Result<Self> {
        // Initialize the Redis connection backing the audit store
        let redis_client = redis::Client::open(config.redis_url.as_str())?;
        let redis = redis::aio::ConnectionManager::new(redis_client).await?;

        // Initialize HTTP client with connection pooling
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .timeout(std::time::Duration::from_secs(
                config.upstream_timeout_seconds,
            ))
            .connect_timeout(std::time::Duration::from_secs(
                config.connect_timeout_seconds,
            ))
            .build()?;

        let transport: Arc<dyn OutboundTransport> = Arc::new(HttpTransport::new(http_client));

        let audit_store: Arc<dyn AuditStore> = Arc::new(RedisAuditStore::new(redis));
        let dispatcher = AuditDispatcher::new(audit_store.clone(), config.audit_channel_buffer);
        let engine = Arc::new(RelayEngine::new(
            transport,
            dispatcher,
            config.audit_max_buffer_bytes,
        ));

        Ok(Self {
            config,
            start_time: Instant::now(),
            audit_store,
            engine,
        })
    }

    /// Create application state for testing with an injected transport and store
    ///
    /// No Redis connection is opened; the audit store and the outbound
    /// transport are whatever the test supplies.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_for_testing(
        config: Config,
        transport: Arc<dyn OutboundTransport>,
        audit_store: Arc<dyn AuditStore>,
    ) -> Self {
        let dispatcher = AuditDispatcher::new(audit_store.clone(), config.audit_channel_buffer);
        let engine = Arc::new(RelayEngine::new(
            transport,
            dispatcher,
            config.audit_max_buffer_bytes,
        ));

        Self {
            config,
            start_time: Instant::now(),
            audit_store,
            engine,
        }
    }
}
