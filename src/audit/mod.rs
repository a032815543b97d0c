//! Exchange auditing
//!
//! Every completed relay produces one `ExchangeRecord`. Persistence is
//! decoupled from the relay path by a bounded channel and a background
//! worker: `dispatch()` never blocks and never fails, and store errors are
//! logged and counted, never surfaced to the caller.

pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::AppResult;

pub use memory::MemoryAuditStore;
pub use redis::RedisAuditStore;

/// The durable artifact of one request/response exchange.
///
/// Created after the relay delivered (or terminally failed) the response,
/// written exactly once, never mutated.
#[derive(Debug, Clone)]
pub struct ExchangeRecord {
    pub provider: String,
    pub url: String,
    pub method: String,
    pub request_body: Bytes,
    pub response_body: Bytes,
    pub timestamp: DateTime<Utc>,
}

impl ExchangeRecord {
    /// Build a record stamped with the current time.
    pub fn new(
        provider: impl Into<String>,
        url: impl Into<String>,
        method: impl Into<String>,
        request_body: Bytes,
        response_body: Bytes,
    ) -> Self {
        Self {
            provider: provider.into(),
            url: url.into(),
            method: method.into(),
            request_body,
            response_body,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only persistence for exchange records
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist one record.
    async fn record(&self, record: ExchangeRecord) -> AppResult<()>;

    /// Health probe; stores without a connectivity check return Ok.
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Fire-and-forget handoff from the relay path to the audit store.
///
/// Holding a dispatcher is cheap to clone; all clones feed the same worker.
#[derive(Clone)]
pub struct AuditDispatcher {
    sender: mpsc::Sender<ExchangeRecord>,
}

impl AuditDispatcher {
    /// Create a dispatcher and spawn its background worker.
    pub fn new(store: Arc<dyn AuditStore>, channel_buffer: usize) -> Self {
        let (sender, receiver) = mpsc::channel(channel_buffer);

        tokio::spawn(Self::background_worker(store, receiver));

        Self { sender }
    }

    /// Queue a record for persistence.
    ///
    /// Never blocks and never fails. If the channel is full the record is
    /// dropped and logged; the relay path is unaffected either way.
    pub fn dispatch(&self, record: ExchangeRecord) {
        if let Err(e) = self.sender.try_send(record) {
            match e {
                mpsc::error::TrySendError::Full(record) => {
                    warn!(
                        provider = %record.provider,
                        url = %record.url,
                        "Audit channel full, dropping exchange record"
                    );
                    metrics::counter!("manifold_audit_records_total", "outcome" => "dropped")
                        .increment(1);
                }
                mpsc::error::TrySendError::Closed(record) => {
                    error!(
                        provider = %record.provider,
                        "Audit channel closed, dropping exchange record"
                    );
                    metrics::counter!("manifold_audit_records_total", "outcome" => "dropped")
                        .increment(1);
                }
            }
        }
    }

    /// Background worker that drains the channel into the store
    async fn background_worker(
        store: Arc<dyn AuditStore>,
        mut receiver: mpsc::Receiver<ExchangeRecord>,
    ) {
        info!("Audit dispatch worker started");

        while let Some(record) = receiver.recv().await {
            let provider = record.provider.clone();
            match store.record(record).await {
                Ok(()) => {
                    debug!(provider = %provider, "Exchange record stored");
                    metrics::counter!("manifold_audit_records_total", "outcome" => "stored")
                        .increment(1);
                }
                Err(err) => {
                    // The client response already went out; nothing to do but log.
                    warn!(
                        provider = %provider,
                        error = %err,
                        "Failed to store exchange record"
                    );
                    metrics::counter!("manifold_audit_records_total", "outcome" => "failed")
                        .increment(1);
                }
            }
        }

        info!("Audit dispatch worker stopped");
    }
}
