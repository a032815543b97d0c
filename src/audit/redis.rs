//! Redis audit store
//!
//! Appends one JSON document per exchange onto a Redis list. Body bytes are
//! stored as lossy UTF-8 strings; timestamps as RFC 3339.

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::Serialize;

use super::{AuditStore, ExchangeRecord};
use crate::error::AppResult;

/// Audit store backed by a Redis list
pub struct RedisAuditStore {
    conn: redis::aio::ConnectionManager,
}

/// Wire form of an [`ExchangeRecord`]
#[derive(Debug, Serialize)]
struct StoredExchange<'a> {
    provider: &'a str,
    url: &'a str,
    method: &'a str,
    request_body: String,
    response_body: String,
    timestamp: String,
}

impl<'a> From<&'a ExchangeRecord> for StoredExchange<'a> {
    fn from(record: &'a ExchangeRecord) -> Self {
        Self {
            provider: &record.provider,
            url: &record.url,
            method: &record.method,
            request_body: String::from_utf8_lossy(&record.request_body).into_owned(),
            response_body: String::from_utf8_lossy(&record.response_body).into_owned(),
            timestamp: record.timestamp.to_rfc3339(),
        }
    }
}

impl RedisAuditStore {
    pub fn new(conn: redis::aio::ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl AuditStore for RedisAuditStore {
    async fn record(&self, record: ExchangeRecord) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let document = serde_json::to_string(&StoredExchange::from(&record))?;
        let _length: i64 = conn.rpush(keys::audit_log(), document).await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }
}

/// Audit key namespace
pub mod keys {
    /// List holding the exchange log
    pub fn audit_log() -> String {
        "manifold:audit:log".to_string()
    }
}
