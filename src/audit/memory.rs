//! In-memory audit store
//!
//! Keeps records in a Vec behind a lock. Used by the test harnesses and as a
//! fallback when no Redis is configured.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{AuditStore, ExchangeRecord};
use crate::error::AppResult;

/// Audit store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    records: Mutex<Vec<ExchangeRecord>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored records, in insertion order.
    pub fn records(&self) -> Vec<ExchangeRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn record(&self, record: ExchangeRecord) -> AppResult<()> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}
