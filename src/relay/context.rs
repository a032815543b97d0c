//! Relay logging context
//!
//! A short correlation id plus timing for one relayed exchange, so the
//! request, response, and end-of-stream events can be tied together in logs.

use std::time::Instant;

use tracing::{error, info, warn};
use uuid::Uuid;

/// Context for tracking one relayed exchange through the logs
#[derive(Debug, Clone)]
pub struct RelayContext {
    /// Unique identifier for this exchange (for log correlation)
    pub trace_id: String,
    /// When the relay started
    pub start_time: Instant,
    /// Provider handling this exchange
    pub provider: &'static str,
    /// Whether the response is relayed incrementally
    pub streaming: bool,
}

impl RelayContext {
    pub fn new(provider: &'static str, streaming: bool) -> Self {
        Self {
            // Short id for readability
            trace_id: Uuid::new_v4().to_string()[..8].to_string(),
            start_time: Instant::now(),
            provider,
            streaming,
        }
    }

    /// Elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    pub fn log_start(&self, url: &str, request_bytes: usize) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            url = %url,
            streaming = %self.streaming,
            request_bytes = %request_bytes,
            "Relaying request upstream"
        );
    }

    pub fn log_response(&self, status: u16) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Upstream response received"
        );
    }

    pub fn log_complete(&self, response_bytes: usize) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            response_bytes = %response_bytes,
            elapsed_ms = %self.elapsed_ms(),
            "Relay completed"
        );
    }

    pub fn log_stream_ended(&self, chunks: usize, response_bytes: usize) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            chunks = %chunks,
            response_bytes = %response_bytes,
            elapsed_ms = %self.elapsed_ms(),
            "Streaming relay ended"
        );
    }

    pub fn log_connect_failed(&self, error: &dyn std::fmt::Display) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Connection to upstream failed"
        );
    }

    pub fn log_stream_failed(&self, error: &dyn std::fmt::Display) {
        warn!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Upstream stream failed mid-relay"
        );
    }

    pub fn log_audit_skipped(&self, accumulated_bytes: usize, cap: usize) {
        warn!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            accumulated_bytes = %accumulated_bytes,
            cap = %cap,
            "Response exceeds audit buffer cap, skipping exchange record"
        );
    }
}
