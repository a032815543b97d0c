//! Configuration management for Manifold
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Redis connection URL (audit store)
    pub redis_url: String,

    /// Total upstream request timeout, covers streaming reads (in seconds)
    pub upstream_timeout_seconds: u64,
    /// Upstream connect timeout (in seconds)
    pub connect_timeout_seconds: u64,

    /// Cap on the response bytes accumulated for a single audit record
    pub audit_max_buffer_bytes: usize,
    /// Audit dispatch channel capacity
    pub audit_channel_buffer: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("MANIFOLD_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("MANIFOLD_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid MANIFOLD_PORT")?,

            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),

            upstream_timeout_seconds: env::var("UPSTREAM_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .context("Invalid UPSTREAM_TIMEOUT_SECONDS")?,
            connect_timeout_seconds: env::var("CONNECT_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid CONNECT_TIMEOUT_SECONDS")?,

            audit_max_buffer_bytes: env::var("AUDIT_MAX_BUFFER_BYTES")
                .unwrap_or_else(|_| "16777216".to_string())
                .parse()
                .context("Invalid AUDIT_MAX_BUFFER_BYTES")?,
            audit_channel_buffer: env::var("AUDIT_CHANNEL_BUFFER")
                .unwrap_or_else(|_| "1024".to_string())
                .parse()
                .context("Invalid AUDIT_CHANNEL_BUFFER")?,
        })
    }
}
