//! Outbound transport abstraction
//!
//! The relay engine talks to upstream vendors through this trait so tests can
//! substitute deterministic transports for the real HTTP client.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use thiserror::Error;

use crate::providers::ResolvedCall;

/// Errors crossing the transport boundary
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Stream interrupted: {0}")]
    Stream(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // Gemini-style URLs embed the caller's key in the query string; keep
        // them out of error text.
        let err = err.without_url();
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Stream(err.to_string())
        }
    }
}

/// Stream type for upstream response bodies
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Response head plus the (possibly still streaming) body
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

/// Trait defining how resolved calls reach the upstream provider
///
/// `Ok` means the response head arrived; body chunks may still fail while
/// streaming, surfaced as `Err` items on the byte stream.
#[async_trait]
pub trait OutboundTransport: Send + Sync {
    async fn send(&self, call: ResolvedCall) -> Result<UpstreamResponse, TransportError>;
}

/// Production transport backed by a pooled reqwest client
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OutboundTransport for HttpTransport {
    async fn send(&self, call: ResolvedCall) -> Result<UpstreamResponse, TransportError> {
        let ResolvedCall {
            url,
            method,
            headers,
            body,
        } = call;

        let response = self
            .client
            .request(method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body: ByteStream = Box::pin(response.bytes_stream().map_err(TransportError::from));

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
