//! Relay engine
//!
//! Executes a resolved upstream call and copies the response to the caller.
//! Streaming mode forwards each chunk in upstream arrival order while
//! accumulating a copy for the audit record; buffered mode returns the whole
//! body in one piece. The audit handoff is fire-and-forget and never affects
//! the bytes the caller sees.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::audit::{AuditDispatcher, ExchangeRecord};
use crate::error::AppResult;
use crate::providers::ResolvedCall;

use super::context::RelayContext;
use super::headers::filter_response_headers;
use super::transport::{ByteStream, OutboundTransport};

/// Relayed upstream response
pub struct RelayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: RelayBody,
}

/// Body delivery mode
pub enum RelayBody {
    /// Complete body, returned in one piece
    Buffered(Bytes),
    /// Chunks forwarded as they arrive upstream
    Streaming(ByteStream),
}

// The streaming variant holds an opaque byte stream, so Debug is manual.
impl fmt::Debug for RelayBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayBody::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            RelayBody::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}

impl fmt::Debug for RelayResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .finish()
    }
}

/// Record inputs captured before the call is handed to the transport
struct PendingExchange {
    provider: &'static str,
    url: String,
    method: String,
    request_body: Bytes,
}

impl PendingExchange {
    fn into_record(self, response_body: Bytes) -> ExchangeRecord {
        ExchangeRecord::new(
            self.provider,
            self.url,
            self.method,
            self.request_body,
            response_body,
        )
    }
}

/// Executes resolved calls and relays their responses
pub struct RelayEngine {
    transport: Arc<dyn OutboundTransport>,
    dispatcher: AuditDispatcher,
    max_audit_buffer: usize,
}

impl RelayEngine {
    pub fn new(
        transport: Arc<dyn OutboundTransport>,
        dispatcher: AuditDispatcher,
        max_audit_buffer: usize,
    ) -> Self {
        Self {
            transport,
            dispatcher,
            max_audit_buffer,
        }
    }

    /// Send the call upstream and relay the response.
    ///
    /// The upstream status code is propagated in both modes; it is known
    /// before the first body byte. A connection failure before any response
    /// surfaces as `UpstreamUnavailable` and leaves no exchange record.
    pub async fn execute(
        &self,
        provider: &'static str,
        call: ResolvedCall,
        stream: bool,
    ) -> AppResult<RelayResponse> {
        let ctx = RelayContext::new(provider, stream);
        ctx.log_start(&call.url, call.body.len());
        metrics::counter!("manifold_relay_bytes_total", "provider" => provider, "direction" => "request")
            .increment(call.body.len() as u64);

        let exchange = PendingExchange {
            provider,
            url: call.url.clone(),
            method: call.method.to_string(),
            request_body: Bytes::copy_from_slice(&call.body),
        };

        let upstream = match self.transport.send(call).await {
            Ok(upstream) => upstream,
            Err(err) => {
                ctx.log_connect_failed(&err);
                return Err(err.into());
            }
        };

        let status = upstream.status;
        let headers = filter_response_headers(&upstream.headers);
        ctx.log_response(status.as_u16());

        if stream {
            let body = self.relay_streaming(ctx, exchange, upstream.body);
            Ok(RelayResponse {
                status,
                headers,
                body: RelayBody::Streaming(body),
            })
        } else {
            let body = self.relay_buffered(ctx, exchange, upstream.body).await?;
            Ok(RelayResponse {
                status,
                headers,
                body: RelayBody::Buffered(body),
            })
        }
    }

    /// Accumulate the whole body, audit it, and return it in one piece.
    async fn relay_buffered(
        &self,
        ctx: RelayContext,
        exchange: PendingExchange,
        mut body: ByteStream,
    ) -> AppResult<Bytes> {
        let mut buffered = Vec::new();

        while let Some(next) = body.next().await {
            match next {
                Ok(bytes) => buffered.extend_from_slice(&bytes),
                Err(err) => {
                    // Nothing reached the caller yet, so this is still an
                    // upstream failure and nothing is audited.
                    ctx.log_stream_failed(&err);
                    return Err(err.into());
                }
            }
        }

        let buffered = Bytes::from(buffered);

        if buffered.len() > self.max_audit_buffer {
            ctx.log_audit_skipped(buffered.len(), self.max_audit_buffer);
            metrics::counter!("manifold_audit_records_total", "outcome" => "skipped").increment(1);
        } else {
            self.dispatcher.dispatch(exchange.into_record(buffered.clone()));
        }

        ctx.log_complete(buffered.len());
        metrics::counter!("manifold_relay_bytes_total", "provider" => ctx.provider, "direction" => "response")
            .increment(buffered.len() as u64);
        Ok(buffered)
    }

    /// Forward chunks as they arrive while accumulating the audit copy.
    ///
    /// Forwarding and accumulation happen in the same generator step, so
    /// every chunk is handled exactly once and in order. A mid-stream
    /// transport error is a terminal `Err` item: the already-forwarded
    /// prefix is audited, then the stream ends.
    fn relay_streaming(
        &self,
        ctx: RelayContext,
        exchange: PendingExchange,
        mut body: ByteStream,
    ) -> ByteStream {
        let dispatcher = self.dispatcher.clone();
        let max_audit_buffer = self.max_audit_buffer;

        Box::pin(async_stream::stream! {
            let mut audit_buf: Vec<u8> = Vec::new();
            let mut overflowed = false;
            let mut chunks = 0usize;
            let mut forwarded = 0usize;

            while let Some(next) = body.next().await {
                match next {
                    Ok(bytes) => {
                        if !overflowed {
                            if audit_buf.len() + bytes.len() > max_audit_buffer {
                                overflowed = true;
                                ctx.log_audit_skipped(
                                    audit_buf.len() + bytes.len(),
                                    max_audit_buffer,
                                );
                                metrics::counter!(
                                    "manifold_audit_records_total", "outcome" => "skipped"
                                )
                                .increment(1);
                                // Free the partial copy; the relay itself continues.
                                audit_buf = Vec::new();
                            } else {
                                audit_buf.extend_from_slice(&bytes);
                            }
                        }
                        chunks += 1;
                        forwarded += bytes.len();
                        yield Ok(bytes);
                    }
                    Err(err) => {
                        // No consumer polls past a terminal Err item, so the
                        // audit handoff and the end-of-stream accounting must
                        // happen before it is yielded.
                        ctx.log_stream_failed(&err);
                        if !audit_buf.is_empty() && !overflowed {
                            // A response body was already produced; audit the prefix.
                            dispatcher.dispatch(exchange.into_record(Bytes::from(audit_buf)));
                        }
                        ctx.log_stream_ended(chunks, forwarded);
                        metrics::counter!("manifold_relay_bytes_total", "provider" => ctx.provider, "direction" => "response")
                            .increment(forwarded as u64);
                        yield Err(err);
                        return;
                    }
                }
            }

            if !overflowed {
                dispatcher.dispatch(exchange.into_record(Bytes::from(audit_buf)));
            }

            ctx.log_stream_ended(chunks, forwarded);
            metrics::counter!("manifold_relay_bytes_total", "provider" => ctx.provider, "direction" => "response")
                .increment(forwarded as u64);
        })
    }
}
