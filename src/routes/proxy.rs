//! Gateway proxy endpoint
//!
//! The single relay entry point. Accepts a vendor-agnostic chat request,
//! resolves the provider adapter, and relays the upstream response back to
//! the caller in buffered or streaming mode.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue},
    response::Response,
};
use http_body_util::BodyExt;
use serde::Deserialize;
use tracing::info;

use crate::{
    error::AppError,
    providers::{self, ChatMessage, CredentialKind, Credentials},
    relay::RelayBody,
    routes::metrics::record_relay,
    AppState,
};

/// Gateway request
///
/// Credential fields are camelCase on the wire. Only the fields the resolved
/// provider consumes are read; the rest are ignored.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub stream: bool,
    pub api_key: Option<String>,
    pub secret_id: Option<String>,
    pub secret_key: Option<String>,
}

impl ProxyRequest {
    /// Collapse the optional credential fields into the shape the adapter
    /// consumes.
    pub fn credentials(&self, kind: CredentialKind) -> Credentials {
        match kind {
            CredentialKind::ApiKey => match &self.api_key {
                Some(key) => Credentials::ApiKey(key.clone()),
                None => Credentials::None,
            },
            CredentialKind::SecretPair => {
                if self.secret_id.is_none() && self.secret_key.is_none() {
                    Credentials::None
                } else {
                    Credentials::SecretPair {
                        secret_id: self.secret_id.clone().unwrap_or_default(),
                        secret_key: self.secret_key.clone().unwrap_or_default(),
                    }
                }
            }
            CredentialKind::None => Credentials::None,
        }
    }
}

// Secret values never appear in debug output.
impl fmt::Debug for ProxyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRequest")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("messages", &self.messages.len())
            .field("stream", &self.stream)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("secret_id", &self.secret_id)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Reject requests that cannot form an upstream call.
fn validate(request: &ProxyRequest) -> Result<(), AppError> {
    if request.model.trim().is_empty() {
        return Err(AppError::MalformedRequest(
            "model must not be empty".to_string(),
        ));
    }
    if request.messages.is_empty() {
        return Err(AppError::MalformedRequest(
            "messages must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Handle gateway proxy requests
///
/// Resolves the provider adapter, builds the upstream call, and relays the
/// upstream response. The upstream status code is passed through untouched
/// in both modes.
pub async fn proxy_chat(
    State(state): State<Arc<AppState>>,
    request: axum::extract::Request,
) -> Result<Response, AppError> {
    let start_time = Instant::now();

    // Parse the request body
    let body = request
        .into_body()
        .collect()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read request body: {}", e)))?
        .to_bytes();

    let proxy_request: ProxyRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::MalformedRequest(format!("Invalid request body: {}", e)))?;

    validate(&proxy_request)?;

    let adapter = providers::resolve(&proxy_request.provider)?;
    let provider = adapter.id();
    let credentials = proxy_request.credentials(adapter.credential_kind());
    let call = adapter.resolve_call(
        &proxy_request.model,
        &proxy_request.messages,
        proxy_request.stream,
        &credentials,
    )?;

    info!(
        provider = %provider,
        model = %proxy_request.model,
        stream = %proxy_request.stream,
        messages = %proxy_request.messages.len(),
        "Relaying chat exchange"
    );

    let mode = if proxy_request.stream {
        "streaming"
    } else {
        "buffered"
    };

    let relayed = state
        .engine
        .execute(provider, call, proxy_request.stream)
        .await;
    let duration = start_time.elapsed().as_secs_f64();

    let relayed = match relayed {
        Ok(relayed) => {
            record_relay(provider, mode, "relayed", duration);
            relayed
        }
        Err(err) => {
            record_relay(provider, mode, "upstream_error", duration);
            return Err(err);
        }
    };

    match relayed.body {
        RelayBody::Buffered(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = relayed.status;
            *response.headers_mut() = relayed.headers;
            Ok(response)
        }
        RelayBody::Streaming(stream) => {
            let mut response = Response::new(Body::from_stream(stream));
            *response.status_mut() = relayed.status;
            *response.headers_mut() = relayed.headers;

            let headers = response.headers_mut();
            // The relay re-chunks the body; any upstream length no longer applies.
            headers.remove(header::CONTENT_LENGTH);
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/event-stream"),
            );
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
            headers.insert("X-Accel-Buffering", HeaderValue::from_static("no"));
            Ok(response)
        }
    }
}
