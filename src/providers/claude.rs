//! Anthropic Claude adapter
//!
//! The messages API authenticates with `x-api-key` plus a pinned
//! `anthropic-version`, and requires `max_tokens` on every request.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Serialize;

use super::{ChatMessage, Credentials};
use crate::error::{AppError, AppResult};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Fixed completion cap sent with every request
const MAX_TOKENS: u32 = 1024;

/// Request body for Anthropic's messages wire format
#[derive(Debug, Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    max_tokens: u32,
}

pub fn build_url(_model: &str, _stream: bool, _credentials: &Credentials) -> AppResult<String> {
    Ok(MESSAGES_URL.to_string())
}

pub fn build_headers(credentials: &Credentials, _body: &[u8]) -> AppResult<HeaderMap> {
    let api_key = credentials
        .api_key()
        .ok_or_else(|| AppError::MalformedRequest("apiKey is required".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-api-key"),
        HeaderValue::from_str(api_key)
            .map_err(|_| AppError::MalformedRequest("apiKey contains invalid characters".to_string()))?,
    );
    headers.insert(
        HeaderName::from_static("anthropic-version"),
        HeaderValue::from_static(ANTHROPIC_VERSION),
    );
    Ok(headers)
}

pub fn build_body(model: &str, messages: &[ChatMessage], stream: bool) -> AppResult<Vec<u8>> {
    Ok(serde_json::to_vec(&MessagesBody {
        model,
        messages,
        stream,
        max_tokens: MAX_TOKENS,
    })?)
}
