//! Tencent Hunyuan adapter
//!
//! Hunyuan is the one provider with signature-based auth: the request body is
//! signed with TC3-HMAC-SHA256 and the action/version/timestamp ride in
//! `X-TC-*` headers. Top-level body fields are capitalized; the nested
//! messages keep lowercase `role`/`content`.

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

use super::{ChatMessage, Credentials};
use crate::error::{AppError, AppResult};
use crate::signing;

const ENDPOINT_URL: &str = "https://hunyuan.tencentcloudapi.com/";
const ACTION: &str = "ChatCompletions";
const API_VERSION: &str = "2023-09-01";

/// Request body for the Hunyuan ChatCompletions action
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ChatCompletionsBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

pub fn build_url(_model: &str, _stream: bool, _credentials: &Credentials) -> AppResult<String> {
    Ok(ENDPOINT_URL.to_string())
}

/// Sign the exact payload bytes and attach the `X-TC-*` action headers.
pub fn build_headers(credentials: &Credentials, body: &[u8]) -> AppResult<HeaderMap> {
    let (secret_id, secret_key) = credentials
        .secret_pair()
        .ok_or_else(|| {
            AppError::MalformedRequest("secretId and secretKey are required".to_string())
        })?;

    let timestamp = Utc::now().timestamp();
    let authorization = signing::sign(secret_id, secret_key, timestamp, body);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&authorization).map_err(|_| {
            AppError::MalformedRequest("secretId contains invalid characters".to_string())
        })?,
    );
    headers.insert(
        HeaderName::from_static("x-tc-action"),
        HeaderValue::from_static(ACTION),
    );
    headers.insert(
        HeaderName::from_static("x-tc-version"),
        HeaderValue::from_static(API_VERSION),
    );
    headers.insert(HeaderName::from_static("x-tc-timestamp"), HeaderValue::from(timestamp));
    Ok(headers)
}

pub fn build_body(model: &str, messages: &[ChatMessage], stream: bool) -> AppResult<Vec<u8>> {
    Ok(serde_json::to_vec(&ChatCompletionsBody {
        model,
        messages,
        stream,
    })?)
}
