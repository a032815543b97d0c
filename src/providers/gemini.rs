//! Google Gemini adapter
//!
//! Gemini takes the API key as a URL query parameter and renames the message
//! field `content` to `text`, nested one level deeper. Roles pass through
//! unchanged (`"model"` is Gemini's assistant role).

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Serialize;

use super::{ChatMessage, Credentials};
use crate::error::{AppError, AppResult};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Request body for Gemini's generateContent wire format
#[derive(Debug, Serialize)]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
    role: &'a str,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Model and operation are path segments; the key rides in the query string.
pub fn build_url(model: &str, stream: bool, credentials: &Credentials) -> AppResult<String> {
    let key = credentials
        .api_key()
        .ok_or_else(|| AppError::MalformedRequest("apiKey is required".to_string()))?;
    let operation = if stream {
        "streamGenerateContent"
    } else {
        "generateContent"
    };

    Ok(format!("{}/{}:{}?key={}", BASE_URL, model, operation, key))
}

/// No auth header; the key is already in the URL.
pub fn build_headers(_credentials: &Credentials, _body: &[u8]) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Each message becomes one `contents` entry with a single text part.
pub fn build_body(_model: &str, messages: &[ChatMessage], _stream: bool) -> AppResult<Vec<u8>> {
    let contents = messages
        .iter()
        .map(|message| Content {
            parts: vec![Part {
                text: &message.content,
            }],
            role: &message.role,
        })
        .collect();

    Ok(serde_json::to_vec(&GenerateContentBody { contents })?)
}
