//! OpenAI-compatible providers
//!
//! openai, qwen, and deepseek expose the same chat-completions wire format
//! behind different hosts and bearer keys; ollama speaks it locally without
//! auth. They share one body builder and differ only in URL and headers.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

use super::{ChatMessage, Credentials};
use crate::error::{AppError, AppResult};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const QWEN_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions";
const DEEPSEEK_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const OLLAMA_URL: &str = "http://localhost:11434/api/chat";

/// Request body for the OpenAI chat-completions wire format
#[derive(Debug, Serialize)]
struct ChatCompletionsBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

pub fn openai_url(_model: &str, _stream: bool, _credentials: &Credentials) -> AppResult<String> {
    Ok(OPENAI_URL.to_string())
}

pub fn qwen_url(_model: &str, _stream: bool, _credentials: &Credentials) -> AppResult<String> {
    Ok(QWEN_URL.to_string())
}

pub fn deepseek_url(_model: &str, _stream: bool, _credentials: &Credentials) -> AppResult<String> {
    Ok(DEEPSEEK_URL.to_string())
}

pub fn ollama_url(_model: &str, _stream: bool, _credentials: &Credentials) -> AppResult<String> {
    Ok(OLLAMA_URL.to_string())
}

/// Serialize the request verbatim: model, messages, and stream flag.
pub fn chat_completions_body(
    model: &str,
    messages: &[ChatMessage],
    stream: bool,
) -> AppResult<Vec<u8>> {
    Ok(serde_json::to_vec(&ChatCompletionsBody {
        model,
        messages,
        stream,
    })?)
}

/// `Content-Type: application/json` plus `Authorization: Bearer <key>`
pub fn bearer_headers(credentials: &Credentials, _body: &[u8]) -> AppResult<HeaderMap> {
    let api_key = credentials
        .api_key()
        .ok_or_else(|| AppError::MalformedRequest("apiKey is required".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| AppError::MalformedRequest("apiKey contains invalid characters".to_string()))?,
    );
    Ok(headers)
}

/// `Content-Type: application/json` only, for providers without auth
pub fn no_auth_headers(_credentials: &Credentials, _body: &[u8]) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}
