//! Mock upstream vendor for testing
//!
//! Provides wiremock-based stand-ins for the provider endpoints the gateway
//! resolves. The harness transport redirects every resolved call here, so
//! mocks match on the resolved path (and, where relevant, headers and query
//! parameters) to prove the adapters built the call correctly.

use serde_json::json;
use wiremock::{
    matchers::{body_json, header, header_exists, method, path, path_regex, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// Mock upstream vendor server wrapper
pub struct MockUpstream {
    server: MockServer,
}

impl MockUpstream {
    /// Start a new mock upstream server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// All requests the mock has received
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    // =========================================================================
    // OpenAI-compatible endpoints (openai, qwen, deepseek)
    // =========================================================================

    /// Mock a buffered chat completion on the OpenAI-compatible path
    pub async fn mock_chat_completion(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::completion_body()))
            .mount(&self.server)
            .await;
    }

    /// Mock a chat completion that requires the bearer auth header
    ///
    /// Matches the chat-completions path with or without the dashscope
    /// compatible-mode prefix, so one mock serves every bearer provider.
    pub async fn mock_chat_completion_expecting_bearer(&self, api_key: &str) {
        Mock::given(method("POST"))
            .and(path_regex(r"^(/compatible-mode)?/v1/chat/completions$"))
            .and(header(
                "authorization",
                format!("Bearer {}", api_key).as_str(),
            ))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::completion_body()))
            .mount(&self.server)
            .await;
    }

    /// Mock a chat completion that requires an exact request body
    pub async fn mock_chat_completion_expecting_body(&self, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_json(body))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::completion_body()))
            .mount(&self.server)
            .await;
    }

    /// Mock a streaming chat completion (SSE format)
    pub async fn mock_streaming_completion(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(Self::sse_body())
                    .insert_header("content-type", "text/event-stream")
                    .insert_header("cache-control", "no-cache"),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock an upstream error status with a JSON body
    pub async fn mock_error(&self, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a response body of the given size on the OpenAI-compatible path
    pub async fn mock_large_completion(&self, bytes: usize) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(bytes)))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Provider-specific endpoints
    // =========================================================================

    /// Mock the Claude messages endpoint, requiring its auth headers
    pub async fn mock_claude_messages(&self, api_key: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", api_key))
            .and(header("anthropic-version", "2023-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_test",
                "type": "message",
                "role": "assistant",
                "content": [{"type": "text", "text": "Hello!"}]
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock the Gemini generateContent endpoint, requiring the key query param
    pub async fn mock_gemini_generate(&self, model: &str, api_key: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{}:generateContent", model)))
            .and(query_param("key", api_key))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [
                    {"content": {"parts": [{"text": "Hello!"}], "role": "model"}}
                ]
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock the Gemini streaming endpoint, requiring the key query param
    pub async fn mock_gemini_stream(&self, model: &str, api_key: &str) {
        let body = r#"[{"candidates":[{"content":{"parts":[{"text":"Hel"}]}}]}]"#;
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{}:streamGenerateContent", model)))
            .and(query_param("key", api_key))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mock the Hunyuan endpoint, requiring the TC3 signature headers
    pub async fn mock_hunyuan(&self) {
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-tc-action", "ChatCompletions"))
            .and(header("x-tc-version", "2023-09-01"))
            .and(header_exists("x-tc-timestamp"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Response": {
                    "Choices": [{"Message": {"Role": "assistant", "Content": "Hello!"}}],
                    "RequestId": "test-request-id"
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock the Ollama chat endpoint, which carries no auth
    pub async fn mock_ollama_chat(&self) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3",
                "message": {"role": "assistant", "content": "Hello!"},
                "done": true
            })))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Canned bodies
    // =========================================================================

    /// OpenAI-shaped completion response body
    pub fn completion_body() -> serde_json::Value {
        json!({
            "id": "chatcmpl-test123",
            "object": "chat.completion",
            "created": 1706745600,
            "model": "gpt-4",
            "choices": [
                {
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": "Hello! How can I help you today?"
                    },
                    "finish_reason": "stop"
                }
            ],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 8,
                "total_tokens": 18
            }
        })
    }

    /// SSE stream body in the OpenAI chunk format
    pub fn sse_body() -> String {
        let chunks = [
            r#"data: {"id":"chatcmpl-test123","object":"chat.completion.chunk","choices":[{"index":0,"delta":{"role":"assistant"},"finish_reason":null}]}"#,
            r#"data: {"id":"chatcmpl-test123","object":"chat.completion.chunk","choices":[{"index":0,"delta":{"content":"Hello"},"finish_reason":null}]}"#,
            r#"data: {"id":"chatcmpl-test123","object":"chat.completion.chunk","choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#,
            "data: [DONE]",
        ];
        let mut body = String::new();
        for chunk in chunks {
            body.push_str(chunk);
            body.push_str("\n\n");
        }
        body
    }
}
