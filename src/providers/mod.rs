//! Provider adapter registry
//!
//! Maps a provider identifier to the pure construction functions that turn a
//! normalized chat request into a concrete upstream HTTP call (URL, headers,
//! body). Adding a provider means adding one `Adapter` entry to `REGISTRY`.

pub mod claude;
pub mod gemini;
pub mod hunyuan;
pub mod openai_compat;

use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A single chat message, vendor-agnostic.
///
/// Roles are free-form strings: Gemini uses `"model"` where others use
/// `"assistant"`, and the gateway never remaps roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Caller-supplied credentials for the upstream provider
#[derive(Clone, PartialEq)]
pub enum Credentials {
    /// Single bearer/API key
    ApiKey(String),
    /// Secret pair for signature-based auth
    SecretPair {
        secret_id: String,
        secret_key: String,
    },
    /// No credentials (local providers)
    None,
}

impl Credentials {
    /// The API key, if one was supplied.
    pub fn api_key(&self) -> Option<&str> {
        match self {
            Credentials::ApiKey(key) => Some(key),
            _ => None,
        }
    }

    /// The (secretId, secretKey) pair, if one was supplied.
    pub fn secret_pair(&self) -> Option<(&str, &str)> {
        match self {
            Credentials::SecretPair {
                secret_id,
                secret_key,
            } => Some((secret_id, secret_key)),
            _ => None,
        }
    }

    /// Extract the API key, or reject the request as malformed.
    pub fn require_api_key(&self, provider: &str) -> AppResult<&str> {
        match self {
            Credentials::ApiKey(key) if !key.is_empty() => Ok(key),
            _ => Err(AppError::MalformedRequest(format!(
                "provider '{}' requires apiKey",
                provider
            ))),
        }
    }

    /// Extract the (secretId, secretKey) pair, or reject the request as malformed.
    pub fn require_secret_pair(&self, provider: &str) -> AppResult<(&str, &str)> {
        match self {
            Credentials::SecretPair {
                secret_id,
                secret_key,
            } if !secret_id.is_empty() && !secret_key.is_empty() => {
                Ok((secret_id, secret_key))
            }
            _ => Err(AppError::MalformedRequest(format!(
                "provider '{}' requires secretId and secretKey",
                provider
            ))),
        }
    }
}

// Secrets must never leak through debug formatting.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey(***)"),
            Credentials::SecretPair { secret_id, .. } => f
                .debug_struct("SecretPair")
                .field("secret_id", secret_id)
                .field("secret_key", &"***")
                .finish(),
            Credentials::None => f.write_str("None"),
        }
    }
}

/// The credential shape a provider requires
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CredentialKind {
    ApiKey,
    SecretPair,
    None,
}

/// A fully resolved upstream call, immutable once built.
///
/// The body is materialized before transmission; signature-based providers
/// sign these exact bytes.
#[derive(Debug, Clone)]
pub struct ResolvedCall {
    pub url: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// One provider entry: identifier plus the pure functions that build the call
pub struct Adapter {
    id: &'static str,
    credentials: CredentialKind,
    build_url: fn(&str, bool, &Credentials) -> AppResult<String>,
    build_headers: fn(&Credentials, &[u8]) -> AppResult<HeaderMap>,
    build_body: fn(&str, &[ChatMessage], bool) -> AppResult<Vec<u8>>,
}

/// All supported providers
static REGISTRY: &[Adapter] = &[
    Adapter {
        id: "openai",
        credentials: CredentialKind::ApiKey,
        build_url: openai_compat::openai_url,
        build_headers: openai_compat::bearer_headers,
        build_body: openai_compat::chat_completions_body,
    },
    Adapter {
        id: "gemini",
        credentials: CredentialKind::ApiKey,
        build_url: gemini::build_url,
        build_headers: gemini::build_headers,
        build_body: gemini::build_body,
    },
    Adapter {
        id: "claude",
        credentials: CredentialKind::ApiKey,
        build_url: claude::build_url,
        build_headers: claude::build_headers,
        build_body: claude::build_body,
    },
    Adapter {
        id: "qwen",
        credentials: CredentialKind::ApiKey,
        build_url: openai_compat::qwen_url,
        build_headers: openai_compat::bearer_headers,
        build_body: openai_compat::chat_completions_body,
    },
    Adapter {
        id: "hunyuan",
        credentials: CredentialKind::SecretPair,
        build_url: hunyuan::build_url,
        build_headers: hunyuan::build_headers,
        build_body: hunyuan::build_body,
    },
    Adapter {
        id: "deepseek",
        credentials: CredentialKind::ApiKey,
        build_url: openai_compat::deepseek_url,
        build_headers: openai_compat::bearer_headers,
        build_body: openai_compat::chat_completions_body,
    },
    Adapter {
        id: "ollama",
        credentials: CredentialKind::None,
        build_url: openai_compat::ollama_url,
        build_headers: openai_compat::no_auth_headers,
        build_body: openai_compat::chat_completions_body,
    },
];

/// Look up the adapter for a provider identifier (case-insensitive).
pub fn resolve(provider: &str) -> AppResult<&'static Adapter> {
    REGISTRY
        .iter()
        .find(|adapter| adapter.id.eq_ignore_ascii_case(provider))
        .ok_or_else(|| AppError::UnsupportedProvider(provider.to_string()))
}

/// Identifiers of every registered provider, in registry order.
pub fn provider_ids() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|adapter| adapter.id)
}

impl Adapter {
    /// Canonical provider identifier
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// The credential shape this provider requires
    pub fn credential_kind(&self) -> CredentialKind {
        self.credentials
    }

    /// Reject requests whose credentials cannot satisfy this provider.
    ///
    /// Runs before any of the builders, so a missing key fails with a uniform
    /// message and zero network I/O.
    pub fn check_credentials(&self, credentials: &Credentials) -> AppResult<()> {
        match self.credentials {
            CredentialKind::ApiKey => credentials.require_api_key(self.id).map(|_| ()),
            CredentialKind::SecretPair => {
                credentials.require_secret_pair(self.id).map(|_| ())
            }
            CredentialKind::None => Ok(()),
        }
    }

    /// Build the complete upstream call for one request.
    ///
    /// The body is built first because signature-based providers sign the
    /// payload bytes inside their header builder.
    pub fn resolve_call(
        &self,
        model: &str,
        messages: &[ChatMessage],
        stream: bool,
        credentials: &Credentials,
    ) -> AppResult<ResolvedCall> {
        self.check_credentials(credentials)?;

        let body = (self.build_body)(model, messages, stream)?;
        let url = (self.build_url)(model, stream, credentials)?;
        let headers = (self.build_headers)(credentials, &body)?;

        Ok(ResolvedCall {
            url,
            method: Method::POST,
            headers,
            body,
        })
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("id", &self.id)
            .field("credentials", &self.credentials)
            .finish()
    }
}
