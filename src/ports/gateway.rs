//! Language model gateway port.
//!
//! Abstracts the external text-generation capability: a prompt goes in,
//! and either free text or schema-conformant structured data comes back.
//! The core never assumes well-typed output; a structured result is a
//! `serde_json::Value` the caller must still parse, and non-conformant
//! responses surface as [`GatewayError::SchemaMismatch`].

use async_trait::async_trait;
use serde_json::Value;

/// Port for language model invocations.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Generates a completion for the request.
    ///
    /// When `response_schema` is set the implementation must return
    /// [`GatewayResponse::Structured`] or fail with a schema error.
    async fn generate(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError>;
}

/// A single gateway invocation.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub prompt: String,
    /// JSON-schema-like constraint on the output shape, if any.
    pub response_schema: Option<Value>,
}

impl GatewayRequest {
    /// Creates a free-text request.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    /// Creates a schema-constrained request.
    pub fn structured(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
        }
    }

    /// True if the request expects structured output.
    pub fn expects_structured(&self) -> bool {
        self.response_schema.is_some()
    }
}

/// Gateway output, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    Text(String),
    Structured(Value),
}

impl GatewayResponse {
    /// Returns the response as display text.
    ///
    /// Structured data is rendered as compact JSON; the response composer
    /// treats whatever comes back as the assistant's reply.
    pub fn into_text(self) -> String {
        match self {
            GatewayResponse::Text(text) => text,
            GatewayResponse::Structured(value) => value.to_string(),
        }
    }

    /// Returns the structured payload or a schema error.
    pub fn into_structured(self) -> Result<Value, GatewayError> {
        match self {
            GatewayResponse::Structured(value) => Ok(value),
            GatewayResponse::Text(text) => Err(GatewayError::schema_mismatch(format!(
                "expected structured output, got free text: {}",
                truncate(&text, 120)
            ))),
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Gateway errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response does not conform to the requested schema.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl GatewayError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch(message.into())
    }

    /// True if a later attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::Network(_)
                | GatewayError::Timeout { .. }
                | GatewayError::RateLimited { .. }
                | GatewayError::Unavailable { .. }
        )
    }

    /// True if retrying cannot help without reconfiguration.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GatewayError::AuthenticationFailed)
    }
}
