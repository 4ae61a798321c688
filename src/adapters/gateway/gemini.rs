//! Gemini Gateway - Implementation of LlmGateway for Google's Gemini API.
//!
//! Uses the `generateContent` endpoint. Structured output is requested by
//! setting `responseMimeType` to `application/json` together with a
//! `responseSchema`, in which case the returned text part is parsed as
//! JSON.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-1.5-flash-latest")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let gateway = GeminiGateway::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{GatewayError, GatewayRequest, GatewayResponse, LlmGateway};

/// Configuration for the Gemini gateway.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-1.5-flash-latest").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-1.5-flash-latest".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API gateway implementation.
pub struct GeminiGateway {
    config: GeminiConfig,
    client: Client,
}

impl GeminiGateway {
    /// Creates a new Gemini gateway with the given configuration.
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the generateContent endpoint URL.
    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Converts our request to Gemini's format.
    fn to_gemini_request(&self, request: &GatewayRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: request.response_schema.as_ref().map(|schema| {
                GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                    response_schema: Some(schema.clone()),
                }
            }),
        }
    }

    /// Sends a request and maps transport errors.
    async fn send_request(&self, request: &GatewayRequest) -> Result<Response, GatewayError> {
        let gemini_request = self.to_gemini_request(request);

        self.client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    GatewayError::network(format!("Connection failed: {}", e))
                } else {
                    GatewayError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, GatewayError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(GatewayError::AuthenticationFailed),
            429 => Err(GatewayError::RateLimited {
                retry_after_secs: 30,
            }),
            400 => Err(GatewayError::InvalidRequest(error_body)),
            500..=599 => Err(GatewayError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(GatewayError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses the response body into a [`GatewayResponse`].
    async fn parse_response(
        &self,
        response: Response,
        expects_structured: bool,
    ) -> Result<GatewayResponse, GatewayError> {
        let response = self.handle_response_status(response).await?;

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            GatewayError::network(format!("Failed to parse response body: {}", e))
        })?;

        let text = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| GatewayError::schema_mismatch("No candidates in response"))?;

        if expects_structured {
            let value: Value = serde_json::from_str(&text).map_err(|e| {
                GatewayError::schema_mismatch(format!("Response is not valid JSON: {}", e))
            })?;
            Ok(GatewayResponse::Structured(value))
        } else {
            Ok(GatewayResponse::Text(text))
        }
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn generate(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let expects_structured = request.expects_structured();
        let mut last_error = GatewayError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            match self.send_request(&request).await {
                Ok(response) => match self.parse_response(response, expects_structured).await {
                    Ok(parsed) => return Ok(parsed),
                    Err(err) => {
                        if !err.is_retryable() || retry_count >= self.config.max_retries {
                            return Err(err);
                        }
                        last_error = err;
                    }
                },
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    last_error = err;
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            let delay = Duration::from_secs(1 << retry_count);
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_builder_works() {
        let config = GeminiConfig::new("test-key")
            .with_model("gemini-1.5-pro")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn generate_url_includes_model() {
        let gateway = GeminiGateway::new(GeminiConfig::new("k"));

        assert_eq!(
            gateway.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }

    #[test]
    fn text_request_omits_generation_config() {
        let gateway = GeminiGateway::new(GeminiConfig::new("k"));

        let body = gateway.to_gemini_request(&GatewayRequest::text("Hello"));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn structured_request_carries_schema_and_mime_type() {
        let gateway = GeminiGateway::new(GeminiConfig::new("k"));
        let schema = json!({"type": "object", "properties": {"career_goal": {"type": "string"}}});

        let body = gateway.to_gemini_request(&GatewayRequest::structured("Extract", schema.clone()));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(json["generationConfig"]["responseSchema"], schema);
    }

    #[test]
    fn response_body_deserializes() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"career_goal\": \"Nurse\"}"}], "role": "model"}}
            ]
        }"#;

        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(
            parsed.candidates[0].content.parts[0].text,
            "{\"career_goal\": \"Nurse\"}"
        );
    }

    #[test]
    fn empty_candidate_list_deserializes() {
        let parsed: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
