//! Scriptable gateway for tests.
//!
//! Replies are queued up front and consumed in order; failures are queued
//! as [`MockFailure`] values because [`GatewayError`] is not `Clone`.
//! Every request is recorded for assertion.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::ports::{GatewayError, GatewayRequest, GatewayResponse, LlmGateway};

/// A queued reply.
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Structured(Value),
    Failure(MockFailure),
}

/// Failure kinds the mock can inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Network,
    Timeout,
    RateLimited,
    Unavailable,
    AuthenticationFailed,
    SchemaMismatch,
}

impl From<MockFailure> for GatewayError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::Network => GatewayError::network("simulated network error"),
            MockFailure::Timeout => GatewayError::Timeout { timeout_secs: 60 },
            MockFailure::RateLimited => GatewayError::RateLimited {
                retry_after_secs: 30,
            },
            MockFailure::Unavailable => GatewayError::unavailable("simulated outage"),
            MockFailure::AuthenticationFailed => GatewayError::AuthenticationFailed,
            MockFailure::SchemaMismatch => GatewayError::schema_mismatch("simulated mismatch"),
        }
    }
}

/// Gateway fake with queued responses and call tracking.
#[derive(Clone, Default)]
pub struct MockGateway {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<GatewayRequest>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a free-text reply.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    /// Queues a structured reply.
    pub fn with_structured(self, value: Value) -> Self {
        self.push(MockReply::Structured(value));
        self
    }

    /// Queues a failure.
    pub fn with_failure(self, failure: MockFailure) -> Self {
        self.push(MockReply::Failure(failure));
        self
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// All requests received so far, in order.
    pub fn calls(&self) -> Vec<GatewayRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(&self, reply: MockReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }
}

#[async_trait]
impl LlmGateway for MockGateway {
    async fn generate(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());

        match reply {
            Some(MockReply::Text(text)) => Ok(GatewayResponse::Text(text)),
            Some(MockReply::Structured(value)) => Ok(GatewayResponse::Structured(value)),
            Some(MockReply::Failure(failure)) => Err(failure.into()),
            // Queue exhausted: a harmless default keeps unscripted calls
            // from panicking inside the code under test.
            None => Ok(GatewayResponse::Text("Mock reply".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replies_come_back_in_queue_order() {
        let gateway = MockGateway::new()
            .with_text("first")
            .with_structured(json!({"k": 1}));

        let first = gateway.generate(GatewayRequest::text("a")).await.unwrap();
        let second = gateway.generate(GatewayRequest::text("b")).await.unwrap();

        assert_eq!(first, GatewayResponse::Text("first".to_string()));
        assert_eq!(second, GatewayResponse::Structured(json!({"k": 1})));
    }

    #[tokio::test]
    async fn records_every_request() {
        let gateway = MockGateway::new().with_text("ok");

        gateway
            .generate(GatewayRequest::structured("extract", json!({"type": "object"})))
            .await
            .unwrap();

        assert_eq!(gateway.call_count(), 1);
        let calls = gateway.calls();
        assert_eq!(calls[0].prompt, "extract");
        assert!(calls[0].expects_structured());
    }

    #[tokio::test]
    async fn injected_failure_maps_to_gateway_error() {
        let gateway = MockGateway::new().with_failure(MockFailure::RateLimited);

        let result = gateway.generate(GatewayRequest::text("x")).await;

        assert!(matches!(
            result,
            Err(GatewayError::RateLimited {
                retry_after_secs: 30
            })
        ));
    }

    #[tokio::test]
    async fn exhausted_queue_yields_default_text() {
        let gateway = MockGateway::new();

        let response = gateway.generate(GatewayRequest::text("x")).await.unwrap();

        assert_eq!(response, GatewayResponse::Text("Mock reply".to_string()));
    }
}
