//! Extraction engine.
//!
//! Turns the free-form conversation into the fixed [`ExtractedFields`]
//! shape: one schema-constrained gateway call per user turn, embedding the
//! full transcript, the closed college vocabulary, and what is already
//! known. The engine has no side effects; merging the partial result into
//! the accumulator is the caller's job, and only happens on a successful,
//! fully-parsed response.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::domain::colleges;
use crate::domain::conversation::{self, ConversationTurn};
use crate::domain::education::EducationLevel;
use crate::domain::fields::ExtractedFields;
use crate::ports::{GatewayError, GatewayRequest, LlmGateway};

/// Errors from a single extraction attempt. Always recoverable: the caller
/// answers with an apology turn and the accumulator is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("gateway call failed during extraction: {0}")]
    Gateway(#[from] GatewayError),

    #[error("extraction output did not match the expected shape: {0}")]
    Malformed(String),
}

/// Builds extraction requests and parses their results.
pub struct ExtractionEngine<G: ?Sized + LlmGateway> {
    gateway: Arc<G>,
}

impl<G: ?Sized + LlmGateway> ExtractionEngine<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Extracts a partial [`ExtractedFields`] from the conversation.
    ///
    /// Fields the user did not explicitly mention are absent from the
    /// result; corrections to earlier answers come back as new values.
    pub async fn extract(
        &self,
        conversation: &[ConversationTurn],
        known: &ExtractedFields,
    ) -> Result<ExtractedFields, ExtractionError> {
        let prompt = build_prompt(conversation, known);
        let request = GatewayRequest::structured(prompt, extraction_schema());

        let response = self.gateway.generate(request).await?;
        let value = response.into_structured()?;

        let partial: ExtractedFields = serde_json::from_value(value.clone())
            .map_err(|e| ExtractionError::Malformed(format!("{e}: {value}")))?;

        debug!(?partial, "extraction result");
        Ok(partial)
    }
}

/// Flat string schema for the five extractable fields.
fn extraction_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "career_goal": { "type": "string" },
            "current_education": { "type": "string" },
            "target_education": { "type": "string" },
            "two_year_college": { "type": "string" },
            "four_year_college": { "type": "string" }
        }
    })
}

fn build_prompt(conversation: &[ConversationTurn], known: &ExtractedFields) -> String {
    let transcript = conversation::render_transcript(conversation);
    let known_section = if known.is_empty() {
        "none yet".to_string()
    } else {
        known.summary_lines().join("\n")
    };
    let levels = EducationLevel::all()
        .iter()
        .map(|l| l.label())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are extracting structured facts from a conversation between a student and an \
         academic pathway advisor.\n\n\
         Conversation so far:\n{transcript}\n\n\
         Facts gathered in earlier turns (the student may correct these):\n{known_section}\n\n\
         Valid two-year colleges: {two_year}.\n\
         Valid four-year universities: {four_year}.\n\n\
         Extract ONLY facts the student stated explicitly in the conversation. Omit every \
         field the student has not mentioned; never guess. If the student corrected an \
         earlier answer, return the corrected value. For current_education and \
         target_education use exactly one of: {levels}. For two_year_college and \
         four_year_college use the exact institution names listed above.",
        two_year = colleges::TWO_YEAR_COLLEGES.join(", "),
        four_year = colleges::FOUR_YEAR_COLLEGES.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gateway::{MockFailure, MockGateway};
    use serde_json::json;

    fn turns() -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::assistant("Hi! What career interests you?"),
            ConversationTurn::user("I want to be a nurse, I have a GED"),
        ]
    }

    #[tokio::test]
    async fn parses_partial_fields_from_structured_response() {
        let gateway = Arc::new(MockGateway::new().with_structured(json!({
            "career_goal": "Registered Nurse",
            "current_education": "High School Diploma/GED"
        })));
        let engine = ExtractionEngine::new(gateway);

        let partial = engine
            .extract(&turns(), &ExtractedFields::default())
            .await
            .unwrap();

        assert_eq!(partial.career_goal.as_deref(), Some("Registered Nurse"));
        assert_eq!(
            partial.current_education.as_deref(),
            Some("High School Diploma/GED")
        );
        assert!(partial.target_education.is_none());
    }

    #[tokio::test]
    async fn prompt_embeds_transcript_vocabulary_and_known_fields() {
        let gateway = Arc::new(MockGateway::new().with_structured(json!({})));
        let engine = ExtractionEngine::new(gateway.clone());

        let known = ExtractedFields {
            career_goal: Some("Registered Nurse".to_string()),
            ..Default::default()
        };
        engine.extract(&turns(), &known).await.unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        let prompt = &calls[0].prompt;
        assert!(prompt.contains("I want to be a nurse"));
        assert!(prompt.contains("Broward College"));
        assert!(prompt.contains("Florida International University"));
        assert!(prompt.contains("- Career goal: Registered Nurse"));
        assert!(calls[0].expects_structured());
    }

    #[tokio::test]
    async fn gateway_failure_is_recoverable_error() {
        let gateway = Arc::new(MockGateway::new().with_failure(MockFailure::Unavailable));
        let engine = ExtractionEngine::new(gateway);

        let result = engine.extract(&turns(), &ExtractedFields::default()).await;

        assert!(matches!(result, Err(ExtractionError::Gateway(_))));
    }

    #[tokio::test]
    async fn non_object_response_is_malformed() {
        let gateway = Arc::new(MockGateway::new().with_structured(json!(["not", "an", "object"])));
        let engine = ExtractionEngine::new(gateway);

        let result = engine.extract(&turns(), &ExtractedFields::default()).await;

        assert!(matches!(result, Err(ExtractionError::Malformed(_))));
    }

    #[tokio::test]
    async fn free_text_response_is_rejected() {
        let gateway = Arc::new(MockGateway::new().with_text("career: nurse"));
        let engine = ExtractionEngine::new(gateway);

        let result = engine.extract(&turns(), &ExtractedFields::default()).await;

        assert!(matches!(
            result,
            Err(ExtractionError::Gateway(GatewayError::SchemaMismatch(_)))
        ));
    }

    #[tokio::test]
    async fn unknown_keys_are_ignored() {
        let gateway = Arc::new(MockGateway::new().with_structured(json!({
            "career_goal": "Nurse",
            "confidence": 0.9
        })));
        let engine = ExtractionEngine::new(gateway);

        let partial = engine
            .extract(&turns(), &ExtractedFields::default())
            .await
            .unwrap();

        assert_eq!(partial.career_goal.as_deref(), Some("Nurse"));
    }
}
