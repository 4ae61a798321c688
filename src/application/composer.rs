//! Advisor reply composition for turns where facts are still missing.
//!
//! One free-text gateway call: acknowledge what the student just said, then
//! ask for exactly the next missing fact. No schema is attached; the reply
//! is shown to the student verbatim.

use std::sync::Arc;

use crate::domain::colleges;
use crate::domain::education::EducationLevel;
use crate::domain::fields::ExtractedFields;
use crate::domain::gate::MissingFact;
use crate::ports::{GatewayError, GatewayRequest, LlmGateway};

pub struct ResponseComposer<G: ?Sized + LlmGateway> {
    gateway: Arc<G>,
}

impl<G: ?Sized + LlmGateway> ResponseComposer<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Writes the next advisor reply, steering toward `next`.
    pub async fn compose(
        &self,
        fields: &ExtractedFields,
        next: &MissingFact,
        latest_user_message: &str,
    ) -> Result<String, GatewayError> {
        let prompt = build_prompt(fields, next, latest_user_message);
        let response = self.gateway.generate(GatewayRequest::text(prompt)).await?;
        Ok(response.into_text())
    }
}

fn build_prompt(fields: &ExtractedFields, next: &MissingFact, latest_user_message: &str) -> String {
    let gathered = if fields.is_empty() {
        "nothing yet".to_string()
    } else {
        fields.summary_lines().join("\n")
    };

    let options_hint = match next {
        MissingFact::CurrentEducation | MissingFact::TargetEducation => format!(
            "\nWhen asking about education levels, offer these options: {}.",
            EducationLevel::all()
                .iter()
                .map(|l| l.label())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        MissingFact::TwoYearCollege => format!(
            "\nOffer these two-year colleges as options: {}.",
            colleges::TWO_YEAR_COLLEGES.join(", ")
        ),
        MissingFact::FourYearCollege => format!(
            "\nOffer these four-year universities as options: {}.",
            colleges::FOUR_YEAR_COLLEGES.join(", ")
        ),
        MissingFact::CareerGoal => String::new(),
    };

    format!(
        "You are a warm, encouraging academic pathway advisor helping a student plan their \
         education.\n\n\
         Facts gathered so far:\n{gathered}\n\n\
         The student's latest message:\n\"{latest_user_message}\"\n\n\
         Briefly acknowledge what the student said. If they corrected an earlier answer, \
         confirm the correction positively. Then ask about exactly one thing: {fact}. Do not \
         ask about anything else in this reply. Keep it to a few sentences.{options_hint}",
        fact = next.description(),
    )
}
