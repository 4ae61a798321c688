//! Pathway plan generation.
//!
//! One schema-constrained gateway call once every required fact is in hand.
//! The schema is assembled per request: only the phases the education model
//! mandates appear in it, and those phases are marked required so the
//! provider cannot silently drop one. The parsed plan is still re-validated
//! against the mandate before anyone trusts it.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::domain::education::RequiredPhases;
use crate::domain::fields::ExtractedFields;
use crate::domain::pathway::{PathwayPlan, PhaseKind};
use crate::ports::{GatewayError, GatewayRequest, LlmGateway};

/// Errors from a generation attempt. All recoverable: the merged fields
/// survive and the student can simply ask again.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("gateway call failed during generation: {0}")]
    Gateway(#[from] GatewayError),

    #[error("generated plan did not match the expected shape: {0}")]
    Malformed(String),

    #[error("generated plan is missing the required {0} phase")]
    MissingPhase(PhaseKind),
}

/// Builds generation requests and validates their results.
pub struct PathwayGenerator<G: ?Sized + LlmGateway> {
    gateway: Arc<G>,
}

impl<G: ?Sized + LlmGateway> PathwayGenerator<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Generates a plan covering exactly the phases in `required`.
    pub async fn generate(
        &self,
        fields: &ExtractedFields,
        required: &RequiredPhases,
    ) -> Result<PathwayPlan, GenerationError> {
        let prompt = build_prompt(fields, required);
        let request = GatewayRequest::structured(prompt, plan_schema(required));

        let response = self.gateway.generate(request).await?;
        let value = response.into_structured()?;

        let plan: PathwayPlan = serde_json::from_value(value.clone())
            .map_err(|e| GenerationError::Malformed(format!("{e}: {value}")))?;

        if let Some(kind) = plan.missing_required_phase(required) {
            return Err(GenerationError::MissingPhase(kind));
        }

        debug!(
            two_year = plan.two_year_phase.is_some(),
            four_year = plan.four_year_phase.is_some(),
            graduate = plan.has_graduate_phase(),
            "generated pathway plan"
        );
        Ok(plan)
    }
}

fn build_prompt(fields: &ExtractedFields, required: &RequiredPhases) -> String {
    let career = fields.career_goal.as_deref().unwrap_or("their chosen career");
    let current = fields.current_education.as_deref().unwrap_or("unknown");
    let target = fields.target_education.as_deref().unwrap_or("unknown");

    let mut prompt = format!(
        "Create a detailed, realistic academic pathway for a student who wants to become a \
         {career}. They currently hold: {current}. Their target is: {target}. Do not include \
         any degree phase for a level the student has already completed.\n"
    );

    if required.needs_two_year {
        let college = fields.two_year_college.as_deref().unwrap_or("a two-year college");
        prompt.push_str(&format!(
            "\nInclude a two_year_phase at {college}: an associate degree aligned with the \
             career goal, with real course codes and names, 3-4 credits per course, about 60 \
             total credits over 4 semesters (2 years). Estimate tuition at $3,000-$4,500 per \
             year for a public two-year college.\n"
        ));
    }
    if required.needs_four_year {
        let college = fields.four_year_college.as_deref().unwrap_or("a four-year university");
        prompt.push_str(&format!(
            "\nInclude a four_year_phase at {college}: a bachelor's degree aligned with the \
             career goal, with real upper-division course codes and names. Estimate tuition \
             at $6,000-$7,500 per year in-state for a public university, or $25,000-$45,000 \
             per year for a private one.\n"
        ));
        if required.needs_two_year {
            prompt.push_str(
                "The student transfers from the two-year college, so set transfer_credits to \
                 the credits carried over (typically 60) and remaining_credits to what is \
                 still needed for the bachelor's (typically 60 of 120).\n",
            );
        }
    }
    if required.needs_graduate {
        prompt.push_str(
            "\nInclude an advanced_phase with a masters phase: a graduate degree aligned with \
             the career goal, with real graduate course codes, typically 30-36 credits over \
             2 years. Estimate tuition at $10,000-$16,000 per year. Add a phd phase only if \
             the career genuinely requires a doctorate.\n",
        );
    }

    prompt.push_str(
        "\nFinish with a total_summary: total_years and total_cost across every included \
         phase, and a short career_outlook paragraph with realistic salary expectations and \
         job demand for this career.",
    );
    prompt
}

fn course_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "code": { "type": "string" },
            "name": { "type": "string" },
            "credits": { "type": "integer" }
        },
        "required": ["code", "name", "credits"]
    })
}

fn phase_schema(with_transfer: bool) -> Value {
    let mut properties = json!({
        "degree": { "type": "string" },
        "college": { "type": "string" },
        "courses": { "type": "array", "items": course_schema() },
        "duration": { "type": "string" },
        "total_cost": { "type": "number" },
        "total_credits": { "type": "integer" }
    });
    if with_transfer {
        properties["transfer_credits"] = json!({ "type": "integer" });
        properties["remaining_credits"] = json!({ "type": "integer" });
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": ["degree", "courses", "duration", "total_cost", "total_credits"]
    })
}

/// Plan schema assembled from the required phases. Mandated phases land in
/// the top-level `required` list; `total_summary` is always required.
fn plan_schema(required: &RequiredPhases) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required_keys = Vec::new();

    if required.needs_two_year {
        properties.insert("two_year_phase".to_string(), phase_schema(false));
        required_keys.push("two_year_phase");
    }
    if required.needs_four_year {
        properties.insert(
            "four_year_phase".to_string(),
            phase_schema(required.needs_two_year),
        );
        required_keys.push("four_year_phase");
    }
    if required.needs_graduate {
        properties.insert(
            "advanced_phase".to_string(),
            json!({
                "type": "object",
                "properties": {
                    "masters": phase_schema(false),
                    "phd": phase_schema(false)
                },
                "required": ["masters"]
            }),
        );
        required_keys.push("advanced_phase");
    }

    properties.insert(
        "total_summary".to_string(),
        json!({
            "type": "object",
            "properties": {
                "total_years": { "type": "number" },
                "total_cost": { "type": "number" },
                "career_outlook": { "type": "string" }
            },
            "required": ["total_years", "total_cost", "career_outlook"]
        }),
    );
    required_keys.push("total_summary");

    json!({
        "type": "object",
        "properties": properties,
        "required": required_keys
    })
}
