//! Turn orchestration.
//!
//! The advisor walks each user turn through a fixed pipeline: extract,
//! merge, gate, then either compose a follow-up question or generate and
//! persist a pathway. State between turns lives in the conversation and
//! the field accumulator the caller passes in and gets back; the advisor
//! itself holds only a phase marker used to serialize turns and to stay
//! down after a fatal gateway failure.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::conversation::ConversationTurn;
use crate::domain::fields::ExtractedFields;
use crate::domain::gate::{self, GateDecision};
use crate::domain::pathway::PathwayPlan;
use crate::ports::{LlmGateway, NewPathwayRecord, PathwayStore};

use super::composer::ResponseComposer;
use super::extraction::{ExtractionEngine, ExtractionError};
use super::generator::{GenerationError, PathwayGenerator};

use crate::domain::foundation::PathwayId;

/// Reply shown for any recoverable failure mid-turn.
pub const APOLOGY_REPLY: &str =
    "Sorry, something went wrong while processing your request. Please try again.";

/// Where the advisor is within (or between) turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Extracting,
    Responding,
    Generating,
    /// Terminal: a fatal gateway failure (bad credentials) was observed.
    Errored,
}

/// Errors the caller must handle rather than show as an advisor reply.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// A turn is already being processed; this one was not started.
    #[error("a turn is already in flight")]
    TurnInFlight,
}

/// A pathway produced this turn, plus what happened to it in storage.
#[derive(Debug, Clone)]
pub struct GeneratedPathway {
    pub plan: PathwayPlan,
    /// Set when the record was persisted.
    pub record_id: Option<PathwayId>,
    /// Set when persistence failed; the plan is still usable.
    pub store_warning: Option<String>,
}

/// Everything a completed turn hands back to the caller.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Conversation including this turn's user message and advisor reply.
    pub conversation: Vec<ConversationTurn>,
    /// Accumulator after this turn's merge (unchanged on extraction
    /// failure).
    pub fields: ExtractedFields,
    pub reply: String,
    pub pathway: Option<GeneratedPathway>,
}

/// Conversation orchestrator over a gateway and a store.
pub struct Advisor<G: ?Sized + LlmGateway> {
    extraction: ExtractionEngine<G>,
    composer: ResponseComposer<G>,
    generator: PathwayGenerator<G>,
    store: Arc<dyn PathwayStore>,
    phase: Mutex<TurnPhase>,
}

impl<G: ?Sized + LlmGateway> Advisor<G> {
    pub fn new(gateway: Arc<G>, store: Arc<dyn PathwayStore>) -> Self {
        Self {
            extraction: ExtractionEngine::new(gateway.clone()),
            composer: ResponseComposer::new(gateway.clone()),
            generator: PathwayGenerator::new(gateway),
            store,
            phase: Mutex::new(TurnPhase::Idle),
        }
    }

    /// Current phase; `Errored` persists across turns.
    pub async fn phase(&self) -> TurnPhase {
        *self.phase.lock().await
    }

    /// Processes one user turn.
    ///
    /// `conversation` and `fields` are this session's state so far; the
    /// returned [`TurnOutcome`] is the state after the turn. Rejects with
    /// [`AdvisorError::TurnInFlight`] if a turn is still being processed.
    pub async fn submit_turn(
        &self,
        mut conversation: Vec<ConversationTurn>,
        fields: ExtractedFields,
        message: &str,
    ) -> Result<TurnOutcome, AdvisorError> {
        let mut phase = self.phase.try_lock().map_err(|_| AdvisorError::TurnInFlight)?;

        conversation.push(ConversationTurn::user(message));

        if *phase == TurnPhase::Errored {
            // Stay down: no gateway calls after a fatal failure.
            conversation.push(ConversationTurn::assistant(APOLOGY_REPLY));
            return Ok(TurnOutcome {
                conversation,
                fields,
                reply: APOLOGY_REPLY.to_string(),
                pathway: None,
            });
        }

        *phase = TurnPhase::Extracting;
        let partial = match self.extraction.extract(&conversation, &fields).await {
            Ok(partial) => partial,
            Err(e) => {
                return Ok(self.fail_turn(&mut phase, conversation, fields, &e, fatal(&e)));
            }
        };

        let merged = fields.merge(&partial);

        match gate::evaluate(&merged) {
            GateDecision::NotReady { next, .. } => {
                *phase = TurnPhase::Responding;
                info!(missing = %next, "asking follow-up question");
                match self.composer.compose(&merged, &next, message).await {
                    Ok(reply) => {
                        *phase = TurnPhase::Idle;
                        conversation.push(ConversationTurn::assistant(&reply));
                        Ok(TurnOutcome {
                            conversation,
                            fields: merged,
                            reply,
                            pathway: None,
                        })
                    }
                    Err(e) => {
                        let is_fatal = e.is_fatal();
                        Ok(self.fail_turn(&mut phase, conversation, merged, &e, is_fatal))
                    }
                }
            }
            GateDecision::Ready { phases } => {
                *phase = TurnPhase::Generating;
                info!(?phases, "all facts gathered, generating pathway");
                match self.generator.generate(&merged, &phases).await {
                    Ok(plan) => {
                        let pathway = self.persist(&merged, &conversation, plan).await;
                        *phase = TurnPhase::Idle;
                        let reply =
                            "Here's a personalized academic pathway based on your goals!"
                                .to_string();
                        conversation.push(ConversationTurn::assistant(&reply));
                        Ok(TurnOutcome {
                            conversation,
                            fields: merged,
                            reply,
                            pathway: Some(pathway),
                        })
                    }
                    Err(e) => {
                        let is_fatal = generation_fatal(&e);
                        Ok(self.fail_turn(&mut phase, conversation, merged, &e, is_fatal))
                    }
                }
            }
        }
    }

    /// Persists the plan. Storage failure is a warning on the outcome, not
    /// a turn failure: the student still gets their pathway.
    async fn persist(
        &self,
        fields: &ExtractedFields,
        conversation: &[ConversationTurn],
        plan: PathwayPlan,
    ) -> GeneratedPathway {
        let record = NewPathwayRecord {
            career_goal: fields.career_goal.clone().unwrap_or_default(),
            current_education: fields.current_education.clone().unwrap_or_default(),
            target_education: fields.target_education.clone().unwrap_or_default(),
            two_year_college: fields.two_year_college.clone(),
            four_year_college: fields.four_year_college.clone(),
            conversation: conversation.to_vec(),
            pathway_data: Some(plan.clone()),
        };

        match self.store.create(record).await {
            Ok(saved) => {
                info!(id = %saved.id, "pathway record saved");
                GeneratedPathway {
                    plan,
                    record_id: Some(saved.id),
                    store_warning: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "pathway generated but could not be saved");
                GeneratedPathway {
                    plan,
                    record_id: None,
                    store_warning: Some(format!("pathway could not be saved: {e}")),
                }
            }
        }
    }

    fn fail_turn(
        &self,
        phase: &mut TurnPhase,
        mut conversation: Vec<ConversationTurn>,
        fields: ExtractedFields,
        cause: &dyn std::error::Error,
        is_fatal: bool,
    ) -> TurnOutcome {
        if is_fatal {
            error!(error = %cause, "fatal gateway failure, advisor halted");
            *phase = TurnPhase::Errored;
        } else {
            warn!(error = %cause, "turn failed, recovering");
            *phase = TurnPhase::Idle;
        }
        conversation.push(ConversationTurn::assistant(APOLOGY_REPLY));
        TurnOutcome {
            conversation,
            fields,
            reply: APOLOGY_REPLY.to_string(),
            pathway: None,
        }
    }
}

fn fatal(error: &ExtractionError) -> bool {
    matches!(error, ExtractionError::Gateway(g) if g.is_fatal())
}

fn generation_fatal(error: &GenerationError) -> bool {
    matches!(error, GenerationError::Gateway(g) if g.is_fatal())
}
