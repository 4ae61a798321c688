//! Application layer: engines composing domain logic with the ports.

mod advisor;
mod composer;
mod extraction;
mod generator;

pub use advisor::{Advisor, AdvisorError, GeneratedPathway, TurnOutcome, TurnPhase, APOLOGY_REPLY};
pub use composer::ResponseComposer;
pub use extraction::{ExtractionEngine, ExtractionError};
pub use generator::{GenerationError, PathwayGenerator};
