//! Completeness gate.
//!
//! Pure decision over the accumulated [`ExtractedFields`]: either enough is
//! known to generate a pathway, or there is an ordered list of missing
//! facts of which only the first is surfaced per turn.

use std::fmt;

use super::education::{self, RequiredPhases};
use super::fields::ExtractedFields;

/// A fact the conversation still has to establish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingFact {
    CareerGoal,
    CurrentEducation,
    TargetEducation,
    TwoYearCollege,
    FourYearCollege,
}

impl MissingFact {
    /// Human-readable description used when composing the follow-up
    /// question.
    pub fn description(&self) -> &'static str {
        match self {
            MissingFact::CareerGoal => "the career or field they want to pursue",
            MissingFact::CurrentEducation => {
                "their current education level (High School Diploma/GED, Some College Credits, \
                 Associate Degree, Bachelor's Degree, or Master's Degree)"
            }
            MissingFact::TargetEducation => {
                "the highest education level they want to reach (Associate Degree, Bachelor's \
                 Degree, or Master's Degree)"
            }
            MissingFact::TwoYearCollege => "which two-year college they want to start at",
            MissingFact::FourYearCollege => "which four-year university they want to attend",
        }
    }
}

impl fmt::Display for MissingFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Verdict of the completeness gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Enough is known; generate with the given phases.
    Ready { phases: RequiredPhases },
    /// Not ready; ask for `next` (the first of `missing`).
    NotReady {
        next: MissingFact,
        missing: Vec<MissingFact>,
        phases: RequiredPhases,
    },
}

impl GateDecision {
    pub fn is_ready(&self) -> bool {
        matches!(self, GateDecision::Ready { .. })
    }
}

/// Evaluates readiness from the accumulated fields.
///
/// Missing-fact order: career, current level, target level, then the
/// college for each required phase. A target label that does not parse to a
/// known level counts as missing, so the advisor re-asks instead of
/// planning toward rank 0.
pub fn evaluate(fields: &ExtractedFields) -> GateDecision {
    let has_career = present(&fields.career_goal);
    let has_current = present(&fields.current_education);
    let target_label = fields.target_education.as_deref().unwrap_or("");
    let target_rank = education::rank_of(target_label);
    let has_target = present(&fields.target_education) && target_rank > 0;

    let current_rank = fields
        .current_education
        .as_deref()
        .map_or(0, education::rank_of);
    let phases = education::required_phases(current_rank, target_rank);

    let mut missing = Vec::new();
    if !has_career {
        missing.push(MissingFact::CareerGoal);
    }
    if !has_current {
        missing.push(MissingFact::CurrentEducation);
    }
    if !has_target {
        missing.push(MissingFact::TargetEducation);
    }
    if phases.needs_two_year && !present(&fields.two_year_college) {
        missing.push(MissingFact::TwoYearCollege);
    }
    if phases.needs_four_year && !present(&fields.four_year_college) {
        missing.push(MissingFact::FourYearCollege);
    }

    match missing.first() {
        None => GateDecision::Ready { phases },
        Some(next) => GateDecision::NotReady {
            next: *next,
            missing: missing.clone(),
            phases,
        },
    }
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}
