//! Generated pathway shapes and the persisted record.
//!
//! The plan is an explicit optional-field struct per phase rather than a
//! dynamically shaped object: which phases must be present depends on the
//! education level model and is checked before the result is trusted.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::conversation::ConversationTurn;
use super::education::RequiredPhases;
use super::foundation::{PathwayId, Timestamp};

/// A single course inside a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Catalog code, e.g. "BSC 2085".
    pub code: String,
    pub name: String,
    pub credits: u32,
}

/// One contiguous degree-earning stage of the pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Degree earned in this phase, e.g. "Associate in Arts, Nursing Pathway".
    pub degree: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    pub courses: Vec<Course>,
    /// Duration in semesters or years, e.g. "4 semesters (2 years)".
    pub duration: String,
    /// Estimated total cost in US dollars.
    pub total_cost: f64,
    pub total_credits: u32,
    /// Credits transferred into this phase (four-year phase only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_credits: Option<u32>,
    /// Credits still to earn after transfer (four-year phase only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_credits: Option<u32>,
}

/// Graduate-level phases; at most one of each.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdvancedPhase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masters: Option<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phd: Option<Phase>,
}

/// Whole-pathway rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwaySummary {
    pub total_years: f64,
    pub total_cost: f64,
    pub career_outlook: String,
}

/// The generation result: up to three phases plus a summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathwayPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_year_phase: Option<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub four_year_phase: Option<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_phase: Option<AdvancedPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_summary: Option<PathwaySummary>,
}

/// Kinds of phase, for reporting which required phase a plan lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    TwoYear,
    FourYear,
    Graduate,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::TwoYear => write!(f, "two-year"),
            PhaseKind::FourYear => write!(f, "four-year"),
            PhaseKind::Graduate => write!(f, "graduate"),
        }
    }
}

impl PathwayPlan {
    /// True if a masters or phd phase is present.
    pub fn has_graduate_phase(&self) -> bool {
        self.advanced_phase
            .as_ref()
            .is_some_and(|a| a.masters.is_some() || a.phd.is_some())
    }

    /// Returns the first required phase the plan is missing, if any.
    ///
    /// A plan missing a mandated phase must never be persisted.
    pub fn missing_required_phase(&self, required: &RequiredPhases) -> Option<PhaseKind> {
        if required.needs_two_year && self.two_year_phase.is_none() {
            return Some(PhaseKind::TwoYear);
        }
        if required.needs_four_year && self.four_year_phase.is_none() {
            return Some(PhaseKind::FourYear);
        }
        if required.needs_graduate && !self.has_graduate_phase() {
            return Some(PhaseKind::Graduate);
        }
        None
    }
}

/// The persisted pathway record.
///
/// `conversation` is immutable history; only `pathway_data` mutates after
/// creation, when a pathway is regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayRecord {
    pub id: PathwayId,
    pub created_date: Timestamp,
    pub career_goal: String,
    pub current_education: String,
    pub target_education: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_year_college: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub four_year_college: Option<String>,
    pub conversation: Vec<ConversationTurn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathway_data: Option<PathwayPlan>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(degree: &str) -> Phase {
        Phase {
            degree: degree.to_string(),
            college: None,
            courses: vec![Course {
                code: "ENC 1101".to_string(),
                name: "English Composition I".to_string(),
                credits: 3,
            }],
            duration: "4 semesters (2 years)".to_string(),
            total_cost: 6800.0,
            total_credits: 60,
            transfer_credits: None,
            remaining_credits: None,
        }
    }

    fn both_college_phases() -> RequiredPhases {
        RequiredPhases {
            needs_two_year: true,
            needs_four_year: true,
            needs_graduate: false,
        }
    }

    #[test]
    fn complete_plan_passes_validation() {
        let plan = PathwayPlan {
            two_year_phase: Some(phase("Associate in Arts")),
            four_year_phase: Some(phase("Bachelor of Science in Nursing")),
            ..Default::default()
        };

        assert_eq!(plan.missing_required_phase(&both_college_phases()), None);
    }

    #[test]
    fn missing_four_year_phase_is_detected() {
        let plan = PathwayPlan {
            two_year_phase: Some(phase("Associate in Arts")),
            ..Default::default()
        };

        assert_eq!(
            plan.missing_required_phase(&both_college_phases()),
            Some(PhaseKind::FourYear)
        );
    }

    #[test]
    fn empty_advanced_phase_does_not_satisfy_graduate_requirement() {
        let required = RequiredPhases {
            needs_graduate: true,
            ..Default::default()
        };
        let plan = PathwayPlan {
            advanced_phase: Some(AdvancedPhase::default()),
            ..Default::default()
        };

        assert!(!plan.has_graduate_phase());
        assert_eq!(
            plan.missing_required_phase(&required),
            Some(PhaseKind::Graduate)
        );
    }

    #[test]
    fn phd_alone_satisfies_graduate_requirement() {
        let required = RequiredPhases {
            needs_graduate: true,
            ..Default::default()
        };
        let plan = PathwayPlan {
            advanced_phase: Some(AdvancedPhase {
                masters: None,
                phd: Some(phase("Doctor of Philosophy")),
            }),
            ..Default::default()
        };

        assert_eq!(plan.missing_required_phase(&required), None);
    }

    #[test]
    fn no_required_phases_validates_any_plan() {
        assert_eq!(
            PathwayPlan::default().missing_required_phase(&RequiredPhases::none()),
            None
        );
    }

    #[test]
    fn plan_deserializes_from_generation_shape() {
        let json = serde_json::json!({
            "two_year_phase": {
                "degree": "Associate in Arts",
                "college": "Broward College",
                "courses": [
                    {"code": "BSC 2085", "name": "Anatomy & Physiology I", "credits": 3}
                ],
                "duration": "4 semesters (2 years)",
                "total_cost": 6800.0,
                "total_credits": 60
            },
            "total_summary": {
                "total_years": 4.0,
                "total_cost": 21500.0,
                "career_outlook": "Strong demand for registered nurses."
            }
        });

        let plan: PathwayPlan = serde_json::from_value(json).unwrap();

        let two_year = plan.two_year_phase.unwrap();
        assert_eq!(two_year.college.as_deref(), Some("Broward College"));
        assert_eq!(two_year.courses.len(), 1);
        assert!(plan.four_year_phase.is_none());
        assert_eq!(plan.total_summary.unwrap().total_years, 4.0);
    }

    #[test]
    fn record_omits_absent_plan_in_json() {
        let record = PathwayRecord {
            id: PathwayId::new(),
            created_date: Timestamp::now(),
            career_goal: "Registered Nurse".to_string(),
            current_education: "High School Diploma/GED".to_string(),
            target_education: "Bachelor's Degree".to_string(),
            two_year_college: Some("Broward College".to_string()),
            four_year_college: None,
            conversation: vec![ConversationTurn::user("I want to be a nurse")],
            pathway_data: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("pathway_data").is_none());
        assert!(json.get("four_year_college").is_none());
        assert_eq!(json["two_year_college"], "Broward College");
    }
}
