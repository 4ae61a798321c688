//! Education level model.
//!
//! Maps named education levels to a total order and derives which
//! intermediate degree phases are structurally required between a current
//! and target level. Pure and total; unrecognized labels rank 0, below all
//! known levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank at which the two-year (associate) phase is earned.
pub const ASSOCIATE_RANK: u8 = 3;
/// Rank at which the four-year (bachelor's) phase is earned.
pub const BACHELORS_RANK: u8 = 4;
/// Rank at which the graduate phase is earned.
pub const MASTERS_RANK: u8 = 5;

/// A recognized education level, totally ordered by [`rank`](Self::rank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    HighSchoolOrGed,
    SomeCollegeCredits,
    AssociateDegree,
    BachelorsDegree,
    MastersDegree,
}

impl EducationLevel {
    /// The canonical label used in prompts and extracted fields.
    pub fn label(&self) -> &'static str {
        match self {
            EducationLevel::HighSchoolOrGed => "High School Diploma/GED",
            EducationLevel::SomeCollegeCredits => "Some College Credits",
            EducationLevel::AssociateDegree => "Associate Degree",
            EducationLevel::BachelorsDegree => "Bachelor's Degree",
            EducationLevel::MastersDegree => "Master's Degree",
        }
    }

    /// Position in the total order, 1 through 5.
    pub fn rank(&self) -> u8 {
        match self {
            EducationLevel::HighSchoolOrGed => 1,
            EducationLevel::SomeCollegeCredits => 2,
            EducationLevel::AssociateDegree => ASSOCIATE_RANK,
            EducationLevel::BachelorsDegree => BACHELORS_RANK,
            EducationLevel::MastersDegree => MASTERS_RANK,
        }
    }

    /// Parses a canonical label, case-insensitively.
    pub fn parse(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        [
            EducationLevel::HighSchoolOrGed,
            EducationLevel::SomeCollegeCredits,
            EducationLevel::AssociateDegree,
            EducationLevel::BachelorsDegree,
            EducationLevel::MastersDegree,
        ]
        .into_iter()
        .find(|level| level.label().eq_ignore_ascii_case(trimmed))
    }

    /// All levels in ascending order.
    pub fn all() -> [EducationLevel; 5] {
        [
            EducationLevel::HighSchoolOrGed,
            EducationLevel::SomeCollegeCredits,
            EducationLevel::AssociateDegree,
            EducationLevel::BachelorsDegree,
            EducationLevel::MastersDegree,
        ]
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rank of an arbitrary label; 0 when unrecognized.
pub fn rank_of(label: &str) -> u8 {
    EducationLevel::parse(label).map_or(0, |level| level.rank())
}

/// Which degree phases must appear in a generated pathway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequiredPhases {
    pub needs_two_year: bool,
    pub needs_four_year: bool,
    pub needs_graduate: bool,
}

impl RequiredPhases {
    /// No phases required; nothing left to plan.
    pub fn none() -> Self {
        Self::default()
    }

    /// True if any phase is required.
    pub fn any(&self) -> bool {
        self.needs_two_year || self.needs_four_year || self.needs_graduate
    }
}

/// Derives the phases structurally required between two ranks.
///
/// `target_rank <= current_rank` yields all-false: there is nothing left to
/// plan, not an error. No phase at or below the current rank is ever
/// required, so a student who already holds a bachelor's never gets a
/// four-year phase on the way to a master's.
pub fn required_phases(current_rank: u8, target_rank: u8) -> RequiredPhases {
    if target_rank <= current_rank {
        return RequiredPhases::none();
    }

    RequiredPhases {
        needs_two_year: current_rank < ASSOCIATE_RANK && target_rank >= ASSOCIATE_RANK,
        needs_four_year: current_rank < BACHELORS_RANK && target_rank >= BACHELORS_RANK,
        needs_graduate: current_rank < MASTERS_RANK && target_rank >= MASTERS_RANK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ranks_form_a_total_order() {
        let ranks: Vec<u8> = EducationLevel::all().iter().map(|l| l.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn parses_canonical_labels_case_insensitively() {
        assert_eq!(
            EducationLevel::parse("high school diploma/ged"),
            Some(EducationLevel::HighSchoolOrGed)
        );
        assert_eq!(
            EducationLevel::parse("  Bachelor's Degree  "),
            Some(EducationLevel::BachelorsDegree)
        );
        assert_eq!(EducationLevel::parse("PhD"), None);
    }

    #[test]
    fn unrecognized_labels_rank_zero() {
        assert_eq!(rank_of("a few community college classes"), 0);
        assert_eq!(rank_of(""), 0);
        assert_eq!(rank_of("Master's Degree"), 5);
    }

    #[test]
    fn ged_to_bachelors_needs_both_college_phases() {
        let phases = required_phases(1, 4);
        assert!(phases.needs_two_year);
        assert!(phases.needs_four_year);
        assert!(!phases.needs_graduate);
    }

    #[test]
    fn associate_to_masters_skips_two_year_phase() {
        let phases = required_phases(3, 5);
        assert!(!phases.needs_two_year);
        assert!(phases.needs_four_year);
        assert!(phases.needs_graduate);
    }

    #[test]
    fn bachelors_holder_never_repeats_four_year_phase() {
        let phases = required_phases(4, 5);
        assert!(!phases.needs_two_year);
        assert!(!phases.needs_four_year);
        assert!(phases.needs_graduate);
    }

    #[test]
    fn equal_or_descending_targets_need_nothing() {
        for current in 0..=5u8 {
            for target in 0..=current {
                assert_eq!(required_phases(current, target), RequiredPhases::none());
            }
        }
    }

    #[test]
    fn unknown_current_plans_from_the_bottom() {
        let phases = required_phases(0, 4);
        assert!(phases.needs_two_year);
        assert!(phases.needs_four_year);
    }

    proptest! {
        /// Every phase strictly between the ranks is required; every phase
        /// at or below the current rank is excluded.
        #[test]
        fn phases_cover_exactly_the_gap(current in 0u8..=5, target in 0u8..=5) {
            prop_assume!(current < target);
            let phases = required_phases(current, target);

            prop_assert_eq!(
                phases.needs_two_year,
                current < ASSOCIATE_RANK && target >= ASSOCIATE_RANK
            );
            prop_assert_eq!(
                phases.needs_four_year,
                current < BACHELORS_RANK && target >= BACHELORS_RANK
            );
            prop_assert_eq!(
                phases.needs_graduate,
                current < MASTERS_RANK && target >= MASTERS_RANK
            );
        }

        #[test]
        fn no_upward_gap_means_no_phases(current in 0u8..=5, target in 0u8..=5) {
            prop_assume!(target <= current);
            prop_assert!(!required_phases(current, target).any());
        }
    }
}
