//! Extracted-field accumulator.
//!
//! Fields gathered across conversation turns. The accumulator is passed
//! into and returned from each turn explicitly; merging is last-write-wins
//! per field, and omission from a newer extraction never clears a
//! previously set field.

use serde::{Deserialize, Serialize};

/// Facts extracted from the conversation so far.
///
/// Each field is optional; `None` means not yet mentioned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_year_college: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub four_year_college: Option<String>,
}

impl ExtractedFields {
    /// Merges a newer partial extraction into this accumulator, returning
    /// the combined state.
    ///
    /// A field is overwritten only by a newer non-empty value; empty and
    /// whitespace-only strings are treated as omissions.
    pub fn merge(&self, update: &ExtractedFields) -> ExtractedFields {
        ExtractedFields {
            career_goal: merge_field(&self.career_goal, &update.career_goal),
            current_education: merge_field(&self.current_education, &update.current_education),
            target_education: merge_field(&self.target_education, &update.target_education),
            two_year_college: merge_field(&self.two_year_college, &update.two_year_college),
            four_year_college: merge_field(&self.four_year_college, &update.four_year_college),
        }
    }

    /// True if nothing has been extracted yet.
    pub fn is_empty(&self) -> bool {
        self.career_goal.is_none()
            && self.current_education.is_none()
            && self.target_education.is_none()
            && self.two_year_college.is_none()
            && self.four_year_college.is_none()
    }

    /// Renders the gathered fields as prompt-ready bullet lines.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(v) = &self.career_goal {
            lines.push(format!("- Career goal: {v}"));
        }
        if let Some(v) = &self.current_education {
            lines.push(format!("- Current education: {v}"));
        }
        if let Some(v) = &self.target_education {
            lines.push(format!("- Target education: {v}"));
        }
        if let Some(v) = &self.two_year_college {
            lines.push(format!("- Two-year college: {v}"));
        }
        if let Some(v) = &self.four_year_college {
            lines.push(format!("- Four-year college: {v}"));
        }
        lines
    }
}

fn merge_field(old: &Option<String>, new: &Option<String>) -> Option<String> {
    match new {
        Some(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => old.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(career: Option<&str>, current: Option<&str>) -> ExtractedFields {
        ExtractedFields {
            career_goal: career.map(String::from),
            current_education: current.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn omission_never_clears_a_field() {
        let accumulated = fields(Some("Nurse"), Some("High School Diploma/GED"));
        let update = fields(None, None);

        let merged = accumulated.merge(&update);

        assert_eq!(merged.career_goal.as_deref(), Some("Nurse"));
        assert_eq!(
            merged.current_education.as_deref(),
            Some("High School Diploma/GED")
        );
    }

    #[test]
    fn newer_non_empty_value_wins() {
        let accumulated = fields(Some("Nurse"), None);
        let update = fields(Some("Software Engineer"), None);

        let merged = accumulated.merge(&update);

        assert_eq!(merged.career_goal.as_deref(), Some("Software Engineer"));
    }

    #[test]
    fn empty_string_is_treated_as_omission() {
        let accumulated = fields(Some("Nurse"), None);
        let update = fields(Some("   "), None);

        let merged = accumulated.merge(&update);

        assert_eq!(merged.career_goal.as_deref(), Some("Nurse"));
    }

    #[test]
    fn merge_trims_whitespace() {
        let merged = ExtractedFields::default().merge(&fields(Some("  Nurse  "), None));
        assert_eq!(merged.career_goal.as_deref(), Some("Nurse"));
    }

    #[test]
    fn merge_does_not_mutate_inputs() {
        let accumulated = fields(Some("Nurse"), None);
        let update = fields(Some("Teacher"), None);

        let _ = accumulated.merge(&update);

        assert_eq!(accumulated.career_goal.as_deref(), Some("Nurse"));
    }

    #[test]
    fn deserializes_partial_objects() {
        let partial: ExtractedFields =
            serde_json::from_str(r#"{"career_goal": "Registered Nurse"}"#).unwrap();

        assert_eq!(partial.career_goal.as_deref(), Some("Registered Nurse"));
        assert!(partial.current_education.is_none());
    }

    #[test]
    fn is_empty_reflects_contents() {
        assert!(ExtractedFields::default().is_empty());
        assert!(!fields(Some("Nurse"), None).is_empty());
    }
}
