//! Closed vocabulary of valid institutions.
//!
//! Extraction is restricted to these names so downstream prompts and
//! persisted records stay consistent with the program catalog.

/// Two-year colleges offering associate degrees.
pub const TWO_YEAR_COLLEGES: &[&str] = &[
    "Miami Dade College",
    "Broward College",
    "Palm Beach State College",
    "Valencia College",
];

/// Four-year universities offering bachelor's and graduate degrees.
pub const FOUR_YEAR_COLLEGES: &[&str] = &[
    "Florida International University",
    "Florida Atlantic University",
    "University of Florida",
    "Florida State University",
    "University of Central Florida",
];

/// Checks a name against the two-year vocabulary (case-insensitive).
pub fn is_known_two_year(name: &str) -> bool {
    TWO_YEAR_COLLEGES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(name.trim()))
}

/// Checks a name against the four-year vocabulary (case-insensitive).
pub fn is_known_four_year(name: &str) -> bool {
    FOUR_YEAR_COLLEGES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_catalog_names() {
        assert!(is_known_two_year("Broward College"));
        assert!(is_known_two_year("  miami dade college "));
        assert!(is_known_four_year("Florida International University"));
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(!is_known_two_year("Hogwarts"));
        assert!(!is_known_four_year("Broward College"));
    }
}
