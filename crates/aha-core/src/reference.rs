//! Reference number classification.
//!
//! Aha! identifies records by human-facing reference numbers whose shape
//! tells what kind of record they point at:
//!
//! | Kind        | Grammar                  | Example       |
//! |-------------|--------------------------|---------------|
//! | Feature     | `PREFIX-digits`          | `DEVELOP-123` |
//! | Requirement | `PREFIX-digits-digits`   | `ADT-123-1`   |
//! | Note (page) | `PREFIX-N-digits`        | `ABC-N-213`   |
//!
//! Matching is case-sensitive and anchored to the whole string.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Classification of a reference used for record lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordReference {
    Feature,
    Requirement,
    Invalid,
}

/// Grammars tried by [`RecordReference::classify`], first match wins.
const RECORD_PRIORITY: [RecordReference; 2] =
    [RecordReference::Feature, RecordReference::Requirement];

static FEATURE_RE: OnceLock<Regex> = OnceLock::new();
static REQUIREMENT_RE: OnceLock<Regex> = OnceLock::new();
static NOTE_RE: OnceLock<Regex> = OnceLock::new();

fn feature_re() -> &'static Regex {
    FEATURE_RE.get_or_init(|| Regex::new(r"^[A-Z]+-\d+$").unwrap())
}

fn requirement_re() -> &'static Regex {
    REQUIREMENT_RE.get_or_init(|| Regex::new(r"^[A-Z]+-\d+-\d+$").unwrap())
}

fn note_re() -> &'static Regex {
    NOTE_RE.get_or_init(|| Regex::new(r"^[A-Z]+-N-\d+$").unwrap())
}

impl RecordReference {
    /// Classify a reference for a record lookup.
    pub fn classify(reference: &str) -> Self {
        RECORD_PRIORITY
            .into_iter()
            .find(|kind| kind.matches(reference))
            .unwrap_or(RecordReference::Invalid)
    }

    /// Whether `reference` satisfies this variant's grammar.
    ///
    /// `Invalid` matches nothing.
    pub fn matches(self, reference: &str) -> bool {
        match self {
            RecordReference::Feature => feature_re().is_match(reference),
            RecordReference::Requirement => requirement_re().is_match(reference),
            RecordReference::Invalid => false,
        }
    }

    /// Lowercase record kind name.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordReference::Feature => "feature",
            RecordReference::Requirement => "requirement",
            RecordReference::Invalid => "invalid",
        }
    }
}

impl fmt::Display for RecordReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `reference` is a note (page) reference like `ABC-N-213`.
pub fn is_note_reference(reference: &str) -> bool {
    note_re().is_match(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_references() {
        for reference in ["DEVELOP-123", "A-1", "ABC-0", "XYZ-9999999"] {
            assert_eq!(
                RecordReference::classify(reference),
                RecordReference::Feature,
                "{}",
                reference
            );
        }
    }

    #[test]
    fn test_requirement_references() {
        for reference in ["ADT-123-1", "A-1-1", "DEVELOP-42-17"] {
            assert_eq!(
                RecordReference::classify(reference),
                RecordReference::Requirement,
                "{}",
                reference
            );
        }
    }

    #[test]
    fn test_invalid_references() {
        for reference in [
            "",
            "not-a-ref",
            "develop-123",
            "DEVELOP",
            "DEVELOP-",
            "DEVELOP-12a",
            "123-456",
            " DEVELOP-123",
            "DEVELOP-123 ",
            "DEVELOP-123-",
            "DEVELOP-1-2-3",
            "ABC-N-213",
            "DEV1-123",
        ] {
            assert_eq!(
                RecordReference::classify(reference),
                RecordReference::Invalid,
                "{:?}",
                reference
            );
        }
    }

    #[test]
    fn test_feature_takes_priority() {
        // Both grammars are checked in order; a feature never reaches the requirement test.
        assert!(RecordReference::Feature.matches("DEVELOP-123"));
        assert!(!RecordReference::Requirement.matches("DEVELOP-123"));
        assert_eq!(RECORD_PRIORITY[0], RecordReference::Feature);
    }

    #[test]
    fn test_invalid_matches_nothing() {
        assert!(!RecordReference::Invalid.matches("DEVELOP-123"));
        assert!(!RecordReference::Invalid.matches(""));
    }

    #[test]
    fn test_note_references() {
        assert!(is_note_reference("ABC-N-213"));
        assert!(is_note_reference("Z-N-0"));

        assert!(!is_note_reference("ABC-213"));
        assert!(!is_note_reference("ABC-n-213"));
        assert!(!is_note_reference("abc-N-213"));
        assert!(!is_note_reference("ABC-N-"));
        assert!(!is_note_reference("ABC-N-213-1"));
        assert!(!is_note_reference("ABC-1-213"));
        assert!(!is_note_reference(""));
    }

    #[test]
    fn test_note_never_classifies_as_record() {
        assert_eq!(
            RecordReference::classify("ABC-N-213"),
            RecordReference::Invalid
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(RecordReference::Feature.to_string(), "feature");
        assert_eq!(RecordReference::Requirement.to_string(), "requirement");
    }
}
