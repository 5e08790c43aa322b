//! Subject line classification.
//!
//! A subject is eligible for processing when it carries an identifier marker,
//! matched case-insensitively:
//!
//! - `id:` anywhere in the subject, followed by an integer, optionally after
//!   spaces (`ID:45 Workshop`, `Seminar id: 7`)
//! - the compact `id<digits>:` form at the start of a word
//!   (`ID45: Modern Workplace Conference`), never inside one (`Covid19:`)
//!
//! Identifiers too large for a `u64` saturate rather than drop the message.
//! A subject that starts with `delete` is a deletion request.

use serde::{Deserialize, Serialize};

use crate::constants::{SUBJECT_DELETE_PREFIX, SUBJECT_ID_MARKER};

/// Subject of an eligible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSubject {
    pub identifier: u64,
    pub is_delete_request: bool,
    pub raw_subject: String,
}

impl ParsedSubject {
    /// Parse a subject, returning `None` when it has no identifier marker.
    ///
    /// # Examples
    ///
    /// ```
    /// use mailcal_domain::ParsedSubject;
    ///
    /// let parsed = ParsedSubject::parse("Delete ID:12 Workshop").unwrap();
    /// assert_eq!(parsed.identifier, 12);
    /// assert!(parsed.is_delete_request);
    ///
    /// assert_eq!(ParsedSubject::parse("ID45: Conference").unwrap().identifier, 45);
    /// assert!(ParsedSubject::parse("Covid19: office update").is_none());
    /// ```
    #[must_use]
    pub fn parse(subject: &str) -> Option<Self> {
        let identifier = find_identifier(subject)?;
        let is_delete_request = subject
            .get(..SUBJECT_DELETE_PREFIX.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(SUBJECT_DELETE_PREFIX));

        Some(Self { identifier, is_delete_request, raw_subject: subject.to_string() })
    }
}

fn find_identifier(subject: &str) -> Option<u64> {
    let lower = subject.to_ascii_lowercase();
    let mut search_from = 0;

    while let Some(offset) = lower[search_from..].find(SUBJECT_ID_MARKER) {
        let marker_at = search_from + offset;
        let after_marker = marker_at + SUBJECT_ID_MARKER.len();
        let rest = &lower[after_marker..];

        let identifier = match rest.strip_prefix(':') {
            Some(after_colon) => colon_identifier(after_colon),
            None if starts_word(&lower, marker_at) => compact_identifier(rest),
            None => None,
        };
        if identifier.is_some() {
            return identifier;
        }
        search_from = after_marker;
    }

    None
}

fn starts_word(text: &str, at: usize) -> bool {
    !matches!(text[..at].chars().next_back(), Some(previous) if previous.is_alphanumeric())
}

fn colon_identifier(after_colon: &str) -> Option<u64> {
    let digits = leading_digits(after_colon.trim_start_matches(' '));
    (!digits.is_empty()).then(|| saturating_parse(digits))
}

fn compact_identifier(rest: &str) -> Option<u64> {
    let digits = leading_digits(rest);
    (!digits.is_empty() && rest[digits.len()..].starts_with(':')).then(|| saturating_parse(digits))
}

// `digits` is non-empty ASCII digits, so overflow is the only failure.
fn saturating_parse(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

fn leading_digits(text: &str) -> &str {
    let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colon_marker() {
        let parsed = ParsedSubject::parse("ID:45 Graph Function Workshop").unwrap();
        assert_eq!(parsed.identifier, 45);
        assert!(!parsed.is_delete_request);
        assert_eq!(parsed.raw_subject, "ID:45 Graph Function Workshop");
    }

    #[test]
    fn parses_compact_marker() {
        let parsed = ParsedSubject::parse("ID45: Modern Workplace Conference").unwrap();
        assert_eq!(parsed.identifier, 45);
    }

    #[test]
    fn marker_is_case_insensitive() {
        assert_eq!(ParsedSubject::parse("seminar id: 7").unwrap().identifier, 7);
        assert_eq!(ParsedSubject::parse("Seminar Id:7").unwrap().identifier, 7);
    }

    #[test]
    fn detects_delete_requests() {
        let parsed = ParsedSubject::parse("Delete ID12: Modern Workplace").unwrap();
        assert_eq!(parsed.identifier, 12);
        assert!(parsed.is_delete_request);

        let parsed = ParsedSubject::parse("DELETE id:3").unwrap();
        assert!(parsed.is_delete_request);
    }

    #[test]
    fn delete_must_lead_the_subject() {
        let parsed = ParsedSubject::parse("Please delete ID:3").unwrap();
        assert!(!parsed.is_delete_request);
    }

    #[test]
    fn subjects_without_marker_are_ineligible() {
        assert!(ParsedSubject::parse("Weekly status").is_none());
        assert!(ParsedSubject::parse("Idea: lunch").is_none());
        assert!(ParsedSubject::parse("ID: TBD").is_none());
        assert!(ParsedSubject::parse("ID 45 workshop").is_none());
        assert!(ParsedSubject::parse("").is_none());
    }

    #[test]
    fn compact_marker_inside_a_word_is_ignored() {
        assert!(ParsedSubject::parse("Covid19: office update").is_none());
        assert!(ParsedSubject::parse("Paid45: refund processed").is_none());
        assert!(ParsedSubject::parse("Invalid2: retry").is_none());
        assert!(ParsedSubject::parse("Android12: release notes").is_none());
    }

    #[test]
    fn compact_marker_after_punctuation_is_accepted() {
        assert_eq!(ParsedSubject::parse("Re: ID45: Conference").unwrap().identifier, 45);
        assert_eq!(ParsedSubject::parse("[ID7:] Standup").unwrap().identifier, 7);
    }

    #[test]
    fn oversized_identifier_saturates() {
        let parsed = ParsedSubject::parse("ID:99999999999999999999 Workshop").unwrap();
        assert_eq!(parsed.identifier, u64::MAX);
        assert!(!parsed.is_delete_request);
    }

    #[test]
    fn skips_false_marker_before_real_one() {
        let parsed = ParsedSubject::parse("Video call, ID:99").unwrap();
        assert_eq!(parsed.identifier, 99);
    }
}
