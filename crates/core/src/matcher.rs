//! Text matching used by the risk analyzer.
//!
//! The analyzer asks one question of free text: "does `text` mention `phrase`?". The default
//! answer is exact, case-sensitive substring containment, which means a short phrase can match
//! inside an unrelated longer word. That is a known accuracy limit, not something the default
//! matcher corrects. Stricter behaviour is opt-in through [`MatchMode`].

use crate::{IntakeError, IntakeResult};
use std::str::FromStr;

/// Decides whether a free-text field mentions a knowledge-base phrase.
pub trait Matcher: Send + Sync {
    fn matches(&self, text: &str, phrase: &str) -> bool;
}

/// Case-sensitive substring containment.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubstringMatcher;

impl Matcher for SubstringMatcher {
    fn matches(&self, text: &str, phrase: &str) -> bool {
        text.contains(phrase)
    }
}

/// Substring containment after trimming and lowercasing both sides.
#[derive(Clone, Copy, Debug, Default)]
pub struct CaseInsensitiveMatcher;

impl Matcher for CaseInsensitiveMatcher {
    fn matches(&self, text: &str, phrase: &str) -> bool {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return true;
        }
        text.trim().to_lowercase().contains(&phrase)
    }
}

/// Matches only whole words: `phrase` must appear as a contiguous run of tokens in `text`.
///
/// Tokens are maximal runs of alphanumeric characters, compared case-insensitively, so
/// "ache" no longer matches inside "headache" and "Headache," matches "headache".
#[derive(Clone, Copy, Debug, Default)]
pub struct WordBoundaryMatcher;

impl WordBoundaryMatcher {
    fn tokens(input: &str) -> Vec<String> {
        input
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}

impl Matcher for WordBoundaryMatcher {
    fn matches(&self, text: &str, phrase: &str) -> bool {
        let needle = Self::tokens(phrase);
        if needle.is_empty() {
            return true;
        }
        let haystack = Self::tokens(text);
        haystack.windows(needle.len()).any(|w| w == needle.as_slice())
    }
}

/// Matching strategy selected at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    Substring,
    CaseInsensitive,
    WordBoundary,
}

impl MatchMode {
    /// Returns the matcher implementing this mode.
    pub fn matcher(self) -> Box<dyn Matcher> {
        match self {
            MatchMode::Substring => Box::new(SubstringMatcher),
            MatchMode::CaseInsensitive => Box::new(CaseInsensitiveMatcher),
            MatchMode::WordBoundary => Box::new(WordBoundaryMatcher),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Substring => "substring",
            MatchMode::CaseInsensitive => "case-insensitive",
            MatchMode::WordBoundary => "word",
        }
    }
}

impl FromStr for MatchMode {
    type Err = IntakeError;

    fn from_str(s: &str) -> IntakeResult<Self> {
        match s.trim() {
            "substring" => Ok(MatchMode::Substring),
            "case-insensitive" => Ok(MatchMode::CaseInsensitive),
            "word" => Ok(MatchMode::WordBoundary),
            other => Err(IntakeError::InvalidInput(format!(
                "unknown match mode '{}' (expected substring, case-insensitive or word)",
                other
            ))),
        }
    }
}

impl Matcher for Box<dyn Matcher> {
    fn matches(&self, text: &str, phrase: &str) -> bool {
        self.as_ref().matches(text, phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_matcher_is_case_sensitive() {
        assert!(SubstringMatcher.matches("history of diabetes", "diabetes"));
        assert!(!SubstringMatcher.matches("History of Diabetes", "diabetes"));
    }

    #[test]
    fn test_substring_matcher_matches_inside_longer_words() {
        // known limitation of plain containment
        assert!(SubstringMatcher.matches("prediabetesish", "diabetes"));
    }

    #[test]
    fn test_empty_text_never_matches_non_empty_phrase() {
        assert!(!SubstringMatcher.matches("", "headache"));
        assert!(!CaseInsensitiveMatcher.matches("", "headache"));
        assert!(!WordBoundaryMatcher.matches("", "headache"));
    }

    #[test]
    fn test_case_insensitive_matcher_normalises_both_sides() {
        assert!(CaseInsensitiveMatcher.matches("  Severe HEADACHE ", "headache"));
        assert!(CaseInsensitiveMatcher.matches("frequent urination", " Frequent Urination "));
    }

    #[test]
    fn test_word_boundary_matcher_requires_whole_tokens() {
        assert!(WordBoundaryMatcher.matches("Headache, nausea", "headache"));
        assert!(WordBoundaryMatcher.matches("very frequent  urination", "frequent urination"));
        assert!(!WordBoundaryMatcher.matches("prediabetes", "diabetes"));
        assert!(!WordBoundaryMatcher.matches("urination frequent", "frequent urination"));
    }

    #[test]
    fn test_match_mode_from_str() {
        assert_eq!("substring".parse::<MatchMode>().unwrap(), MatchMode::Substring);
        assert_eq!(
            "case-insensitive".parse::<MatchMode>().unwrap(),
            MatchMode::CaseInsensitive
        );
        assert_eq!("word".parse::<MatchMode>().unwrap(), MatchMode::WordBoundary);

        let err = "fuzzy".parse::<MatchMode>().expect_err("should reject unknown mode");
        assert!(matches!(err, IntakeError::InvalidInput(msg) if msg.contains("fuzzy")));
    }

    #[test]
    fn test_boxed_matcher_delegates() {
        let matcher = MatchMode::WordBoundary.matcher();
        assert!(matcher.matches("mild headache", "headache"));
        assert!(!matcher.matches("mild headaches", "headache"));
    }
}
