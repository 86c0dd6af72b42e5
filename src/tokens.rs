//! Subject token normalization.
//!
//! Turns raw biographical strings into the canonical token set used for
//! personal-information checks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tokens shorter than this are too generic to flag as personal information.
pub const MIN_TOKEN_LENGTH: usize = 3;

/// Ordered set of distinct, lowercase subject tokens, each at least
/// [`MIN_TOKEN_LENGTH`] characters long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectTokens(Vec<String>);

impl SubjectTokens {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first token (in sorted order) contained in `lowered`.
    pub fn first_match(&self, lowered: &str) -> Option<&str> {
        self.iter().find(|token| lowered.contains(token))
    }
}

/// Normalizes raw subject strings: trim, lowercase, drop short entries,
/// deduplicate and sort.
///
/// The result does not depend on input order. An empty input yields an
/// empty set.
pub fn normalize_tokens<I, S>(raw: I) -> SubjectTokens
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let normalized: BTreeSet<String> = raw
        .into_iter()
        .map(|value| value.as_ref().trim().to_lowercase())
        .filter(|token| token.chars().count() >= MIN_TOKEN_LENGTH)
        .collect();

    SubjectTokens(normalized.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_lowercases_and_dedups() {
        let tokens = normalize_tokens(["  River ", "RIVER", "river", "Acme"]);
        assert_eq!(tokens.iter().collect::<Vec<_>>(), vec!["acme", "river"]);
    }

    #[test]
    fn test_normalize_drops_short_and_blank_entries() {
        let tokens = normalize_tokens(["ab", "   ", "", "87", "abc"]);
        assert_eq!(tokens.iter().collect::<Vec<_>>(), vec!["abc"]);
    }

    #[test]
    fn test_normalize_is_order_independent() {
        let a = normalize_tokens(["zeta", "alpha", "Mid"]);
        let b = normalize_tokens(["Mid", "zeta", "alpha"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalize_empty_input() {
        let tokens = normalize_tokens(Vec::<String>::new());
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // two characters, four bytes
        let tokens = normalize_tokens(["éé", "ééé"]);
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_first_match_returns_sorted_first() {
        let tokens = normalize_tokens(["corp", "acmecorp"]);
        assert_eq!(tokens.first_match("acmecorp2024!"), Some("acmecorp"));
        assert_eq!(tokens.first_match("unrelated"), None);
    }
}
