//! Pattern analysis sections - detect sequential and repetitive runs.

use super::{Finding, FindingKind, SectionResult};
use crate::evaluator::AssessmentContext;

pub const SEQUENCE_PENALTY: i64 = 12;
pub const REPEATED_RUN_PENALTY: i64 = 10;

const SEQUENCE_WINDOW: usize = 4;
const REPEAT_THRESHOLD: usize = 3;

/// Whether any 4-character window strictly ascends or descends by one code
/// point per step, ignoring case.
pub fn has_sequence(password: &str) -> bool {
    let chars: Vec<u32> = password.to_lowercase().chars().map(u32::from).collect();
    chars.windows(SEQUENCE_WINDOW).any(|window| {
        let ascending = window.windows(2).all(|w| w[1] == w[0].wrapping_add(1));
        let descending = window.windows(2).all(|w| w[0] == w[1].wrapping_add(1));
        ascending || descending
    })
}

/// Whether the password holds 3 or more identical characters in a row.
pub fn has_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    let mut run = 1;
    for i in 1..chars.len() {
        if chars[i] == chars[i - 1] {
            run += 1;
            if run >= REPEAT_THRESHOLD {
                return true;
            }
        } else {
            run = 1;
        }
    }
    false
}

/// Analyzes password for sequential patterns (e.g., "abcd", "9876").
pub fn sequence_section(password: &str, _context: &AssessmentContext) -> SectionResult {
    has_sequence(password).then_some(Finding {
        kind: FindingKind::Sequence,
        reason: "Contains predictable character sequence",
        penalty: SEQUENCE_PENALTY,
    })
}

/// Analyzes password for repetitive patterns (e.g., "aaa").
pub fn repeated_run_section(password: &str, _context: &AssessmentContext) -> SectionResult {
    has_repeated_run(password).then_some(Finding {
        kind: FindingKind::RepeatedRun,
        reason: "Contains repeated character runs",
        penalty: REPEATED_RUN_PENALTY,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::SubjectTokens;

    fn context() -> AssessmentContext {
        AssessmentContext::new(SubjectTokens::default(), 12)
    }

    #[test]
    fn test_pattern_section_repetitive_chars() {
        let result = repeated_run_section("aaaaBBBB1111", &context());
        assert!(matches!(result, Some(Finding { kind: FindingKind::RepeatedRun, .. })));
    }

    #[test]
    fn test_repeats_are_case_sensitive() {
        assert!(!has_repeated_run("aAa"));
        assert!(has_repeated_run("x!!!y"));
    }

    #[test]
    fn test_pattern_section_sequential_numbers() {
        let result = sequence_section("test1234", &context());
        assert!(matches!(result, Some(Finding { kind: FindingKind::Sequence, .. })));
    }

    #[test]
    fn test_sequence_descending_and_mixed_case() {
        assert!(has_sequence("x9876y"));
        assert!(has_sequence("aBcD"));
        assert!(has_sequence("DCba"));
    }

    #[test]
    fn test_sequence_needs_four_steps() {
        assert!(!has_sequence("abc"));
        assert!(!has_sequence("abce"));
        assert!(!has_sequence("abcba"));
    }

    #[test]
    fn test_pattern_section_strong_password() {
        let ctx = context();
        assert_eq!(sequence_section("RandomPass13!@#Word", &ctx), None);
        assert_eq!(repeated_run_section("RandomPass13!@#Word", &ctx), None);
    }

    #[test]
    fn test_pattern_section_too_short() {
        assert!(!has_sequence("ab"));
        assert!(!has_repeated_run("aa"));
        assert!(!has_repeated_run(""));
    }
}
