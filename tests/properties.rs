//! Property tests: candidate bounds, score bounds, and classification rules
//! that must hold for every input.

use proptest::prelude::*;
use victimator::blacklist::BUILTIN_COMMON_PASSWORDS;
use victimator::generator::{generate_candidates_at, CandidateLimits, YearContext};
use victimator::{assess_password, normalize_tokens, AssessmentContext, Classification};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// `(min_length, max_length, max_candidates)` with `min <= max`.
fn arb_limits() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..12, 0usize..10, 1usize..400).prop_map(|(min, span, cap)| (min, min + span, cap))
}

fn arb_tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z0-9 ]{0,14}", 0..6)
}

/// A built-in common password with its letters randomly re-cased.
fn arb_common_password() -> impl Strategy<Value = String> {
    (prop::sample::select(BUILTIN_COMMON_PASSWORDS.to_vec()), any::<u64>()).prop_map(|(word, mask)| {
        word.chars()
            .enumerate()
            .map(|(i, c)| {
                if (mask >> (i % 64)) & 1 == 1 {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Candidate generation
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn candidates_respect_bounds(
        (min, max, cap) in arb_limits(),
        tokens in arb_tokens(),
        birth in prop::option::of(1900i32..=2100),
    ) {
        let limits = CandidateLimits::new(min, max, cap).unwrap();
        let years = YearContext::new(2024, birth);
        let candidates = generate_candidates_at(&tokens, &limits, &years);

        prop_assert!(candidates.len() <= cap);
        for candidate in &candidates {
            let len = candidate.chars().count();
            prop_assert!(len >= min && len <= max, "{candidate:?} outside {min}..={max}");
        }

        let mut distinct = candidates.clone();
        distinct.dedup();
        prop_assert_eq!(distinct.len(), candidates.len());
    }

    #[test]
    fn candidates_are_idempotent(
        (min, max, cap) in arb_limits(),
        tokens in arb_tokens(),
    ) {
        let limits = CandidateLimits::new(min, max, cap).unwrap();
        let years = YearContext::new(2031, Some(1988));
        prop_assert_eq!(
            generate_candidates_at(&tokens, &limits, &years),
            generate_candidates_at(&tokens, &limits, &years)
        );
    }
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn score_and_entropy_are_bounded(password in "\\PC{0,40}", policy in 6usize..32) {
        let context = AssessmentContext::new(normalize_tokens(["river", "acmecorp"]), policy);
        let assessment = assess_password(&password, &context);

        prop_assert!(assessment.score <= 100);
        prop_assert!(assessment.entropy_bits >= 0.0);
        prop_assert_eq!(assessment.password, password);
    }

    #[test]
    fn common_passwords_are_always_weak(password in arb_common_password(), policy in 6usize..32) {
        let context = AssessmentContext::new(normalize_tokens(Vec::<String>::new()), policy);
        let assessment = assess_password(&password, &context);
        prop_assert_eq!(assessment.classification, Classification::Weak);
    }

    #[test]
    fn injected_subject_tokens_are_flagged(
        token in "[a-z]{3,10}",
        prefix in "[0-9!#]{0,4}",
        suffix in "[0-9!#]{0,4}",
    ) {
        let context = AssessmentContext::new(normalize_tokens([token.as_str()]), 12);
        let mut chars = token.chars();
        let capitalized: String = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .into_iter()
            .chain(chars)
            .collect();

        let assessment = assess_password(&format!("{prefix}{capitalized}{suffix}"), &context);
        prop_assert!(
            assessment.reasons.iter().any(|r| r.contains("personal")),
            "reasons: {:?}",
            assessment.reasons
        );
    }
}

#[test]
fn river_example_end_to_end() {
    let limits = CandidateLimits::new(4, 10, 50).unwrap();
    let years = YearContext::new(2024, None);
    let first = generate_candidates_at(["river", "2024"], &limits, &years);

    for expected in ["river", "River", "r1ver", "river2024", "2024river"] {
        assert!(first.contains(&expected.to_string()), "missing {expected}");
    }
    assert!(first.len() <= 50);
    assert_eq!(first, generate_candidates_at(["river", "2024"], &limits, &years));
}

#[test]
fn injected_token_example() {
    let context = AssessmentContext::new(normalize_tokens(["acmecorp"]), 12);
    let assessment = assess_password("Acmecorp2024!", &context);
    assert!(assessment.reasons.iter().any(|r| r.contains("personal")));
}
