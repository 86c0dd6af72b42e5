//! Password assessment - main scoring logic.

use serde::{Deserialize, Serialize};

use crate::blacklist::CommonPasswords;
use crate::model::{Classification, PasswordAssessment};
use crate::sections::{
    blacklist_section, estimate_entropy_bits, personal_info_section, policy_violations,
    repeated_run_section, sequence_section, CharClasses, FindingKind, Section, Violation,
};
use crate::tokens::SubjectTokens;

/// Penalty per policy violation.
pub const VIOLATION_PENALTY: i64 = 4;
pub const WEAK_BELOW: i64 = 45;
pub const MEDIUM_BELOW: i64 = 75;

const SECTIONS: [(&str, Section); 4] = [
    ("blacklist", blacklist_section),
    ("personal", personal_info_section),
    ("sequence", sequence_section),
    ("repeats", repeated_run_section),
];

/// Everything an assessment reads besides the password itself.
///
/// Immutable and serializable, so it can be shared across threads or shipped
/// to worker processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentContext {
    tokens: SubjectTokens,
    policy_min_length: usize,
    common: CommonPasswords,
}

impl AssessmentContext {
    pub fn new(tokens: SubjectTokens, policy_min_length: usize) -> Self {
        Self {
            tokens,
            policy_min_length,
            common: CommonPasswords::builtin(),
        }
    }

    pub fn with_common(mut self, common: CommonPasswords) -> Self {
        self.common = common;
        self
    }

    pub fn tokens(&self) -> &SubjectTokens {
        &self.tokens
    }

    pub fn policy_min_length(&self) -> usize {
        self.policy_min_length
    }

    pub fn common(&self) -> &CommonPasswords {
        &self.common
    }
}

/// Scores one password.
///
/// Pure: no shared state is touched, so concurrent calls are safe. Never
/// fails; an empty password gets score 0 and every policy violation.
pub fn assess_password(password: &str, context: &AssessmentContext) -> PasswordAssessment {
    let mut reasons = Vec::new();
    let mut penalties: i64 = 0;
    let mut common_match = false;
    let mut personal_match = false;

    // Orchestrator: execute sections in sequence
    for (section_name, section_fn) in SECTIONS {
        if let Some(finding) = section_fn(password, context) {
            tracing::trace!(section = section_name, "section flagged password");
            match finding.kind {
                FindingKind::CommonPassword => common_match = true,
                FindingKind::PersonalInfo => personal_match = true,
                FindingKind::Sequence | FindingKind::RepeatedRun => {}
            }
            reasons.push(finding.reason.to_string());
            penalties += finding.penalty;
        }
    }

    let length = password.chars().count() as i64;
    let entropy = estimate_entropy_bits(password);
    let diversity = CharClasses::of(password).count() as i64;

    let violations = policy_violations(password, context.policy_min_length);
    penalties += violations.len() as i64 * VIOLATION_PENALTY;

    let raw = (length * 4).min(40) + diversity * 8 + ((entropy / 4.0).floor() as i64).min(24)
        - penalties;
    let score = raw.clamp(0, 100);

    let classification = if score < WEAK_BELOW || common_match {
        Classification::Weak
    } else if score < MEDIUM_BELOW {
        Classification::Medium
    } else {
        Classification::Strong
    };

    let mut suggestions = Vec::new();
    if violations.contains(&Violation::MissingSymbol) {
        suggestions.push("Add symbols to increase complexity".to_string());
    }
    if violations.contains(&Violation::MissingDigit) {
        suggestions.push("Include at least one number".to_string());
    }
    if length < context.policy_min_length as i64 {
        suggestions.push(format!(
            "Increase length to at least {} characters",
            context.policy_min_length
        ));
    }
    if personal_match {
        suggestions.push("Avoid names, birthdays, and obvious personal words".to_string());
    }
    if suggestions.is_empty() && classification == Classification::Strong {
        suggestions.push("Looks strong; rotate it regularly and keep it unique".to_string());
    }

    PasswordAssessment {
        password: password.to_string(),
        score: score as u8,
        entropy_bits: (entropy * 100.0).round() / 100.0,
        classification,
        reasons,
        policy_violations: violations.iter().map(ToString::to_string).collect(),
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::normalize_tokens;

    fn context() -> AssessmentContext {
        AssessmentContext::new(normalize_tokens(["acmecorp", "river"]), 12)
    }

    #[test]
    fn test_assess_common_password_is_weak() {
        let assessment = assess_password("password", &context());
        assert_eq!(assessment.classification, Classification::Weak);
        assert!(assessment.reasons.iter().any(|r| r.contains("common")));
    }

    #[test]
    fn test_common_match_overrides_high_score() {
        let mut common = CommonPasswords::builtin();
        let file = {
            use std::io::Write;
            let mut f = tempfile::NamedTempFile::new().expect("Failed to create temp file");
            writeln!(f, "Zq7#mV9!pL2$wX").expect("Failed to write");
            f
        };
        common.extend_from_path(file.path()).unwrap();
        let ctx = context().with_common(common);

        let assessment = assess_password("Zq7#mV9!pL2$wX", &ctx);
        // 94 - 35 would still be medium without the override
        assert_eq!(assessment.score, 59);
        assert_eq!(assessment.classification, Classification::Weak);
    }

    #[test]
    fn test_assess_personal_info() {
        let assessment = assess_password("Acmecorp2024!", &context());
        assert!(assessment.reasons.iter().any(|r| r.contains("personal")));
        assert!(assessment
            .suggestions
            .iter()
            .any(|s| s.contains("personal words")));
    }

    #[test]
    fn test_assess_strong_password() {
        let assessment = assess_password("Zq7#mV9!pL2$wX", &context());
        // 40 + 4*8 + min(floor(14*log2(95)/4), 24) = 94
        assert_eq!(assessment.score, 94);
        assert_eq!(assessment.classification, Classification::Strong);
        assert!(assessment.reasons.is_empty());
        assert!(assessment.policy_violations.is_empty());
        assert_eq!(
            assessment.suggestions,
            vec!["Looks strong; rotate it regularly and keep it unique".to_string()]
        );
    }

    #[test]
    fn test_assess_medium_password() {
        let assessment = assess_password("Lighthouse4", &context());
        // 40 + 3*8 + 16 - 2*4 = 72
        assert_eq!(assessment.score, 72);
        assert_eq!(assessment.classification, Classification::Medium);
        assert_eq!(
            assessment.policy_violations,
            vec!["length<12".to_string(), "missing-symbol".to_string()]
        );
        assert_eq!(
            assessment.suggestions,
            vec![
                "Add symbols to increase complexity".to_string(),
                "Increase length to at least 12 characters".to_string(),
            ]
        );
    }

    #[test]
    fn test_assess_sequence_and_repeats() {
        let assessment = assess_password("Xabcd777!", &context());
        assert!(assessment.reasons.iter().any(|r| r.contains("sequence")));
        assert!(assessment.reasons.iter().any(|r| r.contains("repeated")));
    }

    #[test]
    fn test_assess_empty_password() {
        let assessment = assess_password("", &context());
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.entropy_bits, 0.0);
        assert_eq!(assessment.classification, Classification::Weak);
        assert_eq!(assessment.policy_violations.len(), 5);
    }

    #[test]
    fn test_entropy_is_rounded() {
        let assessment = assess_password("abc", &context());
        // 3 * log2(26) = 14.101...
        assert_eq!(assessment.entropy_bits, 14.1);
    }

    #[test]
    fn test_score_boundaries() {
        for pwd in ["", "a", "password", "MyPass123!", "VeryStrongPassword123!@#", "!!!!"] {
            let assessment = assess_password(pwd, &context());
            assert!(assessment.score <= 100, "score out of bounds for '{pwd}'");
            assert!(assessment.entropy_bits >= 0.0);
        }
    }
}
