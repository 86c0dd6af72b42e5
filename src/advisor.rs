//! Rule-based remediation guidance.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{PasswordAssessment, RunSummary};
use crate::profile::SubjectProfile;

/// Upper bound on tips returned by [`build_guidance`].
pub const MAX_TIPS: usize = 8;

/// Rotation older than this many days is called out.
pub const STALE_ROTATION_DAYS: i64 = 180;

pub const PASSPHRASE_WORDS: [&str; 12] = [
    "anchor", "planet", "forest", "silver", "candle", "rocket", "harbor", "falcon", "maple",
    "sunset", "river", "galaxy",
];

const PASSPHRASE_JOINERS: [char; 6] = ['-', '_', '.', '!', '@', '#'];

/// Tips ordered by priority, at most [`MAX_TIPS`].
pub fn build_guidance(
    profile: &SubjectProfile,
    summary: &RunSummary,
    audited: &[PasswordAssessment],
) -> Vec<String> {
    let mut tips = Vec::new();

    let weak_ratio = summary.weak_ratio();
    let exposure = if weak_ratio >= 0.45 {
        "High weak-pattern exposure detected. Prioritize policy hardening and awareness training."
    } else if weak_ratio >= 0.25 {
        "Moderate weak-pattern exposure detected. Tighten password standards and monitor reuse."
    } else {
        "Weak-pattern exposure is relatively low. Keep regular hygiene checks in place."
    };
    tips.push(exposure.to_string());

    match profile.mfa_enabled {
        Some(false) => tips.push("MFA is disabled. Enable MFA for all critical accounts immediately.".to_string()),
        None => tips.push("MFA status unknown. Verify MFA coverage and document gaps.".to_string()),
        Some(true) => {}
    }

    match profile.password_manager_used {
        Some(false) => tips.push(
            "Password manager is not in use. Adopt one to reduce reuse and weak-password risk.".to_string(),
        ),
        None => tips.push(
            "Password manager usage unknown. Confirm whether users store credentials safely.".to_string(),
        ),
        Some(true) => {}
    }

    if profile.last_rotation_days.is_some_and(|days| days > STALE_ROTATION_DAYS) {
        tips.push("Password rotation appears stale (>180 days). Rotate high-risk credentials.".to_string());
    }

    let audited_weak = audited.iter().filter(|a| a.is_weak()).count();
    if audited_weak > 0 {
        tips.push(format!(
            "Audited password list contains {audited_weak} weak passwords. Force reset and blocklist these patterns."
        ));
    }

    if profile.organization.as_deref().is_none_or(str::is_empty) {
        tips.push("Organization context missing. Add it for clearer reporting and ownership.".to_string());
    }
    if profile.risk_notes.is_empty() {
        tips.push(
            "No risk notes supplied. Capture recent incidents or known user behavior patterns.".to_string(),
        );
    }

    tips.truncate(MAX_TIPS);
    tips
}

/// Canned answer picked by the first matching keyword.
pub fn answer_question(question: &str) -> &'static str {
    let q = question.trim().to_lowercase();
    if q.is_empty() {
        "Ask about policy, MFA, weak patterns, or remediation."
    } else if q.contains("mfa") {
        "Enable MFA everywhere possible, starting with privileged and externally accessible accounts."
    } else if q.contains("weak") || q.contains("score") {
        "Focus on passwords flagged weak due to common-list matches, personal tokens, and policy violations."
    } else if q.contains("policy") {
        "Baseline policy: >=12 chars, mixed case, numbers, symbols, and ban known weak/common passwords."
    } else if q.contains("rotation") {
        "Use risk-based rotation: immediate for compromised creds, periodic for privileged accounts."
    } else if q.contains("manager") {
        "Password managers reduce reuse and improve uniqueness across services."
    } else {
        "Prioritize MFA, stronger policy thresholds, and continuous password hygiene audits."
    }
}

/// `Word<j>Word<j>NNN` suggestions, e.g. `Falcon_River_417`.
pub fn passphrase_suggestions<R: Rng>(rng: &mut R, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let first = PASSPHRASE_WORDS.choose(rng).copied().unwrap_or("anchor");
            let second = PASSPHRASE_WORDS.choose(rng).copied().unwrap_or("planet");
            let joiner = PASSPHRASE_JOINERS.choose(rng).copied().unwrap_or('-');
            let number: u16 = rng.gen_range(100..1000);
            format!("{}{joiner}{}{joiner}{number}", capitalize(first), capitalize(second))
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ResolvedMode;
    use crate::evaluator::{assess_password, AssessmentContext};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn summary(generated: usize, weak: usize) -> RunSummary {
        RunSummary {
            subject_name: "River".to_string(),
            subject_slug: "river".to_string(),
            generated_candidates: generated,
            weak_count: weak,
            medium_count: generated - weak,
            strong_count: 0,
            engine_mode: ResolvedMode::Threading,
            workers: 2,
            policy_min_length: 12,
            audited_password_count: 0,
            audited_weak_count: 0,
        }
    }

    #[test]
    fn test_exposure_tiers() {
        let profile = SubjectProfile::new("River");
        assert!(build_guidance(&profile, &summary(100, 45), &[])[0].starts_with("High"));
        assert!(build_guidance(&profile, &summary(100, 25), &[])[0].starts_with("Moderate"));
        assert!(build_guidance(&profile, &summary(100, 10), &[])[0].starts_with("Weak-pattern exposure is relatively low"));
        assert!(build_guidance(&profile, &summary(0, 0), &[])[0].starts_with("Weak-pattern exposure is relatively low"));
    }

    #[test]
    fn test_fully_described_profile_gets_one_tip() {
        let mut profile = SubjectProfile::new("River");
        profile.mfa_enabled = Some(true);
        profile.password_manager_used = Some(true);
        profile.last_rotation_days = Some(30);
        profile.organization = Some("Acme".to_string());
        profile.risk_notes = vec!["phishing".to_string()];

        assert_eq!(build_guidance(&profile, &summary(10, 1), &[]).len(), 1);
    }

    #[test]
    fn test_every_gap_is_reported_and_capped() {
        let mut profile = SubjectProfile::new("River");
        profile.mfa_enabled = Some(false);
        profile.password_manager_used = Some(false);
        profile.last_rotation_days = Some(400);

        let ctx = AssessmentContext::new(Default::default(), 12);
        let audited = vec![assess_password("password", &ctx), assess_password("123456", &ctx)];

        let tips = build_guidance(&profile, &summary(10, 9), &audited);
        assert_eq!(tips.len(), 7);
        assert!(tips.len() <= MAX_TIPS);
        assert!(tips.iter().any(|t| t.starts_with("MFA is disabled")));
        assert!(tips.iter().any(|t| t.contains("stale")));
        assert!(tips.iter().any(|t| t.contains("contains 2 weak passwords")));
    }

    #[test]
    fn test_answer_question_keywords() {
        assert!(answer_question("  ").starts_with("Ask about"));
        assert!(answer_question("Should we use MFA?").starts_with("Enable MFA"));
        assert!(answer_question("why is my score low").starts_with("Focus on"));
        assert!(answer_question("what POLICY").starts_with("Baseline policy"));
        assert!(answer_question("rotation cadence").starts_with("Use risk-based"));
        assert!(answer_question("password manager?").starts_with("Password managers"));
        assert!(answer_question("anything else").starts_with("Prioritize"));
    }

    #[test]
    fn test_passphrase_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let phrases = passphrase_suggestions(&mut rng, 5);
        assert_eq!(phrases.len(), 5);

        for phrase in phrases {
            let joiner = phrase
                .chars()
                .find(|c| PASSPHRASE_JOINERS.contains(c))
                .expect("phrase has a joiner");
            let parts: Vec<&str> = phrase.split(joiner).collect();
            assert_eq!(parts.len(), 3, "{phrase}");
            assert!(parts[0].chars().next().is_some_and(char::is_uppercase));
            assert!(parts[1].chars().next().is_some_and(char::is_uppercase));
            let number: u16 = parts[2].parse().unwrap();
            assert!((100..1000).contains(&number));
        }
    }

    #[test]
    fn test_passphrases_are_seed_deterministic() {
        let a = passphrase_suggestions(&mut StdRng::seed_from_u64(42), 3);
        let b = passphrase_suggestions(&mut StdRng::seed_from_u64(42), 3);
        assert_eq!(a, b);
    }
}
