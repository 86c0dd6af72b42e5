//! Personal information section - checks for subject tokens inside the password.

use super::{Finding, FindingKind, SectionResult};
use crate::evaluator::AssessmentContext;

pub const PERSONAL_INFO_PENALTY: i64 = 25;

/// Flags the password once if any subject token appears in it, ignoring case.
pub fn personal_info_section(password: &str, context: &AssessmentContext) -> SectionResult {
    let lowered = password.to_lowercase();
    context.tokens().first_match(&lowered).map(|_| Finding {
        kind: FindingKind::PersonalInfo,
        reason: "Contains personal/profile information",
        penalty: PERSONAL_INFO_PENALTY,
    })
}
