//! Blacklist section - checks if password is in the common weak-password list.

use super::{Finding, FindingKind, SectionResult};
use crate::evaluator::AssessmentContext;

pub const COMMON_PASSWORD_PENALTY: i64 = 35;

/// Checks if the password is in the list of common passwords.
///
/// # Returns
/// - `Some(finding)` if password is blacklisted
/// - `None` if password is not in the list
pub fn blacklist_section(password: &str, context: &AssessmentContext) -> SectionResult {
    if context.common().contains(password) {
        return Some(Finding {
            kind: FindingKind::CommonPassword,
            reason: "Found in common weak-password list",
            penalty: COMMON_PASSWORD_PENALTY,
        });
    }
    None
}
