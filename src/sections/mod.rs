//! Password assessment sections
//!
//! Each section analyzes a specific aspect of password strength.

mod blacklist;
mod pattern;
mod personal;
mod policy;
mod variety;

pub use blacklist::blacklist_section;
pub use pattern::{repeated_run_section, sequence_section};
pub use personal::personal_info_section;
pub use policy::{policy_violations, Violation};
pub use variety::{estimate_entropy_bits, CharClasses};

use crate::evaluator::AssessmentContext;

/// Which check produced a [`Finding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    CommonPassword,
    PersonalInfo,
    Sequence,
    RepeatedRun,
}

/// A failed section: the reason shown to the user and the score penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: FindingKind,
    pub reason: &'static str,
    pub penalty: i64,
}

/// Result type for section evaluation functions.
/// - `Some(finding)` - Section failed
/// - `None` - Section passed
pub type SectionResult = Option<Finding>;

/// Signature shared by every section so the evaluator can run them in sequence.
pub type Section = fn(&str, &AssessmentContext) -> SectionResult;
