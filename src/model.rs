//! Records produced by an audit run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::ResolvedMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Weak,
    Medium,
    Strong,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Weak => "weak",
            Classification::Medium => "medium",
            Classification::Strong => "strong",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength verdict for one password. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordAssessment {
    pub password: String,
    /// Always within `0..=100`.
    pub score: u8,
    /// Never negative; rounded to two decimals.
    pub entropy_bits: f64,
    pub classification: Classification,
    pub reasons: Vec<String>,
    pub policy_violations: Vec<String>,
    pub suggestions: Vec<String>,
}

impl PasswordAssessment {
    pub fn is_weak(&self) -> bool {
        self.classification == Classification::Weak
    }
}

/// Aggregate numbers for one run, persisted as `summary.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub subject_name: String,
    pub subject_slug: String,
    pub generated_candidates: usize,
    pub weak_count: usize,
    pub medium_count: usize,
    pub strong_count: usize,
    pub engine_mode: ResolvedMode,
    pub workers: usize,
    pub policy_min_length: usize,
    pub audited_password_count: usize,
    pub audited_weak_count: usize,
}

impl RunSummary {
    /// Share of generated candidates classified weak, `0.0` when none were generated.
    pub fn weak_ratio(&self) -> f64 {
        if self.generated_candidates == 0 {
            return 0.0;
        }
        self.weak_count as f64 / self.generated_candidates as f64
    }
}
