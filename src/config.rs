//! Run configuration: defaults and fail-fast validation.

use std::path::PathBuf;
use thiserror::Error;

use crate::engine::EngineMode;
use crate::generator::CandidateLimits;
use crate::profile::BIRTH_YEAR_RANGE;

pub const DEFAULT_MIN_LENGTH: usize = 4;
pub const DEFAULT_MAX_LENGTH: usize = 20;
pub const DEFAULT_POLICY_MIN_LENGTH: usize = 12;
pub const DEFAULT_MAX_CANDIDATES: usize = 50_000;
pub const DEFAULT_OUTPUT_ROOT: &str = "output";

/// Policy lengths below this are not worth auditing against.
pub const MIN_POLICY_LENGTH: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("workers must be at least 1")]
    NoWorkers,
    #[error("min length must be at least 1")]
    MinLengthTooSmall,
    #[error("max length ({max}) must be greater than or equal to min length ({min})")]
    InvertedLengthBounds { min: usize, max: usize },
    #[error("max candidates must be at least 1")]
    NoCandidates,
    #[error("policy min length must be at least {MIN_POLICY_LENGTH}, got {0}")]
    PolicyTooShort(usize),
    #[error("birth year must be in a realistic range (1900-2100), got {0}")]
    BirthYearOutOfRange(i32),
    #[error("last rotation days cannot be negative")]
    NegativeRotation,
    #[error("unknown engine mode: {0}")]
    UnknownMode(String),
}

/// Returns the default worker count: available CPUs, never below 2.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .max(2)
}

/// Knobs for one audit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    pub min_length: usize,
    pub max_length: usize,
    pub max_candidates: usize,
    pub policy_min_length: usize,
    pub engine: EngineMode,
    pub workers: usize,
    pub output_root: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            policy_min_length: DEFAULT_POLICY_MIN_LENGTH,
            engine: EngineMode::Auto,
            workers: default_workers(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
        }
    }
}

impl AuditConfig {
    /// Checks every bound before any work starts.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers < 1 {
            return Err(ConfigError::NoWorkers);
        }
        self.candidate_limits()?;
        if self.policy_min_length < MIN_POLICY_LENGTH {
            return Err(ConfigError::PolicyTooShort(self.policy_min_length));
        }
        Ok(())
    }

    pub fn candidate_limits(&self) -> Result<CandidateLimits, ConfigError> {
        CandidateLimits::new(self.min_length, self.max_length, self.max_candidates)
    }
}

/// Checks the numeric profile inputs that the CLI accepts directly.
pub fn validate_profile_inputs(
    birth_year: Option<i32>,
    last_rotation_days: Option<i64>,
) -> Result<(), ConfigError> {
    if let Some(year) = birth_year {
        if !BIRTH_YEAR_RANGE.contains(&year) {
            return Err(ConfigError::BirthYearOutOfRange(year));
        }
    }
    if matches!(last_rotation_days, Some(days) if days < 0) {
        return Err(ConfigError::NegativeRotation);
    }
    Ok(())
}
