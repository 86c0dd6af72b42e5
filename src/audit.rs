//! Audit pipeline: generate candidates, assess them, categorize, and audit
//! an optional password list through the same engines.

use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::blacklist::{BlacklistError, CommonPasswords};
use crate::config::{AuditConfig, ConfigError};
use crate::engine::{AssessTask, EngineCoordinator, EngineError, ResolvedMode};
use crate::evaluator::AssessmentContext;
use crate::generator::{generate_candidates_at, sort_passwords, YearContext};
use crate::logging::LogSink;
use crate::model::{Classification, PasswordAssessment, RunSummary};
use crate::profile::{slugify, SubjectProfile};
use crate::tokens::normalize_tokens;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Blacklist(#[from] BlacklistError),
    #[error("assessment engine failed: {0}")]
    Engine(#[from] EngineError),
    #[error("password file not found: {0}")]
    PasswordFileNotFound(PathBuf),
    #[error("failed to read password file {path}: {source}")]
    PasswordFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads a newline-delimited password list: trimmed, blank lines skipped,
/// invalid UTF-8 replaced.
pub fn load_password_list(path: &Path) -> Result<Vec<SecretString>, AuditError> {
    if !path.exists() {
        return Err(AuditError::PasswordFileNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| AuditError::PasswordFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| SecretString::from(line.to_string()))
        .collect())
}

/// Candidates split by classification, each sorted for output.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Wordlists {
    pub weak: Vec<String>,
    pub medium: Vec<String>,
    pub strong: Vec<String>,
    pub full: Vec<String>,
}

impl Wordlists {
    /// Pairs each candidate with the assessment at the same position.
    pub fn categorize(candidates: &[String], assessments: &[PasswordAssessment]) -> Self {
        let mut weak = Vec::new();
        let mut medium = Vec::new();
        let mut strong = Vec::new();
        for (candidate, assessment) in candidates.iter().zip(assessments) {
            let bucket = match assessment.classification {
                Classification::Weak => &mut weak,
                Classification::Medium => &mut medium,
                Classification::Strong => &mut strong,
            };
            bucket.push(candidate.clone());
        }
        Self {
            weak: sort_passwords(weak),
            medium: sort_passwords(medium),
            strong: sort_passwords(strong),
            full: sort_passwords(candidates.iter().cloned()),
        }
    }

    /// `(name, entries)` in output order.
    pub fn categories(&self) -> [(&'static str, &[String]); 4] {
        [
            ("weak", self.weak.as_slice()),
            ("medium", self.medium.as_slice()),
            ("strong", self.strong.as_slice()),
            ("full", self.full.as_slice()),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub candidates: Vec<String>,
    pub assessments: Vec<PasswordAssessment>,
    pub wordlists: Wordlists,
    pub audited: Vec<PasswordAssessment>,
    pub audit_mode: ResolvedMode,
    pub summary: RunSummary,
}

/// One configured audit, reusable across subjects.
#[derive(Debug, Clone)]
pub struct Auditor {
    config: AuditConfig,
    common: CommonPasswords,
    coordinator: EngineCoordinator,
    current_year: Option<i32>,
}

impl Auditor {
    /// # Errors
    ///
    /// Fails fast on an invalid configuration.
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        config.validate()?;
        let coordinator = EngineCoordinator::new(config.engine, config.workers);
        Ok(Self {
            config,
            common: CommonPasswords::builtin(),
            coordinator,
            current_year: None,
        })
    }

    pub fn with_common_passwords(mut self, common: CommonPasswords) -> Self {
        self.common = common;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn LogSink>) -> Self {
        self.coordinator = self.coordinator.with_logger(logger);
        self
    }

    pub fn with_worker_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.coordinator = self.coordinator.with_worker_program(program);
        self
    }

    /// Pins the year used for year affixes instead of the clock.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn run(
        &self,
        profile: &SubjectProfile,
        password_list: &[SecretString],
    ) -> Result<AuditOutcome, AuditError> {
        let limits = self.config.candidate_limits()?;
        let years = match self.current_year {
            Some(year) => YearContext::new(year, profile.birth_year),
            None => YearContext::now(profile.birth_year),
        };

        let raw_tokens = profile.all_tokens();
        let candidates = generate_candidates_at(&raw_tokens, &limits, &years);
        tracing::info!("Generated {} candidate patterns", candidates.len());

        let context = AssessmentContext::new(normalize_tokens(&raw_tokens), self.config.policy_min_length)
            .with_common(self.common.clone());
        let task = AssessTask::new(context);

        let dispatched = self.coordinator.dispatch(task.clone(), candidates.clone())?;
        let wordlists = Wordlists::categorize(&candidates, &dispatched.results);

        let audited = if password_list.is_empty() {
            None
        } else {
            tracing::info!("Auditing {} explicit passwords", password_list.len());
            let plain = password_list
                .iter()
                .map(|secret| secret.expose_secret().to_string())
                .collect();
            Some(self.coordinator.dispatch(task, plain)?)
        };
        let (audited, audit_mode) = match audited {
            Some(done) => (done.results, done.mode),
            None => (Vec::new(), ResolvedMode::None),
        };

        let summary = RunSummary {
            subject_name: profile.name.clone(),
            subject_slug: slugify(&profile.name),
            generated_candidates: candidates.len(),
            weak_count: wordlists.weak.len(),
            medium_count: wordlists.medium.len(),
            strong_count: wordlists.strong.len(),
            engine_mode: dispatched.mode,
            workers: self.config.workers,
            policy_min_length: self.config.policy_min_length,
            audited_password_count: audited.len(),
            audited_weak_count: audited.iter().filter(|a| a.is_weak()).count(),
        };

        tracing::info!(
            "Run completed. weak={} medium={} strong={}",
            summary.weak_count,
            summary.medium_count,
            summary.strong_count
        );

        Ok(AuditOutcome {
            candidates,
            assessments: dispatched.results,
            wordlists,
            audited,
            audit_mode,
            summary,
        })
    }
}
