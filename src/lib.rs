//! Defensive password audit library
//!
//! Synthesizes a bounded set of personalized weak-password candidates from a
//! subject's biographical tokens, scores every candidate (and optionally a
//! supplied password list) with heuristic strength rules, and runs the
//! scoring through an execution engine chosen by workload size.
//!
//! # Features
//!
//! - `async` (default): enables the cooperative engine on a tokio runtime.
//!   Without it, requests for that engine fall back to the thread pool.
//!
//! # Environment Variables
//!
//! - `VICTIMATOR_BLACKLIST_PATH`: newline-delimited file extending the
//!   built-in common-password list
//! - `VICTIMATOR_ENGINE_WORKER`: set on worker children; a process carrying
//!   it never starts worker processes itself
//!
//! # Worker Processes
//!
//! The process engine starts the current executable only when the host has
//! called [`engine::enable_current_exe_workers`] and routes
//! [`engine::WORKER_FLAG`] to [`engine::serve_worker`]. Other hosts either
//! pass a worker program explicitly or fall back to the thread pool.
//!
//! # Example
//!
//! ```rust,no_run
//! use victimator::{AuditConfig, Auditor, SubjectProfile};
//!
//! let mut profile = SubjectProfile::new("River Stone");
//! profile.birth_year = Some(1990);
//!
//! let auditor = Auditor::new(AuditConfig::default())?;
//! let outcome = auditor.run(&profile, &[])?;
//!
//! println!("weak: {}", outcome.summary.weak_count);
//! # Ok::<(), victimator::AuditError>(())
//! ```

pub mod advisor;
pub mod audit;
pub mod blacklist;
pub mod config;
pub mod engine;
pub mod evaluator;
pub mod generator;
pub mod healthcheck;
pub mod logging;
pub mod model;
pub mod profile;
pub mod report;
mod sections;
pub mod tokens;

pub use audit::{load_password_list, AuditError, AuditOutcome, Auditor, Wordlists};
pub use blacklist::{BlacklistError, CommonPasswords};
pub use config::{AuditConfig, ConfigError};
pub use engine::{Dispatched, EngineCoordinator, EngineError, EngineMode, ResolvedMode, Task};
pub use evaluator::{assess_password, AssessmentContext};
pub use generator::{generate_candidates, CandidateLimits};
pub use logging::{LogSink, TracingSink};
pub use model::{Classification, PasswordAssessment, RunSummary};
pub use profile::SubjectProfile;
pub use tokens::{normalize_tokens, SubjectTokens};

pub const APP_NAME: &str = "Victimator";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ETHICAL_NOTICE: &str = "Victimator is for defensive security auditing only. \
Use it only on accounts you own or systems you are explicitly authorized to test.";
