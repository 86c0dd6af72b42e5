//! On-disk outputs of a run.
//!
//! ```text
//! <root>/logs/
//! <root>/wordlists/<slug>/{weak,medium,strong,full}.txt
//! <root>/reports/<slug>/{summary.json,password-audit.json,report.txt}
//! ```

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::audit::Wordlists;
use crate::model::{PasswordAssessment, RunSummary};
use crate::{APP_NAME, VERSION};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_file(path: PathBuf, contents: &str) -> Result<PathBuf, ReportError> {
    fs::write(&path, contents).map_err(io_error(&path))?;
    Ok(path)
}

/// Directories for one subject under an output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub logs_dir: PathBuf,
    pub wordlists_dir: PathBuf,
    pub reports_dir: PathBuf,
}

impl OutputPaths {
    pub fn new(output_root: &Path, subject_slug: &str) -> Self {
        Self {
            logs_dir: output_root.join("logs"),
            wordlists_dir: output_root.join("wordlists").join(subject_slug),
            reports_dir: output_root.join("reports").join(subject_slug),
        }
    }

    /// Creates every directory, including missing parents.
    pub fn create(&self) -> Result<(), ReportError> {
        for dir in [&self.logs_dir, &self.wordlists_dir, &self.reports_dir] {
            fs::create_dir_all(dir).map_err(io_error(dir))?;
        }
        Ok(())
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir.join("victimator.log")
    }
}

/// Writes one `<category>.txt` per wordlist, newline-joined, no trailing newline.
pub fn write_wordlists(dir: &Path, wordlists: &Wordlists) -> Result<Vec<PathBuf>, ReportError> {
    wordlists
        .categories()
        .into_iter()
        .map(|(category, entries)| write_file(dir.join(format!("{category}.txt")), &entries.join("\n")))
        .collect()
}

fn write_json<T: Serialize + ?Sized>(path: PathBuf, value: &T) -> Result<PathBuf, ReportError> {
    let body = serde_json::to_string_pretty(value)?;
    write_file(path, &body)
}

pub fn write_run_summary(dir: &Path, summary: &RunSummary) -> Result<PathBuf, ReportError> {
    write_json(dir.join("summary.json"), summary)
}

pub fn write_password_audit(dir: &Path, assessments: &[PasswordAssessment]) -> Result<PathBuf, ReportError> {
    write_json(dir.join("password-audit.json"), assessments)
}

/// Contents of the human-readable `report.txt`.
#[derive(Debug, Clone, Copy)]
pub struct QuickReport<'a> {
    pub summary: &'a RunSummary,
    pub weak_examples: &'a [String],
    pub passphrases: &'a [String],
    pub guidance: &'a [String],
}

impl QuickReport<'_> {
    pub fn render(&self) -> String {
        let title = format!("{APP_NAME} Defensive Audit Report");
        let summary = self.summary;
        let rule = "=".repeat(title.len());
        let mut lines = vec![
            title,
            rule,
            format!("Version: {VERSION}"),
            format!("Subject: {}", summary.subject_name),
            format!("Generated candidates: {}", summary.generated_candidates),
            format!("Weak: {}", summary.weak_count),
            format!("Medium: {}", summary.medium_count),
            format!("Strong: {}", summary.strong_count),
            format!("Engine: {} ({} workers)", summary.engine_mode, summary.workers),
        ];

        for (heading, items) in [
            ("Top weak examples:", self.weak_examples),
            ("Suggested passphrases:", self.passphrases),
            ("Guidance:", self.guidance),
        ] {
            lines.push(String::new());
            lines.push(heading.to_string());
            lines.extend(items.iter().map(|item| format!("- {item}")));
        }
        lines.join("\n")
    }

    pub fn write(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        write_file(dir.join("report.txt"), &self.render())
    }
}
