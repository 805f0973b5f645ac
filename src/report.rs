//! Data structures for case outcomes and the suite report

use crate::error::HarnessError;
use crate::harness::Category;
use crate::util::ui;
use serde::Serialize;
use std::path::PathBuf;

/// Result of one case
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Skipped { reason: String },
    Failed(CaseFailure),
}

impl Outcome {
    pub fn skipped(reason: &str) -> Self {
        Outcome::Skipped {
            reason: reason.to_string(),
        }
    }

    pub fn invalid(reason: &str) -> Self {
        Outcome::Failed(CaseFailure {
            kind: FailureKind::InvalidCase,
            message: reason.to_string(),
            details: None,
        })
    }
}

/// Why a case failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseFailure {
    pub kind: FailureKind,
    pub message: String,
    /// Tool diagnostics or the rendered diff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A tool exited non-zero, printed garbage, or could not be started
    Execution,
    Network,
    Mismatch,
    InvalidCase,
    Cancelled,
}

impl From<HarnessError> for CaseFailure {
    fn from(err: HarnessError) -> Self {
        let kind = match &err {
            HarnessError::Execution { .. }
            | HarnessError::InvalidOutput { .. }
            | HarnessError::Io { .. } => FailureKind::Execution,
            HarnessError::Network { .. } => FailureKind::Network,
            HarnessError::Cancelled => FailureKind::Cancelled,
            HarnessError::FixtureParse { .. } | HarnessError::InvalidFixture { .. } => {
                FailureKind::InvalidCase
            }
        };

        CaseFailure {
            kind,
            message: err.to_string(),
            details: err.tool_stderr().map(str::to_string),
        }
    }
}

/// One reported case
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub category: Category,
    pub name: String,
    pub outcome: Outcome,
}

/// Everything a suite run produced
#[derive(Debug, Default, Serialize)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
    /// Interrupted before every case ran
    pub cancelled: bool,
    /// Set when the build store was kept on disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kept_store: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteReport {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for case in &self.cases {
            match case.outcome {
                Outcome::Passed => summary.passed += 1,
                Outcome::Skipped { .. } => summary.skipped += 1,
                Outcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn success(&self) -> bool {
        !self.cancelled && self.summary().failed == 0
    }
}

/// Print one case line, with diagnostics for failures
pub fn print_case(case: &CaseReport) {
    let label = format!("{}/{}", case.category, case.name);
    match &case.outcome {
        Outcome::Passed => ui::success(&label),
        Outcome::Skipped { reason } => ui::skip(&format!("{} (skipped: {})", label, reason)),
        Outcome::Failed(failure) => {
            ui::failure(&format!("{}: {}", label, failure.message));
            if let Some(details) = &failure.details {
                ui::diagnostic("details", details);
            }
        }
    }
}

pub fn print_summary(report: &SuiteReport) {
    let summary = report.summary();
    println!();
    ui::info(&format!(
        "{} passed, {} failed, {} skipped",
        summary.passed, summary.failed, summary.skipped
    ));
    if report.cancelled {
        ui::warn("Run interrupted; remaining cases were not run");
    }
    if let Some(store) = &report.kept_store {
        ui::dim(&format!("Build store kept at {}", store.display()));
    }
}
