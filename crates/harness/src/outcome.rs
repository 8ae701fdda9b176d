//! Case and run results

use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    /// `fatal` means shared fixtures may be left mutated and the run stops.
    Failed { message: String, fatal: bool },
    Skipped { reason: String },
}

impl CaseOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CaseOutcome::Failed { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, CaseOutcome::Failed { fatal: true, .. })
    }
}

impl fmt::Display for CaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseOutcome::Passed => write!(f, "ok"),
            CaseOutcome::Failed { message, .. } => write!(f, "FAILED: {}", message),
            CaseOutcome::Skipped { reason } => write!(f, "skipped: {}", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaseReport {
    pub suite: &'static str,
    pub case: &'static str,
    pub outcome: CaseOutcome,
    pub elapsed: Duration,
}

impl CaseReport {
    /// `suite::case`
    pub fn id(&self) -> String {
        format!("{}::{}", self.suite, self.case)
    }
}

#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub reports: Vec<CaseReport>,
    /// Set when failfast or a fatal cleanup failure stopped the run early
    pub aborted: bool,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(CaseOutcome::is_failure)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Skipped { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.reports.iter().filter(|r| r.outcome.is_failure())
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ran {} cases: {} passed, {} failed, {} skipped",
            self.reports.len(),
            self.passed(),
            self.failed(),
            self.skipped()
        )?;
        if self.aborted {
            write!(f, " (aborted)")?;
        }
        Ok(())
    }
}
