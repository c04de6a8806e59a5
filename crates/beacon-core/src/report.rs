//! Report aggregation: collects check results into the final report.
//!
//! The aggregation rules are fixed:
//! 1. Every executed check has exactly one outcome
//! 2. A broken workflow ends the run; no later check is recorded
//! 3. The run fails iff any check is in the failed bucket

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::outcome::{CheckKind, CheckResult, Outcome, OutcomeKind, Warning, WorkflowBroken};

/// The in-memory result of one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Results in execution order.
    pub checks: Vec<CheckResult>,

    /// Set when the workflow check broke and the run stopped early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<WorkflowBroken>,
}

impl ValidationReport {
    /// Check names grouped by outcome bucket.
    pub fn buckets(&self) -> BTreeMap<OutcomeKind, Vec<CheckKind>> {
        let mut buckets: BTreeMap<OutcomeKind, Vec<CheckKind>> = BTreeMap::new();
        for result in &self.checks {
            buckets.entry(result.outcome.kind()).or_default().push(result.check);
        }
        buckets
    }

    pub fn get(&self, check: CheckKind) -> Option<&CheckResult> {
        self.checks.iter().find(|r| r.check == check)
    }

    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.checks.iter().filter(|r| r.outcome.kind() == kind).count()
    }

    pub fn has_failures(&self) -> bool {
        self.count(OutcomeKind::Failed) > 0
    }

    /// Process exit status: 1 when anything failed, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }

    /// One line per check, for logs.
    pub fn summary_lines(&self) -> Vec<String> {
        self.checks
            .iter()
            .map(|r| {
                format!(
                    "{}: {:?} - {}",
                    r.check,
                    r.outcome.kind(),
                    r.outcome.explanation()
                )
            })
            .collect()
    }
}

/// Accumulates results in run order and stamps the run window.
pub struct ReportBuilder {
    started_at: DateTime<Utc>,
    checks: Vec<CheckResult>,
    aborted: Option<WorkflowBroken>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            checks: Vec::new(),
            aborted: None,
        }
    }

    /// Record a check result.
    ///
    /// A second result for the same check replaces the first; each check
    /// has exactly one outcome in the report.
    pub fn record(&mut self, result: CheckResult) {
        if self.is_aborted() {
            tracing::warn!(check = %result.check, "Run already aborted, dropping result");
            return;
        }

        if let Some(existing) = self.checks.iter_mut().find(|r| r.check == result.check) {
            *existing = result;
        } else {
            self.checks.push(result);
        }
    }

    /// Record the fatal workflow failure. Nothing recorded afterwards is kept.
    pub fn abort(&mut self, cause: WorkflowBroken, warnings: Vec<Warning>) {
        self.record(
            CheckResult::new(CheckKind::Workflow, Outcome::Aborted { cause: cause.clone() })
                .with_warnings(warnings),
        );
        self.aborted = Some(cause);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    pub fn finish(self) -> ValidationReport {
        ValidationReport {
            started_at: self.started_at,
            finished_at: Utc::now(),
            checks: self.checks,
            aborted: self.aborted,
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
