//! Check outcomes and the findings attached to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::query::GatewayError;
use crate::semantic::SemanticGroup;

/// The checks a validation run executes, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Workflow,
    ConceptPaging,
    StatementPaging,
    EvidencePaging,
    ConceptSemanticFilter,
    StatementSemanticFilter,
}

impl CheckKind {
    pub const ALL: [CheckKind; 6] = [
        CheckKind::Workflow,
        CheckKind::ConceptPaging,
        CheckKind::StatementPaging,
        CheckKind::EvidencePaging,
        CheckKind::ConceptSemanticFilter,
        CheckKind::StatementSemanticFilter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::Workflow => "workflow",
            CheckKind::ConceptPaging => "concept_paging",
            CheckKind::StatementPaging => "statement_paging",
            CheckKind::EvidencePaging => "evidence_paging",
            CheckKind::ConceptSemanticFilter => "concept_semantic_filter",
            CheckKind::StatementSemanticFilter => "statement_semantic_filter",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A response that broke an invariant, with the concrete values involved.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Violation {
    #[error("Page {page} index {index}: expected id {expected}, got {actual}")]
    PagingSliceMismatch {
        page: u32,
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("Page {page} index {index}: expected id {expected}, page ended early")]
    PagingRecordMissing {
        page: u32,
        index: usize,
        expected: String,
    },

    #[error("Half pages returned {actual} records in total, expected {expected}")]
    PagingCountMismatch { expected: usize, actual: usize },

    #[error("Concept {concept_id} has semantic group {actual} when filtering for {group}")]
    ConceptGroupMismatch {
        group: SemanticGroup,
        concept_id: String,
        actual: String,
    },

    #[error(
        "Statements for concept {seed_concept_id} filtered by {group} returned statement \
         {statement_id} linking concept {concept_id} of semantic group {actual}"
    )]
    StatementGroupMismatch {
        group: SemanticGroup,
        seed_concept_id: String,
        statement_id: String,
        concept_id: String,
        actual: String,
    },

    #[error("No concept details for concept {concept_id} linked by statement {statement_id} (filter {group})")]
    NoDetailsForLinkedConcept {
        group: SemanticGroup,
        statement_id: String,
        concept_id: String,
    },
}

/// Something worth reporting that does not change a check's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    NoDetails { concept_id: String },
    NoEvidence { statement_id: String },
    NonCurieIdentifier { id: String },
    Transport { error: GatewayError },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NoDetails { concept_id } => {
                write!(f, "No concept details returned for {}", concept_id)
            }
            Warning::NoEvidence { statement_id } => {
                write!(f, "No evidence returned for statement {}", statement_id)
            }
            Warning::NonCurieIdentifier { id } => {
                write!(f, "Identifier {} is not a CURIE", id)
            }
            Warning::Transport { error } => write!(f, "{}", error),
        }
    }
}

impl From<GatewayError> for Warning {
    fn from(error: GatewayError) -> Self {
        Warning::Transport { error }
    }
}

/// Steps of the basic workflow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    Concepts,
    ConceptDetails,
    Statements,
    Evidence,
    ExactMatches,
}

impl WorkflowStep {
    /// Later steps depend on the output of load-bearing steps.
    pub fn is_load_bearing(&self) -> bool {
        matches!(self, WorkflowStep::Concepts | WorkflowStep::Statements)
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStep::Concepts => "concepts",
            WorkflowStep::ConceptDetails => "concept details",
            WorkflowStep::Statements => "statements",
            WorkflowStep::Evidence => "evidence",
            WorkflowStep::ExactMatches => "exact matches",
        };
        f.write_str(name)
    }
}

/// Why a load-bearing workflow step produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrokenCause {
    Empty,
    Transport { error: GatewayError },
}

/// Fatal: the run cannot continue without this step's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowBroken {
    pub step: WorkflowStep,
    pub cause: BrokenCause,
}

impl WorkflowBroken {
    pub fn empty(step: WorkflowStep) -> Self {
        Self {
            step,
            cause: BrokenCause::Empty,
        }
    }

    pub fn transport(step: WorkflowStep, error: GatewayError) -> Self {
        Self {
            step,
            cause: BrokenCause::Transport { error },
        }
    }
}

impl fmt::Display for WorkflowBroken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            BrokenCause::Empty => write!(f, "Workflow broken: no {} returned", self.step),
            BrokenCause::Transport { error } => {
                write!(f, "Workflow broken at {} step: {}", self.step, error)
            }
        }
    }
}

impl std::error::Error for WorkflowBroken {}

/// Result bucket a check lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Passed,
    Failed,
    Skipped,
    Errored,
}

/// Exactly one per check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Passed { summary: String },
    Failed { violations: Vec<Violation> },
    /// Not enough data to exercise the check. Not a failure.
    Skipped { reason: String },
    Errored { errors: Vec<GatewayError> },
    /// The workflow check broke and the run stopped.
    Aborted { cause: WorkflowBroken },
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Passed { .. } => OutcomeKind::Passed,
            Outcome::Failed { .. } | Outcome::Aborted { .. } => OutcomeKind::Failed,
            Outcome::Skipped { .. } => OutcomeKind::Skipped,
            Outcome::Errored { .. } => OutcomeKind::Errored,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Passed { .. })
    }

    /// Human-readable explanation with the concrete ids/values involved.
    pub fn explanation(&self) -> String {
        match self {
            Outcome::Passed { summary } => summary.clone(),
            Outcome::Failed { violations } => violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; "),
            Outcome::Skipped { reason } => reason.clone(),
            Outcome::Errored { errors } => errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
            Outcome::Aborted { cause } => cause.to_string(),
        }
    }
}

/// One check's result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: CheckKind,
    pub outcome: Outcome,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,

    pub evaluated_at: DateTime<Utc>,
}

impl CheckResult {
    pub fn new(check: CheckKind, outcome: Outcome) -> Self {
        Self {
            check,
            outcome,
            warnings: Vec::new(),
            evaluated_at: Utc::now(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<Warning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn passed(check: CheckKind, summary: impl Into<String>) -> Self {
        Self::new(check, Outcome::Passed { summary: summary.into() })
    }

    pub fn skipped(check: CheckKind, reason: impl Into<String>) -> Self {
        Self::new(check, Outcome::Skipped { reason: reason.into() })
    }

    pub fn failed(check: CheckKind, violations: Vec<Violation>) -> Self {
        Self::new(check, Outcome::Failed { violations })
    }

    pub fn errored(check: CheckKind, errors: Vec<GatewayError>) -> Self {
        Self::new(check, Outcome::Errored { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ConceptQuery;

    #[test]
    fn test_aborted_lands_in_failed_bucket() {
        let outcome = Outcome::Aborted {
            cause: WorkflowBroken::empty(WorkflowStep::Concepts),
        };
        assert_eq!(outcome.kind(), OutcomeKind::Failed);
    }

    #[test]
    fn test_workflow_broken_messages() {
        let empty = WorkflowBroken::empty(WorkflowStep::Statements);
        assert_eq!(empty.to_string(), "Workflow broken: no statements returned");

        let transport = WorkflowBroken::transport(
            WorkflowStep::Concepts,
            GatewayError::http(ConceptQuery::new("e"), "connection refused"),
        );
        let text = transport.to_string();
        assert!(text.contains("concepts step"));
        assert!(text.contains("connection refused"));
        assert!(text.contains("keywords=e"));
    }

    #[test]
    fn test_violation_explains_with_values() {
        let violation = Violation::ConceptGroupMismatch {
            group: SemanticGroup::Genes,
            concept_id: "DOID:162".to_string(),
            actual: "DISO".to_string(),
        };
        let outcome = Outcome::Failed {
            violations: vec![violation],
        };
        let text = outcome.explanation();
        assert!(text.contains("DOID:162"));
        assert!(text.contains("DISO"));
        assert!(text.contains("GENE"));
    }

    #[test]
    fn test_only_two_steps_are_load_bearing() {
        let load_bearing: Vec<_> = [
            WorkflowStep::Concepts,
            WorkflowStep::ConceptDetails,
            WorkflowStep::Statements,
            WorkflowStep::Evidence,
            WorkflowStep::ExactMatches,
        ]
        .into_iter()
        .filter(|s| s.is_load_bearing())
        .collect();

        assert_eq!(load_bearing, vec![WorkflowStep::Concepts, WorkflowStep::Statements]);
    }
}
