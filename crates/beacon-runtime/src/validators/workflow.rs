//! Basic workflow check.
//!
//! Walks concept → details → statements → evidence → exact matches, feeding
//! each step's identifiers into the next. Concepts and statements are
//! load-bearing: without them no seed context exists and the run stops.
//! The other steps only add warnings.

use beacon_core::{
    is_curie, CheckKind, CheckResult, ConceptQuery, EvidenceQuery, GatewayError, SeedContext,
    StatementQuery, SuiteConfig, Warning, WorkflowBroken, WorkflowStep,
};

use crate::gateway::QueryGateway;

/// A completed workflow: the seeds for later checks plus the check result.
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    pub seeds: SeedContext,
    pub result: CheckResult,
}

/// A broken workflow, with whatever warnings were collected before it broke.
#[derive(Debug, Clone)]
pub struct WorkflowAbort {
    pub cause: WorkflowBroken,
    pub warnings: Vec<Warning>,
}

/// Drives the five workflow queries in order.
#[derive(Debug, Clone)]
pub struct WorkflowValidator {
    keywords: String,
    page_size: u32,
    statement_keywords: Option<String>,
    evidence_keywords: Option<String>,
}

impl WorkflowValidator {
    pub fn new(suite: &SuiteConfig) -> Self {
        Self {
            keywords: suite.keywords.clone(),
            page_size: suite.workflow_page_size,
            statement_keywords: suite.statement_keywords.clone(),
            evidence_keywords: suite.evidence_keywords.clone(),
        }
    }

    pub async fn run(&self, gateway: &dyn QueryGateway) -> Result<WorkflowOutcome, WorkflowAbort> {
        tracing::info!(gateway = gateway.name(), "Testing basic workflow");
        let mut warnings = Vec::new();

        // 1. Seed concept
        let query = ConceptQuery::new(self.keywords.clone()).page(1, self.page_size);
        let concepts = match gateway.list_concepts(&query).await {
            Ok(concepts) => concepts,
            Err(e) => {
                step_failed(WorkflowStep::Concepts, e, &mut warnings)?;
                Vec::new()
            }
        };
        let Some(concept) = concepts.first() else {
            return Err(abort(WorkflowStep::Concepts, None, &mut warnings));
        };
        let concept_id = concept.id.clone();
        tracing::info!(concept_id = %concept_id, "Seed concept selected");

        if !is_curie(&concept_id) {
            tracing::warn!(concept_id = %concept_id, "Seed concept id is not a CURIE");
            warnings.push(Warning::NonCurieIdentifier {
                id: concept_id.clone(),
            });
        }

        // 2. Details (informational)
        match gateway.get_concept_details(&concept_id).await {
            Ok(details) if details.is_empty() => {
                tracing::warn!(concept_id = %concept_id, "No details returned for seed concept");
                warnings.push(Warning::NoDetails {
                    concept_id: concept_id.clone(),
                });
            }
            Ok(details) => {
                tracing::debug!(concept_id = %concept_id, count = details.len(), "Concept details returned");
            }
            Err(e) => step_failed(WorkflowStep::ConceptDetails, e, &mut warnings)?,
        }

        // 3. Seed statement
        let query = StatementQuery::new(vec![concept_id.clone()])
            .keywords(self.statement_keywords.clone())
            .page(1, self.page_size);
        let statements = match gateway.list_statements(&query).await {
            Ok(statements) => statements,
            Err(e) => {
                step_failed(WorkflowStep::Statements, e, &mut warnings)?;
                Vec::new()
            }
        };
        let Some(statement) = statements.first() else {
            return Err(abort(WorkflowStep::Statements, None, &mut warnings));
        };
        let seeds = SeedContext::new(concept_id, statement.id.clone());
        tracing::info!(statement_id = %seeds.statement_id, "Seed statement selected");

        // 4. Evidence (informational)
        let query = EvidenceQuery::new(seeds.statement_id.clone())
            .keywords(self.evidence_keywords.clone())
            .page(1, self.page_size);
        let evidence = match gateway.list_evidence(&query).await {
            Ok(evidence) => {
                if evidence.is_empty() {
                    tracing::warn!(statement_id = %seeds.statement_id, "No evidence returned for seed statement");
                    warnings.push(Warning::NoEvidence {
                        statement_id: seeds.statement_id.clone(),
                    });
                }
                evidence.len()
            }
            Err(e) => {
                step_failed(WorkflowStep::Evidence, e, &mut warnings)?;
                0
            }
        };

        // 5. Exact matches (an empty set is a valid answer)
        let exact_matches = match gateway.list_exact_matches(&seeds.concept_id).await {
            Ok(matches) => {
                tracing::debug!(concept_id = %seeds.concept_id, count = matches.len(), "Exact matches returned");
                matches.len()
            }
            Err(e) => {
                step_failed(WorkflowStep::ExactMatches, e, &mut warnings)?;
                0
            }
        };

        let summary = format!(
            "concept {} -> statement {} ({} evidence, {} exact matches)",
            seeds.concept_id, seeds.statement_id, evidence, exact_matches
        );
        tracing::info!(summary = %summary, "Basic workflow complete");

        Ok(WorkflowOutcome {
            result: CheckResult::passed(CheckKind::Workflow, summary).with_warnings(warnings),
            seeds,
        })
    }
}

fn abort(step: WorkflowStep, error: Option<GatewayError>, warnings: &mut Vec<Warning>) -> WorkflowAbort {
    let cause = match error {
        Some(error) => WorkflowBroken::transport(step, error),
        None => WorkflowBroken::empty(step),
    };
    tracing::error!(step = %step, cause = %cause, "Basic workflow broken");
    WorkflowAbort {
        cause,
        warnings: std::mem::take(warnings),
    }
}

/// A failed query breaks the workflow at a load-bearing step and is only a
/// warning anywhere else.
fn step_failed(
    step: WorkflowStep,
    error: GatewayError,
    warnings: &mut Vec<Warning>,
) -> Result<(), WorkflowAbort> {
    if step.is_load_bearing() {
        return Err(abort(step, Some(error), warnings));
    }
    tracing::warn!(step = %step, query = %error.query, error = %error.kind, "Workflow step failed, continuing");
    warnings.push(Warning::from(error));
    Ok(())
}
