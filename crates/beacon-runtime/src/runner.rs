//! Validation runner.
//!
//! Runs the suite in a fixed order against one gateway:
//! 1. Basic workflow (produces the seed context)
//! 2. Paging for concepts, statements and evidence
//! 3. Semantic filters for concepts and statements
//!
//! Checks run strictly one after another. A broken workflow ends the run;
//! every other failure is recorded and the next check starts.

use futures::FutureExt;
use std::sync::Arc;

use beacon_core::{
    CheckKind, CheckResult, ConceptQuery, EvidenceQuery, OutcomeKind, ReportBuilder, SeedContext,
    StatementQuery, SuiteConfig, ValidationReport,
};

use crate::config::{CacheConfig, RuntimeConfig};
use crate::gateway::{CachedGateway, QueryGateway};
use crate::validators::{PagingValidator, SemanticFilterValidator, WorkflowValidator};
use crate::RuntimeError;

/// Runs the conformance suite against a beacon.
pub struct ValidationRunner {
    gateway: Arc<dyn QueryGateway>,
    suite: SuiteConfig,
}

impl ValidationRunner {
    pub fn new(gateway: Arc<dyn QueryGateway>, suite: SuiteConfig) -> Self {
        Self { gateway, suite }
    }

    pub fn builder() -> ValidationRunnerBuilder {
        ValidationRunnerBuilder::new()
    }

    pub fn suite(&self) -> &SuiteConfig {
        &self.suite
    }

    /// Run every check and return the report.
    pub async fn run_all(&self) -> ValidationReport {
        let gateway = self.gateway.as_ref();
        let mut report = ReportBuilder::new();
        tracing::info!(gateway = gateway.name(), "Starting validation run");

        let seeds = match WorkflowValidator::new(&self.suite).run(gateway).await {
            Ok(outcome) => {
                log_result(&outcome.result);
                report.record(outcome.result);
                outcome.seeds
            }
            Err(abort) => {
                tracing::error!(cause = %abort.cause, "Aborting run, later checks need the workflow's seeds");
                report.abort(abort.cause, abort.warnings);
                return report.finish();
            }
        };

        for result in self.paging_checks(&seeds).await {
            log_result(&result);
            report.record(result);
        }

        let semantic = SemanticFilterValidator::new(&self.suite);
        let result = semantic.check_concepts(gateway).await;
        log_result(&result);
        report.record(result);

        let result = semantic.check_statements(gateway, &seeds).await;
        log_result(&result);
        report.record(result);

        let report = report.finish();
        tracing::info!(
            passed = report.count(OutcomeKind::Passed),
            failed = report.count(OutcomeKind::Failed),
            skipped = report.count(OutcomeKind::Skipped),
            errored = report.count(OutcomeKind::Errored),
            "Validation run complete"
        );
        report
    }

    async fn paging_checks(&self, seeds: &SeedContext) -> Vec<CheckResult> {
        let gateway = self.gateway.as_ref();
        let paging = PagingValidator::new(self.suite.page_size);
        let keywords = &self.suite.keywords;

        let concepts = paging
            .check(CheckKind::ConceptPaging, |page, size| {
                let query = ConceptQuery::new(keywords.clone()).page(page, size);
                async move { gateway.list_concepts(&query).await }.boxed()
            })
            .await;

        let statements = paging
            .check(CheckKind::StatementPaging, |page, size| {
                let query = StatementQuery::new(seeds.concept_ids.clone())
                    .keywords(self.suite.statement_keywords.clone())
                    .page(page, size);
                async move { gateway.list_statements(&query).await }.boxed()
            })
            .await;

        let evidence = paging
            .check(CheckKind::EvidencePaging, |page, size| {
                let query = EvidenceQuery::new(seeds.statement_id.clone())
                    .keywords(self.suite.evidence_keywords.clone())
                    .page(page, size);
                async move { gateway.list_evidence(&query).await }.boxed()
            })
            .await;

        vec![concepts, statements, evidence]
    }
}

fn log_result(result: &CheckResult) {
    for warning in &result.warnings {
        tracing::warn!(check = %result.check, warning = %warning, "Check warning");
    }

    match result.outcome.kind() {
        OutcomeKind::Passed => {
            tracing::info!(check = %result.check, "PASSED: {}", result.outcome.explanation())
        }
        OutcomeKind::Skipped => {
            tracing::info!(check = %result.check, "SKIPPED: {}", result.outcome.explanation())
        }
        OutcomeKind::Errored => {
            tracing::warn!(check = %result.check, "ERRORED: {}", result.outcome.explanation())
        }
        OutcomeKind::Failed => {
            tracing::error!(check = %result.check, "FAILED: {}", result.outcome.explanation())
        }
    }
}

/// Builder for ValidationRunner.
pub struct ValidationRunnerBuilder {
    gateway: Option<Arc<dyn QueryGateway>>,
    suite: SuiteConfig,
    cache: Option<CacheConfig>,
}

impl ValidationRunnerBuilder {
    pub fn new() -> Self {
        Self {
            gateway: None,
            suite: SuiteConfig::default(),
            cache: None,
        }
    }

    /// Set the gateway.
    pub fn gateway(mut self, gateway: Arc<dyn QueryGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the suite.
    pub fn suite(mut self, suite: SuiteConfig) -> Self {
        self.suite = suite;
        self
    }

    /// Wrap the gateway in a details cache.
    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Take suite and cache settings from a runtime config.
    pub fn config(self, config: &RuntimeConfig) -> Self {
        self.suite(config.suite.clone()).cache(config.cache.clone())
    }

    /// Build the runner.
    pub fn build(self) -> Result<ValidationRunner, RuntimeError> {
        let gateway = self
            .gateway
            .ok_or_else(|| RuntimeError::GatewayNotConfigured("No gateway set".to_string()))?;

        self.suite.validate()?;

        let gateway: Arc<dyn QueryGateway> = match self.cache {
            Some(cache) if cache.enabled => {
                tracing::debug!(max_entries = cache.max_entries, ttl = ?cache.ttl, "Caching concept details");
                Arc::new(CachedGateway::new(gateway, cache.max_entries, cache.ttl))
            }
            _ => gateway,
        };

        Ok(ValidationRunner::new(gateway, self.suite))
    }
}

impl Default for ValidationRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
