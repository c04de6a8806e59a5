//! Semantic group filter checks.
//!
//! Each configured group is an independent probe: query with the group as a
//! filter and inspect what comes back. One group failing or erroring never
//! stops the probes for the others; [`FilterTally`] decides the outcome once
//! every group has been tried.

use beacon_core::{
    first_concept_violation, linked_concept_violation, CheckKind, CheckResult, ConceptQuery,
    FilterTally, ProbeResult, SeedContext, SemanticGroup, StatementQuery, SuiteConfig,
};

use crate::gateway::QueryGateway;

/// Probes concept and statement queries with each semantic group filter.
#[derive(Debug, Clone)]
pub struct SemanticFilterValidator {
    keywords: String,
    page_size: u32,
    groups: Vec<SemanticGroup>,
    statement_keywords: Option<String>,
}

impl SemanticFilterValidator {
    pub fn new(suite: &SuiteConfig) -> Self {
        Self {
            keywords: suite.keywords.clone(),
            page_size: suite.page_size,
            groups: suite.semantic_groups.clone(),
            statement_keywords: suite.statement_keywords.clone(),
        }
    }

    /// Every concept returned under a group filter must carry that group.
    pub async fn check_concepts(&self, gateway: &dyn QueryGateway) -> CheckResult {
        let check = CheckKind::ConceptSemanticFilter;
        tracing::info!(groups = self.groups.len(), "Testing concept semantic filters");

        let mut tally = FilterTally::new(check);
        for group in &self.groups {
            tally.record(self.probe_concepts(gateway, *group).await);
        }
        tally.finish()
    }

    /// The endpoint of each statement that is not the seed must carry the
    /// group the statements were filtered by.
    pub async fn check_statements(
        &self,
        gateway: &dyn QueryGateway,
        seeds: &SeedContext,
    ) -> CheckResult {
        let check = CheckKind::StatementSemanticFilter;
        tracing::info!(
            groups = self.groups.len(),
            concept_id = %seeds.concept_id,
            "Testing statement semantic filters"
        );

        let mut tally = FilterTally::new(check);
        for group in &self.groups {
            tally.record(self.probe_statements(gateway, seeds, *group).await);
        }
        tally.finish()
    }

    async fn probe_concepts(&self, gateway: &dyn QueryGateway, group: SemanticGroup) -> ProbeResult {
        let query = ConceptQuery::new(self.keywords.clone())
            .semantic_group(group.as_str())
            .page(1, self.page_size);

        let concepts = match gateway.list_concepts(&query).await {
            Ok(concepts) => concepts,
            Err(e) => {
                tracing::warn!(group = %group, query = %e.query, error = %e.kind, "Concept filter query failed");
                return ProbeResult::Errored(e);
            }
        };

        match first_concept_violation(group, &concepts) {
            Some(violation) => {
                tracing::error!(group = %group, violation = %violation, "Concept filter returned wrong group");
                ProbeResult::Violated(violation)
            }
            None => {
                tracing::debug!(group = %group, records = concepts.len(), "Concept filter sound");
                ProbeResult::Clean {
                    records: concepts.len(),
                }
            }
        }
    }

    async fn probe_statements(
        &self,
        gateway: &dyn QueryGateway,
        seeds: &SeedContext,
        group: SemanticGroup,
    ) -> ProbeResult {
        let query = StatementQuery::new(seeds.concept_ids.clone())
            .keywords(self.statement_keywords.clone())
            .semantic_group(group.as_str())
            .page(1, self.page_size);

        let statements = match gateway.list_statements(&query).await {
            Ok(statements) => statements,
            Err(e) => {
                tracing::warn!(group = %group, query = %e.query, error = %e.kind, "Statement filter query failed");
                return ProbeResult::Errored(e);
            }
        };

        for statement in &statements {
            let other = statement.other_endpoint(&seeds.concept_ids);
            let details = match gateway.get_concept_details(&other.id).await {
                Ok(details) => details,
                Err(e) => {
                    tracing::warn!(
                        group = %group,
                        statement_id = %statement.id,
                        concept_id = %other.id,
                        error = %e.kind,
                        "Linked concept lookup failed"
                    );
                    return ProbeResult::Errored(e);
                }
            };

            if let Some(violation) = linked_concept_violation(group, seeds, statement, &details) {
                tracing::error!(group = %group, violation = %violation, "Statement filter returned wrong group");
                return ProbeResult::Violated(violation);
            }
        }

        tracing::debug!(group = %group, records = statements.len(), "Statement filter sound");
        ProbeResult::Clean {
            records: statements.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{FixtureData, FixtureGateway};
    use async_trait::async_trait;
    use beacon_core::{
        Concept, ConceptDetails, Evidence, EvidenceQuery, ExactMatchSet, GatewayError, Outcome,
        OutcomeKind, Query, Statement, Violation,
    };

    /// Fixture gateway with one deliberate defect switched on.
    struct DefectiveGateway {
        inner: FixtureGateway,
        relabel_details: Option<&'static str>,
        ignore_statement_filter: bool,
        failing_group: Option<&'static str>,
    }

    impl DefectiveGateway {
        fn new(data: FixtureData) -> Self {
            Self {
                inner: FixtureGateway::new(data),
                relabel_details: None,
                ignore_statement_filter: false,
                failing_group: None,
            }
        }
    }

    #[async_trait]
    impl QueryGateway for DefectiveGateway {
        async fn list_concepts(&self, query: &ConceptQuery) -> Result<Vec<Concept>, GatewayError> {
            if query.semantic_group.is_some() && query.semantic_group.as_deref() == self.failing_group {
                return Err(GatewayError::status(query.clone(), 500, "internal error"));
            }
            self.inner.list_concepts(query).await
        }

        async fn get_concept_details(
            &self,
            concept_id: &str,
        ) -> Result<Vec<ConceptDetails>, GatewayError> {
            let mut details = self.inner.get_concept_details(concept_id).await?;
            if let Some(group) = self.relabel_details {
                for record in &mut details {
                    record.semantic_group = group.to_string();
                }
            }
            Ok(details)
        }

        async fn list_statements(
            &self,
            query: &StatementQuery,
        ) -> Result<Vec<Statement>, GatewayError> {
            let mut query = query.clone();
            if self.ignore_statement_filter {
                query.semantic_group = None;
            }
            self.inner.list_statements(&query).await
        }

        async fn list_evidence(&self, query: &EvidenceQuery) -> Result<Vec<Evidence>, GatewayError> {
            self.inner.list_evidence(query).await
        }

        async fn list_exact_matches(&self, concept_id: &str) -> Result<ExactMatchSet, GatewayError> {
            self.inner.list_exact_matches(concept_id).await
        }

        fn name(&self) -> &str {
            "defective"
        }
    }

    fn suite(groups: Vec<SemanticGroup>) -> SuiteConfig {
        SuiteConfig {
            semantic_groups: groups,
            ..SuiteConfig::default()
        }
    }

    fn concept(id: &str, name: &str, group: &str) -> ConceptDetails {
        let mut concept = ConceptDetails::new(id, group);
        concept.name = Some(name.to_string());
        concept
    }

    fn linked_data() -> FixtureData {
        FixtureData {
            concepts: vec![
                concept("SEED:1", "seed", "GENE"),
                concept("CHEBI:1", "thing", "CHEM"),
            ],
            statements: vec![Statement::new("s1", "SEED:1", "CHEBI:1")],
            ..FixtureData::default()
        }
    }

    #[tokio::test]
    async fn test_sound_concept_filters_pass() {
        let gateway = FixtureGateway::new(FixtureData {
            concepts: vec![
                concept("NCBIGene:1", "kinase gene", "GENE"),
                concept("DOID:1", "some disease", "DISO"),
            ],
            ..FixtureData::default()
        });
        let validator =
            SemanticFilterValidator::new(&suite(vec![SemanticGroup::Genes, SemanticGroup::Disorders]));

        let result = validator.check_concepts(&gateway).await;
        assert!(result.outcome.is_pass(), "{}", result.outcome.explanation());
    }

    #[tokio::test]
    async fn test_one_query_per_group_in_order() {
        let gateway = FixtureGateway::new(FixtureData::default());
        let groups = vec![SemanticGroup::Chemicals, SemanticGroup::Anatomy];
        SemanticFilterValidator::new(&suite(groups))
            .check_concepts(&gateway)
            .await;

        let filters: Vec<Option<String>> = gateway
            .calls()
            .into_iter()
            .map(|call| match call {
                Query::ListConcepts(q) => q.semantic_group,
                other => panic!("Unexpected call {:?}", other),
            })
            .collect();
        assert_eq!(filters, vec![Some("CHEM".to_string()), Some("ANAT".to_string())]);
    }

    #[tokio::test]
    async fn test_nothing_returned_is_skipped() {
        let gateway = FixtureGateway::new(FixtureData::default());
        let result = SemanticFilterValidator::new(&SuiteConfig::default())
            .check_concepts(&gateway)
            .await;
        assert_eq!(result.outcome.kind(), OutcomeKind::Skipped);
    }

    #[tokio::test]
    async fn test_sound_statement_filter_passes() {
        let gateway = FixtureGateway::new(linked_data());
        let seeds = SeedContext::new("SEED:1", "s1");

        let result = SemanticFilterValidator::new(&suite(vec![SemanticGroup::Chemicals]))
            .check_statements(&gateway, &seeds)
            .await;
        assert!(result.outcome.is_pass(), "{}", result.outcome.explanation());
    }

    #[tokio::test]
    async fn test_statement_mismatch_reports_linked_concept() {
        let gateway = DefectiveGateway {
            relabel_details: Some("DISO"),
            ..DefectiveGateway::new(linked_data())
        };
        let seeds = SeedContext::new("SEED:1", "s1");

        let result = SemanticFilterValidator::new(&suite(vec![SemanticGroup::Chemicals]))
            .check_statements(&gateway, &seeds)
            .await;
        match result.outcome {
            Outcome::Failed { violations } => match &violations[0] {
                Violation::StatementGroupMismatch {
                    statement_id,
                    concept_id,
                    actual,
                    ..
                } => {
                    assert_eq!(statement_id, "s1");
                    assert_eq!(concept_id, "CHEBI:1");
                    assert_eq!(actual, "DISO");
                }
                other => panic!("Expected StatementGroupMismatch, got {:?}", other),
            },
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unresolvable_linked_concept_is_violation() {
        let gateway = DefectiveGateway {
            ignore_statement_filter: true,
            ..DefectiveGateway::new(FixtureData {
                concepts: vec![concept("SEED:1", "seed", "GENE")],
                statements: vec![Statement::new("s1", "_:b0", "SEED:1")],
                ..FixtureData::default()
            })
        };
        let seeds = SeedContext::new("SEED:1", "s1");

        let result = SemanticFilterValidator::new(&suite(vec![SemanticGroup::Genes]))
            .check_statements(&gateway, &seeds)
            .await;
        match result.outcome {
            Outcome::Failed { violations } => {
                assert!(matches!(
                    &violations[0],
                    Violation::NoDetailsForLinkedConcept { concept_id, .. } if concept_id == "_:b0"
                ));
            }
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    fn details_lookups(gateway: &FixtureGateway) -> Vec<String> {
        gateway
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Query::ConceptDetails { concept_id } => Some(concept_id),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_statement_scan_stops_at_first_mismatch() {
        let gateway = DefectiveGateway {
            relabel_details: Some("DISO"),
            ..DefectiveGateway::new(FixtureData {
                concepts: vec![
                    concept("SEED:1", "seed", "GENE"),
                    concept("CHEBI:1", "first", "CHEM"),
                    concept("CHEBI:2", "second", "CHEM"),
                ],
                statements: vec![
                    Statement::new("s1", "SEED:1", "CHEBI:1"),
                    Statement::new("s2", "SEED:1", "CHEBI:2"),
                ],
                ..FixtureData::default()
            })
        };
        let seeds = SeedContext::new("SEED:1", "s1");

        let result = SemanticFilterValidator::new(&suite(vec![SemanticGroup::Chemicals]))
            .check_statements(&gateway, &seeds)
            .await;

        match result.outcome {
            Outcome::Failed { violations } => {
                assert_eq!(violations.len(), 1);
                assert!(matches!(
                    &violations[0],
                    Violation::StatementGroupMismatch { statement_id, .. } if statement_id == "s1"
                ));
            }
            other => panic!("Expected failure, got {:?}", other),
        }
        assert_eq!(details_lookups(&gateway.inner), vec!["CHEBI:1".to_string()]);
    }

    #[tokio::test]
    async fn test_statement_scan_stops_at_first_unresolvable_concept() {
        let gateway = DefectiveGateway {
            ignore_statement_filter: true,
            ..DefectiveGateway::new(FixtureData {
                concepts: vec![
                    concept("SEED:1", "seed", "GENE"),
                    concept("NCBIGene:2", "other gene", "GENE"),
                ],
                statements: vec![
                    Statement::new("s1", "SEED:1", "_:b0"),
                    Statement::new("s2", "SEED:1", "NCBIGene:2"),
                ],
                ..FixtureData::default()
            })
        };
        let seeds = SeedContext::new("SEED:1", "s1");

        let result = SemanticFilterValidator::new(&suite(vec![SemanticGroup::Genes]))
            .check_statements(&gateway, &seeds)
            .await;

        assert_eq!(result.outcome.kind(), OutcomeKind::Failed);
        assert_eq!(details_lookups(&gateway.inner), vec!["_:b0".to_string()]);
    }

    #[tokio::test]
    async fn test_group_outage_does_not_stop_other_groups() {
        let gateway = DefectiveGateway {
            failing_group: Some("CHEM"),
            ..DefectiveGateway::new(FixtureData {
                concepts: vec![concept("NCBIGene:1", "gene", "GENE")],
                ..FixtureData::default()
            })
        };
        let result = SemanticFilterValidator::new(&suite(vec![
            SemanticGroup::Chemicals,
            SemanticGroup::Genes,
        ]))
        .check_concepts(&gateway)
        .await;

        assert_eq!(result.outcome.kind(), OutcomeKind::Errored);
        assert_eq!(gateway.inner.calls().len(), 1);
    }
}
