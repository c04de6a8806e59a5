//! Semantic filter soundness decisions.
//!
//! A filtered query must only return records of the requested group. For
//! concepts the group is on the record itself. For statements it is the
//! group of the endpoint that was *not* used to select the statement, which
//! the caller resolves with a second lookup and hands in here.

use crate::outcome::{CheckKind, CheckResult, Outcome, Violation, Warning};
use crate::query::GatewayError;
use crate::semantic::SemanticGroup;
use crate::types::{Concept, ConceptDetails, SeedContext, Statement};

/// First concept on the page whose group does not match the filter.
///
/// Scanning stops at the first violation; one is enough to show the filter
/// is broken for that group.
pub fn first_concept_violation(group: SemanticGroup, concepts: &[Concept]) -> Option<Violation> {
    concepts
        .iter()
        .find(|concept| !group.matches(&concept.semantic_group))
        .map(|concept| Violation::ConceptGroupMismatch {
            group,
            concept_id: concept.id.clone(),
            actual: concept.semantic_group.clone(),
        })
}

/// Judge one statement given the details resolved for its other endpoint.
///
/// Only the first details record is consulted. No details at all is its own
/// violation: the linked concept cannot be typed.
pub fn linked_concept_violation(
    group: SemanticGroup,
    seeds: &SeedContext,
    statement: &Statement,
    details: &[ConceptDetails],
) -> Option<Violation> {
    let other = statement.other_endpoint(&seeds.concept_ids);

    let Some(resolved) = details.first() else {
        return Some(Violation::NoDetailsForLinkedConcept {
            group,
            statement_id: statement.id.clone(),
            concept_id: other.id.clone(),
        });
    };

    if group.matches(&resolved.semantic_group) {
        None
    } else {
        Some(Violation::StatementGroupMismatch {
            group,
            seed_concept_id: seeds.concept_id.clone(),
            statement_id: statement.id.clone(),
            concept_id: resolved.id.clone(),
            actual: resolved.semantic_group.clone(),
        })
    }
}

/// How one group's probe ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// Every record inspected matched.
    Clean { records: usize },
    Violated(Violation),
    Errored(GatewayError),
}

/// Collects per-group probe results into a single check outcome.
///
/// Groups are independent probes: a failure in one never stops the others,
/// so the tally sees every group before deciding.
#[derive(Debug)]
pub struct FilterTally {
    check: CheckKind,
    groups: usize,
    records: usize,
    violations: Vec<Violation>,
    errors: Vec<GatewayError>,
}

impl FilterTally {
    pub fn new(check: CheckKind) -> Self {
        Self {
            check,
            groups: 0,
            records: 0,
            violations: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn record(&mut self, result: ProbeResult) {
        self.groups += 1;
        match result {
            ProbeResult::Clean { records } => self.records += records,
            ProbeResult::Violated(violation) => self.violations.push(violation),
            ProbeResult::Errored(error) => self.errors.push(error),
        }
    }

    /// Decide the outcome.
    ///
    /// 1. Any violation → failed (transport errors kept as warnings)
    /// 2. Else any transport error → errored
    /// 3. Else nothing inspected → skipped
    /// 4. Else → passed
    pub fn finish(self) -> CheckResult {
        if !self.violations.is_empty() {
            let warnings = self.errors.into_iter().map(Warning::from).collect();
            return CheckResult::new(
                self.check,
                Outcome::Failed {
                    violations: self.violations,
                },
            )
            .with_warnings(warnings);
        }

        if !self.errors.is_empty() {
            return CheckResult::errored(self.check, self.errors);
        }

        if self.records == 0 {
            return CheckResult::skipped(
                self.check,
                format!("no records returned for any of {} semantic groups", self.groups),
            );
        }

        CheckResult::passed(
            self.check,
            format!(
                "{} records across {} semantic groups matched their filter",
                self.records, self.groups
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::OutcomeKind;
    use crate::query::ConceptQuery;

    fn seeds() -> SeedContext {
        SeedContext::new("SEED:1", "s0")
    }

    #[test]
    fn test_matching_page_has_no_violation() {
        let concepts = vec![Concept::new("NCBIGene:1", "GENE"), Concept::new("NCBIGene:2", "gene")];
        assert_eq!(first_concept_violation(SemanticGroup::Genes, &concepts), None);
    }

    #[test]
    fn test_first_mismatch_is_reported_with_both_groups() {
        let concepts = vec![
            Concept::new("NCBIGene:1", "GENE"),
            Concept::new("DOID:162", "disease"),
            Concept::new("DOID:1612", "DISO"),
        ];
        let violation = first_concept_violation(SemanticGroup::Genes, &concepts).unwrap();
        assert_eq!(
            violation,
            Violation::ConceptGroupMismatch {
                group: SemanticGroup::Genes,
                concept_id: "DOID:162".to_string(),
                actual: "disease".to_string(),
            }
        );
    }

    #[test]
    fn test_linked_concept_uses_subject_when_seed_is_object() {
        let statement = Statement::new("s1", "CHEBI:1", "SEED:1");
        let details = vec![ConceptDetails::new("CHEBI:1", "chem")];
        assert_eq!(
            linked_concept_violation(SemanticGroup::Chemicals, &seeds(), &statement, &details),
            None
        );
    }

    #[test]
    fn test_linked_concept_mismatch_names_statement_and_concept() {
        let statement = Statement::new("s1", "SEED:1", "DOID:9");
        let details = vec![ConceptDetails::new("DOID:9", "DISO")];
        let violation =
            linked_concept_violation(SemanticGroup::Genes, &seeds(), &statement, &details).unwrap();
        match violation {
            Violation::StatementGroupMismatch {
                statement_id,
                concept_id,
                actual,
                seed_concept_id,
                ..
            } => {
                assert_eq!(statement_id, "s1");
                assert_eq!(concept_id, "DOID:9");
                assert_eq!(actual, "DISO");
                assert_eq!(seed_concept_id, "SEED:1");
            }
            other => panic!("Expected StatementGroupMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_details_is_distinct_violation() {
        let statement = Statement::new("s1", "SEED:1", "_:blank");
        let violation = linked_concept_violation(SemanticGroup::Genes, &seeds(), &statement, &[]).unwrap();
        assert_eq!(
            violation,
            Violation::NoDetailsForLinkedConcept {
                group: SemanticGroup::Genes,
                statement_id: "s1".to_string(),
                concept_id: "_:blank".to_string(),
            }
        );
    }

    #[test]
    fn test_tally_violation_beats_error() {
        let mut tally = FilterTally::new(CheckKind::ConceptSemanticFilter);
        tally.record(ProbeResult::Errored(GatewayError::http(ConceptQuery::new("e"), "reset")));
        tally.record(ProbeResult::Violated(Violation::ConceptGroupMismatch {
            group: SemanticGroup::Anatomy,
            concept_id: "UBERON:1".to_string(),
            actual: "CHEM".to_string(),
        }));
        tally.record(ProbeResult::Clean { records: 3 });

        let result = tally.finish();
        assert_eq!(result.outcome.kind(), OutcomeKind::Failed);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_tally_errors_only_is_errored() {
        let mut tally = FilterTally::new(CheckKind::ConceptSemanticFilter);
        tally.record(ProbeResult::Errored(GatewayError::http(ConceptQuery::new("e"), "reset")));
        tally.record(ProbeResult::Clean { records: 3 });
        assert_eq!(tally.finish().outcome.kind(), OutcomeKind::Errored);
    }

    #[test]
    fn test_tally_no_records_is_skipped() {
        let mut tally = FilterTally::new(CheckKind::StatementSemanticFilter);
        tally.record(ProbeResult::Clean { records: 0 });
        tally.record(ProbeResult::Clean { records: 0 });
        assert_eq!(tally.finish().outcome.kind(), OutcomeKind::Skipped);
    }

    #[test]
    fn test_tally_clean_is_passed() {
        let mut tally = FilterTally::new(CheckKind::ConceptSemanticFilter);
        tally.record(ProbeResult::Clean { records: 2 });
        tally.record(ProbeResult::Clean { records: 0 });
        let result = tally.finish();
        assert!(result.outcome.is_pass());
        assert!(result.outcome.explanation().contains("2 records across 2 semantic groups"));
    }
}
