//! Read-only projections returned by a Knowledge Beacon.
//!
//! Field names follow the beacon wire format (camelCase). The validator never
//! mutates these records; they live for one validation run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Any record with a stable identifier.
///
/// Paging checks only ever look at identifiers, so they are generic over
/// this trait rather than over a concrete record type.
pub trait IdentifiedEntity {
    fn id(&self) -> &str;
}

/// A concept returned by `listConcepts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Raw semantic group code as the beacon reported it (case varies).
    #[serde(default)]
    pub semantic_group: String,

    #[serde(default)]
    pub synonyms: Vec<String>,

    #[serde(default)]
    pub definition: Option<String>,
}

impl Concept {
    pub fn new(id: impl Into<String>, semantic_group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            semantic_group: semantic_group.into(),
            synonyms: Vec::new(),
            definition: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A tag/value pair attached to concept details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConceptDetail {
    pub tag: String,
    pub value: String,
}

/// Expanded record returned by `getConceptDetails`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDetails {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub semantic_group: String,

    #[serde(default)]
    pub synonyms: Vec<String>,

    #[serde(default)]
    pub definition: Option<String>,

    #[serde(default)]
    pub details: Vec<ConceptDetail>,
}

impl ConceptDetails {
    pub fn new(id: impl Into<String>, semantic_group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            semantic_group: semantic_group.into(),
            synonyms: Vec::new(),
            definition: None,
            details: Vec::new(),
        }
    }
}

impl From<&Concept> for ConceptDetails {
    fn from(concept: &Concept) -> Self {
        Self {
            id: concept.id.clone(),
            name: concept.name.clone(),
            semantic_group: concept.semantic_group.clone(),
            synonyms: concept.synonyms.clone(),
            definition: concept.definition.clone(),
            details: Vec::new(),
        }
    }
}

/// Endpoint of a statement (subject or object).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConceptRef {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,
}

impl ConceptRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Relation of a statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredicateRef {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// A subject-predicate-object statement returned by `listStatements`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Statement {
    pub id: String,
    pub subject: ConceptRef,

    #[serde(default)]
    pub predicate: Option<PredicateRef>,

    pub object: ConceptRef,
}

impl Statement {
    pub fn new(id: impl Into<String>, subject: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: ConceptRef::new(subject),
            predicate: None,
            object: ConceptRef::new(object),
        }
    }

    /// The endpoint that was *not* used to select this statement.
    ///
    /// If the object is one of the seed concepts the subject is the other
    /// endpoint; in every other case the object is.
    pub fn other_endpoint<S: AsRef<str>>(&self, seeds: &[S]) -> &ConceptRef {
        if seeds.iter().any(|seed| seed.as_ref() == self.object.id) {
            &self.subject
        } else {
            &self.object
        }
    }
}

/// A piece of evidence returned by `listEvidence`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub id: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    /// Statement this evidence supports. Not part of the wire record; filled
    /// in by the gateway from the query that produced it.
    #[serde(default)]
    pub statement_id: String,
}

impl Evidence {
    pub fn new(id: impl Into<String>, statement_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            date: None,
            statement_id: statement_id.into(),
        }
    }
}

/// Concept identifiers asserted equivalent to a query identifier.
///
/// An empty set is a legitimate answer.
pub type ExactMatchSet = BTreeSet<String>;

impl IdentifiedEntity for Concept {
    fn id(&self) -> &str {
        &self.id
    }
}

impl IdentifiedEntity for ConceptDetails {
    fn id(&self) -> &str {
        &self.id
    }
}

impl IdentifiedEntity for Statement {
    fn id(&self) -> &str {
        &self.id
    }
}

impl IdentifiedEntity for Evidence {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Identifiers derived by the workflow check and reused by later checks.
///
/// Written once, then only read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedContext {
    pub concept_id: String,
    pub statement_id: String,

    /// One-element list wrapping `concept_id`, used as the statement filter.
    pub concept_ids: Vec<String>,
}

impl SeedContext {
    pub fn new(concept_id: impl Into<String>, statement_id: impl Into<String>) -> Self {
        let concept_id = concept_id.into();
        Self {
            concept_ids: vec![concept_id.clone()],
            concept_id,
            statement_id: statement_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concept_wire_names() {
        let json = r#"{"id":"NCBIGene:1017","name":"CDK2","semanticGroup":"GENE"}"#;
        let concept: Concept = serde_json::from_str(json).unwrap();
        assert_eq!(concept.semantic_group, "GENE");
        assert_eq!(concept.name.as_deref(), Some("CDK2"));
        assert!(concept.synonyms.is_empty());
    }

    #[test]
    fn test_statement_other_endpoint() {
        let statement = Statement::new("s1", "A", "B");

        // Seed is the subject, so the object is the other endpoint
        assert_eq!(statement.other_endpoint(&["A"]).id, "B");
        // Seed is the object, so the subject is the other endpoint
        assert_eq!(statement.other_endpoint(&["B"]).id, "A");
        // Seed on neither side falls back to the object
        assert_eq!(statement.other_endpoint(&["Z"]).id, "B");
    }

    #[test]
    fn test_self_loop_resolves_to_subject() {
        let statement = Statement::new("s1", "A", "A");
        assert_eq!(statement.other_endpoint(&["A"]).id, "A");
    }

    #[test]
    fn test_evidence_statement_id_defaults() {
        let json = r#"{"id":"PMID:123","label":"Some paper"}"#;
        let evidence: Evidence = serde_json::from_str(json).unwrap();
        assert_eq!(evidence.statement_id, "");
    }

    #[test]
    fn test_seed_context_wraps_concept_id() {
        let seeds = SeedContext::new("CHEBI:15365", "s-1");
        assert_eq!(seeds.concept_ids, vec!["CHEBI:15365".to_string()]);
    }
}
