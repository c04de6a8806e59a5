//! In-memory gateway backed by a fixture data set.
//!
//! Answers the same operations a beacon does, deterministically, from a
//! YAML or JSON file. Used for offline runs and as the fixed data set the
//! determinism tests query.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use beacon_core::{
    Concept, ConceptDetails, ConceptQuery, Evidence, EvidenceQuery, ExactMatchSet, GatewayError,
    Query, Statement, StatementQuery,
};

use super::QueryGateway;

/// Errors loading a fixture file.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read fixture file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML fixture: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON fixture: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// The records a fixture gateway serves, in the order it serves them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixtureData {
    #[serde(default)]
    pub concepts: Vec<ConceptDetails>,

    #[serde(default)]
    pub statements: Vec<Statement>,

    #[serde(default)]
    pub evidence: Vec<Evidence>,

    #[serde(default)]
    pub exact_matches: BTreeMap<String, ExactMatchSet>,
}

impl FixtureData {
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a YAML or JSON file, chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    fn group_of(&self, concept_id: &str) -> Option<&str> {
        self.concepts
            .iter()
            .find(|c| c.id == concept_id)
            .map(|c| c.semantic_group.as_str())
    }
}

/// Gateway serving a [`FixtureData`] set and recording every query.
pub struct FixtureGateway {
    name: String,
    data: FixtureData,
    calls: Mutex<Vec<Query>>,
}

impl FixtureGateway {
    pub fn new(data: FixtureData) -> Self {
        Self {
            name: "fixture".to_string(),
            data,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let data = FixtureData::from_file(path)?;
        Ok(Self {
            name: format!("fixture:{}", path.display()),
            ..Self::new(data)
        })
    }

    /// Every query answered so far, in call order.
    pub fn calls(&self) -> Vec<Query> {
        self.calls.lock().clone()
    }

    fn log(&self, query: Query) {
        self.calls.lock().push(query);
    }
}

/// Any whitespace-separated keyword occurs in any candidate, ignoring case.
fn keyword_match<'a>(keywords: &str, candidates: impl IntoIterator<Item = &'a str> + Clone) -> bool {
    keywords.split_whitespace().any(|keyword| {
        let keyword = keyword.to_lowercase();
        candidates
            .clone()
            .into_iter()
            .any(|candidate| candidate.to_lowercase().contains(&keyword))
    })
}

/// The filter may name several space-separated group codes.
fn group_match(filter: &str, group: &str) -> bool {
    filter
        .split_whitespace()
        .any(|code| code.eq_ignore_ascii_case(group.trim()))
}

fn page_of<T: Clone>(
    records: Vec<&T>,
    page: u32,
    page_size: u32,
    query: impl Into<Query>,
) -> Result<Vec<T>, GatewayError> {
    if page == 0 || page_size == 0 {
        return Err(GatewayError::status(
            query,
            400,
            "pageNumber and pageSize must be at least 1",
        ));
    }

    let skip = (page as usize - 1).saturating_mul(page_size as usize);
    Ok(records
        .into_iter()
        .skip(skip)
        .take(page_size as usize)
        .cloned()
        .collect())
}

fn concept_summary(details: &ConceptDetails) -> Concept {
    Concept {
        id: details.id.clone(),
        name: details.name.clone(),
        semantic_group: details.semantic_group.clone(),
        synonyms: details.synonyms.clone(),
        definition: details.definition.clone(),
    }
}

#[async_trait]
impl QueryGateway for FixtureGateway {
    async fn list_concepts(&self, query: &ConceptQuery) -> Result<Vec<Concept>, GatewayError> {
        self.log(query.clone().into());

        let matching: Vec<&ConceptDetails> = self
            .data
            .concepts
            .iter()
            .filter(|c| {
                let names = c
                    .name
                    .as_deref()
                    .into_iter()
                    .chain(c.synonyms.iter().map(String::as_str));
                keyword_match(&query.keywords, names)
            })
            .filter(|c| match &query.semantic_group {
                Some(filter) => group_match(filter, &c.semantic_group),
                None => true,
            })
            .collect();

        let page = page_of(matching, query.page, query.page_size, query.clone())?;
        Ok(page.iter().map(concept_summary).collect())
    }

    async fn get_concept_details(
        &self,
        concept_id: &str,
    ) -> Result<Vec<ConceptDetails>, GatewayError> {
        self.log(Query::ConceptDetails {
            concept_id: concept_id.to_string(),
        });

        Ok(self
            .data
            .concepts
            .iter()
            .filter(|c| c.id == concept_id)
            .cloned()
            .collect())
    }

    async fn list_statements(
        &self,
        query: &StatementQuery,
    ) -> Result<Vec<Statement>, GatewayError> {
        self.log(query.clone().into());

        let matching: Vec<&Statement> = self
            .data
            .statements
            .iter()
            .filter(|s| {
                query
                    .concept_ids
                    .iter()
                    .any(|id| *id == s.subject.id || *id == s.object.id)
            })
            .filter(|s| match &query.keywords {
                Some(keywords) => {
                    let names = [&s.subject.name, &s.object.name]
                        .into_iter()
                        .filter_map(|name| name.as_deref())
                        .chain(s.predicate.iter().filter_map(|p| p.name.as_deref()));
                    keyword_match(keywords, names)
                }
                None => true,
            })
            .filter(|s| match &query.semantic_group {
                Some(filter) => {
                    let other = s.other_endpoint(&query.concept_ids);
                    self.data
                        .group_of(&other.id)
                        .map(|group| group_match(filter, group))
                        .unwrap_or(false)
                }
                None => true,
            })
            .collect();

        page_of(matching, query.page, query.page_size, query.clone())
    }

    async fn list_evidence(&self, query: &EvidenceQuery) -> Result<Vec<Evidence>, GatewayError> {
        self.log(query.clone().into());

        let matching: Vec<&Evidence> = self
            .data
            .evidence
            .iter()
            .filter(|e| e.statement_id == query.statement_id)
            .filter(|e| match &query.keywords {
                Some(keywords) => keyword_match(keywords, e.label.as_deref()),
                None => true,
            })
            .collect();

        page_of(matching, query.page, query.page_size, query.clone())
    }

    async fn list_exact_matches(&self, concept_id: &str) -> Result<ExactMatchSet, GatewayError> {
        self.log(Query::ExactMatches {
            concept_id: concept_id.to_string(),
        });

        Ok(self
            .data
            .exact_matches
            .get(concept_id)
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
