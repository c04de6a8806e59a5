//! Gateway abstractions for beacon-runtime.
//!
//! A gateway answers the five read operations of the Knowledge Beacon API.
//! Validators only ever talk to a [`QueryGateway`]; whether the answers come
//! from a live beacon, a fixture file or a cache is decided when the runner
//! is built.

use async_trait::async_trait;
use std::sync::Arc;

use beacon_core::{
    Concept, ConceptDetails, ConceptQuery, EvidenceQuery, Evidence, ExactMatchSet, GatewayError,
    Statement, StatementQuery,
};

mod cached;
mod fixture;

#[cfg(feature = "http")]
mod http;

pub use cached::CachedGateway;
pub use fixture::{FixtureData, FixtureError, FixtureGateway};

#[cfg(feature = "http")]
pub use http::HttpGateway;

/// Read access to a Knowledge Beacon.
///
/// Every failure carries the query that was attempted, so callers can log
/// it without keeping their own copy.
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// `listConcepts`: ordered page of concepts matching the keywords.
    async fn list_concepts(&self, query: &ConceptQuery) -> Result<Vec<Concept>, GatewayError>;

    /// `getConceptDetails`: zero or more expanded records for one id.
    async fn get_concept_details(
        &self,
        concept_id: &str,
    ) -> Result<Vec<ConceptDetails>, GatewayError>;

    /// `listStatements`: ordered page of statements touching any of the ids.
    async fn list_statements(
        &self,
        query: &StatementQuery,
    ) -> Result<Vec<Statement>, GatewayError>;

    /// `listEvidence`: ordered page of evidence for one statement.
    async fn list_evidence(&self, query: &EvidenceQuery) -> Result<Vec<Evidence>, GatewayError>;

    /// `listExactMatches`: ids asserted equivalent to `concept_id`. May be empty.
    async fn list_exact_matches(&self, concept_id: &str) -> Result<ExactMatchSet, GatewayError>;

    /// Gateway name for logs.
    fn name(&self) -> &str;
}

#[async_trait]
impl<G: QueryGateway + ?Sized> QueryGateway for Arc<G> {
    async fn list_concepts(&self, query: &ConceptQuery) -> Result<Vec<Concept>, GatewayError> {
        (**self).list_concepts(query).await
    }

    async fn get_concept_details(
        &self,
        concept_id: &str,
    ) -> Result<Vec<ConceptDetails>, GatewayError> {
        (**self).get_concept_details(concept_id).await
    }

    async fn list_statements(
        &self,
        query: &StatementQuery,
    ) -> Result<Vec<Statement>, GatewayError> {
        (**self).list_statements(query).await
    }

    async fn list_evidence(&self, query: &EvidenceQuery) -> Result<Vec<Evidence>, GatewayError> {
        (**self).list_evidence(query).await
    }

    async fn list_exact_matches(&self, concept_id: &str) -> Result<ExactMatchSet, GatewayError> {
        (**self).list_exact_matches(concept_id).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
