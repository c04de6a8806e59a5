//! Caching layer for concept details lookups.
//!
//! The statement filter check resolves the linked endpoint of every
//! statement it inspects, and the same concepts recur across groups. Those
//! lookups are idempotent, so they are served from a moka cache; every other
//! operation passes straight through.

use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

use beacon_core::{
    Concept, ConceptDetails, ConceptQuery, Evidence, EvidenceQuery, ExactMatchSet, GatewayError,
    Statement, StatementQuery,
};

use super::QueryGateway;

/// Wraps a gateway with a details cache.
pub struct CachedGateway<G> {
    inner: G,
    details: Cache<String, Vec<ConceptDetails>>,
}

impl<G: QueryGateway> CachedGateway<G> {
    pub fn new(inner: G, max_entries: u64, ttl: Duration) -> Self {
        let details = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { inner, details }
    }
}

#[async_trait]
impl<G: QueryGateway> QueryGateway for CachedGateway<G> {
    async fn list_concepts(&self, query: &ConceptQuery) -> Result<Vec<Concept>, GatewayError> {
        self.inner.list_concepts(query).await
    }

    async fn get_concept_details(
        &self,
        concept_id: &str,
    ) -> Result<Vec<ConceptDetails>, GatewayError> {
        if let Some(cached) = self.details.get(concept_id).await {
            tracing::debug!(concept_id = %concept_id, "Concept details served from cache");
            return Ok(cached);
        }

        // Failures are not cached; the next lookup asks the beacon again.
        let details = self.inner.get_concept_details(concept_id).await?;
        self.details
            .insert(concept_id.to_string(), details.clone())
            .await;
        Ok(details)
    }

    async fn list_statements(
        &self,
        query: &StatementQuery,
    ) -> Result<Vec<Statement>, GatewayError> {
        self.inner.list_statements(query).await
    }

    async fn list_evidence(&self, query: &EvidenceQuery) -> Result<Vec<Evidence>, GatewayError> {
        self.inner.list_evidence(query).await
    }

    async fn list_exact_matches(&self, concept_id: &str) -> Result<ExactMatchSet, GatewayError> {
        self.inner.list_exact_matches(concept_id).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
