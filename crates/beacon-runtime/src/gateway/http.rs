//! Knowledge Beacon 1.0 HTTP gateway.
//!
//! Issues the five read operations as plain GET requests against a beacon
//! base URL. Identifiers used as path segments are percent-encoded.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use beacon_core::{
    Concept, ConceptDetails, ConceptQuery, Evidence, EvidenceQuery, ExactMatchSet, GatewayError,
    Query, Statement, StatementQuery,
};

use super::QueryGateway;
use crate::config::RuntimeConfig;
use crate::RuntimeError;

/// Longest error body kept in a `Status` error.
const MAX_ERROR_BODY: usize = 512;

/// Gateway talking to a live beacon.
pub struct HttpGateway {
    base_url: Url,
    client: Client,
    timeout: Duration,
}

impl HttpGateway {
    /// Create a gateway for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RuntimeError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            RuntimeError::GatewayNotConfigured(format!("invalid base URL {}: {}", base_url, e))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(RuntimeError::GatewayNotConfigured(format!(
                "base URL {} cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RuntimeError::GatewayNotConfigured(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            timeout,
        })
    }

    /// Gateway for the configured `base_url` and `request_timeout`.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        let base_url = config.base_url.as_deref().ok_or_else(|| {
            RuntimeError::GatewayNotConfigured("no beacon base URL configured".to_string())
        })?;
        Self::new(base_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base URLs are rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        query: Query,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        tracing::debug!(url = %url, query = %query, "Querying beacon");

        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::timeout(query.clone(), self.timeout)
                } else {
                    GatewayError::http(query.clone(), e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut end = MAX_ERROR_BODY;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                body.truncate(end);
            }
            return Err(GatewayError::status(query, status.as_u16(), body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::decode(query, e.to_string()))
    }
}

fn paging_params(page: u32, page_size: u32) -> [(&'static str, String); 2] {
    [
        ("pageNumber", page.to_string()),
        ("pageSize", page_size.to_string()),
    ]
}

#[async_trait]
impl QueryGateway for HttpGateway {
    async fn list_concepts(&self, query: &ConceptQuery) -> Result<Vec<Concept>, GatewayError> {
        let mut params = vec![("keywords", query.keywords.clone())];
        if let Some(group) = &query.semantic_group {
            params.push(("semgroups", group.clone()));
        }
        params.extend(paging_params(query.page, query.page_size));

        self.fetch(query.clone().into(), self.endpoint(&["concepts"]), &params)
            .await
    }

    async fn get_concept_details(
        &self,
        concept_id: &str,
    ) -> Result<Vec<ConceptDetails>, GatewayError> {
        let query = Query::ConceptDetails {
            concept_id: concept_id.to_string(),
        };
        self.fetch(query, self.endpoint(&["concepts", concept_id]), &[])
            .await
    }

    async fn list_statements(
        &self,
        query: &StatementQuery,
    ) -> Result<Vec<Statement>, GatewayError> {
        let mut params = vec![("c", query.concept_ids.join(","))];
        params.extend(paging_params(query.page, query.page_size));
        if let Some(keywords) = &query.keywords {
            params.push(("keywords", keywords.clone()));
        }
        if let Some(group) = &query.semantic_group {
            params.push(("semgroups", group.clone()));
        }

        self.fetch(query.clone().into(), self.endpoint(&["statements"]), &params)
            .await
    }

    async fn list_evidence(&self, query: &EvidenceQuery) -> Result<Vec<Evidence>, GatewayError> {
        let mut params = Vec::new();
        if let Some(keywords) = &query.keywords {
            params.push(("keywords", keywords.clone()));
        }
        params.extend(paging_params(query.page, query.page_size));

        let mut evidence: Vec<Evidence> = self
            .fetch(
                query.clone().into(),
                self.endpoint(&["evidence", query.statement_id.as_str()]),
                &params,
            )
            .await?;

        // The wire format omits the statement; it is the one we asked about.
        for item in &mut evidence {
            item.statement_id = query.statement_id.clone();
        }
        Ok(evidence)
    }

    async fn list_exact_matches(&self, concept_id: &str) -> Result<ExactMatchSet, GatewayError> {
        let query = Query::ExactMatches {
            concept_id: concept_id.to_string(),
        };
        let ids: Vec<String> = self
            .fetch(query, self.endpoint(&["exactmatches", concept_id]), &[])
            .await?;
        Ok(ids.into_iter().collect())
    }

    fn name(&self) -> &str {
        self.base_url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HttpGateway {
        HttpGateway::new("https://beacon.example.org/api/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let url = gateway().endpoint(&["concepts", "NCBIGene:1017"]);
        assert_eq!(url.as_str(), "https://beacon.example.org/api/concepts/NCBIGene:1017");
    }

    #[test]
    fn test_endpoint_encodes_path_separators() {
        let url = gateway().endpoint(&["evidence", "a/b c"]);
        assert_eq!(url.as_str(), "https://beacon.example.org/api/evidence/a%2Fb%20c");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = HttpGateway::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(RuntimeError::GatewayNotConfigured(_))));
    }

    #[test]
    fn test_from_config_requires_base_url() {
        let result = HttpGateway::from_config(&RuntimeConfig::default());
        assert!(matches!(result, Err(RuntimeError::GatewayNotConfigured(_))));

        let config = RuntimeConfig::default()
            .with_base_url_override(Some("https://beacon.example.org/api/".to_string()));
        assert!(HttpGateway::from_config(&config).is_ok());
    }

    #[test]
    fn test_name_is_base_url() {
        assert_eq!(gateway().name(), "https://beacon.example.org/api/");
    }

    #[tokio::test]
    async fn test_unreachable_beacon_is_transport_error_with_query() {
        // Port 9 (discard) on localhost is expected to refuse the connection.
        let gateway = HttpGateway::new("http://127.0.0.1:9/", Duration::from_secs(2)).unwrap();
        let error = gateway
            .list_concepts(&ConceptQuery::new("e"))
            .await
            .unwrap_err();
        assert!(matches!(error.query, Query::ListConcepts(_)));
    }
}
