//! Query descriptors and gateway errors.
//!
//! Every request the validator issues is described by one of these values,
//! and every gateway failure carries the query that was attempted so the
//! report can say exactly which request broke.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Parameters for `listConcepts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptQuery {
    pub keywords: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_group: Option<String>,

    pub page: u32,
    pub page_size: u32,
}

impl ConceptQuery {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            semantic_group: None,
            page: 1,
            page_size: 1,
        }
    }

    pub fn semantic_group(mut self, group: impl Into<String>) -> Self {
        self.semantic_group = Some(group.into());
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// Parameters for `listStatements`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementQuery {
    pub concept_ids: Vec<String>,
    pub page: u32,
    pub page_size: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_group: Option<String>,
}

impl StatementQuery {
    pub fn new(concept_ids: Vec<String>) -> Self {
        Self {
            concept_ids,
            page: 1,
            page_size: 1,
            keywords: None,
            semantic_group: None,
        }
    }

    pub fn keywords(mut self, keywords: Option<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn semantic_group(mut self, group: impl Into<String>) -> Self {
        self.semantic_group = Some(group.into());
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// Parameters for `listEvidence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceQuery {
    pub statement_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    pub page: u32,
    pub page_size: u32,
}

impl EvidenceQuery {
    pub fn new(statement_id: impl Into<String>) -> Self {
        Self {
            statement_id: statement_id.into(),
            keywords: None,
            page: 1,
            page_size: 1,
        }
    }

    pub fn keywords(mut self, keywords: Option<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// Any of the five gateway operations together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Query {
    ListConcepts(ConceptQuery),
    ConceptDetails { concept_id: String },
    ListStatements(StatementQuery),
    ListEvidence(EvidenceQuery),
    ExactMatches { concept_id: String },
}

impl Query {
    /// Operation name as it appears in the beacon API.
    pub fn operation(&self) -> &'static str {
        match self {
            Query::ListConcepts(_) => "listConcepts",
            Query::ConceptDetails { .. } => "getConceptDetails",
            Query::ListStatements(_) => "listStatements",
            Query::ListEvidence(_) => "listEvidence",
            Query::ExactMatches { .. } => "listExactMatches",
        }
    }
}

impl From<ConceptQuery> for Query {
    fn from(query: ConceptQuery) -> Self {
        Query::ListConcepts(query)
    }
}

impl From<StatementQuery> for Query {
    fn from(query: StatementQuery) -> Self {
        Query::ListStatements(query)
    }
}

impl From<EvidenceQuery> for Query {
    fn from(query: EvidenceQuery) -> Self {
        Query::ListEvidence(query)
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::ListConcepts(q) => write!(
                f,
                "listConcepts(keywords={}, semgroups={}, page={}, size={})",
                q.keywords,
                opt(&q.semantic_group),
                q.page,
                q.page_size
            ),
            Query::ConceptDetails { concept_id } => {
                write!(f, "getConceptDetails(conceptId={})", concept_id)
            }
            Query::ListStatements(q) => write!(
                f,
                "listStatements(c=[{}], page={}, size={}, keywords={}, semgroups={})",
                q.concept_ids.join(","),
                q.page,
                q.page_size,
                opt(&q.keywords),
                opt(&q.semantic_group)
            ),
            Query::ListEvidence(q) => write!(
                f,
                "listEvidence(statementId={}, keywords={}, page={}, size={})",
                q.statement_id,
                opt(&q.keywords),
                q.page,
                q.page_size
            ),
            Query::ExactMatches { concept_id } => {
                write!(f, "listExactMatches(conceptId={})", concept_id)
            }
        }
    }
}

/// Why a gateway request failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GatewayErrorKind {
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    #[error("Service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Could not decode response: {message}")]
    Decode { message: String },

    #[error("Timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Gateway unavailable: {message}")]
    Unavailable { message: String },
}

/// A transport or service failure, tagged with the query that caused it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind} [{query}]")]
pub struct GatewayError {
    pub query: Query,

    #[source]
    pub kind: GatewayErrorKind,
}

impl GatewayError {
    pub fn new(query: impl Into<Query>, kind: GatewayErrorKind) -> Self {
        Self {
            query: query.into(),
            kind,
        }
    }

    pub fn http(query: impl Into<Query>, message: impl Into<String>) -> Self {
        Self::new(query, GatewayErrorKind::Http { message: message.into() })
    }

    pub fn status(query: impl Into<Query>, status: u16, message: impl Into<String>) -> Self {
        Self::new(
            query,
            GatewayErrorKind::Status {
                status,
                message: message.into(),
            },
        )
    }

    pub fn decode(query: impl Into<Query>, message: impl Into<String>) -> Self {
        Self::new(query, GatewayErrorKind::Decode { message: message.into() })
    }

    pub fn timeout(query: impl Into<Query>, timeout: Duration) -> Self {
        Self::new(query, GatewayErrorKind::Timeout { timeout })
    }

    pub fn unavailable(query: impl Into<Query>, message: impl Into<String>) -> Self {
        Self::new(query, GatewayErrorKind::Unavailable { message: message.into() })
    }
}
