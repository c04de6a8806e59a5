//! Suite parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_suite_schema;
use crate::semantic::SemanticGroup;

/// Errors that can occur when loading a suite.
#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Failed to read suite file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Suite does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Suite validation failed: {0}")]
    ValidationError(String),
}

fn default_keywords() -> String {
    "e".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_workflow_page_size() -> u32 {
    1
}

fn default_semantic_groups() -> Vec<SemanticGroup> {
    SemanticGroup::ALL.to_vec()
}

/// What a validation run asks of the beacon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuiteConfig {
    /// Keyword filter for the seed concept query and the concept checks.
    #[serde(default = "default_keywords")]
    pub keywords: String,

    /// Full-page window for paging and semantic filter probes.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Page size for the basic workflow queries.
    #[serde(default = "default_workflow_page_size")]
    pub workflow_page_size: u32,

    /// Groups probed by the semantic filter checks, in probe order.
    #[serde(default = "default_semantic_groups")]
    pub semantic_groups: Vec<SemanticGroup>,

    #[serde(default)]
    pub statement_keywords: Option<String>,

    #[serde(default)]
    pub evidence_keywords: Option<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            page_size: default_page_size(),
            workflow_page_size: default_workflow_page_size(),
            semantic_groups: default_semantic_groups(),
            statement_keywords: None,
            evidence_keywords: None,
        }
    }
}

impl SuiteConfig {
    /// Parse a suite from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SuiteError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a suite from JSON string.
    pub fn from_json(json: &str) -> Result<Self, SuiteError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a suite from a YAML or JSON file, chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Validate an already-parsed document and build the suite from it.
    ///
    /// A `null` document is treated as "all defaults". Group codes are
    /// matched case-insensitively, so they are upper-cased before the
    /// schema sees them.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SuiteError> {
        let mut value = if value.is_null() {
            serde_json::json!({})
        } else {
            value
        };
        normalize_group_codes(&mut value);

        validate_suite_schema(&value).map_err(SuiteError::SchemaError)?;

        let suite: SuiteConfig = serde_json::from_value(value)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Checks the schema cannot express.
    pub fn validate(&self) -> Result<(), SuiteError> {
        if self.keywords.trim().is_empty() {
            return Err(SuiteError::ValidationError(
                "keywords must not be blank".to_string(),
            ));
        }

        if self.page_size < 2 {
            return Err(SuiteError::ValidationError(format!(
                "page_size {} is too small to split into two pages",
                self.page_size
            )));
        }

        if self.workflow_page_size == 0 {
            return Err(SuiteError::ValidationError(
                "workflow_page_size must be at least 1".to_string(),
            ));
        }

        if self.semantic_groups.is_empty() {
            return Err(SuiteError::ValidationError(
                "semantic_groups must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn normalize_group_codes(value: &mut serde_json::Value) {
    if let Some(groups) = value
        .get_mut("semantic_groups")
        .and_then(serde_json::Value::as_array_mut)
    {
        for group in groups.iter_mut() {
            if let serde_json::Value::String(code) = group {
                *code = code.to_ascii_uppercase();
            }
        }
    }
}
