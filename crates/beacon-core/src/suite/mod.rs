//! Suite configuration.
//!
//! A suite names the keywords, page windows and semantic groups a run uses.
//! Suites are structured data validated against an embedded JSON Schema.

mod parser;
mod schema;

pub use parser::{SuiteConfig, SuiteError};
pub use schema::validate_suite_schema;
