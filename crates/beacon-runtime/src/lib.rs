//! # beacon-runtime
//!
//! Drives a Knowledge Beacon through the conformance suite.
//!
//! This crate owns everything that talks to a beacon: the [`QueryGateway`]
//! abstraction and its implementations, the three validators, and the
//! [`ValidationRunner`] that sequences them. Every decision about whether a
//! response is correct is delegated to `beacon-core`.
//!
//! ## Gateways
//!
//! - [`HttpGateway`] (feature `http`): a live beacon over HTTP
//! - [`FixtureGateway`]: an in-memory data set loaded from YAML/JSON
//! - [`CachedGateway`]: wraps either with a concept details cache
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use beacon_runtime::{FixtureGateway, RuntimeConfig, ValidationRunner};
//!
//! let config = RuntimeConfig::from_file("beacon.yaml")?;
//! let gateway = Arc::new(FixtureGateway::from_file("fixture.yaml")?);
//!
//! let runner = ValidationRunner::builder()
//!     .gateway(gateway)
//!     .config(&config)
//!     .build()?;
//!
//! let report = runner.run_all().await;
//! std::process::exit(report.exit_code());
//! ```

use thiserror::Error;

pub mod config;
pub mod gateway;
pub mod runner;
pub mod validators;

pub use config::{CacheConfig, ConfigError, RuntimeConfig, BASE_URL_ENV};
pub use gateway::{CachedGateway, FixtureData, FixtureError, FixtureGateway, QueryGateway};
pub use runner::{ValidationRunner, ValidationRunnerBuilder};
pub use validators::{
    PagingValidator, SemanticFilterValidator, WorkflowAbort, WorkflowOutcome, WorkflowValidator,
};

#[cfg(feature = "http")]
pub use gateway::HttpGateway;

/// Errors from setting up a run.
///
/// A run itself never fails: problems with the beacon end up in the report.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Gateway not configured: {0}")]
    GatewayNotConfigured(String),

    #[error("Invalid suite: {0}")]
    Suite(#[from] beacon_core::SuiteError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fixture error: {0}")]
    Fixture(#[from] FixtureError),
}
