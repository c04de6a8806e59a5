pub mod check_config;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use beacon_runtime::RuntimeConfig;

/// Load the config file if one was given, then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<RuntimeConfig> {
    let config = match path {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    Ok(config.with_env_overrides())
}
