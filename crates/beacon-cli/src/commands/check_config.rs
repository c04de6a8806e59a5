use anyhow::{Context, Result};
use tracing::info;

use crate::cli::CheckConfigArgs;
use crate::commands::load_config;

pub fn run(args: CheckConfigArgs) -> Result<i32> {
    let config = load_config(Some(args.config.as_path()))?;

    info!(
        config = %args.config.display(),
        base_url = config.base_url.as_deref().unwrap_or("-"),
        groups = config.suite.semantic_groups.len(),
        "config is valid"
    );

    let resolved = serde_yaml::to_string(&config).context("failed to render config")?;
    print!("{}", resolved);
    Ok(0)
}
