use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use beacon_core::ValidationReport;
use beacon_runtime::{FixtureGateway, HttpGateway, QueryGateway, RuntimeConfig, ValidationRunner};

use crate::cli::{ReportFormat, RunArgs};
use crate::commands::load_config;

pub fn run(args: RunArgs) -> Result<i32> {
    let config = resolve_config(&args)?;

    let gateway: Arc<dyn QueryGateway> = match &args.fixture {
        Some(path) => Arc::new(
            FixtureGateway::from_file(path)
                .with_context(|| format!("failed to load fixture {}", path.display()))?,
        ),
        None => Arc::new(HttpGateway::from_config(&config)?),
    };

    let runner = ValidationRunner::builder()
        .gateway(gateway)
        .config(&config)
        .build()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let report = runtime.block_on(runner.run_all());

    for line in report.summary_lines() {
        info!("{}", line);
    }

    if let Some(rendered) = render(&report, args.format)? {
        println!("{}", rendered);
    }

    Ok(report.exit_code())
}

/// Config file, then BEACON_BASE_URL, then command-line flags.
fn resolve_config(args: &RunArgs) -> Result<RuntimeConfig> {
    let mut config = load_config(args.config.as_deref())?.with_base_url_override(args.base_url.clone());

    if let Some(keywords) = &args.keywords {
        config.suite.keywords = keywords.clone();
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn render(report: &ValidationReport, format: ReportFormat) -> Result<Option<String>> {
    let rendered = match format {
        ReportFormat::Json => Some(serde_json::to_string_pretty(report)?),
        ReportFormat::Yaml => Some(serde_yaml::to_string(report)?),
        ReportFormat::None => None,
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> RunArgs {
        RunArgs {
            config: None,
            base_url: None,
            fixture: None,
            keywords: None,
            format: ReportFormat::None,
        }
    }

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("beacon-cli-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_flags_override_config_file() {
        let config = write_temp(
            "override.yaml",
            "base_url: \"https://file.example/\"\nsuite:\n  keywords: \"file\"\n",
        );
        let resolved = resolve_config(&RunArgs {
            config: Some(config),
            base_url: Some("https://flag.example/".to_string()),
            keywords: Some("flag".to_string()),
            ..args()
        })
        .unwrap();

        assert_eq!(resolved.base_url.as_deref(), Some("https://flag.example/"));
        assert_eq!(resolved.suite.keywords, "flag");
    }

    #[test]
    fn test_blank_keywords_flag_rejected() {
        let result = resolve_config(&RunArgs {
            keywords: Some(" ".to_string()),
            ..args()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_fixture_run_exit_code() {
        let fixture = write_temp(
            "fixture.yaml",
            r#"
concepts:
  - { id: "NCBIGene:1", name: "gene one", semanticGroup: "GENE" }
statements:
  - id: "s1"
    subject: { id: "NCBIGene:1" }
    object: { id: "NCBIGene:1" }
"#,
        );
        let code = run(RunArgs {
            fixture: Some(fixture),
            ..args()
        })
        .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_empty_fixture_aborts_with_failure() {
        let fixture = write_temp("empty.yaml", "{}\n");
        let code = run(RunArgs {
            fixture: Some(fixture),
            ..args()
        })
        .unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_render_formats() {
        let report = beacon_core::ReportBuilder::new().finish();
        assert!(render(&report, ReportFormat::Json).unwrap().unwrap().contains("checks"));
        assert!(render(&report, ReportFormat::Yaml).unwrap().unwrap().contains("checks"));
        assert!(render(&report, ReportFormat::None).unwrap().is_none());
    }
}
