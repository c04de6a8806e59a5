use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "beacon-validator",
    version,
    about = "Conformance validation for Knowledge Beacon services"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the conformance suite and print the report.
    Run(RunArgs),
    /// Parse and validate a config file without running anything.
    CheckConfig(CheckConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Beacon base URL; overrides the config file and BEACON_BASE_URL.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Serve queries from a fixture file instead of a live beacon.
    #[arg(long, conflicts_with = "base_url")]
    pub fixture: Option<PathBuf>,

    /// Keyword filter for the seed concept and concept checks.
    #[arg(long)]
    pub keywords: Option<String>,

    #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
    pub format: ReportFormat,
}

#[derive(Args, Debug, Clone)]
pub struct CheckConfigArgs {
    #[arg(long)]
    pub config: PathBuf,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Yaml,
    None,
}
