use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Data incident triage for pipeline run metrics.
#[derive(Parser, Debug)]
#[command(name = "triage", version, about = "Data incident triage for pipeline run metrics")]
pub struct CliArgs {
    /// Local settings file (JSON with a "Values" object), default: ./local.settings.json
    #[arg(long, global = true, env = "TRIAGE_SETTINGS_FILE")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the triage pipeline over a CSV or JSON metrics file
    Analyze(AnalyzeArgs),

    /// Rebuild the ticket payload from a saved JSON report
    Ticket {
        /// Report produced by `analyze --format json`
        report: PathBuf,
    },

    /// Show agent stages and narrative availability
    Status,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Metrics file (.csv or .json)
    pub input: PathBuf,

    /// Pipeline name used in the ticket and narrative
    #[arg(long, default_value = "orders_etl")]
    pub pipeline: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also request an AI narrative (needs AZURE_OPENAI_* settings)
    #[arg(long)]
    pub narrative: bool,

    /// Write the ticket payload JSON to this path
    #[arg(long)]
    pub ticket_out: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
