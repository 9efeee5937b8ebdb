mod cli;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use triage_core::config::{load_dotenv, Config};
use triage_llm::{narrator_from_config, NarrativeRequest};
use triage_rules::{run_triage, TriageReport};

use crate::cli::{AnalyzeArgs, CliArgs, Command, OutputFormat};
use crate::report::{render_text, AnalyzeOutput};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    load_dotenv();
    let config = Config::load(args.settings.as_deref());
    config.log_summary();

    match args.command {
        Command::Analyze(analyze) => run_analyze(&config, analyze).await,
        Command::Ticket { report } => run_ticket(&report),
        Command::Status => run_status(&config),
    }
}

async fn run_analyze(config: &Config, args: AnalyzeArgs) -> Result<()> {
    let table = triage_ingest::load_table(&args.input)
        .with_context(|| format!("failed to load metrics from {}", args.input.display()))?;

    let report = run_triage(&args.pipeline, &table);

    let narrator = narrator_from_config(&config.azure_openai);
    let narrative = if args.narrative {
        let request = NarrativeRequest::new(
            report.pipeline.clone(),
            report.severity,
            report.findings.clone(),
            report.actions.clone(),
        );
        let text = match narrator.generate_narrative(&request).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Narrative generation failed");
                format!("Narrative generation failed: {}", e)
            }
        };
        Some(text)
    } else {
        None
    };

    match args.format {
        OutputFormat::Text => {
            let text = render_text(&report, narrative.as_deref(), narrator.is_available())
                .context("failed to render report")?;
            print!("{}", text);
        }
        OutputFormat::Json => {
            let output = AnalyzeOutput {
                report: &report,
                narrative: narrative.as_deref(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("failed to serialize report")?
            );
        }
    }

    if let Some(path) = args.ticket_out {
        let ticket = serde_json::to_string_pretty(&report.ticket)
            .context("failed to serialize ticket")?;
        std::fs::write(&path, ticket)
            .with_context(|| format!("failed to write ticket to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Ticket payload written");
    }

    Ok(())
}

fn run_ticket(path: &std::path::Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report: {}", path.display()))?;
    let ticket = TriageReport::ticket_from_json(&content)
        .with_context(|| format!("failed to build ticket from {}", path.display()))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&ticket).context("failed to serialize ticket")?
    );
    Ok(())
}

fn run_status(config: &Config) -> Result<()> {
    println!("Agent status");
    println!("  Perception: CSV/JSON metrics");
    println!("  Reasoning:  Rule-based scoring");
    println!("  Action:     Recommendations + ticket payload");
    println!(
        "  Narrative:  {}",
        if config.narrative_available() {
            "available"
        } else {
            "not configured"
        }
    );
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config.redacted_summary())
            .context("failed to serialize config summary")?
    );
    Ok(())
}
