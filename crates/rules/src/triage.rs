//! Full triage run: aggregate → score → recommend → ticket.

use serde::{Deserialize, Serialize};
use tracing::info;
use triage_core::{Incident, RunTable, Severity, TicketPayload, TriageError};

use crate::actions::recommend;
use crate::aggregate::{aggregate, AggregateSet};
use crate::scoring::score;
use crate::ticket::{build_ticket, build_ticket_from_label};

/// Everything one triage run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageReport {
    pub pipeline: String,
    pub aggregates: AggregateSet,
    pub severity: Severity,
    pub score: u32,
    pub findings: Vec<String>,
    pub actions: Vec<String>,
    pub ticket: TicketPayload,
}

/// Severity stays a plain string here so that a hand-edited report with an
/// out-of-domain label reaches the ticket guard instead of a serde error.
#[derive(Debug, Deserialize)]
struct SavedReport {
    pipeline: String,
    severity: String,
    #[serde(default)]
    findings: Vec<String>,
    #[serde(default)]
    actions: Vec<String>,
}

pub fn run_triage(pipeline: &str, table: &RunTable) -> TriageReport {
    let aggregates = aggregate(table);
    let Incident {
        severity,
        score,
        findings,
    } = score(&aggregates);
    let actions = recommend(severity, &findings);
    let ticket = build_ticket(pipeline, severity, &findings, &actions);

    info!(
        pipeline,
        runs = table.len(),
        %severity,
        score,
        findings = findings.len(),
        actions = actions.len(),
        "Triage complete"
    );

    TriageReport {
        pipeline: pipeline.to_string(),
        aggregates,
        severity,
        score,
        findings,
        actions,
        ticket,
    }
}

impl TriageReport {
    pub fn incident(&self) -> Incident {
        Incident {
            severity: self.severity,
            score: self.score,
            findings: self.findings.clone(),
        }
    }

    /// Rebuild the ticket from a serialized report.
    pub fn ticket_from_json(json: &str) -> Result<TicketPayload, TriageError> {
        let saved: SavedReport = serde_json::from_str(json)?;
        build_ticket_from_label(&saved.pipeline, &saved.severity, &saved.findings, &saved.actions)
    }
}
