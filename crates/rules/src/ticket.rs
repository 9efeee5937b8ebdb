use triage_core::{Priority, Severity, TicketPayload, TriageError};

pub const TICKET_LABELS: [&str; 3] = ["dataops", "incident", "agentic"];

pub fn build_ticket(
    pipeline: &str,
    severity: Severity,
    findings: &[String],
    actions: &[String],
) -> TicketPayload {
    TicketPayload {
        title: format!("[{}] Data incident in pipeline: {}", severity, pipeline),
        description: render_description(severity, findings, actions),
        labels: TICKET_LABELS.iter().map(|l| l.to_string()).collect(),
        priority: Priority::from(severity),
    }
}

/// Like [`build_ticket`], for a severity arriving as text. Anything other
/// than LOW, MEDIUM or HIGH is rejected rather than mapped to a default priority.
pub fn build_ticket_from_label(
    pipeline: &str,
    severity: &str,
    findings: &[String],
    actions: &[String],
) -> Result<TicketPayload, TriageError> {
    let severity: Severity = severity.parse()?;
    Ok(build_ticket(pipeline, severity, findings, actions))
}

fn render_description(severity: Severity, findings: &[String], actions: &[String]) -> String {
    let mut lines = vec![format!("Severity: {}", severity), String::new(), "Findings:".to_string()];
    lines.extend(findings.iter().map(|f| format!("- {}", f)));
    lines.push(String::new());
    lines.push("Recommended actions:".to_string());
    lines.extend(actions.iter().map(|a| format!("- {}", a)));
    lines.join("\n")
}
