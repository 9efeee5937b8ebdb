//! Plain-text rendering of a triage report for the terminal.

use std::fmt::Write;

use serde::Serialize;
use triage_rules::TriageReport;

/// JSON output of `analyze --format json`: the report plus the optional narrative.
#[derive(Serialize)]
pub struct AnalyzeOutput<'a> {
    #[serde(flatten)]
    pub report: &'a TriageReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<&'a str>,
}

pub fn render_text(
    report: &TriageReport,
    narrative: Option<&str>,
    narrative_available: bool,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "Pipeline: {}", report.pipeline)?;
    writeln!(
        out,
        "Severity: {}   Score: {}   Findings: {}",
        report.severity,
        report.score,
        report.findings.len()
    )?;

    writeln!(out, "\nFindings")?;
    if report.findings.is_empty() {
        writeln!(out, "No major issues detected.")?;
    }
    for finding in &report.findings {
        writeln!(out, "- {}", finding)?;
    }

    writeln!(out, "\nRecommended actions")?;
    for action in &report.actions {
        writeln!(out, "- {}", action)?;
    }

    match narrative {
        Some(text) => {
            writeln!(out, "\nAI Narrative")?;
            writeln!(out, "{}", text)?;
        }
        None if !narrative_available => {
            writeln!(out, "\nTip: set AZURE_OPENAI_* to enable AI narratives.")?;
        }
        None => {}
    }

    writeln!(out, "\nTicket payload")?;
    let ticket = serde_json::to_string_pretty(&report.ticket).map_err(|_| std::fmt::Error)?;
    writeln!(out, "{}", ticket)?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{FieldValue, RunRecord, RunTable};
    use triage_rules::run_triage;

    fn report(fail_rate: Option<f64>) -> TriageReport {
        let mut record = RunRecord::new();
        if let Some(rate) = fail_rate {
            record.insert("fail_rate".into(), FieldValue::Float(rate));
        }
        run_triage("orders_etl", &RunTable::from_records(vec![record]))
    }

    #[test]
    fn clean_run_says_no_issues_and_hints_setup() {
        let text = render_text(&report(None), None, false).unwrap();
        assert!(text.contains("Severity: LOW   Score: 0   Findings: 0"));
        assert!(text.contains("Findings\nNo major issues detected.\n"));
        assert!(text.contains("Tip: set AZURE_OPENAI_*"));
        assert!(text.contains("\"summary\": \"[LOW] Data incident in pipeline: orders_etl\""));
    }

    #[test]
    fn findings_and_narrative_are_listed() {
        let text = render_text(&report(Some(0.08)), Some("Summary\nRunbook:"), true).unwrap();
        assert!(text.contains("- High failure rate: 8.00%\n"));
        assert!(text.contains("\nAI Narrative\nSummary\nRunbook:\n"));
        assert!(!text.contains("Tip:"));
        assert!(!text.contains("No major issues"));
    }

    #[test]
    fn json_output_flattens_report() {
        let report = report(Some(0.08));
        let json = serde_json::to_value(AnalyzeOutput {
            report: &report,
            narrative: None,
        })
        .unwrap();
        assert_eq!(json["severity"], "MEDIUM");
        assert_eq!(json["score"], 3);
        assert_eq!(json["ticket"]["priority"], "P2");
        assert!(json.get("narrative").is_none());
    }
}
