//! End-to-end triage scenarios: CSV text → report.

use triage_core::{Priority, RunTable, Severity};
use triage_ingest::CsvImporter;
use triage_rules::actions::SEV1_PAGE;
use triage_rules::{aggregate, recommend, run_triage, score, AggregateSet, BASE_PLAYBOOK};

fn csv(text: &str) -> RunTable {
    CsvImporter::from_reader(text.as_bytes()).unwrap()
}

// ── empty table ─────────────────────────────────────────────

#[test]
fn empty_table_yields_baseline_only() {
    let agg = aggregate(&RunTable::default());
    assert!(agg.is_empty());

    let incident = score(&agg);
    assert_eq!(incident.severity, Severity::Low);
    assert_eq!(incident.score, 0);
    assert!(incident.findings.is_empty());

    assert_eq!(recommend(incident.severity, &incident.findings), BASE_PLAYBOOK.to_vec());
}

#[test]
fn header_only_csv_is_low() {
    let report = run_triage("orders_etl", &csv("timestamp,fail_rate,rows_out\n"));
    assert!(report.aggregates.is_empty());
    assert_eq!(report.severity, Severity::Low);
    assert_eq!(report.actions, BASE_PLAYBOOK.to_vec());
    assert_eq!(report.ticket.priority, Priority::P3);
}

// ── failure spike ───────────────────────────────────────────

#[test]
fn failure_spike_scenario() {
    let table = csv("pipeline,fail_rate\norders_etl,0.08\n");
    let agg = aggregate(&table);
    assert_eq!(agg.get("fail_rate_last"), Some(0.08));

    let incident = score(&[("fail_rate_last", 0.08)].into_iter().collect::<AggregateSet>());
    assert_eq!(incident.score, 3);
    assert_eq!(incident.severity, Severity::Medium);
    assert_eq!(incident.findings, vec!["High failure rate: 8.00%"]);

    let actions = recommend(incident.severity, &incident.findings);
    assert_eq!(actions.len(), 6);
    assert!(actions.contains(&"Open error logs; identify predominant exception signature.".to_string()));
    for step in BASE_PLAYBOOK {
        assert!(actions.iter().any(|a| a == step));
    }
}

// ── rows-out drop + fail rate ───────────────────────────────

#[test]
fn rows_out_drop_with_failures_is_high() {
    let agg: AggregateSet = [
        ("fail_rate_last", 0.06),
        ("rows_out_last", 50.0),
        ("rows_out_mean", 100.0),
    ]
    .into_iter()
    .collect();

    let incident = score(&agg);
    assert_eq!(incident.score, 6);
    assert_eq!(incident.severity, Severity::High);

    let actions = recommend(incident.severity, &incident.findings);
    assert_eq!(actions[0], SEV1_PAGE);
}

#[test]
fn realistic_history_with_spike_on_last_run() {
    let mut text = String::from(
        "timestamp,pipeline,run_id,duration_min,rows_in,rows_out,fail_rate,null_rate,cost_usd\n",
    );
    for day in 1..=24 {
        text.push_str(&format!(
            "2025-06-{day:02},orders_etl,r{day},{},1000,990,0.01,0.02,4.00\n",
            10 + day % 3
        ));
    }
    text.push_str("2025-06-25,orders_etl,r25,30,1000,300,0.07,0.15,9.00\n");

    let report = run_triage("orders_etl", &csv(&text));

    assert_eq!(report.score, 11);
    assert_eq!(report.severity, Severity::High);
    assert_eq!(
        report.findings,
        vec![
            "High failure rate: 7.00%",
            "Rows out dropped vs mean: 300 < 60% of 875",
            "High null rate: 15.00%",
            "Run duration spiked beyond p95: 30.0m",
            "Cost spike vs mean: $9.00",
        ]
    );
    assert_eq!(report.actions[0], SEV1_PAGE);
    assert_eq!(report.actions.len(), 1 + 4 + BASE_PLAYBOOK.len());
    assert_eq!(report.ticket.title, "[HIGH] Data incident in pipeline: orders_etl");
}

// ── robustness ──────────────────────────────────────────────

#[test]
fn missing_columns_only_fire_present_rules() {
    let report = run_triage("p", &csv("run_id,cost_usd\nr1,1.0\nr2,1.0\nr3,9.0\n"));
    assert_eq!(report.score, 1);
    assert_eq!(report.findings, vec!["Cost spike vs mean: $9.00"]);
    assert!(report.aggregates.get("fail_rate_last").is_none());
}

#[test]
fn malformed_cells_are_ignored() {
    let report = run_triage("p", &csv("fail_rate\n0.01\nnot-a-number\n\n"));
    assert_eq!(report.aggregates.get("fail_rate_last"), Some(0.01));
    assert_eq!(report.severity, Severity::Low);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let text = "rows_out,fail_rate,duration_min\n100,0.01,10\n40,0.2,30\n";
    let first = serde_json::to_string(&run_triage("p", &csv(text))).unwrap();
    let second = serde_json::to_string(&run_triage("p", &csv(text))).unwrap();
    assert_eq!(first, second);
}
