//! Remediation actions: condition-triggered steps ahead of the baseline playbook.

use std::collections::HashSet;

use triage_core::Severity;

pub const SEV1_PAGE: &str = "SEV-1 bridge: page on-call DataOps immediately.";

/// Always appended after the conditional actions, in this order.
pub const BASE_PLAYBOOK: [&str; 5] = [
    "Pause downstream consumers for this pipeline until validated.",
    "Re-run latest job with DEBUG logging on a small sample.",
    "Validate upstream source schema (columns added/removed/changed).",
    "Check recent deployment changes (last 24–48h) affecting this pipeline.",
    "Backfill missing partitions once root cause is fixed.",
];

/// A finding-driven action. Fires when any finding contains any needle
/// (case-insensitive).
struct FindingTrigger {
    needles: &'static [&'static str],
    action: &'static str,
}

const FINDING_TRIGGERS: [FindingTrigger; 5] = [
    FindingTrigger {
        needles: &["schema"],
        action: "Run automated schema diff against baseline; enforce contracts.",
    },
    FindingTrigger {
        needles: &["null rate"],
        action: "Quarantine affected rows; add NULL handling or source fix.",
    },
    FindingTrigger {
        needles: &["rows out dropped"],
        action: "Check filters/joins; verify late-arriving data and partition pruning.",
    },
    FindingTrigger {
        needles: &["failure rate"],
        action: "Open error logs; identify predominant exception signature.",
    },
    FindingTrigger {
        needles: &["duration", "cost"],
        action: "Review cluster/warehouse sizing; consider off-peak scheduling.",
    },
];

/// Build the action plan for an incident. Never empty.
pub fn recommend(severity: Severity, findings: &[String]) -> Vec<String> {
    let lowered: Vec<String> = findings.iter().map(|f| f.to_lowercase()).collect();

    let mut actions: Vec<&str> = Vec::new();
    if severity == Severity::High {
        actions.push(SEV1_PAGE);
    }
    for trigger in &FINDING_TRIGGERS {
        let hit = lowered
            .iter()
            .any(|f| trigger.needles.iter().any(|n| f.contains(n)));
        if hit {
            actions.push(trigger.action);
        }
    }

    dedup_case_insensitive(actions.into_iter().chain(BASE_PLAYBOOK))
}

/// Keep the first occurrence of each step, comparing case-insensitively.
fn dedup_case_insensitive<'a>(steps: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    steps
        .into_iter()
        .filter(|step| seen.insert(step.to_lowercase()))
        .map(str::to_string)
        .collect()
}
