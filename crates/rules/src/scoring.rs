//! Severity scoring over an [`AggregateSet`].
//!
//! Rules live in [`RULES`] as data and are evaluated uniformly, in order.
//! Each rule fires independently and adds its points; a rule whose keys are
//! missing from the aggregate set is skipped.

use tracing::debug;
use triage_core::{Incident, Severity};

use crate::aggregate::AggregateSet;

/// One threshold rule.
///
/// `fires` and `finding` receive the values of `keys`, in the same order.
pub struct ThresholdRule {
    pub id: &'static str,
    pub keys: &'static [&'static str],
    pub points: u32,
    pub fires: fn(&[f64]) -> bool,
    pub finding: fn(&[f64]) -> String,
}

impl ThresholdRule {
    /// Returns the finding when every key is present and the condition holds.
    pub fn evaluate(&self, agg: &AggregateSet) -> Option<String> {
        let values: Vec<f64> = self
            .keys
            .iter()
            .map(|k| agg.get(k))
            .collect::<Option<_>>()?;
        (self.fires)(&values).then(|| (self.finding)(&values))
    }
}

impl std::fmt::Debug for ThresholdRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThresholdRule")
            .field("id", &self.id)
            .field("keys", &self.keys)
            .field("points", &self.points)
            .finish()
    }
}

pub static RULES: [ThresholdRule; 5] = [
    ThresholdRule {
        id: "high_fail_rate",
        keys: &["fail_rate_last"],
        points: 3,
        fires: |v| v[0] > 0.05,
        finding: |v| format!("High failure rate: {:.2}%", v[0] * 100.0),
    },
    ThresholdRule {
        id: "rows_out_drop",
        keys: &["rows_out_last", "rows_out_mean"],
        points: 3,
        fires: |v| v[0] < 0.6 * v[1],
        finding: |v| format!("Rows out dropped vs mean: {:.0} < 60% of {:.0}", v[0], v[1]),
    },
    ThresholdRule {
        id: "high_null_rate",
        keys: &["null_rate_last"],
        points: 2,
        fires: |v| v[0] > 0.10,
        finding: |v| format!("High null rate: {:.2}%", v[0] * 100.0),
    },
    ThresholdRule {
        id: "duration_spike",
        keys: &["duration_min_last", "duration_min_p95"],
        points: 2,
        fires: |v| v[0] > 1.3 * v[1],
        finding: |v| format!("Run duration spiked beyond p95: {:.1}m", v[0]),
    },
    ThresholdRule {
        id: "cost_spike",
        keys: &["cost_usd_last", "cost_usd_mean"],
        points: 1,
        fires: |v| v[0] > 1.5 * v[1],
        finding: |v| format!("Cost spike vs mean: ${:.2}", v[0]),
    },
];

/// Score an aggregate set into severity, points and findings.
pub fn score(agg: &AggregateSet) -> Incident {
    let mut score = 0;
    let mut findings = Vec::new();

    for rule in &RULES {
        if let Some(finding) = rule.evaluate(agg) {
            debug!(rule = rule.id, points = rule.points, %finding, "Rule fired");
            score += rule.points;
            findings.push(finding);
        }
    }

    Incident {
        severity: Severity::from_score(score),
        score,
        findings,
    }
}
