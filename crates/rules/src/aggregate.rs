//! Metric aggregation: reduce time-ordered runs to flat summary statistics.
//!
//! For every tracked metric with at least one numeric value:
//! - `{metric}_mean`: mean of the last 6 values
//! - `{metric}_p95`: 95th percentile of the last 20 values, or the max when fewer than 20 exist
//! - `{metric}_last`: most recent value
//!
//! Metrics without numeric values contribute no keys at all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use triage_core::{RunTable, TRACKED_METRICS};

/// Number of most recent values averaged into `_mean`.
pub const MEAN_WINDOW: usize = 6;
/// Number of most recent values the percentile is taken over.
pub const P95_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Mean,
    P95,
    Last,
}

impl Stat {
    pub fn suffix(&self) -> &'static str {
        match self {
            Stat::Mean => "mean",
            Stat::P95 => "p95",
            Stat::Last => "last",
        }
    }
}

/// `"{metric}_{stat}"` -> value. Absence of a key is the "no data" signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateSet(BTreeMap<String, f64>);

impl AggregateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(metric: &str, stat: Stat) -> String {
        format!("{}_{}", metric, stat.suffix())
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn stat(&self, metric: &str, stat: Stat) -> Option<f64> {
        self.get(&Self::key(metric, stat))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for AggregateSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Aggregate every tracked metric present in the table. Never fails.
pub fn aggregate(table: &RunTable) -> AggregateSet {
    let mut agg = AggregateSet::new();

    for metric in TRACKED_METRICS {
        if !table.has_column(metric) {
            continue;
        }

        let values = table.numeric_column(metric);
        let Some(&last) = values.last() else {
            debug!(metric, "No numeric values, skipping");
            continue;
        };

        let mean = mean(tail(&values, MEAN_WINDOW));
        let p95 = if values.len() >= P95_WINDOW {
            percentile_linear(tail(&values, P95_WINDOW), 0.95).unwrap_or(last)
        } else {
            max(&values)
        };

        debug!(metric, mean, p95, last, samples = values.len(), "Aggregated metric");

        agg.insert(AggregateSet::key(metric, Stat::Mean), mean);
        agg.insert(AggregateSet::key(metric, Stat::P95), p95);
        agg.insert(AggregateSet::key(metric, Stat::Last), last);
    }

    agg
}

fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Percentile with linear interpolation between closest ranks:
/// position `p * (n - 1)` over the sorted values. None for empty input.
pub fn percentile_linear(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !p.is_finite() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let p = p.clamp(0.0, 1.0);
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{FieldValue, RunRecord};

    fn table(metric: &str, values: &[FieldValue]) -> RunTable {
        RunTable::from_records(values.iter().map(|v| {
            let mut r = RunRecord::new();
            r.insert(metric.to_string(), v.clone());
            r
        }))
    }

    fn floats(metric: &str, values: impl IntoIterator<Item = f64>) -> RunTable {
        let cells: Vec<FieldValue> = values.into_iter().map(FieldValue::Float).collect();
        table(metric, &cells)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_table_has_no_aggregates() {
        assert!(aggregate(&RunTable::default()).is_empty());
    }

    #[test]
    fn mean_uses_last_six_values() {
        let agg = aggregate(&floats("cost_usd", [100.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        assert!(approx(agg.get("cost_usd_mean").unwrap(), 3.5));
        assert_eq!(agg.get("cost_usd_last"), Some(6.0));
    }

    #[test]
    fn mean_with_fewer_than_six_uses_all() {
        let agg = aggregate(&floats("rows_out", [100.0, 50.0]));
        assert!(approx(agg.get("rows_out_mean").unwrap(), 75.0));
    }

    #[test]
    fn p95_falls_back_to_max_below_twenty_values() {
        let agg = aggregate(&floats("duration_min", [10.0, 40.0, 12.0, 11.0]));
        assert_eq!(agg.get("duration_min_p95"), Some(40.0));
    }

    #[test]
    fn p95_interpolates_over_last_twenty() {
        // 1..=25: the window is 6..=25, position 0.95 * 19 = 18.05 -> 24.05
        let agg = aggregate(&floats("duration_min", (1..=25).map(f64::from)));
        assert!(approx(agg.get("duration_min_p95").unwrap(), 24.05));

        let agg = aggregate(&floats("duration_min", (1..=20).map(f64::from)));
        assert!(approx(agg.get("duration_min_p95").unwrap(), 19.05));
    }

    #[test]
    fn malformed_cells_are_missing_not_zero() {
        let agg = aggregate(&table(
            "fail_rate",
            &[
                FieldValue::Float(0.02),
                FieldValue::Text("error".into()),
                FieldValue::Text("0.04".into()),
                FieldValue::Null,
            ],
        ));
        assert!(approx(agg.get("fail_rate_mean").unwrap(), 0.03));
        assert_eq!(agg.get("fail_rate_last"), Some(0.04));
    }

    #[test]
    fn column_without_numbers_emits_no_keys() {
        let agg = aggregate(&table("null_rate", &[FieldValue::Text("?".into())]));
        assert!(!agg.contains("null_rate_last"));
        assert!(agg.is_empty());
    }

    #[test]
    fn untracked_columns_are_ignored() {
        let agg = aggregate(&floats("latency_ms", [1.0, 2.0]));
        assert!(agg.is_empty());
    }

    #[test]
    fn percentile_linear_edges() {
        assert_eq!(percentile_linear(&[], 0.95), None);
        assert_eq!(percentile_linear(&[7.0], 0.95), Some(7.0));
        assert_eq!(percentile_linear(&[3.0, 1.0, 2.0], 0.5), Some(2.0));
        assert_eq!(percentile_linear(&[1.0, 2.0], 1.0), Some(2.0));
    }
}
