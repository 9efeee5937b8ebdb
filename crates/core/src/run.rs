use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Numeric run metrics the triage pipeline reads. Any other column is carried but ignored.
pub const TRACKED_METRICS: [&str; 6] = [
    "duration_min",
    "rows_in",
    "rows_out",
    "fail_rate",
    "null_rate",
    "cost_usd",
];

/// A raw table cell. Loaders keep whatever type the source had; numeric
/// coercion happens at aggregation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl FieldValue {
    /// Extract as string, returning None for non-text values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Lenient numeric coercion. Anything that does not parse, and NaN,
    /// comes back as None so it counts as missing rather than zero.
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Integer(i) => *i as f64,
            FieldValue::Float(f) => *f,
            FieldValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            FieldValue::Null => return None,
        };
        (!value.is_nan()).then_some(value)
    }
}

/// One pipeline run: column name -> raw cell.
pub type RunRecord = HashMap<String, FieldValue>;

/// Time-ordered runs of a pipeline, most recent last.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunTable {
    columns: Vec<String>,
    rows: Vec<RunRecord>,
}

impl RunTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from records, collecting columns in first-seen order.
    pub fn from_records(records: impl IntoIterator<Item = RunRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            table.push(record);
        }
        table
    }

    /// Append a run. Keys not seen before are registered as columns.
    pub fn push(&mut self, record: RunRecord) {
        let mut new_columns: Vec<&String> = record
            .keys()
            .filter(|k| !self.columns.contains(k))
            .collect();
        new_columns.sort();
        let new_columns: Vec<String> = new_columns.into_iter().cloned().collect();
        self.columns.extend(new_columns);
        self.rows.push(record);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RunRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Non-missing numeric values of a column, in run order.
    pub fn numeric_column(&self, name: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(name).and_then(FieldValue::to_f64))
            .collect()
    }
}
