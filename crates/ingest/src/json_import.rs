use std::path::Path;

use serde_json::Value;
use triage_core::{FieldValue, RunRecord, RunTable, TriageError};
use tracing::info;

pub struct JsonImporter;

impl JsonImporter {
    pub fn import(path: &Path) -> Result<RunTable, TriageError> {
        let content = std::fs::read_to_string(path)?;
        let table = Self::from_str(&content)?;
        info!("Imported {} runs from {}", table.len(), path.display());
        Ok(table)
    }

    /// Accepts `[{...}, ...]` or `{"runs": [{...}, ...]}`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<RunTable, TriageError> {
        let runs = match serde_json::from_str::<Value>(input)? {
            Value::Array(items) => items,
            Value::Object(mut obj) => match obj.remove("runs") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(TriageError::InvalidTable(
                        "expected a \"runs\" array".to_string(),
                    ))
                }
            },
            _ => {
                return Err(TriageError::InvalidTable(
                    "expected an array of run objects".to_string(),
                ))
            }
        };

        let mut table = RunTable::default();
        for (idx, run) in runs.into_iter().enumerate() {
            let Value::Object(fields) = run else {
                return Err(TriageError::InvalidTable(format!(
                    "run #{idx} is not an object"
                )));
            };
            let record: RunRecord = fields
                .into_iter()
                .map(|(k, v)| (k, field_value(v)))
                .collect();
            table.push(record);
        }
        Ok(table)
    }
}

fn field_value(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Boolean(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null),
        },
        Value::String(s) => FieldValue::Text(s),
        other => FieldValue::Text(other.to_string()),
    }
}
