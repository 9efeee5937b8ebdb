use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, StringArray};
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use triage_core::{FieldValue, RunRecord, RunTable, TriageError};
use tracing::{debug, info};

pub struct CsvImporter;

impl CsvImporter {
    pub fn import(path: &Path) -> Result<RunTable, TriageError> {
        let file = std::fs::File::open(path).map_err(TriageError::Io)?;
        let table = Self::from_reader(file)?;
        info!("Imported {} runs from {}", table.len(), path.display());
        Ok(table)
    }

    /// Parse CSV with a header row. The schema is forced to nullable UTF-8 for
    /// every column so a stray "n/a" in a numeric column cannot fail the read.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<RunTable, TriageError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!("Empty CSV input");
            return Ok(RunTable::default());
        }

        let (header, _) = Format::default()
            .with_header(true)
            .infer_schema(bytes.as_slice(), Some(0))
            .map_err(|e| TriageError::Csv(e.to_string()))?;

        let fields: Vec<Field> = header
            .fields()
            .iter()
            .map(|f| Field::new(f.name().trim(), DataType::Utf8, true))
            .collect();
        let columns: Vec<String> = fields.iter().map(|f| f.name().clone()).collect();
        let schema = Arc::new(Schema::new(fields));

        let csv_reader = ReaderBuilder::new(schema)
            .with_header(true)
            .with_truncated_rows(true)
            .build(bytes.as_slice())
            .map_err(|e| TriageError::Csv(e.to_string()))?;

        let mut table = RunTable::new(columns.clone());

        for batch_result in csv_reader {
            let batch = batch_result.map_err(|e| TriageError::Csv(e.to_string()))?;
            let num_rows = batch.num_rows();

            let arrays: Vec<(&str, &StringArray)> = columns
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    batch
                        .column(i)
                        .as_any()
                        .downcast_ref::<StringArray>()
                        .map(|arr| (name.as_str(), arr))
                })
                .collect();

            for row_idx in 0..num_rows {
                let mut record = RunRecord::new();
                for &(name, arr) in &arrays {
                    if arr.is_null(row_idx) {
                        continue;
                    }
                    record.insert(
                        name.to_string(),
                        FieldValue::Text(arr.value(row_idx).to_string()),
                    );
                }
                table.push(record);
            }
        }

        Ok(table)
    }
}
