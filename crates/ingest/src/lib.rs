//! Run-table loaders.
//!
//! - CSV through Arrow's CSV reader, every column read as text
//! - JSON arrays of run objects (or `{ "runs": [...] }`)
//!
//! Loaders never coerce cells; malformed metric values survive as text and
//! are treated as missing by the aggregator.

pub mod csv_import;
pub mod json_import;

use std::path::Path;

use triage_core::{RunTable, TriageError};

pub use csv_import::CsvImporter;
pub use json_import::JsonImporter;

/// Load a run table, choosing the importer from the file extension.
pub fn load_table(path: &Path) -> Result<RunTable, TriageError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("csv") => CsvImporter::import(path),
        Some("json") => JsonImporter::import(path),
        _ => Err(TriageError::UnsupportedFormat(format!(
            "{} (expected .csv or .json)",
            path.display()
        ))),
    }
}
