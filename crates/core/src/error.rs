use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid run table: {0}")]
    InvalidTable(String),

    #[error("Unknown severity: '{0}' (expected LOW, MEDIUM or HIGH)")]
    UnknownSeverity(String),
}
