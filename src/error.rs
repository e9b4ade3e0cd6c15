use std::path::PathBuf;

use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A field value was not a scalar. This is a caller defect, not a data-quality issue.
    #[error("expected a scalar field value, got {kind}")]
    NonScalarValue { kind: &'static str },

    #[error("no recognizable columns in {path}")]
    NoRecognizedColumns { path: PathBuf },

    #[error("file contains no header row: {path}")]
    EmptyInput { path: PathBuf },

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("unmapped canonical fields: {}", .fields.join(", "))]
    UnmappedFields { fields: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_fields_display() {
        let err = Error::UnmappedFields {
            fields: vec!["sex".to_string(), "band".to_string()],
        };
        assert_eq!(err.to_string(), "unmapped canonical fields: sex, band");
    }

    #[test]
    fn test_non_scalar_display() {
        let err = Error::NonScalarValue { kind: "array" };
        assert_eq!(err.to_string(), "expected a scalar field value, got array");
    }
}
