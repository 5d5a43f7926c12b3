//! Error type shared by the dataset layer and the statistical engine
//!
//! Degenerate numeric situations (no observations, zero variance, a single
//! category) are NOT errors: they surface as `Estimate::Undefined`. Errors
//! are reserved for lookups and usage mistakes.

use crate::dataset::ColumnKind;
use thiserror::Error;

/// Errors raised by dataset access and engine operations
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column '{column}' has kind {kind}, which {operation} does not support")]
    UnsupportedColumnKind {
        column: String,
        kind: ColumnKind,
        operation: &'static str,
    },

    #[error("Level '{level}' does not occur in column '{column}'")]
    UnknownLevel { column: String, level: String },

    #[error("Column '{column}' is not a binary 0/1 outcome (found {value})")]
    NotBinary { column: String, value: f64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Computation failed: {0}")]
    Computation(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the library
pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_not_found_message() {
        let err = StatsError::ColumnNotFound("adr".to_string());
        assert_eq!(err.to_string(), "Column not found: adr");
    }

    #[test]
    fn test_unsupported_kind_message() {
        let err = StatsError::UnsupportedColumnKind {
            column: "reservation_status_date".to_string(),
            kind: ColumnKind::Date,
            operation: "feature importance",
        };
        let msg = err.to_string();
        assert!(msg.contains("reservation_status_date"));
        assert!(msg.contains("date"));
        assert!(msg.contains("feature importance"));
    }
}
