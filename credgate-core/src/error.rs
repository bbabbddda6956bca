//! Error types for the credgate core library.
//!
//! Uses `thiserror` for public API error types. Validation itself never fails
//! on a constructed [`Dataset`](crate::data::Dataset); errors come from
//! building the table, from optimizer preconditions, and from configuration.

use std::path::PathBuf;

/// Top-level error type for the credgate core library.
#[derive(Debug, thiserror::Error)]
pub enum CredgateError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Threshold error: {0}")]
    Threshold(#[from] ThresholdError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The input cannot be interpreted as a table.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset has no header row")]
    EmptyHeader,

    #[error("Duplicate column name: {name}")]
    DuplicateColumn { name: String },

    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column '{name}' mixes numeric and text values")]
    MixedColumn { name: String },

    #[error("Column not found: {name}")]
    MissingColumn { name: String },
}

/// Precondition failures of the threshold optimizer.
///
/// Every variant is reported before any threshold is evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("Label and probability sequences must not be empty")]
    EmptyInput,

    #[error("Length mismatch: {labels} labels vs {probabilities} probabilities")]
    InputMismatch { labels: usize, probabilities: usize },

    #[error("Grid size must be at least 1, got {grid_size}")]
    InvalidGrid { grid_size: usize },

    #[error("Value out of range at index {index}: {message}")]
    InvalidRange { index: usize, message: String },

    #[error("Invalid cost model: {message}")]
    InvalidCost { message: String },

    #[error("Labels contain a single class ({class}); threshold would be uninformative")]
    SingleClass { class: u8 },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CredgateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_error_display() {
        let err = ThresholdError::InputMismatch {
            labels: 3,
            probabilities: 4,
        };
        assert_eq!(
            err.to_string(),
            "Length mismatch: 3 labels vs 4 probabilities"
        );
    }

    #[test]
    fn test_wraps_into_top_level() {
        let err: CredgateError = ThresholdError::InvalidGrid { grid_size: 0 }.into();
        assert!(matches!(
            err,
            CredgateError::Threshold(ThresholdError::InvalidGrid { grid_size: 0 })
        ));
        assert_eq!(
            err.to_string(),
            "Threshold error: Grid size must be at least 1, got 0"
        );
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::RaggedColumn {
            name: "AMT_CREDIT".into(),
            expected: 10,
            actual: 9,
        };
        assert_eq!(
            err.to_string(),
            "Column 'AMT_CREDIT' has 9 rows, expected 10"
        );
    }
}
