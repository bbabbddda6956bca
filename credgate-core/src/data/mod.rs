//! Tabular data model and CSV ingestion.

pub mod dataset;
pub mod schema;
pub mod source;

pub use dataset::{Column, Dataset, Scalar};
pub use schema::{ColumnType, MODEL_CATEGORICAL_COLS, MODEL_NUMERIC_COLS};
pub use source::{CsvOptions, ScoredRows, load_csv, load_scored, read_csv};
