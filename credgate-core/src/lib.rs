//! # credgate-core
//!
//! Two independent, pure components for a credit-risk scoring workflow:
//!
//! 1. **Validation gate** ([`validate`]): a fixed battery of schema,
//!    distribution, missingness, range and leakage checks over a tabular
//!    [`Dataset`], producing an immutable [`ValidationReport`].
//! 2. **Threshold optimizer** ([`threshold`]): picks the decision threshold
//!    that minimizes an asymmetric misclassification cost over a grid of
//!    candidates.
//!
//! The components share no state and may run in any order or in parallel.
//! CSV ingestion ([`data::source`]) and layered configuration ([`config`])
//! sit around them.

pub mod config;
pub mod data;
pub mod error;
pub mod threshold;
pub mod validate;

// Re-exports
pub use config::{CredgateConfig, load_config};
pub use data::{Column, Dataset, Scalar};
pub use error::{ConfigError, CredgateError, Result, SchemaError, ThresholdError};
pub use threshold::{Confusion, CostModel, SearchStrategy, ThresholdOptimizer, ThresholdResult};
pub use validate::{ColumnSpec, LeakageKeywordSet, ValidationEngine, ValidationReport};
