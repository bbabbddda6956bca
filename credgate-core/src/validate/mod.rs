//! Data-quality validation gate: schema, distribution, missingness, range and
//! leakage checks over a [`Dataset`](crate::data::Dataset).

pub mod columns;
pub mod engine;
pub mod leakage;
pub mod report;
pub mod rules;

pub use columns::ColumnSpec;
pub use engine::{DEFAULT_MISSINGNESS_THRESHOLD, ValidationEngine, validate};
pub use leakage::{LEAKAGE_KEYWORDS_V1, LeakageKeywordSet, scan_leakage};
pub use report::{Check, HighMissing, ValidationReport};
pub use rules::{Rule, RuleOutcome};
