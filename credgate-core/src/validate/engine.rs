//! Runs the rule battery and assembles the report.

use crate::config::ValidationConfig;
use crate::data::Dataset;
use crate::validate::columns::ColumnSpec;
use crate::validate::leakage::LeakageKeywordSet;
use crate::validate::report::ValidationReport;
use crate::validate::rules::{Rule, RuleContext, RuleOutcome};
use rayon::prelude::*;

pub const DEFAULT_MISSINGNESS_THRESHOLD: f64 = 0.80;
pub const DEFAULT_MISSING_COLS_CAP: usize = 100;

/// The data-quality gate.
///
/// Stateless apart from its configuration; a single engine can validate any
/// number of datasets, from any thread.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    columns: ColumnSpec,
    keywords: LeakageKeywordSet,
    missing_cols_cap: usize,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(ColumnSpec::default(), LeakageKeywordSet::v1())
    }
}

impl ValidationEngine {
    pub fn new(columns: ColumnSpec, keywords: LeakageKeywordSet) -> Self {
        Self {
            columns,
            keywords,
            missing_cols_cap: DEFAULT_MISSING_COLS_CAP,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.columns.clone(), config.leakage_keywords.clone())
            .with_missing_cols_cap(config.missing_cols_cap)
    }

    pub fn with_missing_cols_cap(mut self, cap: usize) -> Self {
        self.missing_cols_cap = cap;
        self
    }

    pub fn columns(&self) -> &ColumnSpec {
        &self.columns
    }

    /// Validate `dataset`. Never fails: rules whose column is absent are skipped.
    ///
    /// Rules are evaluated in parallel and merged in [`Rule::ALL`] order, so the
    /// report is identical for identical inputs.
    pub fn validate(&self, dataset: &Dataset, missingness_threshold: f64) -> ValidationReport {
        let ctx = RuleContext {
            dataset,
            columns: &self.columns,
            keywords: &self.keywords,
            missingness_threshold,
            missing_cols_cap: self.missing_cols_cap,
        };

        let outcomes: Vec<(Rule, Option<RuleOutcome>)> = Rule::ALL
            .par_iter()
            .map(|rule| (*rule, rule.evaluate(&ctx)))
            .collect();

        let (checks, warnings) = outcomes.into_iter().fold(
            (Vec::new(), Vec::new()),
            |(mut checks, mut warnings), (rule, outcome)| {
                match outcome {
                    Some(outcome) => {
                        tracing::debug!(
                            rule = rule.name(),
                            warned = outcome.warning.is_some(),
                            "Rule evaluated"
                        );
                        checks.extend(outcome.checks);
                        warnings.extend(outcome.warning);
                    }
                    None => tracing::debug!(rule = rule.name(), "Rule skipped, column absent"),
                }
                (checks, warnings)
            },
        );

        tracing::info!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            warnings = warnings.len(),
            "Dataset validation complete"
        );

        ValidationReport::new(checks, warnings)
    }
}

/// Validate with the default Home Credit column spec and keyword set.
pub fn validate(dataset: &Dataset, missingness_threshold: f64) -> ValidationReport {
    ValidationEngine::default().validate(dataset, missingness_threshold)
}
