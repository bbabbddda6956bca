//! The fixed rule battery.
//!
//! Each rule reads the dataset independently and returns `None` when its
//! precondition (usually the presence of one column) is not met.

use crate::data::{Column, Dataset};
use crate::validate::columns::ColumnSpec;
use crate::validate::leakage::{LeakageKeywordSet, scan_leakage};
use crate::validate::report::{Check, HighMissing};
use std::collections::{BTreeMap, HashMap};

/// Shared, read-only inputs for every rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub dataset: &'a Dataset,
    pub columns: &'a ColumnSpec,
    pub keywords: &'a LeakageKeywordSet,
    pub missingness_threshold: f64,
    pub missing_cols_cap: usize,
}

/// What one rule contributes to the report.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub checks: Vec<Check>,
    pub warning: Option<String>,
}

impl RuleOutcome {
    fn silent(check: Check) -> Self {
        Self {
            checks: vec![check],
            warning: None,
        }
    }

    fn warn_if(check: Check, violated: bool, message: impl FnOnce() -> String) -> Self {
        Self {
            checks: vec![check],
            warning: violated.then(message),
        }
    }
}

/// Validation rules in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    RequiredColumns,
    TargetDistribution,
    DuplicateKey,
    HighMissingness,
    NegativeIncome,
    BirthDaysEncoding,
    LeakageHeuristic,
}

impl Rule {
    /// Every rule, in the order the report lists them.
    pub const ALL: [Rule; 7] = [
        Rule::RequiredColumns,
        Rule::TargetDistribution,
        Rule::DuplicateKey,
        Rule::HighMissingness,
        Rule::NegativeIncome,
        Rule::BirthDaysEncoding,
        Rule::LeakageHeuristic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::RequiredColumns => "required_columns",
            Rule::TargetDistribution => "target_distribution",
            Rule::DuplicateKey => "duplicate_key",
            Rule::HighMissingness => "high_missingness",
            Rule::NegativeIncome => "negative_income",
            Rule::BirthDaysEncoding => "birth_days_encoding",
            Rule::LeakageHeuristic => "leakage_heuristic",
        }
    }

    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
        match self {
            Rule::RequiredColumns => Some(required_columns(ctx)),
            Rule::TargetDistribution => target_distribution(ctx),
            Rule::DuplicateKey => duplicate_key(ctx),
            Rule::HighMissingness => Some(high_missingness(ctx)),
            Rule::NegativeIncome => negative_income(ctx),
            Rule::BirthDaysEncoding => birth_days_encoding(ctx),
            Rule::LeakageHeuristic => Some(leakage_heuristic(ctx)),
        }
    }
}

fn required_columns(ctx: &RuleContext<'_>) -> RuleOutcome {
    let missing: Vec<String> = ctx
        .columns
        .required()
        .filter(|c| !ctx.dataset.has_column(c))
        .map(str::to_string)
        .collect();
    let violated = !missing.is_empty();
    let message = format!("Missing required columns: {missing:?}");
    RuleOutcome::warn_if(Check::MissingRequiredCols(missing), violated, || message)
}

fn target_distribution(ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
    let target = ctx.dataset.column(&ctx.columns.target)?;

    let mut counts = BTreeMap::new();
    for v in &target.values {
        *counts.entry(v.to_string()).or_insert(0) += 1;
    }

    let (sum, n) = target.numbers().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    let default_rate = (n > 0).then(|| sum / n as f64);

    Some(RuleOutcome {
        checks: vec![
            Check::TargetValueCounts(counts),
            Check::DefaultRate(default_rate),
        ],
        warning: None,
    })
}

/// Rows whose key occurs more than once in the column, every occurrence counted.
fn count_repeated(column: &Column) -> usize {
    let mut occurrences: HashMap<_, usize> = HashMap::with_capacity(column.len());
    for v in &column.values {
        *occurrences.entry(v.key()).or_default() += 1;
    }
    occurrences.into_values().filter(|&n| n > 1).sum()
}

fn duplicate_key(ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
    let id = ctx.dataset.column(&ctx.columns.id)?;
    let count = count_repeated(id);
    Some(RuleOutcome::warn_if(
        Check::DuplicateKeys {
            column: id.name.clone(),
            count,
        },
        count > 0,
        || format!("Found {count} duplicate {} values", id.name),
    ))
}

fn high_missingness(ctx: &RuleContext<'_>) -> RuleOutcome {
    let mut flagged: Vec<(&str, f64)> = ctx
        .dataset
        .columns()
        .iter()
        .map(|c| (c.name.as_str(), c.null_fraction()))
        .filter(|(_, frac)| *frac >= ctx.missingness_threshold)
        .collect();
    // Stable sort keeps column order among equal fractions.
    flagged.sort_by(|a, b| b.1.total_cmp(&a.1));

    let count = flagged.len();
    let cols = flagged
        .into_iter()
        .take(ctx.missing_cols_cap)
        .map(|(name, _)| name.to_string())
        .collect();

    RuleOutcome::silent(Check::HighMissing(HighMissing {
        threshold: ctx.missingness_threshold,
        count,
        cols,
    }))
}

fn negative_income(ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
    let income = ctx.dataset.column(&ctx.columns.income)?;
    let count = income.numbers().filter(|v| *v < 0.0).count();
    Some(RuleOutcome::warn_if(
        Check::NegativeIncome(count),
        count > 0,
        || format!("Negative income values: {count}"),
    ))
}

fn birth_days_encoding(ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
    let birth = ctx.dataset.column(&ctx.columns.birth_days)?;
    let count = birth.numbers().filter(|v| *v >= 0.0).count();
    Some(RuleOutcome::warn_if(
        Check::NonNegativeBirthDays {
            column: birth.name.clone(),
            count,
        },
        count > 0,
        || format!("Unexpected non-negative {} values: {count}", birth.name),
    ))
}

fn leakage_heuristic(ctx: &RuleContext<'_>) -> RuleOutcome {
    let candidates = scan_leakage(
        ctx.dataset.column_names(),
        &ctx.columns.target,
        ctx.keywords,
    );
    RuleOutcome::silent(Check::LeakageCandidates(candidates))
}
