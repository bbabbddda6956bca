//! Keyword heuristic for columns that may encode the outcome.
//!
//! A match is a prompt for human review, not proof of leakage.

use serde::{Deserialize, Serialize};

/// Keywords of set version 1.
pub const LEAKAGE_KEYWORDS_V1: &[&str] = &[
    "TARGET", "DEFAULT", "OVERDUE", "DELINQ", "DPD", "LATE", "PAST_DUE",
];

/// A versioned set of case-insensitive substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakageKeywordSet {
    pub version: u32,
    pub keywords: Vec<String>,
}

impl Default for LeakageKeywordSet {
    fn default() -> Self {
        Self::v1()
    }
}

impl LeakageKeywordSet {
    pub fn v1() -> Self {
        Self::new(1, LEAKAGE_KEYWORDS_V1.iter().copied())
    }

    pub fn new<S: AsRef<str>>(version: u32, keywords: impl IntoIterator<Item = S>) -> Self {
        Self {
            version,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_uppercase())
                .collect(),
        }
    }

    /// Whether any keyword occurs in `column`, ignoring case.
    pub fn matches(&self, column: &str) -> bool {
        let upper = column.to_uppercase();
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && upper.contains(&k.to_uppercase()))
    }
}

/// Columns whose names match the keyword set, in input order.
///
/// The target column itself, matched by exact name, is never reported.
pub fn scan_leakage<'a>(
    columns: impl IntoIterator<Item = &'a str>,
    target: &str,
    keywords: &LeakageKeywordSet,
) -> Vec<String> {
    columns
        .into_iter()
        .filter(|c| *c != target && keywords.matches(c))
        .map(str::to_string)
        .collect()
}
