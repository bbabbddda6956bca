//! The validation report and its per-check results.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Columns at or above the missingness threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighMissing {
    pub threshold: f64,
    /// Number of matching columns, including those beyond the cap.
    pub count: usize,
    /// Matching columns by descending null fraction, truncated to the cap.
    pub cols: Vec<String>,
}

/// One computed check. Its report key is given by [`Check::name`].
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    MissingRequiredCols(Vec<String>),
    TargetValueCounts(BTreeMap<String, usize>),
    /// Mean of the numeric label values; `None` when there are none.
    DefaultRate(Option<f64>),
    DuplicateKeys { column: String, count: usize },
    HighMissing(HighMissing),
    NegativeIncome(usize),
    NonNegativeBirthDays { column: String, count: usize },
    LeakageCandidates(Vec<String>),
}

impl Check {
    pub fn name(&self) -> String {
        match self {
            Check::MissingRequiredCols(_) => "missing_required_cols".into(),
            Check::TargetValueCounts(_) => "target_value_counts".into(),
            Check::DefaultRate(_) => "default_rate".into(),
            Check::DuplicateKeys { column, .. } => format!("duplicate_{column}"),
            Check::HighMissing(_) => "high_missing_cols_ge_threshold".into(),
            Check::NegativeIncome(_) => "negative_income_count".into(),
            Check::NonNegativeBirthDays { column, .. } => format!("non_negative_{column}_count"),
            Check::LeakageCandidates(_) => "potential_leakage_cols_heuristic".into(),
        }
    }

    fn serialize_entry<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        let key = self.name();
        match self {
            Check::MissingRequiredCols(cols) | Check::LeakageCandidates(cols) => {
                map.serialize_entry(&key, cols)
            }
            Check::TargetValueCounts(counts) => map.serialize_entry(&key, counts),
            Check::DefaultRate(rate) => map.serialize_entry(&key, rate),
            Check::DuplicateKeys { count, .. } | Check::NonNegativeBirthDays { count, .. } => {
                map.serialize_entry(&key, count)
            }
            Check::HighMissing(high) => map.serialize_entry(&key, high),
            Check::NegativeIncome(count) => map.serialize_entry(&key, count),
        }
    }
}

/// Outcome of one validation run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    checks: Vec<Check>,
    warnings: Vec<String>,
}

impl ValidationReport {
    pub(crate) fn new(checks: Vec<Check>, warnings: Vec<String>) -> Self {
        Self { checks, warnings }
    }

    /// Checks in rule order.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// One message per violated rule, in rule order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// True when no rule raised a warning.
    pub fn passed(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Look up a check by its report key.
    pub fn get(&self, name: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.name() == name)
    }

    pub fn missing_required_cols(&self) -> &[String] {
        self.checks
            .iter()
            .find_map(|c| match c {
                Check::MissingRequiredCols(cols) => Some(cols.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn target_value_counts(&self) -> Option<&BTreeMap<String, usize>> {
        self.checks.iter().find_map(|c| match c {
            Check::TargetValueCounts(counts) => Some(counts),
            _ => None,
        })
    }

    pub fn default_rate(&self) -> Option<f64> {
        self.checks.iter().find_map(|c| match c {
            Check::DefaultRate(rate) => *rate,
            _ => None,
        })
    }

    pub fn duplicate_key_count(&self) -> Option<usize> {
        self.checks.iter().find_map(|c| match c {
            Check::DuplicateKeys { count, .. } => Some(*count),
            _ => None,
        })
    }

    pub fn high_missing(&self) -> Option<&HighMissing> {
        self.checks.iter().find_map(|c| match c {
            Check::HighMissing(high) => Some(high),
            _ => None,
        })
    }

    pub fn negative_income_count(&self) -> Option<usize> {
        self.checks.iter().find_map(|c| match c {
            Check::NegativeIncome(count) => Some(*count),
            _ => None,
        })
    }

    pub fn non_negative_birth_days_count(&self) -> Option<usize> {
        self.checks.iter().find_map(|c| match c {
            Check::NonNegativeBirthDays { count, .. } => Some(*count),
            _ => None,
        })
    }

    pub fn leakage_candidates(&self) -> &[String] {
        self.checks
            .iter()
            .find_map(|c| match c {
                Check::LeakageCandidates(cols) => Some(cols.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Pretty JSON document for persisting the report.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

struct ChecksMap<'a>(&'a [Check]);

impl Serialize for ChecksMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for check in self.0 {
            check.serialize_entry(&mut map)?;
        }
        map.end()
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationReport", 2)?;
        state.serialize_field("checks", &ChecksMap(&self.checks))?;
        state.serialize_field("warnings", &self.warnings)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dynamic_check_names() {
        let dup = Check::DuplicateKeys {
            column: "SK_ID_CURR".into(),
            count: 0,
        };
        assert_eq!(dup.name(), "duplicate_SK_ID_CURR");
        let birth = Check::NonNegativeBirthDays {
            column: "days_birth".into(),
            count: 2,
        };
        assert_eq!(birth.name(), "non_negative_days_birth_count");
    }

    #[test]
    fn test_report_json_shape() {
        let report = ValidationReport::new(
            vec![
                Check::MissingRequiredCols(vec!["DAYS_EMPLOYED".into()]),
                Check::DuplicateKeys {
                    column: "SK_ID_CURR".into(),
                    count: 1,
                },
                Check::HighMissing(HighMissing {
                    threshold: 0.8,
                    count: 0,
                    cols: vec![],
                }),
            ],
            vec!["Missing required columns: [\"DAYS_EMPLOYED\"]".into()],
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "checks": {
                    "missing_required_cols": ["DAYS_EMPLOYED"],
                    "duplicate_SK_ID_CURR": 1,
                    "high_missing_cols_ge_threshold": {"threshold": 0.8, "count": 0, "cols": []}
                },
                "warnings": ["Missing required columns: [\"DAYS_EMPLOYED\"]"]
            })
        );
    }

    #[test]
    fn test_accessors_on_absent_checks() {
        let report = ValidationReport::new(Vec::new(), Vec::new());
        assert!(report.passed());
        assert!(report.duplicate_key_count().is_none());
        assert!(report.missing_required_cols().is_empty());
        assert!(report.leakage_candidates().is_empty());
        assert!(report.get("default_rate").is_none());
    }

    #[test]
    fn test_default_rate_null_serializes() {
        let report = ValidationReport::new(vec![Check::DefaultRate(None)], Vec::new());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["checks"]["default_rate"], serde_json::Value::Null);
        assert!(report.get("default_rate").is_some());
    }
}
