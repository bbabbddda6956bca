//! Column typing and the Home Credit column vocabulary.

use crate::data::dataset::Scalar;
use serde::{Deserialize, Serialize};

/// Column data type, inferred from the values a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Number,
    Text,
    /// Every value is null.
    Null,
    /// Numeric and text values in one column. Rejected by `Dataset::new`.
    Mixed,
}

/// Infer column type from its values.
pub fn infer_column_type(values: &[Scalar]) -> ColumnType {
    let mut has_number = false;
    let mut has_text = false;

    for v in values.iter().filter(|v| !v.is_null()) {
        match v {
            Scalar::Number(_) => has_number = true,
            Scalar::Text(_) => has_text = true,
            Scalar::Null => {}
        }
    }

    match (has_number, has_text) {
        (true, true) => ColumnType::Mixed,
        (true, false) => ColumnType::Number,
        (false, true) => ColumnType::Text,
        (false, false) => ColumnType::Null,
    }
}

pub const ID_COL: &str = "SK_ID_CURR";
pub const TARGET_COL: &str = "TARGET";
pub const INCOME_COL: &str = "AMT_INCOME_TOTAL";
pub const BIRTH_DAYS_COL: &str = "DAYS_BIRTH";
pub const EMPLOYED_DAYS_COL: &str = "DAYS_EMPLOYED";

/// Numeric columns consumed by the downstream scoring model.
pub const MODEL_NUMERIC_COLS: &[&str] = &[
    "AMT_INCOME_TOTAL",
    "AMT_CREDIT",
    "AMT_ANNUITY",
    "DAYS_BIRTH",
    "DAYS_EMPLOYED",
    "CNT_FAM_MEMBERS",
];

/// Categorical columns consumed by the downstream scoring model.
///
/// `CODE_GENDER` doubles as the grouping column for fairness reporting.
pub const MODEL_CATEGORICAL_COLS: &[&str] = &[
    "NAME_CONTRACT_TYPE",
    "CODE_GENDER",
    "NAME_INCOME_TYPE",
    "NAME_EDUCATION_TYPE",
    "OCCUPATION_TYPE",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_number() {
        let values = vec![Scalar::Number(1.0), Scalar::Null, Scalar::Number(2.5)];
        assert_eq!(infer_column_type(&values), ColumnType::Number);
    }

    #[test]
    fn test_infer_text() {
        let values = vec![Scalar::Text("M".into()), Scalar::Null];
        assert_eq!(infer_column_type(&values), ColumnType::Text);
    }

    #[test]
    fn test_infer_all_null() {
        assert_eq!(
            infer_column_type(&[Scalar::Null, Scalar::Null]),
            ColumnType::Null
        );
        assert_eq!(infer_column_type(&[]), ColumnType::Null);
    }

    #[test]
    fn test_infer_mixed() {
        let values = vec![Scalar::Number(1.0), Scalar::Text("x".into())];
        assert_eq!(infer_column_type(&values), ColumnType::Mixed);
    }

    #[test]
    fn test_feature_schema_disjoint() {
        for col in MODEL_NUMERIC_COLS {
            assert!(!MODEL_CATEGORICAL_COLS.contains(col));
        }
        assert!(!MODEL_NUMERIC_COLS.contains(&TARGET_COL));
        assert!(!MODEL_NUMERIC_COLS.contains(&ID_COL));
    }
}
