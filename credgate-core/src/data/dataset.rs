//! In-memory tabular dataset read by the validation engine.

use crate::data::schema::{ColumnType, infer_column_type};
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Number(f64),
    Text(String),
}

impl Scalar {
    /// `Null` or a NaN number.
    pub fn is_null(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Number(n) => n.is_nan(),
            Scalar::Text(_) => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    /// Hashable identity used for duplicate detection.
    ///
    /// Nulls compare equal to each other and `-0.0` equals `0.0`.
    pub(crate) fn key(&self) -> ScalarKey<'_> {
        match self {
            Scalar::Null => ScalarKey::Null,
            Scalar::Number(n) if *n == 0.0 => ScalarKey::Number(0.0f64.to_bits()),
            Scalar::Number(n) if n.is_nan() => ScalarKey::Null,
            Scalar::Number(n) => ScalarKey::Number(n.to_bits()),
            Scalar::Text(s) => ScalarKey::Text(s),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            // Integral values print without a trailing ".0" so label 1.0 reads as "1".
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        if n.is_nan() {
            Scalar::Null
        } else {
            Scalar::Number(n)
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Null, Into::into)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ScalarKey<'a> {
    Null,
    Number(u64),
    Text(&'a str),
}

/// A named column of scalar values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a column from anything convertible into [`Scalar`].
    pub fn from_values<T: Into<Scalar>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dtype(&self) -> ColumnType {
        infer_column_type(&self.values)
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Fraction of null cells. An empty column has no missing values.
    pub fn null_fraction(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.null_count() as f64 / self.values.len() as f64
        }
    }

    /// Numeric values, skipping nulls and text.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(Scalar::as_f64)
    }
}

/// A read-only table: ordered, uniquely named columns of equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate names, ragged and mixed-type columns.
    pub fn new(columns: Vec<Column>) -> Result<Self, SchemaError> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::new();

        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    name: col.name.clone(),
                });
            }
            if col.len() != row_count {
                return Err(SchemaError::RaggedColumn {
                    name: col.name.clone(),
                    expected: row_count,
                    actual: col.len(),
                });
            }
            if col.dtype() == ColumnType::Mixed {
                return Err(SchemaError::MixedColumn {
                    name: col.name.clone(),
                });
            }
        }

        Ok(Self { columns, row_count })
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            row_count: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Trim and lowercase every column name.
    ///
    /// Fails if two names collapse into the same normalized name.
    pub fn normalize_column_names(self) -> Result<Self, SchemaError> {
        let columns = self
            .columns
            .into_iter()
            .map(|c| Column::new(c.name.trim().to_lowercase(), c.values))
            .collect();
        Self::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Number(1.0).to_string(), "1");
        assert_eq!(Scalar::Number(-0.5).to_string(), "-0.5");
        assert_eq!(Scalar::Null.to_string(), "null");
        assert_eq!(Scalar::from("Cash loans").to_string(), "Cash loans");
    }

    #[test]
    fn test_scalar_from_nan_is_null() {
        assert!(Scalar::from(f64::NAN).is_null());
        assert!(Scalar::from(None::<f64>).is_null());
    }

    #[test]
    fn test_raw_nan_number_counts_as_missing() {
        let col = Column::new("EXT_SOURCE_1", vec![Scalar::Number(f64::NAN); 4]);
        assert!(Scalar::Number(f64::NAN).is_null());
        assert_eq!(Scalar::Number(f64::NAN).as_f64(), None);
        assert_eq!(col.null_count(), 4);
        assert_eq!(col.null_fraction(), 1.0);
        assert_eq!(col.numbers().count(), 0);
        assert_eq!(col.dtype(), ColumnType::Null);
    }

    #[test]
    fn test_scalar_key_zero_and_null() {
        assert_eq!(Scalar::Number(0.0).key(), Scalar::Number(-0.0).key());
        assert_eq!(Scalar::Null.key(), Scalar::Null.key());
        assert_ne!(Scalar::Number(1.0).key(), Scalar::from("1").key());
    }

    #[test]
    fn test_dataset_new() {
        let ds = Dataset::new(vec![
            Column::from_values("a", [1.0, 2.0]),
            Column::from_values("b", [Some("x"), None]),
        ])
        .unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.column("b").unwrap().null_count(), 1);
        assert!(!ds.has_column("c"));
    }

    #[test]
    fn test_dataset_rejects_ragged() {
        let err = Dataset::new(vec![
            Column::from_values("a", [1.0, 2.0]),
            Column::from_values("b", [1.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::RaggedColumn { actual: 1, .. }));
    }

    #[test]
    fn test_dataset_rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::from_values("a", [1.0]),
            Column::from_values("a", [2.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_dataset_rejects_mixed() {
        let col = Column::new("a", vec![Scalar::Number(1.0), Scalar::from("x")]);
        assert!(matches!(
            Dataset::new(vec![col]),
            Err(SchemaError::MixedColumn { .. })
        ));
    }

    #[test]
    fn test_normalize_column_names() {
        let ds = Dataset::new(vec![
            Column::from_values(" TARGET ", [1.0]),
            Column::from_values("SK_ID_CURR", [7.0]),
        ])
        .unwrap()
        .normalize_column_names()
        .unwrap();
        let names: Vec<_> = ds.column_names().collect();
        assert_eq!(names, vec!["target", "sk_id_curr"]);
    }

    #[test]
    fn test_null_fraction_empty_column() {
        let col = Column::new("a", Vec::new());
        assert_eq!(col.null_fraction(), 0.0);
    }
}
