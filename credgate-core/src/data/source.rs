//! Loading datasets and scored rows from CSV files.

use crate::data::dataset::{Column, Dataset, Scalar};
use crate::error::{CredgateError, SchemaError, ThresholdError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Cell contents treated as missing, matching the usual pandas defaults.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for CSV ingestion.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Trim and lowercase column names after loading.
    pub normalize_names: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            normalize_names: false,
        }
    }
}

/// Load a CSV file into a [`Dataset`].
pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<Dataset, CredgateError> {
    let file = File::open(path)?;
    let dataset = read_csv(file, options)?;
    tracing::debug!(
        path = %path.display(),
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "Loaded CSV dataset"
    );
    Ok(dataset)
}

/// Parse CSV from any reader.
///
/// A column is numeric when every non-null cell parses as `f64`; otherwise all
/// of its non-null cells are kept as text.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<Dataset, SchemaError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(SchemaError::EmptyHeader);
    }

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        // Ragged records surface as csv errors because `flexible` is off.
        let record = record?;
        for (i, cell) in record.iter().enumerate() {
            let cell = cell.trim();
            raw[i].push((!NULL_MARKERS.contains(&cell)).then(|| cell.to_string()));
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| Column::new(name, type_cells(cells)))
        .collect();

    let dataset = Dataset::new(columns)?;
    if options.normalize_names {
        dataset.normalize_column_names()
    } else {
        Ok(dataset)
    }
}

fn type_cells(cells: Vec<Option<String>>) -> Vec<Scalar> {
    let numeric = cells
        .iter()
        .flatten()
        .all(|c| c.parse::<f64>().is_ok_and(|n| !n.is_nan()));

    cells
        .into_iter()
        .map(|cell| match cell {
            None => Scalar::Null,
            Some(c) if numeric => c.parse::<f64>().map_or(Scalar::Null, Scalar::Number),
            Some(c) => Scalar::Text(c),
        })
        .collect()
}

/// Paired labels and probabilities extracted from a scored dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRows {
    pub labels: Vec<u8>,
    pub probabilities: Vec<f64>,
}

/// Extract the label and probability columns for threshold optimization.
///
/// Labels must be exactly 0 or 1 and probabilities must be present; range
/// checks on probabilities are left to the optimizer.
pub fn load_scored(
    dataset: &Dataset,
    label_col: &str,
    prob_col: &str,
) -> Result<ScoredRows, CredgateError> {
    let labels_col = dataset
        .column(label_col)
        .ok_or_else(|| SchemaError::MissingColumn {
            name: label_col.to_string(),
        })?;
    let probs_col = dataset
        .column(prob_col)
        .ok_or_else(|| SchemaError::MissingColumn {
            name: prob_col.to_string(),
        })?;

    let labels = labels_col
        .values
        .iter()
        .enumerate()
        .map(|(index, v)| match v.as_f64() {
            Some(n) if n == 0.0 => Ok(0),
            Some(n) if n == 1.0 => Ok(1),
            _ => Err(ThresholdError::InvalidRange {
                index,
                message: format!("label '{v}' is not 0 or 1"),
            }),
        })
        .collect::<Result<Vec<u8>, _>>()?;

    let probabilities = probs_col
        .values
        .iter()
        .enumerate()
        .map(|(index, v)| {
            v.as_f64().ok_or_else(|| ThresholdError::InvalidRange {
                index,
                message: format!("probability '{v}' is not numeric"),
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(ScoredRows {
        labels,
        probabilities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::ColumnType;

    fn parse(text: &str) -> Dataset {
        read_csv(text.as_bytes(), &CsvOptions::default()).unwrap()
    }

    #[test]
    fn test_read_csv_types() {
        let ds = parse("SK_ID_CURR,TARGET,CODE_GENDER\n1,0,M\n2,1,F\n3,,XNA\n");
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.column("SK_ID_CURR").unwrap().dtype(), ColumnType::Number);
        assert_eq!(ds.column("CODE_GENDER").unwrap().dtype(), ColumnType::Text);
        assert!(ds.column("TARGET").unwrap().values[2].is_null());
    }

    #[test]
    fn test_null_markers() {
        let ds = parse("A,B\nNA,1\nnan,2\nNULL,3\n");
        assert_eq!(ds.column("A").unwrap().dtype(), ColumnType::Null);
        assert_eq!(ds.column("A").unwrap().null_count(), 3);
    }

    #[test]
    fn test_mixed_cells_become_text() {
        let ds = parse("A\n1\nx\n");
        let col = ds.column("A").unwrap();
        assert_eq!(col.dtype(), ColumnType::Text);
        assert_eq!(col.values[0], Scalar::from("1"));
    }

    #[test]
    fn test_ragged_csv_is_schema_error() {
        let err = read_csv("A,B\n1,2\n3\n".as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, SchemaError::Csv(_)));
    }

    #[test]
    fn test_normalize_names_option() {
        let opts = CsvOptions {
            normalize_names: true,
            ..CsvOptions::default()
        };
        let ds = read_csv("TARGET, Amt_Credit \n1,2\n".as_bytes(), &opts).unwrap();
        let names: Vec<_> = ds.column_names().collect();
        assert_eq!(names, vec!["target", "amt_credit"]);
    }

    #[test]
    fn test_load_scored() {
        let ds = parse("y,p\n0,0.1\n1,0.9\n");
        let scored = load_scored(&ds, "y", "p").unwrap();
        assert_eq!(scored.labels, vec![0, 1]);
        assert_eq!(scored.probabilities, vec![0.1, 0.9]);
    }

    #[test]
    fn test_load_scored_rejects_bad_label() {
        let ds = parse("y,p\n0,0.1\n2,0.9\n");
        let err = load_scored(&ds, "y", "p").unwrap_err();
        assert!(matches!(
            err,
            CredgateError::Threshold(ThresholdError::InvalidRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_load_scored_missing_column() {
        let ds = parse("y,p\n0,0.1\n");
        let err = load_scored(&ds, "y", "prob").unwrap_err();
        assert!(matches!(
            err,
            CredgateError::Schema(SchemaError::MissingColumn { .. })
        ));
    }
}
