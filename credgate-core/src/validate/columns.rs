//! Column roles the validation rules look for.

use crate::data::schema::{
    BIRTH_DAYS_COL, EMPLOYED_DAYS_COL, ID_COL, INCOME_COL, MODEL_CATEGORICAL_COLS,
    MODEL_NUMERIC_COLS, TARGET_COL,
};
use serde::{Deserialize, Serialize};

/// Names of the columns with a fixed meaning, plus any extra required columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    #[serde(default = "default_id")]
    pub id: String,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default = "default_income")]
    pub income: String,
    /// Age in days, stored as negative days before application.
    #[serde(default = "default_birth_days")]
    pub birth_days: String,
    #[serde(default = "default_employment_days")]
    pub employment_days: String,
    /// Required in addition to the five role columns. Defaults to the
    /// remaining model feature columns.
    #[serde(default = "default_extra_required")]
    pub extra_required: Vec<String>,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            id: default_id(),
            target: default_target(),
            income: default_income(),
            birth_days: default_birth_days(),
            employment_days: default_employment_days(),
            extra_required: default_extra_required(),
        }
    }
}

fn default_id() -> String {
    ID_COL.to_string()
}

fn default_target() -> String {
    TARGET_COL.to_string()
}

fn default_income() -> String {
    INCOME_COL.to_string()
}

fn default_birth_days() -> String {
    BIRTH_DAYS_COL.to_string()
}

fn default_employment_days() -> String {
    EMPLOYED_DAYS_COL.to_string()
}

fn default_extra_required() -> Vec<String> {
    let roles = [INCOME_COL, BIRTH_DAYS_COL, EMPLOYED_DAYS_COL];
    MODEL_NUMERIC_COLS
        .iter()
        .chain(MODEL_CATEGORICAL_COLS)
        .filter(|c| !roles.contains(*c))
        .map(|c| c.to_string())
        .collect()
}

impl ColumnSpec {
    /// Required columns in reporting order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        [
            self.id.as_str(),
            self.target.as_str(),
            self.income.as_str(),
            self.birth_days.as_str(),
            self.employment_days.as_str(),
        ]
        .into_iter()
        .chain(self.extra_required.iter().map(String::as_str))
    }

    /// The same spec with every name lowercased, for datasets loaded with
    /// normalized column names.
    pub fn lowercased(&self) -> Self {
        Self {
            id: self.id.to_lowercase(),
            target: self.target.to_lowercase(),
            income: self.income.to_lowercase(),
            birth_days: self.birth_days.to_lowercase(),
            employment_days: self.employment_days.to_lowercase(),
            extra_required: self
                .extra_required
                .iter()
                .map(|c| c.to_lowercase())
                .collect(),
        }
    }
}
