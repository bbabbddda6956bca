//! Configuration system for credgate.
//!
//! Uses `figment` for layered configuration: defaults -> user config ->
//! workspace config -> explicit file -> environment. Configuration is loaded
//! from `~/.config/credgate/config.toml` and/or `.credgate/config.toml` in the
//! workspace directory.

use crate::error::ConfigError;
use crate::threshold::cost::{DEFAULT_FALSE_NEGATIVE_COST, DEFAULT_FALSE_POSITIVE_COST};
use crate::threshold::grid::DEFAULT_GRID_SIZE;
use crate::threshold::{CostModel, SearchStrategy};
use crate::validate::engine::{DEFAULT_MISSING_COLS_CAP, DEFAULT_MISSINGNESS_THRESHOLD};
use crate::validate::{ColumnSpec, LeakageKeywordSet};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredgateConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub threshold: ThresholdConfig,
    #[serde(default)]
    pub gate: GateConfig,
}

/// Data-quality gate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Null fraction at or above which a column is reported.
    #[serde(default = "default_missingness_threshold")]
    pub missingness_threshold: f64,
    /// Maximum number of column names listed in the missingness check.
    #[serde(default = "default_missing_cols_cap")]
    pub missing_cols_cap: usize,
    /// Trim and lowercase column names on load; the column spec is lowercased to match.
    #[serde(default)]
    pub lowercase_columns: bool,
    #[serde(default)]
    pub columns: ColumnSpec,
    #[serde(default)]
    pub leakage_keywords: LeakageKeywordSet,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            missingness_threshold: default_missingness_threshold(),
            missing_cols_cap: default_missing_cols_cap(),
            lowercase_columns: false,
            columns: ColumnSpec::default(),
            leakage_keywords: LeakageKeywordSet::default(),
        }
    }
}

fn default_missingness_threshold() -> f64 {
    DEFAULT_MISSINGNESS_THRESHOLD
}

fn default_missing_cols_cap() -> usize {
    DEFAULT_MISSING_COLS_CAP
}

/// Threshold optimizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_fn_cost")]
    pub false_negative_cost: f64,
    #[serde(default = "default_fp_cost")]
    pub false_positive_cost: f64,
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default)]
    pub strategy: SearchStrategy,
    /// Include every evaluated `(threshold, cost)` pair in results.
    #[serde(default)]
    pub record_curve: bool,
    /// Refuse single-class label sets instead of warning.
    #[serde(default)]
    pub require_both_classes: bool,
    /// Label column in scored CSV files.
    #[serde(default = "default_label_column")]
    pub label_column: String,
    /// Probability column in scored CSV files.
    #[serde(default = "default_probability_column")]
    pub probability_column: String,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            false_negative_cost: default_fn_cost(),
            false_positive_cost: default_fp_cost(),
            grid_size: default_grid_size(),
            strategy: SearchStrategy::default(),
            record_curve: false,
            require_both_classes: false,
            label_column: default_label_column(),
            probability_column: default_probability_column(),
        }
    }
}

impl ThresholdConfig {
    pub fn cost_model(&self) -> CostModel {
        CostModel {
            false_negative_cost: self.false_negative_cost,
            false_positive_cost: self.false_positive_cost,
        }
    }
}

fn default_fn_cost() -> f64 {
    DEFAULT_FALSE_NEGATIVE_COST
}

fn default_fp_cost() -> f64 {
    DEFAULT_FALSE_POSITIVE_COST
}

fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

fn default_label_column() -> String {
    "TARGET".to_string()
}

fn default_probability_column() -> String {
    "probability".to_string()
}

/// How the CLI acts on validation results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Exit non-zero when the report has warnings.
    #[serde(default)]
    pub fail_on_warnings: bool,
    /// Where the validation report is written.
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            fail_on_warnings: false,
            report_path: default_report_path(),
        }
    }
}

fn default_report_path() -> PathBuf {
    PathBuf::from("reports").join("data_quality.json")
}

impl CredgateConfig {
    /// Reject values no run could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.validation.missingness_threshold;
        if !t.is_finite() || t < 0.0 {
            return Err(ConfigError::Invalid {
                message: format!("validation.missingness_threshold must be >= 0, got {t}"),
            });
        }
        if self.threshold.grid_size < 1 {
            return Err(ConfigError::Invalid {
                message: "threshold.grid_size must be at least 1".to_string(),
            });
        }
        self.threshold
            .cost_model()
            .validate()
            .map_err(|e| ConfigError::Invalid {
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Column spec matching how datasets will be loaded.
    pub fn effective_columns(&self) -> ColumnSpec {
        if self.validation.lowercase_columns {
            self.validation.columns.lowercased()
        } else {
            self.validation.columns.clone()
        }
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `CREDGATE_`, nested with `__`)
/// 2. Explicit config file (must exist)
/// 3. Workspace-local config (`.credgate/config.toml`)
/// 4. User config (`~/.config/credgate/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    explicit: Option<&Path>,
) -> Result<CredgateConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(CredgateConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".credgate").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        figment = figment.merge(Toml::file(path));
    }

    // CREDGATE_THRESHOLD__GRID_SIZE, CREDGATE_GATE__FAIL_ON_WARNINGS, etc.
    figment = figment.merge(Env::prefixed("CREDGATE_").split("__"));

    let config: CredgateConfig = figment.extract().map_err(Box::new)?;
    config.validate()?;
    Ok(config)
}

/// `~/.config/credgate/config.toml` or the platform equivalent.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "credgate", "credgate")
        .map(|d| d.config_dir().join("config.toml"))
}
