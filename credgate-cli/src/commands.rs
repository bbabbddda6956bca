//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use credgate_core::config::{CredgateConfig, load_config};
use credgate_core::data::{CsvOptions, load_csv, load_scored};
use credgate_core::threshold::{SearchStrategy, ThresholdOptimizer, ThresholdResult};
use credgate_core::validate::{ValidationEngine, ValidationReport};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Handle a CLI subcommand.
pub fn handle_command(
    command: Commands,
    workspace: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Validate {
            input,
            output,
            missing_threshold,
            lowercase_columns,
            fail_on_warnings,
        } => {
            let mut config = load(workspace, config_path)?;
            if let Some(t) = missing_threshold {
                config.validation.missingness_threshold = t;
            }
            config.validation.lowercase_columns |= lowercase_columns;
            config.gate.fail_on_warnings |= fail_on_warnings;
            config.validate()?;

            let output = output.unwrap_or_else(|| workspace.join(&config.gate.report_path));
            let (report, gate_ok) = run_validate(&config, &input, &output)?;
            print_report(&report, &output);
            Ok(exit_code(gate_ok))
        }
        Commands::Threshold {
            input,
            label_col,
            prob_col,
            fn_cost,
            fp_cost,
            grid_size,
            exact,
            curve,
            require_both_classes,
            json,
        } => {
            let mut config = load(workspace, config_path)?;
            let t = &mut config.threshold;
            if let Some(c) = label_col {
                t.label_column = c;
            }
            if let Some(c) = prob_col {
                t.probability_column = c;
            }
            if let Some(c) = fn_cost {
                t.false_negative_cost = c;
            }
            if let Some(c) = fp_cost {
                t.false_positive_cost = c;
            }
            if let Some(n) = grid_size {
                t.grid_size = n;
            }
            if exact {
                t.strategy = SearchStrategy::Breakpoints;
            }
            t.record_curve |= curve;
            t.require_both_classes |= require_both_classes;
            config.validate()?;

            let result = run_threshold(&config, &input, json.as_deref())?;
            print_threshold(&config, &result);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { action } => {
            handle_config(action, workspace, config_path)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load(workspace: &Path, config_path: Option<&Path>) -> anyhow::Result<CredgateConfig> {
    load_config(Some(workspace), config_path)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
}

fn exit_code(gate_ok: bool) -> ExitCode {
    if gate_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Validate `input`, write the JSON report to `output`, and decide the gate.
fn run_validate(
    config: &CredgateConfig,
    input: &Path,
    output: &Path,
) -> anyhow::Result<(ValidationReport, bool)> {
    let options = CsvOptions {
        normalize_names: config.validation.lowercase_columns,
        ..CsvOptions::default()
    };
    let dataset = load_csv(input, &options)?;

    let mut validation = config.validation.clone();
    validation.columns = config.effective_columns();
    let engine = ValidationEngine::from_config(&validation);
    let report = engine.validate(&dataset, validation.missingness_threshold);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, report.to_json_pretty()?)?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        warnings = report.warnings().len(),
        "Wrote data quality report"
    );

    let gate_ok = !(config.gate.fail_on_warnings && !report.passed());
    Ok((report, gate_ok))
}

fn print_report(report: &ValidationReport, output: &Path) {
    if report.passed() {
        println!("Data quality checks passed with no warnings.");
    } else {
        println!("Data quality warnings ({}):", report.warnings().len());
        for warning in report.warnings() {
            println!("  - {warning}");
        }
    }
    if let Some(rate) = report.default_rate() {
        println!("Default rate: {rate:.4}");
    }
    println!("Report written to: {}", output.display());
}

/// Optimize the threshold over a scored CSV, optionally writing JSON.
fn run_threshold(
    config: &CredgateConfig,
    input: &Path,
    json: Option<&Path>,
) -> anyhow::Result<ThresholdResult> {
    let dataset = load_csv(input, &CsvOptions::default())?;
    let scored = load_scored(
        &dataset,
        &config.threshold.label_column,
        &config.threshold.probability_column,
    )?;

    let optimizer = ThresholdOptimizer::from_config(&config.threshold);
    let result = optimizer.optimize(&scored.labels, &scored.probabilities)?;

    if let Some(path) = json {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(&result)?)?;
        tracing::info!(path = %path.display(), "Wrote threshold result");
    }
    Ok(result)
}

fn print_threshold(config: &CredgateConfig, result: &ThresholdResult) {
    let c = &result.confusion;
    println!(
        "Best threshold: {:.4} (FN cost {}, FP cost {})",
        result.threshold, config.threshold.false_negative_cost, config.threshold.false_positive_cost
    );
    println!("Expected cost:  {}", result.expected_cost);
    println!(
        "Precision: {:.4}  Recall: {:.4}  Accuracy: {:.4}",
        c.precision(),
        c.recall(),
        c.accuracy()
    );
    println!("Confusion: tn={} fp={} fn={} tp={}", c.tn, c.fp, c.fn_, c.tp);
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = init_config(workspace)?;
            println!("Configuration file at: {}", config_path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = load(workspace, config_path)?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}

/// Write the default configuration unless one already exists.
fn init_config(workspace: &Path) -> anyhow::Result<PathBuf> {
    let config_dir = workspace.join(".credgate");
    std::fs::create_dir_all(&config_dir)?;

    let config_path = config_dir.join("config.toml");
    if config_path.exists() {
        tracing::info!(path = %config_path.display(), "Configuration file already exists");
        return Ok(config_path);
    }

    let toml_str = toml::to_string_pretty(&CredgateConfig::default())?;
    std::fs::write(&config_path, &toml_str)?;
    tracing::info!(path = %config_path.display(), "Created default configuration");
    Ok(config_path)
}
