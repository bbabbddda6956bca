//! credgate CLI: data-quality gate and decision threshold selection for
//! credit-risk scoring.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// credgate: governance gate and cost-aware thresholds for credit-risk models
#[derive(Parser, Debug)]
#[command(name = "credgate", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (looked up for .credgate/config.toml)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the data-quality rules over a CSV dataset and write a JSON report
    Validate {
        /// Dataset CSV file
        input: PathBuf,

        /// Report destination (defaults to gate.report_path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Null fraction at or above which a column is reported
        #[arg(long)]
        missing_threshold: Option<f64>,

        /// Trim and lowercase column names before validating
        #[arg(long)]
        lowercase_columns: bool,

        /// Exit with status 1 when any rule raises a warning
        #[arg(long)]
        fail_on_warnings: bool,
    },
    /// Pick the decision threshold that minimizes expected misclassification cost
    Threshold {
        /// CSV with a 0/1 label column and a probability column
        input: PathBuf,

        /// Label column (defaults to threshold.label_column)
        #[arg(long)]
        label_col: Option<String>,

        /// Probability column (defaults to threshold.probability_column)
        #[arg(long)]
        prob_col: Option<String>,

        /// Cost of a missed defaulter
        #[arg(long)]
        fn_cost: Option<f64>,

        /// Cost of declining a good applicant
        #[arg(long)]
        fp_cost: Option<f64>,

        /// Number of evenly spaced candidate thresholds
        #[arg(long)]
        grid_size: Option<usize>,

        /// Search every distinct probability instead of a fixed grid
        #[arg(long)]
        exact: bool,

        /// Include the full (threshold, cost) curve in the JSON output
        #[arg(long)]
        curve: bool,

        /// Fail when the labels contain only one class
        #[arg(long)]
        require_both_classes: bool,

        /// Write the result as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Write a default .credgate/config.toml into the workspace
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "credgate", "credgate")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "credgate.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    commands::handle_command(cli.command, &workspace, cli.config.as_deref())
}
