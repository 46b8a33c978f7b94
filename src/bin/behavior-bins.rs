//! Behavior Bins CLI
//!
//! Aggregates every behavior log in a directory into cumulative per-behavior
//! duration tables.

use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use behavior_bins::bins::{DEFAULT_BIN_WIDTH_SEC, DEFAULT_WINDOW_SEC};
use behavior_bins::{aggregate_directory, AggregateError, AggregationReport, BinConfig, VERSION};

/// Behavior Bins - cumulative time-binned behavior durations per video
#[derive(Parser)]
#[command(name = "behavior-bins")]
#[command(version = VERSION)]
#[command(about = "Aggregate per-video behavior logs into cumulative binned duration tables", long_about = None)]
struct Cli {
    /// Directory containing the per-video behavior CSV logs
    input_dir: PathBuf,

    /// Directory to write the cumulative tables to (defaults to the input directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Total window covered by the bins, in seconds
    #[arg(long, default_value_t = DEFAULT_WINDOW_SEC)]
    window_sec: f64,

    /// Width of each bin, in seconds
    #[arg(long, default_value_t = DEFAULT_BIN_WIDTH_SEC)]
    bin_width_sec: f64,

    /// Load the bin configuration from a JSON file (overrides --window-sec and --bin-width-sec)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the run report as JSON instead of one line per behavior
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout carries only the confirmation lines or report
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), BinsCliError> {
    let config = load_config(cli.config.as_deref(), cli.window_sec, cli.bin_width_sec)?;
    let output_dir = cli.output_dir.as_deref().unwrap_or(&cli.input_dir);

    let report = aggregate_directory(&cli.input_dir, output_dir, config)?;

    if report.files_processed == 0 {
        warn!(dir = %cli.input_dir.display(), "no behavior logs found, nothing written");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_confirmations(&report);
    }

    Ok(())
}

/// `--config` wins over the individual window flags
fn load_config(
    path: Option<&Path>,
    window_sec: f64,
    bin_width_sec: f64,
) -> Result<BinConfig, AggregateError> {
    match path {
        Some(path) => BinConfig::from_file(path),
        None => BinConfig::new(window_sec, bin_width_sec),
    }
}

fn print_confirmations(report: &AggregationReport) {
    for table in &report.tables {
        println!("{}", table.confirmation());
    }
}

// Error types

#[derive(Debug)]
enum BinsCliError {
    Aggregate(AggregateError),
    Json(serde_json::Error),
}

impl From<AggregateError> for BinsCliError {
    fn from(e: AggregateError) -> Self {
        BinsCliError::Aggregate(e)
    }
}

impl From<serde_json::Error> for BinsCliError {
    fn from(e: serde_json::Error) -> Self {
        BinsCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<BinsCliError> for CliError {
    fn from(e: BinsCliError) -> Self {
        match e {
            BinsCliError::Aggregate(e) => {
                let (code, hint) = match &e {
                    AggregateError::Io { .. } => ("IO_ERROR", "Check directory paths and permissions"),
                    AggregateError::NotADirectory(_) => ("IO_ERROR", "Pass the directory holding the CSV logs"),
                    AggregateError::Csv(_)
                    | AggregateError::MalformedRecord { .. }
                    | AggregateError::BlankBehavior { .. }
                    | AggregateError::EmptyInput(_) => (
                        "PARSE_ERROR",
                        "Each log row needs the same 5+ columns: behavior, _, start, _, duration",
                    ),
                    AggregateError::InvalidConfig(_) | AggregateError::Json(_) => {
                        ("CONFIG_ERROR", "Window and bin width must be positive seconds")
                    }
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            BinsCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
        }
    }
}
