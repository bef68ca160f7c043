//! Simulation driver CLI.
//!
//! This binary is the testbench `main` for a cycle-based model. It performs:
//! 1. **Configuration:** Loads an optional JSON config and applies command-line overrides.
//! 2. **Model selection:** Forwards trailing arguments to the model; `+UVM_TESTNAME` picks a scenario.
//! 3. **Run:** Steps the model to finish or timeout, optionally tracing to `<program>.vcd`.
//!
//! Exit status: `0` finished, `1` timed out, `2` the run could not be set up.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vltdrive_core::common::{ConfigError, DriverError};
use vltdrive_core::config::{Config, LogLevel};
use vltdrive_core::plusargs::PlusArgs;
use vltdrive_core::sim::scenario;
use vltdrive_core::trace::VcdWriter;
use vltdrive_core::{Driver, RunReport};

/// Exit status for runs that never started.
const EXIT_SETUP_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "vltdrive",
    author,
    version,
    about = "Time-stepping driver for cycle-based simulation models",
    long_about = "Evaluate a model once per time unit until it finishes or the timeout is reached.\n\nArguments after the options are forwarded to the model unchanged.\n\nExamples:\n  vltdrive +UVM_TESTNAME=heartbeat +FINISH_AT=42\n  vltdrive --timeout 10 +UVM_TESTNAME=hang\n  vltdrive --config run.json --trace +UVM_TESTNAME=heartbeat"
)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Timeout bound in time units (overrides the config file).
    #[arg(short, long, value_name = "UNITS")]
    timeout: Option<u64>,

    /// Record a VCD waveform.
    #[arg(long)]
    trace: bool,

    /// Waveform output path; implies --trace. Defaults to `<program>.vcd`.
    #[arg(long, value_name = "FILE")]
    trace_file: Option<PathBuf>,

    /// Maximum hierarchy depth recorded in the waveform.
    #[arg(long, value_name = "LEVELS")]
    trace_depth: Option<u32>,

    /// Log verbosity when RUST_LOG is not set.
    #[arg(long, value_enum)]
    log_level: Option<LogLevelArg>,

    /// Write the run report as JSON to this file.
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Arguments forwarded to the model (e.g. +UVM_TESTNAME=hang).
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    model_args: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevelArg {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Trace => Self::Trace,
            LogLevelArg::Debug => Self::Debug,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Error => Self::Error,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "vltdrive".to_string());

    let config = build_config(&cli);
    let level = cli
        .log_level
        .map(LogLevel::from)
        .or_else(|| config.as_ref().ok().map(|c| c.general.log_level))
        .unwrap_or_default();
    setup_tracing(level);

    let result = config
        .map_err(DriverError::from)
        .and_then(|config| run(&cli, &config, &program));
    process::exit(conclude(&cli, result));
}

/// Maps a run result to the process exit status, writing the summary first.
///
/// A completed run keeps its own status (`0` or `1`) even when the summary
/// cannot be written; only a run that never completed exits with `2`.
fn conclude(cli: &Cli, result: Result<RunReport, DriverError>) -> i32 {
    match result {
        Ok(report) => {
            if let Some(path) = &cli.summary {
                if let Err(e) = write_summary(&report, path) {
                    error!("{e}");
                }
            }
            report.exit_code()
        }
        Err(e) => {
            error!("FATAL: {e}");
            EXIT_SETUP_ERROR
        }
    }
}

/// Loads the config file (if any), applies command-line overrides, and validates.
fn build_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(timeout) = cli.timeout {
        config.general.timeout = timeout;
    }
    if cli.trace || cli.trace_file.is_some() {
        config.trace.enabled = true;
    }
    if let Some(path) = &cli.trace_file {
        config.trace.path = Some(path.clone());
    }
    if let Some(depth) = cli.trace_depth {
        config.trace.depth = depth;
    }
    if let Some(level) = cli.log_level {
        config.general.log_level = level.into();
    }
    config.validate()?;
    Ok(config)
}

/// Logs go to stderr so stdout carries only the model's output and the timeout diagnostic.
fn setup_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Builds the model and trace sink, then runs the driver.
fn run(cli: &Cli, config: &Config, program: &str) -> Result<RunReport, DriverError> {
    let plusargs = PlusArgs::parse(cli.model_args.iter().cloned());
    let model = scenario::from_plusargs(&plusargs)?;

    let mut driver = Driver::new(model, &config.general);
    if config.trace.enabled {
        let path = config.trace.resolve_path(program);
        let sink = VcdWriter::create(&path)?;
        info!(path = %path.display(), depth = config.trace.depth, "tracing enabled");
        driver = driver.with_trace(Box::new(sink), config.trace.depth);
    }

    Ok(driver.run()?)
}

fn write_summary(report: &RunReport, path: &Path) -> Result<(), DriverError> {
    let json = serde_json::to_string_pretty(report).map_err(|e| DriverError::Summary {
        path: path.to_path_buf(),
        source: io::Error::from(e),
    })?;
    fs::write(path, json).map_err(|source| DriverError::Summary {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "run summary written");
    Ok(())
}
