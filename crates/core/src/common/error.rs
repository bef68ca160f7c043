//! Error types for driver setup and trace output.
//!
//! The run itself has a single failure mode (timeout), which is an outcome and
//! not an error. Everything here describes problems found while setting a run
//! up or while writing its waveform:
//! 1. **Configuration:** Missing, unreadable, malformed, or inconsistent config files.
//! 2. **Trace Output:** Failures creating or writing the waveform file.
//! 3. **Scenario Selection:** Unknown test names and malformed plusarg values.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON or does not match the schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The values parsed but are inconsistent.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Errors raised by a [`TraceSink`](crate::trace::TraceSink).
#[derive(Debug, Error)]
pub enum TraceError {
    /// The waveform file could not be created.
    #[error("failed to create trace file {}: {source}", path.display())]
    Create {
        /// Requested output path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Writing or flushing the waveform failed.
    #[error("trace write failed: {0}")]
    Io(#[from] io::Error),

    /// A sample did not carry one value per registered signal.
    #[error("trace sample has {got} values but {expected} signals were declared")]
    SampleWidth {
        /// Number of signals declared at open.
        expected: usize,
        /// Number of values in the offending sample.
        got: usize,
    },

    /// `record` was called before `open` or after `close`.
    #[error("trace sink is not open")]
    NotOpen,
}

/// Errors raised while turning plusargs into a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// `+UVM_TESTNAME` named a scenario that is not registered.
    #[error("unknown test '{name}' (available: {available})")]
    UnknownTest {
        /// Requested name.
        name: String,
        /// Comma-separated list of registered names.
        available: String,
    },

    /// A plusarg was present but its value could not be parsed.
    #[error("invalid value '{value}' for +{name}: {reason}")]
    InvalidPlusarg {
        /// Plusarg name without the leading `+`.
        name: String,
        /// Raw value as given on the command line.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// Top-level error for everything that can stop a run from starting or being reported.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Waveform output problem.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Scenario selection problem.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    /// The run summary could not be written.
    #[error("failed to write run summary {}: {source}", path.display())]
    Summary {
        /// Requested output path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}
