//! Configuration for a driver run.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Timeout bound, time unit, and trace depth used when nothing is overridden.
//! 2. **Structures:** `GeneralConfig` for the time-stepping loop and `TraceConfig` for waveforms.
//! 3. **Loading:** JSON parsing from a string or file, followed by validation.
//!
//! Every field has a default, so `{}` is a valid configuration and `Config::default()`
//! reproduces the stock driver: a one-second (1e9 ns) timeout and no waveform.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::common::{ConfigError, SimTime, TimeUnit};

/// Default configuration constants for the driver.
mod defaults {
    /// Timeout bound in time units (1e9 ns = 1 s of simulated time).
    ///
    /// Long stress scenarios should raise this rather than rely on it.
    pub const TIMEOUT: u64 = 1_000_000_000;

    /// Hierarchy depth handed to the trace sink; deep enough to mean "everything".
    pub const TRACE_DEPTH: u32 = 99;

    /// Extension appended to the program name to form the default trace path.
    pub const TRACE_EXTENSION: &str = "vcd";
}

/// Log verbosity used by the CLI when `RUST_LOG` is not set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Every step-level detail.
    Trace,
    /// Progress updates and trace lifecycle.
    Debug,
    /// Run start and end.
    #[default]
    Info,
    /// Trace failures and timeouts.
    Warn,
    /// Setup failures only.
    Error,
}

impl LogLevel {
    /// Returns the directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use vltdrive_core::config::Config;
///
/// let json = r#"{ "general": { "timeout": 5000 }, "trace": { "enabled": false } }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.timeout, 5000);
/// assert_eq!(config.trace.depth, 99);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Time-stepping loop settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Waveform settings
    #[serde(default)]
    pub trace: TraceConfig,
}

impl Config {
    /// Parses and validates a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON or unknown enum values, and
    /// `ConfigError::Validation` if the parsed values are inconsistent.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` if `path` does not exist, `ConfigError::Io` if it
    /// cannot be read, and the errors of [`Config::from_json`] otherwise.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.to_path_buf())
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_json(&text)
    }

    /// Checks cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if:
    /// - `general.progress_interval` is zero
    /// - `trace.path` is set but empty
    /// - tracing is enabled in a build without the `vcd` feature
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.progress_interval == Some(0) {
            return Err(ConfigError::Validation(
                "general.progress_interval must be greater than zero".to_string(),
            ));
        }
        if self
            .trace
            .path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation(
                "trace.path cannot be empty".to_string(),
            ));
        }
        if self.trace.enabled && !cfg!(feature = "vcd") {
            return Err(ConfigError::Validation(
                "tracing requested but this build has no waveform backend (enable the `vcd` feature)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for the time-stepping loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Timeout bound in time units; reaching it without a finish is a failure
    #[serde(default = "GeneralConfig::default_timeout")]
    pub timeout: u64,

    /// Unit one step represents (diagnostics and `$timescale`)
    #[serde(default)]
    pub time_unit: TimeUnit,

    /// Log a progress line every N steps; `None` disables progress logging
    #[serde(default)]
    pub progress_interval: Option<u64>,

    /// Log verbosity when `RUST_LOG` is unset
    #[serde(default)]
    pub log_level: LogLevel,
}

impl GeneralConfig {
    fn default_timeout() -> u64 {
        defaults::TIMEOUT
    }

    /// Returns the timeout bound as simulated time.
    pub const fn timeout_bound(&self) -> SimTime {
        SimTime::new(self.timeout)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timeout: defaults::TIMEOUT,
            time_unit: TimeUnit::default(),
            progress_interval: None,
            log_level: LogLevel::default(),
        }
    }
}

/// Waveform recording settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Record a waveform for this run
    #[serde(default)]
    pub enabled: bool,

    /// Output path; defaults to `<program>.vcd` in the working directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Maximum hierarchy depth of recorded signals
    #[serde(default = "TraceConfig::default_depth")]
    pub depth: u32,
}

impl TraceConfig {
    fn default_depth() -> u32 {
        defaults::TRACE_DEPTH
    }

    /// Resolves the waveform output path.
    ///
    /// Uses `path` when set; otherwise the file name of `program` (usually `argv[0]`)
    /// with `.vcd` appended, so `./obj/tb_top` traces into `tb_top.vcd`.
    ///
    /// # Arguments
    ///
    /// * `program` - Program path the driver was started as.
    ///
    /// # Returns
    ///
    /// The path the trace sink should create.
    pub fn resolve_path(&self, program: &str) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        let name = Path::new(program)
            .file_name()
            .map_or_else(|| "trace".into(), |n| n.to_string_lossy().into_owned());
        PathBuf::from(format!("{name}.{}", defaults::TRACE_EXTENSION))
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: None,
            depth: defaults::TRACE_DEPTH,
        }
    }
}
