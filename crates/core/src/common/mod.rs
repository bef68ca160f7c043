//! Common types shared by the driver, the trace backends, and the CLI.
//!
//! This module provides:
//! 1. **Simulated Time:** `SimTime`, `TimeUnit`, and the driver-owned `Clock`.
//! 2. **Error Handling:** Typed setup, trace, and scenario errors.

/// Error types for configuration, tracing, and scenario selection.
pub mod error;

/// Simulated time, units, and the driver clock.
pub mod time;

pub use error::{ConfigError, DriverError, ScenarioError, TraceError};
pub use time::{Clock, SimTime, TimeUnit};
