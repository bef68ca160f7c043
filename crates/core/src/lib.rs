//! Simulation driver library for cycle-based hardware models.
//!
//! This crate runs a compiled design under test the way a testbench `main` does:
//! 1. **Driver:** Owns the model, steps simulated time one unit at a time, and stops on finish or timeout.
//! 2. **Model:** The capability a generated (or behavioral) model implements to be driven.
//! 3. **Trace:** Optional waveform recording through a `TraceSink`, with a VCD backend.
//! 4. **DPI:** The `uvm_hdl_*` backdoor entry points, exported as always-failing stubs.
//! 5. **Support:** Plusarg parsing, JSON configuration, run statistics, and built-in scenarios.

/// Common types (simulated time, units, errors).
pub mod common;
/// Run configuration (defaults, JSON loading, validation).
pub mod config;
/// HDL backdoor ABI types, backend trait, and exported stubs.
pub mod dpi;
/// The model capability trait and signal declarations.
pub mod model;
/// `+NAME=value` argument parsing.
pub mod plusargs;
/// Driver and built-in scenarios.
pub mod sim;
/// Run statistics collection and reporting.
pub mod stats;
/// Trace sink trait and waveform backends.
pub mod trace;

/// Root configuration type; use `Config::default()` or `Config::load`.
pub use crate::config::Config;
/// The capability every driven model implements.
pub use crate::model::Model;
/// Time-stepping driver; construct with `Driver::new`.
pub use crate::sim::{Driver, RunOutcome, RunReport};
