//! Simulation driver and built-in scenarios.
//!
//! Provides the time-stepping driver that owns a model for the length of a
//! run, and the behavioral scenarios the CLI can run without a generated model.

/// Time-stepping driver, run outcome, and run report.
pub mod driver;

/// Built-in scenarios selected with `+UVM_TESTNAME`.
pub mod scenario;

pub use driver::{Driver, RunOutcome, RunReport};
