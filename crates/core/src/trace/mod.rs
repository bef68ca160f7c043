//! Waveform trace recording.
//!
//! Tracing is an optional capability: the driver only holds a sink when a run
//! asks for one, and a run without a sink performs no per-step sampling at all.
//! This module provides:
//! 1. **Sink Trait:** `TraceSink`, the open/record/close lifecycle the driver calls.
//! 2. **VCD Backend:** `VcdWriter`, an IEEE 1364 value change dump writer (feature `vcd`).

#[cfg(feature = "vcd")]
pub mod vcd;

#[cfg(feature = "vcd")]
pub use vcd::VcdWriter;

use crate::common::{SimTime, TimeUnit, TraceError};
use crate::model::SignalDecl;

/// Destination for per-step waveform samples.
///
/// Lifecycle: one [`open`](TraceSink::open), one [`record`](TraceSink::record)
/// per completed loop iteration, one [`close`](TraceSink::close).
pub trait TraceSink {
    /// Registers the model's signals and writes any header.
    ///
    /// # Arguments
    ///
    /// * `signals` - Every signal the model declares, in sample order.
    /// * `depth` - Maximum hierarchy depth to record; deeper signals are skipped.
    /// * `unit` - Unit of one time step.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::Io` if the header cannot be written.
    fn open(
        &mut self,
        signals: &[SignalDecl],
        depth: u32,
        unit: TimeUnit,
    ) -> Result<(), TraceError>;

    /// Appends one sample taken at `time`.
    ///
    /// `values` holds one entry per signal passed to `open`, in the same order.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::NotOpen` outside the open/close window,
    /// `TraceError::SampleWidth` on a length mismatch, and `TraceError::Io` on write failure.
    fn record(&mut self, time: SimTime, values: &[u64]) -> Result<(), TraceError>;

    /// Flushes and closes the sink. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::Io` if buffered data cannot be flushed.
    fn close(&mut self) -> Result<(), TraceError>;

    /// Returns the number of samples recorded so far.
    fn samples(&self) -> u64;
}
