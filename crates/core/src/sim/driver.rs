//! Driver: owns the model, the simulated clock, and the optional trace sink.
//!
//! A run is a two-state machine, RUNNING -> {FINISHED, TIMED_OUT}:
//! 1. **Startup:** Open the trace (if any) and evaluate the model once at time zero.
//! 2. **Loop:** While the model has not finished and the clock is below the timeout,
//!    evaluate, sample, advance one unit.
//! 3. **Shutdown:** Report a timeout on the console, finalize the model exactly once,
//!    close the trace, release the model.

use std::io::{self, Write};
use std::num::NonZeroU64;

use tracing::{debug, info, warn};

use crate::common::{Clock, SimTime, TimeUnit, TraceError};
use crate::config::GeneralConfig;
use crate::model::Model;
use crate::stats::RunStats;
use crate::trace::TraceSink;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The model raised its finish flag before the timeout bound.
    Finished,
    /// The clock reached the timeout bound, whether or not the model finished on that step.
    TimedOut,
}

impl RunOutcome {
    /// Returns the process exit status for this outcome (`0` or `1`).
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Finished => 0,
            Self::TimedOut => 1,
        }
    }
}

/// Everything a finished run reports back.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RunReport {
    /// Terminal state.
    pub outcome: RunOutcome,
    /// Clock value when the loop exited.
    pub end_time: SimTime,
    /// Counters and timings.
    pub stats: RunStats,
    /// `true` if a trace write failed and tracing was dropped mid-run.
    pub trace_aborted: bool,
}

impl RunReport {
    /// Returns the process exit status.
    pub const fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }

    /// Returns the console diagnostic for a timed-out run, `None` otherwise.
    pub fn diagnostic(&self) -> Option<String> {
        match self.outcome {
            RunOutcome::Finished => None,
            RunOutcome::TimedOut => Some(format!(
                "ERROR: Simulation timeout reached at {} {}",
                self.end_time, self.stats.time_unit
            )),
        }
    }
}

struct TraceAttachment {
    sink: Box<dyn TraceSink>,
    depth: u32,
}

/// Time-stepping driver for a [`Model`].
pub struct Driver<M: Model> {
    model: M,
    clock: Clock,
    timeout: SimTime,
    unit: TimeUnit,
    progress_interval: Option<NonZeroU64>,
    trace: Option<TraceAttachment>,
    values: Vec<u64>,
}

impl<M: Model> std::fmt::Debug for Driver<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("now", &self.clock.now())
            .field("timeout", &self.timeout)
            .field("unit", &self.unit)
            .field("tracing", &self.trace.is_some())
            .finish_non_exhaustive()
    }
}

impl<M: Model> Driver<M> {
    /// Creates a driver that takes ownership of `model`.
    ///
    /// # Arguments
    ///
    /// * `model` - The model to run; released when the run completes.
    /// * `config` - Timeout bound, time unit, and progress logging interval.
    ///   An interval of zero disables progress logging.
    pub fn new(model: M, config: &GeneralConfig) -> Self {
        Self {
            model,
            clock: Clock::new(),
            timeout: config.timeout_bound(),
            unit: config.time_unit,
            progress_interval: config.progress_interval.and_then(NonZeroU64::new),
            trace: None,
            values: Vec::new(),
        }
    }

    /// Attaches a trace sink. Without one, no sampling happens at all.
    ///
    /// # Arguments
    ///
    /// * `sink` - Destination for one sample per loop iteration.
    /// * `depth` - Maximum hierarchy depth handed to the sink.
    #[must_use]
    pub fn with_trace(mut self, sink: Box<dyn TraceSink>, depth: u32) -> Self {
        self.trace = Some(TraceAttachment { sink, depth });
        self
    }

    /// Returns the current simulated time.
    pub const fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Runs to completion or timeout, writing the timeout diagnostic to stdout.
    ///
    /// # Errors
    ///
    /// Returns `TraceError` if the trace sink cannot be opened. Nothing has been
    /// evaluated at that point.
    pub fn run(self) -> Result<RunReport, TraceError> {
        let stdout = io::stdout();
        let mut console = stdout.lock();
        self.run_with_console(&mut console)
    }

    /// Runs to completion or timeout, writing the timeout diagnostic to `console`.
    ///
    /// # Errors
    ///
    /// Returns `TraceError` if the trace sink cannot be opened.
    pub fn run_with_console<W: Write>(mut self, console: &mut W) -> Result<RunReport, TraceError> {
        let mut stats = RunStats::start(self.unit);
        info!(timeout = %self.timeout, unit = %self.unit, tracing = self.trace.is_some(), "starting simulation");

        if let Some(trace) = self.trace.as_mut() {
            trace
                .sink
                .open(&self.model.signals(), trace.depth, self.unit)?;
        }

        self.model.eval(self.clock.now());
        stats.evaluations += 1;

        let mut trace_aborted = false;
        while !self.model.got_finish() && !self.clock.reached(self.timeout) {
            if !self.tick(&mut stats) {
                trace_aborted = true;
            }
        }

        // Reaching the bound is a timeout even if the model finished on that step.
        let outcome = if self.clock.reached(self.timeout) {
            RunOutcome::TimedOut
        } else {
            RunOutcome::Finished
        };
        stats.sim_time = self.clock.now();

        let mut report = RunReport {
            outcome,
            end_time: self.clock.now(),
            stats,
            trace_aborted,
        };
        if let Some(line) = report.diagnostic() {
            warn!(end_time = %report.end_time, "simulation timed out");
            if let Err(e) = writeln!(console, "{line}").and_then(|()| console.flush()) {
                warn!(error = %e, "failed to write timeout diagnostic");
            }
        }

        self.model.finalize();

        if let Some(mut trace) = self.trace.take() {
            report.stats.samples = trace.sink.samples();
            if let Err(e) = trace.sink.close() {
                warn!(error = %e, "failed to close trace");
            }
        }
        drop(self.model);

        report.stats.stop();
        info!(outcome = ?report.outcome, end_time = %report.end_time, "simulation complete");
        report.stats.log();
        Ok(report)
    }

    /// Evaluates, samples, and advances one unit.
    ///
    /// Returns `false` if the trace sink failed on this step and was dropped.
    fn tick(&mut self, stats: &mut RunStats) -> bool {
        let now = self.clock.now();
        self.model.eval(now);
        stats.evaluations += 1;

        let failure = match self.trace.as_mut() {
            Some(trace) => {
                self.values.clear();
                self.model.sample(&mut self.values);
                trace.sink.record(now, &self.values).err()
            }
            None => None,
        };
        let ok = failure.is_none();
        if let Some(e) = failure {
            warn!(time = %now, error = %e, "trace write failed; tracing disabled for the rest of the run");
            if let Some(mut failed) = self.trace.take() {
                stats.samples = failed.sink.samples();
                if let Err(e) = failed.sink.close() {
                    warn!(error = %e, "failed to close trace");
                }
            }
        }

        self.clock.advance();
        if let Some(interval) = self.progress_interval {
            let t = self.clock.now().val();
            if t % interval.get() == 0 {
                debug!(time = t, evaluations = stats.evaluations, "progress");
            }
        }
        ok
    }
}
