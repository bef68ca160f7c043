//! Run statistics collection and reporting.
//!
//! This module tracks what a driver run did. It provides:
//! 1. **Counts:** Model evaluations and trace samples.
//! 2. **Time:** Final simulated time and host wall-clock time.
//! 3. **Derived metrics:** Simulation rate in time units per host second.

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::common::{SimTime, TimeUnit};

/// Statistics for one driver run.
#[derive(Clone, Debug, Serialize)]
pub struct RunStats {
    #[serde(skip)]
    start_time: Instant,
    /// Number of `Model::eval` calls: the initial one plus one per loop iteration.
    pub evaluations: u64,
    /// Number of trace samples recorded (zero when tracing is off).
    pub samples: u64,
    /// Simulated time when the loop exited.
    pub sim_time: SimTime,
    /// Unit of `sim_time`.
    pub time_unit: TimeUnit,
    /// Host seconds between the start of the run and the end of finalization.
    pub wall_seconds: f64,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            evaluations: 0,
            samples: 0,
            sim_time: SimTime::ZERO,
            time_unit: TimeUnit::default(),
            wall_seconds: 0.0,
        }
    }
}

impl RunStats {
    /// Starts the wall clock for a new run.
    pub fn start(time_unit: TimeUnit) -> Self {
        Self {
            time_unit,
            ..Self::default()
        }
    }

    /// Freezes the wall-clock measurement.
    pub fn stop(&mut self) {
        self.wall_seconds = self.start_time.elapsed().as_secs_f64();
    }

    /// Returns simulated time units advanced per host second.
    ///
    /// Returns `0.0` for a run that took no measurable host time.
    pub fn rate(&self) -> f64 {
        if self.wall_seconds > 0.0 {
            self.sim_time.val() as f64 / self.wall_seconds
        } else {
            0.0
        }
    }

    /// Emits the statistics as one structured log event.
    pub fn log(&self) {
        let sim_time = format!("{} {}", self.sim_time, self.time_unit);
        let rate = format!("{:.0} {}/s", self.rate(), self.time_unit);
        info!(
            sim_time = %sim_time,
            evaluations = self.evaluations,
            samples = self.samples,
            host_seconds = self.wall_seconds,
            rate = %rate,
            "run statistics"
        );
    }

    /// Serializes the statistics as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; in practice this cannot fail for this type.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
