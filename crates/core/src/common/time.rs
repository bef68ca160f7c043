//! Simulated time and time units.
//!
//! This module defines the strong types the driver uses to track simulated time. It provides:
//! 1. **Type Safety:** `SimTime` keeps simulated time apart from wall-clock durations and counts.
//! 2. **Units:** `TimeUnit` names the unit one step represents, for diagnostics and VCD headers.
//! 3. **Clock:** A driver-owned counter that only moves forward, one unit per step.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in simulated time, counted in driver steps since time zero.
///
/// Simulated time is unrelated to host wall-clock time; one unit is whatever
/// the model's timescale says (nanoseconds by default).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SimTime(pub u64);

impl SimTime {
    /// Time zero, the moment the model is first evaluated.
    pub const ZERO: Self = Self(0);

    /// Creates a new simulated time from a raw unit count.
    ///
    /// # Arguments
    ///
    /// * `units` - Number of elapsed time units.
    ///
    /// # Returns
    ///
    /// A new `SimTime` wrapping the provided count.
    #[inline(always)]
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    /// Returns the raw unit count.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SimTime {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

/// Unit represented by one step of simulated time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Seconds.
    S,
    /// Milliseconds.
    Ms,
    /// Microseconds.
    Us,
    /// Nanoseconds (matches a `1ns/1ps` timescale).
    #[default]
    Ns,
    /// Picoseconds.
    Ps,
    /// Femtoseconds.
    Fs,
}

impl TimeUnit {
    /// Returns the unit suffix as written in diagnostics and `$timescale`.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::S => "s",
            Self::Ms => "ms",
            Self::Us => "us",
            Self::Ns => "ns",
            Self::Ps => "ps",
            Self::Fs => "fs",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Driver-owned simulated clock.
///
/// Replaces a process-wide time counter: the driver holds the only `Clock`,
/// and models see the current time only as the argument to `Model::eval`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clock {
    now: SimTime,
}

impl Clock {
    /// Creates a clock at time zero.
    pub const fn new() -> Self {
        Self { now: SimTime::ZERO }
    }

    /// Returns the current simulated time.
    #[inline(always)]
    pub const fn now(&self) -> SimTime {
        self.now
    }

    /// Advances the clock by exactly one unit.
    ///
    /// Saturates at `u64::MAX`; a run never gets there because the timeout
    /// bound is itself a `u64`.
    #[inline(always)]
    pub const fn advance(&mut self) {
        self.now = SimTime(self.now.0.saturating_add(1));
    }

    /// Returns `true` once the clock has reached `bound`.
    #[inline(always)]
    pub fn reached(&self, bound: SimTime) -> bool {
        self.now >= bound
    }
}
