//! Model capability the driver steps.
//!
//! A model is the compiled design under test together with whatever test
//! logic is embedded in it. The driver treats it as opaque: it only evaluates
//! it, asks whether it has finished, runs its end-of-simulation hook, and, when
//! tracing, reads back the signals it chooses to expose.

use crate::common::SimTime;

/// Trait for simulation models driven by [`Driver`](crate::sim::Driver).
///
/// Implementations wrap a generated model (or any hand-written behavioral
/// stand-in). All internal concurrency of the design is resolved inside a
/// single call to [`eval`](Model::eval).
pub trait Model {
    /// Evaluates the model at simulated time `now`.
    ///
    /// May execute arbitrary internal logic, including raising the finish flag.
    fn eval(&mut self, now: SimTime);

    /// Returns `true` once the model has requested the end of simulation.
    fn got_finish(&self) -> bool;

    /// Runs deferred end-of-simulation behavior. Called exactly once per run.
    fn finalize(&mut self) {}

    /// Declares the signals this model exposes to a waveform trace.
    ///
    /// Called once when tracing starts. The order of the returned list is the
    /// order of the values written by [`sample`](Model::sample).
    fn signals(&self) -> Vec<SignalDecl> {
        Vec::new()
    }

    /// Writes the current value of every declared signal into `values`.
    ///
    /// `values` arrives cleared. Values wider than 64 bits are not supported.
    fn sample(&self, _values: &mut Vec<u64>) {}
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn eval(&mut self, now: SimTime) {
        (**self).eval(now);
    }

    fn got_finish(&self) -> bool {
        (**self).got_finish()
    }

    fn finalize(&mut self) {
        (**self).finalize();
    }

    fn signals(&self) -> Vec<SignalDecl> {
        (**self).signals()
    }

    fn sample(&self, values: &mut Vec<u64>) {
        (**self).sample(values);
    }
}

impl<M: Model + ?Sized> Model for &mut M {
    fn eval(&mut self, now: SimTime) {
        (**self).eval(now);
    }

    fn got_finish(&self) -> bool {
        (**self).got_finish()
    }

    fn finalize(&mut self) {
        (**self).finalize();
    }

    fn signals(&self) -> Vec<SignalDecl> {
        (**self).signals()
    }

    fn sample(&self, values: &mut Vec<u64>) {
        (**self).sample(values);
    }
}

/// Declaration of one traced signal.
///
/// Signals are named by their dot-separated hierarchical path, e.g.
/// `top.dut.phy.clk`; every component but the last is a scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalDecl {
    path: String,
    width: u32,
}

impl SignalDecl {
    /// Creates a signal declaration.
    ///
    /// # Arguments
    ///
    /// * `path` - Dot-separated hierarchical name.
    /// * `width` - Bit width, between 1 and 64.
    ///
    /// # Returns
    ///
    /// A new declaration; `width` is clamped into `1..=64`.
    pub fn new(path: impl Into<String>, width: u32) -> Self {
        Self {
            path: path.into(),
            width: width.clamp(1, 64),
        }
    }

    /// Returns the full hierarchical path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the bit width.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the enclosing scopes, outermost first.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        let prefix = self.path.rsplit_once('.').map_or("", |(scopes, _)| scopes);
        prefix.split('.').filter(|scope| !scope.is_empty())
    }

    /// Returns the leaf name.
    pub fn name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    /// Returns the nesting depth (number of enclosing scopes).
    pub fn depth(&self) -> u32 {
        self.path.matches('.').count() as u32
    }

    /// Masks `value` to this signal's width.
    #[inline]
    pub const fn mask(&self, value: u64) -> u64 {
        if self.width >= 64 {
            value
        } else {
            value & ((1u64 << self.width) - 1)
        }
    }
}
