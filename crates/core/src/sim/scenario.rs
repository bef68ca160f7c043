//! Built-in scenarios selectable with `+UVM_TESTNAME`.
//!
//! These are behavioral stand-ins so the driver binary can run, trace, and
//! time out without linking a generated model. Both are a free-running clock
//! with a cycle counter under `top`:
//! 1. **`heartbeat`:** Raises its finish flag once `+FINISH_AT` units have elapsed (default 100).
//! 2. **`hang`:** Never finishes; exercises the timeout path.

use tracing::{debug, info};

use crate::common::{ScenarioError, SimTime};
use crate::model::{Model, SignalDecl};
use crate::plusargs::PlusArgs;

/// Plusarg that names the scenario to run.
pub const TESTNAME_PLUSARG: &str = "UVM_TESTNAME";
/// Plusarg that sets the elapsed time at which `heartbeat` finishes.
pub const FINISH_AT_PLUSARG: &str = "FINISH_AT";
/// Scenario used when `+UVM_TESTNAME` is absent.
pub const DEFAULT_SCENARIO: &str = "heartbeat";
/// Registered scenario names.
pub const SCENARIOS: &[&str] = &["heartbeat", "hang"];

const DEFAULT_FINISH_AT: u64 = 100;

/// Builds the model selected by `args`.
///
/// # Arguments
///
/// * `args` - Forwarded process arguments.
///
/// # Errors
///
/// Returns `ScenarioError::UnknownTest` for an unregistered `+UVM_TESTNAME`
/// and `ScenarioError::InvalidPlusarg` for a non-numeric `+FINISH_AT`.
pub fn from_plusargs(args: &PlusArgs) -> Result<Box<dyn Model>, ScenarioError> {
    let name = args.value(TESTNAME_PLUSARG).unwrap_or(DEFAULT_SCENARIO);
    let model = match name {
        "heartbeat" => {
            let finish_at = args
                .parse_value::<u64>(FINISH_AT_PLUSARG)?
                .unwrap_or(DEFAULT_FINISH_AT);
            Heartbeat::finishing_at(finish_at)
        }
        "hang" => Heartbeat::free_running(),
        other => {
            return Err(ScenarioError::UnknownTest {
                name: other.to_string(),
                available: SCENARIOS.join(", "),
            });
        }
    };
    info!(scenario = name, "selected scenario");
    Ok(Box::new(model))
}

/// Free-running clock with a cycle counter.
///
/// `clk` follows bit 0 of simulated time, so there is one rising edge every
/// two units and `cycles` counts them.
#[derive(Debug, Clone, Default)]
pub struct Heartbeat {
    clk: bool,
    cycles: u64,
    finish_at: Option<u64>,
    finished: bool,
    finalized: bool,
}

impl Heartbeat {
    /// A heartbeat that never finishes.
    pub fn free_running() -> Self {
        Self::default()
    }

    /// A heartbeat that finishes once `elapsed` units have passed.
    ///
    /// The flag is raised by the evaluation at `elapsed - 1`, so the driver
    /// stops with its clock at `elapsed`. `0` and `1` both finish during the
    /// startup evaluation, which happens at time zero.
    pub fn finishing_at(elapsed: u64) -> Self {
        Self {
            finish_at: Some(elapsed),
            ..Self::default()
        }
    }

    /// Returns the number of rising clock edges seen.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns `true` once `finalize` has run.
    pub const fn finalized(&self) -> bool {
        self.finalized
    }
}

impl Model for Heartbeat {
    fn eval(&mut self, now: SimTime) {
        let t = now.val();
        let clk = t & 1 == 1;
        if clk && !self.clk {
            self.cycles += 1;
        }
        self.clk = clk;

        let due = self
            .finish_at
            .is_some_and(|at| t.saturating_add(1) >= at);
        if due && !self.finished {
            debug!(time = t, "heartbeat requesting finish");
            self.finished = true;
        }
    }

    fn got_finish(&self) -> bool {
        self.finished
    }

    fn finalize(&mut self) {
        self.finalized = true;
        info!(cycles = self.cycles, finished = self.finished, "heartbeat final");
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::new("top.clk", 1),
            SignalDecl::new("top.hb.cycles", 32),
            SignalDecl::new("top.hb.finished", 1),
        ]
    }

    fn sample(&self, values: &mut Vec<u64>) {
        values.extend([
            u64::from(self.clk),
            self.cycles,
            u64::from(self.finished),
        ]);
    }
}
