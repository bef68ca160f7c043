use vltdrive_core::config::GeneralConfig;
use vltdrive_core::model::Model;
use vltdrive_core::{Driver, RunReport};

/// Installs a test-friendly subscriber once per process.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("vltdrive_core=debug")
        .try_init();
}

/// General settings with the given timeout and everything else default.
pub fn general(timeout: u64) -> GeneralConfig {
    GeneralConfig {
        timeout,
        ..GeneralConfig::default()
    }
}

/// Captured result of one run.
pub struct RunOutput {
    pub report: RunReport,
    pub console: String,
}

/// Runs `driver` to completion, capturing what it writes to the console.
pub fn run_captured<M: Model>(driver: Driver<M>) -> RunOutput {
    init_logging();
    let mut console = Vec::new();
    let report = driver
        .run_with_console(&mut console)
        .expect("driver run failed");
    RunOutput {
        report,
        console: String::from_utf8(console).expect("console output is not UTF-8"),
    }
}

/// Builds a driver for `model` with the given timeout and runs it.
pub fn run_model<M: Model>(model: M, timeout: u64) -> RunOutput {
    run_captured(Driver::new(model, &general(timeout)))
}
