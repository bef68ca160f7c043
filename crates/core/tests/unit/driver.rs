//! # Driver Tests
//!
//! Verifies the time-stepping loop: when it stops, what it reports, how often
//! the model is evaluated and finalized, and how trace sinks are driven.

use mockall::Sequence;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use vltdrive_core::common::{SimTime, TimeUnit, TraceError};
use vltdrive_core::config::GeneralConfig;
use vltdrive_core::{Driver, RunOutcome};

use crate::common::harness::{general, run_captured, run_model};
use crate::common::mocks::model::{MockDut, ScriptedModel};
use crate::common::mocks::sink::{FailAt, FailingSink, RecordingSink};

#[rstest]
#[case(0)]
#[case(1)]
#[case(10)]
#[case(250)]
fn test_hanging_model_times_out_at_bound(#[case] timeout: u64) {
    let (model, log) = ScriptedModel::hanging();
    let out = run_model(model, timeout);

    assert_eq!(out.report.outcome, RunOutcome::TimedOut);
    assert_eq!(out.report.exit_code(), 1);
    assert_eq!(out.report.end_time, SimTime(timeout));
    assert_eq!(
        out.console,
        format!("ERROR: Simulation timeout reached at {timeout} ns\n")
    );
    assert_eq!(log.borrow().finalized, 1);
}

#[rstest]
#[case(1, 0)]
#[case(2, 2)]
#[case(42, 42)]
#[case(100, 100)]
fn test_finishing_model_stops_at_finish_time(#[case] finish_at: u64, #[case] expected: u64) {
    let (model, log) = ScriptedModel::finishing_at(finish_at);
    let out = run_model(model, 1_000);

    assert_eq!(out.report.outcome, RunOutcome::Finished);
    assert_eq!(out.report.exit_code(), 0);
    assert_eq!(out.report.end_time, SimTime(expected));
    assert!(out.console.is_empty(), "finished run printed {:?}", out.console);
    assert!(out.report.diagnostic().is_none());
    assert_eq!(log.borrow().finalized, 1);
}

#[test]
fn test_evaluation_order_repeats_time_zero() {
    let (model, log) = ScriptedModel::hanging();
    let out = run_model(model, 3);

    // Startup evaluation at 0, then one per iteration at 0, 1, 2.
    assert_eq!(log.borrow().evals, vec![0, 0, 1, 2]);
    assert_eq!(out.report.stats.evaluations, 4);
    assert_eq!(out.report.stats.sim_time, SimTime(3));
}

#[test]
fn test_zero_timeout_still_evaluates_and_finalizes_once() {
    let mut model = MockDut::new();
    model.expect_eval().times(1).return_const(());
    model.expect_got_finish().return_const(false);
    model.expect_finalize().times(1).return_const(());
    model.expect_signals().never();
    model.expect_sample().never();

    let out = run_model(model, 0);
    assert_eq!(out.report.outcome, RunOutcome::TimedOut);
    assert_eq!(out.report.end_time, SimTime::ZERO);
}

#[test]
fn test_finish_during_startup_skips_the_loop() {
    let (model, log) = ScriptedModel::finishing_at(1);
    let out = run_model(model, 5);

    assert_eq!(out.report.outcome, RunOutcome::Finished);
    assert_eq!(out.report.end_time, SimTime::ZERO);
    assert_eq!(log.borrow().evals, vec![0]);
}

#[test]
fn test_finish_during_startup_with_zero_timeout_is_a_timeout() {
    let (model, log) = ScriptedModel::finishing_at(1);
    let out = run_model(model, 0);

    assert_eq!(out.report.outcome, RunOutcome::TimedOut);
    assert_eq!(out.console, "ERROR: Simulation timeout reached at 0 ns\n");
    assert_eq!(log.borrow().evals, vec![0]);
    assert_eq!(log.borrow().finalized, 1);
}

#[rstest]
#[case(2)]
#[case(10)]
#[case(42)]
fn test_finish_on_the_timeout_step_is_a_timeout(#[case] timeout: u64) {
    let (model, log) = ScriptedModel::finishing_at(timeout);
    let out = run_model(model, timeout);

    assert_eq!(out.report.outcome, RunOutcome::TimedOut);
    assert_eq!(out.report.exit_code(), 1);
    assert_eq!(out.report.end_time, SimTime(timeout));
    assert_eq!(
        out.console,
        format!("ERROR: Simulation timeout reached at {timeout} ns\n")
    );
    assert_eq!(log.borrow().finalized, 1);
}

#[test]
fn test_finalize_follows_the_last_eval_and_precedes_release() {
    let mut seq = Sequence::new();
    let mut model = MockDut::new();
    model.expect_got_finish().return_const(false);
    model
        .expect_eval()
        .times(3)
        .in_sequence(&mut seq)
        .return_const(());
    model
        .expect_finalize()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let out = run_model(model, 2);
    assert_eq!(out.report.outcome, RunOutcome::TimedOut);
}

#[test]
fn test_model_is_released_after_finalize() {
    let (model, log) = ScriptedModel::finishing_at(5);
    let _ = run_model(model, 100);

    let log = log.borrow();
    assert_eq!(log.finalized, 1);
    assert!(log.dropped);
    assert!(!log.dropped_before_finalize);
}

#[test]
fn test_diagnostic_uses_configured_unit() {
    let (model, _) = ScriptedModel::hanging();
    let config = GeneralConfig {
        timeout: 7,
        time_unit: TimeUnit::Ps,
        ..GeneralConfig::default()
    };
    let out = run_captured(Driver::new(model, &config));

    assert_eq!(out.console, "ERROR: Simulation timeout reached at 7 ps\n");
    assert_eq!(out.report.stats.time_unit, TimeUnit::Ps);
}

#[test]
fn test_progress_interval_does_not_change_the_run() {
    let (model, log) = ScriptedModel::hanging();
    let config = GeneralConfig {
        timeout: 20,
        progress_interval: Some(5),
        ..GeneralConfig::default()
    };
    let out = run_captured(Driver::new(model, &config));

    assert_eq!(out.report.end_time, SimTime(20));
    assert_eq!(log.borrow().evals.len(), 21);
}

#[test]
fn test_zero_progress_interval_disables_progress_logging() {
    let (model, log) = ScriptedModel::hanging();
    let config = GeneralConfig {
        timeout: 5,
        progress_interval: Some(0),
        ..GeneralConfig::default()
    };
    let out = run_captured(Driver::new(model, &config));

    assert_eq!(out.report.outcome, RunOutcome::TimedOut);
    assert_eq!(out.report.end_time, SimTime(5));
    assert_eq!(log.borrow().evals.len(), 6);
}

#[test]
fn test_trace_receives_one_sample_per_iteration() {
    let (model, _) = ScriptedModel::finishing_at(4);
    let (sink, log) = RecordingSink::new();
    let driver = Driver::new(model, &general(100)).with_trace(Box::new(sink), 7);
    let out = run_captured(driver);

    let log = log.borrow();
    assert_eq!(
        log.opened,
        vec![(
            vec!["top.count".to_string(), "top.sub.even".to_string()],
            7,
            TimeUnit::Ns
        )]
    );
    assert_eq!(
        log.records,
        vec![
            (0, vec![0, 1]),
            (1, vec![1, 0]),
            (2, vec![2, 1]),
            (3, vec![3, 0]),
        ]
    );
    assert_eq!(log.closes, 1);
    assert_eq!(out.report.stats.samples, 4);
    assert!(!out.report.trace_aborted);
}

#[test]
fn test_timed_out_run_still_closes_trace() {
    let (model, _) = ScriptedModel::hanging();
    let (sink, log) = RecordingSink::new();
    let driver = Driver::new(model, &general(5)).with_trace(Box::new(sink), 99);
    let out = run_captured(driver);

    assert_eq!(out.report.outcome, RunOutcome::TimedOut);
    assert_eq!(log.borrow().records.len(), 5);
    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn test_untraced_run_never_samples() {
    let mut model = MockDut::new();
    model.expect_eval().return_const(());
    model.expect_got_finish().return_const(false);
    model.expect_finalize().times(1).return_const(());
    model.expect_signals().never();
    model.expect_sample().never();

    let out = run_model(model, 50);
    assert_eq!(out.report.stats.samples, 0);
}

#[test]
fn test_trace_open_failure_aborts_before_any_eval() {
    let mut model = MockDut::new();
    model.expect_signals().times(1).returning(Vec::new);
    model.expect_eval().never();
    model.expect_finalize().never();

    let (sink, log) = FailingSink::new(FailAt::Open);
    let driver = Driver::new(model, &general(10)).with_trace(Box::new(sink), 99);
    let mut console = Vec::new();
    let err = driver.run_with_console(&mut console).unwrap_err();

    assert!(matches!(err, TraceError::Io(_)));
    assert!(console.is_empty());
    assert!(log.borrow().records.is_empty());
}

#[test]
fn test_trace_record_failure_drops_tracing_and_continues() {
    let (model, model_log) = ScriptedModel::hanging();
    let (sink, log) = FailingSink::new(FailAt::Record(3));
    let driver = Driver::new(model, &general(10)).with_trace(Box::new(sink), 99);
    let out = run_captured(driver);

    assert_eq!(out.report.outcome, RunOutcome::TimedOut);
    assert_eq!(out.report.end_time, SimTime(10));
    assert!(out.report.trace_aborted);
    assert_eq!(out.report.stats.samples, 3);
    assert_eq!(log.borrow().records.len(), 3);
    assert_eq!(log.borrow().closes, 1);
    assert_eq!(model_log.borrow().evals.len(), 11);
    assert_eq!(model_log.borrow().finalized, 1);
}

#[test]
fn test_close_failure_after_record_failure_does_not_stop_the_run() {
    let (model, model_log) = ScriptedModel::finishing_at(8);
    let (sink, log) = FailingSink::new(FailAt::Record(0));
    let driver = Driver::new(model, &general(10)).with_trace(Box::new(sink.failing_close()), 99);
    let out = run_captured(driver);

    assert_eq!(out.report.outcome, RunOutcome::Finished);
    assert!(out.report.trace_aborted);
    assert_eq!(out.report.stats.samples, 0);
    assert_eq!(log.borrow().closes, 1);
    assert_eq!(model_log.borrow().finalized, 1);
}

#[test]
fn test_close_failure_at_end_of_run_is_not_fatal() {
    let (model, _) = ScriptedModel::hanging();
    let (sink, log) = FailingSink::new(FailAt::Record(u64::MAX));
    let driver = Driver::new(model, &general(4)).with_trace(Box::new(sink.failing_close()), 99);
    let out = run_captured(driver);

    assert_eq!(out.report.outcome, RunOutcome::TimedOut);
    assert!(!out.report.trace_aborted);
    assert_eq!(out.report.stats.samples, 4);
    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn test_report_serializes_outcome_in_snake_case() {
    let (model, _) = ScriptedModel::hanging();
    let out = run_model(model, 2);
    let json = serde_json::to_value(&out.report).unwrap();

    assert_eq!(json["outcome"], "timed_out");
    assert_eq!(json["end_time"], 2);
    assert_eq!(json["stats"]["evaluations"], 3);
    assert_eq!(json["trace_aborted"], false);
}

#[test]
fn test_driver_debug_does_not_require_model_debug() {
    let (model, _) = ScriptedModel::hanging();
    let driver = Driver::new(model, &general(9));
    let text = format!("{driver:?}");
    assert!(text.contains("timeout: SimTime(9)"));
    assert_eq!(driver.now(), SimTime::ZERO);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_hanging_run_ends_exactly_at_timeout(timeout in 0u64..2_000) {
        let (model, log) = ScriptedModel::hanging();
        let out = run_model(model, timeout);

        prop_assert_eq!(out.report.outcome, RunOutcome::TimedOut);
        prop_assert_eq!(out.report.end_time, SimTime(timeout));
        prop_assert_eq!(out.report.stats.evaluations, timeout + 1);
        prop_assert!(out.console.contains(&timeout.to_string()));
        prop_assert_eq!(log.borrow().finalized, 1);
    }

    #[test]
    fn prop_finish_before_timeout_wins(finish_at in 2u64..500, slack in 1u64..500) {
        let timeout = finish_at + slack;
        let (model, _) = ScriptedModel::finishing_at(finish_at);
        let out = run_model(model, timeout);

        prop_assert_eq!(out.report.outcome, RunOutcome::Finished);
        prop_assert_eq!(out.report.end_time, SimTime(finish_at));
        prop_assert!(out.console.is_empty());
    }

    #[test]
    fn prop_finish_at_or_after_timeout_is_a_timeout(timeout in 2u64..500, late in 0u64..500) {
        let (model, _) = ScriptedModel::finishing_at(timeout + late);
        let out = run_model(model, timeout);

        prop_assert_eq!(out.report.outcome, RunOutcome::TimedOut);
        prop_assert_eq!(out.report.exit_code(), 1);
    }
}
