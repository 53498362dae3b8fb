//! Load → run → pause → resume scenarios against the public library API.
//!
//! Evaluator tests drive `step()` directly; driver tests run on tokio's paused
//! clock so ticks cost no wall-clock time.

use std::time::Duration;

use sieve::core::candidates::SixDigitFilter;
use sieve::core::evaluator::{Evaluator, StepOutcome};
use sieve::core::probe::{RejectAll, RejectSuffix};
use sieve::core::types::{EvalState, LoadError, StartError};
use sieve::driver::{DriverEvent, TickDriver};
use sieve::test_support::loaded_evaluator;

/// Input lines with two invalid entries, classified by the `123` suffix rule.
#[test]
fn suffix_rule_partitions_filtered_candidates() {
    let mut eval = Evaluator::new(RejectSuffix::default());
    let total = eval
        .load(
            ["123123", "000000", "999123", "abcdef", "12345"],
            &SixDigitFilter,
        )
        .expect("load");
    assert_eq!(total, 3);
    assert_eq!(
        eval.candidates().as_slice(),
        ["123123", "000000", "999123"]
    );

    eval.start().expect("start");
    for _ in 0..3 {
        eval.step();
    }

    assert_eq!(eval.rejected(), ["123123", "999123"]);
    assert_eq!(eval.accepted(), ["000000"]);
    assert_eq!(eval.cursor(), 3);
    assert_eq!(eval.state(), EvalState::Idle);
    assert_eq!(eval.report().progress().to_string(), "Testing complete.");
}

#[test]
fn empty_load_then_start_reports_nothing_to_test() {
    let mut eval = Evaluator::new(RejectSuffix::default());
    let err = eval.load(["abcdef", "12345"], &SixDigitFilter).unwrap_err();
    assert!(matches!(err, LoadError::EmptyAfterFilter { .. }));
    assert_eq!(eval.start(), Err(StartError::NothingToTest));
    assert_eq!(eval.report().progress().to_string(), "No candidates to test.");
}

#[test]
fn resume_after_pause_continues_with_second_candidate() {
    let mut eval = loaded_evaluator(RejectSuffix::default(), &["000000", "111111", "222123"]);
    eval.start().expect("start");
    eval.step();
    eval.pause();
    eval.start().expect("resume");

    match eval.step() {
        StepOutcome::Classified { index, candidate, .. } => {
            assert_eq!(index, 1);
            assert_eq!(candidate, "111111");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn reject_all_fills_the_bin_in_order() {
    let mut eval = loaded_evaluator(RejectAll, &["000000", "111111"]);
    eval.start().expect("start");
    eval.step();
    eval.step();
    let report = eval.report();
    assert_eq!(report.bin(), "000000\n111111\n");
    assert!(report.accepted.is_empty());
    assert_eq!(report.stats_line(), "Tested 2 candidates. Invalid: 2");
}

#[tokio::test(start_paused = true)]
async fn driver_reports_progress_while_running() {
    let eval = loaded_evaluator(RejectSuffix::default(), &["000000", "111111", "222222"]);
    let mut driver = TickDriver::new(eval, Duration::from_millis(200)).expect("driver");
    let mut rx = driver.subscribe();
    driver.start().expect("start");

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(
        driver.report().progress().to_string(),
        "Testing candidate 2/3"
    );

    let mut completed = false;
    while let Ok(event) = rx.recv().await {
        if let DriverEvent::Completed { accepted, rejected } = event {
            assert_eq!((accepted, rejected), (3, 0));
            completed = true;
            break;
        }
    }
    assert!(completed);
    assert_eq!(driver.state(), EvalState::Idle);
    let report = driver.shutdown().await;
    assert_eq!(report.progress().to_string(), "Testing complete.");
}
