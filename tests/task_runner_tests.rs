// tests/task_runner_tests.rs
use driverhub::model::{ScanResult, TaskOutcome};
use driverhub::task_runner::{ProgressNote, RunnerError, TaskCompletion, TaskRunner, TaskState};
use std::sync::mpsc::channel;
use std::thread;
use std::time::{Duration, Instant};

fn empty_scan() -> TaskOutcome {
    TaskOutcome::Scan(ScanResult::ok(Vec::new()))
}

fn wait_until_idle(runner: &TaskRunner) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while runner.state() != TaskState::Idle {
        assert!(Instant::now() < deadline, "runner did not return to idle");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn completion_is_delivered_exactly_once() {
    let runner = TaskRunner::new();
    runner.start(|_, _| Ok(empty_scan())).unwrap();
    wait_until_idle(&runner);

    match runner.take_completion() {
        Some(TaskCompletion::Completed(TaskOutcome::Scan(result))) => {
            assert!(result.succeeded());
            assert!(result.entries.is_empty());
        }
        other => panic!("unexpected completion: {:?}", other),
    }
    assert_eq!(runner.take_completion(), None);
}

#[test]
fn start_while_running_fails_and_leaves_task_alone() {
    let runner = TaskRunner::new();
    let (gate_tx, gate_rx) = channel::<()>();

    runner
        .start(move |_, _| {
            gate_rx.recv().unwrap();
            Ok(empty_scan())
        })
        .unwrap();

    assert_eq!(runner.state(), TaskState::Running);
    assert_eq!(
        runner.start(|_, _| Ok(empty_scan())),
        Err(RunnerError::AlreadyRunning)
    );

    gate_tx.send(()).unwrap();
    wait_until_idle(&runner);

    // The original task still delivers its one completion.
    assert!(matches!(
        runner.take_completion(),
        Some(TaskCompletion::Completed(_))
    ));
}

#[test]
fn cancel_suppresses_the_completion() {
    let runner = TaskRunner::new();
    let (gate_tx, gate_rx) = channel::<()>();

    runner
        .start(move |_, _| {
            gate_rx.recv().unwrap();
            Ok(empty_scan())
        })
        .unwrap();

    runner.cancel().unwrap();
    gate_tx.send(()).unwrap();
    wait_until_idle(&runner);

    assert_eq!(runner.take_completion(), None);
}

#[test]
fn cancel_is_only_valid_while_running() {
    let runner = TaskRunner::new();
    assert_eq!(runner.cancel(), Err(RunnerError::NotRunning));
}

#[test]
fn failed_task_reports_the_error() {
    let runner = TaskRunner::new();
    runner
        .start(|_, _| Err(anyhow::anyhow!("detection blew up")))
        .unwrap();
    wait_until_idle(&runner);

    match runner.take_completion() {
        Some(TaskCompletion::Failed(message)) => {
            assert!(message.contains("detection blew up"));
        }
        other => panic!("unexpected completion: {:?}", other),
    }
}

#[test]
fn cancelled_task_checkpoints_through_the_token() {
    let runner = TaskRunner::new();
    let (gate_tx, gate_rx) = channel::<()>();

    runner
        .start(move |cancel, _| {
            gate_rx.recv().unwrap();
            // Cooperative checkpoint: the flag is already set by the time
            // the gate opens.
            assert!(cancel.is_cancelled());
            Ok(empty_scan())
        })
        .unwrap();

    runner.cancel().unwrap();
    gate_tx.send(()).unwrap();
    wait_until_idle(&runner);
    assert_eq!(runner.take_completion(), None);
}

#[test]
fn progress_notes_reach_the_consumer() {
    let runner = TaskRunner::new();
    runner
        .start(|_, progress| {
            progress.status("working");
            progress.fraction(0.5);
            progress.log("hello");
            Ok(empty_scan())
        })
        .unwrap();
    wait_until_idle(&runner);

    let notes = runner.drain_progress();
    assert!(notes.contains(&ProgressNote::Status("working".into())));
    assert!(notes.contains(&ProgressNote::Fraction(0.5)));
    assert!(notes.contains(&ProgressNote::Log("hello".into())));
}
