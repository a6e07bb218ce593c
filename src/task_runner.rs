// src/task_runner.rs

use crate::model::TaskOutcome;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use thiserror::Error;

/// Cooperative cancellation flag shared with the worker thread. A running
/// subprocess is not preempted; the flag takes effect at the task's next
/// checkpoint.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress feed from the worker to the progress bar and log pane.
#[derive(Debug, PartialEq, Clone)]
pub enum ProgressNote {
    Status(String),
    Fraction(f64),
    Log(String),
}

#[derive(Clone)]
pub struct ProgressSink(Sender<ProgressNote>);

impl ProgressSink {
    pub fn status(&self, text: impl Into<String>) {
        let _ = self.0.send(ProgressNote::Status(text.into()));
    }

    pub fn fraction(&self, fraction: f64) {
        let _ = self.0.send(ProgressNote::Fraction(fraction));
    }

    pub fn log(&self, text: impl Into<String>) {
        let _ = self.0.send(ProgressNote::Log(text.into()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunnerError {
    #[error("a task is already running")]
    AlreadyRunning,
    #[error("no task is running")]
    NotRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Running,
}

/// Delivered at most once per task; a cancelled task delivers nothing.
#[derive(Debug, PartialEq, Clone)]
pub enum TaskCompletion {
    Completed(TaskOutcome),
    Failed(String),
}

struct RunSlot {
    state: TaskState,
    cancel: CancelToken,
    completion: Option<TaskCompletion>,
}

/// Runs one scan or install task at a time on a worker thread and hands
/// the result back to the UI thread by value. The UI polls
/// `take_completion`/`drain_progress` from its own event loop tick.
pub struct TaskRunner {
    slot: Arc<Mutex<RunSlot>>,
    progress_tx: Sender<ProgressNote>,
    progress_rx: Receiver<ProgressNote>,
}

impl TaskRunner {
    pub fn new() -> Self {
        let (progress_tx, progress_rx) = channel();
        Self {
            slot: Arc::new(Mutex::new(RunSlot {
                state: TaskState::Idle,
                cancel: CancelToken::new(),
                completion: None,
            })),
            progress_tx,
            progress_rx,
        }
    }

    pub fn state(&self) -> TaskState {
        self.slot.lock().unwrap().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == TaskState::Running
    }

    /// Spawns `task` on a fresh worker thread. Fails with `AlreadyRunning`
    /// unless the runner is idle.
    pub fn start<F>(&self, task: F) -> Result<(), RunnerError>
    where
        F: FnOnce(&CancelToken, &ProgressSink) -> anyhow::Result<TaskOutcome> + Send + 'static,
    {
        let cancel = {
            let mut slot = self.slot.lock().unwrap();
            if slot.state == TaskState::Running {
                return Err(RunnerError::AlreadyRunning);
            }
            slot.state = TaskState::Running;
            slot.cancel = CancelToken::new();
            slot.completion = None;
            slot.cancel.clone()
        };

        let sink = ProgressSink(self.progress_tx.clone());
        let slot = Arc::clone(&self.slot);
        thread::spawn(move || {
            let result = task(&cancel, &sink);

            // The cancel flag is checked under the same lock `cancel()`
            // takes, so a cancellation that raced the finish wins and the
            // notification is suppressed.
            let mut slot = slot.lock().unwrap();
            if !slot.cancel.is_cancelled() {
                slot.completion = Some(match result {
                    Ok(outcome) => TaskCompletion::Completed(outcome),
                    Err(err) => TaskCompletion::Failed(err.to_string()),
                });
            }
            slot.state = TaskState::Idle;
        });

        Ok(())
    }

    /// Requests a cooperative stop of the running task.
    pub fn cancel(&self) -> Result<(), RunnerError> {
        let slot = self.slot.lock().unwrap();
        if slot.state != TaskState::Running {
            return Err(RunnerError::NotRunning);
        }
        slot.cancel.cancel();
        Ok(())
    }

    /// Takes the pending completion, if any. Each completion is observed
    /// exactly once.
    pub fn take_completion(&self) -> Option<TaskCompletion> {
        self.slot.lock().unwrap().completion.take()
    }

    /// Drains queued progress notes without blocking.
    pub fn drain_progress(&self) -> Vec<ProgressNote> {
        self.progress_rx.try_iter().collect()
    }
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new()
    }
}
