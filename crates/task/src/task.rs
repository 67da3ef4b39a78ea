//! The `Task` contract and its one-shot completion signal

use crate::context::ExecutionContext;
use crate::tree::TaskTree;
use async_trait::async_trait;
use stackctl_core::{Error, Result};
use tokio::sync::oneshot;

/// A single describable, executable unit of work.
///
/// `run` returning `Err` is a scheduling error: the task could not begin and
/// `done` is ignored. Otherwise the task reports its terminal outcome through
/// `done` exactly once, either before returning or later from a spawned
/// future. `close` finishes without a value. Dropping `done` without
/// signalling is reported as an error.
#[async_trait]
pub trait Task: Send + Sync {
    /// Stable, side-effect free label used for logs and plan output
    fn describe(&self) -> String;

    /// Start the work
    async fn run(&self, ctx: &ExecutionContext, done: Completion) -> Result<()>;

    /// The tree behind this task, if it is one
    fn as_tree(&self) -> Option<&TaskTree> {
        None
    }
}

/// Terminal signal handed to every task launch.
///
/// Every method consumes the handle, so a task cannot signal twice.
#[derive(Debug)]
pub struct Completion {
    task: String,
    tx: Option<oneshot::Sender<Result<()>>>,
}

impl Completion {
    /// Create a completion handle for `task` and the receiver the launcher
    /// waits on
    #[must_use]
    pub fn channel(task: impl Into<String>) -> (Completion, CompletionReceiver) {
        let (tx, rx) = oneshot::channel();
        let done = Completion {
            task: task.into(),
            tx: Some(tx),
        };
        (done, CompletionReceiver { rx })
    }

    /// Report success
    pub fn succeed(self) {
        self.finish(Ok(()));
    }

    /// Report failure
    pub fn fail(self, error: Error) {
        self.finish(Err(error));
    }

    /// Finish without an error value
    pub fn close(self) {
        self.finish(Ok(()));
    }

    /// Report an outcome
    pub fn finish(mut self, result: Result<()>) {
        self.send(result);
    }

    fn send(&mut self, result: Result<()>) {
        if let Some(tx) = self.tx.take() {
            // receiver gone means the launch was cancelled; nothing left to tell
            let _ = tx.send(result);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.tx.is_none() {
            return;
        }
        let error = if std::thread::panicking() {
            Error::task_panicked(
                self.task.clone(),
                "panicked before reporting an outcome",
            )
        } else {
            Error::unsignalled(self.task.clone())
        };
        self.send(Err(error));
    }
}

/// Launcher side of a `Completion`
#[derive(Debug)]
pub struct CompletionReceiver {
    rx: oneshot::Receiver<Result<()>>,
}

impl CompletionReceiver {
    /// Wait for the task's terminal signal
    pub async fn wait(self) -> Result<()> {
        // only reachable if the handle was leaked
        self.rx
            .await
            .map_err(|_| Error::cancelled("waiting for task completion"))?
    }
}
