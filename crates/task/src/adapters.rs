//! Ready-made `Task` implementations for closures and synchronous work

use crate::context::ExecutionContext;
use crate::task::{Completion, Task};
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use stackctl_core::Result;
use std::future::Future;

type Doer = Box<dyn Fn() -> Result<()> + Send + Sync>;
type Call = Box<dyn Fn(Completion) -> Result<()> + Send + Sync>;
type NamedCall = Box<dyn Fn(Completion, &str) -> Result<()> + Send + Sync>;
type AsyncCall = Box<dyn Fn(ExecutionContext) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Runs a plain closure; its error is reported as a scheduling error
pub struct GenericTask {
    pub description: String,
    doer: Doer,
}

impl GenericTask {
    pub fn new<F>(description: impl Into<String>, doer: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            doer: Box::new(doer),
        }
    }
}

#[async_trait]
impl Task for GenericTask {
    fn describe(&self) -> String {
        self.description.clone()
    }

    async fn run(&self, _ctx: &ExecutionContext, done: Completion) -> Result<()> {
        done.succeed();
        (self.doer)()
    }
}

/// Work that finishes before returning and needs no completion handle
pub trait SyncTask: Send + Sync {
    fn describe(&self) -> String;
    fn execute(&self) -> Result<()>;
}

/// Adapts a `SyncTask` to the `Task` contract.
///
/// The work runs on the executor's thread, so it should not block for long.
pub struct SynchronousTask<T>(pub T);

#[async_trait]
impl<T: SyncTask> Task for SynchronousTask<T> {
    fn describe(&self) -> String {
        self.0.describe()
    }

    async fn run(&self, _ctx: &ExecutionContext, done: Completion) -> Result<()> {
        done.finish(self.0.execute());
        Ok(())
    }
}

/// A described closure that owns its completion handle
pub struct TaskWithoutParams {
    pub info: String,
    call: Call,
}

impl TaskWithoutParams {
    pub fn new<F>(info: impl Into<String>, call: F) -> Self
    where
        F: Fn(Completion) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            info: info.into(),
            call: Box::new(call),
        }
    }
}

#[async_trait]
impl Task for TaskWithoutParams {
    fn describe(&self) -> String {
        self.info.clone()
    }

    async fn run(&self, _ctx: &ExecutionContext, done: Completion) -> Result<()> {
        (self.call)(done)
    }
}

/// Like `TaskWithoutParams`, with a resource name passed to the call
pub struct TaskWithNameParam {
    pub info: String,
    pub name: String,
    call: NamedCall,
}

impl TaskWithNameParam {
    pub fn new<F>(info: impl Into<String>, name: impl Into<String>, call: F) -> Self
    where
        F: Fn(Completion, &str) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            info: info.into(),
            name: name.into(),
            call: Box::new(call),
        }
    }
}

#[async_trait]
impl Task for TaskWithNameParam {
    fn describe(&self) -> String {
        self.info.clone()
    }

    async fn run(&self, _ctx: &ExecutionContext, done: Completion) -> Result<()> {
        (self.call)(done, &self.name)
    }
}

/// An async closure; its result becomes the task's terminal signal
pub struct AsyncTask {
    pub info: String,
    call: AsyncCall,
}

impl AsyncTask {
    pub fn new<F, Fut>(info: impl Into<String>, call: F) -> Self
    where
        F: Fn(ExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            info: info.into(),
            call: Box::new(move |ctx| call(ctx).boxed()),
        }
    }
}

#[async_trait]
impl Task for AsyncTask {
    fn describe(&self) -> String {
        self.info.clone()
    }

    async fn run(&self, ctx: &ExecutionContext, done: Completion) -> Result<()> {
        let result = (self.call)(ctx.clone()).await;
        done.finish(result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackctl_core::Error;

    async fn outcome(task: &dyn Task) -> (Result<()>, Result<()>) {
        let (done, receiver) = Completion::channel(task.describe());
        let scheduled = task.run(&ExecutionContext::new(), done).await;
        (scheduled, receiver.wait().await)
    }

    struct UpdateParameters {
        fails: bool,
    }

    impl SyncTask for UpdateParameters {
        fn describe(&self) -> String {
            "update stack parameters".to_string()
        }

        fn execute(&self) -> Result<()> {
            if self.fails {
                Err(Error::stack("cluster", "no updates are to be performed"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_generic_task_reports_doer_error_immediately() {
        let task = GenericTask::new("tag resources", || Err(Error::configuration("no tags")));
        let (scheduled, signalled) = outcome(&task).await;
        assert!(scheduled.is_err());
        assert!(signalled.is_ok());
    }

    #[tokio::test]
    async fn test_synchronous_task_signals_its_result() {
        let task = SynchronousTask(UpdateParameters { fails: true });
        assert_eq!(task.describe(), "update stack parameters");
        let (scheduled, signalled) = outcome(&task).await;
        assert!(scheduled.is_ok());
        assert!(matches!(signalled, Err(Error::Stack { .. })));

        let task = SynchronousTask(UpdateParameters { fails: false });
        let (_, signalled) = outcome(&task).await;
        assert!(signalled.is_ok());
    }

    #[tokio::test]
    async fn test_named_task_receives_its_name() {
        let task = TaskWithNameParam::new("delete stack", "eksctl-demo-addon", |done, name| {
            done.fail(Error::stack(name, "DELETE_FAILED"));
            Ok(())
        });
        let (_, signalled) = outcome(&task).await;
        assert_eq!(
            signalled.unwrap_err().to_string(),
            "stack 'eksctl-demo-addon': DELETE_FAILED"
        );
    }

    #[tokio::test]
    async fn test_async_task_sees_context() {
        let task = AsyncTask::new("watch readiness", |ctx| async move {
            match ctx.stop_reason() {
                Some(reason) => Err(reason),
                None => Ok(()),
            }
        });
        let (scheduled, signalled) = outcome(&task).await;
        assert!(scheduled.is_ok());
        assert!(signalled.is_ok());
    }
}
