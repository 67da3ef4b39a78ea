use crate::context::ExecutionContext;
use crate::task::{Completion, Task};
use stackctl_core::{Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinError;
use tokio_util::task::AbortOnDropHandle;
use tracing::Instrument;

/// Launch one task, wait for its terminal signal and return its errors.
///
/// Leaves race against the context so a cancelled or expired run stops
/// them. Trees are awaited to the end: their own leaves observe the same
/// context and report individually. Dropping the returned future aborts
/// the launched work.
pub(crate) async fn run_single(task: Arc<dyn Task>, ctx: ExecutionContext) -> Vec<Error> {
    let description = task.describe();
    let is_tree = task.as_tree().is_some();
    tracing::debug!(task = %description, "started task");
    let start_time = Instant::now();

    let span = stackctl_utils::task_span(&description);
    let mut handle = AbortOnDropHandle::new(tokio::spawn(
        invoke(task, description.clone(), ctx.clone()).instrument(span),
    ));

    let outcome = if is_tree {
        join_outcome(&description, (&mut handle).await)
    } else {
        tokio::select! {
            joined = &mut handle => join_outcome(&description, joined),
            reason = ctx.cancelled() => {
                handle.abort();
                Err(reason)
            }
        }
    };

    let duration_ms = start_time.elapsed().as_millis() as u64;
    match outcome {
        Ok(()) => {
            stackctl_utils::task_completed(&description, duration_ms, true);
            Vec::new()
        }
        Err(error) => {
            stackctl_utils::task_completed(&description, duration_ms, false);
            error
                .into_errors()
                .into_iter()
                .map(|e| attribute(&description, e))
                .collect()
        }
    }
}

async fn invoke(task: Arc<dyn Task>, description: String, ctx: ExecutionContext) -> Result<()> {
    let (done, receiver) = Completion::channel(description);
    task.run(&ctx, done).await?;
    receiver.wait().await
}

fn join_outcome(description: &str, joined: std::result::Result<Result<()>, JoinError>) -> Result<()> {
    match joined {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(Error::task_panicked(description, panic_message(e))),
        Err(e) => Err(Error::cancelled(format!("{description} ({e})"))),
    }
}

fn panic_message(error: JoinError) -> String {
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Tag an error with the task that produced it, unless it already is
pub(crate) fn attribute(description: &str, error: Error) -> Error {
    if error.task_description().is_some() {
        error
    } else {
        Error::task(description, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{AsyncTask, TaskWithoutParams};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_scheduling_error_is_attributed() {
        let task = TaskWithoutParams::new("t1.0", |_done| {
            Err(Error::configuration("does not even bother"))
        });
        let errors = run_single(Arc::new(task), ExecutionContext::new()).await;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].task_description(), Some("t1.0"));
        assert_eq!(
            errors[0].to_string(),
            "t1.0: configuration error: does not even bother"
        );
    }

    #[tokio::test]
    async fn test_missing_dependency_is_not_tagged_twice() {
        let task = TaskWithoutParams::new("create serviceaccount", |_done| {
            Err(Error::missing_dependency(
                "create serviceaccount",
                "Kubernetes client configuration",
            ))
        });
        let errors = run_single(Arc::new(task), ExecutionContext::new()).await;
        assert!(matches!(errors[0], Error::MissingDependency { .. }));
    }

    #[tokio::test]
    async fn test_panic_is_reported() {
        let task = TaskWithoutParams::new("explodes", |_done| panic!("boom"));
        let errors = run_single(Arc::new(task), ExecutionContext::new()).await;
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], Error::TaskPanicked { task, message } if task == "explodes" && message == "boom"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaf_is_stopped_at_deadline() {
        let task = AsyncTask::new("wait for stack", |_ctx| async {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok(())
        });
        let ctx = ExecutionContext::new().with_timeout(Duration::from_secs(30));
        let errors = run_single(Arc::new(task), ctx).await;
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_timeout());
        assert_eq!(errors[0].task_description(), Some("wait for stack"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_launch_aborts_the_leaf() {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&finished);
        let task = AsyncTask::new("delete stack", move |_ctx| {
            let counter = Arc::clone(&counter);
            async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        let launch = run_single(Arc::new(task), ExecutionContext::new());
        assert!(tokio::time::timeout(Duration::from_secs(1), launch).await.is_err());
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dropped_completion_is_reported_for_the_task() {
        let task = TaskWithoutParams::new("create serviceaccount", |done| {
            tokio::spawn(async move {
                let _done = done;
                panic!("client went away");
            });
            Ok(())
        });
        let errors = run_single(Arc::new(task), ExecutionContext::new()).await;
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            Error::TaskPanicked { task, .. } if task == "create serviceaccount"
        ));
    }
}
