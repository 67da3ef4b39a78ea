use super::single::{attribute, run_single};
use crate::context::ExecutionContext;
use crate::task::Task;
use stackctl_core::{Error, SequentialPolicy};
use std::sync::Arc;

/// Run children one at a time in append order.
///
/// With `FailFast` nothing after the first failing child is launched. With
/// `ContinueOnError` every child runs. A cancelled or expired run stops
/// before the next launch and reports the first skipped child.
pub(crate) async fn run_sequential(
    tasks: &[Arc<dyn Task>],
    policy: SequentialPolicy,
    ctx: &ExecutionContext,
) -> Vec<Error> {
    let mut all_errors = Vec::new();

    for (index, task) in tasks.iter().enumerate() {
        if let Some(reason) = ctx.stop_reason() {
            let description = task.describe();
            tracing::debug!(
                "stopping before task: {} ({} sequential tasks not started)",
                description,
                tasks.len() - index
            );
            all_errors.push(attribute(&description, reason));
            break;
        }

        let errors = run_single(Arc::clone(task), ctx.clone()).await;
        if errors.is_empty() {
            continue;
        }
        all_errors.extend(errors);

        if policy.stops_on_failure() {
            tracing::debug!(
                "failed task: {} (will not run other sequential tasks)",
                task.describe()
            );
            break;
        }
        tracing::debug!(
            "failed task: {} (continuing with remaining sequential tasks)",
            task.describe()
        );
    }

    all_errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TaskWithoutParams;
    use parking_lot::Mutex;

    fn recording_task(
        info: &'static str,
        fails: bool,
        log: Arc<Mutex<Vec<&'static str>>>,
    ) -> Arc<dyn Task> {
        Arc::new(TaskWithoutParams::new(info, move |done| {
            log.lock().push(info);
            if fails {
                done.fail(Error::configuration(format!("{info} always fails")));
            } else {
                done.succeed();
            }
            Ok(())
        }))
    }

    fn chain(fail_at: usize, log: &Arc<Mutex<Vec<&'static str>>>) -> Vec<Arc<dyn Task>> {
        ["t1", "t2", "t3", "t4"]
            .iter()
            .enumerate()
            .map(|(i, info)| recording_task(info, i == fail_at, Arc::clone(log)))
            .collect()
    }

    #[tokio::test]
    async fn test_fail_fast_stops_after_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let tasks = chain(1, &log);

        let errors =
            run_sequential(&tasks, SequentialPolicy::FailFast, &ExecutionContext::new()).await;

        assert_eq!(*log.lock(), vec!["t1", "t2"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].task_description(), Some("t2"));
    }

    #[tokio::test]
    async fn test_continue_on_error_runs_everything() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let tasks = chain(1, &log);

        let errors = run_sequential(
            &tasks,
            SequentialPolicy::ContinueOnError,
            &ExecutionContext::new(),
        )
        .await;

        assert_eq!(*log.lock(), vec!["t1", "t2", "t3", "t4"]);
        assert_eq!(errors.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_run_launches_nothing() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let tasks = chain(usize::MAX, &log);
        let ctx = ExecutionContext::new();
        ctx.cancel();

        let errors = run_sequential(&tasks, SequentialPolicy::ContinueOnError, &ctx).await;

        assert!(log.lock().is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_cancelled());
        assert_eq!(errors[0].task_description(), Some("t1"));
    }
}
