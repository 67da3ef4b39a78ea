use super::single::run_single;
use crate::context::ExecutionContext;
use crate::task::Task;
use stackctl_core::Error;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Launch every child at once and wait for all of them.
///
/// A failing child never stops its siblings. Errors are collected in the
/// order children finish.
pub(crate) async fn run_parallel(tasks: &[Arc<dyn Task>], ctx: &ExecutionContext) -> Vec<Error> {
    let mut join_set = JoinSet::new();

    for task in tasks {
        let task = Arc::clone(task);
        let ctx = ctx.clone();
        join_set.spawn(async move {
            let description = task.describe();
            let errors = run_single(task, ctx).await;
            (description, errors)
        });
    }

    tracing::debug!("waiting for {} parallel tasks to complete", tasks.len());

    let mut all_errors = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((description, errors)) => {
                if !errors.is_empty() {
                    tracing::debug!(
                        "failed task: {} (will continue until other parallel tasks are completed)",
                        description
                    );
                }
                all_errors.extend(errors);
            }
            Err(e) => {
                all_errors.push(Error::configuration(format!("Task execution failed: {e}")));
            }
        }
    }

    all_errors
}
