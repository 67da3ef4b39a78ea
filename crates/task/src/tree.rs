//! `TaskTree`: a composite task running its children in parallel or in order

use crate::context::ExecutionContext;
use crate::describe;
use crate::executor;
use crate::task::{Completion, Task};
use async_trait::async_trait;
use stackctl_core::{Error, ExecutionSettings, Result, SequentialPolicy};
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

/// An ordered, append-only collection of tasks and nested trees.
///
/// Trees are built synchronously, run once and discarded. Appending needs
/// `&mut self` while running borrows `&self`, so a tree cannot change
/// during its own walk.
#[derive(Default)]
pub struct TaskTree {
    tasks: Vec<Arc<dyn Task>>,
    /// Run children concurrently instead of in append order
    pub parallel: bool,
    /// Render the plan instead of executing; inherited by every descendant
    pub plan_mode: bool,
    /// Nested inside a parent tree; only affects `describe`
    pub is_sub_task: bool,
    /// Failure policy for sequential trees. `None` uses the run's default.
    pub sequential_policy: Option<SequentialPolicy>,
}

impl TaskTree {
    /// Empty sequential tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty tree whose children fan out concurrently
    #[must_use]
    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }

    /// Empty tree whose children run in append order
    #[must_use]
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Empty tree already marked as nested
    #[must_use]
    pub fn sub_tree(parallel: bool) -> Self {
        Self {
            parallel,
            is_sub_task: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_plan_mode(mut self, plan_mode: bool) -> Self {
        self.plan_mode = plan_mode;
        self
    }

    #[must_use]
    pub fn with_sequential_policy(mut self, policy: SequentialPolicy) -> Self {
        self.sequential_policy = Some(policy);
        self
    }

    #[must_use]
    pub fn as_sub_task(mut self) -> Self {
        self.is_sub_task = true;
        self
    }

    /// Append a task or a nested tree
    pub fn append<T: Task + 'static>(&mut self, task: T) {
        self.tasks.push(Arc::new(task));
    }

    /// Append an already shared task
    pub fn append_arc(&mut self, task: Arc<dyn Task>) {
        self.tasks.push(task);
    }

    /// Append several shared tasks, keeping their order
    pub fn append_all<I>(&mut self, tasks: I)
    where
        I: IntoIterator<Item = Arc<dyn Task>>,
    {
        self.tasks.extend(tasks);
    }

    /// Number of top-level entries, not counting their descendants
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Top-level entries in append order
    #[must_use]
    pub fn tasks(&self) -> &[Arc<dyn Task>] {
        &self.tasks
    }

    /// Number of leaf tasks across every level
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.tasks
            .iter()
            .map(|task| task.as_tree().map_or(1, TaskTree::leaf_count))
            .sum()
    }

    /// Policy this tree applies under `ctx`
    #[must_use]
    pub fn effective_policy(&self, ctx: &ExecutionContext) -> SequentialPolicy {
        self.sequential_policy.unwrap_or_else(|| ctx.default_policy())
    }

    /// Dry-run report of everything this tree would do
    #[must_use]
    pub fn plan(&self) -> String {
        let description = self.describe_tree();
        if description.starts_with("(plan)") {
            description
        } else {
            format!("(plan) {description}")
        }
    }

    fn describe_tree(&self) -> String {
        describe::describe_tree(self)
    }

    /// Run every task and wait for all of them, returning every error
    pub async fn run_all(&self) -> Vec<Error> {
        self.run_all_with(&ExecutionContext::new()).await
    }

    /// Run under the deadline, policy and plan flag from `settings`
    pub async fn run_all_with_settings(&self, settings: &ExecutionSettings) -> Vec<Error> {
        self.run_all_with(&ExecutionContext::from_settings(settings))
            .await
    }

    /// Run under an existing context
    pub async fn run_all_with(&self, ctx: &ExecutionContext) -> Vec<Error> {
        if self.plan_mode && !ctx.plan_mode() {
            tracing::info!("{}", self.plan());
        }
        if self.is_empty() || self.plan_mode || ctx.plan_mode() {
            tracing::debug!("no actual tasks");
            return Vec::new();
        }

        let mode = if self.parallel { "parallel" } else { "sequential" };
        let span = stackctl_utils::tree_span(mode, self.len());
        if self.parallel {
            executor::run_parallel(&self.tasks, ctx)
                .instrument(span)
                .await
        } else {
            executor::run_sequential(&self.tasks, self.effective_policy(ctx), ctx)
                .instrument(span)
                .await
        }
    }

    /// Blocking entry point for callers outside an async runtime.
    ///
    /// Called from inside a runtime it returns a single configuration error
    /// instead of blocking.
    pub fn do_all_sync(&self) -> Vec<Error> {
        match stackctl_utils::run_async(async { Ok(self.run_all().await) }) {
            Ok(errors) => errors,
            Err(e) => vec![e],
        }
    }

    /// Blocking run under `settings`
    pub fn do_all_sync_with_settings(&self, settings: &ExecutionSettings) -> Vec<Error> {
        match stackctl_utils::run_async(async { Ok(self.run_all_with_settings(settings).await) })
        {
            Ok(errors) => errors,
            Err(e) => vec![e],
        }
    }
}

#[async_trait]
impl Task for TaskTree {
    fn describe(&self) -> String {
        self.describe_tree()
    }

    async fn run(&self, ctx: &ExecutionContext, done: Completion) -> Result<()> {
        let errors = self.run_all_with(ctx).await;
        if errors.is_empty() {
            done.succeed();
        } else {
            done.fail(Error::aggregate(errors));
        }
        Ok(())
    }

    fn as_tree(&self) -> Option<&TaskTree> {
        Some(self)
    }
}

impl fmt::Debug for TaskTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskTree")
            .field("len", &self.len())
            .field("parallel", &self.parallel)
            .field("plan_mode", &self.plan_mode)
            .field("is_sub_task", &self.is_sub_task)
            .field("sequential_policy", &self.sequential_policy)
            .finish()
    }
}
