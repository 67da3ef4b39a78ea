//! Hierarchical task execution for stackctl
//!
//! A [`TaskTree`] groups [`Task`]s and nested trees under a parallel or
//! sequential policy. Running the tree walks it recursively, fans parallel
//! children out onto tokio tasks and funnels every leaf error into one list.
//! In plan mode nothing runs and the tree only describes itself.

pub mod adapters;
pub mod context;
mod describe;
mod executor;
pub mod report;
pub mod task;
pub mod tree;

pub use adapters::{
    AsyncTask, GenericTask, SyncTask, SynchronousTask, TaskWithNameParam, TaskWithoutParams,
};
pub use context::ExecutionContext;
pub use report::report_errors;
pub use stackctl_core::SequentialPolicy;
pub use task::{Completion, CompletionReceiver, Task};
pub use tree::TaskTree;
