//! Shared utilities for stackctl
//!
//! Logging initialisation, tracing span helpers and the bridge that lets
//! synchronous callers drive async task trees.

pub mod async_runtime;
pub mod tracing;

pub use self::async_runtime::{run_async, AsyncRuntime, RuntimeFlavor};
pub use self::tracing::{init as init_tracing, task_completed, task_span, tree_span};
