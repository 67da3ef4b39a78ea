//! Core domain types, errors, settings and constants for `stackctl`.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing all possible failure modes of task execution.
//! - **`types`**: Execution policy types such as `SequentialPolicy`.
//! - **`settings`**: `ExecutionSettings`, loaded from JSON or `STACKCTL_*`
//!   environment variables.
//! - **`constants`**: Shared static constants such as environment variable
//!   names and Kubernetes labels.

pub mod constants;
pub mod errors;
pub mod settings;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
    settings::ExecutionSettings,
    types::*,
};
