//! Core error type definitions

use std::time::Duration;

/// Result type alias for stackctl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for stackctl operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    Configuration { message: String },

    /// A task could not start because a collaborator was not provided
    MissingDependency { task: String, dependency: String },

    /// CloudFormation stack operation errors
    Stack { stack: String, message: String },

    /// Kubernetes object operation errors
    Kubernetes { resource: String, message: String },

    /// Operation timeout errors
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Operation cancelled before it completed
    Cancelled { operation: String },

    /// An error reported by a leaf task, tagged with its description
    Task {
        task: String,
        #[source]
        source: Box<Error>,
    },

    /// A task panicked while running
    TaskPanicked { task: String, message: String },

    /// A task dropped its completion handle without reporting an outcome
    Unsignalled { task: String },

    /// All errors collected from a task tree
    Aggregate { errors: Vec<Error> },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}
