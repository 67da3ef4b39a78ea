//! Builder methods for creating errors with context

use super::types::Error;
use std::time::Duration;

// Helper methods for creating errors with context
impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing dependency error for a task that cannot start
    #[must_use]
    pub fn missing_dependency(task: impl Into<String>, dependency: impl Into<String>) -> Self {
        Error::MissingDependency {
            task: task.into(),
            dependency: dependency.into(),
        }
    }

    /// Create a stack operation error
    #[must_use]
    pub fn stack(stack: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Stack {
            stack: stack.into(),
            message: message.into(),
        }
    }

    /// Create a Kubernetes object error
    #[must_use]
    pub fn kubernetes(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Kubernetes {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a cancellation error
    #[must_use]
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Error::Cancelled {
            operation: operation.into(),
        }
    }

    /// Tag an error with the description of the task that produced it
    #[must_use]
    pub fn task(task: impl Into<String>, source: Error) -> Self {
        Error::Task {
            task: task.into(),
            source: Box::new(source),
        }
    }

    /// Create a panic error for a task
    #[must_use]
    pub fn task_panicked(task: impl Into<String>, message: impl Into<String>) -> Self {
        Error::TaskPanicked {
            task: task.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unsignalled(task: impl Into<String>) -> Self {
        Error::Unsignalled { task: task.into() }
    }

    /// Wrap a list of errors collected from a task tree
    #[must_use]
    pub fn aggregate(errors: Vec<Error>) -> Self {
        Error::Aggregate { errors }
    }
}
