//! Extension traits and inspection helpers for error handling

use super::types::{Error, Result};

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a lazy message
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let base_error = e.into();
            Error::Configuration {
                message: format!("{}: {}", message.into(), base_error),
            }
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let base_error = e.into();
            Error::Configuration {
                message: format!("{}: {}", f(), base_error),
            }
        })
    }
}

impl Error {
    /// Description of the task this error originated from, if it was tagged
    pub fn task_description(&self) -> Option<&str> {
        match self {
            Error::Task { task, .. } | Error::TaskPanicked { task, .. } => Some(task),
            Error::MissingDependency { task, .. } | Error::Unsignalled { task } => Some(task),
            _ => None,
        }
    }

    /// The innermost error, skipping task tags
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Task { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the root cause is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self.root_cause(), Error::Timeout { .. })
    }

    /// Whether the root cause is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root_cause(), Error::Cancelled { .. })
    }

    /// Flatten nested aggregates into a list of leaf-level errors
    pub fn into_errors(self) -> Vec<Error> {
        match self {
            Error::Aggregate { errors } => errors.into_iter().flat_map(Error::into_errors).collect(),
            other => vec![other],
        }
    }
}
