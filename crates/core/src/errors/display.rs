//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::MissingDependency { task, dependency } => {
                write!(
                    f,
                    "cannot start task {task:?} as {dependency} wasn't provided"
                )
            }
            Error::Stack { stack, message } => {
                write!(f, "stack '{stack}': {message}")
            }
            Error::Kubernetes { resource, message } => {
                write!(f, "kubernetes {resource}: {message}")
            }
            Error::Timeout {
                operation,
                duration,
            } => {
                write!(f, "operation '{operation}' timed out after {duration:?}")
            }
            Error::Cancelled { operation } => {
                write!(f, "operation '{operation}' was cancelled")
            }
            Error::Task { task, source } => {
                write!(f, "{task}: {source}")
            }
            Error::TaskPanicked { task, message } => {
                write!(f, "task {task:?} panicked: {message}")
            }
            Error::Unsignalled { task } => {
                write!(f, "task {task:?} finished without reporting an outcome")
            }
            Error::Aggregate { errors } => {
                write!(f, "{} error(s) occurred", errors.len())
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
        }
    }
}
