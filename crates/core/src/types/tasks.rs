//! Task-tree execution policy types

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a sequential task tree does after one of its children fails.
///
/// Parallel trees always run every child to completion, so this only
/// applies to trees executed in append order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequentialPolicy {
    /// Stop launching children after the first failure
    #[default]
    FailFast,
    /// Run every child and report all failures in order
    ContinueOnError,
}

impl SequentialPolicy {
    /// Whether the tree stops after the first failing child
    #[must_use]
    pub fn stops_on_failure(self) -> bool {
        matches!(self, SequentialPolicy::FailFast)
    }
}

impl fmt::Display for SequentialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequentialPolicy::FailFast => write!(f, "fail-fast"),
            SequentialPolicy::ContinueOnError => write!(f, "continue-on-error"),
        }
    }
}

impl FromStr for SequentialPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "failfast" => Ok(SequentialPolicy::FailFast),
            "continue-on-error" | "continue" => Ok(SequentialPolicy::ContinueOnError),
            other => Err(Error::configuration(format!(
                "unknown sequential policy '{other}', expected 'fail-fast' or 'continue-on-error'"
            ))),
        }
    }
}
