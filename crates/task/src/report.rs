//! Caller-side reporting of an aggregate error set

use stackctl_core::{Error, Result};

/// Log the outcome of a run and turn a non-empty error set into a failure.
///
/// Logs the error count as a warning, then every error in order. Returns
/// `Error::Aggregate` holding the errors when there are any.
pub fn report_errors(errors: Vec<Error>, subject: &str) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    tracing::warn!("{} error(s) occurred while {}", errors.len(), subject);
    for error in &errors {
        tracing::error!("{error}");
    }
    Err(Error::aggregate(errors))
}
