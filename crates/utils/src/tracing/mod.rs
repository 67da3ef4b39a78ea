//! Logging setup and the spans and events task execution emits
//!
//! Library crates only emit through `tracing`. Installing the subscriber is
//! left to the binary, which calls [`init`] once at startup.

use stackctl_core::{DEFAULT_LOG_FILTER, STACKCTL_LOG_VAR};
use tracing::{span, Level, Span};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber; call once from a binary's `main`.
///
/// The filter comes from `STACKCTL_LOG`, then `RUST_LOG`, then falls back to
/// `info`. Output goes to stderr so stdout stays free for plan output. A
/// second call fails because a global subscriber is already set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = build_filter(std::env::var(STACKCTL_LOG_VAR).ok().as_deref())?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn build_filter(
    directive: Option<&str>,
) -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync + 'static>> {
    if let Some(directive) = directive.filter(|d| !d.trim().is_empty()) {
        return Ok(EnvFilter::try_new(directive)?);
    }
    Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?)
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span for a single task launch
pub fn task_span(description: &str) -> Span {
    span!(Level::INFO, "task", task = %description)
}

/// Create a span grouping the children of one tree
pub fn tree_span(mode: &str, total_tasks: usize) -> Span {
    span!(Level::DEBUG, "tree", mode = %mode, total_tasks = %total_tasks)
}

/// Emit a structured event for task completion
pub fn task_completed(description: &str, duration_ms: u64, success: bool) {
    if success {
        tracing::debug!(
            task = %description,
            duration_ms = %duration_ms,
            "completed task"
        );
    } else {
        tracing::debug!(
            task = %description,
            duration_ms = %duration_ms,
            "failed task"
        );
    }
}
