//! Per-run execution context: cancellation, deadline and inherited plan mode

use stackctl_core::{Error, ExecutionSettings, SequentialPolicy};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const RUN_OPERATION: &str = "task tree run";

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    after: Duration,
}

/// Context passed alongside every task launch.
///
/// Cloning is cheap and clones share one cancellation token, so cancelling
/// any clone stops the whole run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    token: CancellationToken,
    deadline: Option<Deadline>,
    plan_mode: bool,
    default_policy: SequentialPolicy,
}

impl ExecutionContext {
    /// Context with no deadline, not cancelled, not in plan mode
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from loaded settings
    #[must_use]
    pub fn from_settings(settings: &ExecutionSettings) -> Self {
        let mut ctx = Self::new().with_default_policy(settings.sequential_policy);
        if let Some(timeout) = settings.timeout() {
            ctx = ctx.with_timeout(timeout);
        }
        if settings.plan_mode {
            ctx = ctx.with_plan_mode();
        }
        ctx
    }

    /// Abort the run once `timeout` has elapsed from now.
    ///
    /// An existing earlier deadline is kept. A timeout too large to
    /// represent as an instant sets no deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let Some(at) = Instant::now().checked_add(timeout) else {
            return self;
        };
        match self.deadline {
            Some(existing) if existing.at <= at => {}
            _ => self.deadline = Some(Deadline { at, after: timeout }),
        }
        self
    }

    /// Use an externally owned cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Same context with plan mode switched on
    #[must_use]
    pub fn with_plan_mode(mut self) -> Self {
        self.plan_mode = true;
        self
    }

    /// Policy used by sequential trees that don't set their own
    #[must_use]
    pub fn with_default_policy(mut self, policy: SequentialPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Cancel the run
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token shared by every clone of this context
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether an ancestor tree switched plan mode on
    #[must_use]
    pub fn plan_mode(&self) -> bool {
        self.plan_mode
    }

    #[must_use]
    pub fn default_policy(&self) -> SequentialPolicy {
        self.default_policy
    }

    /// Why the run should stop, if it should
    #[must_use]
    pub fn stop_reason(&self) -> Option<Error> {
        if self.token.is_cancelled() {
            return Some(Error::cancelled(RUN_OPERATION));
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline.at => {
                Some(Error::timeout(RUN_OPERATION, deadline.after))
            }
            _ => None,
        }
    }

    /// Resolves once the run is cancelled or its deadline passes
    pub async fn cancelled(&self) -> Error {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => Error::cancelled(RUN_OPERATION),
                    _ = tokio::time::sleep_until(deadline.at) => {
                        Error::timeout(RUN_OPERATION, deadline.after)
                    }
                }
            }
            None => {
                self.token.cancelled().await;
                Error::cancelled(RUN_OPERATION)
            }
        }
    }
}
