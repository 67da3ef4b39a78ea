//! Drive async task trees from synchronous callers

use stackctl_core::{Error, Result};
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

const WORKER_THREAD_NAME: &str = "stackctl-task-worker";

/// Which tokio scheduler a sync caller gets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuntimeFlavor {
    /// Single-threaded scheduler, enough for I/O-bound fan-out
    CurrentThread,
    /// Work-stealing scheduler so parallel children use every core
    #[default]
    MultiThread,
}

/// Runtime owned by a synchronous caller, built on first use
pub struct AsyncRuntime {
    flavor: RuntimeFlavor,
    worker_threads: Option<usize>,
    runtime: Option<Runtime>,
}

impl AsyncRuntime {
    #[must_use]
    pub fn new() -> Self {
        Self::with_flavor(RuntimeFlavor::default())
    }

    #[must_use]
    pub fn with_flavor(flavor: RuntimeFlavor) -> Self {
        Self {
            flavor,
            worker_threads: None,
            runtime: None,
        }
    }

    /// Cap the multi-threaded scheduler; ignored for `CurrentThread`
    #[must_use]
    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = Some(worker_threads.max(1));
        self
    }

    fn runtime(&mut self) -> Result<&Runtime> {
        let runtime = match self.runtime.take() {
            Some(runtime) => runtime,
            None => build_runtime(self.flavor, self.worker_threads)?,
        };
        Ok(self.runtime.insert(runtime))
    }

    /// Block the current thread on `future`.
    ///
    /// Refuses to run inside another runtime, where blocking would stall
    /// that runtime's worker.
    pub fn block_on<F, T>(&mut self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if Self::is_in_async_context() {
            return Err(Error::configuration(
                "cannot use block_on from within an async runtime",
            ));
        }
        self.runtime()?.block_on(future)
    }

    #[must_use]
    pub fn is_in_async_context() -> bool {
        tokio::runtime::Handle::try_current().is_ok()
    }
}

impl Default for AsyncRuntime {
    fn default() -> Self {
        Self::new()
    }
}

fn build_runtime(flavor: RuntimeFlavor, worker_threads: Option<usize>) -> Result<Runtime> {
    let mut builder = match flavor {
        RuntimeFlavor::CurrentThread => Builder::new_current_thread(),
        RuntimeFlavor::MultiThread => {
            let mut builder = Builder::new_multi_thread();
            if let Some(worker_threads) = worker_threads {
                builder.worker_threads(worker_threads);
            }
            builder
        }
    };
    builder
        .enable_all()
        .thread_name(WORKER_THREAD_NAME)
        .build()
        .map_err(|e| Error::configuration(format!("failed to create tokio runtime: {e}")))
}

/// Run `future` to completion on a fresh multi-threaded runtime
pub fn run_async<F, T>(future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    AsyncRuntime::new().block_on(future)
}
