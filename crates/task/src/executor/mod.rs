//! Recursive executor behind `TaskTree::run_all`
//!
//! Every launch gets its own completion channel. Parallel children are
//! spawned on a `JoinSet`; sequential children are awaited one by one. Child
//! trees hand back their collected errors as one `Error::Aggregate`, which is
//! flattened here so callers only ever see leaf-level errors.

mod parallel;
mod sequential;
mod single;

pub(crate) use parallel::run_parallel;
pub(crate) use sequential::run_sequential;
