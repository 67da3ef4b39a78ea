//! Core domain types for stackctl.
//!
//! - **`tasks`**: Task-tree execution policy types

pub mod tasks;

pub use tasks::*;
