//! Domain model for recurring tasks.
//!
//! # Responsibility
//! - Define the task record and its structured recurrence rule.
//! - Host the occurrence matcher used by calendar previews.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Matching never touches storage or shared state.

pub mod recurrence;
pub mod task;
