//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from the service layer.
//!
//! # Invariants
//! - Repository writes enforce `Task::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod task_repo;
