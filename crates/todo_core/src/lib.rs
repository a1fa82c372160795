//! Core domain logic for the recurring task tracker.
//! This crate is the single source of truth for task invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{is_start_date, month_view, tasks_on, CalendarDay, CalendarError, MonthView};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::recurrence::{matches, DayOfWeek, Frequency, Recurrence, RecurrenceError};
pub use model::task::{Task, TaskDecodeError, TaskId, TaskValidationError};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::task_service::{NewTaskRequest, TaskService, TaskServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
