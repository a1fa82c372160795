//! Calendar preview over a task snapshot.
//!
//! # Responsibility
//! - Answer "which tasks occur on this date" for day and month views.
//! - Mark dates that are some task's raw start date.
//!
//! # Invariants
//! - Callers pass an immutable `&[Task]` snapshot; nothing here owns or
//!   caches task state.
//! - Start-date highlighting is exact date equality, independent of the
//!   recurrence matcher.

mod preview;

pub use preview::{is_start_date, month_view, tasks_on, CalendarDay, CalendarError, MonthView};
