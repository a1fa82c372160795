//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by list and calendar views.
//! - Own the JSON wire shape (`recurrence_type`, `recurrence_interval`,
//!   `days_of_week` flattened next to the task fields).
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is non-empty after trimming.
//! - `end_date` is never earlier than `start_date` when set.
//! - Tasks are created and deleted, never updated in place.

use crate::model::recurrence::{self, Recurrence, RecurrenceError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every task.
pub type TaskId = Uuid;

/// Validation errors for task invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    NilId,
    EmptyTitle,
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "end_date ({end}) must be >= start_date ({start})")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Failure decoding a task from its JSON wire shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskDecodeError {
    Recurrence(RecurrenceError),
    Validation(TaskValidationError),
}

impl Display for TaskDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recurrence(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Recurrence(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TaskWire", try_from = "TaskWire")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    /// Recurrence anchor.
    pub start_date: NaiveDate,
    /// Inclusive last day on which the task may occur.
    pub end_date: Option<NaiveDate>,
    /// `None` for one-off tasks.
    pub recurrence: Option<Recurrence>,
    /// Epoch milliseconds, assigned by storage. `None` until persisted.
    pub created_at: Option<i64>,
}

impl Task {
    /// Creates a one-off task with a generated id.
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            start_date,
            end_date: None,
            recurrence: None,
            created_at: None,
        }
    }

    /// Creates a task with a caller-provided id.
    ///
    /// # Errors
    /// - `TaskValidationError::NilId` for the nil UUID.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        start_date: NaiveDate,
    ) -> Result<Self, TaskValidationError> {
        if id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        Ok(Self {
            id,
            ..Self::new(title, start_date)
        })
    }

    /// Attaches a recurrence rule.
    pub fn repeating(mut self, rule: Recurrence) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(TaskValidationError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }

    /// Whether `date` is an occurrence of this task's recurrence rule.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        recurrence::matches(self, date)
    }

    /// Whether `date` is exactly this task's start date.
    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.start_date == date
    }
}

/// Flat JSON shape. Recurrence fields are read as loosely as a create
/// request; `days_of_week` is `null` for one-off tasks.
#[derive(Serialize, Deserialize)]
struct TaskWire {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    start_date: NaiveDate,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    #[serde(default)]
    recurrence_type: Option<String>,
    #[serde(default)]
    recurrence_interval: Option<i64>,
    #[serde(default)]
    days_of_week: Option<Vec<String>>,
    #[serde(default)]
    created_at: Option<i64>,
}

impl From<Task> for TaskWire {
    fn from(task: Task) -> Self {
        let (recurrence_type, recurrence_interval, days_of_week) = match task.recurrence {
            Some(rule) => (
                Some(rule.frequency.as_str().to_string()),
                rule.interval.map(|value| i64::from(value.get())),
                Some(
                    rule.days_of_week
                        .into_iter()
                        .map(|day| day.as_str().to_string())
                        .collect(),
                ),
            ),
            None => (None, None, None),
        };
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            start_date: task.start_date,
            end_date: task.end_date,
            recurrence_type,
            recurrence_interval,
            days_of_week,
            created_at: task.created_at,
        }
    }
}

impl TryFrom<TaskWire> for Task {
    type Error = TaskDecodeError;

    fn try_from(wire: TaskWire) -> Result<Self, Self::Error> {
        let recurrence = Recurrence::from_parts(
            wire.recurrence_type.as_deref(),
            wire.recurrence_interval,
            wire.days_of_week.as_deref().unwrap_or_default(),
        )
        .map_err(TaskDecodeError::Recurrence)?;
        let task = Self {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            start_date: wire.start_date,
            end_date: wire.end_date,
            recurrence,
            created_at: wire.created_at,
        };
        task.validate().map_err(TaskDecodeError::Validation)?;
        Ok(task)
    }
}
