//! Task use-case service.
//!
//! # Responsibility
//! - Validate create requests shaped like the task form / API payload.
//! - Delegate persistence to repository implementations.
//! - Run calendar previews over a freshly listed task snapshot.
//!
//! # Invariants
//! - Title (trimmed) and start date are required on create.
//! - Service APIs never bypass repository validation.
//! - Log lines carry ids and counts only, never titles or descriptions.

use crate::calendar::{self, CalendarError, MonthView};
use crate::model::recurrence::{Recurrence, RecurrenceError};
use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::task_repo::{RepoError, TaskRepository};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Title or start date missing.
    MissingRequiredFields,
    /// A date field is not `YYYY-MM-DD`.
    InvalidDate { field: &'static str, value: String },
    InvalidRecurrence(RecurrenceError),
    InvalidTask(TaskValidationError),
    Calendar(CalendarError),
    TaskNotFound(TaskId),
    Repo(RepoError),
    /// Write succeeded but read-back disagrees.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredFields => write!(f, "Title and start date are required."),
            Self::InvalidDate { field, value } => {
                write!(f, "invalid {field} `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidRecurrence(err) => write!(f, "{err}"),
            Self::InvalidTask(err) => write!(f, "{err}"),
            Self::Calendar(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "Task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRecurrence(err) => Some(err),
            Self::InvalidTask(err) => Some(err),
            Self::Calendar(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            RepoError::Validation(err) => Self::InvalidTask(err),
            other => Self::Repo(other),
        }
    }
}

impl From<RecurrenceError> for TaskServiceError {
    fn from(value: RecurrenceError) -> Self {
        Self::InvalidRecurrence(value)
    }
}

impl From<CalendarError> for TaskServiceError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

/// Create request with the field names of the task form payload.
///
/// Everything is optional here so that missing fields surface as
/// `MissingRequiredFields` rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub recurrence_type: Option<String>,
    #[serde(default)]
    pub recurrence_interval: Option<i64>,
    #[serde(default)]
    pub days_of_week: Option<Vec<String>>,
}

impl NewTaskRequest {
    /// Converts the request into a validated, not yet persisted task.
    pub fn into_task(self) -> Result<Task, TaskServiceError> {
        let title = non_blank(self.title);
        let start_text = non_blank(self.start_date);
        let (Some(title), Some(start_text)) = (title, start_text) else {
            return Err(TaskServiceError::MissingRequiredFields);
        };

        let start_date = parse_date("start_date", &start_text)?;
        let end_date = non_blank(self.end_date)
            .map(|value| parse_date("end_date", &value))
            .transpose()?;
        let recurrence = Recurrence::from_parts(
            self.recurrence_type.as_deref(),
            self.recurrence_interval,
            self.days_of_week.as_deref().unwrap_or_default(),
        )?;

        let mut task = Task::new(title, start_date);
        task.description = non_blank(self.description);
        task.end_date = end_date;
        task.recurrence = recurrence;
        task.validate().map_err(TaskServiceError::InvalidTask)?;
        Ok(task)
    }
}

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new task, returning the stored record.
    ///
    /// The returned task carries the storage-assigned `created_at`.
    pub fn create_task(&self, request: NewTaskRequest) -> Result<Task, TaskServiceError> {
        let task = match request.into_task() {
            Ok(task) => task,
            Err(err) => {
                warn!("event=task_create module=service status=rejected error={err}");
                return Err(err);
            }
        };

        let id = self.repo.create_task(&task)?;
        let stored = self
            .repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(
                "created task not found in read-back",
            ))?;

        info!(
            "event=task_create module=service status=ok task_id={id} recurrence={}",
            stored
                .recurrence
                .as_ref()
                .map_or("none", |rule| rule.frequency.as_str())
        );
        Ok(stored)
    }

    /// Gets one task by id.
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>, TaskServiceError> {
        Ok(self.repo.get_task(id)?)
    }

    /// Lists all tasks, newest first.
    pub fn list_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.repo.list_tasks()?)
    }

    /// Deletes one task.
    ///
    /// # Errors
    /// - `TaskNotFound` when the id does not exist.
    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        match self.repo.delete_task(id) {
            Ok(()) => {
                info!("event=task_delete module=service status=ok task_id={id}");
                Ok(())
            }
            Err(err) => {
                warn!("event=task_delete module=service status=error task_id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Tasks occurring on `date`, newest first.
    pub fn tasks_on(&self, date: NaiveDate) -> Result<Vec<Task>, TaskServiceError> {
        let snapshot = self.repo.list_tasks()?;
        Ok(calendar::tasks_on(&snapshot, date)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Month view for `year`/`month` over the current task list.
    pub fn month_view(&self, year: i32, month: u32) -> Result<MonthView, TaskServiceError> {
        let snapshot = self.repo.list_tasks()?;
        Ok(calendar::month_view(&snapshot, year, month)?)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, TaskServiceError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| TaskServiceError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{NewTaskRequest, TaskServiceError};
    use crate::model::recurrence::Frequency;
    use crate::model::task::TaskValidationError;

    #[test]
    fn request_without_title_or_start_is_rejected() {
        let request = NewTaskRequest {
            title: Some("   ".to_string()),
            start_date: Some("2024-01-01".to_string()),
            ..NewTaskRequest::default()
        };
        let err = request.into_task().unwrap_err();
        assert!(matches!(err, TaskServiceError::MissingRequiredFields));
        assert_eq!(err.to_string(), "Title and start date are required.");

        let request = NewTaskRequest {
            title: Some("water plants".to_string()),
            ..NewTaskRequest::default()
        };
        assert!(matches!(
            request.into_task(),
            Err(TaskServiceError::MissingRequiredFields)
        ));
    }

    #[test]
    fn request_normalizes_blank_optionals() {
        let request = NewTaskRequest {
            title: Some(" standup ".to_string()),
            description: Some("".to_string()),
            start_date: Some("2024-01-01".to_string()),
            end_date: Some(" ".to_string()),
            recurrence_type: Some("Daily".to_string()),
            recurrence_interval: Some(0),
            days_of_week: Some(Vec::new()),
        };
        let task = request.into_task().unwrap();
        assert_eq!(task.title, "standup");
        assert_eq!(task.description, None);
        assert_eq!(task.end_date, None);
        let rule = task.recurrence.unwrap();
        assert_eq!(rule.frequency, Frequency::Daily);
        assert_eq!(rule.interval, None);
    }

    #[test]
    fn request_rejects_end_before_start() {
        let request = NewTaskRequest {
            title: Some("trip".to_string()),
            start_date: Some("2024-03-10".to_string()),
            end_date: Some("2024-03-01".to_string()),
            ..NewTaskRequest::default()
        };
        assert!(matches!(
            request.into_task(),
            Err(TaskServiceError::InvalidTask(
                TaskValidationError::EndBeforeStart { .. }
            ))
        ));
    }

    #[test]
    fn request_rejects_malformed_dates() {
        let request = NewTaskRequest {
            title: Some("pay rent".to_string()),
            start_date: Some("01/02/2024".to_string()),
            ..NewTaskRequest::default()
        };
        assert!(matches!(
            request.into_task(),
            Err(TaskServiceError::InvalidDate {
                field: "start_date",
                ..
            })
        ));
    }
}
