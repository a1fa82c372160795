//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/list/delete over the `tasks` table.
//! - Keep SQL and column encodings inside the persistence boundary.
//!
//! # Invariants
//! - Writes call `Task::validate()` before touching SQL.
//! - Reads reject invalid persisted rows instead of masking them.
//! - Listing order is `created_at DESC`, latest insert first on ties.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::recurrence::{DayOfWeek, Frequency, Recurrence};
use crate::model::task::{Task, TaskId, TaskValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DAYS_SEPARATOR: &str = ",";

const TASKS_TABLE: &str = "tasks";
const TASKS_REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "title",
    "description",
    "start_date",
    "end_date",
    "recurrence_type",
    "recurrence_interval",
    "days_of_week",
    "created_at",
];

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    start_date,
    end_date,
    recurrence_type,
    recurrence_interval,
    days_of_week,
    created_at
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for task CRUD.
pub trait TaskRepository {
    /// Inserts a new task and returns its id.
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Returns every task, newest first.
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
    /// Removes one task. `NotFound` when no row matched.
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let (recurrence_type, recurrence_interval, days_of_week) = match &task.recurrence {
            Some(rule) => (
                Some(rule.frequency.as_str()),
                rule.interval.map(|value| i64::from(value.get())),
                encode_days(&rule.days_of_week),
            ),
            None => (None, None, None),
        };

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                title,
                description,
                start_date,
                end_date,
                recurrence_type,
                recurrence_interval,
                days_of_week
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.description.as_deref(),
                encode_date(task.start_date),
                task.end_date.map(encode_date),
                recurrence_type,
                recurrence_interval,
                days_of_week,
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([TASKS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(TASKS_TABLE));
    }
    if let Some(column) = TASKS_REQUIRED_COLUMNS
        .iter()
        .find(|required| !columns.iter().any(|name| name.as_str() == **required))
    {
        return Err(RepoError::MissingRequiredColumn {
            table: TASKS_TABLE,
            column: *column,
        });
    }
    Ok(())
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{id_text}` in tasks.id")))?;

    let start_text: String = row.get("start_date")?;
    let start_date = decode_date(&start_text, "start_date")?;
    let end_date = match row.get::<_, Option<String>>("end_date")? {
        Some(value) => Some(decode_date(&value, "end_date")?),
        None => None,
    };

    let recurrence = match row.get::<_, Option<String>>("recurrence_type")? {
        Some(value) => {
            let frequency = Frequency::parse(&value).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid recurrence type `{value}` in tasks.recurrence_type"
                ))
            })?;
            let interval = match row.get::<_, Option<i64>>("recurrence_interval")? {
                Some(raw) => u32::try_from(raw).map_err(|_| {
                    RepoError::InvalidData(format!(
                        "invalid interval `{raw}` in tasks.recurrence_interval"
                    ))
                })?,
                None => 0,
            };
            let days = decode_days(row.get::<_, Option<String>>("days_of_week")?.as_deref())?;
            Some(Recurrence::new(frequency).every(interval).on(days))
        }
        None => None,
    };

    let task = Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        start_date,
        end_date,
        recurrence,
        created_at: Some(row.get("created_at")?),
    };
    task.validate()?;
    Ok(task)
}

fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn decode_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in tasks.{column}")))
}

fn encode_days(days: &BTreeSet<DayOfWeek>) -> Option<String> {
    if days.is_empty() {
        return None;
    }
    Some(
        days.iter()
            .map(|day| day.as_str())
            .collect::<Vec<_>>()
            .join(DAYS_SEPARATOR),
    )
}

fn decode_days(value: Option<&str>) -> RepoResult<BTreeSet<DayOfWeek>> {
    let Some(value) = value else {
        return Ok(BTreeSet::new());
    };
    value
        .split(DAYS_SEPARATOR)
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            DayOfWeek::parse(name).ok_or_else(|| {
                RepoError::InvalidData(format!("invalid day `{name}` in tasks.days_of_week"))
            })
        })
        .collect()
}
