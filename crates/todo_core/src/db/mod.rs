//! Connection bootstrap for the task store.
//!
//! Every connection handed to `SqliteTaskRepository` comes from here, so the
//! `tasks` table and its CHECK constraints (non-blank title, known
//! `recurrence_type`, positive `recurrence_interval`, `end_date >=
//! start_date`) exist before the first row is read or written.
//!
//! - `open_db` / `open_db_in_memory`: foreign keys on, busy timeout, then
//!   migrations.
//! - `migrations`: numbered SQL scripts tracked in `PRAGMA user_version`.
//!   A task database stamped by a newer build is refused rather than
//!   downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure opening or migrating the task database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "task database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
