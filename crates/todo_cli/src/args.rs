//! Argument definitions and path configuration.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use todo_core::Frequency;

const DB_FILE_NAME: &str = "todo.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Track tasks and preview their recurring dates.
#[derive(Parser, Debug)]
#[command(name = "todo", version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "TODO_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, global = true, env = "TODO_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true, env = "TODO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a task
    Add(AddArgs),

    /// List tasks, newest first
    List,

    /// Delete a task by id
    Delete {
        /// Task id
        id: String,
    },

    /// Show tasks recurring on a date
    Day {
        /// Date as YYYY-MM-DD (defaults to today)
        date: Option<String>,
    },

    /// Show a month calendar with start dates and occurrences
    Calendar {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task title
    #[arg(long)]
    pub title: String,

    /// Optional description
    #[arg(long)]
    pub description: Option<String>,

    /// Start date (YYYY-MM-DD); anchor of the recurrence
    #[arg(long)]
    pub start: String,

    /// Last date the task may occur on (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Recurrence frequency
    #[arg(long, value_enum)]
    pub repeat: Option<Repeat>,

    /// Repeat every N periods (applied as a day distance)
    #[arg(long, allow_negative_numbers = true)]
    pub every: Option<i64>,

    /// Weekdays for weekly tasks, e.g. --on Monday,Wednesday
    #[arg(long, value_delimiter = ',')]
    pub on: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<Repeat> for Frequency {
    fn from(value: Repeat) -> Self {
        match value {
            Repeat::Daily => Self::Daily,
            Repeat::Weekly => Self::Weekly,
            Repeat::Monthly => Self::Monthly,
            Repeat::Yearly => Self::Yearly,
        }
    }
}

/// Resolved filesystem locations.
#[derive(Debug, Clone)]
pub struct Paths {
    pub db: PathBuf,
    pub log_dir: PathBuf,
}

impl Cli {
    /// Resolves database and log paths, falling back to the platform data dir.
    pub fn paths(&self) -> Result<Paths> {
        let data_dir = || -> Result<PathBuf> {
            ProjectDirs::from("", "", "todo")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .context("cannot determine a data directory; pass --db and --log-dir")
        };

        let db = match &self.db {
            Some(path) => path.clone(),
            None => data_dir()?.join(DB_FILE_NAME),
        };
        let log_dir = match &self.log_dir {
            Some(path) => absolute(path)?,
            None => data_dir()?.join(LOG_DIR_NAME),
        };
        Ok(Paths { db, log_dir })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("cannot read current directory")?;
    Ok(cwd.join(path))
}
