//! Command execution against the core task service.

use crate::args::{AddArgs, Cli, Command};
use crate::render;
use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use log::info;
use serde_json::json;
use std::process::ExitCode;
use todo_core::db::open_db;
use todo_core::{
    default_log_level, init_logging, Frequency, NewTaskRequest, SqliteTaskRepository, TaskId,
    TaskService, TaskServiceError,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Runs one parsed invocation.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let paths = cli.paths()?;
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = paths.log_dir.to_str().context("log directory must be valid UTF-8")?;
    init_logging(level, log_dir).map_err(|err| anyhow!(err))?;

    if let Some(parent) = paths.db.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create `{}`", parent.display()))?;
    }
    let conn = open_db(&paths.db)
        .with_context(|| format!("cannot open task database `{}`", paths.db.display()))?;
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn)?);
    info!("event=cli_command module=cli status=start command={}", command_name(&cli.command));

    match cli.command {
        Command::Add(args) => add(&service, args, cli.json),
        Command::List => list(&service, cli.json),
        Command::Delete { id } => delete(&service, &id, cli.json),
        Command::Day { date } => day(&service, date.as_deref(), cli.json),
        Command::Calendar { year, month } => calendar(&service, year, month, cli.json),
    }
}

type Service<'conn> = TaskService<SqliteTaskRepository<'conn>>;

fn add(service: &Service<'_>, args: AddArgs, json: bool) -> Result<ExitCode> {
    let request = NewTaskRequest {
        title: Some(args.title),
        description: args.description,
        start_date: Some(args.start),
        end_date: args.end,
        recurrence_type: args
            .repeat
            .map(|repeat| Frequency::from(repeat).as_str().to_string()),
        recurrence_interval: args.every,
        days_of_week: Some(args.on),
    };

    match service.create_task(request) {
        Ok(task) => {
            if json {
                render::print_json(&json!({
                    "message": "Task created successfully",
                    "task": { "id": task.id, "created_at": task.created_at },
                }))?;
            } else {
                println!("Task created successfully: {}", task.id);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ TaskServiceError::Repo(_)) | Err(err @ TaskServiceError::InconsistentState(_)) => {
            Err(err.into())
        }
        Err(err) => {
            report(json, &err.to_string())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn list(service: &Service<'_>, json: bool) -> Result<ExitCode> {
    let tasks = service.list_tasks()?;
    if json {
        render::print_json(&tasks)?;
    } else {
        render::print_task_list(&tasks);
    }
    Ok(ExitCode::SUCCESS)
}

fn delete(service: &Service<'_>, raw_id: &str, json: bool) -> Result<ExitCode> {
    let Ok(id) = raw_id.trim().parse::<TaskId>() else {
        report(json, &format!("invalid task id `{raw_id}`"))?;
        return Ok(ExitCode::FAILURE);
    };

    match service.delete_task(id) {
        Ok(()) => {
            if json {
                render::print_json(&json!({ "message": "Task deleted successfully" }))?;
            } else {
                println!("Task deleted successfully");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(TaskServiceError::TaskNotFound(_)) => {
            report(json, "Task not found")?;
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

fn day(service: &Service<'_>, raw_date: Option<&str>, json: bool) -> Result<ExitCode> {
    let date = match raw_date {
        Some(value) => match NaiveDate::parse_from_str(value.trim(), DATE_FORMAT) {
            Ok(date) => date,
            Err(_) => {
                report(json, &format!("invalid date `{value}`; expected YYYY-MM-DD"))?;
                return Ok(ExitCode::FAILURE);
            }
        },
        None => Local::now().date_naive(),
    };

    let tasks = service.tasks_on(date)?;
    if json {
        render::print_json(&tasks)?;
    } else {
        render::print_day(date, &tasks);
    }
    Ok(ExitCode::SUCCESS)
}

fn calendar(
    service: &Service<'_>,
    year: Option<i32>,
    month: Option<u32>,
    json: bool,
) -> Result<ExitCode> {
    let today = Local::now().date_naive();
    let year = year.unwrap_or(today.year());
    let month = month.unwrap_or(today.month());

    let view = match service.month_view(year, month) {
        Ok(view) => view,
        Err(err @ TaskServiceError::Calendar(_)) => {
            report(json, &err.to_string())?;
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        render::print_json(&view)?;
    } else {
        print!("{}", render::month_grid(&view));
    }
    Ok(ExitCode::SUCCESS)
}

fn report(json: bool, message: &str) -> Result<()> {
    if json {
        render::print_json(&json!({ "message": message }))
    } else {
        eprintln!("{message}");
        Ok(())
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add(_) => "add",
        Command::List => "list",
        Command::Delete { .. } => "delete",
        Command::Day { .. } => "day",
        Command::Calendar { .. } => "calendar",
    }
}
