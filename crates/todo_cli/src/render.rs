//! Text and JSON rendering for command output.

use anyhow::Result;
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use todo_core::{MonthView, Task};

const WEEKDAY_HEADER: &str = "Su  Mo  Tu  We  Th  Fr  Sa";

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for task in tasks {
        println!("{}  {} - {}", task.id, task.title, created_on(task));
    }
}

pub fn print_day(date: NaiveDate, tasks: &[Task]) {
    println!("Tasks for {date}:");
    if tasks.is_empty() {
        println!("No tasks for this date.");
        return;
    }
    for task in tasks {
        println!("- {} ({})", task.title, task.id);
        if let Some(description) = &task.description {
            println!("  {description}");
        }
    }
}

/// Renders a Sunday-first month grid.
///
/// `*` marks a task start date; `+` marks a day with occurrences.
pub fn month_grid(view: &MonthView) -> String {
    let mut out = String::new();
    let title = NaiveDate::from_ymd_opt(view.year, view.month, 1)
        .map(|first| first.format("%B %Y").to_string())
        .unwrap_or_default();
    let _ = writeln!(out, "{title:^26}");
    let _ = writeln!(out, "{WEEKDAY_HEADER}");

    let leading = view.leading_blank_days() as usize;
    let mut column = leading;
    out.push_str(&" ".repeat(leading * 4));
    for day in &view.days {
        let marker = if day.highlighted {
            '*'
        } else if !day.task_ids.is_empty() {
            '+'
        } else {
            ' '
        };
        let _ = write!(out, "{:>2}{marker}", day.date.day());
        column += 1;
        if column % 7 == 0 {
            out.push('\n');
        } else {
            out.push(' ');
        }
    }
    if column % 7 != 0 {
        out.push('\n');
    }

    let busy: Vec<_> = view
        .days
        .iter()
        .filter(|day| !day.task_ids.is_empty())
        .collect();
    if !busy.is_empty() {
        out.push('\n');
        for day in busy {
            let _ = writeln!(out, "{}: {} task(s)", day.date, day.task_ids.len());
        }
    }
    out
}

fn created_on(task: &Task) -> String {
    task.created_at
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
