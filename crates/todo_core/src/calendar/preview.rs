use crate::model::task::{Task, TaskId};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error for calendar queries with out-of-range inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    InvalidMonth { year: i32, month: u32 },
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { year, month } => {
                write!(f, "invalid calendar month {year}-{month:02}")
            }
        }
    }
}

impl Error for CalendarError {}

/// One day cell of a month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Some task starts exactly on this date.
    pub highlighted: bool,
    /// Tasks whose recurrence fires on this date, in snapshot order.
    pub task_ids: Vec<TaskId>,
}

/// Day cells for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthView {
    /// Number of empty cells before day 1 in a Sunday-first grid.
    pub fn leading_blank_days(&self) -> u32 {
        self.days
            .first()
            .map_or(0, |day| day.date.weekday().num_days_from_sunday())
    }

    /// Cell for a given day-of-month, if it exists in this month.
    pub fn day(&self, day_of_month: u32) -> Option<&CalendarDay> {
        let index = usize::try_from(day_of_month.checked_sub(1)?).ok()?;
        self.days.get(index)
    }
}

/// Tasks from `tasks` occurring on `date`, in snapshot order.
pub fn tasks_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|task| task.occurs_on(date)).collect()
}

/// Whether any task's start date is exactly `date`.
pub fn is_start_date(tasks: &[Task], date: NaiveDate) -> bool {
    tasks.iter().any(|task| task.starts_on(date))
}

/// Builds the month view for `year`/`month` (1-based).
///
/// # Errors
/// - `CalendarError::InvalidMonth` when the month does not exist.
pub fn month_view(tasks: &[Task], year: i32, month: u32) -> Result<MonthView, CalendarError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(CalendarError::InvalidMonth { year, month })?;

    let days = first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| CalendarDay {
            date,
            highlighted: is_start_date(tasks, date),
            task_ids: tasks_on(tasks, date).into_iter().map(|task| task.id).collect(),
        })
        .collect();

    Ok(MonthView { year, month, days })
}

#[cfg(test)]
mod tests {
    use super::{is_start_date, month_view, tasks_on, CalendarError};
    use crate::model::recurrence::{Frequency, Recurrence};
    use crate::model::task::Task;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tasks_on_keeps_snapshot_order() {
        let daily = Task::new("daily", date(2024, 1, 1))
            .repeating(Recurrence::new(Frequency::Daily));
        let one_off = Task::new("one-off", date(2024, 1, 2));
        let monthly = Task::new("monthly", date(2023, 12, 2))
            .repeating(Recurrence::new(Frequency::Monthly));
        let tasks = vec![monthly.clone(), one_off, daily.clone()];

        let found: Vec<_> = tasks_on(&tasks, date(2024, 1, 2))
            .into_iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(found, vec![monthly.id, daily.id]);
    }

    #[test]
    fn start_date_highlight_ignores_recurrence() {
        let tasks = vec![Task::new("one-off", date(2024, 5, 20))];
        assert!(is_start_date(&tasks, date(2024, 5, 20)));
        assert!(tasks_on(&tasks, date(2024, 5, 20)).is_empty());
        assert!(!is_start_date(&tasks, date(2024, 5, 21)));
    }

    #[test]
    fn month_view_covers_leap_february() {
        let view = month_view(&[], 2024, 2).unwrap();
        assert_eq!(view.days.len(), 29);
        // 2024-02-01 is a Thursday.
        assert_eq!(view.leading_blank_days(), 4);
        assert_eq!(view.day(29).map(|day| day.date), Some(date(2024, 2, 29)));
        assert!(view.day(0).is_none());
        assert!(view.day(30).is_none());
    }

    #[test]
    fn month_view_rejects_invalid_month() {
        assert_eq!(
            month_view(&[], 2024, 13).unwrap_err(),
            CalendarError::InvalidMonth {
                year: 2024,
                month: 13
            }
        );
    }
}
