//! Recurrence rule model and occurrence matcher.
//!
//! # Responsibility
//! - Describe how a task repeats: frequency, interval and weekday set.
//! - Decide whether one calendar date is an occurrence of a task.
//!
//! # Invariants
//! - `interval` is either absent or strictly positive.
//! - Intervals are applied to the day distance from the anchor date, for
//!   every frequency (a monthly rule with interval 2 fires on matching
//!   days-of-month whose day distance is even, not every other month).
//! - Matching is pure: no clock reads, no I/O, no shared state.

use crate::model::task::Task;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;

/// Base period of a recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Stable name used for storage and wire payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// Parses a frequency name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekday names as stored in `days_of_week`, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }

    /// Parses a full weekday name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(normalized))
    }

    /// Weekday of the given calendar date.
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sun => Self::Sunday,
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
        }
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when building a [`Recurrence`] from untyped input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    UnknownFrequency(String),
    UnknownDay(String),
    NegativeInterval(i64),
    IntervalOutOfRange(i64),
}

impl Display for RecurrenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFrequency(value) => write!(
                f,
                "unknown recurrence type `{value}`; expected Daily|Weekly|Monthly|Yearly"
            ),
            Self::UnknownDay(value) => write!(f, "unknown day of week `{value}`"),
            Self::NegativeInterval(value) => {
                write!(f, "recurrence interval must be positive, got {value}")
            }
            Self::IntervalOutOfRange(value) => {
                write!(f, "recurrence interval {value} is too large")
            }
        }
    }
}

impl Error for RecurrenceError {}

/// Structured recurrence rule attached to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recurrence {
    pub frequency: Frequency,
    /// "Every N periods". `None` means every period.
    pub interval: Option<NonZeroU32>,
    /// Only consulted for [`Frequency::Weekly`].
    pub days_of_week: BTreeSet<DayOfWeek>,
}

impl Recurrence {
    /// Creates a rule firing every period with no weekday constraint.
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: None,
            days_of_week: BTreeSet::new(),
        }
    }

    /// Sets the interval. Zero clears it, matching "no interval".
    pub fn every(mut self, interval: u32) -> Self {
        self.interval = NonZeroU32::new(interval);
        self
    }

    /// Replaces the weekday set.
    pub fn on(mut self, days: impl IntoIterator<Item = DayOfWeek>) -> Self {
        self.days_of_week = days.into_iter().collect();
        self
    }

    /// Builds a rule from loosely typed request fields.
    ///
    /// Returns `Ok(None)` when `recurrence_type` is absent, blank or `none`.
    ///
    /// # Errors
    /// - Unknown frequency or weekday names.
    /// - Negative intervals, or intervals beyond `u32::MAX`.
    pub fn from_parts(
        recurrence_type: Option<&str>,
        interval: Option<i64>,
        days_of_week: &[String],
    ) -> Result<Option<Self>, RecurrenceError> {
        let Some(raw_type) = recurrence_type.map(str::trim) else {
            return Ok(None);
        };
        if raw_type.is_empty() || raw_type.eq_ignore_ascii_case("none") {
            return Ok(None);
        }

        let frequency = Frequency::parse(raw_type)
            .ok_or_else(|| RecurrenceError::UnknownFrequency(raw_type.to_string()))?;

        let interval = match interval {
            None => 0,
            Some(value) if value < 0 => return Err(RecurrenceError::NegativeInterval(value)),
            Some(value) => {
                u32::try_from(value).map_err(|_| RecurrenceError::IntervalOutOfRange(value))?
            }
        };

        let days = days_of_week
            .iter()
            .map(|name| {
                DayOfWeek::parse(name).ok_or_else(|| RecurrenceError::UnknownDay(name.clone()))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Some(Self::new(frequency).every(interval).on(days)))
    }

    /// Applies the base pattern and interval rule, relative to `anchor`.
    ///
    /// Does not enforce `date >= anchor` for monthly/yearly rules, nor any end
    /// bound; [`matches`] layers those on top. Negative day distances use
    /// truncating remainder, so an earlier date can still pass here.
    pub fn fires_on(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        let pattern = match self.frequency {
            Frequency::Daily => date >= anchor,
            Frequency::Weekly => {
                date >= anchor && self.days_of_week.contains(&DayOfWeek::of(date))
            }
            Frequency::Monthly => date.day() == anchor.day(),
            Frequency::Yearly => date.day() == anchor.day() && date.month() == anchor.month(),
        };
        pattern && self.within_interval(anchor, date)
    }

    fn within_interval(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        match self.interval {
            None => true,
            Some(interval) => day_distance(anchor, date) % i64::from(interval.get()) == 0,
        }
    }
}

/// Signed whole days from `from` to `to`.
pub fn day_distance(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Returns whether `date` is an occurrence of `task`.
///
/// Non-recurring tasks never match. Dates before `start_date` or after
/// `end_date` (inclusive bound) never match, whatever the frequency.
pub fn matches(task: &Task, date: NaiveDate) -> bool {
    let Some(rule) = task.recurrence.as_ref() else {
        return false;
    };
    if date < task.start_date {
        return false;
    }
    if task.end_date.is_some_and(|end| date > end) {
        return false;
    }
    rule.fires_on(task.start_date, date)
}
