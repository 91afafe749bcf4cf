//! Domain entities. Pure data structures for the calendar.
//!
//! All of these are derived by the builder and never hand-edited.

use crate::domain::DomainError;
use chrono::{Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// The week a date belongs to: the owning year plus a 1-based index (1..=53).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekNumber {
    pub week_year: i32,
    pub week_number: u32,
}

impl WeekNumber {
    pub fn new(week_year: i32, week_number: u32) -> Self {
        Self {
            week_year,
            week_number,
        }
    }
}

impl fmt::Display for WeekNumber {
    /// `YYYY-WW`, the suffix used in week cache keys.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.week_year, self.week_number)
    }
}

/// Seven consecutive dates, Sunday through Saturday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
    pub week_year: i32,
    pub week_number: u32,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub dates: Vec<NaiveDate>,
}

impl Week {
    /// Build a week starting on `date_start` (expected to be a Sunday).
    pub fn new(week_year: i32, week_number: u32, date_start: NaiveDate) -> Self {
        let dates: Vec<NaiveDate> = (0..7).map(|i| date_start + Duration::days(i)).collect();
        Self {
            week_year,
            week_number,
            date_start,
            date_end: date_start + Duration::days(6),
            dates,
        }
    }

    pub fn id(&self) -> WeekNumber {
        WeekNumber::new(self.week_year, self.week_number)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_start <= date && date <= self.date_end
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// `YYYY-WW`, e.g. `2021-05`.
    pub fn key_suffix(&self) -> String {
        self.id().to_string()
    }
}

/// Per-year metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Year {
    pub year: i32,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub days_in_year: u32,
    /// Upper-case short weekday name of January 1st, e.g. `"FRI"`.
    pub jan_one_dayname: String,
    /// 1-based position of January 1st within its (Sunday-first) week.
    pub jan_one_weekpos: u32,
    /// 52 or 53.
    pub max_week_number: u32,
}

/// Per-date metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub date: NaiveDate,
    pub weekday_name: String,
    pub weekday_name_short: String,
    pub day_of_month: u32,
    pub month_in_year: u32,
    pub month_name: String,
    pub year: i32,
    pub day_of_year: u32,
    pub week_year: i32,
    pub week_number: u32,
    /// Sunday = 1 .. Saturday = 7.
    pub index_in_week: u32,
}

impl Day {
    pub fn week(&self) -> WeekNumber {
        WeekNumber::new(self.week_year, self.week_number)
    }
}

/// First day of the week. Only Sunday is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartOfWeek {
    #[default]
    Sunday,
    Monday,
}

impl StartOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            StartOfWeek::Sunday => "SUN",
            StartOfWeek::Monday => "MON",
        }
    }
}

impl FromStr for StartOfWeek {
    type Err = DomainError;

    /// Accepts the literal tokens `SUN` and `MON` only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUN" => Ok(StartOfWeek::Sunday),
            "MON" => Ok(StartOfWeek::Monday),
            other => Err(DomainError::Config(format!(
                "start of week must be either 'SUN' or 'MON' (value passed was '{}')",
                other
            ))),
        }
    }
}

impl fmt::Display for StartOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
