//! Week-numbering engine. Sunday-first weeks; week 1 always contains January 1st.
//!
//! A date near the end of December belongs to week 1 of the following year when
//! that week contains the next January 1st. Weeks never split across a
//! Sunday boundary, so a year has 52 or 53 of them.
//!
//! Everything here is pure and deterministic.

use crate::domain::weekday::weekday_position;
use crate::domain::{DomainError, Week, WeekNumber};
use chrono::{Datelike, Days, Duration, NaiveDate};

/// 365 or 366.
pub fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_yo_opt(year, 366).is_some() {
        366
    } else {
        365
    }
}

/// 1-based ordinal of the date within its calendar year.
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Map a date to the week that owns it.
pub fn date_to_week_number(date: NaiveDate) -> WeekNumber {
    let year = date.year();
    let doy = day_of_year(date);
    let pos = weekday_position(date);

    if doy == 1 {
        return WeekNumber::new(year, 1);
    }

    // Weekday positions (1..=7) of this year's and next year's January 1st,
    // derived by walking back / forward from the date itself.
    let days_since_jan1 = doy - 1;
    let jan1_pos = shift_position(pos, -(days_since_jan1 as i64));
    if days_since_jan1 <= 6 && pos > jan1_pos {
        // Still inside the week that contains January 1st.
        return WeekNumber::new(year, 1);
    }

    let days_until_next_jan1 = days_in_year(year) - doy + 1;
    let next_jan1_pos = shift_position(pos, days_until_next_jan1 as i64);
    if days_until_next_jan1 <= 6 && pos < next_jan1_pos {
        return WeekNumber::new(year + 1, 1);
    }

    // Ordinal of the first Sunday after January 1st; that Sunday opens week 2.
    let first_sunday_pos = 9 - jan1_pos;
    let week_number = (doy - first_sunday_pos) / 7 + 2;
    WeekNumber::new(year, week_number)
}

fn shift_position(pos: u32, days: i64) -> u32 {
    ((i64::from(pos) - 1 + days).rem_euclid(7) + 1) as u32
}

/// Sunday on or before January 1st of `year`: the first day of week 1.
pub fn week_one_start(year: i32) -> Result<NaiveDate, DomainError> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| DomainError::Config(format!("year {} is out of range", year)))?;
    let back = Days::new(u64::from(jan1.weekday().num_days_from_sunday()));
    jan1.checked_sub_days(back).ok_or_else(|| {
        DomainError::Config(format!("week 1 of {} starts before the earliest date", year))
    })
}

/// Number of weeks owned by `year` (52 or 53).
pub fn weeks_in_year(year: i32) -> Result<u32, DomainError> {
    let start = week_one_start(year)?;
    let next = week_one_start(year + 1)?;
    Ok(((next - start).num_days() / 7) as u32)
}

/// Inverse mapping: the seven dates of `(year, week_number)`.
pub fn week_number_to_date_span(year: i32, week_number: u32) -> Result<Week, DomainError> {
    let max = weeks_in_year(year)?;
    if week_number == 0 || week_number > max {
        return Err(DomainError::InvalidWeek { year, week_number });
    }
    let start = week_one_start(year)? + Duration::weeks(i64::from(week_number - 1));
    Ok(Week::new(year, week_number, start))
}

/// The full week containing `date`.
pub fn week_containing(date: NaiveDate) -> Result<Week, DomainError> {
    let wn = date_to_week_number(date);
    week_number_to_date_span(wn.week_year, wn.week_number)
}

/// Weeks from `(from_year, from_week)` through `(to_year, to_week)`, inclusive.
/// Empty when the start is after the end.
pub fn weeks_between_numbers(
    from_year: i32,
    from_week: u32,
    to_year: i32,
    to_week: u32,
) -> Result<Vec<Week>, DomainError> {
    let first = week_number_to_date_span(from_year, from_week)?;
    let last = week_number_to_date_span(to_year, to_week)?;
    let mut weeks = Vec::new();
    let mut start = first.date_start;
    while start <= last.date_start {
        weeks.push(week_containing(start)?);
        start += Duration::weeks(1);
    }
    Ok(weeks)
}
