//! Sunday-first weekday table and helpers.
//!
//! Positions are 1-based: Sunday = 1, Monday = 2, ..., Saturday = 7.

use crate::domain::DomainError;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// One row of the weekday table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayName {
    pub weekday: Weekday,
    pub name: &'static str,
    /// Upper-case three letter form, as stored in year records (`"WED"`).
    pub name_short: &'static str,
}

/// Weekdays in Sunday-first order.
pub const WEEKDAYS_SUN0: [WeekdayName; 7] = [
    WeekdayName { weekday: Weekday::Sun, name: "Sunday", name_short: "SUN" },
    WeekdayName { weekday: Weekday::Mon, name: "Monday", name_short: "MON" },
    WeekdayName { weekday: Weekday::Tue, name: "Tuesday", name_short: "TUE" },
    WeekdayName { weekday: Weekday::Wed, name: "Wednesday", name_short: "WED" },
    WeekdayName { weekday: Weekday::Thu, name: "Thursday", name_short: "THU" },
    WeekdayName { weekday: Weekday::Fri, name: "Friday", name_short: "FRI" },
    WeekdayName { weekday: Weekday::Sat, name: "Saturday", name_short: "SAT" },
];

/// 1-based Sunday-anchored position of a weekday.
pub fn position_of(weekday: Weekday) -> u32 {
    weekday.num_days_from_sunday() + 1
}

/// 1-based Sunday-anchored position of the date's weekday.
pub fn weekday_position(date: NaiveDate) -> u32 {
    position_of(date.weekday())
}

/// Table row for a weekday.
pub fn weekday_entry(weekday: Weekday) -> &'static WeekdayName {
    &WEEKDAYS_SUN0[weekday.num_days_from_sunday() as usize]
}

pub fn weekday_short_name(weekday: Weekday) -> &'static str {
    weekday_entry(weekday).name_short
}

/// Resolve a weekday from a full name or a three letter abbreviation, any case.
pub fn weekday_from_name(name: &str) -> Result<Weekday, DomainError> {
    let needle = name.trim();
    WEEKDAYS_SUN0
        .iter()
        .find(|w| w.name.eq_ignore_ascii_case(needle) || w.name_short.eq_ignore_ascii_case(needle))
        .map(|w| w.weekday)
        .ok_or_else(|| DomainError::Parse(format!("'{}' is not a weekday name", name)))
}

/// Next date strictly after `date` that falls on `weekday`.
pub fn next_weekday_after(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = date.weekday().num_days_from_sunday() as i64;
    let target = weekday.num_days_from_sunday() as i64;
    let mut delta = (target - current).rem_euclid(7);
    if delta == 0 {
        delta = 7;
    }
    date + Duration::days(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_positions_are_sunday_anchored() {
        assert_eq!(weekday_position(d(2021, 4, 18)), 1); // Sunday
        assert_eq!(weekday_position(d(2021, 4, 17)), 7); // Saturday
        assert_eq!(weekday_position(d(2020, 1, 1)), 4); // Wednesday
    }

    #[test]
    fn test_weekday_from_name() {
        assert_eq!(weekday_from_name("tue").unwrap(), Weekday::Tue);
        assert_eq!(weekday_from_name("Saturday").unwrap(), Weekday::Sat);
        assert_eq!(weekday_from_name(" SUN ").unwrap(), Weekday::Sun);
        assert!(matches!(weekday_from_name("Funday"), Err(DomainError::Parse(_))));
    }

    #[test]
    fn test_next_weekday_after_is_strict() {
        // 2021-04-18 is a Sunday; the next Sunday is a week later.
        assert_eq!(next_weekday_after(d(2021, 4, 18), Weekday::Sun), d(2021, 4, 25));
        assert_eq!(next_weekday_after(d(2021, 4, 18), Weekday::Mon), d(2021, 4, 19));
        assert_eq!(next_weekday_after(d(2021, 4, 17), Weekday::Fri), d(2021, 4, 23));
    }

    #[test]
    fn test_short_names() {
        assert_eq!(weekday_short_name(Weekday::Wed), "WED");
        assert_eq!(weekday_entry(Weekday::Fri).name, "Friday");
    }
}
