//! General date helpers: ranges, parsing, recurring future dates.

use crate::domain::week_numbering::{date_to_week_number, day_of_year};
use crate::domain::weekday::weekday_position;
use crate::domain::{DomainError, WeekNumber};
use chrono::{Days, NaiveDate};

/// Calendar accessors on `NaiveDate` in this crate's conventions.
pub trait DateExt {
    fn week_number(&self) -> WeekNumber;
    fn day_of_year(&self) -> u32;
    /// Sunday = 1 .. Saturday = 7.
    fn index_in_week(&self) -> u32;
    /// `YYYY-MM-DD`.
    fn iso_string(&self) -> String;
}

impl DateExt for NaiveDate {
    fn week_number(&self) -> WeekNumber {
        date_to_week_number(*self)
    }

    fn day_of_year(&self) -> u32 {
        day_of_year(*self)
    }

    fn index_in_week(&self) -> u32 {
        weekday_position(*self)
    }

    fn iso_string(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

/// Inclusive range of consecutive dates. Empty when `start > end`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Flatten several inclusive ranges, in the order given.
pub fn date_ranges_to_dates(ranges: &[(NaiveDate, NaiveDate)]) -> Vec<NaiveDate> {
    ranges
        .iter()
        .flat_map(|&(start, end)| date_range(start, end))
        .collect()
}

pub fn date_is_between(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}

pub fn earliest_date(dates: &[NaiveDate]) -> Option<NaiveDate> {
    dates.iter().min().copied()
}

pub fn latest_date(dates: &[NaiveDate]) -> Option<NaiveDate> {
    dates.iter().max().copied()
}

/// Parse `YYYY-MM-DD` or `MM/DD/YYYY`.
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .map_err(|_| DomainError::Parse(format!("'{}' is not a valid date", s)))
}

/// Dates `epoch + k * multiple_of_days` (k >= 0) on or after `earliest_result_date`,
/// the first `qty_of_result_dates` of them.
pub fn calc_future_dates(
    epoch_date: NaiveDate,
    multiple_of_days: u32,
    earliest_result_date: NaiveDate,
    qty_of_result_dates: usize,
) -> Result<Vec<NaiveDate>, DomainError> {
    if multiple_of_days == 0 {
        return Err(DomainError::Config(
            "multiple_of_days must be at least 1".to_string(),
        ));
    }
    let step = i64::from(multiple_of_days);
    // Jump straight to the first multiple on or after the earliest result date.
    let gap = (earliest_result_date - epoch_date).num_days();
    let first_k = if gap <= 0 { 0 } else { (gap + step - 1) / step };
    let offset = |k: u64| {
        k.checked_mul(step as u64)
            .and_then(|days| epoch_date.checked_add_days(Days::new(days)))
            .ok_or_else(|| {
                DomainError::Config(format!(
                    "{} steps of {} days from {} is past the last representable date",
                    k, step, epoch_date
                ))
            })
    };

    (0..qty_of_result_dates as u64)
        .map(|i| offset(first_k as u64 + i))
        .collect()
}

/// `1 -> "1st"`, `12 -> "12th"`, `23 -> "23rd"`.
pub fn int_to_ordinal_string(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_future_dates_weekly() {
        let dates = calc_future_dates(d(2021, 7, 1), 7, d(2021, 7, 16), 4).unwrap();
        assert_eq!(
            dates,
            vec![d(2021, 7, 22), d(2021, 7, 29), d(2021, 8, 5), d(2021, 8, 12)]
        );
    }

    #[test]
    fn test_future_dates_fortnightly() {
        let dates = calc_future_dates(d(2021, 7, 1), 14, d(2021, 7, 16), 4).unwrap();
        assert_eq!(
            dates,
            vec![d(2021, 7, 29), d(2021, 8, 12), d(2021, 8, 26), d(2021, 9, 9)]
        );
    }

    #[test]
    fn test_future_dates_include_epoch_when_early_enough() {
        let dates = calc_future_dates(d(2021, 7, 1), 7, d(2021, 6, 1), 2).unwrap();
        assert_eq!(dates, vec![d(2021, 7, 1), d(2021, 7, 8)]);
        assert!(calc_future_dates(d(2021, 7, 1), 0, d(2021, 6, 1), 2).is_err());
    }

    #[test]
    fn test_future_dates_past_max_date_is_an_error() {
        assert!(matches!(
            calc_future_dates(d(2021, 7, 1), 365, d(2021, 7, 1), 300_000),
            Err(DomainError::Config(_))
        ));
        assert!(matches!(
            calc_future_dates(d(2021, 7, 1), u32::MAX, NaiveDate::MAX, 1),
            Err(DomainError::Config(_))
        ));
    }

    #[test]
    fn test_date_ranges_to_dates() {
        let ranges = [
            (d(2023, 10, 1), d(2023, 10, 5)),
            (d(2023, 11, 15), d(2023, 11, 20)),
            (d(2023, 12, 9), d(2023, 12, 13)),
        ];
        let dates = date_ranges_to_dates(&ranges);
        assert_eq!(dates.len(), 16);
        assert_eq!(dates[0], d(2023, 10, 1));
        assert_eq!(dates[5], d(2023, 11, 15));
        assert_eq!(dates[15], d(2023, 12, 13));
    }

    #[test]
    fn test_date_range_is_inclusive_and_crosses_leap_day() {
        let dates: Vec<NaiveDate> = date_range(d(2020, 2, 27), d(2020, 3, 1)).collect();
        assert_eq!(
            dates,
            vec![d(2020, 2, 27), d(2020, 2, 28), d(2020, 2, 29), d(2020, 3, 1)]
        );
        assert_eq!(date_range(d(2020, 3, 2), d(2020, 3, 1)).count(), 0);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2021-04-17").unwrap(), d(2021, 4, 17));
        assert_eq!(parse_date("04/17/2021").unwrap(), d(2021, 4, 17));
        assert!(matches!(parse_date("next tuesday"), Err(DomainError::Parse(_))));
        assert!(parse_date("2021-02-30").is_err());
    }

    #[test]
    fn test_min_max_and_between() {
        let dates = [d(2021, 3, 1), d(2020, 1, 1), d(2022, 7, 4)];
        assert_eq!(earliest_date(&dates), Some(d(2020, 1, 1)));
        assert_eq!(latest_date(&dates), Some(d(2022, 7, 4)));
        assert_eq!(earliest_date(&[]), None);
        assert!(date_is_between(d(2021, 1, 1), d(2021, 1, 1), d(2021, 1, 2)));
        assert!(!date_is_between(d(2021, 1, 3), d(2021, 1, 1), d(2021, 1, 2)));
    }

    #[test]
    fn test_ordinal_strings() {
        let cases = [(1, "1st"), (2, "2nd"), (3, "3rd"), (4, "4th"), (11, "11th"), (12, "12th"), (13, "13th"), (21, "21st"), (112, "112th"), (101, "101st")];
        for (n, expected) in cases {
            assert_eq!(int_to_ordinal_string(n), expected);
        }
    }

    #[test]
    fn test_date_ext() {
        let date = d(2021, 4, 17);
        assert_eq!(date.index_in_week(), 7);
        assert_eq!(date.day_of_year(), 107);
        assert_eq!(date.iso_string(), "2021-04-17");
        assert_eq!(date.week_number(), WeekNumber::new(2021, 16));
    }
}
