//! Cron expressions for one-off runs at a specific calendar moment.

use crate::domain::DomainError;
use crate::domain::dates::parse_date;
use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};

/// `"{minute} {hour} {day} {month} * {year}"`.
pub fn datetime_to_cron_string(dt: NaiveDateTime) -> String {
    format!(
        "{} {} {} {} * {}",
        dt.minute(),
        dt.hour(),
        dt.day(),
        dt.month(),
        dt.year()
    )
}

/// Combine a date string and a time string (`HH:MM` or `HH:MM:SS`) into a cron string.
pub fn date_and_time_to_cron_string(date: &str, time: &str) -> Result<String, DomainError> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    Ok(datetime_to_cron_string(date.and_time(time)))
}

fn parse_time(s: &str) -> Result<NaiveTime, DomainError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| DomainError::Parse(format!("'{}' is not a valid time", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_datetime_to_cron_string() {
        let dt = NaiveDate::from_ymd_opt(2021, 7, 4)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert_eq!(datetime_to_cron_string(dt), "5 14 4 7 * 2021");
    }

    #[test]
    fn test_date_and_time_to_cron_string() {
        assert_eq!(
            date_and_time_to_cron_string("2021-12-31", "23:59").unwrap(),
            "59 23 31 12 * 2021"
        );
        assert_eq!(
            date_and_time_to_cron_string("01/02/2022", "08:30:15").unwrap(),
            "30 8 2 1 * 2022"
        );
        assert!(matches!(
            date_and_time_to_cron_string("2021-12-31", "noon"),
            Err(DomainError::Parse(_))
        ));
    }
}
