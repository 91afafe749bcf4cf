//! Map entities to and from flat cache records (field name -> string value).
//!
//! Field names and value formats are shared with existing cache consumers:
//! year dates are `MM/DD/YYYY`, day-of-month / month / day-of-year keep
//! their zero padding, everything else is a plain decimal or ISO date.

use crate::domain::{Day, DomainError, Week, Year};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::str::FromStr;

pub type FieldMap = BTreeMap<String, String>;

const YEAR_DATE_FORMAT: &str = "%m/%d/%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// An entity that round-trips through a cache record.
pub trait Record: Sized {
    fn to_fields(&self) -> FieldMap;
    fn from_fields(fields: &FieldMap) -> Result<Self, DomainError>;
}

fn field<'a>(fields: &'a FieldMap, name: &str) -> Result<&'a str, DomainError> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| DomainError::Cache(format!("record is missing field '{}'", name)))
}

fn number<T: FromStr>(fields: &FieldMap, name: &str) -> Result<T, DomainError> {
    let raw = field(fields, name)?;
    raw.trim()
        .parse()
        .map_err(|_| DomainError::Cache(format!("field '{}' is not a number: '{}'", name, raw)))
}

fn date(fields: &FieldMap, name: &str, format: &str) -> Result<NaiveDate, DomainError> {
    let raw = field(fields, name)?;
    NaiveDate::parse_from_str(raw, format)
        .map_err(|_| DomainError::Cache(format!("field '{}' is not a date: '{}'", name, raw)))
}

fn insert(map: &mut FieldMap, name: &str, value: impl ToString) {
    map.insert(name.to_string(), value.to_string());
}

impl Record for Year {
    fn to_fields(&self) -> FieldMap {
        let mut m = FieldMap::new();
        insert(&mut m, "year", self.year);
        insert(&mut m, "date_start", self.date_start.format(YEAR_DATE_FORMAT));
        insert(&mut m, "date_end", self.date_end.format(YEAR_DATE_FORMAT));
        insert(&mut m, "days_in_year", self.days_in_year);
        insert(&mut m, "jan_one_dayname", &self.jan_one_dayname);
        insert(&mut m, "jan_one_weekpos", self.jan_one_weekpos);
        insert(&mut m, "max_week_number", self.max_week_number);
        m
    }

    fn from_fields(fields: &FieldMap) -> Result<Self, DomainError> {
        Ok(Year {
            year: number(fields, "year")?,
            date_start: date(fields, "date_start", YEAR_DATE_FORMAT)?,
            date_end: date(fields, "date_end", YEAR_DATE_FORMAT)?,
            days_in_year: number(fields, "days_in_year")?,
            jan_one_dayname: field(fields, "jan_one_dayname")?.to_string(),
            jan_one_weekpos: number(fields, "jan_one_weekpos")?,
            max_week_number: number(fields, "max_week_number")?,
        })
    }
}

impl Record for Week {
    fn to_fields(&self) -> FieldMap {
        let mut m = FieldMap::new();
        insert(&mut m, "year", self.week_year);
        insert(&mut m, "week_number", self.week_number);
        insert(&mut m, "week_start", self.date_start.format(ISO_DATE_FORMAT));
        insert(&mut m, "week_end", self.date_end.format(ISO_DATE_FORMAT));
        let dates: Vec<String> = self
            .dates
            .iter()
            .map(|d| d.format(ISO_DATE_FORMAT).to_string())
            .collect();
        insert(&mut m, "week_dates", dates.join(","));
        m
    }

    fn from_fields(fields: &FieldMap) -> Result<Self, DomainError> {
        let dates = field(fields, "week_dates")?
            .split(',')
            .map(|s| {
                NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT).map_err(|_| {
                    DomainError::Cache(format!("field 'week_dates' has a bad date: '{}'", s))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if dates.len() != 7 {
            return Err(DomainError::Cache(format!(
                "field 'week_dates' holds {} dates, expected 7",
                dates.len()
            )));
        }
        Ok(Week {
            week_year: number(fields, "year")?,
            week_number: number(fields, "week_number")?,
            date_start: date(fields, "week_start", ISO_DATE_FORMAT)?,
            date_end: date(fields, "week_end", ISO_DATE_FORMAT)?,
            dates,
        })
    }
}

impl Record for Day {
    fn to_fields(&self) -> FieldMap {
        let mut m = FieldMap::new();
        let iso = self.date.format(ISO_DATE_FORMAT).to_string();
        insert(&mut m, "date", &iso);
        insert(&mut m, "date_as_string", &iso);
        insert(&mut m, "weekday_name", &self.weekday_name);
        insert(&mut m, "weekday_name_short", &self.weekday_name_short);
        insert(&mut m, "day_of_month", format!("{:02}", self.day_of_month));
        insert(&mut m, "month_in_year_int", format!("{:02}", self.month_in_year));
        insert(&mut m, "month_in_year_str", &self.month_name);
        insert(&mut m, "year", self.year);
        insert(&mut m, "day_of_year", format!("{:03}", self.day_of_year));
        insert(&mut m, "week_year", self.week_year);
        insert(&mut m, "week_number", self.week_number);
        insert(&mut m, "index_in_week", self.index_in_week);
        m
    }

    fn from_fields(fields: &FieldMap) -> Result<Self, DomainError> {
        Ok(Day {
            date: date(fields, "date", ISO_DATE_FORMAT)?,
            weekday_name: field(fields, "weekday_name")?.to_string(),
            weekday_name_short: field(fields, "weekday_name_short")?.to_string(),
            day_of_month: number(fields, "day_of_month")?,
            month_in_year: number(fields, "month_in_year_int")?,
            month_name: field(fields, "month_in_year_str")?.to_string(),
            year: number(fields, "year")?,
            day_of_year: number(fields, "day_of_year")?,
            week_year: number(fields, "week_year")?,
            week_number: number(fields, "week_number")?,
            index_in_week: number(fields, "index_in_week")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_day() -> Day {
        Day {
            date: d(2021, 1, 2),
            weekday_name: "Saturday".to_string(),
            weekday_name_short: "Sat".to_string(),
            day_of_month: 2,
            month_in_year: 1,
            month_name: "January".to_string(),
            year: 2021,
            day_of_year: 2,
            week_year: 2021,
            week_number: 1,
            index_in_week: 7,
        }
    }

    #[test]
    fn test_year_fields_use_us_dates() {
        let year = Year {
            year: 2021,
            date_start: d(2021, 1, 1),
            date_end: d(2021, 12, 31),
            days_in_year: 365,
            jan_one_dayname: "FRI".to_string(),
            jan_one_weekpos: 6,
            max_week_number: 52,
        };
        let fields = year.to_fields();
        assert_eq!(fields["date_start"], "01/01/2021");
        assert_eq!(fields["date_end"], "12/31/2021");
        assert_eq!(fields["jan_one_weekpos"], "6");
        assert_eq!(Year::from_fields(&fields).unwrap(), year);
    }

    #[test]
    fn test_day_fields_keep_zero_padding() {
        let fields = sample_day().to_fields();
        assert_eq!(fields["day_of_month"], "02");
        assert_eq!(fields["month_in_year_int"], "01");
        assert_eq!(fields["day_of_year"], "002");
        assert_eq!(fields["date_as_string"], "2021-01-02");
        assert_eq!(Day::from_fields(&fields).unwrap(), sample_day());
    }

    #[test]
    fn test_week_fields() {
        let week = Week::new(2021, 1, d(2020, 12, 27));
        let fields = week.to_fields();
        assert_eq!(fields["year"], "2021");
        assert_eq!(fields["week_start"], "2020-12-27");
        assert!(fields["week_dates"].starts_with("2020-12-27,2020-12-28"));
        assert_eq!(Week::from_fields(&fields).unwrap(), week);
    }

    #[test]
    fn test_malformed_record_is_a_cache_error() {
        let mut fields = sample_day().to_fields();
        fields.remove("week_number");
        assert!(matches!(Day::from_fields(&fields), Err(DomainError::Cache(_))));

        let mut fields = Week::new(2021, 1, d(2020, 12, 27)).to_fields();
        fields.insert("week_dates".to_string(), "2020-12-27".to_string());
        assert!(matches!(Week::from_fields(&fields), Err(DomainError::Cache(_))));
    }
}
