//! Calendar builder: materialize weeks -> years -> days and write them to the cache.
//!
//! - Weeks first: they decide each year's `max_week_number`
//! - Years next, scanning the in-memory week set
//! - Days last, one record per date, numbered by the week engine
//!
//! Each phase replaces its records as one batch (delete, then write in full);
//! on backends without transactions readers may briefly see a key missing.
//! Serialize rebuilds externally.

use crate::domain::dates::date_range;
use crate::domain::week_numbering::{date_to_week_number, day_of_year, days_in_year, week_one_start};
use crate::domain::weekday::{WEEKDAYS_SUN0, weekday_position, weekday_short_name};
use crate::domain::{Day, DomainError, FieldMap, KeySpace, Record, Week, Year};
use crate::ports::CachePort;
use crate::shared::config::BuilderConfig;
use chrono::{Datelike, Duration, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info};

/// Counts of records written by one full rebuild.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub weeks: usize,
    pub years: usize,
    pub days: usize,
}

/// Builds the calendar for one configured year range.
pub struct CalendarBuilder {
    config: BuilderConfig,
    cache: Arc<dyn CachePort>,
    keys: KeySpace,
    /// Filled by `build_weeks`; consumed by `build_years`.
    weeks: Vec<Week>,
}

impl CalendarBuilder {
    pub fn new(config: BuilderConfig, cache: Arc<dyn CachePort>, keys: KeySpace) -> Self {
        Self {
            config,
            cache,
            keys,
            weeks: Vec::new(),
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Weeks produced by the last `build_weeks` call.
    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Run all three phases in order, then flush the cache.
    pub async fn rebuild(&mut self) -> Result<BuildSummary, DomainError> {
        info!(
            epoch_year = self.config.epoch_year(),
            end_year = self.config.end_year(),
            start_of_week = %self.config.start_of_week(),
            "rebuilding calendar cache"
        );
        let weeks = self.build_weeks().await?;
        let years = self.build_years().await?;
        let days = self.build_days().await?;
        self.cache.flush().await?;
        let summary = BuildSummary { weeks, years, days };
        info!(weeks, years, days, "calendar cache rebuilt");
        Ok(summary)
    }

    /// Generate every week from the Sunday on or before the epoch's January 1st
    /// until a week starts after `end_year`, writing each to the cache.
    pub async fn build_weeks(&mut self) -> Result<usize, DomainError> {
        self.weeks = generate_weeks(self.config.epoch_year(), self.config.end_year())?;
        if let Some(first) = self.weeks.first() {
            debug!(date_start = %first.date_start, "building weeks");
        }

        let weeks_set = self.keys.weeks_set();
        self.cache.delete_key(&weeks_set).await?;
        let records: Vec<(String, FieldMap)> = self
            .weeks
            .iter()
            .map(|week| (self.keys.week(week.id()), week.to_fields()))
            .collect();
        self.cache.replace_records(&records).await?;
        let members: Vec<String> = self.weeks.iter().map(Week::key_suffix).collect();
        self.cache.write_set(&weeks_set, &members).await?;

        info!(count = self.weeks.len(), "created week keys");
        Ok(self.weeks.len())
    }

    /// Write the year index and one record per year. Requires `build_weeks` first.
    pub async fn build_years(&mut self) -> Result<usize, DomainError> {
        let years_set = self.keys.years_set();
        let members: Vec<String> = self.config.years().map(|y| y.to_string()).collect();
        self.cache.delete_key(&years_set).await?;
        self.cache.write_set(&years_set, &members).await?;

        let mut records = Vec::new();
        for year in self.config.years() {
            let meta = self.year_metadata(year)?;
            debug!(year, max_week_number = meta.max_week_number, "year metadata");
            records.push((self.keys.year(year), meta.to_fields()));
        }
        self.cache.replace_records(&records).await?;
        let count = records.len();
        info!(count, "created year keys");
        Ok(count)
    }

    /// Metadata of one year, using the weeks already built.
    pub fn year_metadata(&self, year: i32) -> Result<Year, DomainError> {
        let date_start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| DomainError::Config(format!("year {} is out of range", year)))?;
        let date_end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| DomainError::Config(format!("year {} is out of range", year)))?;

        let jan_one_dayname = weekday_short_name(date_start.weekday()).to_string();
        let jan_one_weekpos = WEEKDAYS_SUN0
            .iter()
            .position(|w| w.name_short == jan_one_dayname)
            .map(|i| i as u32 + 1)
            .ok_or_else(|| {
                DomainError::Consistency(format!(
                    "weekday '{}' missing from the weekday table",
                    jan_one_dayname
                ))
            })?;

        let max_week_number = self
            .weeks
            .iter()
            .filter(|w| w.week_year == year)
            .map(|w| w.week_number)
            .max()
            .ok_or_else(|| {
                DomainError::Consistency(format!(
                    "no weeks were built for year {}; build weeks before years",
                    year
                ))
            })?;

        Ok(Year {
            year,
            date_start,
            date_end,
            days_in_year: days_in_year(year),
            jan_one_dayname,
            jan_one_weekpos,
            max_week_number,
        })
    }

    /// One day record per date in `[epoch-01-01, end-12-31]`.
    pub async fn build_days(&self) -> Result<usize, DomainError> {
        let start = NaiveDate::from_ymd_opt(self.config.epoch_year(), 1, 1).ok_or_else(|| {
            DomainError::Config(format!("year {} is out of range", self.config.epoch_year()))
        })?;
        let end = NaiveDate::from_ymd_opt(self.config.end_year(), 12, 31).ok_or_else(|| {
            DomainError::Config(format!("year {} is out of range", self.config.end_year()))
        })?;

        let records: Vec<(String, FieldMap)> = date_range(start, end)
            .map(|date| (self.keys.day(date), day_metadata(date).to_fields()))
            .collect();
        self.cache.replace_records(&records).await?;
        let count = records.len();
        info!(count, "created day keys");
        Ok(count)
    }
}

/// Week blocks covering `epoch_year..=end_year`.
///
/// A block is week 1 when it starts on January 1st or when January 1st falls
/// inside it; otherwise it continues the previous block's numbering. The
/// owning year is the year of the block's last day.
pub fn generate_weeks(epoch_year: i32, end_year: i32) -> Result<Vec<Week>, DomainError> {
    let mut start = week_one_start(epoch_year)?;
    let mut week_number = 0;
    let mut weeks = Vec::new();

    while start.year() <= end_year {
        let end = start + Duration::days(6);
        let starts_year = start.month() == 1 && start.day() == 1;
        week_number = if starts_year || end.year() > start.year() {
            1
        } else {
            week_number + 1
        };
        weeks.push(Week::new(end.year(), week_number, start));
        start += Duration::weeks(1);
    }
    Ok(weeks)
}

/// Every Day field for one date.
pub fn day_metadata(date: NaiveDate) -> Day {
    let week = date_to_week_number(date);
    Day {
        date,
        weekday_name: date.format("%A").to_string(),
        weekday_name_short: date.format("%a").to_string(),
        day_of_month: date.day(),
        month_in_year: date.month(),
        month_name: date.format("%B").to_string(),
        year: date.year(),
        day_of_year: day_of_year(date),
        week_year: week.week_year,
        week_number: week.week_number,
        index_in_week: weekday_position(date),
    }
}
