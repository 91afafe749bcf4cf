//! Calendar lookups backed by the cache.
//!
//! - Reads records through CachePort and maps them to entities
//! - On a miss, rebuilds the configured range once and retries
//! - Still missing: `None` (lenient) or `NotFound` (strict)

use crate::domain::week_numbering::{date_to_week_number, weeks_in_year};
use crate::domain::{Day, DomainError, KeySpace, Record, Week, WeekNumber, Year};
use crate::ports::CachePort;
use crate::shared::config::{BuilderConfig, LookupMode};
use crate::usecases::builder::{BuildSummary, CalendarBuilder};
use crate::usecases::week_range::WeekRange;
use chrono::NaiveDate;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Query surface over the cached calendar.
pub struct CalendarService {
    cache: Arc<dyn CachePort>,
    keys: KeySpace,
    defaults: BuilderConfig,
    mode: LookupMode,
    /// One rebuild at a time from this service.
    rebuild_lock: Mutex<()>,
    /// Completed rebuilds; lets a caller that waited on the lock skip its own.
    generation: AtomicU64,
}

impl CalendarService {
    pub fn new(
        cache: Arc<dyn CachePort>,
        keys: KeySpace,
        defaults: BuilderConfig,
        mode: LookupMode,
    ) -> Self {
        Self {
            cache,
            keys,
            defaults,
            mode,
            rebuild_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn mode(&self) -> LookupMode {
        self.mode
    }

    pub fn defaults(&self) -> &BuilderConfig {
        &self.defaults
    }

    /// Full weeks -> years -> days rebuild. Missing years fall back to the
    /// configured defaults; the week start must be `"SUN"`.
    pub async fn rebuild(
        &self,
        epoch_year: Option<i32>,
        end_year: Option<i32>,
        start_of_week: &str,
    ) -> Result<BuildSummary, DomainError> {
        let config = BuilderConfig::new(
            epoch_year.unwrap_or(self.defaults.epoch_year()),
            end_year.unwrap_or(self.defaults.end_year()),
            start_of_week,
        )?;
        self.run_rebuild(config).await
    }

    async fn run_rebuild(&self, config: BuilderConfig) -> Result<BuildSummary, DomainError> {
        let _guard = self.rebuild_lock.lock().await;
        self.rebuild_locked(config).await
    }

    async fn rebuild_locked(&self, config: BuilderConfig) -> Result<BuildSummary, DomainError> {
        let mut builder = CalendarBuilder::new(config, Arc::clone(&self.cache), self.keys.clone());
        let summary = builder.rebuild().await?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(summary)
    }

    /// Rebuild with the defaults unless another rebuild finished after `seen`.
    async fn rebuild_after_miss(&self, key: &str, seen: u64) -> Result<(), DomainError> {
        let _guard = self.rebuild_lock.lock().await;
        if self.generation.load(Ordering::SeqCst) != seen {
            debug!(key, "cache was rebuilt while waiting; skipping rebuild");
            return Ok(());
        }
        warn!(key, "no cached value; rebuilding");
        self.rebuild_locked(self.defaults).await.map(|_| ())
    }

    /// All materialized years, ascending.
    pub async fn years(&self) -> Result<Vec<i32>, DomainError> {
        let members = self.read_set_or_rebuild(&self.keys.years_set()).await?;
        let mut years = members
            .iter()
            .map(|m| {
                m.parse::<i32>()
                    .map_err(|_| DomainError::Cache(format!("bad year in index: '{}'", m)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        years.sort_unstable();
        Ok(years)
    }

    /// All materialized week identifiers (`YYYY-WW`), ascending.
    pub async fn week_keys(&self) -> Result<Vec<String>, DomainError> {
        let mut weeks = self.read_set_or_rebuild(&self.keys.weeks_set()).await?;
        weeks.sort();
        Ok(weeks)
    }

    pub async fn year(&self, year: i32) -> Result<Option<Year>, DomainError> {
        self.read_or_rebuild(&self.keys.year(year)).await
    }

    /// Week by its identifier. Week numbers the year cannot have are rejected
    /// without touching the cache.
    pub async fn week(&self, year: i32, week_number: u32) -> Result<Option<Week>, DomainError> {
        if week_number == 0 || week_number > weeks_in_year(year)? {
            return Err(DomainError::InvalidWeek { year, week_number });
        }
        let id = WeekNumber::new(year, week_number);
        self.read_or_rebuild(&self.keys.week(id)).await
    }

    /// The cached week that contains `date`.
    pub async fn week_for_date(&self, date: NaiveDate) -> Result<Option<Week>, DomainError> {
        let id = date_to_week_number(date);
        self.read_or_rebuild(&self.keys.week(id)).await
    }

    /// Lazy run of weeks from the one containing `from` to the one containing `to`.
    pub fn weeks_between(&self, from: NaiveDate, to: NaiveDate) -> WeekRange {
        WeekRange::new(from, to)
    }

    pub async fn day(&self, date: NaiveDate) -> Result<Option<Day>, DomainError> {
        self.read_or_rebuild(&self.keys.day(date)).await
    }

    async fn read_or_rebuild<T: Record>(&self, key: &str) -> Result<Option<T>, DomainError> {
        let seen = self.generation.load(Ordering::SeqCst);
        if let Some(fields) = self.cache.read_record(key).await? {
            return T::from_fields(&fields).map(Some);
        }
        self.rebuild_after_miss(key, seen).await?;
        match self.cache.read_record(key).await? {
            Some(fields) => T::from_fields(&fields).map(Some),
            None => self.absent(key),
        }
    }

    async fn read_set_or_rebuild(&self, set_name: &str) -> Result<Vec<String>, DomainError> {
        let seen = self.generation.load(Ordering::SeqCst);
        let members = self.cache.read_set(set_name).await?;
        if !members.is_empty() {
            return Ok(members);
        }
        self.rebuild_after_miss(set_name, seen).await?;
        let members = self.cache.read_set(set_name).await?;
        if members.is_empty() {
            return self.absent(set_name).map(Option::unwrap_or_default);
        }
        Ok(members)
    }

    fn absent<T>(&self, key: &str) -> Result<Option<T>, DomainError> {
        match self.mode {
            LookupMode::Lenient => {
                info!(key, "still missing after rebuild; returning nothing");
                Ok(None)
            }
            LookupMode::Strict => Err(DomainError::NotFound {
                key: key.to_string(),
            }),
        }
    }
}
